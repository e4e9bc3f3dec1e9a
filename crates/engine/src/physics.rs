//! Movement against the tile grid.
//!
//! A move is decided against the tentative position before anything is
//! mutated: if any overlapped tile stops the mover, or any push cannot land,
//! neither the mover nor the map changes. Pushes are single-level: a pushed
//! tile never pushes another.

use std::collections::BTreeSet;

use tracing::{debug, error};

use crate::geom::{FRect, Vec2};
use crate::grid::{Behavior, Direction, GridPos, TileMap};

/// Anything that moves through the tile grid in fixed steps.
pub trait Mover {
    fn position(&self) -> Vec2;
    fn set_position(&mut self, position: Vec2);
    fn size(&self) -> Vec2;
    /// Distance covered by one move request, in world units.
    fn step(&self) -> f32;

    fn hitbox_at(&self, position: Vec2) -> FRect {
        FRect::new(position, self.size())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MoveOutcome {
    /// The mover now sits at `to`. `pushed` lists the pushed tiles' former cells.
    Moved { to: Vec2, pushed: Vec<GridPos> },
    /// A `Stop` tile at `by` rejected the move.
    Stopped { by: GridPos },
    /// The push tile at `tile` had nowhere to go.
    PushBlocked { tile: GridPos, destination: GridPos },
}

impl MoveOutcome {
    pub fn moved(&self) -> bool {
        matches!(self, MoveOutcome::Moved { .. })
    }
}

/// Cells of every tile whose hitbox strictly overlaps `hitbox`.
pub fn colliding_tiles(tiles: &TileMap, hitbox: &FRect) -> Vec<GridPos> {
    tiles
        .tiles()
        .filter(|tile| hitbox.overlaps(&tile.hitbox()))
        .map(|tile| tile.pos)
        .collect()
}

pub fn resolve_move<M: Mover + ?Sized>(
    tiles: &mut TileMap,
    mover: &mut M,
    direction: Direction,
) -> MoveOutcome {
    let tentative = mover.position() + direction.unit_vector() * mover.step();
    let hitbox = mover.hitbox_at(tentative);

    let mut pushes = BTreeSet::new();
    for pos in colliding_tiles(tiles, &hitbox) {
        let Some(tile) = tiles.get(pos) else {
            continue;
        };
        match tile.behavior {
            Behavior::Stop => {
                debug!(tile = %pos, ?direction, "move_stopped");
                return MoveOutcome::Stopped { by: pos };
            }
            Behavior::Pass => {}
            Behavior::Push => {
                pushes.insert(pos);
            }
        }
    }

    if let Some(blocked) = find_blocked_push(tiles, &pushes, direction) {
        debug!(
            tile = %blocked.0,
            destination = %blocked.1,
            ?direction,
            "push_blocked"
        );
        return MoveOutcome::PushBlocked {
            tile: blocked.0,
            destination: blocked.1,
        };
    }

    // Pushed tiles advance one whole cell per move, whatever the mover's step,
    // so every tile stays on an integer cell.
    if !pushes.is_empty() {
        if let Err(err) = tiles.translate(&pushes, direction) {
            // find_blocked_push already vetted every destination.
            debug_assert!(false, "push commit failed after validation: {err}");
            error!(error = %err, "push_commit_refused");
            let tile = pushes.first().copied().unwrap_or_default();
            return MoveOutcome::PushBlocked {
                tile,
                destination: tile.offset(direction),
            };
        }
    }

    mover.set_position(tentative);
    let pushed: Vec<GridPos> = pushes.into_iter().collect();
    debug!(
        x = tentative.x,
        y = tentative.y,
        pushed = pushed.len(),
        "mover_moved"
    );
    MoveOutcome::Moved {
        to: tentative,
        pushed,
    }
}

/// First push in `pushes` whose destination is taken by a tile that is not
/// moving too.
fn find_blocked_push(
    tiles: &TileMap,
    pushes: &BTreeSet<GridPos>,
    direction: Direction,
) -> Option<(GridPos, GridPos)> {
    pushes.iter().find_map(|&pos| {
        tiles
            .destination_for(pos, direction, pushes)
            .err()
            .map(|_| (pos, pos.offset(direction)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Color, Tile};
    use crate::player::Player;

    /// 1.2-wide body so a 0.5 step from the origin truly overlaps (1, 0).
    fn body_at_origin() -> Body {
        Body {
            position: Vec2::ZERO,
            size: Vec2::splat(1.2),
            step: 0.5,
        }
    }

    struct Body {
        position: Vec2,
        size: Vec2,
        step: f32,
    }

    impl Mover for Body {
        fn position(&self) -> Vec2 {
            self.position
        }

        fn set_position(&mut self, position: Vec2) {
            self.position = position;
        }

        fn size(&self) -> Vec2 {
            self.size
        }

        fn step(&self) -> f32 {
            self.step
        }
    }

    fn tile(x: i32, y: i32, behavior: Behavior) -> Tile {
        Tile::new(GridPos::new(x, y), Color::GREY, behavior)
    }

    fn map(tiles: &[Tile]) -> TileMap {
        TileMap::from_tiles(tiles.iter().copied()).expect("map")
    }

    #[test]
    fn stop_tile_rejects_the_move() {
        let mut tiles = map(&[tile(1, 0, Behavior::Stop)]);
        let mut body = body_at_origin();

        let outcome = resolve_move(&mut tiles, &mut body, Direction::Right);

        assert_eq!(outcome, MoveOutcome::Stopped { by: GridPos::new(1, 0) });
        assert_eq!(body.position, Vec2::ZERO);
        assert_eq!(tiles, map(&[tile(1, 0, Behavior::Stop)]));
    }

    #[test]
    fn pass_tile_lets_the_mover_through() {
        let mut tiles = map(&[tile(1, 0, Behavior::Pass)]);
        let mut body = body_at_origin();

        let outcome = resolve_move(&mut tiles, &mut body, Direction::Right);

        assert!(outcome.moved());
        assert_eq!(body.position, Vec2::new(0.5, 0.0));
        assert_eq!(tiles, map(&[tile(1, 0, Behavior::Pass)]));
    }

    #[test]
    fn push_tile_moves_one_cell_and_is_rekeyed() {
        let mut tiles = map(&[tile(1, 0, Behavior::Push)]);
        let mut body = body_at_origin();

        let outcome = resolve_move(&mut tiles, &mut body, Direction::Right);

        assert_eq!(
            outcome,
            MoveOutcome::Moved {
                to: Vec2::new(0.5, 0.0),
                pushed: vec![GridPos::new(1, 0)],
            }
        );
        assert_eq!(body.position, Vec2::new(0.5, 0.0));
        assert_eq!(tiles.len(), 1);
        assert!(!tiles.contains(GridPos::new(1, 0)));
        let moved = tiles.get(GridPos::new(2, 0)).expect("pushed tile");
        assert_eq!(moved.pos, GridPos::new(2, 0));
        assert_eq!(moved.behavior, Behavior::Push);
        assert!(!body.hitbox_at(body.position).overlaps(&moved.hitbox()));
    }

    #[test]
    fn push_into_occupied_cell_rejects_the_move() {
        for occupant in [Behavior::Stop, Behavior::Pass] {
            let initial = map(&[tile(1, 0, Behavior::Push), tile(2, 0, occupant)]);
            let mut tiles = initial.clone();
            let mut body = body_at_origin();

            let outcome = resolve_move(&mut tiles, &mut body, Direction::Right);

            assert_eq!(
                outcome,
                MoveOutcome::PushBlocked {
                    tile: GridPos::new(1, 0),
                    destination: GridPos::new(2, 0),
                }
            );
            assert_eq!(body.position, Vec2::ZERO);
            assert_eq!(tiles, initial);
        }
    }

    #[test]
    fn push_tile_does_not_chain_into_another_push_tile() {
        let initial = map(&[tile(1, 0, Behavior::Push), tile(2, 0, Behavior::Push)]);
        let mut tiles = initial.clone();
        let mut body = body_at_origin();

        let outcome = resolve_move(&mut tiles, &mut body, Direction::Right);

        assert!(!outcome.moved());
        assert_eq!(tiles, initial);
    }

    #[test]
    fn stop_wins_regardless_of_enumeration_order() {
        // Tall body overlaps a push tile and a stop tile in the same move.
        for (push_y, stop_y) in [(0, 1), (1, 0)] {
            let initial = map(&[tile(1, push_y, Behavior::Push), tile(1, stop_y, Behavior::Stop)]);
            let mut tiles = initial.clone();
            let mut body = Body {
                position: Vec2::new(0.0, 0.5),
                size: Vec2::new(1.2, 1.8),
                step: 0.5,
            };

            let outcome = resolve_move(&mut tiles, &mut body, Direction::Right);

            assert_eq!(outcome, MoveOutcome::Stopped { by: GridPos::new(1, stop_y) });
            assert_eq!(body.position, Vec2::new(0.0, 0.5));
            assert_eq!(tiles, initial);
        }
    }

    #[test]
    fn one_blocked_push_cancels_every_other_push() {
        let initial = map(&[
            tile(1, 0, Behavior::Push),
            tile(1, 1, Behavior::Push),
            tile(2, 1, Behavior::Stop),
        ]);
        let mut tiles = initial.clone();
        let mut body = Body {
            position: Vec2::new(0.0, 0.5),
            size: Vec2::new(1.2, 1.8),
            step: 0.5,
        };

        let outcome = resolve_move(&mut tiles, &mut body, Direction::Right);

        assert_eq!(
            outcome,
            MoveOutcome::PushBlocked {
                tile: GridPos::new(1, 1),
                destination: GridPos::new(2, 1),
            }
        );
        assert_eq!(tiles, initial);
    }

    #[test]
    fn wide_mover_pushes_a_row_of_tiles_together() {
        let mut tiles = map(&[tile(1, 0, Behavior::Push), tile(1, 1, Behavior::Push)]);
        let mut body = Body {
            position: Vec2::new(0.0, 0.5),
            size: Vec2::new(1.2, 1.8),
            step: 0.5,
        };

        let outcome = resolve_move(&mut tiles, &mut body, Direction::Right);

        assert!(outcome.moved());
        assert!(tiles.contains(GridPos::new(2, 0)));
        assert!(tiles.contains(GridPos::new(2, 1)));
        assert_eq!(tiles.len(), 2);
    }

    #[test]
    fn flush_contact_is_not_a_collision() {
        let mut tiles = map(&[tile(2, 0, Behavior::Stop)]);
        let mut body = Body {
            position: Vec2::ZERO,
            size: Vec2::splat(1.0),
            step: 1.0,
        };

        let outcome = resolve_move(&mut tiles, &mut body, Direction::Right);

        assert!(outcome.moved());
        assert_eq!(body.position, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn pushed_tile_lands_even_when_the_mover_still_overlaps_it() {
        let mut tiles = map(&[tile(1, 0, Behavior::Push)]);
        // A long stride carries the body into the tile's new cell.
        let mut body = Body {
            position: Vec2::ZERO,
            size: Vec2::splat(1.2),
            step: 1.5,
        };

        let outcome = resolve_move(&mut tiles, &mut body, Direction::Right);

        assert!(outcome.moved());
        assert_eq!(body.position, Vec2::new(1.5, 0.0));
        assert_eq!(tiles, map(&[tile(2, 0, Behavior::Push)]));
    }

    #[test]
    fn grown_player_on_top_of_a_push_tile_can_leave_in_any_direction() {
        for direction in Direction::ALL {
            let mut tiles = map(&[tile(1, 0, Behavior::Push)]);
            let mut player = Player::new(Vec2::ZERO, 3);

            let outcome = resolve_move(&mut tiles, &mut player, direction);

            assert_eq!(
                outcome,
                MoveOutcome::Moved {
                    to: direction.unit_vector() * 0.5,
                    pushed: vec![GridPos::new(1, 0)],
                },
                "moving {direction:?}"
            );
            assert!(tiles.contains(GridPos::new(1, 0).offset(direction)));
            assert_eq!(tiles.len(), 1);
        }
    }

    #[test]
    fn every_direction_moves_by_one_step_on_an_empty_map() {
        let mut tiles = TileMap::new();
        let mut player = Player::new(Vec2::ZERO, 1);
        for direction in Direction::ALL {
            let before = player.position();
            assert!(resolve_move(&mut tiles, &mut player, direction).moved());
            let delta = player.position() - before;
            assert_eq!(delta, direction.unit_vector() * 0.5);
        }
    }

    #[test]
    fn player_walks_a_push_tile_across_the_grid() {
        let mut tiles = map(&[tile(1, 0, Behavior::Push)]);
        let mut player = Player::new(Vec2::ZERO, 1);

        for _ in 0..4 {
            resolve_move(&mut tiles, &mut player, Direction::Right);
        }

        assert_eq!(player.position(), Vec2::new(2.0, 0.0));
        assert!(tiles.contains(GridPos::new(3, 0)));
        assert_eq!(tiles.len(), 1);
    }

    #[test]
    fn repeated_pushes_never_duplicate_cells() {
        let mut tiles = map(&[
            tile(1, 0, Behavior::Push),
            tile(0, 2, Behavior::Push),
            tile(4, 0, Behavior::Stop),
            tile(-2, 1, Behavior::Pass),
        ]);
        let mut player = Player::new(Vec2::ZERO, 1);
        let script = [
            Direction::Right,
            Direction::Right,
            Direction::Right,
            Direction::Right,
            Direction::Up,
            Direction::Up,
            Direction::Left,
            Direction::Left,
            Direction::Up,
            Direction::Left,
            Direction::Left,
            Direction::Down,
        ];
        for direction in script {
            resolve_move(&mut tiles, &mut player, direction);
            let cells: BTreeSet<GridPos> = tiles.tiles().map(|t| t.pos).collect();
            assert_eq!(cells.len(), 4);
            assert!(tiles.tiles().all(|t| tiles.get(t.pos) == Some(t)));
        }
    }
}
