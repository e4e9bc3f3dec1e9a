use super::Vec2;

/// Axis-aligned rectangle in world space, stored as center + size.
///
/// `top` is the edge with the larger y. Corner setters move the rectangle so
/// that corner lands on the given point; the size never changes after
/// construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FRect {
    center: Vec2,
    size: Vec2,
}

impl FRect {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        debug_assert!(
            size.x > 0.0 && size.y > 0.0,
            "FRect size must be strictly positive, got {size:?}"
        );
        Self { center, size }
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn set_center(&mut self, center: Vec2) {
        self.center = center;
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    fn half(&self) -> Vec2 {
        self.size * 0.5
    }

    pub fn left(&self) -> f32 {
        self.center.x - self.half().x
    }

    pub fn right(&self) -> f32 {
        self.center.x + self.half().x
    }

    pub fn top(&self) -> f32 {
        self.center.y + self.half().y
    }

    pub fn bottom(&self) -> f32 {
        self.center.y - self.half().y
    }

    pub fn top_left(&self) -> Vec2 {
        Vec2::new(self.left(), self.top())
    }

    pub fn top_right(&self) -> Vec2 {
        Vec2::new(self.right(), self.top())
    }

    pub fn bottom_right(&self) -> Vec2 {
        Vec2::new(self.right(), self.bottom())
    }

    pub fn bottom_left(&self) -> Vec2 {
        Vec2::new(self.left(), self.bottom())
    }

    pub fn set_top_left(&mut self, corner: Vec2) {
        let half = self.half();
        self.center = Vec2::new(corner.x + half.x, corner.y - half.y);
    }

    pub fn set_top_right(&mut self, corner: Vec2) {
        let half = self.half();
        self.center = Vec2::new(corner.x - half.x, corner.y - half.y);
    }

    pub fn set_bottom_right(&mut self, corner: Vec2) {
        let half = self.half();
        self.center = Vec2::new(corner.x - half.x, corner.y + half.y);
    }

    pub fn set_bottom_left(&mut self, corner: Vec2) {
        let half = self.half();
        self.center = Vec2::new(corner.x + half.x, corner.y + half.y);
    }

    /// Corners in polygon order: top-left, top-right, bottom-right, bottom-left.
    pub fn corners(&self) -> [Vec2; 4] {
        [
            self.top_left(),
            self.top_right(),
            self.bottom_right(),
            self.bottom_left(),
        ]
    }

    /// Strict overlap test. Rectangles that only share an edge do not overlap.
    pub fn overlaps(&self, other: &FRect) -> bool {
        self.right() > other.left()
            && self.left() < other.right()
            && self.top() > other.bottom()
            && self.bottom() < other.top()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_at_ten() -> FRect {
        FRect::new(Vec2::new(10.0, 10.0), Vec2::new(1.0, 1.0))
    }

    #[test]
    fn corner_accessors_follow_plus_y_up() {
        let rect = unit_at_ten();
        assert_eq!(rect.center(), Vec2::new(10.0, 10.0));
        assert_eq!(rect.top_left(), Vec2::new(9.5, 10.5));
        assert_eq!(rect.top_right(), Vec2::new(10.5, 10.5));
        assert_eq!(rect.bottom_right(), Vec2::new(10.5, 9.5));
        assert_eq!(rect.bottom_left(), Vec2::new(9.5, 9.5));
        assert!(rect.left() < rect.right());
        assert!(rect.bottom() < rect.top());
    }

    #[test]
    fn moving_center_to_a_corner_shifts_every_corner() {
        let mut rect = unit_at_ten();
        rect.set_center(rect.top_left());
        assert_eq!(rect.center(), Vec2::new(9.5, 10.5));
        assert_eq!(rect.top_left(), Vec2::new(9.0, 11.0));

        let mut rect = unit_at_ten();
        rect.set_center(rect.bottom_right());
        assert_eq!(rect.center(), Vec2::new(10.5, 9.5));
        assert_eq!(rect.bottom_right(), Vec2::new(11.0, 9.0));
    }

    #[test]
    fn assigning_a_corner_recomputes_center() {
        let mut rect = unit_at_ten();
        rect.set_top_left(rect.center());
        assert_eq!(rect.top_left(), Vec2::new(10.0, 10.0));
        assert_eq!(rect.center(), Vec2::new(10.5, 9.5));

        let mut rect = unit_at_ten();
        rect.set_top_right(rect.center());
        assert_eq!(rect.center(), Vec2::new(9.5, 9.5));

        let mut rect = unit_at_ten();
        rect.set_bottom_right(rect.center());
        assert_eq!(rect.center(), Vec2::new(9.5, 10.5));

        let mut rect = unit_at_ten();
        rect.set_bottom_left(rect.center());
        assert_eq!(rect.center(), Vec2::new(10.5, 10.5));
        assert_eq!(rect.size(), Vec2::new(1.0, 1.0));
    }

    #[test]
    fn reassigning_each_corner_to_itself_is_a_no_op() {
        let samples = [
            (Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0)),
            (Vec2::new(-3.25, 7.5), Vec2::new(2.0, 4.0)),
            (Vec2::new(12.0, -0.5), Vec2::new(0.5, 3.0)),
        ];
        for (center, size) in samples {
            let mut rect = FRect::new(center, size);
            rect.set_top_left(rect.top_left());
            rect.set_top_right(rect.top_right());
            rect.set_bottom_right(rect.bottom_right());
            rect.set_bottom_left(rect.bottom_left());
            assert_eq!(rect.center(), center);
        }
    }

    #[test]
    fn corners_are_in_polygon_order() {
        let rect = FRect::new(Vec2::ZERO, Vec2::new(2.0, 2.0));
        assert_eq!(
            rect.corners(),
            [
                Vec2::new(-1.0, 1.0),
                Vec2::new(1.0, 1.0),
                Vec2::new(1.0, -1.0),
                Vec2::new(-1.0, -1.0),
            ]
        );
    }

    #[test]
    fn flush_edges_do_not_overlap() {
        let a = FRect::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0));
        let right_neighbor = FRect::new(Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0));
        let above_neighbor = FRect::new(Vec2::new(0.0, 1.0), Vec2::new(1.0, 1.0));
        assert!(!a.overlaps(&right_neighbor));
        assert!(!a.overlaps(&above_neighbor));

        let nudged = FRect::new(Vec2::new(0.9, 0.0), Vec2::new(1.0, 1.0));
        assert!(a.overlaps(&nudged));
        assert!(nudged.overlaps(&a));
    }
}
