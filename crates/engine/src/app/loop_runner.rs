use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use pixels::Error as PixelsError;
use thiserror::Error;
use tracing::{debug, info, warn};
use winit::dpi::PhysicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, Event, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowBuilder;

use crate::geom::{Vec2, Xfm, PIXELS_PER_WORLD};
use crate::grid::Direction;
use crate::StartupError;

use super::metrics::{LoopMetricsSnapshot, MetricsAccumulator};
use super::{HudContext, InputCommand, InputSnapshot, RenderReport, Renderer, Scene, SceneCommand};

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    /// `None` or `Some(0)` renders uncapped.
    pub target_fps: Option<u32>,
    pub pixels_per_world: f32,
    pub metrics_log_interval: Duration,
    /// Where F12 writes PNG captures. Screenshots are disabled when unset.
    pub screenshot_dir: Option<PathBuf>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "gridshift".to_string(),
            window_width: 500,
            window_height: 180,
            target_fps: Some(60),
            pixels_per_world: PIXELS_PER_WORLD,
            metrics_log_interval: Duration::from_secs(1),
            screenshot_dir: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] PixelsError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

pub fn run_app(config: LoopConfig, mut scene: Box<dyn Scene>) -> Result<(), AppError> {
    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(PhysicalSize::new(config.window_width, config.window_height))
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    let mut renderer = Renderer::new(Arc::clone(&window)).map_err(AppError::CreateRenderer)?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let xfm = Xfm::new(normalize_pixels_per_world(config.pixels_per_world));
    let render_cap = normalize_render_fps_cap(config.target_fps);
    let frame_target = target_frame_duration(render_cap);
    let metrics_log_interval =
        normalize_non_zero_duration(config.metrics_log_interval, Duration::from_secs(1));
    let viewport = renderer.viewport();
    let mut input_collector = InputCollector::new(viewport.width, viewport.height);

    scene.load();
    info!(scene = scene.name(), "scene_loaded");
    info!(
        window_width = viewport.width,
        window_height = viewport.height,
        pixels_per_world = xfm.pixels_per_world(),
        render_fps_cap = %format_render_cap(render_cap),
        metrics_log_interval_ms = metrics_log_interval.as_millis() as u64,
        "loop_config"
    );

    let mut last_frame_instant = Instant::now();
    let mut last_present_instant = Instant::now();
    let mut metrics_accumulator = MetricsAccumulator::new(metrics_log_interval, Instant::now());
    let mut latest_metrics = LoopMetricsSnapshot::default();
    let mut last_report = RenderReport::default();
    let window_for_loop = Arc::clone(&window);

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window_for_loop.id() => {
                match event {
                    WindowEvent::CloseRequested => {
                        info!(reason = "window_close", "shutdown_requested");
                        window_target.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        input_collector.set_window_size(new_size.width, new_size.height);
                        if let Err(error) = renderer.resize(new_size.width, new_size.height) {
                            warn!(error = %error, "renderer_resize_failed");
                            window_target.exit();
                        }
                    }
                    WindowEvent::ScaleFactorChanged { .. } => {
                        let size = window_for_loop.inner_size();
                        input_collector.set_window_size(size.width, size.height);
                        if let Err(error) = renderer.resize(size.width, size.height) {
                            warn!(error = %error, "renderer_resize_failed");
                            window_target.exit();
                        }
                    }
                    WindowEvent::ModifiersChanged(modifiers) => {
                        input_collector.set_ctrl_down(modifiers.state().control_key());
                    }
                    WindowEvent::CursorMoved { position, .. } => {
                        input_collector.handle_pointer_moved(position.x as f32, position.y as f32);
                    }
                    WindowEvent::CursorLeft { .. } => {
                        input_collector.clear_pointer();
                    }
                    WindowEvent::MouseInput { state, button, .. } => {
                        input_collector.handle_mouse_input(button, state);
                    }
                    WindowEvent::KeyboardInput { event, .. } => {
                        input_collector.handle_keyboard_input(&event);
                    }
                    WindowEvent::RedrawRequested => {
                        let now = Instant::now();
                        let frame_dt = now.saturating_duration_since(last_frame_instant);
                        last_frame_instant = now;

                        let snapshot = input_collector.snapshot_for_frame();
                        for command in snapshot.commands() {
                            debug!(command = command.name(), "input_command");
                        }
                        let wants_screenshot =
                            snapshot.commands().contains(&InputCommand::Screenshot);

                        if scene.update(&snapshot, &xfm) == SceneCommand::Quit {
                            info!(reason = "quit_command", "shutdown_requested");
                            window_target.exit();
                            return;
                        }

                        let drawings = scene.drawings();
                        let hud_lines = scene.debug_enabled().then(|| {
                            scene.hud_lines(&HudContext {
                                metrics: latest_metrics,
                                pointer_px: snapshot.pointer_px(),
                                viewport: renderer.viewport(),
                                xfm: &xfm,
                                last_report: &last_report,
                            })
                        });

                        // Single authoritative FPS cap sleep point for render pacing.
                        let elapsed_since_last_present =
                            Instant::now().saturating_duration_since(last_present_instant);
                        let cap_sleep = compute_cap_sleep(elapsed_since_last_present, frame_target);
                        if cap_sleep > Duration::ZERO {
                            thread::sleep(cap_sleep);
                        }

                        match renderer.render(
                            &drawings,
                            &xfm,
                            scene.debug_enabled(),
                            hud_lines.as_deref(),
                        ) {
                            Ok(report) => last_report = report,
                            Err(error) => {
                                warn!(error = %error, "renderer_draw_failed");
                                window_target.exit();
                            }
                        }
                        last_present_instant = Instant::now();

                        if wants_screenshot {
                            capture_screenshot(&renderer, config.screenshot_dir.as_deref());
                        }

                        metrics_accumulator.record_frame(frame_dt);
                        if let Some(snapshot) = metrics_accumulator.maybe_snapshot(now) {
                            latest_metrics = snapshot;
                            info!(
                                fps = snapshot.fps,
                                frame_time_ms = snapshot.frame_time_ms,
                                frames = snapshot.frames,
                                scene = scene.name(),
                                "loop_metrics"
                            );
                        }
                    }
                    _ => {}
                }
            }
            Event::AboutToWait => {
                window_for_loop.request_redraw();
            }
            Event::LoopExiting => {
                scene.unload();
                info!("shutdown");
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)
}

fn capture_screenshot(renderer: &Renderer, dir: Option<&Path>) {
    let Some(dir) = dir else {
        warn!("screenshot_dir_unset");
        return;
    };
    let path = dir.join(screenshot_file_name(SystemTime::now()));
    match renderer.save_screenshot(&path) {
        Ok(()) => info!(path = %path.display(), "screenshot_saved"),
        Err(error) => warn!(error = %error, "screenshot_failed"),
    }
}

fn screenshot_file_name(now: SystemTime) -> String {
    let millis = now
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or(0);
    format!("screenshot-{millis}.png")
}

/// Turns raw winit events into per-frame [`InputCommand`]s. Keys and buttons
/// fire once per press; holding them does not repeat.
#[derive(Debug, Default)]
struct InputCollector {
    pending: Vec<InputCommand>,
    held_keys: HashSet<KeyCode>,
    ctrl_down: bool,
    pointer_px: Option<Vec2>,
    left_mouse_is_down: bool,
    right_mouse_is_down: bool,
    window_width: u32,
    window_height: u32,
}

impl InputCollector {
    fn new(window_width: u32, window_height: u32) -> Self {
        Self {
            window_width,
            window_height,
            ..Self::default()
        }
    }

    fn set_window_size(&mut self, width: u32, height: u32) {
        self.window_width = width;
        self.window_height = height;
    }

    fn set_ctrl_down(&mut self, ctrl_down: bool) {
        self.ctrl_down = ctrl_down;
    }

    fn handle_keyboard_input(&mut self, key_event: &KeyEvent) {
        if key_event.repeat {
            return;
        }
        self.handle_key_state(key_event.physical_key, key_event.state);
    }

    fn handle_key_state(&mut self, key: PhysicalKey, state: ElementState) {
        let PhysicalKey::Code(code) = key else {
            return;
        };
        match state {
            ElementState::Pressed => {
                if !self.held_keys.insert(code) {
                    return;
                }
                if let Some(command) = command_for_key(code, self.ctrl_down) {
                    self.pending.push(command);
                }
            }
            ElementState::Released => {
                self.held_keys.remove(&code);
            }
        }
    }

    fn handle_pointer_moved(&mut self, x: f32, y: f32) {
        self.pointer_px = Some(Vec2::new(x, y));
        if self.pending.last() != Some(&InputCommand::PointerMoved) {
            self.pending.push(InputCommand::PointerMoved);
        }
    }

    fn clear_pointer(&mut self) {
        self.pointer_px = None;
    }

    fn handle_mouse_input(&mut self, button: MouseButton, state: ElementState) {
        let is_down = match button {
            MouseButton::Left => &mut self.left_mouse_is_down,
            MouseButton::Right => &mut self.right_mouse_is_down,
            _ => return,
        };
        match state {
            ElementState::Pressed => {
                let was_down = std::mem::replace(is_down, true);
                if was_down {
                    return;
                }
                let Some(px) = self.pointer_px else {
                    return;
                };
                self.pending.push(match button {
                    MouseButton::Left => InputCommand::PrimaryClick(px),
                    _ => InputCommand::SecondaryClick(px),
                });
            }
            ElementState::Released => *is_down = false,
        }
    }

    fn snapshot_for_frame(&mut self) -> InputSnapshot {
        InputSnapshot::new(
            std::mem::take(&mut self.pending),
            self.pointer_px,
            self.window_width,
            self.window_height,
        )
    }
}

fn command_for_key(code: KeyCode, ctrl_down: bool) -> Option<InputCommand> {
    let command = match code {
        KeyCode::KeyS if ctrl_down => InputCommand::Save,
        KeyCode::KeyL if ctrl_down => InputCommand::Load,
        KeyCode::KeyW => InputCommand::Move(Direction::Up),
        KeyCode::KeyS => InputCommand::Move(Direction::Down),
        KeyCode::KeyA => InputCommand::Move(Direction::Left),
        KeyCode::KeyD => InputCommand::Move(Direction::Right),
        KeyCode::ArrowUp => InputCommand::Grow,
        KeyCode::ArrowDown => InputCommand::Shrink,
        KeyCode::F2 => InputCommand::ToggleDebug,
        KeyCode::F5 => InputCommand::Save,
        KeyCode::F9 => InputCommand::Load,
        KeyCode::F12 => InputCommand::Screenshot,
        KeyCode::Space => InputCommand::ToggleAtCursor,
        KeyCode::KeyB => InputCommand::CycleBehavior,
        KeyCode::Digit1 | KeyCode::Numpad1 => InputCommand::SelectStyle(1),
        KeyCode::Digit2 | KeyCode::Numpad2 => InputCommand::SelectStyle(2),
        KeyCode::Digit3 | KeyCode::Numpad3 => InputCommand::SelectStyle(3),
        KeyCode::Digit4 | KeyCode::Numpad4 => InputCommand::SelectStyle(4),
        KeyCode::KeyQ | KeyCode::Escape => InputCommand::Quit,
        _ => return None,
    };
    Some(command)
}

fn normalize_pixels_per_world(value: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        PIXELS_PER_WORLD
    }
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}

fn normalize_render_fps_cap(cap: Option<u32>) -> Option<u32> {
    cap.filter(|value| *value > 0)
}

fn target_frame_duration(max_render_fps: Option<u32>) -> Option<Duration> {
    max_render_fps.map(|fps| Duration::from_secs_f64(1.0 / fps as f64))
}

fn compute_cap_sleep(elapsed: Duration, target: Option<Duration>) -> Duration {
    match target {
        Some(frame_target) if elapsed < frame_target => frame_target - elapsed,
        _ => Duration::ZERO,
    }
}

fn format_render_cap(cap: Option<u32>) -> String {
    match cap {
        Some(value) => value.to_string(),
        None => "off".to_string(),
    }
}
