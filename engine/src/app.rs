use std::error::Error;
use std::time::{Duration, Instant};

use pixels::{Pixels, PixelsBuilder, SurfaceTexture};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, MouseButton, TouchPhase, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Window, WindowBuilder};

use crate::surface::SurfaceSize;
use crate::view_tree::{hit_test_actions, UiInput, ViewTree};

pub struct AppConfig {
    pub title: String,
    pub desired_size: PhysicalSize<u32>,
    pub clamp_to_monitor: bool,
    pub vsync: Option<bool>,
}

pub struct AppContext {
    pub window: Window,
    pub surface_size: SurfaceSize,
}

/// Pointer input accumulated since the previous frame.
///
/// `*_down` / `*_up` are edges: set when the press/release happened during
/// this frame, cleared after the frame's update ran. Only one touch is
/// tracked at a time; further fingers are ignored until the first lifts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputFrame {
    pub mouse_pos: Option<(u32, u32)>,
    pub mouse_down: bool,
    pub mouse_up: bool,
    pub touch_pos: Option<(u32, u32)>,
    pub touch_down: bool,
    pub touch_up: bool,
    pub touch_cancelled: bool,
}

impl InputFrame {
    pub fn ui_input(&self) -> UiInput {
        UiInput {
            mouse_pos: self.mouse_pos,
            mouse_up: self.mouse_up,
            touch_pos: self.touch_pos,
            touch_up: self.touch_up,
        }
    }

    fn clear_edges(&mut self) {
        self.mouse_down = false;
        self.mouse_up = false;
        if self.touch_up || self.touch_cancelled {
            self.touch_pos = None;
        }
        self.touch_down = false;
        self.touch_up = false;
        self.touch_cancelled = false;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppFlow {
    Continue,
    Exit,
}

pub trait GameApp {
    type State;
    type Action: Clone;

    fn init_state(&mut self, ctx: &AppContext) -> Self::State;

    fn build_view(&self, state: &Self::State, size: SurfaceSize) -> ViewTree<Self::Action>;

    fn update_state(
        &mut self,
        state: &mut Self::State,
        input: InputFrame,
        dt: Duration,
        actions: &[Self::Action],
        size: SurfaceSize,
    ) -> AppFlow;

    fn render(&mut self, state: &Self::State, frame: &mut [u8], size: SurfaceSize);
}

pub fn run_game<G: GameApp + 'static>(config: AppConfig, mut game: G) -> Result<(), Box<dyn Error>> {
    let event_loop = EventLoop::new();
    let monitor_size = if config.clamp_to_monitor {
        event_loop.primary_monitor().map(|m| m.size())
    } else {
        None
    };
    let initial_size = if let Some(monitor) = monitor_size {
        PhysicalSize::new(
            config.desired_size.width.min(monitor.width),
            config.desired_size.height.min(monitor.height),
        )
    } else {
        config.desired_size
    };
    let window = WindowBuilder::new()
        .with_title(config.title)
        .with_inner_size(initial_size)
        .build(&event_loop)?;

    let window_size = window.inner_size();
    let surface_size = SurfaceSize::new(window_size.width, window_size.height);

    let surface_texture = SurfaceTexture::new(surface_size.width, surface_size.height, &window);
    let mut pixels_builder =
        PixelsBuilder::new(surface_size.width, surface_size.height, surface_texture);
    if let Some(vsync) = config.vsync {
        pixels_builder = pixels_builder.enable_vsync(vsync);
    }
    let mut pixels: Pixels = pixels_builder.build()?;

    let mut ctx = AppContext {
        window,
        surface_size,
    };
    let mut state = game.init_state(&ctx);
    let mut input = InputFrame::default();
    let mut active_touch: Option<u64> = None;
    let mut last_frame = Instant::now();

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;

        match &event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    *control_flow = ControlFlow::Exit;
                }
                WindowEvent::Resized(size) => {
                    ctx.surface_size = SurfaceSize::new(size.width, size.height);
                    if let Err(err) = pixels.resize_surface(size.width, size.height) {
                        eprintln!("resize surface failed: {err}");
                    }
                    if let Err(err) = pixels.resize_buffer(size.width, size.height) {
                        eprintln!("resize buffer failed: {err}");
                    }
                    ctx.window.request_redraw();
                }
                WindowEvent::CursorMoved { position, .. } => {
                    let new_x = position.x.max(0.0) as u32;
                    let new_y = position.y.max(0.0) as u32;
                    input.mouse_pos = Some((new_x, new_y));
                }
                WindowEvent::MouseInput {
                    state: mouse_state,
                    button,
                    ..
                } => {
                    if *button == MouseButton::Left {
                        match mouse_state {
                            ElementState::Pressed => input.mouse_down = true,
                            ElementState::Released => input.mouse_up = true,
                        }
                    }
                }
                WindowEvent::Touch(touch) => {
                    let pos = (
                        touch.location.x.max(0.0) as u32,
                        touch.location.y.max(0.0) as u32,
                    );
                    match touch.phase {
                        TouchPhase::Started => {
                            if active_touch.is_none() {
                                active_touch = Some(touch.id);
                                input.touch_pos = Some(pos);
                                input.touch_down = true;
                            }
                        }
                        TouchPhase::Moved => {
                            if active_touch == Some(touch.id) {
                                input.touch_pos = Some(pos);
                            }
                        }
                        TouchPhase::Ended => {
                            if active_touch == Some(touch.id) {
                                active_touch = None;
                                input.touch_pos = Some(pos);
                                input.touch_up = true;
                            }
                        }
                        TouchPhase::Cancelled => {
                            if active_touch == Some(touch.id) {
                                active_touch = None;
                                input.touch_cancelled = true;
                            }
                        }
                    }
                }
                _ => {}
            },
            Event::RedrawRequested(_) => {
                let now = Instant::now();
                let dt = now.saturating_duration_since(last_frame);
                last_frame = now;

                let view = game.build_view(&state, ctx.surface_size);
                let actions = hit_test_actions(&view, input.ui_input());
                let flow = game.update_state(&mut state, input, dt, &actions, ctx.surface_size);
                input.clear_edges();

                if flow == AppFlow::Exit {
                    *control_flow = ControlFlow::Exit;
                    return;
                }

                game.render(&state, pixels.frame_mut(), ctx.surface_size);
                if let Err(err) = pixels.render() {
                    eprintln!("present failed: {err}");
                }
            }
            Event::MainEventsCleared => {
                ctx.window.request_redraw();
            }
            _ => {}
        }
    });

    #[allow(unreachable_code)]
    Ok(())
}
