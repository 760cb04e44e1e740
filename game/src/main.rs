use std::time::{Duration, Instant};

use engine::app::{AppConfig, AppContext, AppFlow, GameApp, InputFrame, run_game};
use engine::surface::SurfaceSize;
use engine::view_tree::ViewTree;
use winit::dpi::PhysicalSize;

use game::block_core::{BlockCore, TrayPiece};
use game::block_ui::{self, UiLayout};
use game::drag::{DragController, DragOutcome, GestureEvent, PointerKind};
use game::settings::{PlayerSettings, SettingsStore};
use game::state::GameState;
use game::view::{GameView, GameViewEffect, GameViewEvent};
use game::view_tree::{GameUiAction, build_view_tree};

struct BlockApp {
    drag: DragController,
    settings: PlayerSettings,
    layout: UiLayout,
    cursor: Option<(u32, u32)>,
}

impl BlockApp {
    fn new(settings: PlayerSettings) -> Self {
        Self {
            drag: DragController::default(),
            settings,
            layout: UiLayout::default(),
            cursor: None,
        }
    }

    fn apply_view_event(&mut self, state: &mut GameState, event: GameViewEvent) {
        let (next, effect) = state.view.handle(event);
        state.view = next;
        if effect == GameViewEffect::ResetSession {
            state.block.start_game();
            self.drag.clear();
        }
    }
}

impl GameApp for BlockApp {
    type State = GameState;
    type Action = GameUiAction;

    fn init_state(&mut self, _ctx: &AppContext) -> GameState {
        GameState::new(BlockCore::new(session_seed()))
    }

    fn build_view(&self, state: &GameState, size: SurfaceSize) -> ViewTree<GameUiAction> {
        build_view_tree(state, size.width, size.height)
    }

    fn update_state(
        &mut self,
        state: &mut GameState,
        input: InputFrame,
        _dt: Duration,
        actions: &[GameUiAction],
        size: SurfaceSize,
    ) -> AppFlow {
        self.cursor = input.mouse_pos;
        self.layout = block_ui::compute_layout(size.width, size.height);

        let mut release_consumed = false;
        if state.view.is_playing() {
            let now = Instant::now();
            for event in gesture_events(&input, &self.layout, state.core(), &self.drag) {
                match self.drag.handle(event, self.layout.board, state.core(), now) {
                    DragOutcome::Dropped { piece_id, cell } => {
                        release_consumed = true;
                        if let Some((row, col)) = cell {
                            // A failed placement is silently absorbed; the
                            // piece stays available for another attempt.
                            let _ = state.core_mut().place(piece_id, row, col);
                        }
                    }
                    DragOutcome::Cancelled => release_consumed = true,
                    _ => {}
                }
            }
            if state.core().is_game_over() {
                self.apply_view_event(state, GameViewEvent::GameOver);
            }
        } else if self.drag.is_dragging() {
            // The view changed under a live gesture; drop the stale state.
            self.drag.clear();
        }

        if !release_consumed {
            for action in actions {
                match action {
                    GameUiAction::StartGame | GameUiAction::Restart => {
                        self.apply_view_event(state, GameViewEvent::StartGame);
                    }
                    GameUiAction::BackToMenu => {
                        self.apply_view_event(state, GameViewEvent::Back);
                    }
                    GameUiAction::Quit => return AppFlow::Exit,
                }
            }
        }

        AppFlow::Continue
    }

    fn render(&mut self, state: &GameState, frame: &mut [u8], size: SurfaceSize) {
        match state.view {
            GameView::MainMenu => {
                block_ui::draw_main_menu(frame, size.width, size.height, self.cursor);
            }
            GameView::Playing => {
                block_ui::draw_session(
                    frame,
                    size.width,
                    size.height,
                    state.core(),
                    &self.drag,
                    self.settings.gameplay.show_placement_preview,
                );
            }
            GameView::GameOver => {
                block_ui::draw_session(
                    frame,
                    size.width,
                    size.height,
                    state.core(),
                    &self.drag,
                    false,
                );
                block_ui::draw_game_over(
                    frame,
                    size.width,
                    size.height,
                    state.core().score(),
                    self.cursor,
                );
            }
        }
    }
}

/// Translates one frame of platform input into backend-neutral gesture
/// events. Drag starts are hit-tested against the tray slots; moves and ends
/// are only produced for the pathway that owns the live gesture.
fn gesture_events(
    input: &InputFrame,
    layout: &UiLayout,
    core: &BlockCore,
    drag: &DragController,
) -> Vec<GestureEvent> {
    let mut events = Vec::new();

    // Mouse pathway.
    if input.mouse_down {
        if let Some(pos) = input.mouse_pos {
            if let Some(piece_id) = piece_slot_at(layout, core, pos) {
                events.push(GestureEvent::Start {
                    piece_id,
                    kind: PointerKind::Mouse,
                    pos,
                });
                if input.mouse_up {
                    events.push(GestureEvent::End { pos });
                }
            }
        }
    } else if drag.pointer_kind() == Some(PointerKind::Mouse) {
        if let Some(pos) = input.mouse_pos {
            if input.mouse_up {
                events.push(GestureEvent::End { pos });
            } else {
                events.push(GestureEvent::Move { pos });
            }
        } else if input.mouse_up {
            events.push(GestureEvent::Cancel);
        }
    }

    // Touch pathway.
    if input.touch_down {
        if let Some(pos) = input.touch_pos {
            if let Some(piece_id) = piece_slot_at(layout, core, pos) {
                events.push(GestureEvent::Start {
                    piece_id,
                    kind: PointerKind::Touch,
                    pos,
                });
                if input.touch_up {
                    events.push(GestureEvent::End { pos });
                }
            }
        }
    } else if drag.pointer_kind() == Some(PointerKind::Touch) {
        if input.touch_cancelled {
            events.push(GestureEvent::Cancel);
        } else if let Some(pos) = input.touch_pos {
            if input.touch_up {
                events.push(GestureEvent::End { pos });
            } else {
                events.push(GestureEvent::Move { pos });
            }
        }
    }

    events
}

fn piece_slot_at(layout: &UiLayout, core: &BlockCore, pos: (u32, u32)) -> Option<u8> {
    layout
        .piece_slots
        .iter()
        .enumerate()
        .find_map(|(idx, slot)| {
            if !slot.contains(pos.0, pos.1) {
                return None;
            }
            match core.batch().get(idx) {
                Some(TrayPiece {
                    id, consumed: false, ..
                }) => Some(*id),
                _ => None,
            }
        })
}

fn session_seed() -> u64 {
    if let Some(seed) = std::env::var("LOVEBLOCKS_SEED")
        .ok()
        .and_then(|v| v.parse().ok())
    {
        return seed;
    }
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = SettingsStore::from_env().load();

    let config = AppConfig {
        title: "Love Blocks".to_string(),
        desired_size: PhysicalSize::new(1280, 720),
        clamp_to_monitor: true,
        vsync: Some(settings.video.vsync),
    };

    run_game(config, BlockApp::new(settings))
}
