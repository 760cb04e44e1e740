use std::time::{Duration, Instant};

use engine::ui::Rect;

use crate::block_core::{BOARD_SIZE, BlockCore, Shape};

/// Minimum spacing between touch-move recomputations (~60 updates/second).
/// Mouse drags are not throttled; the platform already paces those events.
pub const TOUCH_PREVIEW_MIN_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
}

/// Backend-neutral gesture stream. Both input pathways are translated into
/// these before they reach the controller, so placement logic never sees the
/// modality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureEvent {
    Start {
        piece_id: u8,
        kind: PointerKind,
        pos: (u32, u32),
    },
    Move {
        pos: (u32, u32),
    },
    End {
        pos: (u32, u32),
    },
    Cancel,
}

/// Candidate target under the pointer. `fits` is recomputed on every accepted
/// move so the renderer can tint impossible targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewCell {
    pub row: usize,
    pub col: usize,
    pub fits: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    Ignored,
    Started,
    Moved,
    Dropped {
        piece_id: u8,
        cell: Option<(usize, usize)>,
    },
    Cancelled,
}

#[derive(Debug, Clone, Copy)]
struct ActiveDrag {
    piece_id: u8,
    shape: Shape,
    kind: PointerKind,
    pointer: (u32, u32),
    preview: Option<PreviewCell>,
    last_update_at: Option<Instant>,
}

/// Gesture state machine: `Idle` until a drag starts, `Dragging` until the
/// gesture ends, with exactly one placement attempt reported per lifecycle.
///
/// Every exit path (drop, cancel, replacement start) clears the transient
/// state unconditionally; there is no way to stay in `Dragging` with stale
/// preview data.
#[derive(Debug, Clone, Copy, Default)]
pub struct DragController {
    active: Option<ActiveDrag>,
}

impl DragController {
    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    pub fn dragged_piece(&self) -> Option<u8> {
        self.active.map(|drag| drag.piece_id)
    }

    pub fn dragged_shape(&self) -> Option<Shape> {
        self.active.map(|drag| drag.shape)
    }

    pub fn pointer_kind(&self) -> Option<PointerKind> {
        self.active.map(|drag| drag.kind)
    }

    pub fn pointer(&self) -> Option<(u32, u32)> {
        self.active.map(|drag| drag.pointer)
    }

    pub fn preview(&self) -> Option<PreviewCell> {
        self.active.and_then(|drag| drag.preview)
    }

    pub fn clear(&mut self) {
        self.active = None;
    }

    pub fn handle(
        &mut self,
        event: GestureEvent,
        board_rect: Rect,
        core: &BlockCore,
        now: Instant,
    ) -> DragOutcome {
        match event {
            GestureEvent::Start { piece_id, kind, pos } => {
                // A start while a gesture is live implicitly cancels the old
                // one; the stale gesture gets no placement attempt.
                if !core.is_playing() {
                    self.active = None;
                    return DragOutcome::Ignored;
                }
                let shape = match core.piece(piece_id) {
                    Some(piece) if !piece.consumed => piece.shape,
                    _ => {
                        self.active = None;
                        return DragOutcome::Ignored;
                    }
                };
                self.active = Some(ActiveDrag {
                    piece_id,
                    shape,
                    kind,
                    pointer: pos,
                    preview: preview_at(board_rect, core, shape, pos),
                    last_update_at: Some(now),
                });
                DragOutcome::Started
            }
            GestureEvent::Move { pos } => {
                let Some(drag) = self.active.as_mut() else {
                    return DragOutcome::Ignored;
                };
                if drag.kind == PointerKind::Touch {
                    if let Some(last) = drag.last_update_at {
                        if now.saturating_duration_since(last) < TOUCH_PREVIEW_MIN_INTERVAL {
                            return DragOutcome::Ignored;
                        }
                    }
                }
                drag.pointer = pos;
                drag.last_update_at = Some(now);
                drag.preview = preview_at(board_rect, core, drag.shape, pos);
                DragOutcome::Moved
            }
            GestureEvent::End { pos } => {
                let Some(drag) = self.active.take() else {
                    return DragOutcome::Ignored;
                };
                let cell = board_rect.grid_cell(pos.0, pos.1, BOARD_SIZE, BOARD_SIZE);
                DragOutcome::Dropped {
                    piece_id: drag.piece_id,
                    cell,
                }
            }
            GestureEvent::Cancel => {
                if self.active.take().is_some() {
                    DragOutcome::Cancelled
                } else {
                    DragOutcome::Ignored
                }
            }
        }
    }
}

fn preview_at(
    board_rect: Rect,
    core: &BlockCore,
    shape: Shape,
    pos: (u32, u32),
) -> Option<PreviewCell> {
    let (row, col) = board_rect.grid_cell(pos.0, pos.1, BOARD_SIZE, BOARD_SIZE)?;
    Some(PreviewCell {
        row,
        col,
        fits: core.can_place(shape, row, col),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CELL: u32 = 10;

    fn board_rect() -> Rect {
        Rect::new(100, 100, CELL * BOARD_SIZE as u32, CELL * BOARD_SIZE as u32)
    }

    fn live_core() -> BlockCore {
        let mut core = BlockCore::new(1);
        core.start_game();
        core.set_batch_for_test([Shape::Mono, Shape::DominoH, Shape::Square]);
        core
    }

    fn cell_pos(row: usize, col: usize) -> (u32, u32) {
        (
            100 + col as u32 * CELL + CELL / 2,
            100 + row as u32 * CELL + CELL / 2,
        )
    }

    #[test]
    fn start_is_rejected_for_consumed_pieces() {
        let mut core = live_core();
        core.place(0, 0, 0).expect("mono fits at origin");

        let mut drag = DragController::default();
        let outcome = drag.handle(
            GestureEvent::Start {
                piece_id: 0,
                kind: PointerKind::Mouse,
                pos: (0, 0),
            },
            board_rect(),
            &core,
            Instant::now(),
        );

        assert_eq!(outcome, DragOutcome::Ignored);
        assert!(!drag.is_dragging());
    }

    #[test]
    fn start_is_rejected_outside_a_live_session() {
        let core = BlockCore::new(1);
        let mut drag = DragController::default();
        let outcome = drag.handle(
            GestureEvent::Start {
                piece_id: 0,
                kind: PointerKind::Mouse,
                pos: (0, 0),
            },
            board_rect(),
            &core,
            Instant::now(),
        );
        assert_eq!(outcome, DragOutcome::Ignored);
    }

    #[test]
    fn move_projects_pointer_onto_grid_cells() {
        let core = live_core();
        let mut drag = DragController::default();
        let now = Instant::now();

        drag.handle(
            GestureEvent::Start {
                piece_id: 1,
                kind: PointerKind::Mouse,
                pos: (0, 0),
            },
            board_rect(),
            &core,
            now,
        );
        drag.handle(
            GestureEvent::Move {
                pos: cell_pos(4, 6),
            },
            board_rect(),
            &core,
            now,
        );

        let preview = drag.preview().expect("pointer is over the board");
        assert_eq!((preview.row, preview.col), (4, 6));
        assert!(preview.fits);
    }

    #[test]
    fn pointer_outside_board_yields_no_candidate() {
        let core = live_core();
        let mut drag = DragController::default();
        let now = Instant::now();

        drag.handle(
            GestureEvent::Start {
                piece_id: 0,
                kind: PointerKind::Mouse,
                pos: (0, 0),
            },
            board_rect(),
            &core,
            now,
        );
        drag.handle(GestureEvent::Move { pos: (5, 5) }, board_rect(), &core, now);

        assert!(drag.is_dragging());
        assert_eq!(drag.preview(), None);
    }

    #[test]
    fn blocked_targets_are_reported_as_unfittable() {
        let mut core = live_core();
        core.set_cell(4, 6, 1);

        let mut drag = DragController::default();
        let now = Instant::now();
        drag.handle(
            GestureEvent::Start {
                piece_id: 0,
                kind: PointerKind::Mouse,
                pos: (0, 0),
            },
            board_rect(),
            &core,
            now,
        );
        drag.handle(
            GestureEvent::Move {
                pos: cell_pos(4, 6),
            },
            board_rect(),
            &core,
            now,
        );

        let preview = drag.preview().expect("candidate still reported");
        assert!(!preview.fits);
    }

    #[test]
    fn touch_moves_are_throttled_to_the_update_interval() {
        let core = live_core();
        let mut drag = DragController::default();
        let start = Instant::now();

        drag.handle(
            GestureEvent::Start {
                piece_id: 0,
                kind: PointerKind::Touch,
                pos: (0, 0),
            },
            board_rect(),
            &core,
            start,
        );

        let too_soon = drag.handle(
            GestureEvent::Move {
                pos: cell_pos(1, 1),
            },
            board_rect(),
            &core,
            start + Duration::from_millis(5),
        );
        assert_eq!(too_soon, DragOutcome::Ignored);
        assert_eq!(drag.preview(), None);

        let accepted = drag.handle(
            GestureEvent::Move {
                pos: cell_pos(1, 1),
            },
            board_rect(),
            &core,
            start + Duration::from_millis(20),
        );
        assert_eq!(accepted, DragOutcome::Moved);
        assert_eq!(
            drag.preview().map(|p| (p.row, p.col)),
            Some((1, 1))
        );
    }

    #[test]
    fn mouse_moves_are_not_throttled() {
        let core = live_core();
        let mut drag = DragController::default();
        let start = Instant::now();

        drag.handle(
            GestureEvent::Start {
                piece_id: 0,
                kind: PointerKind::Mouse,
                pos: (0, 0),
            },
            board_rect(),
            &core,
            start,
        );
        let outcome = drag.handle(
            GestureEvent::Move {
                pos: cell_pos(2, 2),
            },
            board_rect(),
            &core,
            start + Duration::from_millis(1),
        );
        assert_eq!(outcome, DragOutcome::Moved);
    }

    #[test]
    fn drop_reports_the_release_cell_and_clears_state() {
        let core = live_core();
        let mut drag = DragController::default();
        let now = Instant::now();

        drag.handle(
            GestureEvent::Start {
                piece_id: 2,
                kind: PointerKind::Mouse,
                pos: (0, 0),
            },
            board_rect(),
            &core,
            now,
        );
        let outcome = drag.handle(
            GestureEvent::End {
                pos: cell_pos(3, 5),
            },
            board_rect(),
            &core,
            now,
        );

        assert_eq!(
            outcome,
            DragOutcome::Dropped {
                piece_id: 2,
                cell: Some((3, 5)),
            }
        );
        assert!(!drag.is_dragging());
        assert_eq!(drag.preview(), None);
        assert_eq!(drag.dragged_piece(), None);
    }

    #[test]
    fn drop_outside_board_reports_no_cell_but_still_cleans_up() {
        let core = live_core();
        let mut drag = DragController::default();
        let now = Instant::now();

        drag.handle(
            GestureEvent::Start {
                piece_id: 0,
                kind: PointerKind::Touch,
                pos: (0, 0),
            },
            board_rect(),
            &core,
            now,
        );
        let outcome = drag.handle(GestureEvent::End { pos: (1, 1) }, board_rect(), &core, now);

        assert_eq!(
            outcome,
            DragOutcome::Dropped {
                piece_id: 0,
                cell: None,
            }
        );
        assert!(!drag.is_dragging());
    }

    #[test]
    fn cancel_clears_all_transient_state() {
        let core = live_core();
        let mut drag = DragController::default();
        let now = Instant::now();

        drag.handle(
            GestureEvent::Start {
                piece_id: 0,
                kind: PointerKind::Touch,
                pos: cell_pos(0, 0),
            },
            board_rect(),
            &core,
            now,
        );
        assert_eq!(
            drag.handle(GestureEvent::Cancel, board_rect(), &core, now),
            DragOutcome::Cancelled
        );
        assert!(!drag.is_dragging());
        assert_eq!(drag.preview(), None);

        // A second cancel is a no-op.
        assert_eq!(
            drag.handle(GestureEvent::Cancel, board_rect(), &core, now),
            DragOutcome::Ignored
        );
    }

    #[test]
    fn new_start_replaces_a_live_drag() {
        let core = live_core();
        let mut drag = DragController::default();
        let now = Instant::now();

        drag.handle(
            GestureEvent::Start {
                piece_id: 0,
                kind: PointerKind::Mouse,
                pos: (0, 0),
            },
            board_rect(),
            &core,
            now,
        );
        let outcome = drag.handle(
            GestureEvent::Start {
                piece_id: 1,
                kind: PointerKind::Touch,
                pos: (0, 0),
            },
            board_rect(),
            &core,
            now,
        );

        assert_eq!(outcome, DragOutcome::Started);
        assert_eq!(drag.dragged_piece(), Some(1));
        assert_eq!(drag.pointer_kind(), Some(PointerKind::Touch));
    }
}
