use engine::render::{
    blend_rect, draw_rect_outline, draw_text, draw_text_scaled, fill_rect, text_width,
};
use engine::ui as ui;

use crate::block_core::{BATCH_SIZE, BOARD_SIZE, BlockCore, Grid, Shape, TrayPiece};
use crate::drag::DragController;

pub type Rect = ui::Rect;

pub const CELL_SIZE: u32 = 48;
pub const TRAY_CELL: u32 = 18;

const SUBGRID: usize = 3;

const PANEL_MARGIN: u32 = 16;
const PANEL_PADDING: u32 = 12;
const SLOT_GAP: u32 = 10;
const TRAY_SLOT: u32 = TRAY_CELL * 3;

pub const MAIN_MENU_TITLE: &str = "LOVE BLOCKS";

const COLOR_BACKGROUND: [u8; 4] = [14, 10, 16, 255];
const COLOR_CELL_EMPTY: [u8; 4] = [26, 19, 30, 255];
const COLOR_CELL_FILLED: [u8; 4] = [232, 93, 136, 255];
const COLOR_BOARD_OUTLINE: [u8; 4] = [64, 44, 60, 255];
const COLOR_SUBGRID_LINE: [u8; 4] = [54, 36, 50, 255];
const COLOR_PREVIEW_OK: [u8; 4] = [246, 173, 198, 255];
const COLOR_PREVIEW_BAD: [u8; 4] = [212, 66, 66, 255];
const PREVIEW_ALPHA: u8 = 150;
const DRAG_PROXY_ALPHA: u8 = 205;

const COLOR_PANEL_BG: [u8; 4] = [21, 15, 25, 255];
const COLOR_PANEL_BORDER: [u8; 4] = [64, 44, 60, 255];
const COLOR_PANEL_BORDER_DISABLED: [u8; 4] = [36, 27, 38, 255];
const COLOR_TEXT: [u8; 4] = [245, 233, 238, 255];
const COLOR_MENU_DIM: [u8; 4] = [0, 0, 0, 255];
const MENU_DIM_ALPHA: u8 = 170;
const BUTTON_HOVER_BRIGHTEN: f32 = 0.12;
const CONSUMED_DIM: f32 = 0.35;
const DRAGGING_DIM: f32 = 0.6;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiLayout {
    pub board: Rect,
    pub tray: Rect,
    pub piece_slots: [Rect; BATCH_SIZE],
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MainMenuLayout {
    pub panel: Rect,
    pub start_button: Rect,
    pub quit_button: Rect,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameOverLayout {
    pub panel: Rect,
    pub restart_button: Rect,
    pub menu_button: Rect,
    pub quit_button: Rect,
}

pub fn compute_layout(width: u32, height: u32) -> UiLayout {
    let board_px = CELL_SIZE.saturating_mul(BOARD_SIZE as u32);
    let board_x = width.saturating_sub(board_px) / 2;
    let board_y = height.saturating_sub(board_px) / 2;

    let board = Rect {
        x: board_x,
        y: board_y,
        w: board_px.min(width),
        h: board_px.min(height),
    };

    let tray_w = (TRAY_SLOT + PANEL_PADDING * 2).min(width);
    let tray_h = (TRAY_SLOT
        .saturating_mul(BATCH_SIZE as u32)
        .saturating_add(SLOT_GAP.saturating_mul(BATCH_SIZE as u32 - 1))
        + PANEL_PADDING * 2)
        .min(height);

    // Prefer the tray on the right of the board; fall back to the left when
    // the window is too narrow on that side.
    let space_right = width.saturating_sub(board_x.saturating_add(board_px));
    let space_left = board_x;
    let mut tray_x = 0;
    if space_right >= tray_w.saturating_add(PANEL_MARGIN) {
        tray_x = board_x.saturating_add(board_px + PANEL_MARGIN);
    } else if space_left >= tray_w.saturating_add(PANEL_MARGIN) {
        tray_x = board_x.saturating_sub(PANEL_MARGIN + tray_w);
    }

    let tray = Rect {
        x: tray_x,
        y: board_y,
        w: tray_w,
        h: tray_h,
    };

    let mut piece_slots = [Rect::default(); BATCH_SIZE];
    for (idx, slot) in piece_slots.iter_mut().enumerate() {
        *slot = Rect {
            x: tray.x.saturating_add(PANEL_PADDING),
            y: tray
                .y
                .saturating_add(PANEL_PADDING)
                .saturating_add((TRAY_SLOT + SLOT_GAP).saturating_mul(idx as u32)),
            w: TRAY_SLOT,
            h: TRAY_SLOT,
        };
    }

    UiLayout {
        board,
        tray,
        piece_slots,
    }
}

/// Draws the whole playing view and returns the layout used, so input code
/// can hit-test against exactly what was shown.
pub fn draw_session(
    frame: &mut [u8],
    width: u32,
    height: u32,
    core: &BlockCore,
    drag: &DragController,
    show_preview: bool,
) -> UiLayout {
    let layout = compute_layout(width, height);

    fill_rect(frame, width, height, 0, 0, width, height, COLOR_BACKGROUND);
    draw_score(frame, width, height, layout.board, core.score());
    draw_board(frame, width, height, layout.board, core.board());
    if show_preview {
        draw_preview(frame, width, height, layout.board, drag);
    }
    draw_tray(frame, width, height, layout, core.batch(), drag.dragged_piece());
    draw_drag_proxy(frame, width, height, drag);

    layout
}

fn draw_score(frame: &mut [u8], width: u32, height: u32, board: Rect, score: u32) {
    let text = format!("SCORE {score}");
    let scale = 3u32;
    let x = board
        .x
        .saturating_add(board.w.saturating_sub(text_width(&text, scale)) / 2);
    let y = board.y.saturating_sub(30);
    draw_text_scaled(frame, width, height, x, y, &text, COLOR_TEXT, scale);
}

fn draw_board(frame: &mut [u8], width: u32, height: u32, board_rect: Rect, board: &Grid) {
    draw_rect_outline(
        frame,
        width,
        height,
        board_rect.x.saturating_sub(1),
        board_rect.y.saturating_sub(1),
        board_rect.w.saturating_add(2),
        board_rect.h.saturating_add(2),
        COLOR_BOARD_OUTLINE,
    );

    for (row, cells) in board.iter().enumerate() {
        for (col, &cell) in cells.iter().enumerate() {
            let px = board_rect.x + col as u32 * CELL_SIZE;
            let py = board_rect.y + row as u32 * CELL_SIZE;
            let color = if cell == 0 {
                COLOR_CELL_EMPTY
            } else {
                COLOR_CELL_FILLED
            };
            // A 1px gap between cells reveals the grid.
            fill_rect(
                frame,
                width,
                height,
                px + 1,
                py + 1,
                CELL_SIZE - 2,
                CELL_SIZE - 2,
                color,
            );
        }
    }

    // Heavier lines every third row/column, like a sudoku board.
    for step in 1..(BOARD_SIZE / SUBGRID) {
        let offset = (step * SUBGRID) as u32 * CELL_SIZE;
        fill_rect(
            frame,
            width,
            height,
            board_rect.x + offset - 1,
            board_rect.y,
            2,
            board_rect.h,
            COLOR_SUBGRID_LINE,
        );
        fill_rect(
            frame,
            width,
            height,
            board_rect.x,
            board_rect.y + offset - 1,
            board_rect.w,
            2,
            COLOR_SUBGRID_LINE,
        );
    }
}

fn draw_preview(frame: &mut [u8], width: u32, height: u32, board_rect: Rect, drag: &DragController) {
    let (Some(preview), Some(shape)) = (drag.preview(), drag.dragged_shape()) else {
        return;
    };

    let color = if preview.fits {
        COLOR_PREVIEW_OK
    } else {
        COLOR_PREVIEW_BAD
    };

    let grid = shape.grid();
    for r in 0..grid.rows() {
        for c in 0..grid.cols() {
            if grid.cell(r, c) != 1 {
                continue;
            }
            let row = preview.row + r;
            let col = preview.col + c;
            if row >= BOARD_SIZE || col >= BOARD_SIZE {
                continue;
            }
            let px = board_rect.x + col as u32 * CELL_SIZE;
            let py = board_rect.y + row as u32 * CELL_SIZE;
            blend_rect(
                frame,
                width,
                height,
                px + 1,
                py + 1,
                CELL_SIZE - 2,
                CELL_SIZE - 2,
                color,
                PREVIEW_ALPHA,
            );
        }
    }
}

fn draw_tray(
    frame: &mut [u8],
    width: u32,
    height: u32,
    layout: UiLayout,
    batch: &[TrayPiece],
    dragged: Option<u8>,
) {
    let tray = layout.tray;
    if tray.w == 0 || tray.h == 0 {
        return;
    }

    fill_rect(frame, width, height, tray.x, tray.y, tray.w, tray.h, COLOR_PANEL_BG);
    draw_rect_outline(frame, width, height, tray.x, tray.y, tray.w, tray.h, COLOR_PANEL_BORDER);

    for piece in batch {
        let Some(slot) = layout.piece_slots.get(piece.id as usize) else {
            continue;
        };
        let border = if piece.consumed {
            COLOR_PANEL_BORDER_DISABLED
        } else {
            COLOR_PANEL_BORDER
        };
        draw_rect_outline(frame, width, height, slot.x, slot.y, slot.w, slot.h, border);

        let mut color = COLOR_CELL_FILLED;
        if piece.consumed {
            color = dim_color(color, CONSUMED_DIM);
        } else if dragged == Some(piece.id) {
            color = dim_color(color, DRAGGING_DIM);
        }
        draw_shape_cells(frame, width, height, *slot, piece.shape, TRAY_CELL, color);
    }
}

fn draw_shape_cells(
    frame: &mut [u8],
    width: u32,
    height: u32,
    slot: Rect,
    shape: Shape,
    cell: u32,
    color: [u8; 4],
) {
    let grid = shape.grid();
    let shape_w = grid.cols() as u32 * cell;
    let shape_h = grid.rows() as u32 * cell;
    let x0 = slot.x.saturating_add(slot.w.saturating_sub(shape_w) / 2);
    let y0 = slot.y.saturating_add(slot.h.saturating_sub(shape_h) / 2);

    for r in 0..grid.rows() {
        for c in 0..grid.cols() {
            if grid.cell(r, c) != 1 {
                continue;
            }
            fill_rect(
                frame,
                width,
                height,
                x0 + c as u32 * cell + 1,
                y0 + r as u32 * cell + 1,
                cell - 2,
                cell - 2,
                color,
            );
        }
    }
}

/// Floating copy of the dragged shape, centered under the pointer. Redrawn
/// from controller state every frame, so it vanishes the moment the gesture
/// ends.
fn draw_drag_proxy(frame: &mut [u8], width: u32, height: u32, drag: &DragController) {
    let (Some(shape), Some((px, py))) = (drag.dragged_shape(), drag.pointer()) else {
        return;
    };

    let grid = shape.grid();
    let shape_w = grid.cols() as u32 * CELL_SIZE;
    let shape_h = grid.rows() as u32 * CELL_SIZE;
    let x0 = px.saturating_sub(shape_w / 2);
    let y0 = py.saturating_sub(shape_h / 2);

    for r in 0..grid.rows() {
        for c in 0..grid.cols() {
            if grid.cell(r, c) != 1 {
                continue;
            }
            blend_rect(
                frame,
                width,
                height,
                x0 + c as u32 * CELL_SIZE + 1,
                y0 + r as u32 * CELL_SIZE + 1,
                CELL_SIZE - 2,
                CELL_SIZE - 2,
                COLOR_CELL_FILLED,
                DRAG_PROXY_ALPHA,
            );
        }
    }
}

pub fn main_menu_layout(width: u32, height: u32) -> MainMenuLayout {
    let margin = 32u32;
    let pad = 18u32;

    let screen = ui::Rect::from_size(width, height);
    let safe = screen.inset(ui::Insets::all(margin));
    if safe.w == 0 || safe.h == 0 {
        return MainMenuLayout::default();
    }

    let panel = safe;
    let content = safe.inset(ui::Insets::all(pad));
    let button_size = ui::Size::new(240, 44).clamp_max(content.size());
    let button_gap = 12u32;

    let title_h = title_scale(safe.w).saturating_mul(5);
    let title_button_gap = 28u32;
    let stack_h = title_h
        .saturating_add(title_button_gap)
        .saturating_add(button_size.h.saturating_mul(2))
        .saturating_add(button_gap);
    let top_y = content
        .y
        .saturating_add(content.h.saturating_sub(stack_h) / 2);

    let buttons_y = top_y
        .saturating_add(title_h)
        .saturating_add(title_button_gap);
    let start_button = Rect {
        x: content
            .x
            .saturating_add(content.w.saturating_sub(button_size.w) / 2),
        y: buttons_y,
        w: button_size.w,
        h: button_size.h,
    };
    let quit_button = Rect {
        x: start_button.x,
        y: start_button
            .y
            .saturating_add(start_button.h)
            .saturating_add(button_gap),
        w: start_button.w,
        h: start_button.h,
    };

    MainMenuLayout {
        panel,
        start_button,
        quit_button,
    }
}

fn title_scale(safe_w: u32) -> u32 {
    let title_chars = MAIN_MENU_TITLE.chars().count() as u32;
    let glyph_cols = 4u32;
    let denom = title_chars.saturating_mul(glyph_cols).max(1);
    (safe_w / denom).clamp(2, 10)
}

pub fn draw_main_menu(
    frame: &mut [u8],
    width: u32,
    height: u32,
    cursor: Option<(u32, u32)>,
) -> MainMenuLayout {
    fill_rect(frame, width, height, 0, 0, width, height, COLOR_BACKGROUND);

    let layout = main_menu_layout(width, height);
    if layout.panel.w == 0 || layout.panel.h == 0 {
        return layout;
    }

    let scale = title_scale(layout.panel.w);
    let title_w = text_width(MAIN_MENU_TITLE, scale);
    let title_x = layout
        .panel
        .x
        .saturating_add(layout.panel.w.saturating_sub(title_w) / 2);
    let title_y = layout
        .start_button
        .y
        .saturating_sub(28 + scale.saturating_mul(5));
    draw_text_scaled(
        frame,
        width,
        height,
        title_x,
        title_y,
        MAIN_MENU_TITLE,
        COLOR_TEXT,
        scale,
    );

    for (rect, label) in [
        (layout.start_button, "START"),
        (layout.quit_button, "QUIT"),
    ] {
        let hovered = cursor.map(|(x, y)| rect.contains(x, y)).unwrap_or(false);
        draw_button(frame, width, height, rect, label, hovered);
    }

    layout
}

pub fn game_over_layout(width: u32, height: u32) -> GameOverLayout {
    let margin = 32u32;
    let pad = 18u32;

    let panel_w = 420u32.min(width.saturating_sub(margin.saturating_mul(2)));
    let panel_h = 280u32.min(height.saturating_sub(margin.saturating_mul(2)));
    if panel_w == 0 || panel_h == 0 {
        return GameOverLayout::default();
    }

    let panel = Rect {
        x: width.saturating_sub(panel_w) / 2,
        y: height.saturating_sub(panel_h) / 2,
        w: panel_w,
        h: panel_h,
    };

    let button_h = 44u32.min(panel.h.saturating_sub(pad.saturating_mul(2)));
    let button_w = 240u32.min(panel.w.saturating_sub(pad.saturating_mul(2)));
    let gap = 12u32;
    let buttons_total_h = button_h
        .saturating_mul(3)
        .saturating_add(gap.saturating_mul(2));
    let top_y = panel
        .y
        .saturating_add(panel.h.saturating_sub(pad.saturating_add(buttons_total_h)));

    let restart_button = Rect {
        x: panel.x.saturating_add(panel.w.saturating_sub(button_w) / 2),
        y: top_y,
        w: button_w,
        h: button_h,
    };
    let menu_button = Rect {
        x: restart_button.x,
        y: restart_button.y.saturating_add(button_h + gap),
        w: button_w,
        h: button_h,
    };
    let quit_button = Rect {
        x: menu_button.x,
        y: menu_button.y.saturating_add(button_h + gap),
        w: button_w,
        h: button_h,
    };

    GameOverLayout {
        panel,
        restart_button,
        menu_button,
        quit_button,
    }
}

pub fn draw_game_over(
    frame: &mut [u8],
    width: u32,
    height: u32,
    score: u32,
    cursor: Option<(u32, u32)>,
) -> GameOverLayout {
    blend_rect(
        frame,
        width,
        height,
        0,
        0,
        width,
        height,
        COLOR_MENU_DIM,
        MENU_DIM_ALPHA,
    );

    let layout = game_over_layout(width, height);
    if layout.panel.w == 0 || layout.panel.h == 0 {
        return layout;
    }
    let panel = layout.panel;
    let pad = 18u32;

    fill_rect(frame, width, height, panel.x, panel.y, panel.w, panel.h, COLOR_PANEL_BG);
    draw_rect_outline(frame, width, height, panel.x, panel.y, panel.w, panel.h, COLOR_PANEL_BORDER);

    draw_text(
        frame,
        width,
        height,
        panel.x.saturating_add(pad),
        panel.y.saturating_add(pad),
        "GAME OVER",
        COLOR_TEXT,
    );
    draw_text(
        frame,
        width,
        height,
        panel.x.saturating_add(pad),
        panel.y.saturating_add(pad + 24),
        "FINAL SCORE",
        COLOR_TEXT,
    );
    draw_text_scaled(
        frame,
        width,
        height,
        panel.x.saturating_add(pad),
        panel.y.saturating_add(pad + 48),
        &score.to_string(),
        COLOR_CELL_FILLED,
        4,
    );

    for (rect, label) in [
        (layout.restart_button, "PLAY AGAIN"),
        (layout.menu_button, "MAIN MENU"),
        (layout.quit_button, "QUIT"),
    ] {
        let hovered = cursor.map(|(x, y)| rect.contains(x, y)).unwrap_or(false);
        draw_button(frame, width, height, rect, label, hovered);
    }

    layout
}

fn dim_color(mut c: [u8; 4], factor: f32) -> [u8; 4] {
    let f = factor.clamp(0.0, 1.0);
    c[0] = ((c[0] as f32) * f) as u8;
    c[1] = ((c[1] as f32) * f) as u8;
    c[2] = ((c[2] as f32) * f) as u8;
    c
}

fn brighten_color(mut c: [u8; 4], amount: f32) -> [u8; 4] {
    let t = amount.clamp(0.0, 1.0);
    for i in 0..3 {
        let v = c[i] as f32;
        c[i] = (v + (255.0 - v) * t).round().clamp(0.0, 255.0) as u8;
    }
    c
}

fn button_colors(hovered: bool) -> ([u8; 4], [u8; 4]) {
    if hovered {
        (
            brighten_color(COLOR_PANEL_BG, BUTTON_HOVER_BRIGHTEN),
            brighten_color(COLOR_PANEL_BORDER, BUTTON_HOVER_BRIGHTEN),
        )
    } else {
        (COLOR_PANEL_BG, COLOR_PANEL_BORDER)
    }
}

fn draw_button(frame: &mut [u8], width: u32, height: u32, rect: Rect, label: &str, hovered: bool) {
    let (fill, border) = button_colors(hovered);
    fill_rect(frame, width, height, rect.x, rect.y, rect.w, rect.h, fill);
    draw_rect_outline(frame, width, height, rect.x, rect.y, rect.w, rect.h, border);
    draw_text(
        frame,
        width,
        height,
        rect.x.saturating_add(16),
        rect.y.saturating_add(rect.h / 2).saturating_sub(6),
        label,
        COLOR_TEXT,
    );
}

/// Background / empty-cell colors, exposed for pixel-sampling tests.
pub fn background_color() -> [u8; 4] {
    COLOR_BACKGROUND
}

pub fn filled_cell_color() -> [u8; 4] {
    COLOR_CELL_FILLED
}

pub fn empty_cell_color() -> [u8; 4] {
    COLOR_CELL_EMPTY
}
