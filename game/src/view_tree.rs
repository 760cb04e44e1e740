use engine::view_tree::{ButtonNode, ViewNode, ViewTree};
use serde::{Deserialize, Serialize};

use crate::block_ui::{self, Rect};
use crate::state::GameState;
use crate::view::GameView;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameUiAction {
    StartGame,
    Restart,
    BackToMenu,
    Quit,
}

/// Builds the clickable surface for the current view. Button rects come from
/// the same layout functions the renderer uses, so hit targets always match
/// what is on screen.
pub fn build_view_tree(state: &GameState, width: u32, height: u32) -> ViewTree<GameUiAction> {
    let mut tree = ViewTree::new();
    match state.view {
        GameView::MainMenu => {
            let layout = block_ui::main_menu_layout(width, height);
            push_button(&mut tree, 1, layout.start_button, "START", GameUiAction::StartGame);
            push_button(&mut tree, 2, layout.quit_button, "QUIT", GameUiAction::Quit);
        }
        GameView::Playing => {}
        GameView::GameOver => {
            let layout = block_ui::game_over_layout(width, height);
            push_button(
                &mut tree,
                10,
                layout.restart_button,
                "PLAY AGAIN",
                GameUiAction::Restart,
            );
            push_button(
                &mut tree,
                11,
                layout.menu_button,
                "MAIN MENU",
                GameUiAction::BackToMenu,
            );
            push_button(&mut tree, 12, layout.quit_button, "QUIT", GameUiAction::Quit);
        }
    }
    tree
}

fn push_button(
    tree: &mut ViewTree<GameUiAction>,
    id: u32,
    rect: Rect,
    label: &str,
    action: GameUiAction,
) {
    if rect.w == 0 || rect.h == 0 {
        return;
    }
    tree.push(ViewNode::Button(ButtonNode {
        id,
        rect,
        label: label.to_string(),
        action,
        enabled: true,
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block_core::BlockCore;
    use engine::view_tree::{UiInput, hit_test_actions};

    fn state_in(view: GameView) -> GameState {
        let mut state = GameState::new(BlockCore::new(0));
        state.view = view;
        state
    }

    #[test]
    fn playing_view_has_no_buttons() {
        let tree = build_view_tree(&state_in(GameView::Playing), 1280, 720);
        assert!(tree.is_empty());
    }

    #[test]
    fn main_menu_start_button_fires_start_action() {
        let state = state_in(GameView::MainMenu);
        let tree = build_view_tree(&state, 1280, 720);
        let layout = block_ui::main_menu_layout(1280, 720);

        let release = (
            layout.start_button.x + layout.start_button.w / 2,
            layout.start_button.y + layout.start_button.h / 2,
        );
        let actions = hit_test_actions(
            &tree,
            UiInput {
                mouse_pos: Some(release),
                mouse_up: true,
                ..UiInput::default()
            },
        );
        assert_eq!(actions, vec![GameUiAction::StartGame]);
    }

    #[test]
    fn game_over_restart_button_fires_restart_action() {
        let state = state_in(GameView::GameOver);
        let tree = build_view_tree(&state, 1280, 720);
        let layout = block_ui::game_over_layout(1280, 720);

        let release = (
            layout.restart_button.x + 1,
            layout.restart_button.y + 1,
        );
        let actions = hit_test_actions(
            &tree,
            UiInput {
                touch_pos: Some(release),
                touch_up: true,
                ..UiInput::default()
            },
        );
        assert_eq!(actions, vec![GameUiAction::Restart]);
    }
}
