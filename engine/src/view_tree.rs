use serde::{Deserialize, Serialize};

use crate::ui::Rect;

/// Render-agnostic description of the interactive parts of a frame.
///
/// The app builds one of these per frame; the loop hit-tests it against the
/// frame's input to produce actions before the state update runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewTree<A> {
    pub nodes: Vec<ViewNode<A>>,
}

impl<A> ViewTree<A> {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn push(&mut self, node: ViewNode<A>) {
        self.nodes.push(node);
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl<A> Default for ViewTree<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ViewNode<A> {
    Button(ButtonNode<A>),
    Rect(RectNode),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ButtonNode<A> {
    pub id: u32,
    pub rect: Rect,
    pub label: String,
    pub action: A,
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RectNode {
    pub rect: Rect,
}

/// One frame of pointer input, as far as hit-testing is concerned.
///
/// Buttons fire on release, from either the mouse or the tracked touch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiInput {
    pub mouse_pos: Option<(u32, u32)>,
    pub mouse_up: bool,
    pub touch_pos: Option<(u32, u32)>,
    pub touch_up: bool,
}

impl UiInput {
    fn release_pos(&self) -> Option<(u32, u32)> {
        if self.mouse_up {
            if let Some(pos) = self.mouse_pos {
                return Some(pos);
            }
        }
        if self.touch_up {
            return self.touch_pos;
        }
        None
    }
}

pub fn hit_test_actions<A: Clone>(view: &ViewTree<A>, input: UiInput) -> Vec<A> {
    let Some((px, py)) = input.release_pos() else {
        return Vec::new();
    };
    let mut actions = Vec::new();
    for node in view.nodes.iter().rev() {
        if let ViewNode::Button(button) = node {
            if button.enabled && button.rect.contains(px, py) {
                actions.push(button.action.clone());
            }
        }
    }
    actions
}
