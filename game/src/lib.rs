pub mod block_core;
pub mod block_ui;
pub mod drag;
pub mod playtest;
pub mod settings;
pub mod state;
pub mod view;
pub mod view_tree;
