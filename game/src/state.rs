use serde::{Deserialize, Serialize};

use crate::block_core::BlockCore;
use crate::view::GameView;

/// The whole mountable session: which view is up, plus the puzzle core.
///
/// Drag/preview state deliberately lives outside (in the input layer); it is
/// transient and never serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub view: GameView,
    pub block: BlockCore,
}

impl GameState {
    pub fn new(block: BlockCore) -> Self {
        Self {
            view: GameView::default(),
            block,
        }
    }

    pub fn core(&self) -> &BlockCore {
        &self.block
    }

    pub fn core_mut(&mut self) -> &mut BlockCore {
        &mut self.block
    }
}
