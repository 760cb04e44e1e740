use engine::GameLogic;

use crate::block_core::BlockCore;

/// Programmatic command stream for the puzzle: the non-drag input path used
/// by scripted runs and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockAction {
    Noop,
    Place { piece_id: u8, row: usize, col: usize },
    Restart,
}

#[derive(Debug, Clone)]
pub struct BlockLogic {
    seed: u64,
}

impl BlockLogic {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl GameLogic for BlockLogic {
    type State = BlockCore;
    type Input = BlockAction;

    fn initial_state(&self) -> Self::State {
        let mut core = BlockCore::new(self.seed);
        core.start_game();
        core
    }

    fn step(&self, state: &Self::State, input: Self::Input) -> Self::State {
        let mut next = state.clone();
        match input {
            BlockAction::Noop => {}
            BlockAction::Place { piece_id, row, col } => {
                // Invalid placements are silently absorbed; the state simply
                // does not change.
                let _ = next.place(piece_id, row, col);
            }
            BlockAction::Restart => {
                next.start_game();
            }
        }
        next
    }
}
