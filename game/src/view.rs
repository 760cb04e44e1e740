use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameView {
    MainMenu,
    Playing,
    GameOver,
}

impl Default for GameView {
    fn default() -> Self {
        Self::MainMenu
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameViewEvent {
    StartGame,
    GameOver,
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameViewEffect {
    None,
    ResetSession,
}

impl GameView {
    /// Pure transition function for the shell view state machine.
    ///
    /// Side-effects (resetting the puzzle session) are reported via
    /// `GameViewEffect` so callers stay deterministic and easy to test.
    pub fn handle(self, event: GameViewEvent) -> (GameView, GameViewEffect) {
        match (self, event) {
            (GameView::MainMenu, GameViewEvent::StartGame) => {
                (GameView::Playing, GameViewEffect::ResetSession)
            }

            (GameView::Playing, GameViewEvent::GameOver) => {
                (GameView::GameOver, GameViewEffect::None)
            }

            (GameView::GameOver, GameViewEvent::StartGame) => {
                (GameView::Playing, GameViewEffect::ResetSession)
            }
            (GameView::GameOver, GameViewEvent::Back) => (GameView::MainMenu, GameViewEffect::None),

            // Ignore irrelevant events in the current state.
            (state, _) => (state, GameViewEffect::None),
        }
    }

    pub fn is_playing(self) -> bool {
        matches!(self, GameView::Playing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_view_is_main_menu() {
        assert_eq!(GameView::default(), GameView::MainMenu);
    }

    #[test]
    fn start_game_from_main_menu_requests_session_reset() {
        assert_eq!(
            GameView::MainMenu.handle(GameViewEvent::StartGame),
            (GameView::Playing, GameViewEffect::ResetSession)
        );
    }

    #[test]
    fn game_over_event_while_playing_enters_game_over() {
        assert_eq!(
            GameView::Playing.handle(GameViewEvent::GameOver),
            (GameView::GameOver, GameViewEffect::None)
        );
    }

    #[test]
    fn restart_from_game_over_resets_the_session() {
        assert_eq!(
            GameView::GameOver.handle(GameViewEvent::StartGame),
            (GameView::Playing, GameViewEffect::ResetSession)
        );
    }

    #[test]
    fn back_from_game_over_returns_to_main_menu() {
        assert_eq!(
            GameView::GameOver.handle(GameViewEvent::Back),
            (GameView::MainMenu, GameViewEffect::None)
        );
    }

    #[test]
    fn irrelevant_events_are_ignored() {
        assert_eq!(
            GameView::MainMenu.handle(GameViewEvent::GameOver),
            (GameView::MainMenu, GameViewEffect::None)
        );
        assert_eq!(
            GameView::Playing.handle(GameViewEvent::StartGame),
            (GameView::Playing, GameViewEffect::None)
        );
    }
}
