//! Zero controller for testing and headless runs
//!
//! Always takes the first available action and declines every optional
//! effect, so a game runs to completion without any interactive chooser.

use crate::core::{CardId, PlayerId};
use crate::game::actions::PlayerAction;
use crate::game::controller::{GameStateView, PlayerController};

/// A controller that always chooses index 0
pub struct ZeroController {
    player_id: PlayerId,
}

impl ZeroController {
    pub fn new(player_id: PlayerId) -> Self {
        ZeroController { player_id }
    }
}

impl PlayerController for ZeroController {
    fn player_id(&self) -> PlayerId {
        self.player_id
    }

    fn choose_action(&mut self, _view: &GameStateView, available_actions: &[PlayerAction]) -> Option<PlayerAction> {
        available_actions
            .iter()
            .find(|a| !matches!(a, PlayerAction::PassTurn))
            .cloned()
    }

    fn choose_optional(&mut self, _view: &GameStateView, _source: CardId, _text: &str) -> bool {
        false
    }

    fn choose_targets(&mut self, _view: &GameStateView, candidates: &[CardId], count: u32, _up_to: bool) -> Vec<CardId> {
        candidates.iter().take(count as usize).copied().collect()
    }

    fn choose_player(&mut self, _view: &GameStateView, candidates: &[PlayerId]) -> Option<PlayerId> {
        candidates.first().copied()
    }
}
