//! Player controller trait and game state view
//!
//! The engine never blocks on input. Whenever a decision is needed (which
//! action to take, whether to accept a "may", which cards to target) it calls
//! the `PlayerController` of the deciding player synchronously, handing it a
//! read-only `GameStateView`.

use crate::core::{CardId, PlayerId, Stat};
use crate::game::actions::PlayerAction;
use crate::game::{statics, GameState};
use crate::zones::Zone;
use crate::{LorcanaError, Result};

/// Read-only view of game state for controllers
pub struct GameStateView<'a> {
    game: &'a GameState,
    player_id: PlayerId,
}

impl<'a> GameStateView<'a> {
    pub fn new(game: &'a GameState, player_id: PlayerId) -> Self {
        GameStateView { game, player_id }
    }

    pub fn player_id(&self) -> PlayerId {
        self.player_id
    }

    pub fn game(&self) -> &'a GameState {
        self.game
    }

    pub fn hand(&self) -> &'a [CardId] {
        self.game.zone_cards(self.player_id, Zone::Hand)
    }

    pub fn in_play(&self, player: PlayerId) -> &'a [CardId] {
        self.game.cards_in_play(player)
    }

    pub fn opponents(&self) -> Vec<PlayerId> {
        self.game.opponents(self.player_id)
    }

    pub fn lore(&self, player: PlayerId) -> u32 {
        self.game.get_player(player).map(|p| p.lore).unwrap_or(0)
    }

    pub fn available_ink(&self) -> u32 {
        self.game.available_ink(self.player_id)
    }

    pub fn card_name(&self, card_id: CardId) -> Option<String> {
        self.game.cards.get(card_id).ok().map(|c| c.definition.full_name())
    }

    pub fn damage(&self, card_id: CardId) -> u32 {
        self.game.cards.get(card_id).map(|c| c.damage).unwrap_or(0)
    }

    /// Current stat value including temporary and static bonuses
    pub fn stat(&self, card_id: CardId, stat: Stat) -> i32 {
        statics::effective_stat(self.game, card_id, stat)
    }

    pub fn turn_number(&self) -> u32 {
        self.game.turn.turn_number
    }

    pub fn is_my_turn(&self) -> bool {
        self.game.turn.active_player == self.player_id
    }
}

/// Player controller trait
///
/// Implement this trait to create AI players or connect a UI.
pub trait PlayerController {
    fn player_id(&self) -> PlayerId;

    /// Choose one of the legal actions; `None` passes the turn
    fn choose_action(&mut self, view: &GameStateView, available_actions: &[PlayerAction]) -> Option<PlayerAction>;

    /// Accept or decline an optional ("you may") effect of `source`
    fn choose_optional(&mut self, view: &GameStateView, source: CardId, text: &str) -> bool;

    /// Pick targets from `candidates`: exactly `count` (or all if fewer
    /// exist), or at most `count` when `up_to` is set
    fn choose_targets(&mut self, view: &GameStateView, candidates: &[CardId], count: u32, up_to: bool) -> Vec<CardId>;

    fn choose_player(&mut self, view: &GameStateView, candidates: &[PlayerId]) -> Option<PlayerId>;

    /// Called when the game ends
    fn on_game_end(&mut self, _view: &GameStateView, _won: bool) {}
}

/// The controllers of every player in a game, looked up by player id
pub struct ControllerSet<'c> {
    controllers: Vec<&'c mut dyn PlayerController>,
}

impl<'c> ControllerSet<'c> {
    pub fn new(controllers: Vec<&'c mut dyn PlayerController>) -> Self {
        ControllerSet { controllers }
    }

    pub fn pair(first: &'c mut dyn PlayerController, second: &'c mut dyn PlayerController) -> Self {
        Self::new(vec![first, second])
    }

    pub fn get(&mut self, player: PlayerId) -> Result<&mut (dyn PlayerController + 'c)> {
        self.controllers
            .iter_mut()
            .find(|c| c.player_id() == player)
            .map(|c| &mut **c)
            .ok_or(LorcanaError::EntityNotFound(player.as_u32()))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut (dyn PlayerController + 'c)> {
        self.controllers.iter_mut().map(|c| &mut **c)
    }
}
