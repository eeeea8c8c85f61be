//! Scripted player controller for tests
//!
//! Follows a predetermined list of actions and answers. When a script runs
//! out it passes, declines, and targets the first candidates.

use crate::core::{CardId, PlayerId};
use crate::game::actions::PlayerAction;
use crate::game::controller::{GameStateView, PlayerController};
use std::collections::VecDeque;

pub struct ScriptedController {
    player_id: PlayerId,
    actions: VecDeque<PlayerAction>,
    answers: VecDeque<bool>,
    targets: VecDeque<Vec<CardId>>,
}

impl ScriptedController {
    pub fn new(player_id: PlayerId, actions: Vec<PlayerAction>) -> Self {
        ScriptedController {
            player_id,
            actions: actions.into(),
            answers: VecDeque::new(),
            targets: VecDeque::new(),
        }
    }

    /// Answers to "you may" prompts, in order
    pub fn with_answers(mut self, answers: Vec<bool>) -> Self {
        self.answers = answers.into();
        self
    }

    /// Target picks, one list per targeting prompt
    pub fn with_targets(mut self, targets: Vec<Vec<CardId>>) -> Self {
        self.targets = targets.into();
        self
    }

    pub fn remaining_actions(&self) -> usize {
        self.actions.len()
    }
}

impl PlayerController for ScriptedController {
    fn player_id(&self) -> PlayerId {
        self.player_id
    }

    fn choose_action(&mut self, _view: &GameStateView, _available_actions: &[PlayerAction]) -> Option<PlayerAction> {
        self.actions.pop_front()
    }

    fn choose_optional(&mut self, _view: &GameStateView, _source: CardId, _text: &str) -> bool {
        self.answers.pop_front().unwrap_or(false)
    }

    fn choose_targets(&mut self, _view: &GameStateView, candidates: &[CardId], count: u32, _up_to: bool) -> Vec<CardId> {
        match self.targets.pop_front() {
            Some(picks) => picks,
            None => candidates.iter().take(count as usize).copied().collect(),
        }
    }

    fn choose_player(&mut self, _view: &GameStateView, candidates: &[PlayerId]) -> Option<PlayerId> {
        candidates.first().copied()
    }
}
