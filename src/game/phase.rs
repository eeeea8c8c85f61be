//! Lorcana turn structure: Beginning (ready, set, draw), Main, End

use crate::core::{CardId, PlayerId};
use serde::{Deserialize, Serialize};

/// Coarse grouping of steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Beginning,
    Main,
    /// Entered from Main for the duration of one challenge
    Challenge,
    End,
}

/// Steps in turn order; `Challenge` is a detour out of Main
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Step {
    Ready,
    Set,
    Draw,

    Main,

    Challenge,

    End,
}

impl Step {
    pub fn phase(&self) -> Phase {
        match self {
            Step::Ready | Step::Set | Step::Draw => Phase::Beginning,
            Step::Main => Phase::Main,
            Step::Challenge => Phase::Challenge,
            Step::End => Phase::End,
        }
    }

    /// Next step in turn order; a challenge returns to Main
    pub fn next(&self) -> Option<Step> {
        match self {
            Step::Ready => Some(Step::Set),
            Step::Set => Some(Step::Draw),
            Step::Draw => Some(Step::Main),
            Step::Main => Some(Step::End),
            Step::Challenge => Some(Step::Main),
            Step::End => None,
        }
    }

    /// Can the active player take turn actions in this step?
    pub fn accepts_actions(&self) -> bool {
        matches!(self, Step::Main)
    }
}

/// Whose turn it is and where in the turn we are
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnStructure {
    /// 1-based, counting both players' turns
    pub turn_number: u32,

    pub current_step: Step,

    pub active_player: PlayerId,

    /// Active player's index in `GameState::players`
    pub active_player_idx: usize,

    /// Player who took the first turn; skips that turn's draw
    pub starting_player: PlayerId,

    /// Once-per-turn triggers already resolved this turn, by source card and ability index
    #[serde(default)]
    pub resolved_once: Vec<(CardId, usize)>,
}

impl TurnStructure {
    pub fn new(starting_player: PlayerId, starting_idx: usize) -> Self {
        TurnStructure {
            turn_number: 1,
            current_step: Step::Ready,
            active_player: starting_player,
            active_player_idx: starting_idx,
            starting_player,
            resolved_once: Vec::new(),
        }
    }

    pub fn current_phase(&self) -> Phase {
        self.current_step.phase()
    }

    /// Advance to the next step; false at the end of the turn
    pub fn advance_step(&mut self) -> bool {
        match self.current_step.next() {
            Some(step) => {
                self.current_step = step;
                true
            }
            None => false,
        }
    }

    pub fn next_turn(&mut self, next_player: PlayerId, next_idx: usize) {
        self.turn_number += 1;
        self.current_step = Step::Ready;
        self.active_player = next_player;
        self.active_player_idx = next_idx;
        self.resolved_once.clear();
    }

    /// First turn of the game, where the starting player skips drawing
    pub fn is_first_turn(&self) -> bool {
        self.turn_number == 1 && self.active_player == self.starting_player
    }
}
