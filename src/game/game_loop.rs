//! Turn driver
//!
//! Runs turns: the beginning phase, the active player's actions one at a
//! time, and the end of turn. Every action is processed to completion before
//! the next one is requested. After each state change the loop settles: it
//! banishes lethally damaged cards, then resolves the triggers queued as
//! events were recorded, in queue order, until nothing new happens.

use crate::core::{Expiry, PlayerId};
use crate::game::actions::{self, PlayerAction};
use crate::game::controller::{ControllerSet, GameStateView};
use crate::game::resolve::{self, ResolutionContext};
use crate::game::triggers::PendingTrigger;
use crate::game::{GameEvent, GameState, Step};
use crate::{LorcanaError, Result};

/// Triggers resolved in one settle before the cascade is declared runaway
const MAX_CASCADE: usize = 1000;

/// Actions a controller may take in one turn before it is made to pass
const MAX_ACTIONS_PER_TURN: usize = 500;

/// How much of a game is printed
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Default,
    serde::Serialize,
    serde::Deserialize,
)]
pub enum VerbosityLevel {
    /// Nothing
    Silent = 0,
    /// The outcome line only
    Minimal = 1,
    /// Turn headers and controller interventions
    #[default]
    Normal = 2,
    /// Every action, trigger and skipped effect
    Verbose = 3,
}

/// Outcome of `run_game`
#[derive(Debug, Clone)]
pub struct GameResult {
    /// Winner of the game (None if the turn limit was hit)
    pub winner: Option<PlayerId>,
    pub turns_played: u32,
    pub end_reason: GameEndReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEndReason {
    /// A player reached the lore goal
    LoreGoal(PlayerId),
    /// `max_turns` ran out first
    TurnLimit,
}

/// Runs one game, borrowing its state for the duration
pub struct GameLoop<'a> {
    pub game: &'a mut GameState,
    /// Maximum turns before the game is called
    max_turns: u32,
}

impl<'a> GameLoop<'a> {
    pub fn new(game: &'a mut GameState) -> Self {
        // Nothing recorded before the loop takes over fires
        game.pending.clear();
        GameLoop { game, max_turns: 200 }
    }

    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn with_verbosity(mut self, verbosity: VerbosityLevel) -> Self {
        self.game.logger.set_verbosity(verbosity);
        self
    }

    fn player_name(&self, player: PlayerId) -> String {
        self.game
            .get_player(player)
            .map(|p| p.name.to_string())
            .unwrap_or_else(|_| format!("Player {player}"))
    }

    /// Shuffle decks and draw opening hands
    ///
    /// Setup events never fire triggers.
    pub fn setup(&mut self) -> Result<()> {
        let hand_size = self.game.config.starting_hand;
        for player in self.game.player_ids() {
            self.game.shuffle_deck(player);
            for _ in 0..hand_size {
                self.game.draw_card(player)?;
            }
        }
        self.game.pending.clear();
        log_if_verbose!(self.game.logger, "Opening hands of {hand_size} drawn");
        Ok(())
    }

    /// Ready, set and draw steps of the active player, ending in Main
    pub fn begin_turn(&mut self, controllers: &mut ControllerSet<'_>) -> Result<()> {
        let player = self.game.turn.active_player;
        let turn = self.game.turn.turn_number;
        if self.game.logger.verbosity() >= VerbosityLevel::Normal {
            self.game
                .logger
                .normal(&format!("=== Turn {turn}: {} ===", self.player_name(player)));
        }

        // Ready
        self.game.turn.current_step = Step::Ready;
        self.game.expire(Expiry::StartOfTurn(player));
        self.game.ready_step(player)?;

        // Set: start-of-turn triggers
        self.advance_step();
        self.game.record(GameEvent::TurnStarted { player, turn });
        self.settle(controllers)?;

        self.advance_step();
        if !self.game.turn.is_first_turn() {
            self.game.draw_card(player)?;
            self.settle(controllers)?;
        }

        self.advance_step();
        Ok(())
    }

    fn advance_step(&mut self) {
        if self.game.turn.advance_step() {
            let step = self.game.turn.current_step;
            self.game.record(GameEvent::StepChanged { step });
        }
    }

    /// End the active player's turn and begin the next player's
    pub fn pass_turn(&mut self, controllers: &mut ControllerSet<'_>) -> Result<()> {
        let player = self.game.turn.active_player;
        let turn = self.game.turn.turn_number;
        self.game.turn.current_step = Step::Main;
        self.advance_step();
        self.game.record(GameEvent::TurnEnded { player, turn });
        self.settle(controllers)?;
        self.game.expire(Expiry::EndOfTurn);

        let next_idx = self.game.get_next_player_idx(self.game.turn.active_player_idx);
        let next = self.game.players[next_idx].id;
        self.game.turn.next_turn(next, next_idx);
        self.begin_turn(controllers)
    }

    /// Process one action of the active player to completion
    pub fn perform(&mut self, controllers: &mut ControllerSet<'_>, action: &PlayerAction) -> Result<()> {
        let player = self.game.turn.active_player;
        if *action == PlayerAction::PassTurn {
            log_if_verbose!(self.game.logger, "{} passes", self.player_name(player));
            return self.pass_turn(controllers);
        }
        log_if_verbose!(self.game.logger, "{} takes {action:?}", self.player_name(player));

        if let Some(resolution) = actions::apply(self.game, controllers, player, action)? {
            let mut ctx = ResolutionContext::new(resolution.source, resolution.controller, resolution.text);
            resolve::resolve_effects(self.game, controllers, &mut ctx, &resolution.effects)?;
        }
        self.settle(controllers)
    }

    /// Banish lethally damaged cards and resolve triggers until quiescent
    pub fn settle(&mut self, controllers: &mut ControllerSet<'_>) -> Result<()> {
        let mut resolved = 0;
        loop {
            resolve::check_banishment(self.game, controllers)?;
            let mut queue = self.game.pending.take();
            if queue.is_empty() {
                return Ok(());
            }

            while let Some(trigger) = queue.pop() {
                self.resolve_trigger(controllers, trigger)?;
                resolved += 1;
                if resolved > MAX_CASCADE {
                    return Err(LorcanaError::InvalidAction(format!(
                        "Trigger cascade exceeded {MAX_CASCADE} resolutions"
                    )));
                }
            }
        }
    }

    fn resolve_trigger(&mut self, controllers: &mut ControllerSet<'_>, trigger: PendingTrigger) -> Result<()> {
        let Some(ability) = self
            .game
            .card(trigger.source)?
            .abilities
            .get(trigger.ability_index)
            .cloned()
        else {
            return Ok(());
        };
        if ability.trigger.as_ref().is_some_and(|t| t.once_per_turn) {
            let key = (trigger.source, trigger.ability_index);
            if self.game.turn.resolved_once.contains(&key) {
                log_if_verbose!(self.game.logger, "{} already triggered this turn", trigger.ability);
                return Ok(());
            }
            self.game.turn.resolved_once.push(key);
        }
        self.game.record(GameEvent::AbilityTriggered {
            card: trigger.source,
            ability: trigger.ability.clone(),
        });
        #[cfg(feature = "verbose-logging")]
        {
            let name = self.game.card(trigger.source)?.definition.full_name();
            self.game
                .logger
                .trigger(&format!("{name} triggers: {}", ability.source_text));
        }

        let mut ctx = ResolutionContext::new(trigger.source, trigger.controller, ability.source_text.clone())
            .triggered_by(trigger.triggered_by);
        resolve::resolve_effects(self.game, controllers, &mut ctx, &ability.effects)
    }

    /// Let the active player act until they pass or the game is won
    pub fn run_turn(&mut self, controllers: &mut ControllerSet<'_>) -> Result<()> {
        let player = self.game.turn.active_player;
        let mut taken = 0;
        while self.game.winner().is_none() {
            let legal = actions::legal_actions(self.game, player);
            let choice = {
                let view = GameStateView::new(self.game, player);
                controllers.get(player)?.choose_action(&view, &legal)
            };
            taken += 1;
            let action = match choice {
                Some(action) if taken <= MAX_ACTIONS_PER_TURN && legal.contains(&action) => action,
                Some(action) if taken <= MAX_ACTIONS_PER_TURN => {
                    self.game
                        .logger
                        .controller_choice(&format!("Illegal action {action:?} ignored; passing"));
                    PlayerAction::PassTurn
                }
                _ => PlayerAction::PassTurn,
            };
            let passing = action == PlayerAction::PassTurn;
            self.perform(controllers, &action)?;
            if passing {
                break;
            }
        }
        Ok(())
    }

    /// Play a whole game from setup until someone reaches the lore goal or
    /// the turn limit is hit
    pub fn run_game(&mut self, controllers: &mut ControllerSet<'_>) -> Result<GameResult> {
        self.setup()?;
        self.begin_turn(controllers)?;
        loop {
            if let Some(winner) = self.game.winner() {
                return Ok(self.finish(controllers, Some(winner), GameEndReason::LoreGoal(winner)));
            }
            if self.game.turn.turn_number > self.max_turns {
                return Ok(self.finish(controllers, None, GameEndReason::TurnLimit));
            }
            self.run_turn(controllers)?;
        }
    }

    fn finish(&mut self, controllers: &mut ControllerSet<'_>, winner: Option<PlayerId>, end_reason: GameEndReason) -> GameResult {
        let game: &GameState = self.game;
        for controller in controllers.iter_mut() {
            let view = GameStateView::new(game, controller.player_id());
            controller.on_game_end(&view, winner == Some(controller.player_id()));
        }
        let message = match winner {
            Some(player) => format!("{} wins with {} lore", self.player_name(player), self.lore(player)),
            None => format!("Game stopped after {} turns", self.max_turns),
        };
        self.game.logger.minimal(&message);
        GameResult {
            winner,
            turns_played: self.game.turn.turn_number,
            end_reason,
        }
    }

    fn lore(&self, player: PlayerId) -> u32 {
        self.game.get_player(player).map(|p| p.lore).unwrap_or(0)
    }
}
