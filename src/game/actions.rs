//! Player actions
//!
//! The closed command set a controller may request during its main phase:
//! play a card, ink a card, quest, challenge, activate an ability, pass.
//! `legal_actions` enumerates what the rules allow right now and `apply`
//! performs one action's immediate state change, returning any effects that
//! resolve as part of it (an action card or an activated ability).

use crate::core::{
    AbilityId, AbilityKind, CardId, CardType, Cost, Effect, Keyword, PlayerId, RestrictedAction, Stat,
    SubstitutionMode,
};
use crate::game::controller::{ControllerSet, GameStateView};
use crate::game::{resolve, statics, GameEvent, GameState, Step};
use crate::zones::Zone;
use crate::{LorcanaError, Result};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// How a card from hand is paid for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayMode {
    /// Pay its ink cost
    Normal,
    /// Pay the Shift cost and put it on top of a same-named character
    Shift { onto: CardId },
    /// Exert characters to sing a song for free
    Sing { singers: SmallVec<[CardId; 2]> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerAction {
    PlayCard { card: CardId, mode: PlayMode },
    InkCard(CardId),
    Quest(CardId),
    Challenge { attacker: CardId, defender: CardId },
    ActivateAbility { card: CardId, ability: AbilityId },
    PassTurn,
}

/// Effects an action resolves immediately
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub source: CardId,
    pub controller: PlayerId,
    pub effects: Vec<Effect>,
    pub text: String,
}

fn is_passive(effect: &Effect) -> bool {
    matches!(
        effect,
        Effect::Keyword { .. }
            | Effect::DamageReduction { .. }
            | Effect::AlternateCost { .. }
            | Effect::CostSubstitution { .. }
    )
}

/// Ready, dry character of `player` in play
fn can_act(state: &GameState, player: PlayerId, card_id: CardId) -> bool {
    state.cards.get(card_id).is_ok_and(|c| {
        c.owner == player && c.is_character() && !c.exerted && state.zone_of(card_id) == Some(Zone::Play)
    })
}

fn is_dry(state: &GameState, card_id: CardId) -> bool {
    state.cards.get(card_id).is_ok_and(|c| c.dry)
}

fn can_quest(state: &GameState, player: PlayerId, card: CardId) -> bool {
    can_act(state, player, card)
        && is_dry(state, card)
        && !statics::has_keyword(state, card, Keyword::Reckless)
        && !statics::is_restricted(state, card, RestrictedAction::Quest)
}

fn can_attack(state: &GameState, player: PlayerId, card: CardId) -> bool {
    can_act(state, player, card)
        && (is_dry(state, card) || statics::has_keyword(state, card, Keyword::Rush))
        && !statics::is_restricted(state, card, RestrictedAction::Challenge)
}

/// Legal defenders for an attacker, after Evasive and Bodyguard
fn defenders(state: &GameState, player: PlayerId, attacker: CardId) -> Vec<CardId> {
    let attacker_evasive = statics::has_keyword(state, attacker, Keyword::Evasive);
    let mut legal: Vec<CardId> = state
        .opponents(player)
        .into_iter()
        .flat_map(|o| state.cards_in_play(o).iter().copied())
        .filter(|&d| {
            state.cards.get(d).is_ok_and(|c| match c.card_type() {
                CardType::Character => c.exerted,
                CardType::Location => true,
                _ => false,
            })
        })
        .filter(|&d| !statics::is_restricted(state, d, RestrictedAction::BeChallenged))
        .filter(|&d| attacker_evasive || !statics::has_keyword(state, d, Keyword::Evasive))
        .collect();
    let guards: Vec<CardId> = legal
        .iter()
        .copied()
        .filter(|&d| statics::has_keyword(state, d, Keyword::Bodyguard))
        .collect();
    if !guards.is_empty() {
        legal = guards;
    }
    legal
}

fn shift_cost(state: &GameState, card: CardId) -> Option<u32> {
    let card = state.cards.get(card).ok()?;
    card.abilities.iter().flat_map(|a| a.effects.iter()).find_map(|e| match e {
        Effect::AlternateCost { cost } => Some(*cost),
        _ => None,
    })
}

fn shift_targets(state: &GameState, player: PlayerId, card_id: CardId) -> Vec<CardId> {
    let Ok(card) = state.cards.get(card_id) else {
        return Vec::new();
    };
    let key = card.definition.name.key();
    state
        .cards_in_play(player)
        .iter()
        .copied()
        .filter(|&other| {
            state
                .cards
                .get(other)
                .is_ok_and(|c| c.is_character() && c.definition.name.key() == key)
        })
        .collect()
}

fn sing_together_value(state: &GameState, card: CardId) -> Option<u32> {
    let card = state.cards.get(card).ok()?;
    card.abilities.iter().flat_map(|a| a.effects.iter()).find_map(|e| match e {
        Effect::CostSubstitution {
            value,
            mode: SubstitutionMode::SingTogether,
        } => Some(*value),
        _ => None,
    })
}

fn costs_payable(state: &GameState, player: PlayerId, card_id: CardId, costs: &[Cost]) -> bool {
    let Ok(card) = state.cards.get(card_id) else {
        return false;
    };
    let ink: u32 = costs.iter().map(Cost::ink).sum();
    if ink > state.available_ink(player) {
        return false;
    }
    costs.iter().all(|cost| match cost {
        Cost::ExertSelf => !card.exerted && (!card.is_character() || card.dry),
        Cost::PayInk(_) | Cost::BanishSelf => true,
        Cost::Discard(n) => state.zone_cards(player, Zone::Hand).len() >= *n as usize,
        Cost::Opaque(_) => false,
    })
}

/// Every action `player` may take right now; empty outside their main phase
pub fn legal_actions(state: &GameState, player: PlayerId) -> Vec<PlayerAction> {
    if state.turn.active_player != player || !state.turn.current_step.accepts_actions() || state.winner().is_some() {
        return Vec::new();
    }
    let mut actions = Vec::new();
    let Ok(me) = state.get_player(player) else {
        return actions;
    };
    let ink = state.available_ink(player);
    let hand = state.zone_cards(player, Zone::Hand);
    let in_play = state.cards_in_play(player);

    if me.can_ink() {
        for &card in hand {
            if state.cards.get(card).is_ok_and(|c| c.definition.inkable) {
                actions.push(PlayerAction::InkCard(card));
            }
        }
    }

    for &card in hand {
        if statics::cost_to_play(state, player, card) <= ink {
            actions.push(PlayerAction::PlayCard {
                card,
                mode: PlayMode::Normal,
            });
        }
        if let Some(cost) = shift_cost(state, card) {
            if cost <= ink {
                for onto in shift_targets(state, player, card) {
                    actions.push(PlayerAction::PlayCard {
                        card,
                        mode: PlayMode::Shift { onto },
                    });
                }
            }
        }
        let Ok(def) = state.cards.get(card).map(|c| c.definition.clone()) else {
            continue;
        };
        if def.is_song() {
            let singers: Vec<CardId> = in_play
                .iter()
                .copied()
                .filter(|&s| can_act(state, player, s) && is_dry(state, s))
                .filter(|&s| !statics::is_restricted(state, s, RestrictedAction::Sing))
                .collect();
            for &singer in &singers {
                if statics::singing_value(state, singer) >= u32::from(def.cost) {
                    actions.push(PlayerAction::PlayCard {
                        card,
                        mode: PlayMode::Sing {
                            singers: SmallVec::from_slice(&[singer]),
                        },
                    });
                }
            }
            if let Some(needed) = sing_together_value(state, card) {
                let mut total = 0;
                let mut group: SmallVec<[CardId; 2]> = SmallVec::new();
                for &singer in &singers {
                    if total >= needed {
                        break;
                    }
                    total += statics::singing_value(state, singer);
                    group.push(singer);
                }
                if total >= needed && group.len() > 1 {
                    actions.push(PlayerAction::PlayCard {
                        card,
                        mode: PlayMode::Sing { singers: group },
                    });
                }
            }
        }
    }

    for &card in in_play {
        if can_quest(state, player, card) {
            actions.push(PlayerAction::Quest(card));
        }
    }

    for &attacker in in_play {
        if can_attack(state, player, attacker) {
            for defender in defenders(state, player, attacker) {
                actions.push(PlayerAction::Challenge { attacker, defender });
            }
        }
    }

    for &card in in_play {
        let Ok(c) = state.cards.get(card) else {
            continue;
        };
        for ability in c.abilities.iter().filter(|a| a.kind == AbilityKind::Activated) {
            if ability.effects.iter().all(is_passive) {
                continue;
            }
            if costs_payable(state, player, card, &ability.costs) {
                actions.push(PlayerAction::ActivateAbility {
                    card,
                    ability: ability.id.clone(),
                });
            }
        }
    }

    actions.push(PlayerAction::PassTurn);
    actions
}

/// Perform one non-pass action after checking it is legal
pub fn apply(
    state: &mut GameState,
    controllers: &mut ControllerSet<'_>,
    player: PlayerId,
    action: &PlayerAction,
) -> Result<Option<Resolution>> {
    if !legal_actions(state, player).contains(action) {
        return Err(LorcanaError::InvalidAction(format!("{action:?} is not legal for player {player}")));
    }
    match action {
        PlayerAction::PassTurn => Ok(None),
        PlayerAction::InkCard(card) => {
            state.move_card(*card, Zone::Hand, Zone::Inkwell)?;
            state.get_player_mut(player)?.ink_card();
            state.record(GameEvent::CardInked { player, card: *card });
            Ok(None)
        }
        PlayerAction::PlayCard { card, mode } => play_card(state, player, *card, mode),
        PlayerAction::Quest(card) => {
            state.exert_card(*card)?;
            let lore = statics::effective_stat(state, *card, Stat::Lore).max(0) as u32;
            state.record(GameEvent::Quested {
                card: *card,
                player,
                lore,
            });
            state.gain_lore(player, lore)?;
            Ok(None)
        }
        PlayerAction::Challenge { attacker, defender } => {
            challenge(state, controllers, *attacker, *defender)?;
            Ok(None)
        }
        PlayerAction::ActivateAbility { card, ability } => activate(state, controllers, player, *card, ability),
    }
}

fn play_card(state: &mut GameState, player: PlayerId, card: CardId, mode: &PlayMode) -> Result<Option<Resolution>> {
    let def = state.card(card)?.definition.clone();
    match mode {
        PlayMode::Normal => {
            let cost = statics::cost_to_play(state, player, card);
            state.pay_ink(player, cost)?;
            state.get_player_mut(player)?.consume_discounts(&def);
        }
        PlayMode::Shift { .. } => {
            let cost = shift_cost(state, card).unwrap_or(0);
            state.pay_ink(player, cost)?;
        }
        PlayMode::Sing { singers } => {
            for &singer in singers {
                state.exert_card(singer)?;
            }
        }
    }

    if def.card_type == CardType::Action {
        state.move_card(card, Zone::Hand, Zone::Discard)?;
        state.record(GameEvent::CardPlayed {
            player,
            card,
            shifted: false,
            sung: matches!(mode, PlayMode::Sing { .. }),
        });
        let abilities = state.card(card)?.abilities.clone();
        let effects: Vec<Effect> = abilities
            .iter()
            .filter(|a| a.kind == AbilityKind::Static)
            .flat_map(|a| a.effects.iter())
            .filter(|e| !is_passive(e))
            .cloned()
            .collect();
        let text = abilities
            .iter()
            .map(|a| a.source_text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        return Ok(Some(Resolution {
            source: card,
            controller: player,
            effects,
            text,
        }));
    }

    state.move_card(card, Zone::Hand, Zone::Play)?;
    if let PlayMode::Shift { onto } = mode {
        let base = state.card(*onto)?;
        let (damage, exerted, dry) = (base.damage, base.exerted, base.dry);
        state.move_card(*onto, Zone::Play, Zone::Discard)?;
        let shifted = state.card_mut(card)?;
        shifted.damage = damage;
        shifted.exerted = exerted;
        shifted.dry = dry;
        shifted.shifted_onto = Some(*onto);
    }
    state.record(GameEvent::CardPlayed {
        player,
        card,
        shifted: matches!(mode, PlayMode::Shift { .. }),
        sung: false,
    });
    Ok(None)
}

fn challenge(
    state: &mut GameState,
    controllers: &mut ControllerSet<'_>,
    attacker: CardId,
    defender: CardId,
) -> Result<()> {
    state.turn.current_step = Step::Challenge;
    state.exert_card(attacker)?;
    state.record(GameEvent::Challenged { attacker, defender });

    // Damage is computed up front and dealt simultaneously
    let attack = statics::effective_stat(state, attacker, Stat::Strength) as u32
        + statics::keyword_value(state, attacker, Keyword::Challenger);
    let riposte = if state.card(defender)?.is_character() {
        statics::effective_stat(state, defender, Stat::Strength) as u32
    } else {
        0
    };
    state.deal_damage(defender, attack, Some(attacker))?;
    state.deal_damage(attacker, riposte, Some(defender))?;

    let lethal = state.lethally_damaged();
    for (victim, by) in [(defender, attacker), (attacker, defender)] {
        if lethal.contains(&victim) && state.zone_of(victim) == Some(Zone::Play) {
            resolve::banish_card(state, controllers, victim, Some(by))?;
        }
    }
    state.turn.current_step = Step::Main;
    Ok(())
}

/// Cards to discard for a cost; a short answer is topped up from the hand
fn choose_discards(
    state: &GameState,
    controllers: &mut ControllerSet<'_>,
    player: PlayerId,
    count: u32,
    already: &[CardId],
) -> Result<Vec<CardId>> {
    let hand: Vec<CardId> = state
        .zone_cards(player, Zone::Hand)
        .iter()
        .copied()
        .filter(|c| !already.contains(c))
        .collect();
    let needed = count as usize;
    if hand.len() < needed {
        return Err(LorcanaError::InvalidAction(format!("Discard cost of {count} not payable")));
    }
    let answer = {
        let view = GameStateView::new(state, player);
        controllers.get(player)?.choose_targets(&view, &hand, count, false)
    };
    let mut picks: Vec<CardId> = Vec::with_capacity(needed);
    for c in answer {
        if hand.contains(&c) && !picks.contains(&c) && picks.len() < needed {
            picks.push(c);
        }
    }
    if picks.len() < needed {
        state
            .logger
            .controller_choice(&format!("Discard pick short by {}; topping up from hand", needed - picks.len()));
        for &c in &hand {
            if picks.len() >= needed {
                break;
            }
            if !picks.contains(&c) {
                picks.push(c);
            }
        }
    }
    Ok(picks)
}

fn activate(
    state: &mut GameState,
    controllers: &mut ControllerSet<'_>,
    player: PlayerId,
    card: CardId,
    ability_id: &AbilityId,
) -> Result<Option<Resolution>> {
    let abilities = state.card(card)?.abilities.clone();
    let ability = abilities
        .iter()
        .find(|a| &a.id == ability_id)
        .ok_or_else(|| LorcanaError::InvalidAction(format!("No ability {ability_id} on card {card}")))?;

    // Discards are chosen and every cost checked before anything is paid
    let mut discards: Vec<CardId> = Vec::new();
    for cost in &ability.costs {
        match cost {
            Cost::Discard(n) => {
                let picks = choose_discards(state, controllers, player, *n, &discards)?;
                discards.extend(picks);
            }
            Cost::Opaque(text) => {
                return Err(LorcanaError::InvalidAction(format!("Cannot pay cost '{text}'")));
            }
            _ => {}
        }
    }

    let mut banish_self = false;
    for cost in &ability.costs {
        match cost {
            Cost::ExertSelf => state.exert_card(card)?,
            Cost::PayInk(n) => state.pay_ink(player, *n)?,
            Cost::BanishSelf => banish_self = true,
            Cost::Discard(_) | Cost::Opaque(_) => {}
        }
    }
    for pick in discards {
        state.move_card(pick, Zone::Hand, Zone::Discard)?;
    }
    if banish_self {
        state.banish(card, None)?;
    }
    state.record(GameEvent::AbilityActivated {
        card,
        ability: ability.id.clone(),
    });
    Ok(Some(Resolution {
        source: card,
        controller: player,
        effects: ability.effects.clone(),
        text: ability.source_text.clone(),
    }))
}
