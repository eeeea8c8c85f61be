//! Continuous effects of static abilities
//!
//! Nothing here is cached: every query walks the static abilities of the
//! cards currently in play, so a zone move is reflected immediately.
//! Conditions are judged on printed stats plus temporary modifiers, which
//! keeps stat queries from recursing into themselves.

use crate::core::{
    AbilityKind, CardDefinition, CardFilter, CardId, Condition, DynamicAmount, Effect, Keyword, KeywordGrant,
    OwnerFilter, PlayerId, ReplacedEvent, RestrictedAction, Stat, SubstitutionMode, TargetSelector,
};
use crate::game::GameState;
use crate::zones::Zone;

/// One continuous effect currently in force
#[derive(Debug, Clone, Copy)]
pub struct ActiveStatic<'a> {
    pub source: CardId,
    pub controller: PlayerId,
    pub effect: &'a Effect,
}

/// Static effects of every card in play, with satisfied conditionals unwrapped
pub fn active_statics(state: &GameState) -> Vec<ActiveStatic<'_>> {
    let mut out = Vec::new();
    for id in state.all_in_play() {
        let Ok(card) = state.cards.get(id) else {
            continue;
        };
        for ability in card.abilities.iter().filter(|a| a.kind == AbilityKind::Static) {
            for effect in &ability.effects {
                flatten(state, id, card.owner, effect, &mut out);
            }
        }
    }
    out
}

fn flatten<'a>(state: &'a GameState, source: CardId, controller: PlayerId, effect: &'a Effect, out: &mut Vec<ActiveStatic<'a>>) {
    match effect {
        Effect::Conditional { condition, effects } => {
            if condition_holds(state, source, controller, condition) {
                for inner in effects {
                    flatten(state, source, controller, inner, out);
                }
            }
        }
        _ => out.push(ActiveStatic {
            source,
            controller,
            effect,
        }),
    }
}

/// Whether a guard predicate is true for `source`, controlled by `controller`
///
/// `Condition::Unrecognized` is always false.
pub fn condition_holds(state: &GameState, source: CardId, controller: PlayerId, condition: &Condition) -> bool {
    let card = state.cards.get(source).ok();
    match condition {
        Condition::SelfUndamaged => card.is_some_and(|c| c.damage == 0),
        Condition::SelfDamaged => card.is_some_and(|c| c.damage > 0),
        Condition::SelfExerted => card.is_some_and(|c| c.exerted),
        Condition::YourTurn => state.turn.active_player == controller,
        Condition::OpponentsTurn => state.turn.active_player != controller,
        Condition::ControlCards { filter, min } => controlled_matching(state, filter, source, controller) >= *min,
        Condition::ControlNone { filter } => controlled_matching(state, filter, source, controller) == 0,
        Condition::CardsInHand { min, max } => {
            let n = state.zone_cards(controller, Zone::Hand).len() as u32;
            min.map_or(true, |m| n >= m) && max.map_or(true, |m| n <= m)
        }
        Condition::LoreAtLeast(n) => state.get_player(controller).is_ok_and(|p| p.lore >= *n),
        Condition::OpponentHasMoreLore => {
            let mine = state.get_player(controller).map(|p| p.lore).unwrap_or(0);
            state
                .opponents(controller)
                .into_iter()
                .any(|o| state.get_player(o).is_ok_and(|p| p.lore > mine))
        }
        Condition::Unrecognized(_) => false,
    }
}

fn controlled_matching(state: &GameState, filter: &CardFilter, source: CardId, controller: PlayerId) -> u32 {
    // "you have" conditions count your own cards even when the filter is silent on owner
    let filter = if filter.owner == OwnerFilter::Any {
        filter.clone().owned_by(OwnerFilter::You)
    } else {
        filter.clone()
    };
    state
        .all_in_play()
        .into_iter()
        .filter(|&id| filter_matches(state, &filter, id, Some(source), controller))
        .count() as u32
}

/// Does `candidate` satisfy `filter`, read from `controller`'s side?
pub fn filter_matches(
    state: &GameState,
    filter: &CardFilter,
    candidate: CardId,
    source: Option<CardId>,
    controller: PlayerId,
) -> bool {
    let Ok(card) = state.cards.get(candidate) else {
        return false;
    };
    match filter.owner {
        OwnerFilter::Any => {}
        OwnerFilter::You if card.owner != controller => return false,
        OwnerFilter::Opponent if card.owner == controller => return false,
        _ => {}
    }
    if filter.other && source == Some(candidate) {
        return false;
    }
    if filter.exerted.is_some_and(|e| e != card.exerted) {
        return false;
    }
    if filter.damaged.is_some_and(|d| d != (card.damage > 0)) {
        return false;
    }
    if let Some(max) = filter.max_strength {
        let strength = card.base_stat(Stat::Strength) + card.modifier_total(Stat::Strength);
        if strength > max as i32 {
            return false;
        }
    }
    definition_matches(filter, &card.definition)
}

/// The printed-card half of a filter (type, classification, name, cost)
pub fn definition_matches(filter: &CardFilter, def: &CardDefinition) -> bool {
    if filter.card_type.is_some_and(|t| t != def.card_type) {
        return false;
    }
    if let Some(class) = &filter.classification {
        if !def.has_classification(class.as_str()) {
            return false;
        }
    }
    if let Some(name) = &filter.name {
        if name.key() != def.name.key() {
            return false;
        }
    }
    filter.max_cost.map_or(true, |max| def.cost <= max)
}

/// Value of a dynamic amount for an effect of `source`
pub fn evaluate_dynamic(state: &GameState, source: CardId, controller: PlayerId, amount: &DynamicAmount) -> u32 {
    evaluate(state, source, controller, amount, true)
}

fn evaluate(state: &GameState, source: CardId, controller: PlayerId, amount: &DynamicAmount, with_statics: bool) -> u32 {
    match amount {
        DynamicAmount::CountInPlay { filter } => state
            .all_in_play()
            .into_iter()
            .filter(|&id| filter_matches(state, filter, id, Some(source), controller))
            .count() as u32,
        DynamicAmount::CardsInHand { opponent: false } => state.zone_cards(controller, Zone::Hand).len() as u32,
        DynamicAmount::CardsInHand { opponent: true } => state
            .opponents(controller)
            .into_iter()
            .map(|o| state.zone_cards(o, Zone::Hand).len() as u32)
            .sum(),
        DynamicAmount::SelfStat(stat) => {
            let value = if with_statics {
                effective_stat(state, source, *stat)
            } else {
                state
                    .cards
                    .get(source)
                    .map(|c| c.base_stat(*stat) + c.modifier_total(*stat))
                    .unwrap_or(0)
            };
            value.max(0) as u32
        }
        DynamicAmount::DamageOnSelf => state.cards.get(source).map(|c| c.damage).unwrap_or(0),
        DynamicAmount::Formula(_) => 0,
    }
}

/// Whether a continuous effect's target selector covers `card`
fn covers(state: &GameState, active: &ActiveStatic<'_>, target: &TargetSelector, card: CardId) -> bool {
    match target {
        TargetSelector::This => card == active.source,
        TargetSelector::Each { filter } => {
            state.zone_of(card) == Some(Zone::Play)
                && filter_matches(state, filter, card, Some(active.source), active.controller)
        }
        _ => false,
    }
}

/// Printed stat plus temporary modifiers plus static bonuses, floored at 0
pub fn effective_stat(state: &GameState, card_id: CardId, stat: Stat) -> i32 {
    let Ok(card) = state.cards.get(card_id) else {
        return 0;
    };
    let mut value = card.base_stat(stat) + card.modifier_total(stat);
    for active in active_statics(state) {
        if let Effect::ModifyStat {
            stat: s,
            delta,
            per,
            target,
            ..
        } = active.effect
        {
            if *s == stat && covers(state, &active, target, card_id) {
                let times = per
                    .as_ref()
                    .map_or(1, |p| evaluate(state, active.source, active.controller, p, false) as i32);
                value += delta * times;
            }
        }
    }
    value.max(0)
}

/// Every keyword the card has right now, printed or granted
pub fn keywords(state: &GameState, card_id: CardId) -> Vec<KeywordGrant> {
    let Ok(card) = state.cards.get(card_id) else {
        return Vec::new();
    };
    let mut out: Vec<KeywordGrant> = Vec::new();
    for ability in card.abilities.iter() {
        for effect in &ability.effects {
            let grant = match effect {
                Effect::Keyword { keyword, value } => Some(KeywordGrant {
                    keyword: *keyword,
                    value: *value,
                }),
                Effect::DamageReduction { amount } => Some(KeywordGrant {
                    keyword: Keyword::Resist,
                    value: Some(*amount),
                }),
                Effect::AlternateCost { cost } => Some(KeywordGrant {
                    keyword: Keyword::Shift,
                    value: Some(*cost),
                }),
                Effect::CostSubstitution { value, mode } => match mode {
                    SubstitutionMode::Singer => Some(KeywordGrant {
                        keyword: Keyword::Singer,
                        value: Some(*value),
                    }),
                    SubstitutionMode::SingTogether => Some(KeywordGrant {
                        keyword: Keyword::SingTogether,
                        value: Some(*value),
                    }),
                    SubstitutionMode::SongReminder => None,
                },
                _ => None,
            };
            out.extend(grant);
        }
    }
    out.extend(card.granted_keywords());
    for active in active_statics(state) {
        if let Effect::GrantKeyword { keywords, target, .. } = active.effect {
            if covers(state, &active, target, card_id) {
                out.extend(keywords.iter().copied());
            }
        }
    }
    out
}

pub fn has_keyword(state: &GameState, card_id: CardId, keyword: Keyword) -> bool {
    keywords(state, card_id).iter().any(|g| g.keyword == keyword)
}

/// Summed value of a stacking keyword (Resist, Challenger)
pub fn keyword_value(state: &GameState, card_id: CardId, keyword: Keyword) -> u32 {
    keywords(state, card_id)
        .iter()
        .filter(|g| g.keyword == keyword)
        .filter_map(|g| g.value)
        .sum()
}

/// Damage that actually lands after prevention and Resist
pub fn incoming_damage(state: &GameState, card_id: CardId, amount: u32) -> u32 {
    let prevented = active_statics(state).iter().any(|active| match active.effect {
        Effect::Replacement {
            original: ReplacedEvent::DamageDealt { target },
            ..
        } => covers(state, active, target, card_id),
        _ => false,
    });
    if prevented {
        return 0;
    }
    amount.saturating_sub(keyword_value(state, card_id, Keyword::Resist))
}

/// Substitute effects for "if this character would be banished, ... instead"
pub fn banish_replacement(state: &GameState, card_id: CardId) -> Option<Vec<Effect>> {
    active_statics(state)
        .into_iter()
        .filter(|a| a.source == card_id)
        .find_map(|a| match a.effect {
            Effect::Replacement {
                original: ReplacedEvent::SelfBanished,
                substitute,
            } if !substitute.is_empty() => Some(substitute.clone()),
            _ => None,
        })
}

pub fn is_restricted(state: &GameState, card_id: CardId, action: RestrictedAction) -> bool {
    if state.cards.get(card_id).is_ok_and(|c| c.is_restricted(action)) {
        return true;
    }
    active_statics(state).iter().any(|active| match active.effect {
        Effect::Restriction { action: a, target, .. } => *a == action && covers(state, active, target, card_id),
        _ => false,
    })
}

/// Ink cost to play a card from hand after discounts and static reductions
pub fn cost_to_play(state: &GameState, player: PlayerId, card_id: CardId) -> u32 {
    let Ok(card) = state.cards.get(card_id) else {
        return u32::MAX;
    };
    let def = &card.definition;
    let discounts = state.get_player(player).map(|p| p.discount_for(def)).unwrap_or(0);
    let reductions: u32 = active_statics(state)
        .iter()
        .filter(|a| a.controller == player)
        .filter_map(|a| match a.effect {
            Effect::CostReduction { amount, filter, .. } if definition_matches(filter, def) => Some(*amount),
            _ => None,
        })
        .sum();
    u32::from(def.cost).saturating_sub(discounts + reductions)
}

/// Cost of song this character can sing: its cost, or its Singer value
pub fn singing_value(state: &GameState, card_id: CardId) -> u32 {
    let printed = state.cards.get(card_id).map(|c| u32::from(c.cost())).unwrap_or(0);
    let singer = keywords(state, card_id)
        .iter()
        .filter(|g| g.keyword == Keyword::Singer)
        .filter_map(|g| g.value)
        .max()
        .unwrap_or(0);
    printed.max(singer)
}
