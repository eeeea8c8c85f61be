//! Per-card exceptions
//!
//! A short, explicit table of (card full name, ability name) pairs whose text
//! the general grammar is known to misread. Everything else goes through the
//! general parser.

use crate::core::{
    AbilityKind, Actor, Amount, CardDefinition, CardType, Classification, Effect, RawAbility, TargetSelector,
    TriggerDescriptor, TriggerEvent, TriggerFilter,
};
use crate::parser::assemble::AbilityDraft;
use crate::zones::Zone;
use lazy_static::lazy_static;
use rustc_hash::FxHashMap;

type ExceptionBuilder = fn(&RawAbility) -> Vec<AbilityDraft>;

lazy_static! {
    static ref EXCEPTIONS: FxHashMap<(&'static str, &'static str), ExceptionBuilder> = {
        let mut table: FxHashMap<(&'static str, &'static str), ExceptionBuilder> = FxHashMap::default();
        table.insert(("stitch - rock star", "adoring fans"), adoring_fans);
        table.insert(("mickey mouse - wayward sorcerer", "ceaseless worker"), ceaseless_worker);
        table
    };
}

fn source(raw: &RawAbility) -> String {
    raw.full_text.clone().unwrap_or_else(|| raw.text().to_string())
}

/// "Whenever you play a character with cost 2 or less, you may exert them to draw a card."
///
/// The draw is paid for by exerting the played character, so both halves
/// hang off one optional choice.
fn adoring_fans(raw: &RawAbility) -> Vec<AbilityDraft> {
    let mut draft = AbilityDraft::new(
        AbilityKind::Triggered,
        vec![
            Effect::Exert {
                target: TargetSelector::Referenced,
                optional: true,
            },
            Effect::DrawCard {
                amount: Amount::one(),
                target: TargetSelector::You,
                optional: true,
            },
        ],
        source(raw),
    );
    draft.name = raw.name.clone();
    draft.triggers = vec![TriggerDescriptor {
        event: TriggerEvent::OnPlay,
        actor: Actor::Yours,
        timing: Default::default(),
        filter: TriggerFilter {
            card_type: Some(CardType::Character),
            max_cost: Some(2),
            ..TriggerFilter::default()
        },
        once_per_turn: false,
    }];
    vec![draft]
}

/// "Whenever one of your Broom characters is banished in a challenge, you may
/// return that card to your hand."
fn ceaseless_worker(raw: &RawAbility) -> Vec<AbilityDraft> {
    let mut draft = AbilityDraft::new(
        AbilityKind::Triggered,
        vec![Effect::MoveZone {
            from: Some(Zone::Discard),
            to: Zone::Hand,
            target: TargetSelector::Referenced,
            optional: true,
        }],
        source(raw),
    );
    draft.name = raw.name.clone();
    draft.triggers = vec![TriggerDescriptor {
        event: TriggerEvent::OnBanish,
        actor: Actor::Yours,
        timing: Default::default(),
        filter: TriggerFilter {
            card_type: Some(CardType::Character),
            classification: Some(Classification::new("Broom")),
            in_challenge: true,
            ..TriggerFilter::default()
        },
        once_per_turn: false,
    }];
    vec![draft]
}

/// Hand-built drafts for a known exception, if this ability is one
pub fn lookup(card: &CardDefinition, raw: &RawAbility) -> Option<Vec<AbilityDraft>> {
    let full_name = card.full_name().to_lowercase();
    let ability_name = raw.name.as_deref()?.trim().to_lowercase();
    let builder = EXCEPTIONS.get(&(full_name.as_str(), ability_name.as_str()))?;
    Some(builder(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RawAbilityType;

    fn raw(name: &str) -> RawAbility {
        RawAbility {
            ability_type: RawAbilityType::Triggered,
            name: Some(name.to_string()),
            effect: Some("Whenever you play a character with cost 2 or less, you may exert them to draw a card.".to_string()),
            full_text: None,
            keyword: None,
            keyword_value: None,
        }
    }

    #[test]
    fn test_lookup_hits_known_card() {
        let mut card = CardDefinition::new("RFB-1", "Stitch", CardType::Character, 6);
        card.subtitle = Some("Rock Star".to_string());
        let drafts = lookup(&card, &raw("ADORING FANS")).unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].triggers[0].filter.max_cost, Some(2));
    }

    #[test]
    fn test_lookup_misses_other_cards() {
        let mut card = CardDefinition::new("RFB-2", "Stitch", CardType::Character, 6);
        card.subtitle = Some("Carefree Surfer".to_string());
        assert!(lookup(&card, &raw("ADORING FANS")).is_none());
    }
}
