//! Parsed abilities
//!
//! An `AbilityDefinition` is the parser's output unit: kind, costs, trigger and
//! an ordered effect list, tagged with a stable id derived from the owning card.

use crate::core::{AbilityId, CardType, Classification, CostList, Effect};
use crate::{LorcanaError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ability kinds after classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbilityKind {
    Static,
    Triggered,
    Activated,
}

impl fmt::Display for AbilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AbilityKind::Static => "static",
            AbilityKind::Triggered => "triggered",
            AbilityKind::Activated => "activated",
        };
        write!(f, "{s}")
    }
}

/// Game events a triggered ability listens for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerEvent {
    OnPlay,
    OnQuest,
    OnChallenge,
    OnChallenged,
    OnBanish,
    OnDamage,
    OnDraw,
    StartOfTurn,
    EndOfTurn,
}

/// Whose action fires the trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Actor {
    /// The source card itself ("this character", "he", "she")
    #[default]
    This,
    /// Any card or player on the controller's side ("you play", "one of your characters")
    Yours,
    /// Another card on the controller's side ("another character", "your other characters")
    YourOther,
    /// An opponent or a card they control ("an opposing character", "each opponent's turn")
    Opponent,
    /// Anyone
    Any,
}

/// Which turns a trigger may fire on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Timing {
    #[default]
    AnyTurn,
    YourTurn,
    OpponentsTurn,
}

/// What the subject of a trigger must look like ("a Floodborn character", "a song")
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TriggerFilter {
    pub card_type: Option<CardType>,
    pub classification: Option<Classification>,
    pub song: bool,
    pub max_cost: Option<u8>,
    /// The subject is the card doing the banishing ("whenever this character banishes ...")
    pub banisher: bool,
    /// Only a banishment that happens during a challenge
    #[serde(default)]
    pub in_challenge: bool,
}

impl TriggerFilter {
    pub fn is_empty(&self) -> bool {
        *self == TriggerFilter::default()
    }
}

/// Event plus qualifiers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerDescriptor {
    pub event: TriggerEvent,
    pub actor: Actor,
    pub timing: Timing,
    #[serde(default)]
    pub filter: TriggerFilter,
    /// Resolves at most once per turn for each card
    #[serde(default)]
    pub once_per_turn: bool,
}

impl TriggerDescriptor {
    pub fn new(event: TriggerEvent, actor: Actor) -> Self {
        TriggerDescriptor {
            event,
            actor,
            timing: Timing::AnyTurn,
            filter: TriggerFilter::default(),
            once_per_turn: false,
        }
    }

    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }
}

/// One parsed ability
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbilityDefinition {
    pub id: AbilityId,
    pub card_id: String,
    /// Printed ability name, if any ("CAREFUL AIM")
    pub name: Option<String>,
    pub kind: AbilityKind,
    pub costs: CostList,
    pub trigger: Option<TriggerDescriptor>,
    pub effects: Vec<Effect>,
    /// Raw text the ability was parsed from
    pub source_text: String,
}

impl AbilityDefinition {
    /// Check the structural invariants every produced ability must satisfy
    ///
    /// A failure here is a parser defect, not bad input.
    pub fn validate(&self) -> Result<()> {
        let fail = |reason: &str| {
            Err(LorcanaError::StructuralViolation {
                ability: self.id.to_string(),
                reason: reason.to_string(),
            })
        };

        if self.id.as_str().is_empty() {
            return fail("empty id");
        }
        if self.card_id.is_empty() {
            return fail("empty card id");
        }
        if self.effects.is_empty() {
            return fail("no effects");
        }
        match self.kind {
            AbilityKind::Triggered if self.trigger.is_none() => fail("triggered ability without trigger"),
            AbilityKind::Activated if self.costs.is_empty() => fail("activated ability without cost"),
            AbilityKind::Static | AbilityKind::Activated if self.trigger.is_some() => {
                fail("trigger on non-triggered ability")
            }
            _ => Ok(()),
        }
    }

    pub fn unparsed_count(&self) -> usize {
        self.effects.iter().map(Effect::unparsed_count).sum()
    }

    pub fn is_triggered_by(&self, event: TriggerEvent) -> bool {
        self.trigger.as_ref().is_some_and(|t| t.event == event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Amount, Cost, TargetSelector};
    use smallvec::smallvec;

    fn draw() -> Effect {
        Effect::DrawCard {
            amount: Amount::one(),
            target: TargetSelector::You,
            optional: false,
        }
    }

    fn ability(kind: AbilityKind) -> AbilityDefinition {
        AbilityDefinition {
            id: AbilityId::for_card("T-1", 0),
            card_id: "T-1".to_string(),
            name: None,
            kind,
            costs: CostList::new(),
            trigger: None,
            effects: vec![draw()],
            source_text: "draw a card.".to_string(),
        }
    }

    #[test]
    fn test_static_is_valid() {
        assert!(ability(AbilityKind::Static).validate().is_ok());
    }

    #[test]
    fn test_activated_requires_cost() {
        let mut def = ability(AbilityKind::Activated);
        assert!(matches!(
            def.validate(),
            Err(LorcanaError::StructuralViolation { .. })
        ));
        def.costs = smallvec![Cost::ExertSelf];
        assert!(def.validate().is_ok());
    }

    #[test]
    fn test_triggered_requires_trigger() {
        let mut def = ability(AbilityKind::Triggered);
        assert!(def.validate().is_err());
        def.trigger = Some(TriggerDescriptor::new(TriggerEvent::OnPlay, Actor::This));
        assert!(def.validate().is_ok());
        assert!(def.is_triggered_by(TriggerEvent::OnPlay));
    }

    #[test]
    fn test_empty_effects_rejected() {
        let mut def = ability(AbilityKind::Static);
        def.effects.clear();
        assert!(def.validate().is_err());
    }
}
