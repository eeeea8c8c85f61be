//! Ability definition assembler
//!
//! Turns drafts (classifier kind + costs + triggers + effects) into
//! `AbilityDefinition`s with deterministic ids. A draft with N trigger
//! descriptors yields N definitions, each with its own copy of the effects.

use crate::core::{AbilityDefinition, AbilityId, AbilityKind, CostList, Effect, TriggerDescriptor};
use crate::LorcanaError;

/// Parsed ability before ids are assigned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbilityDraft {
    pub name: Option<String>,
    pub kind: AbilityKind,
    pub costs: CostList,
    pub triggers: Vec<TriggerDescriptor>,
    pub effects: Vec<Effect>,
    pub source_text: String,
}

impl AbilityDraft {
    pub fn new(kind: AbilityKind, effects: Vec<Effect>, source_text: impl Into<String>) -> Self {
        AbilityDraft {
            name: None,
            kind,
            costs: CostList::new(),
            triggers: Vec::new(),
            effects,
            source_text: source_text.into(),
        }
    }
}

/// Assign ids and validate
///
/// `next_ordinal` is the card-wide counter; it advances once per emitted
/// definition so re-parsing the same card produces the same ids. Definitions
/// that break a structural invariant are returned as errors instead.
pub fn assemble(
    card_id: &str,
    draft: AbilityDraft,
    next_ordinal: &mut usize,
) -> Vec<Result<AbilityDefinition, LorcanaError>> {
    let AbilityDraft {
        name,
        kind,
        costs,
        triggers,
        mut effects,
        source_text,
    } = draft;

    if effects.is_empty() {
        effects.push(Effect::Unparsed {
            text: source_text.clone(),
        });
    }

    let triggers: Vec<Option<TriggerDescriptor>> = if triggers.is_empty() {
        vec![None]
    } else {
        triggers.into_iter().map(Some).collect()
    };

    triggers
        .into_iter()
        .map(|trigger| {
            let def = AbilityDefinition {
                id: AbilityId::for_card(card_id, *next_ordinal),
                card_id: card_id.to_string(),
                name: name.clone(),
                kind,
                costs: costs.clone(),
                trigger,
                effects: effects.clone(),
                source_text: source_text.clone(),
            };
            *next_ordinal += 1;
            def.validate().map(|()| def)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Actor, Amount, TargetSelector, TriggerEvent};

    fn lose_lore() -> Effect {
        Effect::LoseLore {
            amount: Amount::Fixed(1),
            target: TargetSelector::Opponents,
            optional: false,
        }
    }

    #[test]
    fn test_compound_trigger_expands() {
        let mut draft = AbilityDraft::new(AbilityKind::Triggered, vec![lose_lore()], "text");
        draft.triggers = vec![
            TriggerDescriptor::new(TriggerEvent::OnPlay, Actor::This),
            TriggerDescriptor::new(TriggerEvent::OnQuest, Actor::This),
        ];
        let mut ordinal = 0;
        let defs: Vec<_> = assemble("C-1", draft, &mut ordinal)
            .into_iter()
            .map(|r| r.unwrap())
            .collect();

        assert_eq!(defs.len(), 2);
        assert_eq!(ordinal, 2);
        assert_eq!(defs[0].id.as_str(), "C-1-0");
        assert_eq!(defs[1].id.as_str(), "C-1-1");
        assert_ne!(defs[0].trigger, defs[1].trigger);
        assert_eq!(defs[0].effects, defs[1].effects);
    }

    #[test]
    fn test_empty_effects_become_unparsed() {
        let draft = AbilityDraft::new(AbilityKind::Static, Vec::new(), "mystery");
        let mut ordinal = 0;
        let defs = assemble("C-2", draft, &mut ordinal);
        let def = defs[0].as_ref().unwrap();
        assert_eq!(
            def.effects,
            vec![Effect::Unparsed {
                text: "mystery".to_string()
            }]
        );
    }

    #[test]
    fn test_violation_is_reported() {
        let draft = AbilityDraft::new(AbilityKind::Activated, vec![lose_lore()], "no cost");
        let mut ordinal = 0;
        let defs = assemble("C-3", draft, &mut ordinal);
        assert!(matches!(defs[0], Err(LorcanaError::StructuralViolation { .. })));
    }
}
