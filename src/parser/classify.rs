//! Lexical/phrase classifier
//!
//! Decides the shape of one raw ability from its declared type and its
//! normalized text. Pure function of its input.

use crate::core::costs::{self, CostList};
use crate::core::RawAbilityType;
use crate::parser::trigger;

/// Classifier verdict
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbilityShape<'a> {
    /// Declared keyword: handled by the keyword table
    Keyword,
    /// Text is nothing but a parenthesized reminder
    Reminder(&'a str),
    /// Leading cost clause, split off from the effect text
    Activated { costs: CostList, effect_text: &'a str },
    Triggered,
    Static,
}

/// Split a leading "(...)" reminder off the text
///
/// Returns the reminder (without parentheses) and the remaining text.
pub fn strip_leading_reminder(text: &str) -> (Option<&str>, &str) {
    let trimmed = text.trim_start();
    if !trimmed.starts_with('(') {
        return (None, text.trim());
    }
    let mut depth = 0usize;
    for (i, ch) in trimmed.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return (Some(trimmed[1..i].trim()), trimmed[i + 1..].trim());
                }
            }
            _ => {}
        }
    }
    // Unbalanced: treat as plain text
    (None, text.trim())
}

/// Classify normalized ability text
pub fn classify(declared: RawAbilityType, text: &str) -> AbilityShape<'_> {
    if declared == RawAbilityType::Keyword {
        return AbilityShape::Keyword;
    }

    let (reminder, body) = strip_leading_reminder(text);
    if body.is_empty() {
        if let Some(reminder) = reminder {
            return AbilityShape::Reminder(reminder);
        }
    }

    if let Some((costs, effect_text)) = costs::extract_costs(body) {
        // The cost side is a prefix of the body, so this checks it too
        let declared_activated = declared == RawAbilityType::Activated && !trigger::starts_with_trigger(body);
        if costs::looks_like_cost(&costs) || declared_activated {
            return AbilityShape::Activated { costs, effect_text };
        }
    }

    if trigger::starts_with_trigger(body) {
        AbilityShape::Triggered
    } else {
        AbilityShape::Static
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Cost;

    #[test]
    fn test_keyword_routes_to_table() {
        assert_eq!(classify(RawAbilityType::Keyword, "evasive"), AbilityShape::Keyword);
    }

    #[test]
    fn test_activated_with_cost() {
        match classify(RawAbilityType::Activated, "{e}, 2 {i} -- draw a card.") {
            AbilityShape::Activated { costs, effect_text } => {
                assert_eq!(costs.as_slice(), &[Cost::ExertSelf, Cost::PayInk(2)]);
                assert_eq!(effect_text, "draw a card.");
            }
            other => panic!("Expected activated, got {other:?}"),
        }
    }

    #[test]
    fn test_declared_activated_keeps_opaque_cost() {
        match classify(RawAbilityType::Activated, "exert two of your characters -- draw a card.") {
            AbilityShape::Activated { costs, .. } => assert!(costs[0].is_opaque()),
            other => panic!("Expected activated, got {other:?}"),
        }
    }

    #[test]
    fn test_cost_like_text_wins_over_declared_static() {
        assert!(matches!(
            classify(RawAbilityType::Static, "{e} -- gain 1 lore."),
            AbilityShape::Activated { .. }
        ));
    }

    #[test]
    fn test_triggered_and_static() {
        assert_eq!(
            classify(RawAbilityType::Triggered, "when you play this character, draw a card."),
            AbilityShape::Triggered
        );
        assert_eq!(
            classify(RawAbilityType::Static, "at the end of your turn, gain 1 lore."),
            AbilityShape::Triggered
        );
        assert_eq!(
            classify(RawAbilityType::Static, "this character can't quest."),
            AbilityShape::Static
        );
    }

    #[test]
    fn test_reminder_only() {
        assert_eq!(
            classify(
                RawAbilityType::Static,
                "(a character with cost 3 or more can {e} to sing this song for free.)"
            ),
            AbilityShape::Reminder("a character with cost 3 or more can {e} to sing this song for free.")
        );
    }

    #[test]
    fn test_leading_reminder_is_stripped() {
        let (reminder, body) = strip_leading_reminder("(reminder.) draw a card.");
        assert_eq!(reminder, Some("reminder."));
        assert_eq!(body, "draw a card.");
        assert_eq!(classify(RawAbilityType::Static, "(reminder.) draw a card."), AbilityShape::Static);
    }
}
