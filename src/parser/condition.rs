//! Guard predicates ("while this character has no damage", "if you have a
//! villain character in play")

use crate::core::Condition;
use crate::parser::normalize::number_word;
use crate::parser::target::parse_filter;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref SELF_SUBJECT: Regex =
        Regex::new(r"^(?:this character|he|she|it|this item) (?P<rest>.+)$").expect("valid regex");
    static ref HAND_SIZE: Regex =
        Regex::new(r"^you have (?P<n>\w+) or (?P<cmp>more|fewer) cards in your hand$").expect("valid regex");
    static ref LORE_AT_LEAST: Regex = Regex::new(r"^you have (?P<n>\d+) or more lore$").expect("valid regex");
    static ref CONTROL_NONE: Regex = Regex::new(r"^you (?:have|control) no (?P<desc>.+?)(?: in play)?$").expect("valid regex");
    static ref CONTROL: Regex =
        Regex::new(r"^you (?:have|control) (?P<n>a|an|another|\w+)(?: or more)? (?P<desc>.+?)(?: in play)?$")
            .expect("valid regex");
}

/// Parse a guard predicate; never fails
pub fn parse_condition(predicate: &str) -> Condition {
    let pred = predicate.trim().trim_end_matches(',');

    match pred {
        "it's your turn" | "it is your turn" | "during your turn" => return Condition::YourTurn,
        "it's an opponent's turn" | "it is an opponent's turn" | "during an opponent's turn" => {
            return Condition::OpponentsTurn
        }
        "an opponent has more lore than you" => return Condition::OpponentHasMoreLore,
        "you have no cards in your hand" => {
            return Condition::CardsInHand {
                min: None,
                max: Some(0),
            }
        }
        _ => {}
    }

    if let Some(caps) = SELF_SUBJECT.captures(pred) {
        let rest = &caps["rest"];
        if rest.starts_with("has no damage") || rest == "is undamaged" {
            return Condition::SelfUndamaged;
        }
        if rest.starts_with("has damage") || rest == "is damaged" {
            return Condition::SelfDamaged;
        }
        if rest == "is exerted" {
            return Condition::SelfExerted;
        }
    }

    if let Some(caps) = HAND_SIZE.captures(pred) {
        if let Some(n) = number_word(&caps["n"]) {
            return match &caps["cmp"] {
                "more" => Condition::CardsInHand { min: Some(n), max: None },
                _ => Condition::CardsInHand { min: None, max: Some(n) },
            };
        }
    }

    if let Some(caps) = LORE_AT_LEAST.captures(pred) {
        if let Ok(n) = caps["n"].parse() {
            return Condition::LoreAtLeast(n);
        }
    }

    if let Some(caps) = CONTROL_NONE.captures(pred) {
        if let Some(filter) = parse_filter(&caps["desc"]) {
            return Condition::ControlNone { filter };
        }
    }

    if let Some(caps) = CONTROL.captures(pred) {
        let count = &caps["n"];
        let min = if count == "another" { Some(1) } else { number_word(count) };
        if let (Some(min), Some(mut filter)) = (min, parse_filter(&caps["desc"])) {
            if count == "another" {
                filter.other = true;
            }
            return Condition::ControlCards { filter, min };
        }
    }

    Condition::Unrecognized(pred.to_string())
}
