//! Cost system for activated abilities
//!
//! Represents what a player pays to activate an ability: exerting the card,
//! paying ink, banishing the source, discarding cards. Cost text is read from
//! normalized rules text (see `parser::normalize`), so the exert glyph is `{e}`
//! and ink is `{i}`.

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{digit1, space0, space1},
    combinator::{all_consuming, map, map_res, opt, value},
    sequence::{preceded, terminated, tuple},
    IResult,
};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Delimiter between cost and effect after normalization
pub const COST_DELIMITER: &str = " -- ";

/// A cost that must be paid to activate an ability
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cost {
    /// Exert the source card ({e})
    ExertSelf,

    /// Pay N ink by exerting ready inkwell cards
    PayInk(u32),

    /// Banish the source card
    BanishSelf,

    /// Discard N cards from hand
    Discard(u32),

    /// Cost text outside the known vocabulary, kept verbatim
    Opaque(String),
}

pub type CostList = SmallVec<[Cost; 2]>;

impl Cost {
    /// Parse one comma-separated cost token
    ///
    /// Never fails: unrecognized phrases come back as `Cost::Opaque`.
    pub fn parse(token: &str) -> Self {
        let trimmed = token.trim().trim_end_matches('.');
        match all_consuming(cost_token)(trimmed) {
            Ok((_, cost)) => cost,
            Err(_) => Cost::Opaque(trimmed.to_string()),
        }
    }

    pub fn is_opaque(&self) -> bool {
        matches!(self, Cost::Opaque(_))
    }

    pub fn includes_exert(&self) -> bool {
        matches!(self, Cost::ExertSelf)
    }

    pub fn ink(&self) -> u32 {
        match self {
            Cost::PayInk(n) => *n,
            _ => 0,
        }
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cost::ExertSelf => write!(f, "exert"),
            Cost::PayInk(n) => write!(f, "{n} ink"),
            Cost::BanishSelf => write!(f, "banish self"),
            Cost::Discard(n) => write!(f, "discard {n}"),
            Cost::Opaque(text) => write!(f, "?{text}"),
        }
    }
}

/// Split normalized activated-ability text at the first cost delimiter
///
/// Returns the ordered cost list and the remaining effect text, or `None`
/// when the text has no delimiter.
pub fn extract_costs(text: &str) -> Option<(CostList, &str)> {
    let (left, right) = split_cost_clause(text)?;
    Some((parse_cost_list(left), right))
}

/// Left and right side of the first cost delimiter
fn split_cost_clause(text: &str) -> Option<(&str, &str)> {
    let pos = text.find(COST_DELIMITER)?;
    let left = text[..pos].trim();
    let right = text[pos + COST_DELIMITER.len()..].trim();
    if left.is_empty() {
        return None;
    }
    Some((left, right))
}

/// Comma-split a cost segment into tokens
fn parse_cost_list(segment: &str) -> CostList {
    segment
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(Cost::parse)
        .collect()
}

/// Whether an extracted cost list reads like a cost clause rather than prose
///
/// Every token must be recognized; a single opaque token is enough to reject
/// the segment, since ability names and conditions also precede dashes.
pub fn looks_like_cost(costs: &[Cost]) -> bool {
    !costs.is_empty() && costs.iter().all(|c| !c.is_opaque())
}

fn number(input: &str) -> IResult<&str, u32> {
    alt((
        map_res(digit1, str::parse::<u32>),
        value(1, alt((tag("an"), tag("a"), tag("one")))),
        value(2, tag("two")),
        value(3, tag("three")),
    ))(input)
}

fn exert(input: &str) -> IResult<&str, Cost> {
    value(
        Cost::ExertSelf,
        alt((tag("{e}"), tag("exert this character"), tag("exert this item"))),
    )(input)
}

fn pay_ink(input: &str) -> IResult<&str, Cost> {
    map(terminated(number, tuple((space0, tag("{i}")))), Cost::PayInk)(input)
}

fn banish_self(input: &str) -> IResult<&str, Cost> {
    value(
        Cost::BanishSelf,
        tuple((
            tag("banish this "),
            alt((tag("item"), tag("character"), tag("location"))),
        )),
    )(input)
}

fn discard(input: &str) -> IResult<&str, Cost> {
    map(
        preceded(
            tuple((opt(tag("choose and ")), tag("discard "))),
            terminated(number, tuple((space1, alt((tag("cards"), tag("card")))))),
        ),
        Cost::Discard,
    )(input)
}

fn cost_token(input: &str) -> IResult<&str, Cost> {
    alt((exert, pay_ink, banish_self, discard))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exert_cost() {
        assert_eq!(Cost::parse("{e}"), Cost::ExertSelf);
        assert!(Cost::parse("{e}").includes_exert());
    }

    #[test]
    fn test_parse_ink() {
        assert_eq!(Cost::parse("2 {i}"), Cost::PayInk(2));
        assert_eq!(Cost::parse("3{i}"), Cost::PayInk(3));
        assert_eq!(Cost::PayInk(3).ink(), 3);
    }

    #[test]
    fn test_parse_banish_and_discard() {
        assert_eq!(Cost::parse("banish this item"), Cost::BanishSelf);
        assert_eq!(Cost::parse("discard a card"), Cost::Discard(1));
        assert_eq!(Cost::parse("choose and discard 2 cards"), Cost::Discard(2));
    }

    #[test]
    fn test_unknown_cost_is_opaque() {
        let cost = Cost::parse("exert one of your characters named pua");
        assert!(cost.is_opaque());
        assert_eq!(cost, Cost::Opaque("exert one of your characters named pua".to_string()));
    }

    #[test]
    fn test_extract_compound_cost() {
        let (costs, rest) =
            extract_costs("{e}, 2 {i} -- chosen character gets -2 {s} this turn.").unwrap();
        assert_eq!(costs.as_slice(), &[Cost::ExertSelf, Cost::PayInk(2)]);
        assert_eq!(rest, "chosen character gets -2 {s} this turn.");
    }

    #[test]
    fn test_extract_without_delimiter() {
        assert!(extract_costs("draw a card.").is_none());
    }

    #[test]
    fn test_looks_like_cost() {
        assert!(looks_like_cost(&parse_cost_list("{e}, banish this item")));
        assert!(!looks_like_cost(&parse_cost_list("careful aim")));
    }
}
