//! Target selector grammar
//!
//! "chosen character", "another chosen character", "up to 2 chosen opposing
//! characters", "each opposing damaged character", "your other characters" ...

use crate::core::{CardFilter, CardName, CardType, Classification, OwnerFilter, TargetSelector};
use crate::parser::normalize::number_word;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TOP_OF_DECK: Regex =
        Regex::new(r"^the top (?:card|(?P<n>\w+) cards) of (?:your|their|its owner's) deck$").expect("valid regex");
    static ref MAX_COST: Regex = Regex::new(r" with cost (?P<n>\d+) or less").expect("valid regex");
    static ref MAX_STRENGTH: Regex = Regex::new(r" with (?P<n>\d+) \{s\} or less").expect("valid regex");
}

const SELF_TARGETS: &[&str] = &[
    "this character",
    "this item",
    "this location",
    "this card",
    "him",
    "her",
    "himself",
    "herself",
    "he",
    "she",
];

const REFERENCED_TARGETS: &[&str] = &[
    "it",
    "them",
    "they",
    "that character",
    "that item",
    "that location",
    "that card",
    "those characters",
    "the challenging character",
    "the banished character",
];

/// Words that carry no filtering information
const FILLER: &[&str] = &["a", "an", "the", "one", "of", "chosen", "each", "all", "in", "play", "that", "is"];

fn fixed_target(phrase: &str) -> Option<TargetSelector> {
    if SELF_TARGETS.contains(&phrase) {
        return Some(TargetSelector::This);
    }
    if REFERENCED_TARGETS.contains(&phrase) {
        return Some(TargetSelector::Referenced);
    }
    let selector = match phrase {
        "you" | "yourself" => TargetSelector::You,
        "each opponent" | "each of your opponents" | "your opponents" | "opponents" => TargetSelector::Opponents,
        "chosen player" => TargetSelector::ChosenPlayer,
        "chosen opponent" => TargetSelector::ChosenOpponent,
        "each player" | "all players" => TargetSelector::AllPlayers,
        _ => return None,
    };
    Some(selector)
}

/// Parse a card description ("opposing damaged character with cost 3 or less")
///
/// Returns `None` unless the description names a card noun.
pub fn parse_filter(desc: &str) -> Option<CardFilter> {
    let mut filter = CardFilter::default();
    let mut text = desc.trim().to_string();

    if let Some(pos) = text.find(" named ") {
        filter.name = Some(CardName::new(text[pos + " named ".len()..].trim()));
        text.truncate(pos);
    }
    if let Some(caps) = MAX_COST.captures(&text) {
        filter.max_cost = caps["n"].parse().ok();
        text = MAX_COST.replace(&text, "").into_owned();
    }
    if let Some(caps) = MAX_STRENGTH.captures(&text) {
        filter.max_strength = caps["n"].parse().ok();
        text = MAX_STRENGTH.replace(&text, "").into_owned();
    }
    for suffix in [" of yours", " you have in play", " in play", " in your discard"] {
        if let Some(stripped) = text.strip_suffix(suffix) {
            if suffix == " of yours" || suffix == " you have in play" {
                filter.owner = OwnerFilter::You;
            }
            text = stripped.to_string();
        }
    }

    let mut noun_found = false;
    let mut classification: Option<&str> = None;
    for word in text.split_whitespace() {
        match word {
            "your" | "yours" | "you" => filter.owner = OwnerFilter::You,
            "opposing" | "opponent's" | "opponents'" => filter.owner = OwnerFilter::Opponent,
            "other" | "another" => filter.other = true,
            "damaged" => filter.damaged = Some(true),
            "undamaged" => filter.damaged = Some(false),
            "exerted" => filter.exerted = Some(true),
            "ready" => filter.exerted = Some(false),
            "card" | "cards" => noun_found = true,
            w if FILLER.contains(&w) => {}
            w => match CardType::from_noun(w) {
                Some(card_type) => {
                    filter.card_type = Some(card_type);
                    noun_found = true;
                }
                None if !noun_found => classification = Some(w),
                None => return None,
            },
        }
    }

    if !noun_found {
        return None;
    }
    if let Some(class) = classification {
        filter.classification = Some(Classification::new(class));
    }
    Some(filter)
}

/// Leading count word, skipping the article-like "a"/"an"/"one"
fn split_count(phrase: &str) -> Option<(u32, &str)> {
    let (first, rest) = phrase.split_once(' ')?;
    if matches!(first, "a" | "an" | "one") {
        return None;
    }
    number_word(first).map(|n| (n, rest))
}

/// Parse a target phrase
pub fn parse_target(phrase: &str) -> Option<TargetSelector> {
    let p = phrase.trim().trim_end_matches('.').trim();

    if let Some(selector) = fixed_target(p) {
        return Some(selector);
    }

    if let Some(caps) = TOP_OF_DECK.captures(p) {
        let count = caps.name("n").and_then(|n| number_word(n.as_str())).unwrap_or(1);
        return Some(TargetSelector::TopOfDeck { count });
    }

    if let Some(rest) = p.strip_prefix("up to ") {
        let (count, desc) = split_count(rest).or_else(|| number_word_prefix(rest))?;
        return Some(TargetSelector::Chosen {
            filter: parse_filter(desc)?,
            count,
            up_to: true,
        });
    }

    if let Some((count, desc)) = split_count(p) {
        if desc.starts_with("chosen ") || desc.starts_with("other chosen ") {
            return Some(TargetSelector::Chosen {
                filter: parse_filter(desc)?,
                count,
                up_to: false,
            });
        }
    }

    if p.starts_with("each ") || p.starts_with("all ") {
        return Some(TargetSelector::Each { filter: parse_filter(p)? });
    }

    if p.starts_with("chosen ")
        || p.contains(" chosen ")
        || p.starts_with("another ")
        || p.starts_with("one of ")
        || p.starts_with("a ")
        || p.starts_with("an ")
    {
        return Some(TargetSelector::chosen(parse_filter(p)?));
    }

    // "your characters", "your other characters", "opposing characters"
    if p.starts_with("your ") || p.starts_with("opposing ") {
        return Some(TargetSelector::Each { filter: parse_filter(p)? });
    }

    None
}

/// "up to one chosen character": accept "one" here
fn number_word_prefix(phrase: &str) -> Option<(u32, &str)> {
    let (first, rest) = phrase.split_once(' ')?;
    number_word(first).map(|n| (n, rest))
}
