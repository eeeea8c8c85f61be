//! Trigger-condition extractor
//!
//! Pulls the trigger clause off the front of a triggered ability and maps it
//! to one or more `TriggerDescriptor`s. Patterns are tried in precedence order
//! and the first match wins.

use crate::core::{Actor, CardType, Classification, Timing, TriggerDescriptor, TriggerEvent, TriggerFilter};
use crate::parser::normalize::number_word;
use lazy_static::lazy_static;
use regex::{Captures, Regex};

type SubjectBuilder = fn(&Captures) -> Option<(Actor, TriggerFilter)>;

struct TriggerPattern {
    event: TriggerEvent,
    regex: Regex,
    subject: SubjectBuilder,
}

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).expect("trigger pattern must compile")
}

lazy_static! {
    static ref PATTERNS: Vec<TriggerPattern> = vec![
        TriggerPattern {
            event: TriggerEvent::OnPlay,
            regex: re(r"^when(?:ever)? (?P<who>you|an opponent|a player|each player) plays? (?P<subj>.+)$"),
            subject: played_subject,
        },
        TriggerPattern {
            event: TriggerEvent::OnPlay,
            regex: re(r"^when(?:ever)? (?P<subj>.+?) sings? (?:a )?songs?$"),
            subject: singer_subject,
        },
        TriggerPattern {
            event: TriggerEvent::OnQuest,
            regex: re(r"^when(?:ever)? (?P<subj>.+?) quests?$"),
            subject: plain_subject,
        },
        TriggerPattern {
            event: TriggerEvent::OnBanish,
            regex: re(r"^when(?:ever)? (?P<subj>.+?) (?:is|are) (?:challenged and banished|banished in a challenge)$"),
            subject: challenge_banish_subject,
        },
        TriggerPattern {
            event: TriggerEvent::OnChallenge,
            regex: re(r"^when(?:ever)? (?P<subj>.+?) challenges(?: .+)?$"),
            subject: plain_subject,
        },
        TriggerPattern {
            event: TriggerEvent::OnChallenged,
            regex: re(r"^when(?:ever)? (?P<subj>.+?) (?:is|are) challenged(?: .+)?$"),
            subject: plain_subject,
        },
        TriggerPattern {
            event: TriggerEvent::OnBanish,
            regex: re(r"^when(?:ever)? (?P<subj>.+?) (?:is|are|would be) banished(?: .+)?$"),
            subject: plain_subject,
        },
        TriggerPattern {
            event: TriggerEvent::OnBanish,
            regex: re(r"^when(?:ever)? (?P<subj>.+?) banish(?:es)? (?:another|a|an) .+$"),
            subject: banisher_subject,
        },
        TriggerPattern {
            event: TriggerEvent::OnDamage,
            regex: re(r"^when(?:ever)? (?P<subj>.+?) (?:is|are|would be) dealt damage(?: .+)?$"),
            subject: plain_subject,
        },
        TriggerPattern {
            event: TriggerEvent::OnDraw,
            regex: re(r"^when(?:ever)? (?P<who>you|an opponent|each opponent|a player) draws? (?:a|one or more|\d+) cards?$"),
            subject: player_subject,
        },
        TriggerPattern {
            event: TriggerEvent::StartOfTurn,
            regex: re(r"^at the start of (?P<whose>your|each|each opponent's|an opponent's|each player's) turns?$"),
            subject: turn_subject,
        },
        TriggerPattern {
            event: TriggerEvent::EndOfTurn,
            regex: re(r"^at the end of (?P<whose>your|each|each opponent's|an opponent's|each player's|the) turns?$"),
            subject: turn_subject,
        },
    ];

    static ref COMPOUND_SPLIT: Regex = re(r",? and (?P<word>whenever|when) ");
}

/// Leading qualifiers: text, turn restriction, once-per-turn limit
const TIMING_PREFIXES: &[(&str, Timing, bool)] = &[
    ("once during your turn, ", Timing::YourTurn, true),
    ("during your turn, ", Timing::YourTurn, false),
    ("during an opponent's turn, ", Timing::OpponentsTurn, false),
    ("during opponents' turns, ", Timing::OpponentsTurn, false),
    ("once per turn, ", Timing::AnyTurn, true),
];

const TIMING_SUFFIXES: &[(&str, Timing)] = &[
    (" during your turn", Timing::YourTurn),
    (" during an opponent's turn", Timing::OpponentsTurn),
    (" during opponents' turns", Timing::OpponentsTurn),
];

/// Remove a leading "during your turn, " style qualifier
fn strip_timing_prefix(text: &str) -> (Option<(Timing, bool)>, &str) {
    for (prefix, timing, once) in TIMING_PREFIXES {
        if let Some(rest) = text.strip_prefix(prefix) {
            return (Some((*timing, *once)), rest);
        }
    }
    (None, text)
}

/// Does the text open with trigger-introducing phrasing?
pub fn starts_with_trigger(text: &str) -> bool {
    let (_, rest) = strip_timing_prefix(text);
    rest.starts_with("when ")
        || rest.starts_with("whenever ")
        || rest.starts_with("at the start of ")
        || rest.starts_with("at the end of ")
}

/// Triggers pulled off the front of an ability
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedTrigger<'a> {
    pub triggers: Vec<TriggerDescriptor>,
    pub effect_text: &'a str,
    /// Halves of a compound clause that no pattern recognized
    pub unmatched: Vec<String>,
}

/// Extract trigger descriptors and the remaining effect text
///
/// Returns `None` when no trigger pattern matches, in which case the caller
/// falls back to static classification.
pub fn extract(text: &str) -> Option<ExtractedTrigger<'_>> {
    let (prefix, rest) = strip_timing_prefix(text);
    let comma = rest.find(", ")?;
    let clause = rest[..comma].trim();
    let effect_text = rest[comma + 2..].trim();
    let once = prefix.is_some_and(|(_, once)| once);

    let mut triggers = Vec::new();
    let mut unmatched = Vec::new();
    for part in split_compound(clause) {
        let (suffix_timing, stripped) = strip_timing_suffix(&part);
        match match_clause(stripped) {
            Some(mut descriptor) => {
                descriptor.timing = prefix.map(|(t, _)| t).or(suffix_timing).unwrap_or(Timing::AnyTurn);
                descriptor.once_per_turn = once;
                triggers.push(descriptor);
            }
            None => unmatched.push(part),
        }
    }

    if triggers.is_empty() {
        None
    } else {
        Some(ExtractedTrigger {
            triggers,
            effect_text,
            unmatched,
        })
    }
}

/// "when you play this character and whenever he quests" -> two clauses
fn split_compound(clause: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut last = 0;
    let mut word = "";
    for caps in COMPOUND_SPLIT.captures_iter(clause) {
        let (Some(whole), Some(w)) = (caps.get(0), caps.name("word")) else {
            continue;
        };
        parts.push(format!("{}{}", word, &clause[last..whole.start()]));
        word = if w.as_str() == "whenever" { "whenever " } else { "when " };
        last = whole.end();
    }
    parts.push(format!("{}{}", word, &clause[last..]));
    parts
}

fn strip_timing_suffix(clause: &str) -> (Option<Timing>, &str) {
    for (suffix, timing) in TIMING_SUFFIXES {
        if let Some(pos) = clause.find(suffix) {
            let after = &clause[pos + suffix.len()..];
            if after.is_empty() {
                return (Some(*timing), &clause[..pos]);
            }
        }
    }
    (None, clause)
}

fn match_clause(clause: &str) -> Option<TriggerDescriptor> {
    PATTERNS.iter().find_map(|pattern| {
        let caps = pattern.regex.captures(clause)?;
        let (actor, filter) = (pattern.subject)(&caps)?;
        Some(TriggerDescriptor {
            event: pattern.event,
            actor,
            timing: Timing::AnyTurn,
            filter,
            once_per_turn: false,
        })
    })
}

const SELF_REFERENCES: &[&str] = &[
    "this character",
    "this item",
    "this location",
    "this card",
    "he",
    "she",
    "it",
    "they",
];

/// Map a trigger subject phrase to an actor restriction
pub fn actor_for_subject(subject: &str) -> Actor {
    let subject = subject.trim();
    if SELF_REFERENCES.contains(&subject) {
        Actor::This
    } else if subject.starts_with("another")
        || subject.contains("your other")
        || subject.contains("of your other")
    {
        Actor::YourOther
    } else if subject.contains("opposing") || subject.contains("opponent") {
        Actor::Opponent
    } else if subject.starts_with("you") || subject.contains("your ") || subject.contains("of yours") {
        Actor::Yours
    } else {
        Actor::Any
    }
}

const FILTER_STOPWORDS: &[&str] = &[
    "a", "an", "another", "one", "of", "your", "other", "opposing", "this", "chosen", "damaged", "exerted",
    "ready", "their", "any", "yours", "each",
];

/// Type and classification restrictions named in a subject phrase
pub fn filter_for_subject(subject: &str) -> TriggerFilter {
    let mut filter = TriggerFilter::default();
    if SELF_REFERENCES.contains(&subject.trim()) {
        return filter;
    }
    let words: Vec<&str> = subject.split_whitespace().collect();

    let type_pos = words.iter().position(|w| {
        let singular = w.trim_end_matches('s');
        CardType::from_noun(w).is_some() || singular == "song" || singular == "card"
    });
    if let Some(pos) = type_pos {
        let noun = words[pos];
        if noun.trim_end_matches('s') == "song" {
            filter.song = true;
            filter.card_type = Some(CardType::Action);
        } else {
            filter.card_type = CardType::from_noun(noun);
        }
        if pos > 0 {
            let before = words[pos - 1];
            if !FILTER_STOPWORDS.contains(&before) {
                filter.classification = Some(Classification::new(before));
            }
        }
        // "a character with cost 2 or less"
        let tail = &words[pos + 1..];
        if let ["with", "cost", n, "or", "less", ..] = tail {
            filter.max_cost = number_word(n).and_then(|v| u8::try_from(v).ok());
        }
    }
    filter
}

fn played_subject(caps: &Captures) -> Option<(Actor, TriggerFilter)> {
    let who = caps.name("who")?.as_str();
    let subject = caps.name("subj")?.as_str();
    let filter = filter_for_subject(subject);
    let actor = match who {
        "an opponent" => Actor::Opponent,
        "a player" | "each player" => Actor::Any,
        _ => match actor_for_subject(subject) {
            Actor::This => Actor::This,
            Actor::YourOther => Actor::YourOther,
            _ => Actor::Yours,
        },
    };
    Some((actor, filter))
}

fn singer_subject(caps: &Captures) -> Option<(Actor, TriggerFilter)> {
    let subject = caps.name("subj")?.as_str();
    let actor = match subject {
        "you" => Actor::Yours,
        other => actor_for_subject(other),
    };
    let filter = TriggerFilter {
        card_type: Some(CardType::Action),
        song: true,
        ..TriggerFilter::default()
    };
    Some((actor, filter))
}

fn plain_subject(caps: &Captures) -> Option<(Actor, TriggerFilter)> {
    let subject = caps.name("subj")?.as_str();
    Some((actor_for_subject(subject), filter_for_subject(subject)))
}

fn banisher_subject(caps: &Captures) -> Option<(Actor, TriggerFilter)> {
    let (actor, mut filter) = plain_subject(caps)?;
    filter.banisher = true;
    filter.in_challenge = caps.get(0)?.as_str().ends_with(" in a challenge");
    Some((actor, filter))
}

fn challenge_banish_subject(caps: &Captures) -> Option<(Actor, TriggerFilter)> {
    let (actor, mut filter) = plain_subject(caps)?;
    filter.in_challenge = true;
    Some((actor, filter))
}

fn player_subject(caps: &Captures) -> Option<(Actor, TriggerFilter)> {
    let actor = match caps.name("who")?.as_str() {
        "you" => Actor::Yours,
        "a player" => Actor::Any,
        _ => Actor::Opponent,
    };
    Some((actor, TriggerFilter::default()))
}

fn turn_subject(caps: &Captures) -> Option<(Actor, TriggerFilter)> {
    let actor = match caps.name("whose")?.as_str() {
        "your" => Actor::Yours,
        "each opponent's" | "an opponent's" => Actor::Opponent,
        // "at the end of the turn" only appears on delayed effects; treat as any
        _ => Actor::Any,
    };
    Some((actor, TriggerFilter::default()))
}
