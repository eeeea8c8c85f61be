//! Effect clause segmenter
//!
//! Splits effect prose into independent clauses: sentences, ", then ", ";" and
//! " and " between two action clauses. Sentences opening with a guard
//! ("while", "if", "during your turn,") stay whole; the effect parser segments
//! their remainder itself.

use crate::parser::normalize::strip_parentheticals;

/// Verbs that start an action clause
const ACTION_VERBS: &[&str] = &[
    "draw", "draws", "deal", "deals", "gain", "gains", "lose", "loses", "banish", "return", "put", "discard",
    "discards", "exert", "ready", "remove", "move", "play", "look", "reveal", "shuffle", "get", "gets", "pay",
    "chooses", "choose", "can't", "may",
];

/// Subjects that may precede an action verb
const SUBJECTS: &[&str] = &[
    "you may ",
    "you ",
    "each opponent ",
    "each player ",
    "chosen opponent ",
    "chosen player ",
    "they ",
    "he ",
    "she ",
    "it ",
    "that character ",
    "this character ",
    "this item ",
    "chosen character ",
    "your characters ",
    "your other characters ",
];

const DURATION_SUFFIXES: &[&str] = &[" this turn", " until the start of your next turn", " during their next turn"];

/// Ordered clause list for a block of effect prose
pub fn segment(text: &str) -> Vec<String> {
    let text = strip_parentheticals(text);
    let mut clauses = Vec::new();
    for sentence in sentences(&text) {
        if is_guarded(sentence) {
            clauses.push(sentence.to_string());
            continue;
        }
        for part in split_sequence(sentence) {
            clauses.extend(split_coordination(part));
        }
    }
    clauses
}

/// Sentence split on periods followed by a space or the end of text
pub fn sentences(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let bytes = text.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'.' || b == b'!' {
            let at_end = i + 1 == bytes.len();
            let before_space = bytes.get(i + 1) == Some(&b' ');
            if at_end || before_space {
                push_trimmed(&mut out, &text[start..i]);
                start = i + 1;
            }
        }
    }
    push_trimmed(&mut out, &text[start..]);
    out
}

fn push_trimmed<'a>(out: &mut Vec<&'a str>, piece: &'a str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        out.push(piece);
    }
}

/// Conditional and replacement sentences are parsed as one unit
fn is_guarded(sentence: &str) -> bool {
    sentence.starts_with("while ")
        || sentence.starts_with("if ")
        || sentence.starts_with("during your turn, ")
        || sentence.starts_with("during an opponent's turn, ")
        || sentence.ends_with(" instead")
}

/// ", then " and ";" separate sequential steps
fn split_sequence(sentence: &str) -> Vec<&str> {
    sentence
        .split(';')
        .flat_map(|s| s.split(", then "))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Strip a known subject and report whether an action verb follows
fn verb_led(clause: &str) -> bool {
    let mut rest = clause.trim_start();
    for subject in SUBJECTS {
        if let Some(stripped) = rest.strip_prefix(subject) {
            rest = stripped;
            break;
        }
    }
    let first = rest.split_whitespace().next().unwrap_or("");
    ACTION_VERBS.contains(&first)
}

fn bare_verb(clause: &str) -> bool {
    let first = clause.split_whitespace().next().unwrap_or("");
    ACTION_VERBS.contains(&first)
}

/// Subject a split-off bare verb clause inherits ("chosen character gets ... and gains ...")
fn carried_subject(left: &str) -> Option<&'static str> {
    if left.starts_with("you ") || bare_verb(left) {
        return None;
    }
    Some("that character ")
}

/// Split " and " only where both sides are action clauses
fn split_coordination(part: &str) -> Vec<String> {
    let mut pieces: Vec<String> = Vec::new();
    let mut rest = part;

    loop {
        let mut split_at = None;
        let mut search_from = 0;
        while let Some(found) = rest[search_from..].find(" and ") {
            let pos = search_from + found;
            let left = rest[..pos].trim_end_matches(',');
            let right = &rest[pos + " and ".len()..];
            let choose_and = left.ends_with(" choose") || left.ends_with(" chooses") || left == "choose";
            if !choose_and && verb_led(left) && verb_led(right) {
                split_at = Some((left, right));
                break;
            }
            search_from = pos + " and ".len();
        }

        match split_at {
            Some((left, right)) => {
                pieces.push(left.trim().to_string());
                if bare_verb(right) {
                    if let Some(subject) = carried_subject(left.trim()) {
                        // Recurse on the rewritten tail so it can split again
                        let carried = format!("{subject}{right}");
                        pieces.extend(split_coordination(&carried));
                        break;
                    }
                }
                rest = right;
            }
            None => {
                pieces.push(rest.trim().to_string());
                break;
            }
        }
    }

    share_trailing_duration(&mut pieces);
    pieces
}

/// "gets +1 {s} and gains evasive this turn": the duration covers both halves
fn share_trailing_duration(pieces: &mut [String]) {
    if pieces.len() < 2 {
        return;
    }
    let Some(duration) = pieces
        .last()
        .and_then(|last| DURATION_SUFFIXES.iter().find(|d| last.ends_with(*d)))
    else {
        return;
    };
    let n = pieces.len();
    for piece in &mut pieces[..n - 1] {
        if !DURATION_SUFFIXES.iter().any(|d| piece.ends_with(d)) && piece.contains(" gets ") {
            piece.push_str(duration);
        }
    }
}
