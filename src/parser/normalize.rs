//! Text normalization ahead of classification and template matching
//!
//! Card data spells the same symbol several ways (`⟳`, `{E}`, `[exert]`).
//! Everything downstream matches against one canonical lowercase form:
//!
//! | symbol | token |
//! |---|---|
//! | exert | `{e}` |
//! | ink | `{i}` |
//! | strength | `{s}` |
//! | willpower | `{w}` |
//! | lore | `{l}` |
//!
//! Em and en dashes (and a spaced hyphen) become the cost delimiter ` -- `.

use crate::core::costs::COST_DELIMITER;

const GLYPHS: &[(char, &str)] = &[
    ('⟳', "{e}"),
    ('⬡', "{i}"),
    ('¤', "{s}"),
    ('⛉', "{w}"),
    ('◊', "{l}"),
    ('—', COST_DELIMITER),
    ('–', COST_DELIMITER),
];

const SPELLINGS: &[(&str, &str)] = &[
    ("[exert]", "{e}"),
    ("[ink]", "{i}"),
    ("[strength]", "{s}"),
    ("[willpower]", "{w}"),
    ("[lore]", "{l}"),
    ("{iw}", "{i}"),
    ("{ink}", "{i}"),
];

/// Canonical lowercase form of a piece of rules text
pub fn normalize(text: &str) -> String {
    let mut glyphs_replaced = String::with_capacity(text.len() + 8);
    for ch in text.chars() {
        match GLYPHS.iter().find(|(g, _)| *g == ch) {
            Some((_, token)) => glyphs_replaced.push_str(token),
            None => glyphs_replaced.push(ch),
        }
    }

    // Transliterate curly quotes, ellipses and accented letters
    let mut out = deunicode::deunicode(&glyphs_replaced).to_lowercase();
    for (spelling, token) in SPELLINGS {
        if out.contains(spelling) {
            out = out.replace(spelling, token);
        }
    }
    collapse_whitespace(&out).replace(" - ", COST_DELIMITER)
}

/// Single-space the text and trim the ends
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Drop a leading ability name ("CAREFUL AIM {e}, 2 {i} -- ...") from full text
pub fn strip_name<'a>(text: &'a str, name: &str) -> &'a str {
    let name = normalize(name);
    if name.is_empty() {
        return text;
    }
    match text.strip_prefix(name.as_str()) {
        Some(rest) => rest.trim_start(),
        None => text,
    }
}

/// Remove every parenthesized span, keeping the surrounding text
pub fn strip_parentheticals(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut depth = 0usize;
    for ch in text.chars() {
        match ch {
            '(' => depth += 1,
            ')' if depth > 0 => depth -= 1,
            _ if depth == 0 => out.push(ch),
            _ => {}
        }
    }
    collapse_whitespace(&out)
}

/// Parse a small number word or digits ("a", "two", "3")
pub fn number_word(word: &str) -> Option<u32> {
    match word {
        "a" | "an" | "one" => Some(1),
        "two" => Some(2),
        "three" => Some(3),
        "four" => Some(4),
        "five" => Some(5),
        _ => word.parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyphs_become_tokens() {
        assert_eq!(
            normalize("⟳, 2 ⬡ — Chosen character gets -2 ¤ this turn."),
            "{e}, 2 {i} -- chosen character gets -2 {s} this turn."
        );
    }

    #[test]
    fn test_bracket_spellings() {
        assert_eq!(
            normalize("{E}, 2 {I} - Chosen character gets -2 {S} this turn."),
            "{e}, 2 {i} -- chosen character gets -2 {s} this turn."
        );
        assert_eq!(normalize("Gain 2 [lore]."), "gain 2 {l}.");
    }

    #[test]
    fn test_curly_quotes_and_spacing() {
        assert_eq!(normalize("  Can’t   quest  "), "can't quest");
    }

    #[test]
    fn test_strip_name() {
        let text = normalize("CAREFUL AIM ⟳, 2 ⬡ — Banish chosen item.");
        assert_eq!(strip_name(&text, "CAREFUL AIM"), "{e}, 2 {i} -- banish chosen item.");
        assert_eq!(strip_name(&text, "OTHER"), text.as_str());
    }

    #[test]
    fn test_strip_parentheticals() {
        assert_eq!(
            strip_parentheticals("shift 5 (you may pay 5 {i} to play this.) and more"),
            "shift 5 and more"
        );
    }

    #[test]
    fn test_number_word() {
        assert_eq!(number_word("a"), Some(1));
        assert_eq!(number_word("three"), Some(3));
        assert_eq!(number_word("12"), Some(12));
        assert_eq!(number_word("x"), None);
    }
}
