//! Rules-text parser
//!
//! `parse(card)` turns a card's printed abilities into typed
//! `AbilityDefinition`s. The parser is a pure function of its input: no I/O,
//! no randomness, no logging. Text it does not understand degrades to
//! `Effect::Unparsed` / `Cost::Opaque`, and `parse_with_report` exposes the
//! recognition numbers for diagnostics.
//!
//! Pipeline per raw ability:
//!
//! 1. per-card exceptions table
//! 2. keyword table for declared keywords
//! 3. normalize, classify, then cost or trigger extraction
//! 4. clause segmentation and template matching
//! 5. assembly with deterministic ids and structural validation

pub mod assemble;
pub mod classify;
pub mod condition;
pub mod effect;
pub mod exceptions;
pub mod keywords;
pub mod normalize;
pub mod segment;
pub mod target;
pub mod trigger;

pub use assemble::{assemble, AbilityDraft};
pub use effect::{parse_clause, parse_effects};

use crate::core::{
    AbilityDefinition, AbilityKind, CardDefinition, CardType, Effect, RawAbility, RawAbilityType, SubstitutionMode,
};
use classify::{classify, strip_leading_reminder, AbilityShape};
use lazy_static::lazy_static;
use normalize::{normalize, strip_name};
use regex::Regex;
use serde::Serialize;

lazy_static! {
    static ref SONG_REMINDER: Regex = Regex::new(
        r"^(?:a )?characters? with cost (?P<n>\d+) or more can (?:\{e\} to )?sing this song for free"
    )
    .expect("valid regex");
}

/// Parse every ability on a card
pub fn parse(card: &CardDefinition) -> Vec<AbilityDefinition> {
    parse_with_report(card).abilities
}

/// Parse diagnostics for one card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseReport {
    pub card_id: String,
    pub card_name: String,
    pub abilities: Vec<AbilityDefinition>,
    /// Notes on which path each raw ability took
    pub annotations: Vec<String>,
    /// Effect leaves produced, counting inside wrappers
    pub clauses: usize,
    pub unparsed: usize,
    pub opaque_costs: usize,
    /// Abilities dropped for breaking a structural invariant
    pub violations: Vec<String>,
    /// Ability entries declared in card data
    pub declared: usize,
}

impl ParseReport {
    fn new(card: &CardDefinition) -> Self {
        ParseReport {
            card_id: card.id.clone(),
            card_name: card.full_name(),
            abilities: Vec::new(),
            annotations: Vec::new(),
            clauses: 0,
            unparsed: 0,
            opaque_costs: 0,
            violations: Vec::new(),
            declared: card.abilities.len(),
        }
    }

    pub fn recognized(&self) -> usize {
        self.clauses - self.unparsed
    }

    /// At least one definition per declared ability
    pub fn meets_floor(&self) -> bool {
        self.abilities.len() >= self.declared
    }

    pub fn summary_line(&self) -> String {
        format!(
            "{} ({}): {} of {} ability clauses recognized, {} abilities from {} declared{}",
            self.card_name,
            self.card_id,
            self.recognized(),
            self.clauses,
            self.abilities.len(),
            self.declared,
            if self.meets_floor() { "" } else { " [BELOW FLOOR]" }
        )
    }

    fn record(&mut self, def: AbilityDefinition) {
        self.clauses += def.effects.iter().map(leaf_count).sum::<usize>();
        self.unparsed += def.unparsed_count();
        self.opaque_costs += def.costs.iter().filter(|c| c.is_opaque()).count();
        self.abilities.push(def);
    }
}

fn leaf_count(effect: &Effect) -> usize {
    match effect {
        Effect::Conditional { effects, .. } => effects.iter().map(leaf_count).sum::<usize>().max(1),
        Effect::Replacement { substitute, .. } => substitute.iter().map(leaf_count).sum::<usize>().max(1),
        _ => 1,
    }
}

/// Parse a card and keep the diagnostics
pub fn parse_with_report(card: &CardDefinition) -> ParseReport {
    let mut report = ParseReport::new(card);
    let mut next_ordinal = 0usize;

    for raw in &card.abilities {
        let (drafts, note) = drafts_for(card, raw);
        if let Some(note) = note {
            report.annotations.push(format!("{}: {note}", label(raw)));
        }
        for draft in drafts {
            for result in assemble(&card.id, draft, &mut next_ordinal) {
                match result {
                    Ok(def) => report.record(def),
                    Err(err) => report.violations.push(err.to_string()),
                }
            }
        }
    }
    report
}

/// Parse a single piece of rules text as if it were one ability on a card
pub fn parse_text(text: &str, declared: RawAbilityType) -> ParseReport {
    let mut card = CardDefinition::new("adhoc", "Ad Hoc", CardType::Character, 0);
    card.abilities.push(RawAbility {
        ability_type: declared,
        name: None,
        effect: Some(text.to_string()),
        full_text: Some(text.to_string()),
        keyword: None,
        keyword_value: None,
    });
    if declared == RawAbilityType::Keyword {
        if let Some((keyword, _)) = keywords::split_keyword_line(&normalize(text)) {
            card.abilities[0].keyword = Some(keyword.name().to_string());
        }
    }
    parse_with_report(&card)
}

fn label(raw: &RawAbility) -> String {
    raw.name
        .clone()
        .or_else(|| raw.keyword.clone())
        .unwrap_or_else(|| raw.text().chars().take(32).collect())
}

fn source_text(raw: &RawAbility) -> String {
    raw.full_text.clone().unwrap_or_else(|| raw.text().to_string())
}

/// Drafts for one raw ability plus an optional note on the path taken
fn drafts_for(card: &CardDefinition, raw: &RawAbility) -> (Vec<AbilityDraft>, Option<String>) {
    if let Some(drafts) = exceptions::lookup(card, raw) {
        return (drafts, Some("exceptions table".to_string()));
    }

    if raw.ability_type == RawAbilityType::Keyword {
        if let Some(draft) = keywords::draft_for(raw) {
            return (vec![draft], None);
        }
        // Unknown keyword or a missing number: read its reminder text instead
        let text = normalize(raw.text());
        let reminder = match text.find('(') {
            Some(start) => strip_leading_reminder(&text[start..]).0.unwrap_or(&text).to_string(),
            None => text.clone(),
        };
        let (mut draft, _) = draft_from_text(RawAbilityType::Static, &reminder);
        draft.name = raw.name.clone();
        draft.source_text = source_text(raw);
        return (vec![draft], Some("keyword not built, parsed from reminder text".to_string()));
    }

    let normalized = normalize(raw.text());
    let effect_missing = raw.effect.as_deref().map_or(true, |e| e.trim().is_empty());
    let text = match &raw.name {
        // Full text carries the ability name in front
        Some(name) if effect_missing => strip_name(&normalized, name).to_string(),
        _ => normalized,
    };
    let (mut draft, note) = draft_from_text(raw.ability_type, &text);
    let note = note.or_else(|| {
        (raw.ability_type == RawAbilityType::Triggered && draft.kind != AbilityKind::Triggered)
            .then(|| "no trigger recognized, treated as static".to_string())
    });
    draft.name = raw.name.clone();
    draft.source_text = source_text(raw);
    (vec![draft], note)
}

/// Classify and parse normalized text, noting any trigger text left unread
fn draft_from_text(declared: RawAbilityType, text: &str) -> (AbilityDraft, Option<String>) {
    let (_, body) = strip_leading_reminder(text);

    // "whenever this character would be dealt damage, ... instead" is a
    // replacement, not a trigger
    if body.trim_end_matches('.').ends_with(" instead") && body.contains(" would be ") {
        return (AbilityDraft::new(AbilityKind::Static, parse_effects(body), text), None);
    }

    let draft = match classify(declared, text) {
        AbilityShape::Keyword => static_draft(body, text),
        AbilityShape::Reminder(reminder) => match SONG_REMINDER.captures(reminder).and_then(|caps| caps["n"].parse().ok()) {
            Some(value) => AbilityDraft::new(
                AbilityKind::Static,
                vec![Effect::CostSubstitution {
                    value,
                    mode: SubstitutionMode::SongReminder,
                }],
                text,
            ),
            None => AbilityDraft::new(AbilityKind::Static, parse_effects(reminder), text),
        },
        AbilityShape::Activated { costs, effect_text } => {
            let mut draft = AbilityDraft::new(AbilityKind::Activated, parse_effects(effect_text), text);
            draft.costs = costs;
            draft
        }
        AbilityShape::Triggered => match trigger::extract(body) {
            Some(extracted) => {
                let mut draft = AbilityDraft::new(AbilityKind::Triggered, parse_effects(extracted.effect_text), text);
                draft.triggers = extracted.triggers;
                let note = (!extracted.unmatched.is_empty())
                    .then(|| format!("trigger clause not recognized: \"{}\"", extracted.unmatched.join("\", \"")));
                return (draft, note);
            }
            None => static_draft(body, text),
        },
        AbilityShape::Static => static_draft(body, text),
    };
    (draft, None)
}

/// Static text, which may be a bare keyword line ("evasive", "shift 5")
fn static_draft(body: &str, text: &str) -> AbilityDraft {
    let head = body.split('(').next().unwrap_or("");
    if let Some(mut draft) = keywords::split_keyword_line(head).and_then(|(keyword, value)| keywords::build(keyword, value)) {
        draft.source_text = text.to_string();
        return draft;
    }
    AbilityDraft::new(AbilityKind::Static, parse_effects(body), text)
}

/// Aggregate over a card corpus
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CorpusSummary {
    pub cards: usize,
    pub abilities: usize,
    pub declared: usize,
    pub clauses: usize,
    pub unparsed: usize,
    pub opaque_costs: usize,
    pub violations: usize,
    /// Cards that produced fewer definitions than declared abilities
    pub below_floor: Vec<String>,
}

impl CorpusSummary {
    pub fn add(&mut self, report: &ParseReport) {
        self.cards += 1;
        self.abilities += report.abilities.len();
        self.declared += report.declared;
        self.clauses += report.clauses;
        self.unparsed += report.unparsed;
        self.opaque_costs += report.opaque_costs;
        self.violations += report.violations.len();
        if !report.meets_floor() {
            self.below_floor.push(report.card_name.clone());
        }
    }

    pub fn from_reports<'a>(reports: impl IntoIterator<Item = &'a ParseReport>) -> Self {
        let mut summary = CorpusSummary::default();
        for report in reports {
            summary.add(report);
        }
        summary
    }

    /// Share of effect clauses recognized, 0.0 to 1.0
    pub fn recognition_rate(&self) -> f64 {
        if self.clauses == 0 {
            return 1.0;
        }
        (self.clauses - self.unparsed) as f64 / self.clauses as f64
    }
}
