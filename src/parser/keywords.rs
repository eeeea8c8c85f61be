//! Keyword ability table
//!
//! Process-wide, read-only map from keyword to a builder that produces the
//! complete ability for a given numeric value. Keywords bypass the general
//! parser; an unknown keyword name, or a numbered keyword printed without its
//! number, falls back to it on the reminder text.

use crate::core::{
    AbilityKind, Actor, Amount, CardFilter, Cost, CostList, Duration, DynamicAmount, Effect, Keyword, OwnerFilter,
    RawAbility, Stat, SubstitutionMode, TargetSelector, TriggerDescriptor, TriggerEvent,
};
use crate::parser::assemble::AbilityDraft;
use crate::parser::normalize::normalize;
use lazy_static::lazy_static;
use rustc_hash::FxHashMap;
use smallvec::smallvec;

type KeywordBuilder = fn(Option<u32>) -> Option<AbilityDraft>;

lazy_static! {
    static ref KEYWORD_TABLE: FxHashMap<Keyword, KeywordBuilder> = {
        let mut table: FxHashMap<Keyword, KeywordBuilder> = FxHashMap::default();
        table.insert(Keyword::Ward, |_| Some(passive(Keyword::Ward, None)));
        table.insert(Keyword::Evasive, |_| Some(passive(Keyword::Evasive, None)));
        table.insert(Keyword::Bodyguard, |_| Some(passive(Keyword::Bodyguard, None)));
        table.insert(Keyword::Reckless, |_| Some(passive(Keyword::Reckless, None)));
        table.insert(Keyword::Rush, |_| Some(passive(Keyword::Rush, None)));
        table.insert(Keyword::Vanish, |_| Some(passive(Keyword::Vanish, None)));
        table.insert(Keyword::Challenger, |v| v.map(|n| passive(Keyword::Challenger, Some(n))));
        table.insert(Keyword::Resist, resist);
        table.insert(Keyword::Shift, shift);
        table.insert(Keyword::Singer, |v| substitution(v, SubstitutionMode::Singer));
        table.insert(Keyword::SingTogether, |v| substitution(v, SubstitutionMode::SingTogether));
        table.insert(Keyword::Support, support);
        table
    };
}

fn passive(keyword: Keyword, value: Option<u32>) -> AbilityDraft {
    AbilityDraft::new(AbilityKind::Static, vec![Effect::Keyword { keyword, value }], "")
}

/// Resist +N: damage dealt to this character is reduced by N
fn resist(value: Option<u32>) -> Option<AbilityDraft> {
    Some(AbilityDraft::new(
        AbilityKind::Static,
        vec![Effect::DamageReduction { amount: value? }],
        "",
    ))
}

/// Shift N: pay N ink to play this on top of a same-named character
fn shift(value: Option<u32>) -> Option<AbilityDraft> {
    let cost = value?;
    let mut draft = AbilityDraft::new(AbilityKind::Activated, vec![Effect::AlternateCost { cost }], "");
    draft.costs = smallvec![Cost::PayInk(cost)];
    Some(draft)
}

fn substitution(value: Option<u32>, mode: SubstitutionMode) -> Option<AbilityDraft> {
    Some(AbilityDraft::new(
        AbilityKind::Static,
        vec![Effect::CostSubstitution { value: value?, mode }],
        "",
    ))
}

/// Support: whenever this quests, you may add its strength to another chosen
/// character of yours this turn
fn support(_: Option<u32>) -> Option<AbilityDraft> {
    let mut draft = AbilityDraft::new(
        AbilityKind::Triggered,
        vec![Effect::ModifyStat {
            stat: Stat::Strength,
            delta: 1,
            per: Some(DynamicAmount::SelfStat(Stat::Strength)),
            target: TargetSelector::chosen(CardFilter::characters().owned_by(OwnerFilter::You).other()),
            duration: Duration::ThisTurn,
            optional: true,
        }],
        "",
    );
    draft.triggers = vec![TriggerDescriptor::new(TriggerEvent::OnQuest, Actor::This)];
    Some(draft)
}

/// Build the ability for a keyword
///
/// `None` for a numbered keyword ("Resist", "Shift") given no number.
pub fn build(keyword: Keyword, value: Option<u32>) -> Option<AbilityDraft> {
    match KEYWORD_TABLE.get(&keyword) {
        Some(builder) => builder(value),
        // Every Keyword variant has an entry; this arm only guards table edits
        None => Some(passive(keyword, value)),
    }
}

/// Split "resist +2", "shift 5", "sing together 10" into name and value
pub fn split_keyword_line(line: &str) -> Option<(Keyword, Option<u32>)> {
    let line = line.trim().trim_end_matches('.');
    if let Some(keyword) = Keyword::from_name(line) {
        return Some((keyword, None));
    }
    let (name, value) = line.rsplit_once(' ')?;
    let keyword = Keyword::from_name(name)?;
    let value = value.trim_start_matches('+').parse().ok()?;
    Some((keyword, Some(value)))
}

/// Draft for a declared keyword entry
///
/// `None` when the keyword is unknown or its number is missing.
pub fn draft_for(raw: &RawAbility) -> Option<AbilityDraft> {
    let text = normalize(raw.text());
    let (keyword, parsed_value) = match raw.keyword.as_deref().and_then(Keyword::from_name) {
        Some(keyword) => (keyword, None),
        None => {
            // No usable keyword field: try the printed text ("Resist +1 (...)")
            let head = text.split('(').next().unwrap_or("");
            split_keyword_line(head)?
        }
    };
    let value = raw.keyword_number().or(parsed_value).or_else(|| {
        let head = text.split('(').next().unwrap_or("");
        split_keyword_line(head).and_then(|(_, v)| v)
    });

    let mut draft = build(keyword, value)?;
    draft.name = raw.name.clone();
    draft.source_text = raw.full_text.clone().unwrap_or_else(|| raw.text().to_string());
    Some(draft)
}
