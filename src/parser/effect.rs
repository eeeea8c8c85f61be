//! Effect primitive parser
//!
//! Each clause is tried against an ordered template list, most specific
//! first. A template is a regex plus a builder over its captures. The first
//! regex that matches commits: if its builder rejects the captures the clause
//! becomes `Unparsed` rather than falling through to a later template.
//!
//! Wrappers are peeled before the template list: replacement ("... would be
//! dealt damage, ... instead"), guards ("while ...,", "if ...,", "during your
//! turn,") and "you may".

use crate::core::{
    Amount, CardFilter, CardType, Classification, Condition, Duration, DynamicAmount, Effect, Keyword, KeywordGrant,
    OwnerFilter, ReplacedEvent, RestrictedAction, Stat, TargetSelector,
};
use crate::parser::condition::parse_condition;
use crate::parser::keywords::split_keyword_line;
use crate::parser::normalize::number_word;
use crate::parser::segment::segment;
use crate::parser::target::{parse_filter, parse_target};
use crate::zones::Zone;
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use smallvec::SmallVec;

type Builder = fn(&Captures) -> Option<Vec<Effect>>;

struct Template {
    name: &'static str,
    regex: Regex,
    build: Builder,
}

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).expect("effect template must compile")
}

/// Player subjects accepted in front of player-directed verbs
const WHO: &str = r"(?:(?P<who>you|each player|each opponent|chosen player|chosen opponent) )?";

fn keyword_alternation() -> String {
    let names: Vec<String> = Keyword::ALL
        .iter()
        .map(|k| regex::escape(&k.name().to_lowercase()))
        .collect();
    format!("(?:{})", names.join("|"))
}

lazy_static! {
    static ref TEMPLATES: Vec<Template> = {
        let kw = keyword_alternation();
        let kw_item = format!(r"{kw}(?: \+?\d+)?");
        vec![
            Template {
                name: "draw-equal",
                regex: re(&format!(r"^{WHO}draws? cards equal to (?P<formula>.+)$")),
                build: build_draw_equal,
            },
            Template {
                name: "draw",
                regex: re(&format!(r"^{WHO}draws? (?P<n>\w+) cards?(?: for each (?P<per>.+))?$")),
                build: build_draw,
            },
            Template {
                name: "gain-lore-equal",
                regex: re(&format!(r"^{WHO}gains? lore equal to (?P<formula>.+)$")),
                build: build_gain_lore_equal,
            },
            Template {
                name: "gain-lore",
                regex: re(&format!(r"^{WHO}gains? (?P<n>\w+) lore(?: for each (?P<per>.+))?$")),
                build: build_gain_lore,
            },
            Template {
                name: "lose-lore",
                regex: re(&format!(r"^{WHO}loses? (?P<n>\w+) lore$")),
                build: build_lose_lore,
            },
            Template {
                name: "damage-equal",
                regex: re(r"^deal damage to (?P<target>.+?) equal to (?P<formula>.+)$"),
                build: build_damage_equal,
            },
            Template {
                name: "damage",
                regex: re(r"^deal (?P<n>\w+) damage to (?P<target>.+?)(?: for each (?P<per>.+))?$"),
                build: build_damage,
            },
            Template {
                name: "damage-counters",
                regex: re(r"^put (?P<n>\w+) damage counters? on (?P<target>.+)$"),
                build: build_damage,
            },
            Template {
                name: "modify-stat",
                regex: re(
                    r"^(?P<target>.+?) gets? (?P<deltas>[+-]\d+ \{[swl]\}(?:,? and [+-]\d+ \{[swl]\})*)(?P<tail>.*)$",
                ),
                build: build_modify_stat,
            },
            Template {
                name: "remove-damage",
                regex: re(r"^remove (?P<amt>up to \w+|all|\w+) damage from (?P<target>.+)$"),
                build: build_remove_damage,
            },
            Template {
                name: "banish",
                regex: re(r"^banish (?P<target>.+)$"),
                build: build_banish,
            },
            Template {
                name: "return-to-hand",
                regex: re(
                    r"^return (?P<target>.+?) to (?:your|their|its|his|her)(?: owner's| owners'| player's)? hands?$",
                ),
                build: build_return,
            },
            Template {
                name: "inkwell",
                regex: re(
                    r"^put (?P<target>.+?) into (?:your|their|its owner's|their owner's) inkwell(?: facedown)?(?: and exerted)?$",
                ),
                build: build_inkwell,
            },
            Template {
                name: "discard",
                regex: re(&format!(
                    r"^{WHO}(?:chooses? and )?discards? (?P<n>a|an|\w+) cards?(?P<random> at random)?$"
                )),
                build: build_discard,
            },
            Template {
                name: "shuffle-into-deck",
                regex: re(r"^shuffle (?P<target>.+?) into (?:your|their|its owner's|their owner's) deck$"),
                build: build_shuffle,
            },
            Template {
                name: "exert",
                regex: re(r"^exert (?P<target>.+)$"),
                build: build_exert,
            },
            Template {
                name: "ready",
                regex: re(r"^ready (?P<target>.+)$"),
                build: build_ready,
            },
            Template {
                name: "restriction",
                regex: re(
                    r"^(?P<target>.+?) can't (?P<action>quest|challenge|ready|be challenged|\{e\} to sing songs)(?P<tail>.*)$",
                ),
                build: build_restriction,
            },
            Template {
                name: "cost-reduction",
                regex: re(r"^you pay (?P<n>\d+) \{i\} less (?:to play|for) (?P<desc>.+?)(?P<tail> this turn)?$"),
                build: build_cost_reduction,
            },
            Template {
                name: "grant-keyword",
                regex: re(&format!(
                    r"^(?P<target>.+?) (?:gains?|ha(?:s|ve)) (?P<kws>{kw_item}(?:(?:, and |, | and ){kw_item})*)(?P<tail>.*)$"
                )),
                build: build_grant_keyword,
            },
        ]
    };

    static ref DAMAGE_REPLACEMENT: Regex =
        re(r"^(?:if|when(?:ever)?) (?P<subj>.+?) would be dealt damage, (?P<rest>.+?) instead$");
    static ref BANISH_REPLACEMENT: Regex =
        re(r"^(?:if|when(?:ever)?) (?P<subj>.+?) would be banished, (?P<rest>.+?) instead$");
    static ref GUARD: Regex = re(r"^(?:while|if) (?P<pred>[^,]+), (?P<rest>.+)$");
    static ref STAT_DELTA: Regex = re(r"(?P<sign>[+-])(?P<n>\d+) \{(?P<stat>[swl])\}");
}

/// Parse a block of effect prose into primitives, one or more per clause
pub fn parse_effects(text: &str) -> Vec<Effect> {
    segment(text).iter().flat_map(|clause| parse_clause(clause)).collect()
}

/// Parse one clause; never fails
pub fn parse_clause(clause: &str) -> Vec<Effect> {
    let clause = clause.trim().trim_end_matches(['.', ',']).trim();
    if clause.is_empty() {
        return Vec::new();
    }

    if let Some(effect) = parse_replacement(clause) {
        return vec![effect];
    }

    if let Some(rest) = clause.strip_prefix("if you do, ") {
        // Follows an optional step: the controller's choice covers both halves
        return optional(parse_effects(rest));
    }
    for (prefix, condition) in [
        ("during your turn, ", Condition::YourTurn),
        ("during an opponent's turn, ", Condition::OpponentsTurn),
    ] {
        if let Some(rest) = clause.strip_prefix(prefix) {
            return vec![Effect::Conditional {
                condition,
                effects: parse_effects(rest),
            }];
        }
    }
    if let Some(caps) = GUARD.captures(clause) {
        return vec![Effect::Conditional {
            condition: parse_condition(&caps["pred"]),
            effects: parse_effects(&caps["rest"]),
        }];
    }

    if let Some(rest) = clause.strip_prefix("you may ") {
        return optional(parse_clause(rest));
    }

    match_templates(clause)
}

fn optional(mut effects: Vec<Effect>) -> Vec<Effect> {
    for effect in &mut effects {
        effect.set_optional(true);
    }
    effects
}

fn unparsed(clause: &str) -> Vec<Effect> {
    vec![Effect::Unparsed {
        text: clause.to_string(),
    }]
}

fn match_templates(clause: &str) -> Vec<Effect> {
    for template in TEMPLATES.iter() {
        if let Some(caps) = template.regex.captures(clause) {
            return (template.build)(&caps).unwrap_or_else(|| unparsed(clause));
        }
    }
    unparsed(clause)
}

/// Name of the template that claims this clause, for diagnostics
pub fn template_for(clause: &str) -> Option<&'static str> {
    TEMPLATES
        .iter()
        .find(|t| t.regex.is_match(clause))
        .map(|t| t.name)
}

fn parse_replacement(clause: &str) -> Option<Effect> {
    if let Some(caps) = DAMAGE_REPLACEMENT.captures(clause) {
        let target = parse_target(&caps["subj"])?;
        return Some(Effect::Replacement {
            original: ReplacedEvent::DamageDealt { target },
            substitute: substitute_effects(&caps["rest"]),
        });
    }
    if let Some(caps) = BANISH_REPLACEMENT.captures(clause) {
        if parse_target(&caps["subj"]) != Some(TargetSelector::This) {
            return None;
        }
        return Some(Effect::Replacement {
            original: ReplacedEvent::SelfBanished,
            substitute: substitute_effects(&caps["rest"]),
        });
    }
    None
}

/// Empty for outright prevention
fn substitute_effects(rest: &str) -> Vec<Effect> {
    match rest {
        "prevent that damage" | "prevent it" | "that damage is prevented" | "it isn't banished" => Vec::new(),
        _ => parse_effects(rest),
    }
}

// ---------------------------------------------------------------------------
// Amounts and durations

fn player_target(caps: &Captures, default: TargetSelector) -> TargetSelector {
    match caps.name("who").map(|m| m.as_str()) {
        Some("you") => TargetSelector::You,
        Some("each player") => TargetSelector::AllPlayers,
        Some("each opponent") => TargetSelector::Opponents,
        Some("chosen player") => TargetSelector::ChosenPlayer,
        Some("chosen opponent") => TargetSelector::ChosenOpponent,
        _ => default,
    }
}

/// "2", or "2 ... for each X" when a per-clause is present
fn fixed_or_per(caps: &Captures) -> Option<Amount> {
    let n = number_word(&caps["n"])?;
    match caps.name("per") {
        // Only a single unit scales cleanly
        Some(per) if n == 1 => Some(Amount::Dynamic(parse_dynamic(&format!("for each {}", per.as_str())))),
        Some(_) => None,
        None => Some(Amount::Fixed(n)),
    }
}

/// "the number of characters you have in play", "for each card in your hand",
/// "this character's {s}", "the damage on him"
pub fn parse_dynamic(text: &str) -> DynamicAmount {
    let text = text.trim().trim_end_matches('.');
    let desc = text
        .strip_prefix("the number of ")
        .or_else(|| text.strip_prefix("for each "))
        .or_else(|| text.strip_prefix("1 for each "));

    if let Some(desc) = desc {
        if desc.starts_with("card") && desc.ends_with(" in your hand") {
            return DynamicAmount::CardsInHand { opponent: false };
        }
        if desc.starts_with("card") && desc.ends_with("opponent's hand") {
            return DynamicAmount::CardsInHand { opponent: true };
        }
        let yours = desc.contains(" you have in play") || desc.starts_with("your ");
        if let Some(mut filter) = parse_filter(desc) {
            if yours && filter.owner == OwnerFilter::Any {
                filter.owner = OwnerFilter::You;
            }
            return DynamicAmount::CountInPlay { filter };
        }
    }

    for subject in ["this character's ", "his ", "her ", "its "] {
        if let Some(stat) = text.strip_prefix(subject).and_then(stat_token) {
            return DynamicAmount::SelfStat(stat);
        }
    }
    if matches!(
        text,
        "the damage on this character" | "the damage on him" | "the damage on her" | "the damage on it"
    ) {
        return DynamicAmount::DamageOnSelf;
    }
    DynamicAmount::Formula(text.to_string())
}

fn stat_token(token: &str) -> Option<Stat> {
    match token.trim() {
        "{s}" | "s" => Some(Stat::Strength),
        "{w}" | "w" => Some(Stat::Willpower),
        "{l}" | "l" => Some(Stat::Lore),
        _ => None,
    }
}

/// Trailing duration phrase; `None` if the tail is something else
fn parse_duration(tail: &str) -> Option<Duration> {
    match tail.trim() {
        "" => Some(Duration::Permanent),
        "this turn" | "for the rest of this turn" => Some(Duration::ThisTurn),
        "until the start of your next turn" | "during their next turn" | "at the start of their next turn" => {
            Some(Duration::UntilStartOfYourNextTurn)
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Builders

fn build_draw_equal(caps: &Captures) -> Option<Vec<Effect>> {
    Some(vec![Effect::DrawCard {
        amount: Amount::Dynamic(parse_dynamic(&caps["formula"])),
        target: player_target(caps, TargetSelector::You),
        optional: false,
    }])
}

fn build_draw(caps: &Captures) -> Option<Vec<Effect>> {
    Some(vec![Effect::DrawCard {
        amount: fixed_or_per(caps)?,
        target: player_target(caps, TargetSelector::You),
        optional: false,
    }])
}

fn build_gain_lore_equal(caps: &Captures) -> Option<Vec<Effect>> {
    Some(vec![Effect::GainLore {
        amount: Amount::Dynamic(parse_dynamic(&caps["formula"])),
        target: player_target(caps, TargetSelector::You),
        optional: false,
    }])
}

fn build_gain_lore(caps: &Captures) -> Option<Vec<Effect>> {
    Some(vec![Effect::GainLore {
        amount: fixed_or_per(caps)?,
        target: player_target(caps, TargetSelector::You),
        optional: false,
    }])
}

fn build_lose_lore(caps: &Captures) -> Option<Vec<Effect>> {
    Some(vec![Effect::LoseLore {
        amount: Amount::Fixed(number_word(&caps["n"])?),
        target: player_target(caps, TargetSelector::You),
        optional: false,
    }])
}

fn build_damage_equal(caps: &Captures) -> Option<Vec<Effect>> {
    Some(vec![Effect::DealDamage {
        amount: Amount::Dynamic(parse_dynamic(&caps["formula"])),
        target: parse_target(&caps["target"])?,
        optional: false,
    }])
}

fn build_damage(caps: &Captures) -> Option<Vec<Effect>> {
    Some(vec![Effect::DealDamage {
        amount: fixed_or_per(caps)?,
        target: parse_target(&caps["target"])?,
        optional: false,
    }])
}

fn build_modify_stat(caps: &Captures) -> Option<Vec<Effect>> {
    let target = parse_target(&caps["target"])?;
    let tail = caps["tail"].trim();

    let (per, duration) = match parse_duration(tail) {
        Some(duration) => (None, duration),
        None => {
            // "for each X", possibly followed by a duration
            let (desc, duration) = match tail.strip_suffix(" this turn") {
                Some(rest) => (rest, Duration::ThisTurn),
                None => (tail, Duration::Permanent),
            };
            let desc = desc.strip_prefix("for each ")?;
            (Some(parse_dynamic(&format!("for each {desc}"))), duration)
        }
    };

    let mut effects = Vec::new();
    for delta in STAT_DELTA.captures_iter(&caps["deltas"]) {
        let magnitude: i32 = delta["n"].parse().ok()?;
        let signed = if &delta["sign"] == "-" { -magnitude } else { magnitude };
        effects.push(Effect::ModifyStat {
            stat: stat_token(&delta["stat"])?,
            delta: signed,
            per: per.clone(),
            target: target.clone(),
            duration,
            optional: false,
        });
    }
    Some(effects)
}

fn build_remove_damage(caps: &Captures) -> Option<Vec<Effect>> {
    let amt = &caps["amt"];
    let amount = if amt == "all" {
        Amount::All
    } else if let Some(n) = amt.strip_prefix("up to ") {
        Amount::UpTo(number_word(n)?)
    } else {
        Amount::Fixed(number_word(amt)?)
    };
    Some(vec![Effect::RemoveDamage {
        amount,
        target: parse_target(&caps["target"])?,
        optional: false,
    }])
}

fn move_zone(from: Option<Zone>, to: Zone, target: TargetSelector) -> Vec<Effect> {
    vec![Effect::MoveZone {
        from,
        to,
        target,
        optional: false,
    }]
}

fn build_banish(caps: &Captures) -> Option<Vec<Effect>> {
    Some(move_zone(Some(Zone::Play), Zone::Discard, parse_target(&caps["target"])?))
}

fn build_return(caps: &Captures) -> Option<Vec<Effect>> {
    let phrase = &caps["target"];
    match phrase.strip_suffix(" from your discard") {
        Some(desc) => {
            let mut target = parse_target(desc)?;
            if let TargetSelector::Chosen { filter, .. } | TargetSelector::Each { filter } = &mut target {
                filter.owner = OwnerFilter::You;
            }
            Some(move_zone(Some(Zone::Discard), Zone::Hand, target))
        }
        None => Some(move_zone(Some(Zone::Play), Zone::Hand, parse_target(phrase)?)),
    }
}

fn build_inkwell(caps: &Captures) -> Option<Vec<Effect>> {
    Some(move_zone(None, Zone::Inkwell, parse_target(&caps["target"])?))
}

fn build_discard(caps: &Captures) -> Option<Vec<Effect>> {
    let count = number_word(&caps["n"])?;
    let owner = match caps.name("who").map(|m| m.as_str()) {
        None | Some("you") => OwnerFilter::You,
        Some("each player") => OwnerFilter::Any,
        Some(_) => OwnerFilter::Opponent,
    };
    let filter = CardFilter {
        owner,
        ..CardFilter::default()
    };
    Some(move_zone(
        Some(Zone::Hand),
        Zone::Discard,
        TargetSelector::Chosen {
            filter,
            count,
            up_to: false,
        },
    ))
}

fn build_shuffle(caps: &Captures) -> Option<Vec<Effect>> {
    Some(move_zone(None, Zone::Deck, parse_target(&caps["target"])?))
}

fn build_exert(caps: &Captures) -> Option<Vec<Effect>> {
    Some(vec![Effect::Exert {
        target: parse_target(&caps["target"])?,
        optional: false,
    }])
}

fn build_ready(caps: &Captures) -> Option<Vec<Effect>> {
    Some(vec![Effect::Ready {
        target: parse_target(&caps["target"])?,
        optional: false,
    }])
}

fn build_restriction(caps: &Captures) -> Option<Vec<Effect>> {
    let action = match &caps["action"] {
        "quest" => RestrictedAction::Quest,
        "challenge" => RestrictedAction::Challenge,
        "ready" => RestrictedAction::Ready,
        "be challenged" => RestrictedAction::BeChallenged,
        _ => RestrictedAction::Sing,
    };
    Some(vec![Effect::Restriction {
        action,
        target: parse_target(&caps["target"])?,
        duration: parse_duration(&caps["tail"])?,
        optional: false,
    }])
}

fn build_cost_reduction(caps: &Captures) -> Option<Vec<Effect>> {
    let amount = caps["n"].parse().ok()?;
    let desc = caps["desc"].trim();
    let desc = desc.strip_prefix("the next ").unwrap_or(desc);
    let desc = desc.strip_suffix(" you play").unwrap_or(desc);

    let filter = if desc.contains("song") {
        CardFilter {
            card_type: Some(CardType::Action),
            classification: Some(Classification::new("Song")),
            ..CardFilter::default()
        }
    } else {
        parse_filter(desc)?
    };
    let duration = if caps.name("tail").is_some() {
        Duration::ThisTurn
    } else {
        Duration::Permanent
    };
    Some(vec![Effect::CostReduction {
        amount,
        filter,
        duration,
        optional: false,
    }])
}

fn build_grant_keyword(caps: &Captures) -> Option<Vec<Effect>> {
    let target = parse_target(&caps["target"])?;
    let duration = parse_duration(&caps["tail"])?;

    let mut keywords: SmallVec<[KeywordGrant; 2]> = SmallVec::new();
    for item in caps["kws"].split(", and ").flat_map(|s| s.split(", ")).flat_map(|s| s.split(" and ")) {
        let (keyword, value) = split_keyword_line(item)?;
        keywords.push(KeywordGrant { keyword, value });
    }
    Some(vec![Effect::GrantKeyword {
        keywords,
        target,
        duration,
        optional: false,
    }])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(text: &str) -> Effect {
        let effects = parse_effects(text);
        assert_eq!(effects.len(), 1, "expected one effect from {text:?}, got {effects:?}");
        effects.into_iter().next().unwrap()
    }

    #[test]
    fn test_optional_draw() {
        assert_eq!(
            single("you may draw a card."),
            Effect::DrawCard {
                amount: Amount::one(),
                target: TargetSelector::You,
                optional: true,
            }
        );
    }

    #[test]
    fn test_opponent_draws_and_loses() {
        assert_eq!(
            single("each opponent loses 1 lore"),
            Effect::LoseLore {
                amount: Amount::Fixed(1),
                target: TargetSelector::Opponents,
                optional: false,
            }
        );
        match single("each player draws 2 cards") {
            Effect::DrawCard { amount, target, .. } => {
                assert_eq!(amount, Amount::Fixed(2));
                assert_eq!(target, TargetSelector::AllPlayers);
            }
            other => panic!("Expected DrawCard, got {other:?}"),
        }
    }

    #[test]
    fn test_modify_stat_this_turn() {
        assert_eq!(
            single("chosen character gets -2 {s} this turn."),
            Effect::ModifyStat {
                stat: Stat::Strength,
                delta: -2,
                per: None,
                target: TargetSelector::chosen(CardFilter::characters()),
                duration: Duration::ThisTurn,
                optional: false,
            }
        );
    }

    #[test]
    fn test_modify_two_stats() {
        let effects = parse_effects("your characters get +1 {s} and +1 {w}");
        assert_eq!(effects.len(), 2);
        assert!(matches!(effects[1], Effect::ModifyStat { stat: Stat::Willpower, delta: 1, .. }));
    }

    #[test]
    fn test_modify_stat_for_each() {
        match single("this character gets +1 {s} for each other character you have in play") {
            Effect::ModifyStat { per, target, duration, .. } => {
                assert_eq!(target, TargetSelector::This);
                assert_eq!(duration, Duration::Permanent);
                match per {
                    Some(DynamicAmount::CountInPlay { filter }) => {
                        assert!(filter.other);
                        assert_eq!(filter.owner, OwnerFilter::You);
                    }
                    other => panic!("Expected CountInPlay, got {other:?}"),
                }
            }
            other => panic!("Expected ModifyStat, got {other:?}"),
        }
    }

    #[test]
    fn test_conditional_static() {
        match single("while this character has no damage, he gets +4 {s}.") {
            Effect::Conditional { condition, effects } => {
                assert_eq!(condition, Condition::SelfUndamaged);
                assert_eq!(effects.len(), 1);
                assert!(matches!(
                    effects[0],
                    Effect::ModifyStat {
                        delta: 4,
                        target: TargetSelector::This,
                        duration: Duration::Permanent,
                        ..
                    }
                ));
            }
            other => panic!("Expected Conditional, got {other:?}"),
        }
    }

    #[test]
    fn test_damage_fixed_and_dynamic() {
        assert_eq!(
            single("deal 2 damage to chosen character"),
            Effect::DealDamage {
                amount: Amount::Fixed(2),
                target: TargetSelector::chosen(CardFilter::characters()),
                optional: false,
            }
        );
        match single("deal damage to chosen character equal to the number of characters you have in play") {
            Effect::DealDamage {
                amount: Amount::Dynamic(DynamicAmount::CountInPlay { filter }),
                ..
            } => assert_eq!(filter.owner, OwnerFilter::You),
            other => panic!("Expected dynamic damage, got {other:?}"),
        }
    }

    #[test]
    fn test_zone_moves() {
        assert!(matches!(
            single("banish chosen item"),
            Effect::MoveZone {
                from: Some(Zone::Play),
                to: Zone::Discard,
                ..
            }
        ));
        assert!(matches!(
            single("return chosen character to their player's hand"),
            Effect::MoveZone {
                from: Some(Zone::Play),
                to: Zone::Hand,
                ..
            }
        ));
        match single("return a character card from your discard to your hand") {
            Effect::MoveZone {
                from: Some(Zone::Discard),
                target: TargetSelector::Chosen { filter, .. },
                ..
            } => assert_eq!(filter.owner, OwnerFilter::You),
            other => panic!("Expected return from discard, got {other:?}"),
        }
        assert!(matches!(
            single("put the top card of your deck into your inkwell facedown and exerted"),
            Effect::MoveZone {
                to: Zone::Inkwell,
                target: TargetSelector::TopOfDeck { count: 1 },
                ..
            }
        ));
    }

    #[test]
    fn test_discard() {
        match single("each opponent chooses and discards a card") {
            Effect::MoveZone {
                from: Some(Zone::Hand),
                target: TargetSelector::Chosen { filter, count, .. },
                ..
            } => {
                assert_eq!(count, 1);
                assert_eq!(filter.owner, OwnerFilter::Opponent);
            }
            other => panic!("Expected discard, got {other:?}"),
        }
    }

    #[test]
    fn test_grant_keywords() {
        match single("chosen character gains resist +1 and ward this turn") {
            Effect::GrantKeyword { keywords, duration, .. } => {
                assert_eq!(duration, Duration::ThisTurn);
                assert_eq!(keywords.len(), 2);
                assert_eq!(keywords[0].keyword, Keyword::Resist);
                assert_eq!(keywords[0].value, Some(1));
                assert_eq!(keywords[1].keyword, Keyword::Ward);
            }
            other => panic!("Expected GrantKeyword, got {other:?}"),
        }
    }

    #[test]
    fn test_restriction_and_ready() {
        assert_eq!(
            single("chosen opposing character can't quest during their next turn"),
            Effect::Restriction {
                action: RestrictedAction::Quest,
                target: TargetSelector::chosen(CardFilter::characters().owned_by(OwnerFilter::Opponent)),
                duration: Duration::UntilStartOfYourNextTurn,
                optional: false,
            }
        );
        assert!(matches!(
            single("this character can't be challenged"),
            Effect::Restriction {
                action: RestrictedAction::BeChallenged,
                duration: Duration::Permanent,
                ..
            }
        ));
        assert!(matches!(single("ready chosen character"), Effect::Ready { .. }));
    }

    #[test]
    fn test_cost_reduction() {
        match single("you pay 2 {i} less for the next character you play this turn") {
            Effect::CostReduction {
                amount,
                filter,
                duration,
                ..
            } => {
                assert_eq!(amount, 2);
                assert_eq!(filter.card_type, Some(CardType::Character));
                assert_eq!(duration, Duration::ThisTurn);
            }
            other => panic!("Expected CostReduction, got {other:?}"),
        }
    }

    #[test]
    fn test_remove_damage() {
        assert_eq!(
            single("remove up to 3 damage from chosen character"),
            Effect::RemoveDamage {
                amount: Amount::UpTo(3),
                target: TargetSelector::chosen(CardFilter::characters()),
                optional: false,
            }
        );
    }

    #[test]
    fn test_damage_replacement() {
        match single("if this character would be dealt damage, prevent that damage instead") {
            Effect::Replacement { original, substitute } => {
                assert_eq!(
                    original,
                    ReplacedEvent::DamageDealt {
                        target: TargetSelector::This
                    }
                );
                assert!(substitute.is_empty());
            }
            other => panic!("Expected Replacement, got {other:?}"),
        }
    }

    #[test]
    fn test_sequence_keeps_order() {
        let effects = parse_effects("draw a card, then choose and discard a card");
        assert_eq!(effects.len(), 2);
        assert_eq!(effects[0].tag(), "DrawCard");
        assert_eq!(effects[1].tag(), "MoveZone");
    }

    #[test]
    fn test_commit_without_backtracking() {
        // "banish" commits even though the target is not understood
        assert_eq!(
            single("banish the moon"),
            Effect::Unparsed {
                text: "banish the moon".to_string()
            }
        );
        assert_eq!(template_for("banish the moon"), Some("banish"));
        assert_eq!(template_for("do a little dance"), None);
    }

    #[test]
    fn test_unparsed_keeps_text() {
        assert_eq!(
            single("do a little dance"),
            Effect::Unparsed {
                text: "do a little dance".to_string()
            }
        );
    }

    #[test]
    fn test_parse_dynamic() {
        assert_eq!(parse_dynamic("this character's {s}"), DynamicAmount::SelfStat(Stat::Strength));
        assert_eq!(
            parse_dynamic("the number of cards in your hand"),
            DynamicAmount::CardsInHand { opponent: false }
        );
        assert_eq!(
            parse_dynamic("the phase of the moon"),
            DynamicAmount::Formula("the phase of the moon".to_string())
        );
    }
}
