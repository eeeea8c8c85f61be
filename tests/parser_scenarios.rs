//! End-to-end parser behaviour on realistic card data

use lorcana_forge_rs::core::{
    AbilityKind, Actor, Amount, CardDefinition, CardFilter, Condition, Cost, Duration, Effect, RawAbilityType, Stat,
    TargetSelector, TriggerEvent,
};
use lorcana_forge_rs::loader::CardLoader;
use lorcana_forge_rs::parser::{self, CorpusSummary};

fn card(json: &str) -> CardDefinition {
    let mut cards = CardLoader::parse(json).unwrap();
    assert_eq!(cards.len(), 1);
    cards.remove(0)
}

fn sample_corpus() -> Vec<CardDefinition> {
    CardLoader::parse(
        r#"[
        {
            "id": "TFC-1", "name": "Hades", "subtitle": "Lord of the Underworld",
            "type": "Character", "cost": 4, "strength": 3, "willpower": 2, "lore": 1,
            "abilities": [
                {"type": "triggered", "name": "WELL OF SOULS",
                 "effect": "When you play this character, return a character card from your discard to your hand."}
            ]
        },
        {
            "id": "TFC-2", "name": "Fang Crossbow", "type": "Item", "cost": 2,
            "abilities": [
                {"type": "activated", "name": "CAREFUL AIM", "effect": "⟳, 2 ⬡ — Chosen character gets -2 ¤ this turn."},
                {"type": "activated", "name": "STAY BACK!", "effect": "⟳ — Banish chosen Dragon character."}
            ]
        },
        {
            "id": "TFC-3", "name": "Cruella De Vil", "subtitle": "Miserable as Usual",
            "type": "Character", "cost": 1, "strength": 2, "willpower": 1, "lore": 1,
            "abilities": [
                {"type": "keyword", "keyword": "Ward", "fullText": "Ward (Opponents can't choose this character except to challenge.)"},
                {"type": "triggered", "name": "YOU'LL BE SORRY",
                 "effect": "When this character is challenged and banished, you may return chosen character to their player's hand."}
            ]
        },
        {
            "id": "TFC-4", "name": "Mickey Mouse", "subtitle": "Wayward Sorcerer",
            "type": "Character", "cost": 5, "strength": 3, "willpower": 4, "lore": 2,
            "abilities": [
                {"type": "keyword", "keyword": "Shift", "keywordValue": "3"},
                {"type": "static", "name": "ANIMATE BROOM", "effect": "You pay 1 ⬡ less to play Broom characters."}
            ]
        },
        {
            "id": "TFC-5", "name": "Gaston", "subtitle": "Arrogant Hunter",
            "type": "Character", "cost": 2, "strength": 4, "willpower": 2, "lore": 1,
            "abilities": [
                {"type": "keyword", "keyword": "Reckless"},
                {"type": "static", "effect": "Do the thing nobody wrote a template for."}
            ]
        }
    ]"#,
    )
    .unwrap()
}

#[test]
fn simple_triggered_draw() {
    let report = parser::parse_text(
        "When you play this character, you may draw a card.",
        lorcana_forge_rs::core::RawAbilityType::Triggered,
    );
    assert_eq!(report.abilities.len(), 1);
    let ability = &report.abilities[0];
    assert_eq!(ability.kind, AbilityKind::Triggered);
    assert_eq!(ability.trigger.as_ref().unwrap().event, TriggerEvent::OnPlay);
    assert_eq!(
        ability.effects,
        vec![Effect::DrawCard {
            amount: Amount::one(),
            target: TargetSelector::You,
            optional: true,
        }]
    );
}

#[test]
fn activated_with_compound_cost() {
    let report = parser::parse_text(
        "⟳, 2 ⬡ — Chosen character gets -2 ¤ this turn.",
        lorcana_forge_rs::core::RawAbilityType::Activated,
    );
    assert_eq!(report.abilities.len(), 1);
    let ability = &report.abilities[0];
    assert_eq!(ability.kind, AbilityKind::Activated);
    assert_eq!(ability.costs.as_slice(), &[Cost::ExertSelf, Cost::PayInk(2)]);
    assert_eq!(
        ability.effects,
        vec![Effect::ModifyStat {
            stat: Stat::Strength,
            delta: -2,
            per: None,
            target: TargetSelector::chosen(CardFilter::characters()),
            duration: Duration::ThisTurn,
            optional: false,
        }]
    );
}

#[test]
fn keyword_with_value() {
    let mickey = card(
        r#"{"id": "TFC-4", "name": "Mickey Mouse", "type": "Character", "cost": 5,
            "abilities": [{"type": "keyword", "keyword": "Shift", "keywordValue": "3"}]}"#,
    );
    let abilities = parser::parse(&mickey);
    assert_eq!(abilities.len(), 1);
    assert_eq!(abilities[0].effects, vec![Effect::AlternateCost { cost: 3 }]);
    assert_eq!(abilities[0].costs.as_slice(), &[Cost::PayInk(3)]);
}

#[test]
fn conditional_static() {
    let report = parser::parse_text(
        "While this character has no damage, he gets +4 ¤.",
        lorcana_forge_rs::core::RawAbilityType::Static,
    );
    assert_eq!(report.abilities.len(), 1);
    let ability = &report.abilities[0];
    assert_eq!(ability.kind, AbilityKind::Static);
    assert_eq!(ability.effects.len(), 1);
    match &ability.effects[0] {
        Effect::Conditional { condition, effects } => {
            assert_eq!(*condition, Condition::SelfUndamaged);
            assert_eq!(effects.len(), 1);
            assert!(matches!(effects[0], Effect::ModifyStat { delta: 4, .. }));
        }
        other => panic!("Expected Conditional, got {other:?}"),
    }
}

#[test]
fn fang_crossbow_yields_one_definition_per_ability() {
    let corpus = sample_corpus();
    let crossbow = corpus.iter().find(|c| c.name.as_str() == "Fang Crossbow").unwrap();
    let abilities = parser::parse(crossbow);

    assert_eq!(abilities.len(), 2);
    assert_eq!(abilities[0].name.as_deref(), Some("CAREFUL AIM"));
    assert_eq!(abilities[1].name.as_deref(), Some("STAY BACK!"));
    for ability in &abilities {
        assert_eq!(ability.kind, AbilityKind::Activated);
        assert!(!ability.costs.is_empty());
        assert!(!ability.effects.is_empty());
    }
}

#[test]
fn compound_trigger_expands() {
    let report = parser::parse_text(
        "When you play this character and whenever he quests, each opponent loses 1 lore.",
        lorcana_forge_rs::core::RawAbilityType::Triggered,
    );
    assert!(report.abilities.len() >= 2);
    let first = &report.abilities[0];
    let second = &report.abilities[1];
    assert!(first.is_triggered_by(TriggerEvent::OnPlay));
    assert!(second.is_triggered_by(TriggerEvent::OnQuest));
    assert_ne!(first.id, second.id);
    assert_eq!(first.effects, second.effects);
}

#[test]
fn keywords_produce_their_canonical_shape() {
    let corpus = sample_corpus();
    let cruella = corpus.iter().find(|c| c.name.as_str() == "Cruella De Vil").unwrap();
    let abilities = parser::parse(cruella);
    assert_eq!(abilities[0].kind, AbilityKind::Static);

    // Fires only when the challenge banishes her, not on every challenge
    let sorry = abilities.iter().find(|a| a.kind == AbilityKind::Triggered).unwrap();
    let trigger = sorry.trigger.as_ref().unwrap();
    assert_eq!(trigger.event, TriggerEvent::OnBanish);
    assert_eq!(trigger.actor, Actor::This);
    assert!(trigger.filter.in_challenge);
}

#[test]
fn parsing_is_idempotent() {
    for card in sample_corpus() {
        assert_eq!(parser::parse(&card), parser::parse(&card), "{}", card.full_name());
    }
}

#[test]
fn every_definition_is_structurally_valid() {
    for card in sample_corpus() {
        let report = parser::parse_with_report(&card);
        assert!(report.violations.is_empty(), "{:?}", report.violations);
        assert!(report.meets_floor(), "{}", report.summary_line());
        for ability in &report.abilities {
            assert!(!ability.id.as_str().is_empty());
            assert_eq!(ability.card_id, card.id);
            assert!(!ability.effects.is_empty());
            assert!(ability.validate().is_ok());
        }
    }
}

#[test]
fn unknown_text_degrades_without_failing_the_card() {
    let corpus = sample_corpus();
    let gaston = corpus.iter().find(|c| c.name.as_str() == "Gaston").unwrap();
    let report = parser::parse_with_report(gaston);

    assert_eq!(report.abilities.len(), 2);
    assert_eq!(report.unparsed, 1);
    assert!(matches!(report.abilities[1].effects[0], Effect::Unparsed { .. }));
    assert!(report.summary_line().contains("1 of 2 ability clauses recognized"));
}

#[test]
fn unrecognized_compound_trigger_half_is_annotated() {
    let report = parser::parse_text(
        "When you play this character and whenever the moon rises, gain 1 lore.",
        RawAbilityType::Triggered,
    );

    assert_eq!(report.abilities.len(), 1);
    assert_eq!(report.abilities[0].trigger.as_ref().unwrap().event, TriggerEvent::OnPlay);
    assert_eq!(report.annotations.len(), 1);
    assert!(report.annotations[0].contains("whenever the moon rises"), "{:?}", report.annotations);
}

#[test]
fn corpus_summary_covers_every_card() {
    let reports: Vec<_> = sample_corpus().iter().map(parser::parse_with_report).collect();
    let summary = CorpusSummary::from_reports(&reports);

    assert_eq!(summary.cards, 5);
    assert_eq!(summary.declared, 9);
    assert!(summary.abilities >= summary.declared);
    assert!(summary.below_floor.is_empty());
    assert_eq!(summary.violations, 0);
    assert!(summary.recognition_rate() > 0.5 && summary.recognition_rate() < 1.0);
}
