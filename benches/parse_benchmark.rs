//! Benchmark for rules-text parsing throughput

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lorcana_forge_rs::core::{CardDefinition, RawAbilityType};
use lorcana_forge_rs::loader::{CardDatabase, CardLoader};
use lorcana_forge_rs::parser;
use std::path::PathBuf;

const SYNTHETIC: &str = r#"[
    {"id": "B-1", "name": "Fang Crossbow", "type": "Item", "cost": 2, "abilities": [
        {"type": "activated", "name": "CAREFUL AIM", "effect": "⟳, 2 ⬡ — Chosen character gets -2 ¤ this turn."},
        {"type": "activated", "name": "STAY BACK!", "effect": "⟳ — Banish chosen Dragon character."}
    ]},
    {"id": "B-2", "name": "Jafar", "subtitle": "Wicked Sorcerer", "type": "Character", "cost": 4, "abilities": [
        {"type": "triggered", "name": "STOLEN POWER", "effect": "When you play this character and whenever he quests, each opponent loses 1 lore."}
    ]},
    {"id": "B-3", "name": "Mickey Mouse", "subtitle": "Wayward Sorcerer", "type": "Character", "cost": 5, "abilities": [
        {"type": "keyword", "keyword": "Shift", "keywordValue": "3"},
        {"type": "static", "name": "ANIMATE BROOM", "effect": "You pay 1 ⬡ less to play Broom characters."}
    ]},
    {"id": "B-4", "name": "Cheshire Cat", "subtitle": "Not All There", "type": "Character", "cost": 3, "abilities": [
        {"type": "static", "name": "LOSE SOMETHING?", "effect": "While this character has no damage, he gets +4 ¤."},
        {"type": "triggered", "effect": "Whenever this character is challenged, each opponent chooses and discards a card."}
    ]}
]"#;

/// Real card data from `LORCANA_CARD_DATA` when set, else a synthetic sample
fn load_cards() -> Vec<CardDefinition> {
    if let Some(dir) = std::env::var_os("LORCANA_CARD_DATA").map(PathBuf::from) {
        if let Ok(db) = CardDatabase::load(&dir) {
            return db.cards().iter().map(|c| (**c).clone()).collect();
        }
        eprintln!("Warning: could not load card data from {}, using synthetic samples", dir.display());
    }
    CardLoader::parse(SYNTHETIC).unwrap()
}

fn bench_parse_single(c: &mut Criterion) {
    let cards = load_cards();
    let mut group = c.benchmark_group("parse_single");

    for card in cards.iter().take(10) {
        group.bench_with_input(BenchmarkId::from_parameter(card.full_name()), card, |b, card| {
            b.iter(|| parser::parse(black_box(card)));
        });
    }
    group.finish();
}

fn bench_parse_corpus(c: &mut Criterion) {
    let cards = load_cards();
    let mut group = c.benchmark_group("parse_corpus");
    group.throughput(Throughput::Elements(cards.len() as u64));

    group.bench_function("with_report", |b| {
        b.iter(|| {
            for card in &cards {
                black_box(parser::parse_with_report(card));
            }
        });
    });
    group.finish();
}

fn bench_parse_text(c: &mut Criterion) {
    c.bench_function("parse_text_triggered", |b| {
        b.iter(|| {
            parser::parse_text(
                black_box("Whenever one of your characters is challenged during an opponent's turn, gain 1 lore."),
                RawAbilityType::Triggered,
            )
        });
    });
}

criterion_group!(benches, bench_parse_single, bench_parse_corpus, bench_parse_text);
criterion_main!(benches);
