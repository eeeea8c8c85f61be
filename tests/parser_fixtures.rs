//! Fixture-driven parser tests
//!
//! Each `.json` file under `tests/fixtures/` holds a `card` and the
//! `expected` one-line rendering of every ability the parser should produce.
//! Tests are generated per file by `dir-test`; add a file to add a test.

use dir_test::{dir_test, Fixture};
use lorcana_forge_rs::core::{AbilityDefinition, CardDefinition};
use lorcana_forge_rs::parser;
use serde::Deserialize;
use similar_asserts::assert_eq;

#[derive(Deserialize)]
struct ParserFixture {
    card: CardDefinition,
    expected: Vec<String>,
}

/// "kind[ on Event][ [costs]]: Tag, Tag"
fn render(ability: &AbilityDefinition) -> String {
    let mut line = ability.kind.to_string();
    if let Some(trigger) = &ability.trigger {
        line.push_str(&format!(" on {:?}", trigger.event));
    }
    if !ability.costs.is_empty() {
        let costs: Vec<String> = ability.costs.iter().map(|c| c.to_string()).collect();
        line.push_str(&format!(" [{}]", costs.join(", ")));
    }
    let tags: Vec<&str> = ability.effects.iter().map(|e| e.tag()).collect();
    line.push_str(&format!(": {}", tags.join(", ")));
    line
}

#[dir_test(
    dir: "$CARGO_MANIFEST_DIR/tests/fixtures",
    glob: "**/*.json",
)]
fn test_parse_fixture(fixture: Fixture<&str>) {
    let parsed: ParserFixture = serde_json::from_str(fixture.content())
        .unwrap_or_else(|e| panic!("Fixture {} is not valid: {e}", fixture.path()));

    let report = parser::parse_with_report(&parsed.card);
    let actual: Vec<String> = report.abilities.iter().map(render).collect();

    assert_eq!(parsed.expected.join("\n"), actual.join("\n"), "Fixture {}", fixture.path());
    assert!(report.violations.is_empty(), "Fixture {}: {:?}", fixture.path(), report.violations);
    assert!(report.meets_floor(), "{}", report.summary_line());
}
