//! Lorcana Forge - command line tools
//!
//! `parse` runs the ability parser over card data and reports how much of
//! the rules text was recognized; `text` parses a single ability ad hoc.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use lorcana_forge_rs::{
    core::{Effect, RawAbilityType},
    game::VerbosityLevel,
    loader::CardDatabase,
    parser::{self, CorpusSummary, ParseReport},
};
use rayon::prelude::*;
use std::path::PathBuf;

/// Verbosity level for report output (accepts names and numbers)
#[derive(Debug, Clone, Copy)]
struct VerbosityArg(VerbosityLevel);

impl std::str::FromStr for VerbosityArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "0" => Ok(VerbosityArg(VerbosityLevel::Silent)),
            "minimal" | "1" => Ok(VerbosityArg(VerbosityLevel::Minimal)),
            "normal" | "2" => Ok(VerbosityArg(VerbosityLevel::Normal)),
            "verbose" | "3" => Ok(VerbosityArg(VerbosityLevel::Verbose)),
            _ => Err(format!(
                "invalid verbosity level '{s}' (expected: silent/0, minimal/1, normal/2, verbose/3)"
            )),
        }
    }
}

/// Declared ability shape for ad hoc text
#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    Keyword,
    Static,
    Triggered,
    Activated,
}

impl From<KindArg> for RawAbilityType {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Keyword => RawAbilityType::Keyword,
            KindArg::Static => RawAbilityType::Static,
            KindArg::Triggered => RawAbilityType::Triggered,
            KindArg::Activated => RawAbilityType::Activated,
        }
    }
}

#[derive(Parser)]
#[command(name = "lorcana")]
#[command(about = "Lorcana Forge - rules text parser and turn engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse card data and report recognition per card and for the corpus
    Parse {
        /// Card JSON file, or a directory searched recursively for *.json
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Emit parse reports as JSON
        #[arg(long)]
        json: bool,

        /// Only parse the named card ("Name" or "Name - Subtitle")
        #[arg(long, value_name = "NAME")]
        card: Option<String>,

        /// Verbosity: silent/0, minimal/1 (summary), normal/2 (per card), verbose/3 (per ability)
        #[arg(short = 'v', long = "verbosity", default_value = "normal")]
        verbosity: VerbosityArg,
    },

    /// Parse one piece of ability text and print the resulting definitions
    Text {
        /// Rules text, e.g. "When you play this character, you may draw a card."
        #[arg(value_name = "TEXT")]
        text: String,

        /// Declared ability shape
        #[arg(long, value_enum, default_value = "static")]
        kind: KindArg,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Parse {
            path,
            json,
            card,
            verbosity,
        } => run_parse(path, json, card, verbosity.0),
        Commands::Text { text, kind } => run_text(&text, kind.into()),
    }
}

fn run_parse(path: PathBuf, json: bool, card: Option<String>, verbosity: VerbosityLevel) -> Result<()> {
    let db = CardDatabase::load(&path).with_context(|| format!("loading card data from {}", path.display()))?;

    let cards = match &card {
        Some(name) => match db.get_card(name) {
            Some(def) => vec![def.clone()],
            None => bail!("card '{name}' not found in {}", path.display()),
        },
        None => db.cards().to_vec(),
    };

    // Parsing is pure; collect keeps input order
    let reports: Vec<ParseReport> = cards.par_iter().map(|def| parser::parse_with_report(def)).collect();
    let summary = CorpusSummary::from_reports(&reports);

    if json {
        let out = serde_json::json!({ "reports": reports, "summary": summary });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if verbosity >= VerbosityLevel::Normal {
        for report in &reports {
            println!("{}", report.summary_line());
            if verbosity >= VerbosityLevel::Verbose {
                print_abilities(report);
            }
        }
        println!();
    }
    if verbosity >= VerbosityLevel::Minimal {
        print_summary(&summary);
    }
    Ok(())
}

fn print_abilities(report: &ParseReport) {
    for note in &report.annotations {
        println!("    note: {note}");
    }
    for ability in &report.abilities {
        let trigger = ability
            .trigger
            .as_ref()
            .map(|t| format!(" on {:?}/{:?}", t.event, t.actor))
            .unwrap_or_default();
        let effects: Vec<&str> = ability.effects.iter().map(|e| e.tag()).collect();
        println!("    [{}] {}{trigger}: {}", ability.id, ability.kind, effects.join(", "));
        for cost in &ability.costs {
            if cost.is_opaque() {
                println!("      opaque cost: {cost}");
            }
        }
        for effect in &ability.effects {
            if let Effect::Unparsed { text } = effect {
                match parser::effect::template_for(text) {
                    Some(name) => println!("      unparsed, claimed by '{name}': {text}"),
                    None => println!("      unparsed, no template: {text}"),
                }
            }
        }
    }
    for violation in &report.violations {
        println!("    violation: {violation}");
    }
}

fn print_summary(summary: &CorpusSummary) {
    println!("=== Corpus Summary ===");
    println!("Cards:        {}", summary.cards);
    println!("Abilities:    {} from {} declared", summary.abilities, summary.declared);
    println!(
        "Clauses:      {} of {} recognized ({:.1}%)",
        summary.clauses - summary.unparsed,
        summary.clauses,
        summary.recognition_rate() * 100.0
    );
    println!("Opaque costs: {}", summary.opaque_costs);
    println!("Violations:   {}", summary.violations);
    if !summary.below_floor.is_empty() {
        println!("Below floor:  {}", summary.below_floor.join("; "));
    }
}

fn run_text(text: &str, kind: RawAbilityType) -> Result<()> {
    let report = parser::parse_text(text, kind);
    println!("{}", report.summary_line());
    print_abilities(&report);
    println!("{}", serde_json::to_string_pretty(&report.abilities)?);
    Ok(())
}
