//! Card data loader (JSON)
//!
//! Accepts the shapes card data is commonly published in: a single card
//! object, an array of cards, or an object with a `cards` array.

use crate::core::CardDefinition;
use crate::{LorcanaError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Deserialize)]
#[serde(untagged)]
enum CardFile {
    Wrapped { cards: Vec<CardDefinition> },
    Many(Vec<CardDefinition>),
    One(Box<CardDefinition>),
}

/// Card loader for .json files
pub struct CardLoader;

impl CardLoader {
    /// Load every card in a JSON file
    pub fn load_from_file(path: &Path) -> Result<Vec<CardDefinition>> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content).map_err(|e| match e {
            LorcanaError::InvalidCardFormat(msg) => LorcanaError::InvalidCardFormat(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    /// Parse card JSON text
    pub fn parse(content: &str) -> Result<Vec<CardDefinition>> {
        let file: CardFile =
            serde_json::from_str(content).map_err(|e| LorcanaError::InvalidCardFormat(e.to_string()))?;
        let cards = match file {
            CardFile::Wrapped { cards } | CardFile::Many(cards) => cards,
            CardFile::One(card) => vec![*card],
        };
        for card in &cards {
            if card.name.as_str().trim().is_empty() {
                return Err(LorcanaError::InvalidCardFormat(format!("Card {} has no name", card.id)));
            }
        }
        Ok(cards)
    }
}
