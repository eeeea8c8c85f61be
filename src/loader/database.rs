//! Card database for looking up card definitions
//!
//! Cards are keyed by full name ("Mickey Mouse - Wayward Sorcerer") folded to
//! ASCII lowercase, and by their data id.

use crate::core::CardDefinition;
use crate::loader::card::CardLoader;
use crate::{LorcanaError, Result};
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn name_key(name: &str) -> String {
    deunicode::deunicode(name.trim()).to_lowercase()
}

/// Database of card definitions loaded from JSON card data
#[derive(Debug, Default)]
pub struct CardDatabase {
    /// Cards in load order
    cards: Vec<Arc<CardDefinition>>,
    by_name: FxHashMap<String, usize>,
    by_id: FxHashMap<String, usize>,
}

impl CardDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `.json` file under `root`, or `root` itself if it is a file
    pub fn load(root: &Path) -> Result<Self> {
        if !root.exists() {
            return Err(LorcanaError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Card data not found: {}", root.display()),
            )));
        }
        let mut db = CardDatabase::new();
        for path in Self::json_files(root)? {
            for card in CardLoader::load_from_file(&path)? {
                db.add_card(card);
            }
        }
        Ok(db)
    }

    /// JSON files under a directory, sorted so load order is stable
    fn json_files(root: &Path) -> Result<Vec<PathBuf>> {
        if root.is_file() {
            return Ok(vec![root.to_path_buf()]);
        }
        let mut paths = Vec::new();
        for entry in jwalk::WalkDir::new(root).skip_hidden(true) {
            let entry = entry.map_err(|e| LorcanaError::IoError(std::io::Error::other(e.to_string())))?;
            let path = entry.path();
            if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }

    /// Add a card; a later card with the same name or id replaces the earlier one
    pub fn add_card(&mut self, card: CardDefinition) {
        let key = name_key(&card.full_name());
        let id = card.id.clone();
        let slot = match self.by_name.get(&key).or_else(|| self.by_id.get(&id)) {
            Some(&slot) => {
                self.cards[slot] = Arc::new(card);
                slot
            }
            None => {
                self.cards.push(Arc::new(card));
                self.cards.len() - 1
            }
        };
        self.by_name.insert(key, slot);
        self.by_id.insert(id, slot);
    }

    /// Look up by full name or bare name (case- and accent-insensitive)
    pub fn get_card(&self, name: &str) -> Option<&Arc<CardDefinition>> {
        let key = name_key(name);
        if let Some(&slot) = self.by_name.get(&key) {
            return self.cards.get(slot);
        }
        // Bare name: first version in load order
        self.cards.iter().find(|c| c.name.key() == key)
    }

    pub fn get_by_id(&self, id: &str) -> Option<&Arc<CardDefinition>> {
        self.by_id.get(id).and_then(|&slot| self.cards.get(slot))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get_card(name).is_some()
    }

    pub fn cards(&self) -> &[Arc<CardDefinition>] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CardType;

    fn card(id: &str, name: &str, subtitle: &str) -> CardDefinition {
        let mut def = CardDefinition::new(id, name, CardType::Character, 2);
        def.subtitle = Some(subtitle.to_string());
        def
    }

    #[test]
    fn test_empty_database() {
        let db = CardDatabase::new();
        assert_eq!(db.len(), 0);
        assert!(db.is_empty());
        assert!(db.get_card("Mickey Mouse").is_none());
    }

    #[test]
    fn test_lookup_by_name_and_id() {
        let mut db = CardDatabase::new();
        db.add_card(card("TFC-12", "Mickey Mouse", "Wayward Sorcerer"));
        db.add_card(card("TFC-13", "Maléficent", "Sorceress"));

        assert!(db.contains("mickey mouse - wayward sorcerer"));
        assert!(db.contains("Mickey Mouse"));
        assert!(db.contains("MALEFICENT - SORCERESS"));
        assert_eq!(db.get_by_id("TFC-13").unwrap().name.as_str(), "Maléficent");
    }

    #[test]
    fn test_later_card_replaces_same_name() {
        let mut db = CardDatabase::new();
        db.add_card(card("A", "Stitch", "Rock Star"));
        let mut newer = card("A", "Stitch", "Rock Star");
        newer.cost = 6;
        db.add_card(newer);
        assert_eq!(db.len(), 1);
        assert_eq!(db.get_card("Stitch - Rock Star").unwrap().cost, 6);
    }

    #[test]
    fn test_missing_root_is_an_error() {
        assert!(CardDatabase::load(Path::new("no/such/card/data")).is_err());
    }
}
