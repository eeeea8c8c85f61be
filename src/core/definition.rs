//! Card definitions as supplied by card data
//!
//! A `CardDefinition` is immutable reference data: one per printed card,
//! shared by every instance of that card in every game. Ability entries arrive
//! as unstructured prose plus a declared shape tag; the parser turns them into
//! `AbilityDefinition`s.

use crate::core::{CardName, Classification};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Card types in Lorcana
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardType {
    Character,
    Action,
    Item,
    Location,
}

impl CardType {
    /// Parse a type noun as it appears in rules text ("character", "items", ...)
    pub fn from_noun(noun: &str) -> Option<Self> {
        match noun.trim_end_matches('s') {
            "character" => Some(CardType::Character),
            "action" => Some(CardType::Action),
            "item" => Some(CardType::Item),
            "location" => Some(CardType::Location),
            _ => None,
        }
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CardType::Character => "Character",
            CardType::Action => "Action",
            CardType::Item => "Item",
            CardType::Location => "Location",
        };
        write!(f, "{s}")
    }
}

/// Ink colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InkType {
    Amber,
    Amethyst,
    Emerald,
    Ruby,
    Sapphire,
    Steel,
}

/// Declared shape of a raw ability entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RawAbilityType {
    Keyword,
    Static,
    Triggered,
    Activated,
}

/// One ability entry as it appears in card data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAbility {
    #[serde(rename = "type")]
    pub ability_type: RawAbilityType,

    /// Ability name printed in capitals (e.g. "CAREFUL AIM")
    #[serde(default)]
    pub name: Option<String>,

    /// Rules text without the ability name
    #[serde(default)]
    pub effect: Option<String>,

    /// Full printed text including name and reminder text
    #[serde(default)]
    pub full_text: Option<String>,

    /// Keyword name for `type = keyword` entries
    #[serde(default)]
    pub keyword: Option<String>,

    /// Keyword value as printed ("3", "+1")
    #[serde(default)]
    pub keyword_value: Option<String>,
}

impl RawAbility {
    /// Text the parser should read: `effect` when present, else `full_text`
    pub fn text(&self) -> &str {
        self.effect
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .or(self.full_text.as_deref())
            .unwrap_or("")
    }

    /// Numeric keyword value, accepting "+1" style values
    pub fn keyword_number(&self) -> Option<u32> {
        self.keyword_value
            .as_deref()
            .map(|v| v.trim().trim_start_matches('+'))
            .and_then(|v| v.parse().ok())
    }
}

/// Card definition (not yet instantiated in a game)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDefinition {
    /// Stable card identifier from card data (e.g. "TFC-189")
    pub id: String,

    pub name: CardName,

    /// Version subtitle (e.g. "Wayward Sorcerer")
    #[serde(default, alias = "version")]
    pub subtitle: Option<String>,

    #[serde(rename = "type")]
    pub card_type: CardType,

    pub cost: u8,

    #[serde(default, alias = "color")]
    pub ink_type: Option<InkType>,

    #[serde(default, alias = "inkwell")]
    pub inkable: bool,

    #[serde(default)]
    pub strength: Option<u8>,

    #[serde(default)]
    pub willpower: Option<u8>,

    #[serde(default)]
    pub lore: Option<u8>,

    #[serde(default)]
    pub classifications: Vec<Classification>,

    #[serde(default)]
    pub abilities: Vec<RawAbility>,
}

impl CardDefinition {
    /// Create a bare definition; card data normally arrives via `CardLoader`
    pub fn new(id: impl Into<String>, name: impl Into<CardName>, card_type: CardType, cost: u8) -> Self {
        CardDefinition {
            id: id.into(),
            name: name.into(),
            subtitle: None,
            card_type,
            cost,
            ink_type: None,
            inkable: false,
            strength: None,
            willpower: None,
            lore: None,
            classifications: Vec::new(),
            abilities: Vec::new(),
        }
    }

    /// "Name - Subtitle", the form used on printed cards and in the exceptions table
    pub fn full_name(&self) -> String {
        match &self.subtitle {
            Some(sub) if !sub.is_empty() => format!("{} - {}", self.name, sub),
            _ => self.name.to_string(),
        }
    }

    pub fn has_classification(&self, class: &str) -> bool {
        self.classifications.iter().any(|c| c.matches(class))
    }

    /// Songs are actions with the Song classification
    pub fn is_song(&self) -> bool {
        self.card_type == CardType::Action && self.has_classification("Song")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_card_json() {
        let json = r#"{
            "id": "TFC-1",
            "name": "Ariel",
            "subtitle": "On Human Legs",
            "type": "Character",
            "cost": 4,
            "color": "Amber",
            "inkwell": true,
            "strength": 3,
            "willpower": 4,
            "lore": 2,
            "classifications": ["Storyborn", "Hero", "Princess"],
            "abilities": [
                {"type": "static", "name": "VOICELESS", "effect": "This character can't ⟳ to sing songs."}
            ]
        }"#;

        let def: CardDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(def.full_name(), "Ariel - On Human Legs");
        assert_eq!(def.ink_type, Some(InkType::Amber));
        assert!(def.inkable);
        assert!(def.has_classification("princess"));
        assert_eq!(def.abilities[0].ability_type, RawAbilityType::Static);
        assert_eq!(def.abilities[0].text(), "This character can't ⟳ to sing songs.");
    }

    #[test]
    fn test_keyword_number() {
        let raw = RawAbility {
            ability_type: RawAbilityType::Keyword,
            name: None,
            effect: None,
            full_text: Some("Resist +1".to_string()),
            keyword: Some("Resist".to_string()),
            keyword_value: Some("+1".to_string()),
        };
        assert_eq!(raw.keyword_number(), Some(1));
        assert_eq!(raw.text(), "Resist +1");
    }

    #[test]
    fn test_card_type_from_noun() {
        assert_eq!(CardType::from_noun("characters"), Some(CardType::Character));
        assert_eq!(CardType::from_noun("item"), Some(CardType::Item));
        assert_eq!(CardType::from_noun("card"), None);
    }
}
