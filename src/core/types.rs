//! Strongly-typed wrappers for game concepts
//!
//! Newtypes prevent type confusion: a card name, a player name, a
//! classification and an ability id are all strings, but they cannot be
//! mixed up.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(s: impl Into<String>) -> Self {
                $name(s.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                $name(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                $name(s.to_string())
            }
        }
    };
}

string_newtype!(
    /// Card name without subtitle (e.g. "Mickey Mouse")
    CardName
);

string_newtype!(
    /// Player name
    PlayerName
);

string_newtype!(
    /// Card classification (e.g. "Storyborn", "Hero", "Song", "Broom")
    Classification
);

string_newtype!(
    /// Stable ability identifier: `<card id>-<ordinal>`
    AbilityId
);

impl CardName {
    /// Case- and accent-insensitive key used for same-name checks and lookups
    pub fn key(&self) -> String {
        deunicode::deunicode(&self.0).to_lowercase()
    }
}

impl Classification {
    /// Classifications compare case-insensitively ("dragon" == "Dragon")
    pub fn matches(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

impl AbilityId {
    /// Build the id for the `ordinal`-th ability produced from a card
    pub fn for_card(card_id: &str, ordinal: usize) -> Self {
        AbilityId(format!("{card_id}-{ordinal}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_name_key_ignores_accents_and_case() {
        let a = CardName::new("Maléficent");
        let b = CardName::new("MALEFICENT");
        assert_eq!(a.key(), b.key());
        assert_eq!(a.as_str(), "Maléficent");
    }

    #[test]
    fn test_classification_matches() {
        let class = Classification::new("Dragon");
        assert!(class.matches("dragon"));
        assert!(!class.matches("Hero"));
    }

    #[test]
    fn test_ability_id_format() {
        assert_eq!(AbilityId::for_card("TFC-12", 3).as_str(), "TFC-12-3");
    }

    #[test]
    fn test_player_name() {
        let name = PlayerName::new("Alice");
        assert_eq!(name.to_string(), "Alice");
    }
}
