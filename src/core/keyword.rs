//! Keyword abilities

use serde::{Deserialize, Serialize};
use std::fmt;

/// Rules-defined keyword shorthand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Keyword {
    Ward,
    Evasive,
    Resist,
    Bodyguard,
    Shift,
    Singer,
    Support,
    Challenger,
    Reckless,
    Rush,
    Vanish,
    SingTogether,
}

impl Keyword {
    pub const ALL: [Keyword; 12] = [
        Keyword::Ward,
        Keyword::Evasive,
        Keyword::Resist,
        Keyword::Bodyguard,
        Keyword::Shift,
        Keyword::Singer,
        Keyword::Support,
        Keyword::Challenger,
        Keyword::Reckless,
        Keyword::Rush,
        Keyword::Vanish,
        Keyword::SingTogether,
    ];

    /// Exact-match, case-insensitive lookup
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.name().eq_ignore_ascii_case(name))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Keyword::Ward => "Ward",
            Keyword::Evasive => "Evasive",
            Keyword::Resist => "Resist",
            Keyword::Bodyguard => "Bodyguard",
            Keyword::Shift => "Shift",
            Keyword::Singer => "Singer",
            Keyword::Support => "Support",
            Keyword::Challenger => "Challenger",
            Keyword::Reckless => "Reckless",
            Keyword::Rush => "Rush",
            Keyword::Vanish => "Vanish",
            Keyword::SingTogether => "Sing Together",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_is_case_insensitive() {
        assert_eq!(Keyword::from_name("ward"), Some(Keyword::Ward));
        assert_eq!(Keyword::from_name("EVASIVE"), Some(Keyword::Evasive));
        assert_eq!(Keyword::from_name(" Sing Together "), Some(Keyword::SingTogether));
        assert_eq!(Keyword::from_name("Flying"), None);
    }
}
