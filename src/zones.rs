//! Game zones (Deck, Hand, Discard, Play, Inkwell)

use crate::core::{CardId, PlayerId};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// Where a card instance can be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    Deck,
    Hand,
    Discard,
    Play,
    Inkwell,
}

impl Zone {
    pub const ALL: [Zone; 5] = [Zone::Deck, Zone::Hand, Zone::Discard, Zone::Play, Zone::Inkwell];

    /// Deck and discard keep their order; the rest are unordered collections
    pub fn is_ordered(&self) -> bool {
        matches!(self, Zone::Deck | Zone::Discard)
    }

    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Zone::Deck => "deck",
            Zone::Hand => "hand",
            Zone::Discard => "discard",
            Zone::Play => "play",
            Zone::Inkwell => "inkwell",
        };
        write!(f, "{s}")
    }
}

/// The cards one player has in one zone
///
/// Insertion order is kept for every zone since trigger collection and
/// target candidates walk zones front to back. The top of the deck is the
/// last element.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardZone {
    pub kind: Zone,
    pub cards: Vec<CardId>,
}

impl CardZone {
    fn empty(kind: Zone) -> Self {
        CardZone {
            kind,
            cards: Vec::new(),
        }
    }

    pub fn add(&mut self, card: CardId) {
        self.cards.push(card);
    }

    /// False if the card wasn't here
    pub fn remove(&mut self, card: CardId) -> bool {
        match self.cards.iter().position(|&c| c == card) {
            Some(idx) => {
                self.cards.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, card: CardId) -> bool {
        self.cards.contains(&card)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn draw_top(&mut self) -> Option<CardId> {
        self.cards.pop()
    }

    pub fn shuffle(&mut self, rng: &mut impl rand::Rng) {
        self.cards.shuffle(rng);
    }
}

/// All five zones of one player, indexed by `Zone`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerZones {
    pub owner: PlayerId,
    zones: [CardZone; 5],
}

impl PlayerZones {
    pub fn new(owner: PlayerId) -> Self {
        PlayerZones {
            owner,
            zones: Zone::ALL.map(CardZone::empty),
        }
    }

    /// Zone currently holding the card, if it belongs to this player
    pub fn find(&self, card: CardId) -> Option<Zone> {
        self.zones.iter().find(|z| z.contains(card)).map(|z| z.kind)
    }
}

impl Index<Zone> for PlayerZones {
    type Output = CardZone;

    fn index(&self, zone: Zone) -> &CardZone {
        &self.zones[zone.slot()]
    }
}

impl IndexMut<Zone> for PlayerZones {
    fn index_mut(&mut self, zone: Zone) -> &mut CardZone {
        &mut self.zones[zone.slot()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    #[test]
    fn test_add_remove_keeps_order() {
        let mut hand = CardZone::empty(Zone::Hand);
        for n in 1..=3 {
            hand.add(CardId::new(n));
        }
        assert!(hand.remove(CardId::new(2)));
        assert!(!hand.remove(CardId::new(2)));
        assert_eq!(hand.cards, vec![CardId::new(1), CardId::new(3)]);
        assert_eq!(hand.len(), 2);
    }

    #[test]
    fn test_deck_draws_from_top() {
        let mut deck = CardZone::empty(Zone::Deck);
        deck.add(CardId::new(10));
        deck.add(CardId::new(11));
        assert_eq!(deck.draw_top(), Some(CardId::new(11)));
        assert_eq!(deck.draw_top(), Some(CardId::new(10)));
        assert_eq!(deck.draw_top(), None);
        assert!(deck.is_empty());
    }

    #[test]
    fn test_shuffle_is_seeded() {
        let deal = |seed| {
            let mut deck = CardZone::empty(Zone::Deck);
            for n in 0..20 {
                deck.add(CardId::new(n));
            }
            deck.shuffle(&mut ChaCha12Rng::seed_from_u64(seed));
            deck.cards
        };
        assert_eq!(deal(3), deal(3));
        assert_eq!(deal(3).len(), 20);
    }

    #[test]
    fn test_player_zones_index_by_zone() {
        let mut zones = PlayerZones::new(PlayerId::new(1));
        assert_eq!(zones[Zone::Inkwell].kind, Zone::Inkwell);

        zones[Zone::Play].add(CardId::new(5));
        assert_eq!(zones.find(CardId::new(5)), Some(Zone::Play));
        assert_eq!(zones.find(CardId::new(6)), None);
        assert!(Zone::Discard.is_ordered());
        assert!(!Zone::Hand.is_ordered());
    }
}
