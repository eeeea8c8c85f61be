//! Player representation

use crate::core::{CardDefinition, CardFilter, EntityId, Expiry, GameEntity, PlayerName};
use serde::{Deserialize, Serialize};

pub type PlayerId = EntityId<Player>;

/// A pending "you pay N less" discount
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostDiscount {
    pub amount: u32,
    pub filter: CardFilter,
    pub expiry: Expiry,
}

impl CostDiscount {
    /// Type and classification checks only; ownership is implied by the holder
    pub fn applies_to(&self, def: &CardDefinition) -> bool {
        if let Some(card_type) = self.filter.card_type {
            if def.card_type != card_type {
                return false;
            }
        }
        if let Some(class) = &self.filter.classification {
            if !def.has_classification(class.as_str()) {
                return false;
            }
        }
        true
    }
}

/// Represents a player in the game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Unique ID for this player
    pub id: PlayerId,

    /// Player name
    pub name: PlayerName,

    /// Lore total
    pub lore: u32,

    /// Has the player reached the lore goal?
    pub has_won: bool,

    /// Cards put into the inkwell this turn
    pub inked_this_turn: u8,

    /// Maximum inkings per turn (usually 1)
    pub max_ink_per_turn: u8,

    /// Discounts waiting for the next matching card
    pub discounts: Vec<CostDiscount>,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<PlayerName>) -> Self {
        Player {
            id,
            name: name.into(),
            lore: 0,
            has_won: false,
            inked_this_turn: 0,
            max_ink_per_turn: 1,
            discounts: Vec::new(),
        }
    }

    /// Gain lore, marking the win once `lore_to_win` is reached
    pub fn gain_lore(&mut self, amount: u32, lore_to_win: u32) {
        self.lore += amount;
        if self.lore >= lore_to_win {
            self.has_won = true;
        }
    }

    /// Lose lore, never going below zero; returns the amount actually lost
    pub fn lose_lore(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.lore);
        self.lore -= lost;
        lost
    }

    pub fn can_ink(&self) -> bool {
        self.inked_this_turn < self.max_ink_per_turn
    }

    pub fn ink_card(&mut self) {
        self.inked_this_turn += 1;
    }

    pub fn reset_ink(&mut self) {
        self.inked_this_turn = 0;
    }

    /// Total discount available for a card, without consuming it
    pub fn discount_for(&self, def: &CardDefinition) -> u32 {
        self.discounts
            .iter()
            .filter(|d| d.applies_to(def))
            .map(|d| d.amount)
            .sum()
    }

    /// Consume every discount that applied to a played card
    pub fn consume_discounts(&mut self, def: &CardDefinition) {
        self.discounts.retain(|d| !d.applies_to(def));
    }
}

impl GameEntity<Player> for Player {
    fn id(&self) -> PlayerId {
        self.id
    }

    fn name(&self) -> &str {
        self.name.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CardType;

    #[test]
    fn test_player_creation() {
        let id = PlayerId::new(1);
        let player = Player::new(id, "Alice");

        assert_eq!(player.id, id);
        assert_eq!(player.name.as_str(), "Alice");
        assert_eq!(player.lore, 0);
        assert!(!player.has_won);
    }

    #[test]
    fn test_player_lore() {
        let mut player = Player::new(PlayerId::new(1), "Bob");

        player.gain_lore(15, 20);
        assert_eq!(player.lore, 15);
        assert!(!player.has_won);

        assert_eq!(player.lose_lore(20), 15);
        assert_eq!(player.lore, 0);

        player.gain_lore(20, 20);
        assert!(player.has_won);
    }

    #[test]
    fn test_inking() {
        let mut player = Player::new(PlayerId::new(1), "Charlie");

        assert!(player.can_ink());
        player.ink_card();
        assert!(!player.can_ink());

        player.reset_ink();
        assert!(player.can_ink());
    }

    #[test]
    fn test_discounts() {
        let mut player = Player::new(PlayerId::new(1), "Dana");
        player.discounts.push(CostDiscount {
            amount: 2,
            filter: CardFilter::characters(),
            expiry: Expiry::EndOfTurn,
        });

        let character = CardDefinition::new("T-1", "Stitch", CardType::Character, 5);
        let item = CardDefinition::new("T-2", "Dinglehopper", CardType::Item, 1);
        assert_eq!(player.discount_for(&character), 2);
        assert_eq!(player.discount_for(&item), 0);

        player.consume_discounts(&character);
        assert!(player.discounts.is_empty());
    }
}
