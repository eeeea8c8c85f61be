//! Live card instances

use crate::core::{
    AbilityDefinition, CardDefinition, CardType, EntityId, GameEntity, KeywordGrant, PlayerId,
    RestrictedAction, Stat,
};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::sync::Arc;

pub type CardId = EntityId<Card>;

/// When a temporary modifier falls off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expiry {
    /// At the end of the turn it was applied in
    EndOfTurn,
    /// When the given player's next turn starts
    StartOfTurn(PlayerId),
    /// Only when the card leaves play
    LeavesPlay,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModifierKind {
    Stat { stat: Stat, delta: i32 },
    Keyword(KeywordGrant),
    Restriction(RestrictedAction),
}

/// A temporary change applied by a resolved effect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifier {
    pub kind: ModifierKind,
    pub expiry: Expiry,
    pub source: Option<CardId>,
}

/// Represents a card in the game
///
/// Many instances can share one `CardDefinition`. The instance carries the
/// live mutable fields: damage, exerted flag, temporary modifiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    /// Unique ID for this card instance
    pub id: CardId,

    pub definition: Arc<CardDefinition>,

    /// Parsed abilities, shared by every instance of the definition
    pub abilities: Arc<Vec<AbilityDefinition>>,

    pub owner: PlayerId,

    /// Damage counters
    pub damage: u32,

    /// Is the card exerted?
    pub exerted: bool,

    /// Ink dries at the start of the owner's turn; wet characters can't quest or challenge
    pub dry: bool,

    /// Characters stacked underneath via Shift
    pub shifted_onto: Option<CardId>,

    pub modifiers: SmallVec<[Modifier; 2]>,
}

impl Card {
    pub fn new(
        id: CardId,
        definition: Arc<CardDefinition>,
        abilities: Arc<Vec<AbilityDefinition>>,
        owner: PlayerId,
    ) -> Self {
        Card {
            id,
            definition,
            abilities,
            owner,
            damage: 0,
            exerted: false,
            dry: false,
            shifted_onto: None,
            modifiers: SmallVec::new(),
        }
    }

    pub fn card_type(&self) -> CardType {
        self.definition.card_type
    }

    pub fn is_character(&self) -> bool {
        self.card_type() == CardType::Character
    }

    pub fn cost(&self) -> u8 {
        self.definition.cost
    }

    /// Printed value of a stat (0 when the card has none)
    pub fn base_stat(&self, stat: Stat) -> i32 {
        let printed = match stat {
            Stat::Strength => self.definition.strength,
            Stat::Willpower => self.definition.willpower,
            Stat::Lore => self.definition.lore,
        };
        i32::from(printed.unwrap_or(0))
    }

    /// Sum of temporary stat modifiers
    pub fn modifier_total(&self, stat: Stat) -> i32 {
        self.modifiers
            .iter()
            .filter_map(|m| match m.kind {
                ModifierKind::Stat { stat: s, delta } if s == stat => Some(delta),
                _ => None,
            })
            .sum()
    }

    pub fn granted_keywords(&self) -> impl Iterator<Item = KeywordGrant> + '_ {
        self.modifiers.iter().filter_map(|m| match m.kind {
            ModifierKind::Keyword(grant) => Some(grant),
            _ => None,
        })
    }

    pub fn is_restricted(&self, action: RestrictedAction) -> bool {
        self.modifiers
            .iter()
            .any(|m| m.kind == ModifierKind::Restriction(action))
    }

    pub fn exert(&mut self) {
        self.exerted = true;
    }

    pub fn ready(&mut self) {
        self.exerted = false;
    }

    pub fn add_damage(&mut self, amount: u32) {
        self.damage += amount;
    }

    /// Remove up to `amount` damage, returning how much was removed
    pub fn remove_damage(&mut self, amount: u32) -> u32 {
        let removed = amount.min(self.damage);
        self.damage -= removed;
        removed
    }

    pub fn add_modifier(&mut self, kind: ModifierKind, expiry: Expiry, source: Option<CardId>) {
        self.modifiers.push(Modifier { kind, expiry, source });
    }

    /// Drop modifiers matching the predicate, returning how many were removed
    pub fn expire_modifiers(&mut self, expired: impl Fn(&Expiry) -> bool) -> usize {
        let before = self.modifiers.len();
        self.modifiers.retain(|m| !expired(&m.expiry));
        before - self.modifiers.len()
    }

    /// Reset live state when the card leaves play
    pub fn reset(&mut self) {
        self.damage = 0;
        self.exerted = false;
        self.dry = false;
        self.shifted_onto = None;
        self.modifiers.clear();
    }
}

impl GameEntity<Card> for Card {
    fn id(&self) -> CardId {
        self.id
    }

    fn name(&self) -> &str {
        self.definition.name.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_card() -> Card {
        let mut def = CardDefinition::new("T-1", "Goofy", CardType::Character, 3);
        def.strength = Some(2);
        def.willpower = Some(4);
        def.lore = Some(1);
        Card::new(
            CardId::new(1),
            Arc::new(def),
            Arc::new(Vec::new()),
            PlayerId::new(100),
        )
    }

    #[test]
    fn test_card_creation() {
        let card = test_card();
        assert_eq!(card.name(), "Goofy");
        assert_eq!(card.owner, PlayerId::new(100));
        assert!(!card.exerted);
        assert!(!card.dry);
        assert_eq!(card.base_stat(Stat::Willpower), 4);
    }

    #[test]
    fn test_card_modifiers() {
        let mut card = test_card();
        card.add_modifier(ModifierKind::Stat { stat: Stat::Strength, delta: 2 }, Expiry::EndOfTurn, None);
        card.add_modifier(
            ModifierKind::Stat { stat: Stat::Strength, delta: -1 },
            Expiry::StartOfTurn(PlayerId::new(100)),
            None,
        );
        assert_eq!(card.modifier_total(Stat::Strength), 1);

        let removed = card.expire_modifiers(|e| *e == Expiry::EndOfTurn);
        assert_eq!(removed, 1);
        assert_eq!(card.modifier_total(Stat::Strength), -1);
    }

    #[test]
    fn test_damage() {
        let mut card = test_card();
        card.add_damage(3);
        assert_eq!(card.remove_damage(5), 3);
        assert_eq!(card.damage, 0);
    }

    #[test]
    fn test_reset_clears_live_state() {
        let mut card = test_card();
        card.exert();
        card.add_damage(1);
        card.add_modifier(ModifierKind::Restriction(RestrictedAction::Quest), Expiry::LeavesPlay, None);
        assert!(card.is_restricted(RestrictedAction::Quest));
        card.reset();
        assert!(!card.exerted);
        assert_eq!(card.damage, 0);
        assert!(card.modifiers.is_empty());
    }
}
