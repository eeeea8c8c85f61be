//! Game state: players, card instances, zones, turn and event log

use crate::core::{
    AbilityDefinition, Card, CardDefinition, CardId, CostDiscount, EntityId, EntityStore, Expiry, Player, PlayerId,
    PlayerName,
};
use crate::game::triggers::{self, TriggerQueue};
use crate::game::{statics, EventLog, GameEvent, GameLogger, TurnStructure};
use crate::zones::{PlayerZones, Zone};
use crate::{LorcanaError, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::sync::Arc;

/// Game-wide settings fixed at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub lore_to_win: u32,
    pub starting_hand: usize,
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            lore_to_win: 20,
            starting_hand: 7,
            seed: 0,
        }
    }
}

/// Everything one game needs, serializable as a snapshot
///
/// Every mutation goes through a method here so that each change lands in the
/// event log. A card instance lives in exactly one zone of its owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub config: GameConfig,

    /// All card instances in the game
    pub cards: EntityStore<Card>,

    /// Players in turn order
    pub players: Vec<Player>,

    /// One set of zones per player, in turn order
    pub player_zones: Vec<PlayerZones>,

    pub turn: TurnStructure,

    /// Game RNG, seeded from `GameConfig::seed`
    ///
    /// In a RefCell so shuffles can run while the state is shared with a view.
    pub rng: RefCell<ChaCha12Rng>,

    /// Next id handed out; players and cards share the sequence
    next_entity_id: u32,

    pub events: EventLog,

    /// Triggers fired by recorded events, waiting for the game loop to settle
    #[serde(skip)]
    pub pending: TriggerQueue,

    pub logger: GameLogger,
}

impl GameState {
    /// Create a new game with two players; the first one starts
    pub fn new_two_player(
        player1_name: impl Into<PlayerName>,
        player2_name: impl Into<PlayerName>,
        config: GameConfig,
    ) -> Self {
        let p1_id = PlayerId::new(0);
        let p2_id = PlayerId::new(1);

        GameState {
            config,
            cards: EntityStore::new(),
            players: vec![Player::new(p1_id, player1_name), Player::new(p2_id, player2_name)],
            player_zones: vec![PlayerZones::new(p1_id), PlayerZones::new(p2_id)],
            turn: TurnStructure::new(p1_id, 0),
            rng: RefCell::new(ChaCha12Rng::seed_from_u64(config.seed)),
            next_entity_id: 2,
            events: EventLog::new(),
            pending: TriggerQueue::new(),
            logger: GameLogger::new(),
        }
    }

    /// Record an event, queueing the triggers it fires
    ///
    /// Triggers are matched now, while a card that is about to leave play
    /// still sees the event.
    pub fn record(&mut self, event: GameEvent) {
        let fired = triggers::collect(self, &event);
        self.pending.enqueue(fired);
        self.events.record(event);
    }

    pub fn next_id<T>(&mut self) -> EntityId<T> {
        let id = EntityId::new(self.next_entity_id);
        self.next_entity_id += 1;
        id
    }

    pub fn next_card_id(&mut self) -> CardId {
        self.next_id()
    }

    pub fn get_player_zones(&self, player_id: PlayerId) -> Option<&PlayerZones> {
        self.player_zones.iter().find(|z| z.owner == player_id)
    }

    pub fn get_player_zones_mut(&mut self, player_id: PlayerId) -> Option<&mut PlayerZones> {
        self.player_zones.iter_mut().find(|z| z.owner == player_id)
    }

    fn zones_mut(&mut self, player_id: PlayerId) -> Result<&mut PlayerZones> {
        self.get_player_zones_mut(player_id)
            .ok_or(LorcanaError::EntityNotFound(player_id.as_u32()))
    }

    pub fn get_player(&self, id: PlayerId) -> Result<&Player> {
        self.players
            .iter()
            .find(|p| p.id == id)
            .ok_or(LorcanaError::EntityNotFound(id.as_u32()))
    }

    pub fn get_player_mut(&mut self, id: PlayerId) -> Result<&mut Player> {
        self.players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(LorcanaError::EntityNotFound(id.as_u32()))
    }

    pub fn get_next_player_idx(&self, current_idx: usize) -> usize {
        (current_idx + 1) % self.players.len()
    }

    /// Player ids in turn order
    pub fn player_ids(&self) -> Vec<PlayerId> {
        self.players.iter().map(|p| p.id).collect()
    }

    pub fn opponents(&self, player_id: PlayerId) -> Vec<PlayerId> {
        self.players.iter().map(|p| p.id).filter(|id| *id != player_id).collect()
    }

    pub fn card(&self, id: CardId) -> Result<&Card> {
        self.cards.get(id)
    }

    pub fn card_mut(&mut self, id: CardId) -> Result<&mut Card> {
        self.cards.get_mut(id)
    }

    /// Card instances in one of a player's zones, in zone order
    pub fn zone_cards(&self, player_id: PlayerId, zone: Zone) -> &[CardId] {
        self.get_player_zones(player_id)
            .map(|z| z[zone].cards.as_slice())
            .unwrap_or(&[])
    }

    pub fn cards_in_play(&self, player_id: PlayerId) -> &[CardId] {
        self.zone_cards(player_id, Zone::Play)
    }

    /// Every card in play, player by player in turn order
    pub fn all_in_play(&self) -> Vec<CardId> {
        self.player_zones
            .iter()
            .flat_map(|zones| zones[Zone::Play].cards.iter().copied())
            .collect()
    }

    pub fn zone_of(&self, card_id: CardId) -> Option<Zone> {
        let owner = self.cards.get(card_id).ok()?.owner;
        self.get_player_zones(owner)?.find(card_id)
    }

    /// Instantiate a card directly into one of its owner's zones
    pub fn create_card(
        &mut self,
        definition: Arc<CardDefinition>,
        abilities: Arc<Vec<AbilityDefinition>>,
        owner: PlayerId,
        zone: Zone,
    ) -> Result<CardId> {
        let id = self.next_card_id();
        let mut card = Card::new(id, definition, abilities, owner);
        // Cards set up directly in play start the game dry
        card.dry = zone == Zone::Play;
        self.zones_mut(owner)?[zone].add(id);
        self.cards.insert(id, card);
        self.record(GameEvent::CardMoved {
            card: id,
            owner,
            from: None,
            to: zone,
        });
        Ok(id)
    }

    /// Instantiate a deck, parsing each distinct definition once
    pub fn add_deck(&mut self, owner: PlayerId, deck: &[Arc<CardDefinition>]) -> Result<Vec<CardId>> {
        let mut parsed: FxHashMap<String, Arc<Vec<AbilityDefinition>>> = FxHashMap::default();
        let mut ids = Vec::with_capacity(deck.len());
        for def in deck {
            let abilities = parsed
                .entry(def.id.clone())
                .or_insert_with(|| Arc::new(crate::parser::parse(def)))
                .clone();
            ids.push(self.create_card(def.clone(), abilities, owner, Zone::Deck)?);
        }
        Ok(ids)
    }

    /// Move a card between two of its owner's zones
    ///
    /// Leaving play clears damage, exertion and modifiers. A card entering
    /// play arrives wet (not dry) and ready.
    pub fn move_card(&mut self, card_id: CardId, from: Zone, to: Zone) -> Result<()> {
        let owner = self.cards.get(card_id)?.owner;
        let zones = self.zones_mut(owner)?;
        if !zones[from].remove(card_id) {
            return Err(LorcanaError::InvalidAction(format!(
                "Card {card_id} not found in {from:?}"
            )));
        }
        zones[to].add(card_id);

        let card = self.cards.get_mut(card_id)?;
        if from == Zone::Play || to == Zone::Play {
            card.reset();
        }
        if to == Zone::Inkwell {
            card.ready();
        }

        self.record(GameEvent::CardMoved {
            card: card_id,
            owner,
            from: Some(from),
            to,
        });
        Ok(())
    }

    /// Draw a card; an empty deck draws nothing
    pub fn draw_card(&mut self, player_id: PlayerId) -> Result<Option<CardId>> {
        let zones = self.zones_mut(player_id)?;
        let Some(card_id) = zones[Zone::Deck].draw_top() else {
            return Ok(None);
        };
        zones[Zone::Hand].add(card_id);
        self.record(GameEvent::CardMoved {
            card: card_id,
            owner: player_id,
            from: Some(Zone::Deck),
            to: Zone::Hand,
        });
        self.record(GameEvent::CardDrawn {
            player: player_id,
            card: card_id,
        });
        Ok(Some(card_id))
    }

    pub fn shuffle_deck(&mut self, player_id: PlayerId) {
        let mut rng = self.rng.borrow_mut();
        if let Some(zones) = self.player_zones.iter_mut().find(|z| z.owner == player_id) {
            zones[Zone::Deck].shuffle(&mut *rng);
        }
    }

    pub fn exert_card(&mut self, card_id: CardId) -> Result<()> {
        self.cards.get_mut(card_id)?.exert();
        self.record(GameEvent::CardExerted { card: card_id });
        Ok(())
    }

    pub fn ready_card(&mut self, card_id: CardId) -> Result<()> {
        self.cards.get_mut(card_id)?.ready();
        self.record(GameEvent::CardReadied { card: card_id });
        Ok(())
    }

    /// Deal damage after Resist and damage-prevention statics; returns the
    /// damage actually placed
    pub fn deal_damage(&mut self, card_id: CardId, amount: u32, source: Option<CardId>) -> Result<u32> {
        let dealt = statics::incoming_damage(self, card_id, amount);
        if dealt == 0 {
            return Ok(0);
        }
        self.cards.get_mut(card_id)?.add_damage(dealt);
        self.record(GameEvent::DamageDealt {
            card: card_id,
            amount: dealt,
            source,
        });
        Ok(dealt)
    }

    pub fn remove_damage(&mut self, card_id: CardId, amount: u32) -> Result<u32> {
        let removed = self.cards.get_mut(card_id)?.remove_damage(amount);
        if removed > 0 {
            self.record(GameEvent::DamageRemoved {
                card: card_id,
                amount: removed,
            });
        }
        Ok(removed)
    }

    /// Banish a card in play to its owner's discard
    pub fn banish(&mut self, card_id: CardId, banisher: Option<CardId>) -> Result<()> {
        let owner = self.cards.get(card_id)?.owner;
        self.move_card(card_id, Zone::Play, Zone::Discard)?;
        self.record(GameEvent::CardBanished {
            card: card_id,
            owner,
            banisher,
        });
        Ok(())
    }

    /// Characters and locations whose damage has reached their willpower
    pub fn lethally_damaged(&self) -> Vec<CardId> {
        self.all_in_play()
            .into_iter()
            .filter(|&id| {
                self.cards.get(id).is_ok_and(|card| {
                    card.definition.willpower.is_some()
                        && card.damage > 0
                        && i64::from(card.damage) >= i64::from(statics::effective_stat(self, id, crate::core::Stat::Willpower))
                })
            })
            .collect()
    }

    pub fn gain_lore(&mut self, player_id: PlayerId, amount: u32) -> Result<()> {
        if amount == 0 {
            return Ok(());
        }
        let lore_to_win = self.config.lore_to_win;
        let player = self.get_player_mut(player_id)?;
        let already_won = player.has_won;
        player.gain_lore(amount, lore_to_win);
        let (total, won) = (player.lore, player.has_won);
        self.record(GameEvent::LoreChanged {
            player: player_id,
            delta: amount as i32,
            total,
        });
        if won && !already_won {
            self.record(GameEvent::GameWon { player: player_id });
        }
        Ok(())
    }

    pub fn lose_lore(&mut self, player_id: PlayerId, amount: u32) -> Result<u32> {
        let player = self.get_player_mut(player_id)?;
        let lost = player.lose_lore(amount);
        let total = player.lore;
        if lost > 0 {
            self.record(GameEvent::LoreChanged {
                player: player_id,
                delta: -(lost as i32),
                total,
            });
        }
        Ok(lost)
    }

    /// Ready cards in a player's inkwell
    pub fn available_ink(&self, player_id: PlayerId) -> u32 {
        self.zone_cards(player_id, Zone::Inkwell)
            .iter()
            .filter(|&&id| self.cards.get(id).is_ok_and(|c| !c.exerted))
            .count() as u32
    }

    /// Pay ink by exerting ready inkwell cards
    pub fn pay_ink(&mut self, player_id: PlayerId, amount: u32) -> Result<()> {
        if self.available_ink(player_id) < amount {
            return Err(LorcanaError::InvalidAction(format!(
                "Player {player_id} cannot pay {amount} ink"
            )));
        }
        let ready: Vec<CardId> = self
            .zone_cards(player_id, Zone::Inkwell)
            .iter()
            .copied()
            .filter(|&id| self.cards.get(id).is_ok_and(|c| !c.exerted))
            .take(amount as usize)
            .collect();
        for id in ready {
            self.cards.get_mut(id)?.exert();
        }
        Ok(())
    }

    /// Ready step: ready everything in play and in the inkwell, and dry
    /// the player's characters
    pub fn ready_step(&mut self, player_id: PlayerId) -> Result<()> {
        let mut ids: Vec<CardId> = self.cards_in_play(player_id).to_vec();
        ids.extend_from_slice(self.zone_cards(player_id, Zone::Inkwell));
        for id in ids {
            let card = self.cards.get_mut(id)?;
            card.dry = true;
            if card.exerted && !card.is_restricted(crate::core::RestrictedAction::Ready) {
                card.ready();
            }
        }
        self.get_player_mut(player_id)?.reset_ink();
        Ok(())
    }

    /// Drop modifiers and discounts whose expiry has been reached
    pub fn expire(&mut self, boundary: Expiry) -> usize {
        let mut expired = 0;
        for id in self.all_in_play() {
            if let Ok(card) = self.cards.get_mut(id) {
                expired += card.expire_modifiers(|e| *e == boundary);
            }
        }
        for player in &mut self.players {
            let before = player.discounts.len();
            player.discounts.retain(|d| d.expiry != boundary);
            expired += before - player.discounts.len();
        }
        expired
    }

    pub fn add_discount(&mut self, player_id: PlayerId, discount: CostDiscount) -> Result<()> {
        self.get_player_mut(player_id)?.discounts.push(discount);
        Ok(())
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.players.iter().find(|p| p.has_won).map(|p| p.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CardType, Stat};

    fn character(name: &str, strength: u8, willpower: u8) -> Arc<CardDefinition> {
        let mut def = CardDefinition::new(format!("T-{name}"), name, CardType::Character, 2);
        def.strength = Some(strength);
        def.willpower = Some(willpower);
        def.lore = Some(1);
        def.inkable = true;
        Arc::new(def)
    }

    fn game() -> GameState {
        GameState::new_two_player("Alice", "Bob", GameConfig::default())
    }

    #[test]
    fn test_create_game() {
        let game = game();
        assert_eq!(game.players.len(), 2);
        assert_eq!(game.opponents(PlayerId::new(0)), vec![PlayerId::new(1)]);
        assert_eq!(game.config.lore_to_win, 20);
        assert!(game.winner().is_none());
    }

    #[test]
    fn test_card_in_exactly_one_zone() {
        let mut game = game();
        let alice = PlayerId::new(0);
        let id = game
            .create_card(character("Goofy", 2, 3), Arc::new(Vec::new()), alice, Zone::Hand)
            .unwrap();

        game.move_card(id, Zone::Hand, Zone::Play).unwrap();
        assert_eq!(game.zone_of(id), Some(Zone::Play));
        assert!(game.zone_cards(alice, Zone::Hand).is_empty());

        // Moving from the wrong zone fails and changes nothing
        assert!(game.move_card(id, Zone::Hand, Zone::Discard).is_err());
        assert_eq!(game.zone_of(id), Some(Zone::Play));
    }

    #[test]
    fn test_leaving_play_resets_card() {
        let mut game = game();
        let alice = PlayerId::new(0);
        let id = game
            .create_card(character("Goofy", 2, 5), Arc::new(Vec::new()), alice, Zone::Play)
            .unwrap();
        game.exert_card(id).unwrap();
        game.deal_damage(id, 2, None).unwrap();

        game.move_card(id, Zone::Play, Zone::Hand).unwrap();
        let card = game.card(id).unwrap();
        assert_eq!(card.damage, 0);
        assert!(!card.exerted);
    }

    #[test]
    fn test_draw_from_empty_deck() {
        let mut game = game();
        assert_eq!(game.draw_card(PlayerId::new(0)).unwrap(), None);
    }

    #[test]
    fn test_draw_records_events() {
        let mut game = game();
        let alice = PlayerId::new(0);
        let id = game
            .create_card(character("Goofy", 2, 3), Arc::new(Vec::new()), alice, Zone::Deck)
            .unwrap();
        assert_eq!(game.draw_card(alice).unwrap(), Some(id));
        assert_eq!(
            game.events.last(),
            Some(&GameEvent::CardDrawn { player: alice, card: id })
        );
    }

    #[test]
    fn test_lore_and_win() {
        let mut game = game();
        let alice = PlayerId::new(0);
        game.gain_lore(alice, 19).unwrap();
        assert!(game.winner().is_none());
        game.gain_lore(alice, 1).unwrap();
        assert_eq!(game.winner(), Some(alice));
        assert_eq!(game.events.last(), Some(&GameEvent::GameWon { player: alice }));

        assert_eq!(game.lose_lore(alice, 25).unwrap(), 20);
    }

    #[test]
    fn test_ink_payment() {
        let mut game = game();
        let alice = PlayerId::new(0);
        for name in ["A", "B", "C"] {
            game.create_card(character(name, 1, 1), Arc::new(Vec::new()), alice, Zone::Inkwell)
                .unwrap();
        }
        assert_eq!(game.available_ink(alice), 3);
        game.pay_ink(alice, 2).unwrap();
        assert_eq!(game.available_ink(alice), 1);
        assert!(game.pay_ink(alice, 2).is_err());

        game.ready_step(alice).unwrap();
        assert_eq!(game.available_ink(alice), 3);
    }

    #[test]
    fn test_lethal_damage() {
        let mut game = game();
        let alice = PlayerId::new(0);
        let id = game
            .create_card(character("Goofy", 2, 3), Arc::new(Vec::new()), alice, Zone::Play)
            .unwrap();
        game.deal_damage(id, 2, None).unwrap();
        assert!(game.lethally_damaged().is_empty());
        game.deal_damage(id, 1, None).unwrap();
        assert_eq!(game.lethally_damaged(), vec![id]);
        assert_eq!(statics::effective_stat(&game, id, Stat::Willpower), 3);

        game.banish(id, None).unwrap();
        assert_eq!(game.zone_of(id), Some(Zone::Discard));
    }

    #[test]
    fn test_add_deck_shares_parsed_abilities() {
        let mut game = game();
        let alice = PlayerId::new(0);
        let def = character("Goofy", 2, 3);
        let ids = game.add_deck(alice, &[def.clone(), def]).unwrap();
        let a = game.card(ids[0]).unwrap();
        let b = game.card(ids[1]).unwrap();
        assert!(Arc::ptr_eq(&a.abilities, &b.abilities));
        assert_eq!(game.zone_cards(alice, Zone::Deck).len(), 2);
    }

    #[test]
    fn test_seeded_shuffle_is_deterministic() {
        let build = || {
            let mut game = game();
            let alice = PlayerId::new(0);
            for i in 0..10 {
                game.create_card(character(&format!("C{i}"), 1, 1), Arc::new(Vec::new()), alice, Zone::Deck)
                    .unwrap();
            }
            game.shuffle_deck(alice);
            game.zone_cards(alice, Zone::Deck).to_vec()
        };
        assert_eq!(build(), build());
    }
}
