//! Trigger dispatcher
//!
//! Maps a `GameEvent` to the triggered abilities it fires, against the state
//! at the moment the event is recorded. Matching
//! abilities are returned in a fixed order: the affected player's cards
//! first, then the other players in turn order, each player's cards in the
//! order they entered play, each card's abilities in printed order.

use crate::core::{AbilityId, AbilityKind, Actor, CardId, PlayerId, Timing, TriggerDescriptor, TriggerEvent};
use crate::game::{GameEvent, GameState, Step};
use crate::zones::Zone;
use std::collections::VecDeque;

/// A triggered ability waiting to resolve
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTrigger {
    pub source: CardId,
    pub controller: PlayerId,
    /// Index into the source card's ability list
    pub ability_index: usize,
    pub ability: AbilityId,
    /// Card the event was about ("that character")
    pub triggered_by: Option<CardId>,
}

/// One trigger-relevant happening extracted from an event
#[derive(Debug, Clone, Copy)]
struct Occurrence {
    event: TriggerEvent,
    subject: Option<CardId>,
    player: PlayerId,
    banisher: Option<CardId>,
    in_challenge: bool,
}

impl Occurrence {
    fn new(event: TriggerEvent, subject: Option<CardId>, player: PlayerId) -> Self {
        Occurrence {
            event,
            subject,
            player,
            banisher: None,
            in_challenge: false,
        }
    }
}

fn occurrences(state: &GameState, event: &GameEvent) -> Vec<Occurrence> {
    let owner = |card: CardId| state.cards.get(card).map(|c| c.owner).ok();
    match *event {
        GameEvent::CardPlayed { player, card, .. } => vec![Occurrence::new(TriggerEvent::OnPlay, Some(card), player)],
        GameEvent::Quested { card, player, .. } => vec![Occurrence::new(TriggerEvent::OnQuest, Some(card), player)],
        GameEvent::Challenged { attacker, defender } => {
            let mut out = Vec::new();
            if let Some(p) = owner(attacker) {
                out.push(Occurrence::new(TriggerEvent::OnChallenge, Some(attacker), p));
            }
            if let Some(p) = owner(defender) {
                out.push(Occurrence::new(TriggerEvent::OnChallenged, Some(defender), p));
            }
            out
        }
        GameEvent::CardBanished { card, owner, banisher } => vec![Occurrence {
            event: TriggerEvent::OnBanish,
            subject: Some(card),
            player: owner,
            banisher,
            in_challenge: state.turn.current_step == Step::Challenge,
        }],
        GameEvent::DamageDealt { card, .. } => owner(card)
            .map(|p| vec![Occurrence::new(TriggerEvent::OnDamage, Some(card), p)])
            .unwrap_or_default(),
        GameEvent::CardDrawn { player, .. } => vec![Occurrence::new(TriggerEvent::OnDraw, None, player)],
        GameEvent::TurnStarted { player, .. } => vec![Occurrence::new(TriggerEvent::StartOfTurn, None, player)],
        GameEvent::TurnEnded { player, .. } => vec![Occurrence::new(TriggerEvent::EndOfTurn, None, player)],
        _ => Vec::new(),
    }
}

fn descriptor_matches(
    state: &GameState,
    desc: &TriggerDescriptor,
    source: CardId,
    controller: PlayerId,
    occ: &Occurrence,
) -> bool {
    if desc.event != occ.event {
        return false;
    }
    let active = state.turn.active_player;
    match desc.timing {
        Timing::AnyTurn => {}
        Timing::YourTurn if active != controller => return false,
        Timing::OpponentsTurn if active == controller => return false,
        _ => {}
    }
    if desc.filter.in_challenge && !occ.in_challenge {
        return false;
    }

    // "whenever this character banishes another character": the actor is the banisher
    let subject = if desc.filter.banisher { occ.banisher } else { occ.subject };
    if desc.filter.banisher && subject.is_none() {
        return false;
    }
    let subject_owner = match subject {
        Some(card) => match state.cards.get(card) {
            Ok(c) => c.owner,
            Err(_) => return false,
        },
        None => occ.player,
    };

    let actor_ok = match desc.actor {
        Actor::This => match subject {
            Some(card) => card == source,
            None => occ.player == controller,
        },
        Actor::Yours => subject_owner == controller,
        Actor::YourOther => subject_owner == controller && subject != Some(source),
        Actor::Opponent => subject_owner != controller,
        Actor::Any => true,
    };
    if !actor_ok {
        return false;
    }

    if desc.filter.is_empty() {
        return true;
    }
    let Some(card) = subject.and_then(|id| state.cards.get(id).ok()) else {
        // Type filters need a card to look at
        return desc.filter.card_type.is_none() && desc.filter.classification.is_none() && !desc.filter.song;
    };
    let def = &card.definition;
    if desc.filter.card_type.is_some_and(|t| t != def.card_type) {
        return false;
    }
    if let Some(class) = &desc.filter.classification {
        if !def.has_classification(class.as_str()) {
            return false;
        }
    }
    if desc.filter.song && !def.is_song() {
        return false;
    }
    desc.filter.max_cost.map_or(true, |max| def.cost <= max)
}

/// Triggered abilities fired by `event`, in resolution order
pub fn collect(state: &GameState, event: &GameEvent) -> Vec<PendingTrigger> {
    let mut pending = Vec::new();
    for occ in occurrences(state, event) {
        let mut order = vec![occ.player];
        order.extend(state.player_ids().into_iter().filter(|p| *p != occ.player));

        for player in order {
            let mut sources: Vec<CardId> = state.cards_in_play(player).to_vec();
            // A banished card still sees its own "when this is banished"
            if occ.event == TriggerEvent::OnBanish {
                if let Some(subject) = occ.subject {
                    let owned = state.cards.get(subject).is_ok_and(|c| c.owner == player);
                    if owned && state.zone_of(subject) != Some(Zone::Play) {
                        sources.push(subject);
                    }
                }
            }

            for source in sources {
                let Ok(card) = state.cards.get(source) else {
                    continue;
                };
                let in_play = state.zone_of(source) == Some(Zone::Play);
                for (idx, ability) in card.abilities.iter().enumerate() {
                    if ability.kind != AbilityKind::Triggered {
                        continue;
                    }
                    let Some(desc) = &ability.trigger else {
                        continue;
                    };
                    // Out of play, only self-referencing triggers apply
                    if !in_play && desc.actor != Actor::This {
                        continue;
                    }
                    if descriptor_matches(state, desc, source, card.owner, &occ) {
                        pending.push(PendingTrigger {
                            source,
                            controller: card.owner,
                            ability_index: idx,
                            ability: ability.id.clone(),
                            triggered_by: occ.subject,
                        });
                    }
                }
            }
        }
    }
    pending
}

/// FIFO of triggers awaiting resolution
#[derive(Debug, Clone, Default)]
pub struct TriggerQueue {
    queue: VecDeque<PendingTrigger>,
}

impl TriggerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, fired: Vec<PendingTrigger>) {
        self.queue.extend(fired);
    }

    /// Move everything queued so far into a fresh queue
    pub fn take(&mut self) -> TriggerQueue {
        std::mem::take(self)
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }

    pub fn pop(&mut self) -> Option<PendingTrigger> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        AbilityDefinition, Amount, CardDefinition, CardType, CostList, Effect, TargetSelector, TriggerFilter,
    };
    use crate::game::GameConfig;
    use std::sync::Arc;

    fn triggered(id: &str, desc: TriggerDescriptor) -> AbilityDefinition {
        AbilityDefinition {
            id: AbilityId::new(id),
            card_id: id.to_string(),
            name: None,
            kind: AbilityKind::Triggered,
            costs: CostList::new(),
            trigger: Some(desc),
            effects: vec![Effect::GainLore {
                amount: Amount::one(),
                target: TargetSelector::You,
                optional: false,
            }],
            source_text: String::new(),
        }
    }

    fn place(game: &mut GameState, owner: PlayerId, abilities: Vec<AbilityDefinition>) -> CardId {
        let mut def = CardDefinition::new("T", "Tester", CardType::Character, 2);
        def.strength = Some(1);
        def.willpower = Some(2);
        game.create_card(Arc::new(def), Arc::new(abilities), owner, Zone::Play).unwrap()
    }

    #[test]
    fn test_this_quests() {
        let mut game = GameState::new_two_player("Alice", "Bob", GameConfig::default());
        let alice = PlayerId::new(0);
        let a = place(&mut game, alice, vec![triggered("A-0", TriggerDescriptor::new(TriggerEvent::OnQuest, Actor::This))]);
        let b = place(&mut game, alice, Vec::new());

        let quest = |card| GameEvent::Quested { card, player: alice, lore: 1 };
        assert_eq!(collect(&game, &quest(a)).len(), 1);
        assert!(collect(&game, &quest(b)).is_empty());
    }

    #[test]
    fn test_affected_player_triggers_first() {
        let mut game = GameState::new_two_player("Alice", "Bob", GameConfig::default());
        let alice = PlayerId::new(0);
        let bob = PlayerId::new(1);
        let any_play = TriggerDescriptor::new(TriggerEvent::OnPlay, Actor::Any);
        let alice_card = place(&mut game, alice, vec![triggered("A-0", any_play.clone())]);
        let bob_card = place(&mut game, bob, vec![triggered("B-0", any_play)]);
        let played = place(&mut game, bob, Vec::new());

        let event = GameEvent::CardPlayed {
            player: bob,
            card: played,
            shifted: false,
            sung: false,
        };
        let sources: Vec<CardId> = collect(&game, &event).iter().map(|t| t.source).collect();
        assert_eq!(sources, vec![bob_card, alice_card]);
    }

    #[test]
    fn test_opponent_and_filter_qualifiers() {
        let mut game = GameState::new_two_player("Alice", "Bob", GameConfig::default());
        let alice = PlayerId::new(0);
        let bob = PlayerId::new(1);
        let mut desc = TriggerDescriptor::new(TriggerEvent::OnPlay, Actor::Opponent);
        desc.filter = TriggerFilter {
            card_type: Some(CardType::Item),
            ..TriggerFilter::default()
        };
        place(&mut game, alice, vec![triggered("A-0", desc)]);
        let bob_character = place(&mut game, bob, Vec::new());

        let event = GameEvent::CardPlayed {
            player: bob,
            card: bob_character,
            shifted: false,
            sung: false,
        };
        // Character, not an item
        assert!(collect(&game, &event).is_empty());
    }

    #[test]
    fn test_banished_card_sees_own_trigger() {
        let mut game = GameState::new_two_player("Alice", "Bob", GameConfig::default());
        let alice = PlayerId::new(0);
        let card = place(&mut game, alice, vec![triggered("A-0", TriggerDescriptor::new(TriggerEvent::OnBanish, Actor::This))]);
        game.banish(card, None).unwrap();

        let fired = collect(&game, game.events.last().unwrap());
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].triggered_by, Some(card));
    }

    #[test]
    fn test_in_challenge_banish_filter() {
        let mut game = GameState::new_two_player("Alice", "Bob", GameConfig::default());
        let alice = PlayerId::new(0);
        let mut desc = TriggerDescriptor::new(TriggerEvent::OnBanish, Actor::This);
        desc.filter.in_challenge = true;

        let quiet = place(&mut game, alice, vec![triggered("A-0", desc.clone())]);
        game.banish(quiet, None).unwrap();
        assert!(collect(&game, game.events.last().unwrap()).is_empty());

        let fighter = place(&mut game, alice, vec![triggered("A-1", desc)]);
        game.turn.current_step = Step::Challenge;
        game.banish(fighter, None).unwrap();
        assert_eq!(collect(&game, game.events.last().unwrap()).len(), 1);
    }

    #[test]
    fn test_timing_qualifier() {
        let mut game = GameState::new_two_player("Alice", "Bob", GameConfig::default());
        let bob = PlayerId::new(1);
        let desc = TriggerDescriptor::new(TriggerEvent::OnDraw, Actor::Yours).with_timing(Timing::OpponentsTurn);
        place(&mut game, bob, vec![triggered("B-0", desc)]);

        let draw = GameEvent::CardDrawn {
            player: bob,
            card: CardId::new(50),
        };
        // Alice is active, so Bob drawing is on an opponent's turn from Bob's side
        assert_eq!(collect(&game, &draw).len(), 1);
        game.turn.active_player = bob;
        assert!(collect(&game, &draw).is_empty());
    }
}
