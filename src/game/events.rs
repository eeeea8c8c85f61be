//! Observable game events
//!
//! Every state change made through `GameState` is appended to the `EventLog`
//! as a `GameEvent`. Presentation layers can subscribe an `EventListener`.

use crate::core::{AbilityId, CardId, PlayerId};
use crate::game::Step;
use crate::zones::Zone;
use serde::{Deserialize, Serialize};

/// State change emitted by the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum GameEvent {
    TurnStarted {
        player: PlayerId,
        turn: u32,
    },
    TurnEnded {
        player: PlayerId,
        turn: u32,
    },
    StepChanged {
        step: Step,
    },

    /// A card changed zones; `from` is `None` when it was created in `to`
    CardMoved {
        card: CardId,
        owner: PlayerId,
        from: Option<Zone>,
        to: Zone,
    },
    CardDrawn {
        player: PlayerId,
        card: CardId,
    },
    CardInked {
        player: PlayerId,
        card: CardId,
    },
    CardPlayed {
        player: PlayerId,
        card: CardId,
        shifted: bool,
        sung: bool,
    },

    CardExerted {
        card: CardId,
    },
    CardReadied {
        card: CardId,
    },
    DamageDealt {
        card: CardId,
        amount: u32,
        source: Option<CardId>,
    },
    DamageRemoved {
        card: CardId,
        amount: u32,
    },
    CardBanished {
        card: CardId,
        owner: PlayerId,
        banisher: Option<CardId>,
    },

    Quested {
        card: CardId,
        player: PlayerId,
        lore: u32,
    },
    Challenged {
        attacker: CardId,
        defender: CardId,
    },
    LoreChanged {
        player: PlayerId,
        delta: i32,
        total: u32,
    },

    AbilityTriggered {
        card: CardId,
        ability: AbilityId,
    },
    AbilityActivated {
        card: CardId,
        ability: AbilityId,
    },
    /// An effect could not resolve (target gone, nothing legal, unparsed text)
    EffectSkipped {
        card: CardId,
        effect: String,
        reason: String,
    },
    /// The controller answered "no" to a "may"
    EffectDeclined {
        card: CardId,
        effect: String,
    },

    GameWon {
        player: PlayerId,
    },
}

impl GameEvent {
    /// Player whose card or turn this event concerns, if any
    pub fn affected_player(&self) -> Option<PlayerId> {
        match self {
            GameEvent::TurnStarted { player, .. }
            | GameEvent::TurnEnded { player, .. }
            | GameEvent::CardDrawn { player, .. }
            | GameEvent::CardInked { player, .. }
            | GameEvent::CardPlayed { player, .. }
            | GameEvent::Quested { player, .. }
            | GameEvent::LoreChanged { player, .. }
            | GameEvent::GameWon { player } => Some(*player),
            GameEvent::CardMoved { owner, .. } | GameEvent::CardBanished { owner, .. } => Some(*owner),
            _ => None,
        }
    }
}

/// Subscriber notified of each event as it is recorded
pub trait EventListener {
    fn on_event(&mut self, event: &GameEvent);
}

/// Append-only log of game events
pub struct EventLog {
    events: Vec<GameEvent>,
    listeners: Vec<Box<dyn EventListener>>,
}

impl EventLog {
    pub fn new() -> Self {
        EventLog {
            events: Vec::new(),
            listeners: Vec::new(),
        }
    }

    /// Record an event and notify subscribers
    pub fn record(&mut self, event: GameEvent) {
        for listener in &mut self.listeners {
            listener.on_event(&event);
        }
        self.events.push(event);
    }

    pub fn subscribe(&mut self, listener: Box<dyn EventListener>) {
        self.listeners.push(listener);
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn last(&self) -> Option<&GameEvent> {
        self.events.last()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

// Listeners belong to the original state; clones only copy history
impl Clone for EventLog {
    fn clone(&self) -> Self {
        EventLog {
            events: self.events.clone(),
            listeners: Vec::new(),
        }
    }
}

impl std::fmt::Debug for EventLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLog")
            .field("events", &self.events.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Serialize for EventLog {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.events.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for EventLog {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let events = Vec::<GameEvent>::deserialize(deserializer)?;
        Ok(EventLog {
            events,
            listeners: Vec::new(),
        })
    }
}
