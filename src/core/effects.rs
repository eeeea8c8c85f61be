//! Effect primitives and the vocabulary they are built from
//!
//! `Effect` is a closed sum type: the parser emits it, the resolver consumes
//! it, and an added variant is a compile error in both places until handled.

use crate::core::{CardName, CardType, Classification, Keyword};
use crate::zones::Zone;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Numeric stats printed on a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stat {
    Strength,
    Willpower,
    Lore,
}

/// How long a modification lasts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Duration {
    /// Until the end of the current turn
    ThisTurn,
    /// Until the start of the controller's next turn
    UntilStartOfYourNextTurn,
    /// For as long as the source is in scope (static abilities)
    Permanent,
}

/// Derived amounts ("equal to the number of ...")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DynamicAmount {
    /// Number of cards in play matching a filter
    CountInPlay { filter: CardFilter },
    /// Cards in the controller's hand (or an opponent's)
    CardsInHand { opponent: bool },
    /// One of the source card's own stats
    SelfStat(Stat),
    /// Damage counters on the source card
    DamageOnSelf,
    /// Recognized as dynamic but not modeled; resolves to 0
    Formula(String),
}

/// Effect magnitude
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Amount {
    Fixed(u32),
    /// "up to N": the resolver may pick anything from 0 to N
    UpTo(u32),
    Dynamic(DynamicAmount),
    /// "all damage"
    All,
}

impl Amount {
    pub fn one() -> Self {
        Amount::Fixed(1)
    }
}

/// Which side of the table a filtered card must be on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OwnerFilter {
    #[default]
    Any,
    You,
    Opponent,
}

/// Predicate over card instances
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CardFilter {
    pub card_type: Option<CardType>,
    pub owner: OwnerFilter,
    /// Exclude the source card ("another", "other")
    pub other: bool,
    pub exerted: Option<bool>,
    pub damaged: Option<bool>,
    pub classification: Option<Classification>,
    pub name: Option<CardName>,
    pub max_cost: Option<u8>,
    pub max_strength: Option<u32>,
}

impl CardFilter {
    pub fn of_type(card_type: CardType) -> Self {
        CardFilter {
            card_type: Some(card_type),
            ..Default::default()
        }
    }

    pub fn characters() -> Self {
        Self::of_type(CardType::Character)
    }

    pub fn owned_by(mut self, owner: OwnerFilter) -> Self {
        self.owner = owner;
        self
    }

    pub fn other(mut self) -> Self {
        self.other = true;
        self
    }
}

/// Who or what an effect applies to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetSelector {
    /// The source card itself
    This,
    /// The ability's controller
    You,
    /// Every opponent
    Opponents,
    /// A player chosen on resolution
    ChosenPlayer,
    ChosenOpponent,
    AllPlayers,
    /// Chosen card(s); `up_to` allows choosing fewer than `count`
    Chosen { filter: CardFilter, count: u32, up_to: bool },
    /// Every matching card
    Each { filter: CardFilter },
    /// "that character", "them", "it": the cards targeted earlier in the same
    /// resolution, else the card that caused the trigger
    Referenced,
    /// Top cards of the controller's deck
    TopOfDeck { count: u32 },
}

impl TargetSelector {
    pub fn chosen(filter: CardFilter) -> Self {
        TargetSelector::Chosen {
            filter,
            count: 1,
            up_to: false,
        }
    }
}

/// A keyword handed out by a grant effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordGrant {
    pub keyword: Keyword,
    pub value: Option<u32>,
}

/// Actions a `Restriction` forbids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RestrictedAction {
    Quest,
    Challenge,
    Ready,
    BeChallenged,
    Sing,
}

/// Events a `Replacement` substitutes for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplacedEvent {
    /// Damage that would be dealt to cards matching the selector
    DamageDealt { target: TargetSelector },
    /// The source card being banished
    SelfBanished,
}

/// How a cost substitution is paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubstitutionMode {
    /// This character may exert to sing songs costing `value` or less
    Singer,
    /// Several characters with total cost `value` may sing together
    SingTogether,
    /// Reminder text on a song ("A character with cost N or more can sing this song for free")
    SongReminder,
}

/// Guard predicates for `Conditional`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    SelfUndamaged,
    SelfDamaged,
    SelfExerted,
    YourTurn,
    OpponentsTurn,
    /// Controller has at least `min` cards in play matching the filter
    ControlCards { filter: CardFilter, min: u32 },
    /// Controller has no cards in play matching the filter
    ControlNone { filter: CardFilter },
    CardsInHand { min: Option<u32>, max: Option<u32> },
    LoreAtLeast(u32),
    OpponentHasMoreLore,
    /// Predicate text the grammar didn't cover; evaluates to false
    Unrecognized(String),
}

/// Typed effect primitives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Effect {
    DrawCard {
        amount: Amount,
        target: TargetSelector,
        optional: bool,
    },
    DealDamage {
        amount: Amount,
        target: TargetSelector,
        optional: bool,
    },
    GainLore {
        amount: Amount,
        target: TargetSelector,
        optional: bool,
    },
    LoseLore {
        amount: Amount,
        target: TargetSelector,
        optional: bool,
    },
    /// `delta` is multiplied by `per` when present ("+1 {s} for each ...")
    ModifyStat {
        stat: Stat,
        delta: i32,
        per: Option<DynamicAmount>,
        target: TargetSelector,
        duration: Duration,
        optional: bool,
    },
    /// `from = None` means the zone the target is in right now
    MoveZone {
        from: Option<Zone>,
        to: Zone,
        target: TargetSelector,
        optional: bool,
    },
    GrantKeyword {
        keywords: SmallVec<[KeywordGrant; 2]>,
        target: TargetSelector,
        duration: Duration,
        optional: bool,
    },
    Exert {
        target: TargetSelector,
        optional: bool,
    },
    Ready {
        target: TargetSelector,
        optional: bool,
    },
    RemoveDamage {
        amount: Amount,
        target: TargetSelector,
        optional: bool,
    },
    Restriction {
        action: RestrictedAction,
        target: TargetSelector,
        duration: Duration,
        optional: bool,
    },
    /// "You pay N {i} less" for cards matching the filter
    CostReduction {
        amount: u32,
        filter: CardFilter,
        duration: Duration,
        optional: bool,
    },
    Conditional {
        condition: Condition,
        effects: Vec<Effect>,
    },
    /// Empty `substitute` means the original event is simply prevented
    Replacement {
        original: ReplacedEvent,
        substitute: Vec<Effect>,
    },
    /// Passive keyword carried by the source card
    Keyword {
        keyword: Keyword,
        value: Option<u32>,
    },
    /// Resist: damage dealt to the source is reduced by `amount`
    DamageReduction {
        amount: u32,
    },
    /// Shift: play for `cost` ink on top of a same-named character
    AlternateCost {
        cost: u32,
    },
    CostSubstitution {
        value: u32,
        mode: SubstitutionMode,
    },
    Unparsed {
        text: String,
    },
}

impl Effect {
    pub fn is_optional(&self) -> bool {
        match self {
            Effect::DrawCard { optional, .. }
            | Effect::DealDamage { optional, .. }
            | Effect::GainLore { optional, .. }
            | Effect::LoseLore { optional, .. }
            | Effect::ModifyStat { optional, .. }
            | Effect::MoveZone { optional, .. }
            | Effect::GrantKeyword { optional, .. }
            | Effect::Exert { optional, .. }
            | Effect::Ready { optional, .. }
            | Effect::RemoveDamage { optional, .. }
            | Effect::Restriction { optional, .. }
            | Effect::CostReduction { optional, .. } => *optional,
            _ => false,
        }
    }

    /// Mark the effect as a "you may" choice; wrappers pass the flag to their contents
    pub fn set_optional(&mut self, value: bool) {
        match self {
            Effect::DrawCard { optional, .. }
            | Effect::DealDamage { optional, .. }
            | Effect::GainLore { optional, .. }
            | Effect::LoseLore { optional, .. }
            | Effect::ModifyStat { optional, .. }
            | Effect::MoveZone { optional, .. }
            | Effect::GrantKeyword { optional, .. }
            | Effect::Exert { optional, .. }
            | Effect::Ready { optional, .. }
            | Effect::RemoveDamage { optional, .. }
            | Effect::Restriction { optional, .. }
            | Effect::CostReduction { optional, .. } => *optional = value,
            Effect::Conditional { effects, .. } => {
                for effect in effects {
                    effect.set_optional(value);
                }
            }
            Effect::Replacement { substitute, .. } => {
                for effect in substitute {
                    effect.set_optional(value);
                }
            }
            _ => {}
        }
    }

    /// Number of `Unparsed` leaves, counting inside wrappers
    pub fn unparsed_count(&self) -> usize {
        match self {
            Effect::Unparsed { .. } => 1,
            Effect::Conditional { effects, .. } | Effect::Replacement { substitute: effects, .. } => {
                effects.iter().map(Effect::unparsed_count).sum()
            }
            _ => 0,
        }
    }

    /// Short tag for diagnostics ("DrawCard", "Conditional", ...)
    pub fn tag(&self) -> &'static str {
        match self {
            Effect::DrawCard { .. } => "DrawCard",
            Effect::DealDamage { .. } => "DealDamage",
            Effect::GainLore { .. } => "GainLore",
            Effect::LoseLore { .. } => "LoseLore",
            Effect::ModifyStat { .. } => "ModifyStat",
            Effect::MoveZone { .. } => "MoveZone",
            Effect::GrantKeyword { .. } => "GrantKeyword",
            Effect::Exert { .. } => "Exert",
            Effect::Ready { .. } => "Ready",
            Effect::RemoveDamage { .. } => "RemoveDamage",
            Effect::Restriction { .. } => "Restriction",
            Effect::CostReduction { .. } => "CostReduction",
            Effect::Conditional { .. } => "Conditional",
            Effect::Replacement { .. } => "Replacement",
            Effect::Keyword { .. } => "Keyword",
            Effect::DamageReduction { .. } => "DamageReduction",
            Effect::AlternateCost { .. } => "AlternateCost",
            Effect::CostSubstitution { .. } => "CostSubstitution",
            Effect::Unparsed { .. } => "Unparsed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_optional_reaches_wrapped_effects() {
        let mut effect = Effect::Conditional {
            condition: Condition::YourTurn,
            effects: vec![Effect::DrawCard {
                amount: Amount::one(),
                target: TargetSelector::You,
                optional: false,
            }],
        };
        effect.set_optional(true);

        match &effect {
            Effect::Conditional { effects, .. } => assert!(effects[0].is_optional()),
            _ => panic!("Wrong effect type"),
        }
        // The wrapper itself is never a choice
        assert!(!effect.is_optional());
    }

    #[test]
    fn test_unparsed_count_is_recursive() {
        let effect = Effect::Conditional {
            condition: Condition::Unrecognized("you feel lucky".to_string()),
            effects: vec![
                Effect::Unparsed {
                    text: "do something odd".to_string(),
                },
                Effect::GainLore {
                    amount: Amount::Fixed(1),
                    target: TargetSelector::You,
                    optional: false,
                },
            ],
        };
        assert_eq!(effect.unparsed_count(), 1);
        assert_eq!(effect.tag(), "Conditional");
    }

    #[test]
    fn test_effect_json_is_tagged() {
        let effect = Effect::DealDamage {
            amount: Amount::Fixed(2),
            target: TargetSelector::chosen(CardFilter::characters()),
            optional: false,
        };
        let json = serde_json::to_value(&effect).unwrap();
        assert_eq!(json["type"], "DealDamage");
        let back: Effect = serde_json::from_value(json).unwrap();
        assert_eq!(back, effect);
    }
}
