//! Core game types and entities

pub mod ability;
pub mod card;
pub mod costs;
pub mod definition;
pub mod effects;
pub mod entity;
pub mod keyword;
pub mod player;
pub mod types;

pub use ability::{AbilityDefinition, AbilityKind, Actor, Timing, TriggerDescriptor, TriggerEvent, TriggerFilter};
pub use card::{Card, CardId, Expiry, Modifier, ModifierKind};
pub use costs::{Cost, CostList};
pub use definition::{CardDefinition, CardType, InkType, RawAbility, RawAbilityType};
pub use effects::{
    Amount, CardFilter, Condition, Duration, DynamicAmount, Effect, KeywordGrant, OwnerFilter, ReplacedEvent,
    RestrictedAction, Stat, SubstitutionMode, TargetSelector,
};
pub use entity::{EntityId, EntityStore, GameEntity};
pub use keyword::Keyword;
pub use player::{CostDiscount, Player, PlayerId};
pub use types::{AbilityId, CardName, Classification, PlayerName};
