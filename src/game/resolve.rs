//! Effect resolution
//!
//! Applies a resolved ability's effect list to the game state, asking
//! controllers for every choice. Nothing here fails on a missing or illegal
//! target: the effect is skipped, an `EffectSkipped` event is recorded, and
//! resolution moves on to the next effect.

use crate::core::{
    Amount, CardFilter, CardId, CostDiscount, Duration, Effect, Expiry, ModifierKind, OwnerFilter,
    PlayerId, RestrictedAction, TargetSelector,
};
use crate::game::controller::{ControllerSet, GameStateView};
use crate::game::{statics, GameEvent, GameState};
use crate::zones::Zone;
use crate::Result;

/// Where an effect list came from and what it has targeted so far
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionContext {
    pub source: CardId,
    pub controller: PlayerId,
    /// Card the triggering event was about
    pub triggered_by: Option<CardId>,
    /// Cards picked by the most recent targeting effect ("them", "that character")
    pub referenced: Vec<CardId>,
    /// Ability text shown with "you may" prompts
    pub text: String,
    /// Set while a banish replacement of this card is resolving
    replacing: Option<CardId>,
}

impl ResolutionContext {
    pub fn new(source: CardId, controller: PlayerId, text: impl Into<String>) -> Self {
        ResolutionContext {
            source,
            controller,
            triggered_by: None,
            referenced: Vec::new(),
            text: text.into(),
            replacing: None,
        }
    }

    pub fn triggered_by(mut self, card: Option<CardId>) -> Self {
        self.triggered_by = card;
        self
    }
}

/// Resolve an effect list in order, checking for banishment after each effect
///
/// Consecutive optional effects share one answer, so "you may exert them to
/// draw a card" asks once.
pub fn resolve_effects(
    state: &mut GameState,
    controllers: &mut ControllerSet<'_>,
    ctx: &mut ResolutionContext,
    effects: &[Effect],
) -> Result<()> {
    let mut answer: Option<bool> = None;
    for effect in effects {
        if effect.is_optional() {
            let accepted = match answer {
                Some(a) => a,
                None => {
                    let view = GameStateView::new(state, ctx.controller);
                    let a = controllers
                        .get(ctx.controller)?
                        .choose_optional(&view, ctx.source, &ctx.text);
                    answer = Some(a);
                    a
                }
            };
            if !accepted {
                state.record(GameEvent::EffectDeclined {
                    card: ctx.source,
                    effect: effect.tag().to_string(),
                });
                continue;
            }
        } else {
            answer = None;
        }

        resolve_effect(state, controllers, ctx, effect)?;
        if ctx.replacing.is_none() {
            check_banishment(state, controllers)?;
        }
    }
    Ok(())
}

fn skip(state: &mut GameState, ctx: &ResolutionContext, effect: &Effect, reason: &str) {
    log_if_verbose!(state.logger, "  {} from card {} skipped: {reason}", effect.tag(), ctx.source);
    state.record(GameEvent::EffectSkipped {
        card: ctx.source,
        effect: effect.tag().to_string(),
        reason: reason.to_string(),
    });
}

fn expiry_for(duration: Duration, controller: PlayerId) -> Expiry {
    match duration {
        Duration::ThisTurn => Expiry::EndOfTurn,
        Duration::UntilStartOfYourNextTurn => Expiry::StartOfTurn(controller),
        Duration::Permanent => Expiry::LeavesPlay,
    }
}

/// "up to N" takes the full N; "all" is unbounded
fn amount_value(state: &GameState, ctx: &ResolutionContext, amount: &Amount) -> u32 {
    match amount {
        Amount::Fixed(n) | Amount::UpTo(n) => *n,
        Amount::Dynamic(dynamic) => statics::evaluate_dynamic(state, ctx.source, ctx.controller, dynamic),
        Amount::All => u32::MAX,
    }
}

fn resolve_effect(
    state: &mut GameState,
    controllers: &mut ControllerSet<'_>,
    ctx: &mut ResolutionContext,
    effect: &Effect,
) -> Result<()> {
    match effect {
        Effect::DrawCard { amount, target, .. } => {
            let n = amount_value(state, ctx, amount);
            let players = players_for(state, controllers, ctx, target)?;
            if players.is_empty() {
                skip(state, ctx, effect, "no player to draw");
            }
            for player in players {
                for _ in 0..n {
                    state.draw_card(player)?;
                }
            }
        }
        Effect::GainLore { amount, target, .. } => {
            let n = amount_value(state, ctx, amount);
            for player in players_for(state, controllers, ctx, target)? {
                state.gain_lore(player, n)?;
            }
        }
        Effect::LoseLore { amount, target, .. } => {
            let n = amount_value(state, ctx, amount);
            for player in players_for(state, controllers, ctx, target)? {
                state.lose_lore(player, n)?;
            }
        }
        Effect::DealDamage { amount, target, .. } => {
            let n = amount_value(state, ctx, amount);
            let cards = in_play_targets(state, controllers, ctx, effect, target)?;
            for card in cards {
                state.deal_damage(card, n, Some(ctx.source))?;
            }
        }
        Effect::RemoveDamage { amount, target, .. } => {
            let n = amount_value(state, ctx, amount);
            for card in in_play_targets(state, controllers, ctx, effect, target)? {
                state.remove_damage(card, n)?;
            }
        }
        Effect::ModifyStat {
            stat,
            delta,
            per,
            target,
            duration,
            ..
        } => {
            let scale = match per {
                Some(dynamic) => statics::evaluate_dynamic(state, ctx.source, ctx.controller, dynamic) as i32,
                None => 1,
            };
            let kind = ModifierKind::Stat {
                stat: *stat,
                delta: delta * scale,
            };
            let expiry = expiry_for(*duration, ctx.controller);
            for card in in_play_targets(state, controllers, ctx, effect, target)? {
                state.card_mut(card)?.add_modifier(kind.clone(), expiry, Some(ctx.source));
            }
        }
        Effect::GrantKeyword {
            keywords,
            target,
            duration,
            ..
        } => {
            let expiry = expiry_for(*duration, ctx.controller);
            for card in in_play_targets(state, controllers, ctx, effect, target)? {
                let card = state.card_mut(card)?;
                for grant in keywords.iter() {
                    card.add_modifier(ModifierKind::Keyword(*grant), expiry, Some(ctx.source));
                }
            }
        }
        Effect::Restriction {
            action,
            target,
            duration,
            ..
        } => {
            let expiry = expiry_for(*duration, ctx.controller);
            for card in in_play_targets(state, controllers, ctx, effect, target)? {
                state
                    .card_mut(card)?
                    .add_modifier(ModifierKind::Restriction(*action), expiry, Some(ctx.source));
            }
        }
        Effect::Exert { target, .. } => {
            for card in in_play_targets(state, controllers, ctx, effect, target)? {
                state.exert_card(card)?;
            }
        }
        Effect::Ready { target, .. } => {
            for card in in_play_targets(state, controllers, ctx, effect, target)? {
                if statics::is_restricted(state, card, RestrictedAction::Ready) {
                    skip(state, ctx, effect, "card can't ready");
                    continue;
                }
                state.ready_card(card)?;
            }
        }
        Effect::CostReduction {
            amount,
            filter,
            duration,
            ..
        } => {
            let discount = CostDiscount {
                amount: *amount,
                filter: filter.clone(),
                expiry: expiry_for(*duration, ctx.controller),
            };
            state.add_discount(ctx.controller, discount)?;
        }
        Effect::MoveZone { from, to, target, .. } => move_zone(state, controllers, ctx, effect, *from, *to, target)?,
        Effect::Conditional { condition, effects } => {
            if statics::condition_holds(state, ctx.source, ctx.controller, condition) {
                resolve_effects(state, controllers, ctx, effects)?;
            } else {
                skip(state, ctx, effect, "condition not met");
            }
        }
        Effect::Unparsed { text } => {
            let reason = format!("unparsed text '{text}'");
            skip(state, ctx, effect, &reason);
        }
        // Passive effects only matter through statics
        Effect::Replacement { .. }
        | Effect::Keyword { .. }
        | Effect::DamageReduction { .. }
        | Effect::AlternateCost { .. }
        | Effect::CostSubstitution { .. } => {}
    }
    Ok(())
}

fn players_for(
    state: &GameState,
    controllers: &mut ControllerSet<'_>,
    ctx: &ResolutionContext,
    target: &TargetSelector,
) -> Result<Vec<PlayerId>> {
    let choose = |controllers: &mut ControllerSet<'_>, candidates: Vec<PlayerId>| -> Result<Vec<PlayerId>> {
        let view = GameStateView::new(state, ctx.controller);
        let pick = controllers.get(ctx.controller)?.choose_player(&view, &candidates);
        Ok(pick.filter(|p| candidates.contains(p)).into_iter().collect())
    };
    match target {
        TargetSelector::You => Ok(vec![ctx.controller]),
        TargetSelector::Opponents => Ok(state.opponents(ctx.controller)),
        TargetSelector::AllPlayers => Ok(state.player_ids()),
        TargetSelector::ChosenPlayer => choose(controllers, state.player_ids()),
        TargetSelector::ChosenOpponent => choose(controllers, state.opponents(ctx.controller)),
        // A card selector affects that card's owner
        _ => {
            let mut owners = Vec::new();
            let cards = match target {
                TargetSelector::This => vec![ctx.source],
                TargetSelector::Referenced => referenced(ctx),
                _ => Vec::new(),
            };
            for card in cards {
                if let Ok(c) = state.card(card) {
                    if !owners.contains(&c.owner) {
                        owners.push(c.owner);
                    }
                }
            }
            Ok(owners)
        }
    }
}

fn referenced(ctx: &ResolutionContext) -> Vec<CardId> {
    if ctx.referenced.is_empty() {
        ctx.triggered_by.into_iter().collect()
    } else {
        ctx.referenced.clone()
    }
}

/// Cards in `zone` of every player that match `filter` from the controller's side
fn candidates(state: &GameState, ctx: &ResolutionContext, filter: &CardFilter, zone: Zone) -> Vec<CardId> {
    let mut out = Vec::new();
    for player in state.player_ids() {
        for &card in state.zone_cards(player, zone) {
            if statics::filter_matches(state, filter, card, Some(ctx.source), ctx.controller) {
                out.push(card);
            }
        }
    }
    out
}

/// Let `chooser` pick from `pool`; picks outside the pool are dropped and a
/// short pick is topped up from the front unless `up_to` allows it
fn pick(
    state: &GameState,
    controllers: &mut ControllerSet<'_>,
    chooser: PlayerId,
    pool: &[CardId],
    count: u32,
    up_to: bool,
) -> Result<Vec<CardId>> {
    let view = GameStateView::new(state, chooser);
    let answer = controllers.get(chooser)?.choose_targets(&view, pool, count, up_to);
    let mut picked: Vec<CardId> = Vec::new();
    for card in answer {
        if pool.contains(&card) && !picked.contains(&card) && picked.len() < count as usize {
            picked.push(card);
        }
    }
    if !up_to {
        let needed = (count as usize).min(pool.len());
        for &card in pool {
            if picked.len() >= needed {
                break;
            }
            if !picked.contains(&card) {
                picked.push(card);
            }
        }
    }
    Ok(picked)
}

/// Resolve a card selector against `zone`, updating the referenced cards
fn card_targets(
    state: &GameState,
    controllers: &mut ControllerSet<'_>,
    ctx: &mut ResolutionContext,
    target: &TargetSelector,
    zone: Zone,
) -> Result<Vec<CardId>> {
    let cards = match target {
        TargetSelector::This => vec![ctx.source],
        TargetSelector::Referenced => return Ok(referenced(ctx)),
        TargetSelector::TopOfDeck { count } => state
            .zone_cards(ctx.controller, Zone::Deck)
            .iter()
            .rev()
            .take(*count as usize)
            .copied()
            .collect(),
        TargetSelector::Each { filter } => candidates(state, ctx, filter, zone),
        TargetSelector::Chosen { filter, count, up_to } => {
            let mut pool = candidates(state, ctx, filter, zone);
            if zone == Zone::Play {
                // Ward: opponents can't choose this card
                pool.retain(|&card| {
                    state.card(card).is_ok_and(|c| c.owner == ctx.controller)
                        || !statics::has_keyword(state, card, crate::core::Keyword::Ward)
                });
            }
            pick(state, controllers, ctx.controller, &pool, *count, *up_to)?
        }
        _ => Vec::new(),
    };
    ctx.referenced = cards.clone();
    Ok(cards)
}

/// Card targets for effects that only act on cards in play
fn in_play_targets(
    state: &mut GameState,
    controllers: &mut ControllerSet<'_>,
    ctx: &mut ResolutionContext,
    effect: &Effect,
    target: &TargetSelector,
) -> Result<Vec<CardId>> {
    let cards = card_targets(state, controllers, ctx, target, Zone::Play)?;
    let (live, gone): (Vec<CardId>, Vec<CardId>) = cards
        .into_iter()
        .partition(|&card| state.zone_of(card) == Some(Zone::Play));
    if live.is_empty() {
        skip(state, ctx, effect, "no legal target");
    } else if !gone.is_empty() {
        skip(state, ctx, effect, "target left play");
    }
    Ok(live)
}

/// Each player named by a hand-discard filter picks from their own hand
fn discard_from_hands(
    state: &mut GameState,
    controllers: &mut ControllerSet<'_>,
    ctx: &mut ResolutionContext,
    filter: &CardFilter,
    count: u32,
) -> Result<Vec<CardId>> {
    let players: Vec<PlayerId> = match filter.owner {
        OwnerFilter::You => vec![ctx.controller],
        OwnerFilter::Opponent => state.opponents(ctx.controller),
        OwnerFilter::Any => state.player_ids(),
    };
    let mut chosen = Vec::new();
    for player in players {
        let hand = state.zone_cards(player, Zone::Hand).to_vec();
        chosen.extend(pick(state, controllers, player, &hand, count, false)?);
    }
    ctx.referenced = chosen.clone();
    Ok(chosen)
}

fn move_zone(
    state: &mut GameState,
    controllers: &mut ControllerSet<'_>,
    ctx: &mut ResolutionContext,
    effect: &Effect,
    from: Option<Zone>,
    to: Zone,
    target: &TargetSelector,
) -> Result<()> {
    let search = from.unwrap_or(Zone::Play);
    let cards = match (search, target) {
        (Zone::Hand, TargetSelector::Chosen { filter, count, .. }) => {
            discard_from_hands(state, controllers, ctx, filter, *count)?
        }
        _ => card_targets(state, controllers, ctx, target, search)?,
    };
    if cards.is_empty() {
        skip(state, ctx, effect, "no legal target");
        return Ok(());
    }

    let mut reshuffle = Vec::new();
    for card in cards {
        let Some(current) = state.zone_of(card) else {
            skip(state, ctx, effect, "card not found");
            continue;
        };
        if from.is_some_and(|f| f != current) || current == to {
            skip(state, ctx, effect, "card left its zone");
            continue;
        }
        if current == Zone::Play && to == Zone::Discard {
            let replace = ctx.replacing != Some(card);
            banish_with(state, controllers, card, Some(ctx.source), replace)?;
            continue;
        }
        state.move_card(card, current, to)?;
        if to == Zone::Deck {
            let owner = state.card(card)?.owner;
            if !reshuffle.contains(&owner) {
                reshuffle.push(owner);
            }
        }
    }
    for owner in reshuffle {
        state.shuffle_deck(owner);
    }
    Ok(())
}

/// Banish every card in play whose damage has reached its willpower
///
/// The banisher is whatever dealt the card its most recent damage.
pub fn check_banishment(state: &mut GameState, controllers: &mut ControllerSet<'_>) -> Result<()> {
    loop {
        let lethal = state.lethally_damaged();
        if lethal.is_empty() {
            return Ok(());
        }
        for card in lethal {
            if state.zone_of(card) != Some(Zone::Play) {
                continue;
            }
            let banisher = state.events.events().iter().rev().find_map(|e| match e {
                GameEvent::DamageDealt { card: c, source, .. } if *c == card => Some(*source),
                _ => None,
            });
            banish_card(state, controllers, card, banisher.flatten())?;
        }
    }
}

/// Banish a card in play, applying its "would be banished" replacement first
pub fn banish_card(
    state: &mut GameState,
    controllers: &mut ControllerSet<'_>,
    card: CardId,
    banisher: Option<CardId>,
) -> Result<()> {
    banish_with(state, controllers, card, banisher, true)
}

fn banish_with(
    state: &mut GameState,
    controllers: &mut ControllerSet<'_>,
    card: CardId,
    banisher: Option<CardId>,
    replace: bool,
) -> Result<()> {
    if replace {
        if let Some(substitute) = statics::banish_replacement(state, card) {
            let owner = state.card(card)?.owner;
            let mut ctx = ResolutionContext::new(card, owner, "replacement").triggered_by(Some(card));
            ctx.replacing = Some(card);
            log_if_verbose!(state.logger, "  Card {card} would be banished; applying replacement");
            resolve_effects(state, controllers, &mut ctx, &substitute)?;
        }
    }
    if state.zone_of(card) == Some(Zone::Play) {
        state.banish(card, banisher)?;
    }
    Ok(())
}
