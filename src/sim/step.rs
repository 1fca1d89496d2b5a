/// The step function: advances the session by one frame.
///
/// Processing order (Playing only):
///   1. Hero update (input → horizontal, jump, gravity, landing)
///   2. For each enemy, in spawn order: patrol update, then hero contact
///   3. Coin pickup (uncollected coins overlapping the hero)
///   4. Win check (every coin collected)
///
/// Contact does not stop the frame: later enemies and the coins are still
/// processed. When contact and the last coin happen in the same frame,
/// Defeat stands.

use tracing::{debug, info};

use crate::domain::entity::{Collidable, FrameInput, Updatable};
use super::event::GameEvent;
use super::world::{Phase, Session};

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step(session: &mut Session, input: FrameInput) -> Vec<GameEvent> {
    if session.phase != Phase::Playing {
        return vec![];
    }

    let mut events = Vec::new();
    session.tick += 1;

    session.hero.update(&session.map, &input);
    resolve_enemies(session, &input, &mut events);
    resolve_coin_pickup(session, &mut events);
    resolve_win(session, &mut events);

    events
}

// ══════════════════════════════════════════════════════════════
// Enemies
// ══════════════════════════════════════════════════════════════

fn resolve_enemies(session: &mut Session, input: &FrameInput, events: &mut Vec<GameEvent>) {
    for i in 0..session.enemies.len() {
        session.enemies[i].update(&session.map, input);

        if !session.hero.alive {
            continue;
        }
        if session.hero.hitbox().overlaps(&session.enemies[i].hitbox()) {
            session.hero.kill();
            session.phase = Phase::Defeat;
            info!(tick = session.tick, enemy = i, "hero defeated");
            events.push(GameEvent::HeroDefeated);
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Coins
// ══════════════════════════════════════════════════════════════

fn resolve_coin_pickup(session: &mut Session, events: &mut Vec<GameEvent>) {
    let hero_box = session.hero.hitbox();
    for (index, coin) in session.coins.iter_mut().enumerate() {
        if coin.is_collected() {
            continue;
        }
        if hero_box.overlaps(&coin.hitbox()) && coin.collect() {
            debug!(index, "coin collected");
            events.push(GameEvent::CoinCollected { index });
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Win check
// ══════════════════════════════════════════════════════════════

fn resolve_win(session: &mut Session, events: &mut Vec<GameEvent>) {
    if session.phase != Phase::Playing {
        return;
    }
    if session.all_coins_collected() {
        session.phase = Phase::Victory;
        info!(tick = session.tick, "all coins collected");
        events.push(GameEvent::Victory);
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
