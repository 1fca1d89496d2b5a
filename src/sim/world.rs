/// Session: the complete state of one running game.
///
/// ## Phases
///
///   Menu ──start──▶ Playing ──all coins──▶ Victory ──replay──▶ Playing
///                      │
///                      └──enemy contact──▶ Defeat ──replay──▶ Playing
///
/// Menu is only the initial phase; replay never goes back to it.
///
/// ## Ownership
///
/// The frame loop owns exactly one `Session` and passes it to update, draw
/// and input handlers. Nothing here is global, so tests can run any number
/// of independent sessions.

use tracing::info;

use crate::domain::entity::{Coin, Drawable, Enemy, Hero};
use crate::domain::tile::{MapError, TileMap};
use super::event::GameEvent;
use super::level::LevelDef;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Menu,
    Playing,
    Victory,
    Defeat,
}

impl Phase {
    /// End screens: the replay button is live.
    pub fn is_over(self) -> bool {
        matches!(self, Phase::Victory | Phase::Defeat)
    }
}

pub struct Session {
    // ── Static ──
    pub map: TileMap,
    pub level: LevelDef,

    // ── Entities (rebuilt on restart) ──
    pub hero: Hero,
    pub enemies: Vec<Enemy>,
    pub coins: Vec<Coin>,

    // ── Meta ──
    pub phase: Phase,
    pub music_on: bool,
    pub tick: u64,
}

// ── Construction ──

impl Session {
    /// Build a session in the Menu phase. Fails on a malformed map.
    pub fn new(level: LevelDef, music_on: bool) -> Result<Self, MapError> {
        let map = level.build_map()?;
        let mut session = Session {
            map,
            hero: Hero::new(level.hero_spawn.0, level.hero_spawn.1),
            enemies: vec![],
            coins: vec![],
            level,
            phase: Phase::Menu,
            music_on,
            tick: 0,
        };
        session.spawn_entities();
        Ok(session)
    }

    /// Replace every entity with a fresh one and start playing.
    pub fn restart(&mut self) -> GameEvent {
        self.spawn_entities();
        self.tick = 0;
        self.phase = Phase::Playing;
        info!(
            enemies = self.enemies.len(),
            coins = self.coins.len(),
            "session started"
        );
        GameEvent::SessionStarted
    }

    pub fn toggle_music(&mut self) -> GameEvent {
        self.music_on = !self.music_on;
        info!(on = self.music_on, "music toggled");
        GameEvent::MusicToggled { on: self.music_on }
    }

    fn spawn_entities(&mut self) {
        let (hx, hy) = self.level.hero_spawn;
        self.hero.respawn(hx, hy);
        self.enemies = self.level.enemy_spawns.iter().map(|&(x, y)| Enemy::new(x, y)).collect();
        self.coins = self.level.coin_spawns.iter().map(|&(x, y)| Coin::new(x, y)).collect();
    }
}

// ── Queries ──

impl Session {
    pub fn coins_collected(&self) -> usize {
        self.coins.iter().filter(|c| c.is_collected()).count()
    }

    pub fn all_coins_collected(&self) -> bool {
        self.coins.iter().all(Coin::is_collected)
    }

    /// Visible actors in draw order: hero, enemies, coins.
    pub fn drawables(&self) -> Vec<&dyn Drawable> {
        let mut out: Vec<&dyn Drawable> = Vec::with_capacity(1 + self.enemies.len() + self.coins.len());
        out.push(&self.hero);
        out.extend(self.enemies.iter().map(|e| e as &dyn Drawable));
        out.extend(self.coins.iter().map(|c| c as &dyn Drawable));
        out.retain(|d| d.visible());
        out
    }
}
