/// Entities: Hero, Enemy, Coin.
///
/// There is no common actor base. Each entity composes the capabilities it
/// needs:
///
/// | Entity | Drawable | Collidable | Updatable |
/// |--------|----------|------------|-----------|
/// | Hero   | yes      | yes        | yes       |
/// | Enemy  | yes      | yes        | yes       |
/// | Coin   | yes      | yes        | no        |
///
/// Only the Hero animates, through an explicit `FrameCycle`.

use super::ai::{self, Patrol};
use super::physics::BoundingBox;
use super::rules;
use super::tile::TileMap;

// ── Capabilities ──

/// Where the sprite is pinned relative to `position()`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Anchor {
    Center,
}

/// Something the presentation layer can draw.
pub trait Drawable {
    /// Sprite key for the current frame.
    fn sprite(&self) -> &'static str;
    fn position(&self) -> (f32, f32);
    fn anchor(&self) -> Anchor {
        Anchor::Center
    }
    fn visible(&self) -> bool {
        true
    }
}

/// Something with an axis-aligned hitbox.
pub trait Collidable {
    fn hitbox(&self) -> BoundingBox;
}

/// Per-frame mutation against the static map.
pub trait Updatable {
    fn update(&mut self, map: &TileMap, input: &FrameInput);
}

/// Input sampled once at the start of a tick. Held-state, not edges.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

// ── Animation ──

/// Infinite cyclic sequence over a fixed frame list.
///
/// Each advance adds `speed` to a fractional index; the visible frame is
/// `floor(index) % len`. The index wraps at `len` so it stays small.
/// `restart()` goes back to the first frame.
#[derive(Clone, Debug)]
pub struct FrameCycle {
    frames: &'static [&'static str],
    index: f32,
    speed: f32,
}

impl FrameCycle {
    pub const DEFAULT_SPEED: f32 = 0.2;

    pub fn new(frames: &'static [&'static str], speed: f32) -> Self {
        assert!(!frames.is_empty(), "FrameCycle needs at least one frame");
        FrameCycle { frames, index: 0.0, speed }
    }

    pub fn current(&self) -> &'static str {
        self.frames[self.index as usize % self.frames.len()]
    }

    pub fn advance(&mut self) -> &'static str {
        self.index = (self.index + self.speed) % self.frames.len() as f32;
        self.current()
    }

    pub fn restart(&mut self) {
        self.index = 0.0;
    }
}

impl Iterator for FrameCycle {
    type Item = &'static str;

    fn next(&mut self) -> Option<&'static str> {
        Some(self.advance())
    }
}

// ── Hero ──

pub const HERO_FRAMES: &[&str] = &["hero_idle_0", "hero_idle_1"];

#[derive(Clone, Debug)]
pub struct Hero {
    pub x: f32,
    pub y: f32,
    pub vy: f32,
    pub on_ground: bool,
    pub alive: bool,
    pub anim: FrameCycle,
}

impl Hero {
    pub const SPEED: f32 = 4.0;
    pub const GRAVITY: f32 = 0.6;
    pub const JUMP_POWER: f32 = -12.0;
    pub const WIDTH: f32 = 26.0;
    pub const HEIGHT: f32 = 42.0;

    pub fn new(x: f32, y: f32) -> Self {
        Hero {
            x,
            y,
            vy: 0.0,
            on_ground: false,
            alive: true,
            anim: FrameCycle::new(HERO_FRAMES, FrameCycle::DEFAULT_SPEED),
        }
    }

    /// Back to the spawn point: alive, at rest, first animation frame.
    pub fn respawn(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
        self.vy = 0.0;
        self.on_ground = false;
        self.alive = true;
        self.anim.restart();
    }

    /// One-way: nothing revives a hero except a session restart.
    pub fn kill(&mut self) {
        self.alive = false;
    }
}

impl Drawable for Hero {
    fn sprite(&self) -> &'static str {
        self.anim.current()
    }
    fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }
    fn visible(&self) -> bool {
        self.alive
    }
}

impl Collidable for Hero {
    fn hitbox(&self) -> BoundingBox {
        BoundingBox::from_center(self.x, self.y, Hero::WIDTH, Hero::HEIGHT)
    }
}

impl Updatable for Hero {
    fn update(&mut self, map: &TileMap, input: &FrameInput) {
        if !self.alive {
            return;
        }

        let (w, h) = (Hero::WIDTH, Hero::HEIGHT);
        let mut walking = false;

        if input.left {
            if rules::can_step(map, self.x, self.y, w, h, -Hero::SPEED) {
                self.x -= Hero::SPEED;
                walking = true;
            }
        }
        if input.right {
            if rules::can_step(map, self.x, self.y, w, h, Hero::SPEED) {
                self.x += Hero::SPEED;
                walking = true;
            }
        }

        if rules::can_jump(self.on_ground, input.jump) {
            self.vy = Hero::JUMP_POWER;
            self.on_ground = false;
        }

        self.vy += Hero::GRAVITY;
        let v = rules::resolve_vertical(map, self.x, self.y, self.vy, w, h);
        self.y = v.y;
        self.vy = v.vy;
        self.on_ground = v.on_ground;

        if walking {
            self.anim.advance();
        }
    }
}

// ── Enemy ──

#[derive(Clone, Debug)]
pub struct Enemy {
    pub x: f32,
    pub y: f32,
    pub direction: i32,
}

impl Enemy {
    pub const SPEED: f32 = 2.0;
    pub const WIDTH: f32 = 26.0;
    pub const HEIGHT: f32 = 26.0;
    pub const SPRITE: &'static str = "enemy_0";

    pub fn new(x: f32, y: f32) -> Self {
        Enemy { x, y, direction: -1 }
    }
}

impl Drawable for Enemy {
    fn sprite(&self) -> &'static str {
        Enemy::SPRITE
    }
    fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }
}

impl Collidable for Enemy {
    fn hitbox(&self) -> BoundingBox {
        BoundingBox::from_center(self.x, self.y, Enemy::WIDTH, Enemy::HEIGHT)
    }
}

impl Updatable for Enemy {
    fn update(&mut self, map: &TileMap, _input: &FrameInput) {
        match ai::patrol_step(map, self.x, self.y, Enemy::WIDTH, Enemy::HEIGHT, Enemy::SPEED, self.direction) {
            Patrol::Advance(x) => self.x = x,
            Patrol::Reverse => self.direction = -self.direction,
        }
    }
}

// ── Coin ──

#[derive(Clone, Debug)]
pub struct Coin {
    pub x: f32,
    pub y: f32,
    collected: bool,
}

impl Coin {
    pub const WIDTH: f32 = 20.0;
    pub const HEIGHT: f32 = 20.0;
    pub const SPRITE: &'static str = "coin_0";

    pub fn new(x: f32, y: f32) -> Self {
        Coin { x, y, collected: false }
    }

    pub fn is_collected(&self) -> bool {
        self.collected
    }

    /// Flip to collected. Returns true only on the first call.
    pub fn collect(&mut self) -> bool {
        let first = !self.collected;
        self.collected = true;
        first
    }
}

impl Drawable for Coin {
    fn sprite(&self) -> &'static str {
        Coin::SPRITE
    }
    fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }
    fn visible(&self) -> bool {
        !self.collected
    }
}

impl Collidable for Coin {
    fn hitbox(&self) -> BoundingBox {
        BoundingBox::from_center(self.x, self.y, Coin::WIDTH, Coin::HEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tile::TileMap;

    fn floor_map() -> TileMap {
        // 8 cols × 4 rows, solid bottom row (top at y = 96)
        TileMap::parse(&["........", "........", "........", "########"]).unwrap()
    }

    #[test]
    fn frame_cycle_wraps_and_restarts() {
        let mut cycle = FrameCycle::new(HERO_FRAMES, 0.5);
        assert_eq!(cycle.current(), "hero_idle_0");
        let seen: Vec<_> = cycle.by_ref().take(4).collect();
        assert_eq!(seen, vec!["hero_idle_0", "hero_idle_1", "hero_idle_1", "hero_idle_0"]);
        cycle.restart();
        assert_eq!(cycle.current(), "hero_idle_0");
    }

    #[test]
    fn frame_cycle_default_speed_needs_five_steps() {
        let mut cycle = FrameCycle::new(HERO_FRAMES, FrameCycle::DEFAULT_SPEED);
        for _ in 0..4 {
            assert_eq!(cycle.advance(), "hero_idle_0");
        }
        assert_eq!(cycle.advance(), "hero_idle_1");
    }

    #[test]
    fn frame_cycle_index_stays_bounded() {
        let mut cycle = FrameCycle::new(HERO_FRAMES, FrameCycle::DEFAULT_SPEED);
        for _ in 0..1_000_000 {
            cycle.advance();
        }
        assert!(cycle.index < HERO_FRAMES.len() as f32);
        // still animating after a long walk
        let next: Vec<_> = cycle.take(10).collect();
        assert!(next.contains(&"hero_idle_0") && next.contains(&"hero_idle_1"));
    }

    #[test]
    fn frame_cycle_never_ends() {
        let cycle = FrameCycle::new(&["only"], 1.0);
        assert_eq!(cycle.take(1000).count(), 1000);
    }

    #[test]
    fn dead_hero_is_frozen() {
        let map = floor_map();
        let mut hero = Hero::new(100.0, 20.0);
        hero.kill();
        hero.update(&map, &FrameInput { left: true, right: false, jump: true });
        assert_eq!((hero.x, hero.y, hero.vy), (100.0, 20.0, 0.0));
        assert!(!hero.visible());
    }

    #[test]
    fn hero_walks_and_animates() {
        let map = floor_map();
        let mut hero = Hero::new(100.0, 75.0);
        for _ in 0..5 {
            hero.update(&map, &FrameInput { right: true, ..Default::default() });
        }
        assert_eq!(hero.x, 120.0);
        assert_eq!(hero.sprite(), "hero_idle_1");
        assert!(hero.on_ground);
    }

    #[test]
    fn hero_against_wall_does_not_animate() {
        // wall tile at column 2, row 2 (x 64..96)
        let map = TileMap::parse(&["........", "........", "..#.....", "########"]).unwrap();
        let mut hero = Hero::new(50.0, 75.0);
        for _ in 0..5 {
            hero.update(&map, &FrameInput { right: true, ..Default::default() });
        }
        assert_eq!(hero.x, 50.0);
        assert_eq!(hero.sprite(), "hero_idle_0");
        assert!(hero.on_ground);
    }

    #[test]
    fn respawn_resets_hero() {
        let map = floor_map();
        let mut hero = Hero::new(100.0, 75.0);
        for _ in 0..5 {
            hero.update(&map, &FrameInput { right: true, ..Default::default() });
        }
        hero.kill();
        hero.respawn(100.0, 100.0);
        assert_eq!((hero.x, hero.y, hero.vy), (100.0, 100.0, 0.0));
        assert!(hero.alive && !hero.on_ground);
        assert_eq!(hero.sprite(), "hero_idle_0");
    }

    #[test]
    fn hero_jump_only_from_ground() {
        let map = floor_map();
        let mut hero = Hero::new(100.0, 75.0);
        hero.update(&map, &FrameInput::default());
        assert!(hero.on_ground);

        let jump = FrameInput { jump: true, ..Default::default() };
        hero.update(&map, &jump);
        // jump impulse plus one tick of gravity
        assert!((hero.vy - (Hero::JUMP_POWER + Hero::GRAVITY)).abs() < 1e-4);
        assert!(!hero.on_ground);

        let vy = hero.vy;
        hero.update(&map, &jump);
        assert!((hero.vy - (vy + Hero::GRAVITY)).abs() < 1e-4, "no double jump in the air");
    }

    #[test]
    fn coin_collect_is_one_way() {
        let mut coin = Coin::new(10.0, 10.0);
        assert!(coin.visible());
        assert!(coin.collect());
        assert!(!coin.collect());
        assert!(coin.is_collected());
        assert!(!coin.visible());
    }

    #[test]
    fn enemy_starts_moving_left() {
        let map = floor_map();
        let mut enemy = Enemy::new(128.0, 82.0);
        enemy.update(&map, &FrameInput::default());
        assert_eq!(enemy.x, 126.0);
        assert_eq!(enemy.direction, -1);
    }
}
