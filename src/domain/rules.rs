/// Hero movement rules, truth-table driven.
///
/// Pure functions, no side effects. They encode "what is legal" and
/// "where the hero ends up" without touching the entity.
///
/// ### Horizontal step (per held direction)
/// ┌───────────────────────────────┬───────┐
/// │ Condition                      │ Allow │
/// ├───────────────────────────────┼───────┤
/// │ Target box leaves the canvas   │ DENY  │
/// │ Wall at target, leading edge   │ DENY  │
/// │ Otherwise                      │ ALLOW │
/// └───────────────────────────────┴───────┘
///
/// ### Jump
/// ┌───────────────────────────────┬───────┐
/// │ Jump held AND on ground        │ ALLOW │
/// │ Otherwise                      │ DENY  │
/// └───────────────────────────────┴───────┘
///
/// ### Vertical resolution (velocity already includes this tick's gravity)
/// ┌──────────────────────────────────────┬──────────────────────────────┐
/// │ Condition                             │ Result                       │
/// ├──────────────────────────────────────┼──────────────────────────────┤
/// │ vy >= 0 AND ground below candidate y  │ snap to row top, vy = 0,     │
/// │                                       │ on_ground                    │
/// │ Otherwise                             │ y = candidate, airborne      │
/// └──────────────────────────────────────┴──────────────────────────────┘
///
/// There is no floor below the map: without solid bottom rows the hero
/// keeps falling.

use super::physics::{self, CANVAS_WIDTH};
use super::tile::TileMap;

/// Can the hero move horizontally by `dx` from (x, y)?
pub fn can_step(map: &TileMap, x: f32, y: f32, w: f32, h: f32, dx: f32) -> bool {
    let target = x + dx;
    if target - w / 2.0 < 0.0 || target + w / 2.0 > CANVAS_WIDTH {
        return false;
    }
    let direction = if dx > 0.0 { 1 } else { -1 };
    !physics::has_wall(map, target, y, w, h, direction)
}

pub fn can_jump(on_ground: bool, jump_held: bool) -> bool {
    jump_held && on_ground
}

/// Outcome of one tick of vertical motion.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Vertical {
    pub y: f32,
    pub vy: f32,
    pub on_ground: bool,
}

/// Apply `vy` to `y` and land on solid ground if falling onto it.
pub fn resolve_vertical(map: &TileMap, x: f32, y: f32, vy: f32, w: f32, h: f32) -> Vertical {
    let candidate = y + vy;
    if vy >= 0.0 && physics::has_ground_below(map, x, candidate, w, h) {
        Vertical { y: physics::landing_y(candidate, h), vy: 0.0, on_ground: true }
    } else {
        Vertical { y: candidate, vy, on_ground: false }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tile::TileMap;
    use pretty_assertions::assert_eq;

    fn map(rows: &[&str]) -> TileMap {
        TileMap::parse(rows).unwrap()
    }

    #[test]
    fn step_blocked_by_canvas_edges() {
        let m = map(&["....", "...."]);
        assert!(!can_step(&m, 14.0, 30.0, 26.0, 42.0, -4.0));
        assert!(can_step(&m, 17.0, 30.0, 26.0, 42.0, -4.0));
        assert!(!can_step(&m, 786.0, 30.0, 26.0, 42.0, 4.0));
        assert!(can_step(&m, 783.0, 30.0, 26.0, 42.0, 4.0));
    }

    #[test]
    fn step_blocked_by_wall() {
        let m = map(&["..#.", "..#."]);
        // right edge at target: 45 + 4 + 13 = 62 → column 1, then 66 → column 2
        assert!(can_step(&m, 45.0, 30.0, 26.0, 42.0, 4.0));
        assert!(!can_step(&m, 49.0, 30.0, 26.0, 42.0, 4.0));
    }

    #[test]
    fn step_blocked_by_wall_on_the_left() {
        let m = map(&["#...", "#..."]);
        // left edge at target: 51 - 4 - 13 = 34 → column 1, then 31 → column 0
        assert!(can_step(&m, 51.0, 30.0, 26.0, 42.0, -4.0));
        assert!(!can_step(&m, 48.0, 30.0, 26.0, 42.0, -4.0));
    }

    #[test]
    fn jump_requires_ground() {
        assert!(can_jump(true, true));
        assert!(!can_jump(false, true));
        assert!(!can_jump(true, false));
    }

    #[test]
    fn falling_onto_ground_snaps() {
        let m = map(&["....", "....", "####"]);
        let v = resolve_vertical(&m, 48.0, 40.0, 5.0, 26.0, 42.0);
        assert_eq!(v, Vertical { y: 43.0, vy: 0.0, on_ground: true });
    }

    #[test]
    fn rising_passes_through_ground() {
        let m = map(&["....", "....", "####"]);
        let v = resolve_vertical(&m, 48.0, 50.0, -3.0, 26.0, 42.0);
        assert_eq!(v, Vertical { y: 47.0, vy: -3.0, on_ground: false });
    }

    #[test]
    fn free_fall_without_floor() {
        let m = map(&["....", "...."]);
        let v = resolve_vertical(&m, 48.0, 100.0, 6.0, 26.0, 42.0);
        assert_eq!(v, Vertical { y: 106.0, vy: 6.0, on_ground: false });
    }
}
