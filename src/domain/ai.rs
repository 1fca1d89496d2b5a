/// Enemy AI: reflex patrol using the same collision queries as the hero.
///
/// Each tick the enemy looks one step ahead in its current direction:
///   - wall at the candidate position          → turn around, stay put
///   - no ground under the candidate position  → turn around, stay put
///   - otherwise                               → advance
///
/// No timers, no memory: the decision depends only on what is sensed now.

use super::physics;
use super::tile::TileMap;

/// Decision for one patrol tick.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Patrol {
    /// Commit to this new x.
    Advance(f32),
    /// Flip direction for next tick; position unchanged.
    Reverse,
}

pub fn patrol_step(map: &TileMap, x: f32, y: f32, w: f32, h: f32, speed: f32, direction: i32) -> Patrol {
    let candidate = x + speed * direction as f32;
    let blocked = physics::has_wall(map, candidate, y, w, h, direction);
    // Probe one pixel lower so a box resting exactly on a row top still senses it.
    let ledge = !physics::has_ground_below(map, candidate, y + 1.0, w, h);
    if blocked || ledge {
        Patrol::Reverse
    } else {
        Patrol::Advance(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tile::TileMap;

    fn map(rows: &[&str]) -> TileMap {
        TileMap::parse(rows).unwrap()
    }

    // Enemy box 26×26 resting on row 2 (top at y = 64): center y = 51.

    #[test]
    fn advances_on_open_floor() {
        let m = map(&["......", "......", "######"]);
        assert_eq!(patrol_step(&m, 96.0, 51.0, 26.0, 26.0, 2.0, -1), Patrol::Advance(94.0));
        assert_eq!(patrol_step(&m, 96.0, 51.0, 26.0, 26.0, 2.0, 1), Patrol::Advance(98.0));
    }

    #[test]
    fn reverses_at_wall() {
        let m = map(&["......", "#.....", "######"]);
        // left edge at candidate: 45 - 2 - 13 = 30 → column 0 (wall)
        assert_eq!(patrol_step(&m, 45.0, 51.0, 26.0, 26.0, 2.0, -1), Patrol::Reverse);
    }

    #[test]
    fn reverses_at_ledge() {
        let m = map(&["......", "......", "###..."]);
        // moving right: both bottom samples over column 3 → no floor ahead
        assert_eq!(patrol_step(&m, 115.0, 51.0, 26.0, 26.0, 2.0, 1), Patrol::Reverse);
        // still one corner over column 2 → keeps going
        assert_eq!(patrol_step(&m, 100.0, 51.0, 26.0, 26.0, 2.0, 1), Patrol::Advance(102.0));
    }

    #[test]
    fn reverses_at_map_edge() {
        let m = map(&["...", "...", "###"]);
        // going left past x = 0 until no bottom sample is inside the grid
        assert_eq!(patrol_step(&m, -12.0, 51.0, 26.0, 26.0, 2.0, -1), Patrol::Reverse);
    }
}
