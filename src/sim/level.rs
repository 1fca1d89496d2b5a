/// The level: map rows, spawn points and coin placement.
///
/// ## Tile legend:
///   '.' = Empty    '#' = Solid
///
/// Spawn points are canvas pixels (entity centers), not cells.
/// The map is 32×19 tiles; only the left 25 columns fit on the 800px canvas.

use crate::domain::tile::{MapError, TileMap};

const REFERENCE_MAP: [&str; 19] = [
    "................................",
    "................................",
    "................................",
    "................................",
    "................................",
    "................................",
    "................................",
    "................................",
    "................................",
    "................................",
    "................................",
    "................................",
    "................................",
    "................................",
    "...####...........####..........",
    "................................",
    "................................",
    "################################",
    "################################",
];

/// Static description of a level, independent of any session.
#[derive(Clone, Debug)]
pub struct LevelDef {
    pub name: &'static str,
    pub rows: Vec<&'static str>,
    pub hero_spawn: (f32, f32),
    pub enemy_spawns: Vec<(f32, f32)>,
    pub coin_spawns: Vec<(f32, f32)>,
}

impl LevelDef {
    pub fn reference() -> Self {
        LevelDef {
            name: "Capture the Coins",
            rows: REFERENCE_MAP.to_vec(),
            hero_spawn: (100.0, 100.0),
            enemy_spawns: vec![(300.0, 530.0), (500.0, 530.0), (650.0, 530.0)],
            coin_spawns: vec![
                (250.0, 530.0),
                (450.0, 420.0),
                (650.0, 440.0),
                (100.0, 530.0),
                (150.0, 400.0),
                (400.0, 420.0),
                (600.0, 530.0),
                (550.0, 500.0),
            ],
        }
    }

    pub fn build_map(&self) -> Result<TileMap, MapError> {
        TileMap::parse(&self.rows)
    }
}
