/// Tile types and the static tile grid.
/// Properties are queried via methods, not stored as flags,
/// so tile semantics are centralized here.
///
/// The map is fixed once parsed: nothing mutates tiles during a session.
/// Out-of-grid cells are Empty (no implicit floor, ceiling or side walls).

use thiserror::Error;

use super::physics::TILE_SIZE;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Tile {
    #[default]
    Empty,
    Solid,
}

impl Tile {
    /// Map symbol → tile. `.` is open air, `#` is ground/wall.
    pub fn from_symbol(ch: char) -> Option<Tile> {
        match ch {
            '.' => Some(Tile::Empty),
            '#' => Some(Tile::Solid),
            _ => None,
        }
    }

    /// Blocks movement and supports entities standing on it.
    pub fn is_solid(self) -> bool {
        matches!(self, Tile::Solid)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MapError {
    #[error("map has no rows")]
    Empty,
    #[error("row {row} has {found} columns, expected {expected}")]
    RaggedRow { row: usize, expected: usize, found: usize },
    #[error("unknown map symbol {symbol:?} at row {row}, column {col}")]
    UnknownSymbol { row: usize, col: usize, symbol: char },
}

/// Rectangular grid of tiles, `tiles[row][col]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileMap {
    tiles: Vec<Vec<Tile>>,
    cols: usize,
}

impl TileMap {
    /// Parse map rows. Every row must have the same length as the first one.
    pub fn parse<S: AsRef<str>>(rows: &[S]) -> Result<TileMap, MapError> {
        let first = rows.first().ok_or(MapError::Empty)?;
        let cols = first.as_ref().chars().count();
        if cols == 0 {
            return Err(MapError::Empty);
        }

        let mut tiles = Vec::with_capacity(rows.len());
        for (r, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            let found = line.chars().count();
            if found != cols {
                return Err(MapError::RaggedRow { row: r, expected: cols, found });
            }
            let row = line
                .chars()
                .enumerate()
                .map(|(c, ch)| {
                    Tile::from_symbol(ch).ok_or(MapError::UnknownSymbol { row: r, col: c, symbol: ch })
                })
                .collect::<Result<Vec<_>, _>>()?;
            tiles.push(row);
        }

        Ok(TileMap { tiles, cols })
    }

    pub fn rows(&self) -> usize {
        self.tiles.len()
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Map extent in canvas pixels; may exceed the visible canvas.
    pub fn pixel_width(&self) -> f32 {
        self.cols as f32 * TILE_SIZE
    }

    pub fn pixel_height(&self) -> f32 {
        self.rows() as f32 * TILE_SIZE
    }

    /// Tile at (col, row). Anything outside the grid is Empty.
    #[inline]
    pub fn tile_at(&self, col: i32, row: i32) -> Tile {
        if col < 0 || row < 0 {
            return Tile::Empty;
        }
        self.tiles
            .get(row as usize)
            .and_then(|r| r.get(col as usize))
            .copied()
            .unwrap_or(Tile::Empty)
    }

    #[inline]
    pub fn is_solid_at(&self, col: i32, row: i32) -> bool {
        self.tile_at(col, row).is_solid()
    }

    /// Iterate `(col, row)` of every solid cell, row-major.
    pub fn solid_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.tiles.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, t)| t.is_solid())
                .map(move |(c, _)| (c, r))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_symbols() {
        let map = TileMap::parse(&["..#", "###"]).unwrap();
        assert_eq!(map.rows(), 2);
        assert_eq!(map.cols(), 3);
        assert_eq!(map.tile_at(0, 0), Tile::Empty);
        assert_eq!(map.tile_at(2, 0), Tile::Solid);
        assert!(map.is_solid_at(1, 1));
        assert_eq!((map.pixel_width(), map.pixel_height()), (96.0, 64.0));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = TileMap::parse(&["...", "..", "..."]).unwrap_err();
        assert_eq!(err, MapError::RaggedRow { row: 1, expected: 3, found: 2 });
    }

    #[test]
    fn unknown_symbol_is_rejected() {
        let err = TileMap::parse(&["..", ".x"]).unwrap_err();
        assert_eq!(err, MapError::UnknownSymbol { row: 1, col: 1, symbol: 'x' });
    }

    #[test]
    fn empty_map_is_rejected() {
        let rows: [&str; 0] = [];
        assert_eq!(TileMap::parse(&rows).unwrap_err(), MapError::Empty);
        assert_eq!(TileMap::parse(&[""]).unwrap_err(), MapError::Empty);
    }

    #[test]
    fn out_of_grid_is_empty() {
        let map = TileMap::parse(&["##", "##"]).unwrap();
        assert_eq!(map.tile_at(-1, 0), Tile::Empty);
        assert_eq!(map.tile_at(0, -1), Tile::Empty);
        assert_eq!(map.tile_at(2, 0), Tile::Empty);
        assert_eq!(map.tile_at(0, 2), Tile::Empty);
    }

    #[test]
    fn solid_cells_row_major() {
        let map = TileMap::parse(&["#.", ".#"]).unwrap();
        let cells: Vec<_> = map.solid_cells().collect();
        assert_eq!(cells, vec![(0, 0), (1, 1)]);
    }
}
