/// Collision layer: single source of truth for tile contact.
///
/// ## Coordinates
///
/// Everything lives in canvas pixels (800×600, tile size 32). Entities are
/// positioned by their center; a `BoundingBox` is derived from the center
/// and the entity's fixed size every time it is needed.
///
/// ## Sampling
///
/// Queries never scan a whole box. They sample a few pixels and convert them
/// to cells with floor division by the tile size:
///
///   - Ground: bottom-left and bottom-right pixel columns, at the row that
///     contains the box bottom (`y + h/2`).
///   - Wall: the leading-edge column (`x ± w/2`), at the top row and the
///     bottom row spanned by the box.
///
/// The right/bottom samples use `edge - 1` so an edge lying exactly on a
/// tile boundary does not reach into the next tile. Cells outside the grid
/// are never solid.
///
/// Both Hero and Enemy go through these same functions.

use super::tile::TileMap;

pub const TILE_SIZE: f32 = 32.0;
pub const CANVAS_WIDTH: f32 = 800.0;
pub const CANVAS_HEIGHT: f32 = 600.0;

/// Axis-aligned rectangle, stored as center + half extents.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub half_w: f32,
    pub half_h: f32,
}

impl BoundingBox {
    pub fn from_center(x: f32, y: f32, w: f32, h: f32) -> Self {
        BoundingBox { x, y, half_w: w / 2.0, half_h: h / 2.0 }
    }

    pub fn from_top_left(left: f32, top: f32, w: f32, h: f32) -> Self {
        BoundingBox::from_center(left + w / 2.0, top + h / 2.0, w, h)
    }

    pub fn left(&self) -> f32 { self.x - self.half_w }
    pub fn right(&self) -> f32 { self.x + self.half_w }
    pub fn top(&self) -> f32 { self.y - self.half_h }
    pub fn bottom(&self) -> f32 { self.y + self.half_h }

    /// Strict intersection: boxes that only share an edge do not overlap.
    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Point test; left/top edges inclusive, right/bottom exclusive.
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.left() && px < self.right() && py >= self.top() && py < self.bottom()
    }
}

/// Pixel coordinate → cell index (floor division).
#[inline]
pub fn cell_of(px: f32) -> i32 {
    (px / TILE_SIZE).floor() as i32
}

/// Is there a solid tile under the bottom edge of the box centered at (x, y)?
pub fn has_ground_below(map: &TileMap, x: f32, y: f32, w: f32, h: f32) -> bool {
    let row = cell_of(y + h / 2.0);
    let c1 = cell_of(x - w / 2.0);
    let c2 = cell_of(x + w / 2.0 - 1.0);
    map.is_solid_at(c1, row) || map.is_solid_at(c2, row)
}

/// Is the leading edge of the box (in `direction`) touching a solid tile?
/// `direction > 0` means right, anything else means left.
pub fn has_wall(map: &TileMap, x: f32, y: f32, w: f32, h: f32, direction: i32) -> bool {
    let side = if direction > 0 { x + w / 2.0 } else { x - w / 2.0 };
    let col = cell_of(side);
    let r1 = cell_of(y - h / 2.0);
    let r2 = cell_of(y + h / 2.0 - 1.0);
    map.is_solid_at(col, r1) || map.is_solid_at(col, r2)
}

/// Center y that puts the bottom of a box of height `h` exactly on top of
/// the row containing `y + h/2`.
#[inline]
pub fn landing_y(y: f32, h: f32) -> f32 {
    cell_of(y + h / 2.0) as f32 * TILE_SIZE - h / 2.0
}

/// Bounding box of the tile at (col, row).
#[cfg(test)]
pub fn tile_box(col: usize, row: usize) -> BoundingBox {
    BoundingBox::from_top_left(col as f32 * TILE_SIZE, row as f32 * TILE_SIZE, TILE_SIZE, TILE_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tile::TileMap;

    fn map(rows: &[&str]) -> TileMap {
        TileMap::parse(rows).unwrap()
    }

    // ── BoundingBox ──

    #[test]
    fn overlap_is_strict() {
        let a = BoundingBox::from_top_left(0.0, 0.0, 10.0, 10.0);
        let touching = BoundingBox::from_top_left(10.0, 0.0, 10.0, 10.0);
        let inside = BoundingBox::from_top_left(9.0, 9.0, 10.0, 10.0);
        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&inside));
        assert!(inside.overlaps(&a));
    }

    #[test]
    fn contains_is_half_open() {
        let b = BoundingBox::from_top_left(300.0, 250.0, 200.0, 50.0);
        assert!(b.contains(300.0, 250.0));
        assert!(b.contains(499.0, 299.0));
        assert!(!b.contains(500.0, 260.0));
        assert!(!b.contains(350.0, 300.0));
    }

    #[test]
    fn center_and_top_left_agree() {
        let a = BoundingBox::from_center(100.0, 100.0, 26.0, 42.0);
        let b = BoundingBox::from_top_left(87.0, 79.0, 26.0, 42.0);
        assert_eq!(a, b);
        assert_eq!(a.bottom(), 121.0);
    }

    // ── Ground ──

    #[test]
    fn ground_when_bottom_sample_in_solid_row() {
        let m = map(&["....", "....", "####"]);
        // bottom edge at y = 64 → row 2
        assert!(has_ground_below(&m, 48.0, 43.0, 26.0, 42.0));
        assert!(has_ground_below(&m, 48.0, 50.0, 26.0, 42.0));
    }

    #[test]
    fn no_ground_strictly_above_solid_row() {
        let m = map(&["....", "....", "####"]);
        // bottom edge just above row 2 for every y
        for y in 0..42 {
            assert!(!has_ground_below(&m, 48.0, y as f32, 26.0, 42.0), "y={y}");
        }
    }

    #[test]
    fn either_bottom_corner_counts() {
        let m = map(&["....", "#..."]);
        // box spans columns 0..1, only column 0 is solid
        assert!(has_ground_below(&m, 40.0, 20.0, 26.0, 26.0));
        // box entirely in column 1
        assert!(!has_ground_below(&m, 48.0, 20.0, 26.0, 26.0));
    }

    #[test]
    fn right_sample_excludes_boundary_pixel() {
        let m = map(&["....", ".#.."]);
        // right edge exactly at x = 32: last covered pixel is 31 → column 0
        assert!(!has_ground_below(&m, 19.0, 20.0, 26.0, 26.0));
    }

    #[test]
    fn outside_grid_is_not_ground() {
        let m = map(&["##", "##"]);
        assert!(!has_ground_below(&m, 16.0, 60.0, 20.0, 20.0));
        assert!(!has_ground_below(&m, -40.0, 10.0, 20.0, 20.0));
    }

    // ── Walls ──

    #[test]
    fn wall_on_leading_edge_only() {
        let m = map(&["..#.", "..#."]);
        // box centered in column 1, right edge in column 2
        assert!(has_wall(&m, 56.0, 32.0, 26.0, 42.0, 1));
        assert!(!has_wall(&m, 56.0, 32.0, 26.0, 42.0, -1));
    }

    #[test]
    fn wall_checks_top_and_bottom_rows() {
        let top_only = map(&["..#.", "....", "...."]);
        let bottom_only = map(&["....", "..#.", "...."]);
        // box spans rows 0..1
        assert!(has_wall(&top_only, 56.0, 30.0, 26.0, 42.0, 1));
        assert!(has_wall(&bottom_only, 56.0, 30.0, 26.0, 42.0, 1));
    }

    #[test]
    fn wall_outside_grid_is_open() {
        let m = map(&["#"]);
        assert!(!has_wall(&m, 5.0, 16.0, 26.0, 26.0, -1));
    }

    // ── Landing ──

    #[test]
    fn landing_snaps_bottom_to_row_top() {
        // bottom at 448.6 → row 14 → top of row at 448
        assert_eq!(landing_y(427.6, 42.0), 14.0 * 32.0 - 21.0);
        assert_eq!(landing_y(427.0, 42.0), 427.0);
    }
}
