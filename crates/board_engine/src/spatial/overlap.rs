//! Tiles touched by a body's bounding square

use std::collections::BTreeSet;

use crate::board::{TileCoord, TileGrid};
use crate::foundation::math::Vec3;

/// Tiles overlapped by the square of side `2 * radius` centered at `position`
///
/// Both corners of the square are mapped to tiles and every tile between
/// them is reported, so the result is bounded by the grid size. Corners
/// outside the grid clamp to boundary tiles, which means the result is never
/// empty.
pub fn overlapping_tiles(grid: &TileGrid, position: &Vec3, radius: f32) -> BTreeSet<TileCoord> {
    let extent = Vec3::new(radius, radius, 0.0);
    let a = grid.world_to_tile(&(position - extent));
    let b = grid.world_to_tile(&(position + extent));

    let mut tiles = BTreeSet::new();
    for y in a.y.min(b.y)..=a.y.max(b.y) {
        for x in a.x.min(b.x)..=a.x.max(b.x) {
            tiles.insert(TileCoord::new(x, y));
        }
    }
    tiles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BehaviorTable, BoardLayout};
    use crate::foundation::math::Vec2;

    fn grid(text: &str) -> TileGrid {
        // 100x100 tiles starting at (10, 10)
        let layout = BoardLayout::new(10.0, Vec2::new(520.0, 320.0));
        TileGrid::parse(text, &BehaviorTable::default(), &layout).unwrap()
    }

    #[test]
    fn test_body_inside_one_tile() {
        let grid = grid("     \n     \n     ");
        let tiles = overlapping_tiles(&grid, &Vec3::new(160.0, 160.0, 0.0), 20.0);
        assert_eq!(tiles.into_iter().collect::<Vec<_>>(), vec![TileCoord::new(1, 1)]);
    }

    #[test]
    fn test_body_on_a_corner_touches_four() {
        let grid = grid("     \n     \n     ");
        let tiles = overlapping_tiles(&grid, &Vec3::new(110.0, 110.0, 0.0), 20.0);
        let expected: BTreeSet<_> = [(0, 0), (1, 0), (0, 1), (1, 1)]
            .into_iter()
            .map(|(x, y)| TileCoord::new(x, y))
            .collect();
        assert_eq!(tiles, expected);
    }

    #[test]
    fn test_large_radius_has_no_gaps() {
        let grid = grid("     \n     \n     ");
        // Spans columns 0..=4 and rows 0..=2
        let tiles = overlapping_tiles(&grid, &Vec3::new(260.0, 160.0, 0.0), 240.0);
        assert_eq!(tiles.len(), 15);
    }

    #[test]
    fn test_outside_playfield_clamps_to_boundary() {
        let grid = grid("     \n     \n     ");
        let tiles = overlapping_tiles(&grid, &Vec3::new(-500.0, 900.0, 0.0), 20.0);
        assert_eq!(tiles.into_iter().collect::<Vec<_>>(), vec![TileCoord::new(0, 2)]);
    }

    #[test]
    fn test_bottom_edge_touching_next_row() {
        let grid = grid("     \n     \n     ");
        // Bottom of the body sits exactly on the top of row 1
        let tiles = overlapping_tiles(&grid, &Vec3::new(160.0, 90.0, 0.0), 20.0);
        assert!(tiles.contains(&TileCoord::new(1, 1)));
        assert!(tiles.contains(&TileCoord::new(1, 0)));
    }

    #[test]
    fn test_non_finite_radius_stays_bounded() {
        let grid = grid("     \n     \n     ");
        let tiles = overlapping_tiles(&grid, &Vec3::new(160.0, 160.0, 0.0), f32::NAN);
        assert_eq!(tiles.into_iter().collect::<Vec<_>>(), vec![TileCoord::new(0, 0)]);

        let tiles = overlapping_tiles(&grid, &Vec3::new(160.0, 160.0, 0.0), f32::INFINITY);
        assert_eq!(tiles.len(), 15);
    }

    #[test]
    fn test_huge_radius_covers_the_grid_once() {
        let grid = grid("     \n     \n     ");
        let tiles = overlapping_tiles(&grid, &Vec3::new(160.0, 160.0, 0.0), 1e12);
        assert_eq!(tiles.len(), 15);
        assert_eq!(tiles.first(), Some(&TileCoord::new(0, 0)));
        assert_eq!(tiles.last(), Some(&TileCoord::new(4, 2)));
    }
}
