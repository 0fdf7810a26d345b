//! Spatial queries over the tile grid

mod overlap;

pub use overlap::overlapping_tiles;
