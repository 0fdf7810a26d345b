//! Tile grid loaded from an ASCII map
//!
//! One text row per grid row, right-padded with spaces to the longest row.
//! Tile size is derived from the world extent minus the border on each side,
//! divided by the grid dimensions, so tiles need not be square.

use std::cmp::Ordering;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::behavior::BehaviorTable;
use crate::foundation::math::{colors, Color, Rect, Vec2, Vec3};

/// Map loading errors
#[derive(Error, Debug)]
pub enum MapFormatError {
    /// A character has no entry in the behavior table
    #[error("unknown map character {ch:?} at column {x}, row {y}")]
    UnknownCharacter {
        /// Offending character
        ch: char,
        /// Column of the character
        x: u32,
        /// Row of the character
        y: u32,
    },

    /// The map has no rows or only blank rows
    #[error("map is empty")]
    Empty,

    /// The map file could not be read
    #[error("cannot read map: {0}")]
    Io(#[from] std::io::Error),
}

/// Integer tile coordinate
///
/// Ordered row-major (`y`, then `x`), which fixes the order tiles are visited
/// in whenever a set of them is walked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    /// Column
    pub x: u32,
    /// Row
    pub y: u32,
}

impl TileCoord {
    /// Create a tile coordinate
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl Ord for TileCoord {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.y, self.x).cmp(&(other.y, other.x))
    }
}

impl PartialOrd for TileCoord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Where the grid sits in the world
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardLayout {
    /// Empty margin between the world edge and the first tile, per axis
    pub border: Vec2,
    /// Total world (screen) size the board is fitted into
    pub extent: Vec2,
}

impl BoardLayout {
    /// Layout with the same border on both axes
    pub fn new(border: f32, extent: Vec2) -> Self {
        Self {
            border: Vec2::new(border, border),
            extent,
        }
    }
}

impl Default for BoardLayout {
    fn default() -> Self {
        Self::new(10.0, Vec2::new(800.0, 600.0))
    }
}

/// Static map of cells plus their current colors
#[derive(Debug, Clone, PartialEq)]
pub struct TileGrid {
    border: Vec2,
    tile_size: Vec2,
    width: u32,
    height: u32,
    rows: Vec<Vec<char>>,
    colors: Vec<Color>,
}

impl TileGrid {
    /// Parse map text, validating every character against `table`
    pub fn parse(text: &str, table: &BehaviorTable, layout: &BoardLayout) -> Result<Self, MapFormatError> {
        let mut rows: Vec<Vec<char>> = text.lines().map(|line| line.chars().collect()).collect();
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        if width == 0 {
            return Err(MapFormatError::Empty);
        }
        for row in &mut rows {
            row.resize(width, ' ');
        }

        for (y, row) in rows.iter().enumerate() {
            for (x, &ch) in row.iter().enumerate() {
                if ch != ' ' && !table.contains(ch) {
                    return Err(MapFormatError::UnknownCharacter {
                        ch,
                        x: x as u32,
                        y: y as u32,
                    });
                }
            }
        }

        let width = width as u32;
        let height = rows.len() as u32;
        let playfield = layout.extent - layout.border * 2.0;
        let tile_size = Vec2::new(playfield.x / width as f32, playfield.y / height as f32);
        log::info!(
            "Loaded {width}x{height} board, tiles {:.1}x{:.1}",
            tile_size.x,
            tile_size.y
        );

        Ok(Self {
            border: layout.border,
            tile_size,
            width,
            height,
            rows,
            colors: vec![colors::ground(); (width * height) as usize],
        })
    }

    /// Read and parse a map file
    pub fn load(path: impl AsRef<Path>, table: &BehaviorTable, layout: &BoardLayout) -> Result<Self, MapFormatError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text, table, layout)
    }

    /// Map text for this grid, one padded row per line
    ///
    /// Parsing the result with the same table and layout yields an equal grid.
    pub fn to_text(&self) -> String {
        let mut text = String::with_capacity(self.rows.len() * (self.width as usize + 1));
        for row in &self.rows {
            text.extend(row.iter());
            text.push('\n');
        }
        text
    }

    /// Grid width in tiles
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in tiles
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Size of one tile in world units
    pub const fn tile_size(&self) -> Vec2 {
        self.tile_size
    }

    /// Border offset of the first tile
    pub const fn border(&self) -> Vec2 {
        self.border
    }

    /// Rectangle covered by all tiles
    pub fn playfield(&self) -> Rect {
        Rect::new(
            self.border.x,
            self.border.y,
            self.tile_size.x * self.width as f32,
            self.tile_size.y * self.height as f32,
        )
    }

    /// Character stored at `tile`
    pub fn character(&self, tile: TileCoord) -> char {
        self.rows[tile.y as usize][tile.x as usize]
    }

    /// Every non-space cell with its character, row-major
    pub fn occupied(&self) -> impl Iterator<Item = (TileCoord, char)> + '_ {
        self.rows.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter(|&(_, &ch)| ch != ' ')
                .map(move |(x, &ch)| (TileCoord::new(x as u32, y as u32), ch))
        })
    }

    /// Tile containing a world position
    ///
    /// Positions outside the playfield clamp to the nearest boundary tile.
    pub fn world_to_tile(&self, position: &Vec3) -> TileCoord {
        let clamp = |value: f32, dimension: u32| -> u32 {
            let max = dimension.saturating_sub(1) as f32;
            value.floor().clamp(0.0, max) as u32
        };
        TileCoord::new(
            clamp((position.x - self.border.x) / self.tile_size.x, self.width),
            clamp((position.y - self.border.y) / self.tile_size.y, self.height),
        )
    }

    /// Top-left corner of a tile in world space
    pub fn tile_to_world(&self, tile: TileCoord) -> Vec3 {
        Vec3::new(
            (tile.x as f32).mul_add(self.tile_size.x, self.border.x),
            (tile.y as f32).mul_add(self.tile_size.y, self.border.y),
            0.0,
        )
    }

    /// Center of a tile in world space
    pub fn tile_center(&self, tile: TileCoord) -> Vec3 {
        self.tile_to_world(tile) + Vec3::new(self.tile_size.x * 0.5, self.tile_size.y * 0.5, 0.0)
    }

    /// World rectangle of a tile
    pub fn tile_rect(&self, tile: TileCoord) -> Rect {
        let corner = self.tile_to_world(tile);
        Rect::new(corner.x, corner.y, self.tile_size.x, self.tile_size.y)
    }

    /// Whether `tile` lies inside the grid
    pub const fn contains(&self, tile: TileCoord) -> bool {
        tile.x < self.width && tile.y < self.height
    }

    /// Current color of a tile
    pub fn color(&self, tile: TileCoord) -> Color {
        self.colors[self.index(tile)]
    }

    /// Paint a tile
    pub fn set_color(&mut self, tile: TileCoord, color: Color) {
        let index = self.index(tile);
        self.colors[index] = color;
    }

    /// Paint a tile back to the bare ground color
    pub fn reset_color(&mut self, tile: TileCoord) {
        self.set_color(tile, colors::ground());
    }

    /// All tile colors, row-major
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    const fn index(&self, tile: TileCoord) -> usize {
        (tile.y * self.width + tile.x) as usize
    }
}
