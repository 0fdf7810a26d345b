//! Per-character cell behaviors
//!
//! Each map character maps to an ordered list of behaviors. Every behavior
//! has a `prepare` hook, run when the board is built and again when the body
//! leaves the cell, and an `on_enter` hook, run once per tick while the body
//! overlaps the cell.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::grid::{TileCoord, TileGrid};
use crate::events::{Event, Notifier};
use crate::foundation::math::{colors, Color};
use crate::physics::Body;

/// Effect of a cell on the board and the body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CellBehavior {
    /// Paints the cell with a resting color
    Mark {
        /// Resting color
        color: Color,
    },
    /// Raises `set-board-friction` while the body is inside
    SetFriction {
        /// Friction factor to apply
        friction: f32,
    },
    /// Solid tile, handed to the collision resolver
    Wall,
}

impl CellBehavior {
    /// Restore the cell's resting state
    pub fn prepare(&self, grid: &mut TileGrid, tile: TileCoord) {
        if let Self::Mark { color } = self {
            grid.set_color(tile, *color);
        }
    }

    /// React to the body overlapping the cell during this tick
    ///
    /// Wall behaviors add the tile to `colliding`; the caller resolves those
    /// tiles once every overlapped cell has run.
    pub fn on_enter(
        &self,
        _grid: &mut TileGrid,
        tile: TileCoord,
        _body: &mut Body,
        colliding: &mut Vec<TileCoord>,
        notifier: &dyn Notifier,
    ) {
        match self {
            Self::Mark { .. } => {}
            Self::SetFriction { friction } => notifier.notify(Event::set_board_friction(*friction)),
            Self::Wall => {
                if !colliding.contains(&tile) {
                    colliding.push(tile);
                }
            }
        }
    }

    /// Whether this behavior makes the cell solid
    pub const fn is_wall(&self) -> bool {
        matches!(self, Self::Wall)
    }
}

/// Immutable character to behavior-list table
///
/// Serialized as a map of one-character strings so it can live in a config
/// file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, Vec<CellBehavior>>",
    into = "BTreeMap<String, Vec<CellBehavior>>"
)]
pub struct BehaviorTable {
    entries: BTreeMap<char, Vec<CellBehavior>>,
}

impl BehaviorTable {
    /// Table with no characters registered
    pub const fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Register `behaviors` for `ch`, replacing any previous entry
    #[must_use]
    pub fn with(mut self, ch: char, behaviors: Vec<CellBehavior>) -> Self {
        self.entries.insert(ch, behaviors);
        self
    }

    /// Whether `ch` has an entry
    pub fn contains(&self, ch: char) -> bool {
        self.entries.contains_key(&ch)
    }

    /// Behaviors registered for `ch`, in invocation order
    pub fn get(&self, ch: char) -> Option<&[CellBehavior]> {
        self.entries.get(&ch).map(Vec::as_slice)
    }

    /// Registered characters
    pub fn characters(&self) -> impl Iterator<Item = char> + '_ {
        self.entries.keys().copied()
    }
}

impl Default for BehaviorTable {
    /// `@` checkpoint, `#` wall, `x` friction zone
    fn default() -> Self {
        Self::empty()
            .with('@', vec![CellBehavior::Mark { color: colors::red() }])
            .with(
                '#',
                vec![CellBehavior::Mark { color: colors::white() }, CellBehavior::Wall],
            )
            .with(
                'x',
                vec![
                    CellBehavior::Mark {
                        color: colors::friction_blue(),
                    },
                    CellBehavior::SetFriction { friction: 5.0 },
                ],
            )
    }
}

impl TryFrom<BTreeMap<String, Vec<CellBehavior>>> for BehaviorTable {
    type Error = String;

    fn try_from(raw: BTreeMap<String, Vec<CellBehavior>>) -> Result<Self, Self::Error> {
        let mut entries = BTreeMap::new();
        for (key, behaviors) in raw {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(' '), None) => return Err("space is always empty and cannot carry behaviors".to_owned()),
                (Some(ch), None) => {
                    entries.insert(ch, behaviors);
                }
                _ => return Err(format!("cell key {key:?} must be exactly one character")),
            }
        }
        Ok(Self { entries })
    }
}

impl From<BehaviorTable> for BTreeMap<String, Vec<CellBehavior>> {
    fn from(table: BehaviorTable) -> Self {
        table
            .entries
            .into_iter()
            .map(|(ch, behaviors)| (ch.to_string(), behaviors))
            .collect()
    }
}
