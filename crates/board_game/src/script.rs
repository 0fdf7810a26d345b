//! Recorded input replay
//!
//! One command per line, `<tick> <command> [args]`:
//!
//! ```text
//! 0   start-power
//! 30  stop-power 400 300
//! 90  key left
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

use std::path::Path;
use std::str::FromStr;

use board_engine::events::Direction;
use board_engine::foundation::math::Vec3;
use thiserror::Error;

/// Script parsing errors
#[derive(Error, Debug)]
pub enum ScriptError {
    /// A line could not be parsed
    #[error("line {line}: {message}")]
    Syntax {
        /// 1-based line number
        line: usize,
        /// What was wrong
        message: String,
    },

    /// The script file could not be read
    #[error("cannot read script: {0}")]
    Io(#[from] std::io::Error),
}

/// Input action replayed at a given tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Pointer pressed
    StartPower,
    /// Pointer released at a world position
    StopPower(Vec3),
    /// Direction key pressed
    Key(Direction),
}

/// Action scheduled for a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Command {
    /// Tick before which the action is applied
    pub tick: u64,
    /// What to do
    pub action: Action,
}

/// Commands ordered by tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Script {
    commands: Vec<Command>,
}

impl Script {
    /// Read and parse a script file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        std::fs::read_to_string(path)?.parse()
    }

    /// All commands, sorted by tick with file order kept among equal ticks
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Actions due at `tick`, in file order
    pub fn actions_at(&self, tick: u64) -> impl Iterator<Item = Action> + '_ {
        self.commands
            .iter()
            .filter(move |command| command.tick == tick)
            .map(|command| command.action)
    }

    /// Last tick with a command
    pub fn last_tick(&self) -> Option<u64> {
        self.commands.last().map(|command| command.tick)
    }
}

impl FromStr for Script {
    type Err = ScriptError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut commands = Vec::new();
        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let syntax = |message: String| ScriptError::Syntax {
                line: index + 1,
                message,
            };
            commands.push(parse_command(line).map_err(syntax)?);
        }
        commands.sort_by_key(|command| command.tick);
        Ok(Self { commands })
    }
}

fn parse_command(line: &str) -> Result<Command, String> {
    let mut words = line.split_whitespace();
    let tick = words
        .next()
        .ok_or_else(|| "missing tick".to_string())?
        .parse::<u64>()
        .map_err(|e| format!("bad tick: {e}"))?;

    let action = match words.next() {
        Some("start-power") => Action::StartPower,
        Some("stop-power") => {
            let mut coordinate = |axis: &str| -> Result<f32, String> {
                words
                    .next()
                    .ok_or_else(|| format!("stop-power needs {axis}"))?
                    .parse::<f32>()
                    .map_err(|e| format!("bad {axis}: {e}"))
            };
            let x = coordinate("x")?;
            let y = coordinate("y")?;
            Action::StopPower(Vec3::new(x, y, 0.0))
        }
        Some("key") => {
            let name = words.next().ok_or_else(|| "key needs a direction".to_string())?;
            Action::Key(Direction::from_name(name).ok_or_else(|| format!("unknown direction {name:?}"))?)
        }
        Some(other) => return Err(format!("unknown command {other:?}")),
        None => return Err("missing command".to_string()),
    };

    if let Some(extra) = words.next() {
        return Err(format!("unexpected {extra:?}"));
    }
    Ok(Command { tick, action })
}
