//! Line protocol spoken over the control socket.
//!
//! ```text
//! progress <current> <max>
//! rainbow off
//! rainbow static [palette]
//! rainbow <clockwise|counter-clockwise> [duration_ms] [palette]
//! debug <on|off>
//! reload
//! ```

use crate::events::AppEvent;
use circlechart_core::{ChartError, Palette, ProgressSpec, RainbowSpec, Rotation};
use std::num::{ParseFloatError, ParseIntError};
use std::str::{FromStr, SplitWhitespace};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Progress(ProgressSpec),
    Rainbow(Option<RainbowSpec>),
    Debug(bool),
    Reload,
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command {0:?}")]
    Unknown(String),
    #[error("missing {0}")]
    Missing(&'static str),
    #[error("invalid {name}: {source}")]
    Number {
        name: &'static str,
        source: ParseFloatError,
    },
    #[error("invalid duration: {0}")]
    Duration(#[from] ParseIntError),
    #[error(transparent)]
    Progress(#[from] ChartError),
    #[error("unknown rainbow mode {0:?}")]
    RainbowMode(String),
    #[error("unknown palette {0:?}")]
    Palette(String),
    #[error("expected on or off, got {0:?}")]
    Switch(String),
    #[error("unexpected argument {0:?}")]
    Trailing(String),
}

impl From<Command> for AppEvent {
    fn from(command: Command) -> Self {
        match command {
            Command::Progress(p) => AppEvent::Progress(p),
            Command::Rainbow(r) => AppEvent::Rainbow(r),
            Command::Debug(on) => AppEvent::Debug(on),
            Command::Reload => AppEvent::ConfigReload,
        }
    }
}

fn number(word: Option<&str>, name: &'static str) -> Result<f64, CommandError> {
    word.ok_or(CommandError::Missing(name))?
        .parse()
        .map_err(|source| CommandError::Number { name, source })
}

fn switch(word: Option<&str>) -> Result<bool, CommandError> {
    match word.ok_or(CommandError::Missing("on or off"))? {
        w if w.eq_ignore_ascii_case("on") => Ok(true),
        w if w.eq_ignore_ascii_case("off") => Ok(false),
        w => Err(CommandError::Switch(w.to_string())),
    }
}

fn palette(word: Option<&str>) -> Result<Palette, CommandError> {
    word.map_or(Ok(Palette::default()), |w| {
        w.parse().map_err(|_| CommandError::Palette(w.to_string()))
    })
}

fn rainbow(words: &mut SplitWhitespace<'_>) -> Result<Option<RainbowSpec>, CommandError> {
    let mode = words.next().ok_or(CommandError::Missing("rainbow mode"))?;

    if mode.eq_ignore_ascii_case("off") {
        return Ok(None);
    }
    if mode.eq_ignore_ascii_case("static") {
        return Ok(Some(RainbowSpec {
            animate: false,
            palette: palette(words.next())?,
            ..RainbowSpec::default()
        }));
    }

    let rotation: Rotation = mode
        .parse()
        .map_err(|_| CommandError::RainbowMode(mode.to_string()))?;
    let mut spec = RainbowSpec::rotating(rotation);
    if let Some(duration) = words.next() {
        spec.duration_ms = duration.parse()?;
    }
    spec.palette = palette(words.next())?;
    Ok(Some(spec))
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let verb = words.next().ok_or(CommandError::Empty)?;

        let command = match verb.to_ascii_lowercase().as_str() {
            "progress" => {
                let current = number(words.next(), "current")?;
                let max = number(words.next(), "max")?;
                Command::Progress(ProgressSpec::new(current, max)?)
            }
            "rainbow" => Command::Rainbow(rainbow(&mut words)?),
            "debug" => Command::Debug(switch(words.next())?),
            "reload" => Command::Reload,
            other => return Err(CommandError::Unknown(other.to_string())),
        };

        match words.next() {
            Some(extra) => Err(CommandError::Trailing(extra.to_string())),
            None => Ok(command),
        }
    }
}
