//! Rainbow palettes for the progress arc.
//!
//! The HSL [`ColorWheel`] is the primary palette: one color per hue degree,
//! shared process-wide once computed. [`SineWave`] is the older RGB sine
//! palette, kept as a separate strategy and never mixed with the wheel math.

use crate::error::{ChartError, check_unit};
use derive_more::Deref;
use palette::encoding::Srgb;
use palette::{FromColor, Hsla, Srgba};
use parking_lot::RwLock;
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use strum::{Display as StrumDisplay, EnumIter, EnumString};

pub const WHEEL_SIZE: usize = 360;
pub const DEFAULT_SATURATION: f64 = 0.9;
pub const DEFAULT_LIGHTNESS: f64 = 0.5;
pub const DEFAULT_ALPHA: f64 = 1.0;

/// 360 colors, entry `i` having hue `i` degrees.
#[derive(Debug, Clone, PartialEq, Deref)]
pub struct ColorWheel(Arc<[Srgba<f64>]>);

type WheelKey = [u64; 3];

static DEFAULT_WHEEL: OnceLock<ColorWheel> = OnceLock::new();
static WHEELS: OnceLock<RwLock<HashMap<WheelKey, ColorWheel>>> = OnceLock::new();

impl ColorWheel {
    /// Builds a fresh table. Every component must lie in `[0, 1]`.
    pub fn generate(saturation: f64, lightness: f64, alpha: f64) -> Result<Self, ChartError> {
        let saturation = check_unit("saturation", saturation)?;
        let lightness = check_unit("lightness", lightness)?;
        let alpha = check_unit("alpha", alpha)?;

        let colors = (0..WHEEL_SIZE)
            .map(|hue| {
                let hsla = Hsla::<Srgb, f64>::new(hue as f64, saturation, lightness, alpha);
                Srgba::<f64>::from_color(hsla)
            })
            .collect();

        Ok(Self(colors))
    }

    pub fn default_wheel() -> Self {
        DEFAULT_WHEEL
            .get_or_init(|| {
                Self::generate(DEFAULT_SATURATION, DEFAULT_LIGHTNESS, DEFAULT_ALPHA)
                    .unwrap_or_else(|_| unreachable!("default components are within range"))
            })
            .clone()
    }

    /// Like [`ColorWheel::generate`], but memoized per component triple.
    ///
    /// Two threads racing on the same triple may both compute the table; the
    /// result is identical, so whichever insert wins is kept.
    pub fn cached(saturation: f64, lightness: f64, alpha: f64) -> Result<Self, ChartError> {
        let key = [saturation.to_bits(), lightness.to_bits(), alpha.to_bits()];
        let lock = WHEELS.get_or_init(|| RwLock::new(HashMap::new()));

        if let Some(wheel) = lock.read().get(&key) {
            return Ok(wheel.clone());
        }

        let wheel = Self::generate(saturation, lightness, alpha)?;
        Ok(lock.write().entry(key).or_insert(wheel).clone())
    }

    pub fn colors(&self) -> Arc<[Srgba<f64>]> {
        self.0.clone()
    }
}

/// Drops the first `shift` entries and appends them at the end.
///
/// `shift` is reduced modulo the length, so any value is accepted.
pub fn rotate_right<T: Clone>(colors: &[T], shift: usize) -> Vec<T> {
    if colors.is_empty() {
        return Vec::new();
    }
    let shift = shift % colors.len();
    colors[shift..].iter().chain(&colors[..shift]).cloned().collect()
}

/// Moves the last `shift` entries to the front.
///
/// `shift` is reduced modulo the length, so any value is accepted.
pub fn rotate_left<T: Clone>(colors: &[T], shift: usize) -> Vec<T> {
    if colors.is_empty() {
        return Vec::new();
    }
    let split = colors.len() - shift % colors.len();
    colors[split..].iter().chain(&colors[..split]).cloned().collect()
}

pub trait ColorSource {
    fn palette(&self) -> Result<Arc<[Srgba<f64>]>, ChartError>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HslWheel {
    pub saturation: f64,
    pub lightness: f64,
    pub alpha: f64,
}

impl Default for HslWheel {
    fn default() -> Self {
        Self {
            saturation: DEFAULT_SATURATION,
            lightness: DEFAULT_LIGHTNESS,
            alpha: DEFAULT_ALPHA,
        }
    }
}

impl ColorSource for HslWheel {
    fn palette(&self) -> Result<Arc<[Srgba<f64>]>, ChartError> {
        if *self == Self::default() {
            return Ok(ColorWheel::default_wheel().colors());
        }
        ColorWheel::cached(self.saturation, self.lightness, self.alpha).map(|w| w.colors())
    }
}

/// Legacy RGB palette: `128 + 127 * sin(frequency * i + phase)` per channel,
/// phases 0, 2 and 4 for red, green and blue, over `start..=stop`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SineWave {
    pub start: u32,
    pub stop: u32,
    pub frequency: f64,
}

impl Default for SineWave {
    fn default() -> Self {
        Self {
            start: 0,
            stop: 31,
            frequency: 0.2,
        }
    }
}

impl SineWave {
    fn channel(&self, i: u32, phase: f64) -> u8 {
        let value = (self.frequency * f64::from(i) + phase).sin() * 127.0 + 128.0;
        value.round().clamp(0.0, 255.0) as u8
    }

    pub fn colors(&self) -> Vec<Srgba<f64>> {
        (self.start..=self.stop)
            .map(|i| {
                Srgba::<u8>::new(
                    self.channel(i, 0.0),
                    self.channel(i, 2.0),
                    self.channel(i, 4.0),
                    u8::MAX,
                )
                .into_format()
            })
            .collect()
    }
}

impl ColorSource for SineWave {
    fn palette(&self) -> Result<Arc<[Srgba<f64>]>, ChartError> {
        Ok(self.colors().into())
    }
}

/// Which palette rainbow mode draws with.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    SerializeDisplay,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
pub enum Palette {
    #[default]
    #[strum(to_string = "hsl", serialize = "wheel")]
    Hsl,
    #[strum(to_string = "legacy-rgb", serialize = "rgb", serialize = "sine")]
    LegacyRgb,
}

impl Palette {
    pub fn colors(self) -> Result<Arc<[Srgba<f64>]>, ChartError> {
        match self {
            Self::Hsl => HslWheel::default().palette(),
            Self::LegacyRgb => SineWave::default().palette(),
        }
    }
}
