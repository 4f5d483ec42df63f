use crate::anim::ROTATION_DURATION;
use crate::color::Palette;
use crate::error::ChartError;
use palette::Srgba;
use serde::{Deserialize, Serialize};
use serde_with::DeserializeFromStr;
use std::time::Duration;
use strum::{Display as StrumDisplay, EnumIter, EnumString};

pub const VIEW_SIZE: f64 = 150.0;
pub const STROKE_WIDTH: f64 = 25.0;
pub const FONT_SIZE: f64 = 25.0;

/// Snapshot of how far along the chart is. `current` may exceed `max` or go
/// negative; only `max` is constrained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressSpec {
    pub current: f64,
    pub max: f64,
}

impl Default for ProgressSpec {
    fn default() -> Self {
        Self {
            current: 0.0,
            max: 100.0,
        }
    }
}

impl ProgressSpec {
    pub fn new(current: f64, max: f64) -> Result<Self, ChartError> {
        let spec = Self { current, max };
        spec.ratio()?;
        Ok(spec)
    }

    /// `current / max`, unclamped.
    pub fn ratio(&self) -> Result<f64, ChartError> {
        if !self.max.is_finite() || self.max <= 0.0 {
            return Err(ChartError::InvalidMaxProgress(self.max));
        }
        if !self.current.is_finite() {
            return Err(ChartError::NonFiniteProgress(self.current));
        }
        Ok(self.current / self.max)
    }

    pub fn sweep_angle(&self) -> Result<f64, ChartError> {
        Ok(360.0 * self.ratio()?)
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum Rotation {
    #[default]
    #[strum(to_string = "clockwise", serialize = "cw")]
    Clockwise,
    #[strum(
        to_string = "counter-clockwise",
        serialize = "counterclockwise",
        serialize = "anticlockwise",
        serialize = "ccw"
    )]
    CounterClockwise,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RainbowSpec {
    pub animate: bool,
    pub rotation: Rotation,
    pub duration_ms: u64,
    pub palette: Palette,
}

impl Default for RainbowSpec {
    fn default() -> Self {
        Self {
            animate: false,
            rotation: Rotation::Clockwise,
            duration_ms: ROTATION_DURATION.as_millis() as u64,
            palette: Palette::Hsl,
        }
    }
}

impl RainbowSpec {
    pub fn rotating(rotation: Rotation) -> Self {
        Self {
            animate: true,
            rotation,
            ..Self::default()
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StyleSpec {
    /// Logical size the chart was designed at; containers smaller than this
    /// scale the stroke and font down.
    pub view_size: f64,
    pub background_color: Srgba<f64>,
    /// Ignored while `rainbow` is set, but still animated toward.
    pub stroke_color: Option<Srgba<f64>>,
    pub stroke_width: f64,
    pub font_size: f64,
    pub font_color: Srgba<f64>,
    pub prefix: String,
    pub suffix: String,
    pub rainbow: Option<RainbowSpec>,
    pub debug: bool,
}

pub const BACKGROUND_COLOR: Srgba<f64> = Srgba::new(0.8, 0.8, 0.8, 0.25);
pub const STROKE_COLOR: Srgba<f64> = Srgba::new(0.0, 0.0, 0.0, 1.0);
pub const FONT_COLOR: Srgba<f64> = Srgba::new(0.0, 0.0, 0.0, 1.0);

impl Default for StyleSpec {
    fn default() -> Self {
        Self {
            view_size: VIEW_SIZE,
            background_color: BACKGROUND_COLOR,
            stroke_color: Some(STROKE_COLOR),
            stroke_width: STROKE_WIDTH,
            font_size: FONT_SIZE,
            font_color: FONT_COLOR,
            prefix: String::new(),
            suffix: String::new(),
            rainbow: None,
            debug: false,
        }
    }
}

impl StyleSpec {
    pub fn label(&self, value: f64) -> String {
        format!("{}{}{}", self.prefix, value.round() as i64, self.suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_validation() {
        assert!(ProgressSpec::new(196.0, 300.0).is_ok());
        assert!(ProgressSpec::new(-5.0, 300.0).is_ok());
        assert!(ProgressSpec::new(900.0, 300.0).is_ok());

        let cases = vec![
            (1.0, 0.0, ChartError::InvalidMaxProgress(0.0)),
            (1.0, -3.0, ChartError::InvalidMaxProgress(-3.0)),
            (1.0, f64::INFINITY, ChartError::InvalidMaxProgress(f64::INFINITY)),
            (
                f64::NEG_INFINITY,
                10.0,
                ChartError::NonFiniteProgress(f64::NEG_INFINITY),
            ),
        ];
        for (current, max, expected) in cases {
            assert_eq!(ProgressSpec::new(current, max), Err(expected));
        }
    }

    #[test]
    fn test_sweep_angle_is_not_clamped() {
        let spec = ProgressSpec::new(600.0, 300.0).unwrap();
        assert_eq!(spec.sweep_angle().unwrap(), 720.0);
    }

    #[test]
    fn test_label_rounds_value() {
        let style = StyleSpec {
            prefix: "~".into(),
            suffix: "%".into(),
            ..StyleSpec::default()
        };
        assert_eq!(style.label(41.6), "~42%");
        assert_eq!(StyleSpec::default().label(195.5), "196");
        assert_eq!(StyleSpec::default().label(-0.4), "0");
    }

    #[test]
    fn test_rotation_deserialization() {
        let cases = vec![
            ("\"clockwise\"", Rotation::Clockwise),
            ("\"CW\"", Rotation::Clockwise),
            ("\"counter-clockwise\"", Rotation::CounterClockwise),
            ("\"CounterClockwise\"", Rotation::CounterClockwise),
            ("\"ccw\"", Rotation::CounterClockwise),
        ];

        for (json, expected) in cases {
            let deserialized: Rotation = serde_json::from_str(json).unwrap();
            assert_eq!(deserialized, expected);
        }
    }

    #[test]
    fn test_rainbow_defaults_fill_missing_fields() {
        let rainbow: RainbowSpec = serde_json::from_str(r#"{"animate": true}"#).unwrap();
        assert!(rainbow.animate);
        assert_eq!(rainbow.rotation, Rotation::Clockwise);
        assert_eq!(rainbow.duration(), ROTATION_DURATION);
        assert_eq!(rainbow.palette, Palette::Hsl);
    }
}
