//! Backend independent drawing primitives emitted by the renderer.
//!
//! Angles are in degrees, zero pointing along the positive x axis and growing
//! clockwise in a y-down coordinate system.

use crate::layout::{Point, Rect};
use palette::Srgba;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    Butt,
    #[default]
    Round,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    Miter,
    #[default]
    Round,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Evenly spaced color stops. A flat color is a linear brush whose two stops
/// are equal.
#[derive(Debug, Clone, PartialEq)]
pub enum Brush {
    Linear { stops: Arc<[Srgba<f64>]> },
    /// Stops run clockwise from 0 degrees around `center`, the last one landing
    /// back on 360.
    Sweep {
        center: Point,
        stops: Arc<[Srgba<f64>]>,
    },
}

impl Brush {
    pub fn solid(color: Srgba<f64>) -> Self {
        Self::Linear {
            stops: Arc::from([color, color]),
        }
    }

    pub fn stops(&self) -> &[Srgba<f64>] {
        match self {
            Self::Linear { stops } | Self::Sweep { stops, .. } => stops,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Stroked full circle.
    Circle {
        center: Point,
        radius: f64,
        stroke_width: f64,
        color: Srgba<f64>,
    },
    /// Stroked arc inscribed in `bounds`.
    Arc {
        bounds: Rect,
        start_angle: f64,
        sweep_angle: f64,
        stroke_width: f64,
        cap: LineCap,
        join: LineJoin,
        brush: Brush,
    },
    /// `position` is the anchor on the baseline.
    Text {
        position: Point,
        text: String,
        font_size: f64,
        color: Srgba<f64>,
        align: TextAlign,
    },
    Line {
        start: Point,
        end: Point,
        width: f64,
        color: Srgba<f64>,
    },
}
