use crate::anim::{
    AnimatedColor, AnimatedScalar, Animation, COLOR_DURATION, Easing, LoopingAngle,
    PROGRESS_DURATION,
};
use crate::color::{WHEEL_SIZE, rotate_left, rotate_right};
use crate::draw::{Brush, DrawCommand, LineCap, LineJoin, TextAlign};
use crate::error::ChartError;
use crate::layout::{ArcLayout, Point, Size};
use crate::model::{ProgressSpec, RainbowSpec, Rotation, STROKE_COLOR, StyleSpec};
use palette::Srgba;
use std::time::Instant;

pub const START_ANGLE: f64 = 0.0;
pub const MAX_SWEEP: f64 = 360.0;
pub const CROSSHAIR_WIDTH: f64 = 10.0;

#[derive(Debug, Clone)]
struct Tracks {
    progress: AnimatedScalar,
    sweep: AnimatedScalar,
    stroke_width: AnimatedScalar,
    font_size: AnimatedScalar,
    stroke_color: AnimatedColor,
    font_color: AnimatedColor,
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    progress: f64,
    sweep: f64,
    stroke_width: f64,
    font_size: f64,
    stroke_color: Srgba<f64>,
    font_color: Srgba<f64>,
}

impl Tracks {
    fn new(progress: f64, sweep: f64, style: &StyleSpec, now: Instant) -> Self {
        let scalar = |value| AnimatedScalar::new(value, PROGRESS_DURATION, Easing::default(), now);
        let color = |value| AnimatedColor::new(value, COLOR_DURATION, Easing::default(), now);

        Self {
            progress: scalar(progress),
            sweep: scalar(sweep),
            stroke_width: scalar(style.stroke_width),
            font_size: scalar(style.font_size),
            stroke_color: color(style.stroke_color.unwrap_or(STROKE_COLOR)),
            font_color: color(style.font_color),
        }
    }

    fn retarget(&mut self, progress: f64, sweep: f64, style: &StyleSpec, now: Instant) {
        self.progress.retarget(progress, now);
        self.sweep.retarget(sweep, now);
        self.stroke_width.retarget(style.stroke_width, now);
        self.font_size.retarget(style.font_size, now);
        if let Some(stroke) = style.stroke_color {
            self.stroke_color.retarget(stroke, now);
        }
        self.font_color.retarget(style.font_color, now);
    }

    fn sample(&self, now: Instant) -> Frame {
        Frame {
            progress: self.progress.sample(now),
            sweep: self.sweep.sample(now),
            stroke_width: self.stroke_width.sample(now),
            font_size: self.font_size.sample(now),
            stroke_color: self.stroke_color.sample(now),
            font_color: self.font_color.sample(now),
        }
    }

    fn is_settled(&self, now: Instant) -> bool {
        self.progress.is_settled(now)
            && self.sweep.is_settled(now)
            && self.stroke_width.is_settled(now)
            && self.font_size.is_settled(now)
            && self.stroke_color.is_settled(now)
            && self.font_color.is_settled(now)
    }
}

/// Owns the animation state of one chart and turns each frame's inputs into
/// draw commands.
#[derive(Debug, Clone, Default)]
pub struct ChartRenderer {
    tracks: Option<Tracks>,
    rotation: Option<LoopingAngle>,
}

impl ChartRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Produces the commands for one frame: background ring, progress arc,
    /// label and, in debug mode, a crosshair.
    ///
    /// # Errors
    ///
    /// Rejects a non-positive `max` (and a non-finite `current`) before any
    /// animation state is touched.
    pub fn render(
        &mut self,
        progress: &ProgressSpec,
        style: &StyleSpec,
        container: Size,
        now: Instant,
    ) -> Result<Vec<DrawCommand>, ChartError> {
        let sweep = progress.sweep_angle()?;

        let frame = {
            let tracks = self
                .tracks
                .get_or_insert_with(|| Tracks::new(progress.current, sweep, style, now));
            tracks.retarget(progress.current, sweep, style, now);
            tracks.sample(now)
        };

        let layout =
            ArcLayout::compute(container, style.view_size, frame.stroke_width, frame.font_size);
        let brush = self.resolve_brush(
            style.rainbow.as_ref(),
            frame.stroke_color,
            layout.arc_bounds().center(),
            now,
        )?;

        let mut commands = Vec::with_capacity(5);

        if layout.ring_radius > 0.0 {
            commands.push(DrawCommand::Circle {
                center: layout.center(),
                radius: layout.ring_radius,
                stroke_width: layout.stroke_width,
                color: style.background_color,
            });
        }

        if layout.arc_diameter > 0.0 {
            commands.push(DrawCommand::Arc {
                bounds: layout.arc_bounds(),
                start_angle: START_ANGLE,
                sweep_angle: frame.sweep.clamp(-MAX_SWEEP, MAX_SWEEP),
                stroke_width: layout.stroke_width,
                cap: LineCap::Round,
                join: LineJoin::Round,
                brush,
            });
        }

        let center = layout.center();
        commands.push(DrawCommand::Text {
            position: Point::new(center.x, center.y + layout.font_size / 2.0),
            text: style.label(frame.progress),
            font_size: layout.font_size,
            color: frame.font_color,
            align: TextAlign::Center,
        });

        if style.debug {
            commands.extend(crosshair(container, random_color()));
        }

        Ok(commands)
    }

    /// Whether another frame would differ from the last one.
    pub fn is_animating(&self, now: Instant) -> bool {
        self.rotation.is_some() || self.tracks.as_ref().is_some_and(|t| !t.is_settled(now))
    }

    fn resolve_brush(
        &mut self,
        rainbow: Option<&RainbowSpec>,
        stroke_color: Srgba<f64>,
        center: Point,
        now: Instant,
    ) -> Result<Brush, ChartError> {
        let Some(rainbow) = rainbow else {
            self.stop_rotation();
            return Ok(Brush::solid(stroke_color));
        };

        let colors = rainbow.palette.colors()?;
        // a zero length loop never turns, so it draws like a static rainbow
        if !rainbow.animate || rainbow.duration_ms == 0 {
            self.stop_rotation();
            return Ok(Brush::Sweep {
                center,
                stops: colors,
            });
        }

        let angle = self.rotation_angle(rainbow, now);
        let shift = rotation_shift(angle, colors.len());
        let stops = match rainbow.rotation {
            Rotation::Clockwise => rotate_right(&colors, shift),
            Rotation::CounterClockwise => rotate_left(&colors, shift),
        };

        Ok(Brush::Sweep {
            center,
            stops: stops.into(),
        })
    }

    fn rotation_angle(&mut self, rainbow: &RainbowSpec, now: Instant) -> f64 {
        let duration = rainbow.duration();
        let rotation = match self.rotation {
            Some(rotation) if rotation.duration() == duration => rotation,
            _ => {
                log::debug!(
                    "Starting {} rainbow rotation over {:?}",
                    rainbow.rotation,
                    duration
                );
                *self.rotation.insert(LoopingAngle::new(duration, now))
            }
        };
        rotation.sample(now)
    }

    fn stop_rotation(&mut self) {
        if self.rotation.take().is_some() {
            log::debug!("Stopping rainbow rotation");
        }
    }
}

/// Whole degrees of rotation, mapped onto a palette of `len` entries.
fn rotation_shift(angle: f64, len: usize) -> usize {
    let degrees = (angle.floor() as usize) % WHEEL_SIZE;
    degrees * len / WHEEL_SIZE
}

fn crosshair(container: Size, color: Srgba<f64>) -> [DrawCommand; 2] {
    let center = container.center();
    [
        DrawCommand::Line {
            start: Point::new(0.0, center.y),
            end: Point::new(container.width, center.y),
            width: CROSSHAIR_WIDTH,
            color,
        },
        DrawCommand::Line {
            start: Point::new(center.x, 0.0),
            end: Point::new(center.x, container.height),
            width: CROSSHAIR_WIDTH,
            color,
        },
    ]
}

fn random_color() -> Srgba<f64> {
    let rgb = rand::random::<u32>();
    Srgba::<u8>::new((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8, u8::MAX).into_format()
}
