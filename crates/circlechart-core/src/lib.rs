//! Rendering engine for an animated donut progress chart.
//!
//! [`ChartRenderer`] is the entry point: feed it a [`ProgressSpec`], a
//! [`StyleSpec`], the container size and the current time once per frame and
//! paint the returned [`DrawCommand`]s with whatever backend the host uses.

pub mod anim;
pub mod color;
pub mod draw;
pub mod error;
pub mod layout;
pub mod model;
pub mod render;

pub use color::{ColorWheel, Palette};
pub use draw::{Brush, DrawCommand, LineCap, LineJoin, TextAlign};
pub use error::ChartError;
pub use layout::{ArcLayout, Point, Rect, Size};
pub use model::{ProgressSpec, RainbowSpec, Rotation, StyleSpec};
pub use render::ChartRenderer;
