use crate::config::Config;
use crate::gui::theme::ThemeColors;
use circlechart_core::{
    ChartError, ChartRenderer, DrawCommand, ProgressSpec, RainbowSpec, Size, StyleSpec,
};
use std::time::Instant;

/// Everything the drawing area needs between frames.
#[derive(Debug, Clone)]
pub struct ChartState {
    renderer: ChartRenderer,
    pub progress: ProgressSpec,
    pub style: StyleSpec,
}

impl ChartState {
    pub fn new(progress: ProgressSpec, style: StyleSpec) -> Self {
        Self {
            renderer: ChartRenderer::new(),
            progress,
            style,
        }
    }

    pub fn from_config(config: &Config, theme: &ThemeColors) -> Self {
        let progress = config.progress.to_spec().unwrap_or_else(|e| {
            log::error!("Ignoring configured progress: {}", e);
            ProgressSpec::default()
        });
        Self::new(progress, config.style.to_style(&theme.style_defaults()))
    }

    /// Swaps in a reloaded config. The renderer is kept so values animate
    /// towards the new targets instead of jumping.
    pub fn apply_config(&mut self, config: &Config, theme: &ThemeColors) {
        match config.progress.to_spec() {
            Ok(progress) => self.progress = progress,
            Err(e) => log::error!("Ignoring configured progress: {}", e),
        }
        self.style = config.style.to_style(&theme.style_defaults());
    }

    pub fn set_progress(&mut self, progress: ProgressSpec) {
        self.progress = progress;
    }

    pub fn set_rainbow(&mut self, rainbow: Option<RainbowSpec>) {
        self.style.rainbow = rainbow;
    }

    pub fn set_debug(&mut self, debug: bool) {
        self.style.debug = debug;
    }

    pub fn toggle_debug(&mut self) -> bool {
        self.style.debug = !self.style.debug;
        self.style.debug
    }

    pub fn frame(
        &mut self,
        container: Size,
        now: Instant,
    ) -> Result<Vec<DrawCommand>, ChartError> {
        self.renderer
            .render(&self.progress, &self.style, container, now)
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        self.renderer.is_animating(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use circlechart_core::Rotation;
    use std::time::Duration;

    fn state(toml: &str) -> ChartState {
        ChartState::from_config(&parse_config(toml).unwrap(), &ThemeColors::default())
    }

    #[test]
    fn test_from_config() {
        let state = state("[progress]\ncurrent = 42\nmax = 84\n[style]\nsuffix = \"%\"\n");
        assert_eq!(state.progress, ProgressSpec::new(42.0, 84.0).unwrap());
        assert_eq!(state.style.suffix, "%");
        assert_eq!(state.style.stroke_color, Some(ThemeColors::default().stroke));
    }

    #[test]
    fn test_frame_settles() {
        let mut state = state("[progress]\ncurrent = 50\nmax = 100\n");
        let t0 = Instant::now();

        let commands = state.frame(Size::square(150.0), t0).unwrap();
        assert_eq!(commands.len(), 3);
        assert!(!state.is_animating(t0));

        state.set_progress(ProgressSpec::new(75.0, 100.0).unwrap());
        state.frame(Size::square(150.0), t0).unwrap();
        assert!(state.is_animating(t0 + Duration::from_millis(100)));
        assert!(!state.is_animating(t0 + Duration::from_secs(1)));
    }

    #[test]
    fn test_rainbow_keeps_animating() {
        let mut state = state("");
        state.set_rainbow(Some(RainbowSpec::rotating(Rotation::Clockwise)));
        let t0 = Instant::now();
        state.frame(Size::square(150.0), t0).unwrap();
        assert!(state.is_animating(t0 + Duration::from_secs(10)));

        state.set_rainbow(None);
        state.frame(Size::square(150.0), t0).unwrap();
        assert!(!state.is_animating(t0 + Duration::from_secs(10)));
    }

    #[test]
    fn test_toggle_debug_adds_crosshair() {
        let mut state = state("");
        assert!(state.toggle_debug());
        let commands = state.frame(Size::square(150.0), Instant::now()).unwrap();
        assert_eq!(
            commands
                .iter()
                .filter(|c| matches!(c, DrawCommand::Line { .. }))
                .count(),
            2
        );
        assert!(!state.toggle_debug());
    }

    #[test]
    fn test_bad_reload_keeps_progress() {
        let mut state = state("[progress]\ncurrent = 3\nmax = 4\n");
        let mut config = Config::default();
        config.progress.max = 0.0;
        config.style.prefix = "#".into();
        state.apply_config(&config, &ThemeColors::default());

        assert_eq!(state.progress, ProgressSpec::new(3.0, 4.0).unwrap());
        assert_eq!(state.style.prefix, "#");
    }
}
