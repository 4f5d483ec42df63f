use circlechart_core::StyleSpec;
use circlechart_core::model::{BACKGROUND_COLOR, FONT_COLOR, STROKE_COLOR};
use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::Srgba;

/// Colors used wherever the config leaves one unset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemeColors {
    pub ring: Srgba<f64>,
    pub stroke: Srgba<f64>,
    pub font: Srgba<f64>,
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            ring: BACKGROUND_COLOR,
            stroke: STROKE_COLOR,
            font: FONT_COLOR,
        }
    }
}

impl ThemeColors {
    pub fn from_context(context: &gtk::StyleContext) -> Self {
        Self {
            ring: Self::lookup_color(context, "theme_fg_color", BACKGROUND_COLOR, Some(0.25)),
            stroke: Self::lookup_color(context, "theme_selected_bg_color", STROKE_COLOR, None),
            font: Self::lookup_color(context, "theme_fg_color", FONT_COLOR, None),
        }
    }

    fn lookup_color(
        context: &gtk::StyleContext,
        name: &str,
        fallback: Srgba<f64>,
        alpha_override: Option<f64>,
    ) -> Srgba<f64> {
        context
            .lookup_color(name)
            .map(|c| {
                let (r, g, b, a) = (
                    c.red() as f64,
                    c.green() as f64,
                    c.blue() as f64,
                    c.alpha() as f64,
                );
                Srgba::new(r, g, b, alpha_override.unwrap_or(a))
            })
            .unwrap_or(fallback)
    }

    pub fn style_defaults(&self) -> StyleSpec {
        StyleSpec {
            background_color: self.ring,
            stroke_color: Some(self.stroke),
            font_color: self.font,
            ..StyleSpec::default()
        }
    }
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    let css_data = "
.circlechart-window, .circlechart-drawing-area {
    background: none;
    background-color: transparent;
}
";
    provider.load_from_data(css_data);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_feed_style() {
        let theme = ThemeColors {
            ring: Srgba::new(0.1, 0.2, 0.3, 0.25),
            stroke: Srgba::new(0.4, 0.5, 0.6, 1.0),
            font: Srgba::new(0.7, 0.8, 0.9, 1.0),
        };
        let style = theme.style_defaults();

        assert_eq!(style.background_color, theme.ring);
        assert_eq!(style.stroke_color, Some(theme.stroke));
        assert_eq!(style.font_color, theme.font);
        assert_eq!(style.view_size, StyleSpec::default().view_size);
    }
}
