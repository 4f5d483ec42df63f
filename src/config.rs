use circlechart_core::model::{FONT_SIZE, STROKE_WIDTH, VIEW_SIZE};
use circlechart_core::{ChartError, ProgressSpec, RainbowSpec, StyleSpec};
use derive_more::{Deref, From, Into};
use directories::ProjectDirs;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use palette::rgb::FromHexError;
use palette::{Srgb, Srgba, WithAlpha};
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt;
use std::num::ParseIntError;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Color written as `#rgb`, `#rrggbb` or `#rrggbbaa`.
#[derive(
    Debug, Clone, Copy, PartialEq, Deref, From, Into, SerializeDisplay, DeserializeFromStr,
)]
pub struct HexColor(Srgba<f64>);

#[derive(Debug, Error)]
pub enum HexColorError {
    #[error("expected 3, 6 or 8 hex digits, got {0:?}")]
    Length(String),
    #[error("invalid rgb digits: {0}")]
    Rgb(#[from] FromHexError),
    #[error("invalid alpha digits: {0}")]
    Alpha(#[from] ParseIntError),
}

impl FromStr for HexColor {
    type Err = HexColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().trim_start_matches('#');
        if !digits.is_ascii() {
            return Err(HexColorError::Length(s.to_string()));
        }
        let (rgb, alpha) = match digits.len() {
            3 | 6 => (digits, u8::MAX),
            8 => (&digits[..6], u8::from_str_radix(&digits[6..], 16)?),
            _ => return Err(HexColorError::Length(s.to_string())),
        };
        let rgb = Srgb::<u8>::from_str(rgb)?;
        Ok(Self(rgb.with_alpha(alpha).into_format()))
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (r, g, b, a) = self.0.into_format::<u8, u8>().into_components();
        write!(f, "#{r:02x}{g:02x}{b:02x}{a:02x}")
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default)]
pub struct ProgressConfig {
    pub current: f64,
    pub max: f64,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            current: 0.0,
            max: 100.0,
        }
    }
}

impl ProgressConfig {
    pub fn to_spec(&self) -> Result<ProgressSpec, ChartError> {
        ProgressSpec::new(self.current, self.max)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StyleConfig {
    pub view_size: f64,
    pub background_color: Option<HexColor>,
    pub stroke_color: Option<HexColor>,
    pub stroke_width: f64,
    pub font_size: f64,
    pub font_color: Option<HexColor>,
    pub prefix: String,
    pub suffix: String,
    pub rainbow: Option<RainbowSpec>,
    pub debug: bool,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            view_size: VIEW_SIZE,
            background_color: None,
            stroke_color: None,
            stroke_width: STROKE_WIDTH,
            font_size: FONT_SIZE,
            font_color: None,
            prefix: String::new(),
            suffix: String::new(),
            rainbow: None,
            debug: false,
        }
    }
}

impl StyleConfig {
    /// Fills unset colors from `defaults`.
    pub fn to_style(&self, defaults: &StyleSpec) -> StyleSpec {
        StyleSpec {
            view_size: self.view_size,
            background_color: self
                .background_color
                .map_or(defaults.background_color, Into::into),
            stroke_color: self
                .stroke_color
                .map(Into::into)
                .or(defaults.stroke_color),
            stroke_width: self.stroke_width,
            font_size: self.font_size,
            font_color: self.font_color.map_or(defaults.font_color, Into::into),
            prefix: self.prefix.clone(),
            suffix: self.suffix.clone(),
            rainbow: self.rainbow,
            debug: self.debug,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub progress: ProgressConfig,
    #[serde(default)]
    pub style: StyleConfig,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid progress: {0}")]
    Progress(#[from] ChartError),
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs = ProjectDirs::from("org", "skyfaced", "circlechart")
        .ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

fn build<S>(file: S) -> Result<Config, ConfigError>
where
    S: config::Source + Send + Sync + 'static,
{
    let config: Config = config::Config::builder()
        .add_source(file)
        .add_source(
            config::Environment::with_prefix("CIRCLECHART")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?
        .try_deserialize()?;

    config.progress.to_spec()?;
    Ok(config)
}

pub fn load_config() -> Result<Config, ConfigError> {
    let path = get_config_path()?;
    build(config::File::from(path).required(false))
}

pub fn parse_config(toml: &str) -> Result<Config, ConfigError> {
    build(config::File::from_str(toml, config::FileFormat::Toml))
}

pub fn load_or_default() -> Config {
    load_config().unwrap_or_else(|e| {
        log::error!("Falling back to default config: {}", e);
        Config::default()
    })
}

pub fn write_default_config() -> std::io::Result<PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

pub const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

use crate::events::AppEvent;
use async_channel::Sender;

fn touches_config(event: &Event, config_path: &Path) -> bool {
    matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    ) && event.paths.iter().any(|p| p == config_path)
}

/// Sends [`AppEvent::ConfigReload`] whenever the config file changes on disk.
pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    let config_path = match get_config_path() {
        Ok(p) => p,
        Err(e) => {
            log::error!("Config watcher error: {}", e);
            return;
        }
    };
    let Some(config_dir) = config_path.parent().map(Path::to_path_buf) else {
        return;
    };

    // the file may not exist yet, so watch its directory
    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();
    let watcher = RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    )
    .and_then(|mut w| {
        w.watch(&config_dir, RecursiveMode::NonRecursive)?;
        Ok(w)
    });

    // dropping the watcher stops the event stream
    let _watcher = match watcher {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to watch {}: {}", config_dir.display(), e);
            return;
        }
    };

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) if touches_config(&event, &config_path) => {
                if tx.send(AppEvent::ConfigReload).await.is_err() {
                    break;
                }
            }
            Ok(_) => {}
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use circlechart_core::{Palette, Rotation};
    use notify::event::{AccessKind, CreateKind, ModifyKind};

    #[test]
    fn test_hex_color_deserialization() {
        let cases = vec![
            ("\"#ff0000\"", (255, 0, 0, 255)),
            ("\"00ff00\"", (0, 255, 0, 255)),
            ("\"#00f\"", (0, 0, 255, 255)),
            ("\"#cccccc40\"", (204, 204, 204, 64)),
        ];

        for (json, expected) in cases {
            let color: HexColor = serde_json::from_str(json).unwrap();
            assert_eq!(color.into_format::<u8, u8>().into_components(), expected);
        }
    }

    #[test]
    fn test_hex_color_rejects_garbage() {
        for input in ["", "#12345", "#gggggg", "#ffffffzz", "#aéééb", "ffffé"] {
            assert!(HexColor::from_str(input).is_err(), "{input:?}");
        }
    }

    #[test]
    fn test_hex_color_display() {
        let color = HexColor::from_str("#CCCCCC40").unwrap();
        assert_eq!(color.to_string(), "#cccccc40");
    }

    #[test]
    fn test_default_config_parses() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.progress.current, 196.0);
        assert_eq!(config.progress.max, 300.0);
        assert_eq!(config.style.view_size, 150.0);

        let rainbow = config.style.rainbow.unwrap();
        assert!(rainbow.animate);
        assert_eq!(rainbow.rotation, Rotation::Clockwise);
        assert_eq!(rainbow.duration_ms, 1500);
        assert_eq!(rainbow.palette, Palette::Hsl);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.progress.max, 100.0);
        assert_eq!(config.style.stroke_width, STROKE_WIDTH);
        assert!(config.style.rainbow.is_none());
    }

    #[test]
    fn test_zero_max_is_rejected() {
        let result = parse_config("[progress]\ncurrent = 1\nmax = 0\n");
        assert!(matches!(
            result,
            Err(ConfigError::Progress(ChartError::InvalidMaxProgress(_)))
        ));
    }

    #[test]
    fn test_style_falls_back_to_defaults() {
        let config = parse_config("[style]\nfont_color = \"#ff0000\"\nprefix = \"$\"\n").unwrap();
        let defaults = StyleSpec::default();
        let style = config.style.to_style(&defaults);

        assert_eq!(style.font_color, Srgba::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(style.stroke_color, defaults.stroke_color);
        assert_eq!(style.background_color, defaults.background_color);
        assert_eq!(style.prefix, "$");
    }

    #[test]
    fn test_only_config_file_changes_trigger_reload() {
        let config_path = PathBuf::from("/tmp/circlechart/config.toml");
        let modify = Event::new(EventKind::Modify(ModifyKind::Any)).add_path(config_path.clone());
        let create = Event::new(EventKind::Create(CreateKind::File)).add_path(config_path.clone());
        let other = Event::new(EventKind::Modify(ModifyKind::Any))
            .add_path(PathBuf::from("/tmp/circlechart/other.toml"));
        let access = Event::new(EventKind::Access(AccessKind::Any)).add_path(config_path.clone());

        assert!(touches_config(&modify, &config_path));
        assert!(touches_config(&create, &config_path));
        assert!(!touches_config(&other, &config_path));
        assert!(!touches_config(&access, &config_path));
    }
}
