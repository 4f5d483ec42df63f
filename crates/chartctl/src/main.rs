use clap::{Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::os::unix::net::UnixStream;

const SOCKET_PATH: &str = "/tmp/circlechart.sock";
const DEFAULT_DURATION_MS: u64 = 1500;

#[derive(Parser, Debug)]
#[command(name = "chartctl", version, about = "Control a running circlechart window", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Animate the chart to a new value.
    Progress {
        #[arg(allow_negative_numbers = true)]
        current: f64,
        /// Must be greater than zero
        #[arg(allow_negative_numbers = true)]
        max: f64,
    },
    /// Change the rainbow arc.
    Rainbow {
        #[arg(value_enum)]
        mode: RainbowMode,
        /// Milliseconds per full turn (rotating modes only)
        #[arg(short, long)]
        duration: Option<u64>,
        #[arg(short, long, value_enum)]
        palette: Option<PaletteName>,
    },
    /// Show or hide the debug crosshair.
    Debug {
        #[arg(value_enum)]
        state: Switch,
    },
    /// Re-read the config file.
    Reload,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum RainbowMode {
    Off,
    Static,
    #[value(alias = "cw")]
    Clockwise,
    #[value(alias = "ccw")]
    CounterClockwise,
}

/// Color palette the rainbow draws with.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum PaletteName {
    #[value(alias = "wheel")]
    Hsl,
    #[value(alias = "rgb", alias = "sine")]
    LegacyRgb,
}

impl PaletteName {
    fn as_str(self) -> &'static str {
        match self {
            PaletteName::Hsl => "hsl",
            PaletteName::LegacyRgb => "legacy-rgb",
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Switch {
    On,
    Off,
}

impl Commands {
    /// The single line understood by the circlechart socket.
    fn to_line(&self) -> anyhow::Result<String> {
        let line = match self {
            Commands::Progress { current, max } => {
                anyhow::ensure!(
                    max.is_finite() && *max > 0.0,
                    "max must be greater than zero, got {}",
                    max
                );
                anyhow::ensure!(current.is_finite(), "current must be finite");
                format!("progress {} {}", current, max)
            }
            Commands::Rainbow {
                mode,
                duration,
                palette,
            } => {
                let mut words = vec!["rainbow".to_string()];
                match mode {
                    RainbowMode::Off => {
                        anyhow::ensure!(
                            duration.is_none() && palette.is_none(),
                            "'rainbow off' takes no options"
                        );
                        words.push("off".into());
                    }
                    RainbowMode::Static => {
                        anyhow::ensure!(duration.is_none(), "a static rainbow has no duration");
                        words.push("static".into());
                        words.extend(palette.map(|p| p.as_str().to_string()));
                    }
                    RainbowMode::Clockwise | RainbowMode::CounterClockwise => {
                        words.push(
                            if *mode == RainbowMode::Clockwise {
                                "clockwise"
                            } else {
                                "counter-clockwise"
                            }
                            .into(),
                        );
                        // the palette is positional after the duration
                        if duration.is_some() || palette.is_some() {
                            words.push(duration.unwrap_or(DEFAULT_DURATION_MS).to_string());
                        }
                        words.extend(palette.map(|p| p.as_str().to_string()));
                    }
                }
                words.join(" ")
            }
            Commands::Debug { state } => match state {
                Switch::On => "debug on".into(),
                Switch::Off => "debug off".into(),
            },
            Commands::Reload => "reload".into(),
        };
        Ok(line)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let line = cli.command.to_line()?;
    log::debug!("Sending {:?}", line);
    send_command(&line)
}

fn send_command(cmd: &str) -> anyhow::Result<()> {
    let mut stream = UnixStream::connect(SOCKET_PATH).map_err(|e| {
        anyhow::anyhow!(
            "Failed to connect to circlechart at {}: {}. Is circlechart running?",
            SOCKET_PATH,
            e
        )
    })?;

    writeln!(stream, "{}", cmd)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(args: &[&str]) -> anyhow::Result<String> {
        let cli = Cli::try_parse_from(std::iter::once("chartctl").chain(args.iter().copied()))?;
        cli.command.to_line()
    }

    #[test]
    fn test_lines() {
        let cases = vec![
            (vec!["progress", "196", "300"], "progress 196 300"),
            (vec!["progress", "2.5", "10"], "progress 2.5 10"),
            (vec!["rainbow", "off"], "rainbow off"),
            (vec!["rainbow", "static"], "rainbow static"),
            (
                vec!["rainbow", "static", "--palette", "legacy-rgb"],
                "rainbow static legacy-rgb",
            ),
            (vec!["rainbow", "cw"], "rainbow clockwise"),
            (
                vec!["rainbow", "counter-clockwise", "-d", "3000"],
                "rainbow counter-clockwise 3000",
            ),
            (
                vec!["rainbow", "clockwise", "-p", "hsl"],
                "rainbow clockwise 1500 hsl",
            ),
            (vec!["progress", "-5", "10"], "progress -5 10"),
            (
                vec!["rainbow", "ccw", "-p", "rgb"],
                "rainbow counter-clockwise 1500 legacy-rgb",
            ),
            (vec!["debug", "on"], "debug on"),
            (vec!["reload"], "reload"),
        ];

        for (args, expected) in cases {
            assert_eq!(line(&args).unwrap(), expected, "{args:?}");
        }
    }

    #[test]
    fn test_rejects_invalid() {
        for args in [
            vec!["progress", "1", "0"],
            vec!["progress", "1", "-5"],
            vec!["rainbow", "off", "-d", "10"],
            vec!["rainbow", "static", "-d", "10"],
            vec!["rainbow", "sideways"],
            vec!["rainbow", "cw", "-p", "plaid"],
            vec!["rainbow", "static", "--palette", "plaid"],
            vec!["debug", "maybe"],
        ] {
            assert!(line(&args).is_err(), "{args:?}");
        }
    }
}
