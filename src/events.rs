use circlechart_core::{ProgressSpec, RainbowSpec};

/// Everything the background services can ask of the GUI thread.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    Progress(ProgressSpec),
    Rainbow(Option<RainbowSpec>),
    Debug(bool),
    ConfigReload,
}
