use thiserror::Error;

use crate::terminal::Key;

/// Unified result type for the crate.
pub type Result<T> = std::result::Result<T, PanelError>;

/// Errors surfaced by panels, the geometry configuration and the manager.
#[derive(Debug, Error)]
pub enum PanelError {
    #[error("invalid configuration: {0}")]
    Configuration(#[from] ConfigError),
    #[error("panel `{kind}` rejected update: {reason}")]
    InvalidUpdate { kind: &'static str, reason: String },
    #[error("terminal capability failure: {0}")]
    Capability(String),
    #[error("panel `{0}` is not stored")]
    UnknownPanel(String),
    #[error("panel panicked: {0}")]
    Panicked(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PanelError {
    pub fn invalid_update(kind: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidUpdate {
            kind,
            reason: reason.into(),
        }
    }

    /// Terminal-level failures end the manager; everything else is reported
    /// back to the controller and the loop keeps running.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Capability(_) | Self::Io(_))
    }
}

/// Rejected declarations, raised when a panel is built or a binding added.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("relative {axis} must be within [0, 1], got {value}")]
    RelativeSizeOutOfRange { axis: &'static str, value: f64 },
    #[error("{side} padding fraction must be within [0, 1], got {value}")]
    PaddingOutOfRange { side: &'static str, value: f64 },
    #[error("{axis} padding fractions add up to {total}, more than the whole axis")]
    PaddingExceedsAxis { axis: &'static str, total: f64 },
    #[error("key {0} is already bound")]
    DuplicateBinding(Key),
    #[error("a {0} needs a frame to be drawn on")]
    TitleWithoutFrame(&'static str),
    #[error("{0} needs at least one option")]
    EmptyOptions(&'static str),
    #[error("a progress bar needs at least one step")]
    ZeroSteps,
}
