//! Error types shared across the crate.
//!
//! Every fallible operation returns [`Result`]. Geometry never fails; it
//! clamps instead, so the variants here cover configuration, panel updates,
//! protocol misuse and the terminal backend.

mod types;

pub use types::{ConfigError, PanelError, Result};
