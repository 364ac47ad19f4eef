//! Terminal panel manager.
//!
//! A controller builds [`Panel`]s (splash, progress, log, menu, dialogs,
//! text views), hands them to a manager with [`Command`]s and reads back
//! [`Response`]s. The manager owns the terminal: it routes keys to the
//! active panel, repaints it when it changes and reports panel output,
//! failures and lifecycle events.
//!
//! Geometry is declarative. Each panel resolves to four nested rectangles
//! (see [`layout`]) recomputed whenever the screen size changes.

pub mod error;
pub mod geometry;
pub mod layout;
pub mod logging;
pub mod manager;
pub mod messages;
pub mod metrics;
pub mod panel;
pub mod registry;
pub mod render;
pub mod terminal;
pub mod width;

pub use error::{ConfigError, PanelError, Result};
pub use geometry::{Rect, Size};
pub use layout::{Align, Alignment, Extent, Layers, Pad, Padding, PanelLayout, RelativeSize};
pub use logging::{
    FileSink, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult,
    MemorySink, NullSink,
};
pub use manager::{
    DispatchTable, Manager, ManagerBuilder, ManagerConfig, QueuedManager, SyncManager,
    spawn_queued, sync_manager,
};
pub use messages::{Command, CommandKind, Payload, Response};
pub use metrics::{ManagerMetrics, MetricSnapshot};
pub use panel::{
    Dialog, KeyBindings, KeyOutcome, Log, Menu, MenuOption, Panel, PanelCore, Progress, Splash,
    TextDialog, TextView,
};
pub use registry::PanelStore;
pub use render::{Decor, FrameKind, PanelRenderer, Span, Style, StyledLine};
pub use terminal::{
    CrosstermTerminal, InputEvent, Key, ScriptedTerminal, ScriptedTerminalHandle, Terminal,
    TerminalSession,
};
pub use width::display_width;
