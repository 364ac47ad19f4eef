//! Manager runtime.
//!
//! [`Manager`] holds the panel store, the active key and its history, and the
//! terminal session. It is driven one iteration at a time, either from a
//! dedicated thread fed by channels ([`spawn_queued`]) or from the caller's
//! thread as an iterator of responses ([`sync_manager`]).

mod builder;
mod config;
mod core;
mod dispatch;
mod queued;
mod sync;

pub use self::core::{DISCONNECT_REASON, INTERRUPT_REASON, Manager};
pub use builder::ManagerBuilder;
pub use config::{DEFAULT_HISTORY_LIMIT, DEFAULT_POLL_INTERVAL, ManagerConfig};
pub use dispatch::{CommandHandler, DispatchTable};
pub use queued::{QueuedManager, spawn_queued};
pub use sync::{SyncManager, sync_manager};
