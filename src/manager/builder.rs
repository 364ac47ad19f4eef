use crate::error::Result;
use crate::messages::{Command, CommandKind};
use crate::panel::Panel;
use crate::terminal::Terminal;

use super::config::ManagerConfig;
use super::dispatch::DispatchTable;
use super::queued::{QueuedManager, spawn_queued};
use super::sync::{SyncManager, sync_manager};

/// Fluent setup for either runtime flavour.
#[derive(Default)]
pub struct ManagerBuilder {
    initial: Option<(String, Box<dyn Panel>)>,
    dispatch: DispatchTable,
    config: ManagerConfig,
}

impl ManagerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Panel shown when the manager starts.
    pub fn initial(mut self, key: impl Into<String>, panel: impl Panel + 'static) -> Self {
        self.initial = Some((key.into(), Box::new(panel)));
        self
    }

    pub fn on<F>(mut self, kind: CommandKind, handler: F) -> Self
    where
        F: FnMut(&Command) -> bool + Send + 'static,
    {
        self.dispatch.insert(kind, handler);
        self
    }

    pub fn config(mut self, config: ManagerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn spawn(self, terminal: impl Terminal + 'static) -> Result<QueuedManager> {
        spawn_queued(self.initial, self.dispatch, Box::new(terminal), self.config)
    }

    pub fn build_sync(self, terminal: impl Terminal + 'static) -> Result<SyncManager> {
        sync_manager(self.initial, self.dispatch, Box::new(terminal), self.config)
    }
}

impl std::fmt::Debug for ManagerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManagerBuilder")
            .field("initial", &self.initial.as_ref().map(|(key, _)| key))
            .field("dispatch", &self.dispatch)
            .field("config", &self.config)
            .finish()
    }
}
