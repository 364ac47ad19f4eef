use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::logging::Logger;
use crate::metrics::ManagerMetrics;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Configuration knobs for the manager loop.
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    /// Longest wait for terminal input when no command is pending.
    pub poll_interval: Duration,
    /// How many previously shown keys `Dismiss` can walk back through.
    pub history_limit: usize,
    /// Optional structured logger used by the manager.
    pub logger: Option<Logger>,
    /// Metrics accumulator used for periodic snapshots.
    pub metrics: Option<Arc<Mutex<ManagerMetrics>>>,
    /// Interval between metrics snapshot emissions. Zero disables snapshots.
    pub metrics_interval: Duration,
    /// Target field used when emitting metrics snapshots.
    pub metrics_target: String,
    /// End the manager on Ctrl-C.
    pub interrupt_on_ctrl_c: bool,
    /// Name of the thread running a queued manager.
    pub thread_name: String,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            history_limit: DEFAULT_HISTORY_LIMIT,
            logger: None,
            metrics: None,
            metrics_interval: Duration::from_secs(5),
            metrics_target: "room_panels::manager.metrics".to_string(),
            interrupt_on_ctrl_c: true,
            thread_name: "room-panels-manager".to_string(),
        }
    }
}

impl ManagerConfig {
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(ManagerMetrics::new())));
        }
    }

    /// Disable metrics collection and prevent further snapshots.
    pub fn disable_metrics(&mut self) {
        self.metrics = None;
    }

    /// Access the shared metrics handle if metrics are enabled.
    pub fn metrics_handle(&self) -> Option<Arc<Mutex<ManagerMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ManagerConfig::default();
        assert_eq!(config.poll_interval, Duration::from_millis(50));
        assert_eq!(config.history_limit, 100);
        assert!(config.interrupt_on_ctrl_c);
        assert!(config.metrics_handle().is_none());
    }

    #[test]
    fn enable_metrics_keeps_existing_handle() {
        let mut config = ManagerConfig::default();
        config.enable_metrics();
        let first = config.metrics_handle().unwrap();
        config.enable_metrics();
        assert!(Arc::ptr_eq(&first, &config.metrics_handle().unwrap()));
        config.disable_metrics();
        assert!(config.metrics.is_none());
    }
}
