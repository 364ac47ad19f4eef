//! Counters for the manager loop, logged as periodic snapshots.

use std::time::Duration;

use serde_json::json;

use crate::logging::{LogEvent, LogFields, LogLevel};

#[derive(Debug, Default, Clone)]
pub struct ManagerMetrics {
    keys: u64,
    commands: u64,
    renders: u64,
    alerts: u64,
    resizes: u64,
}

impl ManagerMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_key(&mut self) {
        self.keys = self.keys.saturating_add(1);
    }

    pub fn record_command(&mut self) {
        self.commands = self.commands.saturating_add(1);
    }

    pub fn record_render(&mut self) {
        self.renders = self.renders.saturating_add(1);
    }

    pub fn record_alert(&mut self) {
        self.alerts = self.alerts.saturating_add(1);
    }

    pub fn record_resize(&mut self) {
        self.resizes = self.resizes.saturating_add(1);
    }

    pub fn snapshot(&self, uptime: Duration) -> MetricSnapshot {
        MetricSnapshot {
            uptime_ms: uptime.as_millis() as u64,
            keys: self.keys,
            commands: self.commands,
            renders: self.renders,
            alerts: self.alerts,
            resizes: self.resizes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub uptime_ms: u64,
    pub keys: u64,
    pub commands: u64,
    pub renders: u64,
    pub alerts: u64,
    pub resizes: u64,
}

impl MetricSnapshot {
    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("uptime_ms".to_string(), json!(self.uptime_ms));
        map.insert("keys".to_string(), json!(self.keys));
        map.insert("commands".to_string(), json!(self.commands));
        map.insert("renders".to_string(), json!(self.renders));
        map.insert("alerts".to_string(), json!(self.alerts));
        map.insert("resizes".to_string(), json!(self.resizes));
        map
    }

    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "manager_metrics", self.as_fields())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reports_counters() {
        let mut metrics = ManagerMetrics::new();
        metrics.record_key();
        metrics.record_key();
        metrics.record_command();
        metrics.record_alert();
        let snapshot = metrics.snapshot(Duration::from_millis(1500));
        assert_eq!(snapshot.keys, 2);
        assert_eq!(snapshot.commands, 1);
        assert_eq!(snapshot.renders, 0);

        let event = snapshot.to_log_event("room_panels::manager.metrics");
        assert_eq!(event.message, "manager_metrics");
        assert_eq!(event.field("uptime_ms"), Some(&json!(1500)));
        assert_eq!(event.field("alerts"), Some(&json!(1)));
    }
}
