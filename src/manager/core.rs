use std::cell::Cell;
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use serde_json::Value;

use crate::error::{PanelError, Result};
use crate::geometry::Size;
use crate::layout::{Align, PanelLayout};
use crate::logging::{LogLevel, event_with_fields, json_kv, json_str};
use crate::messages::{Command, Payload, Response};
use crate::metrics::ManagerMetrics;
use crate::panel::{Dialog, KeyOutcome, MenuOption, Panel};
use crate::registry::PanelStore;
use crate::render::{Decor, FrameKind, PanelRenderer};
use crate::terminal::{InputEvent, Key, Terminal, TerminalSession};

use super::config::ManagerConfig;
use super::dispatch::DispatchTable;

const LOG_TARGET: &str = "room_panels::manager";

pub const INTERRUPT_REASON: &str = "keyboard interrupt";
pub const DISCONNECT_REASON: &str = "controller disconnected";

/// Share of the screen width used by dialogs built from `Alert` commands.
const ALERT_WIDTH: f64 = 0.6;
const ALERT_HEIGHT: f64 = 0.5;

thread_local! {
    static CONTAINING: Cell<bool> = const { Cell::new(false) };
}

/// Wrap the process panic hook once so panics raised inside [`contain`]
/// stay off stderr, where they would land on top of the alternate screen.
/// Every other panic still reaches the previous hook.
fn install_quiet_hook() {
    static HOOK: OnceLock<()> = OnceLock::new();
    HOOK.get_or_init(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !CONTAINING.with(Cell::get) {
                previous(info);
            }
        }));
    });
}

/// Run `f`, turning a panic into [`PanelError::Panicked`].
fn contain<T>(f: impl FnOnce() -> Result<T>) -> Result<T> {
    install_quiet_hook();
    let outer = CONTAINING.with(|flag| flag.replace(true));
    let caught = panic::catch_unwind(AssertUnwindSafe(f));
    CONTAINING.with(|flag| flag.set(outer));

    match caught {
        Ok(result) => result,
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|text| text.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(PanelError::Panicked(message))
        }
    }
}

/// State and algorithm shared by the queued and sync runtimes.
///
/// Each call to [`Manager::step`] is one loop iteration: read at most one
/// input event, hand it to the active panel, apply at most one command,
/// repaint if anything changed. Responses accumulate until drained.
pub struct Manager {
    store: PanelStore,
    active: Option<String>,
    history: VecDeque<String>,
    session: TerminalSession,
    renderer: PanelRenderer,
    dispatch: DispatchTable,
    config: ManagerConfig,
    screen: Size,
    pending: VecDeque<Response>,
    needs_paint: bool,
    idle: bool,
    ended: bool,
    start_instant: Instant,
    last_metrics_emit: Option<Instant>,
}

impl Manager {
    /// Take over `terminal` and activate the optional initial panel. The
    /// initial panel is shown without emitting responses.
    pub fn new(
        initial: Option<(String, Box<dyn Panel>)>,
        dispatch: DispatchTable,
        terminal: Box<dyn Terminal>,
        config: ManagerConfig,
    ) -> Result<Self> {
        let mut session = TerminalSession::open(terminal)?;
        let screen = session.terminal().size()?;

        let mut manager = Self {
            store: PanelStore::new(),
            active: None,
            history: VecDeque::with_capacity(config.history_limit.min(16)),
            session,
            renderer: PanelRenderer::new(),
            dispatch,
            config,
            screen,
            pending: VecDeque::new(),
            needs_paint: true,
            idle: true,
            ended: false,
            start_instant: Instant::now(),
            last_metrics_emit: None,
        };

        if let Some((key, mut panel)) = initial {
            panel.resize(screen.to_rect());
            manager.store.store(key.clone(), panel);
            manager.active = Some(key);
        }

        manager.log(
            LogLevel::Info,
            "manager_started",
            [
                json_kv("width", screen.width),
                json_kv("height", screen.height),
                json_kv("initial", manager.active.clone()),
            ],
        );
        Ok(manager)
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn active_key(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn stored_keys(&self) -> Vec<String> {
        self.store.keys()
    }

    pub fn history(&self) -> impl Iterator<Item = &str> {
        self.history.iter().map(String::as_str)
    }

    pub fn screen(&self) -> Size {
        self.screen
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// True when the last iteration saw neither input nor a command.
    pub fn was_idle(&self) -> bool {
        self.idle
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Take every response generated so far, oldest first.
    pub fn drain_responses(&mut self) -> impl Iterator<Item = Response> + '_ {
        self.pending.drain(..)
    }

    pub fn pop_response(&mut self) -> Option<Response> {
        self.pending.pop_front()
    }

    /// One loop iteration. Input is polled for at most `poll_interval`, or
    /// not waited on at all when `command` is present. Returns `false` once
    /// the manager has ended.
    pub fn step(&mut self, command: Option<Command>) -> bool {
        let timeout = if command.is_some() {
            Duration::ZERO
        } else {
            self.config.poll_interval
        };
        self.step_with_timeout(command, timeout)
    }

    pub fn step_with_timeout(&mut self, command: Option<Command>, timeout: Duration) -> bool {
        if self.ended {
            return false;
        }

        let event = self.session.terminal().read_event(timeout);
        self.idle = command.is_none() && matches!(event, Ok(None));
        match event {
            Ok(Some(InputEvent::Key(key))) => self.handle_key(key),
            Ok(Some(InputEvent::Resize(size))) => self.handle_resize(size),
            Ok(None) => {}
            Err(err) => self.fail(err, None),
        }

        if let Some(command) = command {
            if !self.ended {
                self.handle_command(command);
            }
        }

        if !self.ended {
            if let Err(err) = self.paint() {
                self.fail(err, None);
            }
        }

        self.maybe_emit_metrics();
        if self.ended {
            self.shutdown();
        }
        !self.ended
    }

    /// End the manager as if `End` had been received.
    pub fn end(&mut self, reason: Option<String>) {
        if self.ended {
            return;
        }
        self.ended = true;
        self.log(
            LogLevel::Info,
            "manager_stopped",
            [json_kv("reason", reason.clone())],
        );
        self.pending.push_back(Response::Ending { reason });
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if !self.session.is_open() {
            return;
        }
        if let Err(err) = self.session.close() {
            self.log(
                LogLevel::Warn,
                "terminal_release_failed",
                [json_str("error", err.to_string())],
            );
        }
    }

    fn handle_key(&mut self, key: Key) {
        self.record_metric(ManagerMetrics::record_key);

        if key == Key::INTERRUPT && self.config.interrupt_on_ctrl_c {
            self.end(Some(INTERRUPT_REASON.to_string()));
            return;
        }

        let Some(active) = self.active.clone() else {
            return;
        };
        let Some(panel) = self.store.get_mut(&active) else {
            return;
        };

        match contain(|| panel.handle_key(key)) {
            Ok(KeyOutcome::Ignored) => {}
            Ok(KeyOutcome::Handled) => self.needs_paint = true,
            Ok(KeyOutcome::Emit(value)) => {
                self.needs_paint = true;
                self.pending.push_back(Response::Data { key: active, value });
            }
            Err(err) => self.fail(err, Some(&active)),
        }
    }

    fn handle_resize(&mut self, size: Size) {
        self.record_metric(ManagerMetrics::record_resize);
        self.screen = size;
        if let Some(panel) = self.active.as_deref().and_then(|key| self.store.get_mut(key)) {
            panel.resize(size.to_rect());
        }
        self.renderer.invalidate();
        self.needs_paint = true;
        self.log(
            LogLevel::Debug,
            "resized",
            [json_kv("width", size.width), json_kv("height", size.height)],
        );
    }

    fn handle_command(&mut self, command: Command) {
        self.record_metric(ManagerMetrics::record_command);
        let kind = command.kind();

        match contain(|| Ok(self.dispatch.proceed(&command))) {
            Ok(true) => {}
            Ok(false) => {
                self.log(
                    LogLevel::Debug,
                    "command_suppressed",
                    [json_str("kind", kind.as_str())],
                );
                return;
            }
            Err(err) => {
                self.fail(err, command.key());
                return;
            }
        }

        self.log(
            LogLevel::Debug,
            "command_handled",
            [
                json_str("kind", kind.as_str()),
                json_kv("key", command.key().map(str::to_string)),
            ],
        );

        match command {
            Command::Store { key, panel } => self.store_panel(key, panel),
            Command::Show { key } => self.show(key),
            Command::Dismiss { key } => self.dismiss(&key),
            Command::Delete { key } => self.delete(&key),
            Command::Data { key, payload } => self.update(key, payload),
            Command::Ping => self.pending.push_back(Response::Pong),
            Command::End { reason } => self.end(reason),
            Command::Showing => match self.active.clone() {
                Some(key) => self.push_shown(key),
                None => self.alert("Nothing shown", "no panel is active", None),
            },
            Command::Storing => {
                let keys = self.store.keys();
                self.pending.push_back(Response::Storing { keys });
            }
            Command::Alert {
                key,
                title,
                text,
                options,
            } => match build_alert(&title, text, options) {
                Ok(dialog) => {
                    self.store_panel(key.clone(), Box::new(dialog));
                    self.show(key);
                }
                Err(err) => self.fail(err, Some(&key)),
            },
        }
    }

    fn store_panel(&mut self, key: String, mut panel: Box<dyn Panel>) {
        if self.active.as_deref() == Some(key.as_str()) {
            panel.resize(self.screen.to_rect());
            self.renderer.invalidate();
            self.needs_paint = true;
        }
        if self.store.store(key.clone(), panel).is_some() {
            self.log(LogLevel::Debug, "panel_replaced", [json_str("key", key.clone())]);
        }
        self.pending.push_back(Response::Stored { key });
    }

    fn show(&mut self, key: String) {
        if !self.store.contains(&key) {
            let err = PanelError::UnknownPanel(key.clone());
            self.fail(err, Some(&key));
            return;
        }

        if let Some(previous) = self.active.take() {
            if previous != key {
                self.remember(previous);
            }
        }
        self.activate(key);
    }

    fn remember(&mut self, key: String) {
        if self.config.history_limit == 0 {
            return;
        }
        while self.history.len() >= self.config.history_limit {
            self.history.pop_front();
        }
        self.history.push_back(key);
    }

    fn activate(&mut self, key: String) {
        if let Some(panel) = self.store.get_mut(&key) {
            panel.resize(self.screen.to_rect());
            panel.core_mut().mark_dirty();
        }
        self.active = Some(key.clone());
        self.renderer.invalidate();
        self.needs_paint = true;
        self.log(
            LogLevel::Info,
            "panel_shown",
            [json_str("key", key.clone()), json_kv("history", self.history.len())],
        );
        self.pending.push_back(Response::Showing { key: key.clone() });
        self.push_shown(key);
    }

    fn push_shown(&mut self, key: String) {
        let active_keys = self
            .store
            .get(&key)
            .map(|panel| panel.active_keys())
            .unwrap_or_default();
        self.pending.push_back(Response::Shown { key, active_keys });
    }

    fn dismiss(&mut self, key: &str) {
        if self.active.as_deref() != Some(key) {
            return;
        }
        self.active = None;
        self.renderer.invalidate();
        self.needs_paint = true;

        while let Some(previous) = self.history.pop_back() {
            if previous != key && self.store.contains(&previous) {
                self.activate(previous);
                return;
            }
        }
        self.log(LogLevel::Debug, "screen_blank", [json_str("dismissed", key)]);
    }

    fn delete(&mut self, key: &str) {
        self.dismiss(key);
        self.history.retain(|previous| previous != key);
        if self.store.remove(key).is_some() {
            self.log(LogLevel::Debug, "panel_deleted", [json_str("key", key)]);
        }
    }

    fn update(&mut self, key: String, payload: Payload) {
        let panel = match self.store.require_mut(&key) {
            Ok(panel) => panel,
            Err(err) => {
                self.fail(err, Some(&key));
                return;
            }
        };
        match contain(|| panel.apply_update(payload)) {
            Ok(()) => {
                if self.active.as_deref() == Some(key.as_str()) {
                    self.needs_paint = true;
                }
            }
            Err(err) => self.fail(err, Some(&key)),
        }
    }

    /// Fatal errors end the manager; everything else becomes an `Alert`.
    fn fail(&mut self, err: PanelError, source_key: Option<&str>) {
        if err.is_fatal() {
            self.log(
                LogLevel::Error,
                "terminal_failure",
                [json_str("error", err.to_string())],
            );
            self.end(Some(err.to_string()));
            return;
        }
        let title = match &err {
            PanelError::UnknownPanel(_) => "Unknown panel",
            PanelError::InvalidUpdate { .. } => "Invalid update",
            PanelError::Panicked(_) => "Panel failure",
            _ => "Panel error",
        };
        self.alert(title, &err.to_string(), source_key);
    }

    fn alert(&mut self, title: &str, text: &str, source_key: Option<&str>) {
        self.record_metric(ManagerMetrics::record_alert);
        self.log(
            LogLevel::Warn,
            "panel_alert",
            [
                json_str("title", title),
                json_str("text", text),
                json_kv("key", source_key.map(str::to_string)),
            ],
        );
        self.pending
            .push_back(Response::alert(title, text, source_key));
    }

    fn paint(&mut self) -> Result<()> {
        let terminal = self.session.terminal();
        let Some(key) = self.active.as_deref() else {
            if self.needs_paint {
                self.needs_paint = false;
                self.renderer.draw_blank(terminal, self.screen)?;
            }
            return Ok(());
        };
        let Some(panel) = self.store.get_mut(key) else {
            return Ok(());
        };
        if !self.needs_paint && !panel.is_dirty() {
            return Ok(());
        }
        self.needs_paint = false;

        let lines = match contain(|| Ok(panel.render())) {
            Ok(lines) => lines,
            Err(err) => {
                // Keep a broken panel from failing again until it changes.
                panel.core_mut().store_lines(Vec::new());
                let key = key.to_string();
                self.fail(err, Some(&key));
                return Ok(());
            }
        };
        let painted = self
            .renderer
            .draw(terminal, self.screen, &panel.layers(), panel.decor(), &lines)?;
        if painted {
            self.record_metric(ManagerMetrics::record_render);
        }
        Ok(())
    }

    fn log<I>(&self, level: LogLevel, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        if let Some(logger) = self.config.logger.as_ref() {
            let event = event_with_fields(level, LOG_TARGET, message, fields);
            let _ = logger.log_event(event);
        }
    }

    fn record_metric(&self, record: fn(&mut ManagerMetrics)) {
        if let Some(metrics) = self.config.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                record(&mut *guard);
            }
        }
    }

    fn maybe_emit_metrics(&mut self) {
        if self.config.metrics.is_none() || self.config.metrics_interval.is_zero() {
            return;
        }

        let now = Instant::now();
        match self.last_metrics_emit {
            Some(last) if now.duration_since(last) < self.config.metrics_interval => return,
            _ => self.last_metrics_emit = Some(now),
        }

        let uptime = now.duration_since(self.start_instant);
        if let (Some(logger), Some(metrics)) =
            (self.config.logger.as_ref(), self.config.metrics.as_ref())
        {
            if let Ok(guard) = metrics.lock() {
                let event = guard
                    .snapshot(uptime)
                    .to_log_event(&self.config.metrics_target);
                let _ = logger.log_event(event);
            }
        }
    }
}

fn build_alert(title: &str, text: String, options: Vec<MenuOption>) -> Result<Dialog> {
    let dialog = if options.is_empty() {
        Dialog::new(text)
    } else {
        Dialog::with_options(text, options)?
    };
    let layout = PanelLayout::new()
        .with_relative_width(ALERT_WIDTH)?
        .with_relative_height(ALERT_HEIGHT)?;
    dialog
        .with_layout(layout)?
        .with_decor(Decor::framed(FrameKind::Light).with_title(title, Align::Center))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::{Menu, Splash};
    use crate::terminal::{ScriptedTerminal, ScriptedTerminalHandle};

    fn manager() -> (Manager, ScriptedTerminalHandle) {
        let (term, handle) = ScriptedTerminal::new(Size::new(20, 6));
        let config = ManagerConfig::default().with_poll_interval(Duration::ZERO);
        let manager = Manager::new(None, DispatchTable::new(), Box::new(term), config).unwrap();
        (manager, handle)
    }

    fn containing() -> bool {
        CONTAINING.with(Cell::get)
    }

    fn run(manager: &mut Manager, command: Command) -> Vec<Response> {
        manager.step(Some(command));
        manager.drain_responses().collect()
    }

    #[test]
    fn show_pushes_history_and_dismiss_restores() {
        let (mut manager, handle) = manager();
        run(&mut manager, Command::store("a", Splash::new("alpha")));
        run(&mut manager, Command::store("b", Splash::new("bravo")));
        run(&mut manager, Command::show("a"));
        run(&mut manager, Command::show("b"));
        assert!(handle.contains("bravo"));
        assert_eq!(manager.history().collect::<Vec<_>>(), vec!["a"]);

        let responses = run(&mut manager, Command::dismiss("b"));
        assert_eq!(responses[0], Response::Showing { key: "a".into() });
        assert_eq!(manager.active_key(), Some("a"));
        assert!(handle.contains("alpha"));

        assert!(run(&mut manager, Command::dismiss("b")).is_empty());
    }

    #[test]
    fn dismissing_last_panel_blanks_screen() {
        let (mut manager, handle) = manager();
        run(&mut manager, Command::store("a", Splash::new("alpha")));
        run(&mut manager, Command::show("a"));
        assert!(run(&mut manager, Command::dismiss("a")).is_empty());
        assert_eq!(manager.active_key(), None);
        assert!(!handle.contains("alpha"));
    }

    #[test]
    fn history_is_bounded() {
        let (term, _handle) = ScriptedTerminal::new(Size::new(10, 3));
        let config = ManagerConfig::default()
            .with_poll_interval(Duration::ZERO)
            .with_history_limit(2);
        let mut manager = Manager::new(None, DispatchTable::new(), Box::new(term), config).unwrap();
        for key in ["a", "b", "c", "d"] {
            run(&mut manager, Command::store(key, Splash::new(key)));
            run(&mut manager, Command::show(key));
        }
        assert_eq!(manager.history().collect::<Vec<_>>(), vec!["b", "c"]);
    }

    #[test]
    fn delete_active_restores_previous_and_forgets_key() {
        let (mut manager, _handle) = manager();
        run(&mut manager, Command::store("a", Splash::new("alpha")));
        run(&mut manager, Command::store("b", Splash::new("bravo")));
        run(&mut manager, Command::show("a"));
        run(&mut manager, Command::show("b"));

        let responses = run(&mut manager, Command::delete("b"));
        assert_eq!(responses[0], Response::Showing { key: "a".into() });
        assert_eq!(manager.active_key(), Some("a"));
        assert_eq!(manager.stored_keys(), vec!["a"]);
        assert_eq!(manager.history().count(), 0);
        assert!(run(&mut manager, Command::delete("b")).is_empty());
    }

    #[test]
    fn showing_and_storing_queries() {
        let (mut manager, _handle) = manager();
        let responses = run(&mut manager, Command::Showing);
        assert!(responses[0].is_alert());

        run(&mut manager, Command::store("z", Splash::new("")));
        run(&mut manager, Command::store("m", Menu::new(vec![MenuOption::new("x")]).unwrap()));
        run(&mut manager, Command::show("m"));
        assert_eq!(
            run(&mut manager, Command::Storing),
            vec![Response::Storing {
                keys: vec!["m".into(), "z".into()]
            }]
        );
        match &run(&mut manager, Command::Showing)[0] {
            Response::Shown { key, active_keys } => {
                assert_eq!(key, "m");
                assert!(active_keys.contains(&Key::Enter));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn alert_command_builds_and_shows_dialog() {
        let (mut manager, handle) = manager();
        let responses = run(&mut manager, Command::alert("warn", "Careful", "Sure?"));
        assert_eq!(responses[0], Response::Stored { key: "warn".into() });
        assert_eq!(responses[1], Response::Showing { key: "warn".into() });
        assert!(handle.contains("Careful"));
        assert!(handle.contains("[Yes] [No]"));
    }

    #[test]
    fn end_releases_terminal() {
        let (mut manager, handle) = manager();
        let responses = run(&mut manager, Command::end("done"));
        assert_eq!(
            responses,
            vec![Response::Ending {
                reason: Some("done".into())
            }]
        );
        assert!(!handle.is_raw());
        assert!(!manager.step(None));
    }

    #[test]
    fn contained_panics_are_reported_and_flag_is_restored() {
        let result: Result<()> = contain(|| {
            assert!(containing());
            panic!("boom");
        });
        assert!(matches!(result, Err(PanelError::Panicked(message)) if message == "boom"));
        assert!(!containing());

        let nested: Result<u8> = contain(|| {
            let inner: Result<u8> = contain(|| panic!("inner"));
            assert!(inner.is_err());
            assert!(containing());
            Ok(7)
        });
        assert_eq!(nested.unwrap(), 7);
        assert!(!containing());
    }

    #[test]
    fn metrics_are_counted_and_logged() {
        use crate::logging::{Logger, MemorySink};
        use serde_json::json;

        let sink = MemorySink::new();
        let mut config = ManagerConfig::default()
            .with_poll_interval(Duration::ZERO)
            .with_logger(Logger::new(sink.clone()));
        config.enable_metrics();
        config.metrics_interval = Duration::from_millis(1);
        let metrics = config.metrics_handle().unwrap();

        let (term, handle) = ScriptedTerminal::new(Size::new(20, 6));
        let mut manager = Manager::new(None, DispatchTable::new(), Box::new(term), config).unwrap();
        handle.push_keys([Key::Char('a'), Key::Char('b')]);
        handle.push_resize(Size::new(30, 6));
        run(&mut manager, Command::store("s", Splash::new("hi")));
        run(&mut manager, Command::show("s"));
        run(&mut manager, Command::show("missing"));
        manager.step(None);

        {
            let snapshot = metrics.lock().unwrap().snapshot(Duration::ZERO);
            assert_eq!(snapshot.keys, 2);
            assert_eq!(snapshot.commands, 3);
            assert_eq!(snapshot.alerts, 1);
            assert_eq!(snapshot.resizes, 1);
            assert!(snapshot.renders >= 1);
        }

        std::thread::sleep(Duration::from_millis(5));
        manager.step(None);
        let snapshots: Vec<_> = sink
            .events()
            .into_iter()
            .filter(|event| event.message == "manager_metrics")
            .collect();
        assert!(snapshots.len() >= 2);
        let last = snapshots.last().unwrap();
        assert_eq!(last.target, "room_panels::manager.metrics");
        assert_eq!(last.field("keys"), Some(&json!(2)));
        assert_eq!(last.field("commands"), Some(&json!(3)));
    }
}
