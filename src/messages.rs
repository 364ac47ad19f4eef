//! Typed messages exchanged between a controller and the manager.
//!
//! Commands flow in, responses flow out, both in FIFO order. Panels travel
//! inside [`Command::Store`] as boxed trait objects, so commands are not
//! serializable; responses and payloads are, which keeps them easy to log.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::panel::{MenuOption, Panel};
use crate::terminal::Key;

/// Content update for a stored panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Payload {
    /// Replace the panel's text.
    Text(String),
    /// Add one line, as for a log.
    Line(String),
    /// Advance by one step.
    Tick,
    /// Jump to an absolute step.
    Set(u64),
    /// Free-form value for panels with richer state.
    Value(serde_json::Value),
}

impl Payload {
    pub fn name(&self) -> &'static str {
        match self {
            Payload::Text(_) => "text",
            Payload::Line(_) => "line",
            Payload::Tick => "tick",
            Payload::Set(_) => "set",
            Payload::Value(_) => "value",
        }
    }
}

/// Instruction from the controller.
pub enum Command {
    Show {
        key: String,
    },
    Store {
        key: String,
        panel: Box<dyn Panel>,
    },
    Delete {
        key: String,
    },
    Dismiss {
        key: String,
    },
    Data {
        key: String,
        payload: Payload,
    },
    Ping,
    End {
        reason: Option<String>,
    },
    /// Ask which panel is active.
    Showing,
    /// Ask which keys are stored.
    Storing,
    /// Build a modal dialog, store it under `key` and show it.
    Alert {
        key: String,
        title: String,
        text: String,
        options: Vec<MenuOption>,
    },
}

impl Command {
    pub fn show(key: impl Into<String>) -> Self {
        Command::Show { key: key.into() }
    }

    pub fn store(key: impl Into<String>, panel: impl Panel + 'static) -> Self {
        Command::Store {
            key: key.into(),
            panel: Box::new(panel),
        }
    }

    pub fn delete(key: impl Into<String>) -> Self {
        Command::Delete { key: key.into() }
    }

    pub fn dismiss(key: impl Into<String>) -> Self {
        Command::Dismiss { key: key.into() }
    }

    pub fn data(key: impl Into<String>, payload: Payload) -> Self {
        Command::Data {
            key: key.into(),
            payload,
        }
    }

    pub fn end(reason: impl Into<String>) -> Self {
        Command::End {
            reason: Some(reason.into()),
        }
    }

    /// Alert with the default Yes/No options.
    pub fn alert(key: impl Into<String>, title: impl Into<String>, text: impl Into<String>) -> Self {
        Command::Alert {
            key: key.into(),
            title: title.into(),
            text: text.into(),
            options: Vec::new(),
        }
    }

    pub fn kind(&self) -> CommandKind {
        match self {
            Command::Show { .. } => CommandKind::Show,
            Command::Store { .. } => CommandKind::Store,
            Command::Delete { .. } => CommandKind::Delete,
            Command::Dismiss { .. } => CommandKind::Dismiss,
            Command::Data { .. } => CommandKind::Data,
            Command::Ping => CommandKind::Ping,
            Command::End { .. } => CommandKind::End,
            Command::Showing => CommandKind::Showing,
            Command::Storing => CommandKind::Storing,
            Command::Alert { .. } => CommandKind::Alert,
        }
    }

    /// Panel key the command addresses, if any.
    pub fn key(&self) -> Option<&str> {
        match self {
            Command::Show { key }
            | Command::Store { key, .. }
            | Command::Delete { key }
            | Command::Dismiss { key }
            | Command::Data { key, .. }
            | Command::Alert { key, .. } => Some(key),
            Command::Ping | Command::End { .. } | Command::Showing | Command::Storing => None,
        }
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Store { key, panel } => f
                .debug_struct("Store")
                .field("key", key)
                .field("panel", &panel.kind())
                .finish(),
            Command::Data { key, payload } => f
                .debug_struct("Data")
                .field("key", key)
                .field("payload", payload)
                .finish(),
            Command::End { reason } => f.debug_struct("End").field("reason", reason).finish(),
            Command::Alert { key, title, .. } => f
                .debug_struct("Alert")
                .field("key", key)
                .field("title", title)
                .finish_non_exhaustive(),
            other => match other.key() {
                Some(key) => f
                    .debug_struct(other.kind().as_str())
                    .field("key", &key)
                    .finish(),
                None => f.write_str(other.kind().as_str()),
            },
        }
    }
}

/// Discriminant of a [`Command`], used to key the dispatch table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    Show,
    Store,
    Delete,
    Dismiss,
    Data,
    Ping,
    End,
    Showing,
    Storing,
    Alert,
}

impl CommandKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CommandKind::Show => "Show",
            CommandKind::Store => "Store",
            CommandKind::Delete => "Delete",
            CommandKind::Dismiss => "Dismiss",
            CommandKind::Data => "Data",
            CommandKind::Ping => "Ping",
            CommandKind::End => "End",
            CommandKind::Showing => "Showing",
            CommandKind::Storing => "Storing",
            CommandKind::Alert => "Alert",
        }
    }
}

/// Notification from the manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    Showing {
        key: String,
    },
    Shown {
        key: String,
        active_keys: Vec<Key>,
    },
    Storing {
        keys: Vec<String>,
    },
    Stored {
        key: String,
    },
    /// Something went wrong but the manager keeps running.
    Alert {
        title: String,
        text: String,
        source_key: Option<String>,
    },
    Pong,
    /// Always the last response a manager emits.
    Ending {
        reason: Option<String>,
    },
    /// Result produced by a panel, such as a menu selection.
    Data {
        key: String,
        value: String,
    },
}

impl Response {
    pub fn alert(
        title: impl Into<String>,
        text: impl Into<String>,
        source_key: Option<&str>,
    ) -> Self {
        Response::Alert {
            title: title.into(),
            text: text.into(),
            source_key: source_key.map(str::to_string),
        }
    }

    pub fn is_ending(&self) -> bool {
        matches!(self, Response::Ending { .. })
    }

    pub fn is_alert(&self) -> bool {
        matches!(self, Response::Alert { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::Splash;

    #[test]
    fn command_kinds_and_keys() {
        let store = Command::store("intro", Splash::new("hello"));
        assert_eq!(store.kind(), CommandKind::Store);
        assert_eq!(store.key(), Some("intro"));
        assert_eq!(Command::Ping.key(), None);
        assert_eq!(format!("{store:?}"), "Store { key: \"intro\", panel: \"splash\" }");
        assert_eq!(format!("{:?}", Command::show("intro")), "Show { key: \"intro\" }");
        assert_eq!(format!("{:?}", Command::Ping), "Ping");
    }

    #[test]
    fn responses_serialize_tagged() {
        let shown = Response::Shown {
            key: "menu".into(),
            active_keys: vec![Key::Enter, Key::Char('q')],
        };
        let json = serde_json::to_value(&shown).unwrap();
        assert_eq!(json["type"], "shown");
        assert_eq!(json["active_keys"][0]["key"], "enter");
        assert_eq!(json["active_keys"][1]["char"], "q");

        let back: Response = serde_json::from_value(json).unwrap();
        assert_eq!(back, shown);
    }

    #[test]
    fn payload_names() {
        assert_eq!(Payload::Set(3).name(), "set");
        let json = serde_json::to_string(&Payload::Line("x".into())).unwrap();
        assert_eq!(json, r#"{"type":"line","value":"x"}"#);
    }
}
