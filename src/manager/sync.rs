use std::collections::VecDeque;

use crate::error::Result;
use crate::messages::{Command, Response};
use crate::panel::Panel;
use crate::terminal::Terminal;

use super::config::ManagerConfig;
use super::core::Manager;
use super::dispatch::DispatchTable;

/// Manager driven by the caller's thread.
///
/// Each call to `next` runs loop iterations until a response is available.
/// When an iteration finds no input and no queued command, `next` returns
/// `None`; pulling again resumes the loop. Once `Ending` has been yielded
/// every later call returns `None`.
pub struct SyncManager {
    manager: Manager,
    queue: VecDeque<Command>,
    finished: bool,
}

pub fn sync_manager(
    initial: Option<(String, Box<dyn Panel>)>,
    dispatch: DispatchTable,
    terminal: Box<dyn Terminal>,
    config: ManagerConfig,
) -> Result<SyncManager> {
    let manager = Manager::new(initial, dispatch, terminal, config)?;
    Ok(SyncManager {
        manager,
        queue: VecDeque::new(),
        finished: false,
    })
}

impl SyncManager {
    /// Queue a command for a later iteration.
    pub fn send(&mut self, command: Command) {
        self.queue.push_back(command);
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn manager(&self) -> &Manager {
        &self.manager
    }

    fn yield_response(&mut self, response: Response) -> Option<Response> {
        if response.is_ending() {
            self.finished = true;
            self.queue.clear();
        }
        Some(response)
    }
}

impl Iterator for SyncManager {
    type Item = Response;

    fn next(&mut self) -> Option<Response> {
        if self.finished {
            return None;
        }
        loop {
            if let Some(response) = self.manager.pop_response() {
                return self.yield_response(response);
            }
            if self.manager.is_ended() {
                self.finished = true;
                return None;
            }

            let command = self.queue.pop_front();
            self.manager.step(command);

            if !self.manager.has_pending() && self.manager.was_idle() {
                return None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::geometry::Size;
    use crate::panel::Splash;
    use crate::terminal::{Key, ScriptedTerminal};

    fn sync() -> (SyncManager, crate::terminal::ScriptedTerminalHandle) {
        let (term, handle) = ScriptedTerminal::new(Size::new(12, 4));
        let config = ManagerConfig::default().with_poll_interval(Duration::from_millis(1));
        let manager = sync_manager(None, DispatchTable::new(), Box::new(term), config).unwrap();
        (manager, handle)
    }

    #[test]
    fn suspends_when_idle_and_resumes() {
        let (mut manager, _handle) = sync();
        assert_eq!(manager.next(), None);

        manager.send(Command::Ping);
        assert_eq!(manager.next(), Some(Response::Pong));
        assert_eq!(manager.next(), None);
    }

    #[test]
    fn silent_commands_do_not_suspend() {
        let (mut manager, _handle) = sync();
        manager.send(Command::delete("nothing"));
        manager.send(Command::store("a", Splash::new("hi")));
        assert_eq!(manager.next(), Some(Response::Stored { key: "a".into() }));
    }

    #[test]
    fn fused_after_ending() {
        let (mut manager, handle) = sync();
        handle.push_key(Key::INTERRUPT);
        manager.send(Command::Ping);
        assert_eq!(
            manager.next(),
            Some(Response::Ending {
                reason: Some("keyboard interrupt".into())
            })
        );
        assert!(manager.is_finished());
        manager.send(Command::Ping);
        assert_eq!(manager.next(), None);
        assert!(!handle.is_raw());
    }
}
