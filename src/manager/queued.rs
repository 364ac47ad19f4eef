use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SendError, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::error::{PanelError, Result};
use crate::messages::{Command, Response};
use crate::panel::Panel;
use crate::terminal::Terminal;

use super::config::ManagerConfig;
use super::core::{DISCONNECT_REASON, Manager};
use super::dispatch::DispatchTable;

/// Controller side of a manager running on its own thread.
///
/// Dropping the inbound sender (including dropping this value) ends the
/// manager with `Ending("controller disconnected")`.
#[derive(Debug)]
pub struct QueuedManager {
    inbox: Sender<Command>,
    outbox: Receiver<Response>,
    handle: JoinHandle<()>,
}

/// Start a manager on a dedicated named thread.
///
/// Failures while taking over the terminal are reported on the outbox as
/// `Ending(reason)`; only a failure to spawn the thread is returned here.
pub fn spawn_queued(
    initial: Option<(String, Box<dyn Panel>)>,
    dispatch: DispatchTable,
    terminal: Box<dyn Terminal>,
    config: ManagerConfig,
) -> Result<QueuedManager> {
    let (inbox, commands) = mpsc::channel();
    let (responses, outbox) = mpsc::channel();

    let handle = thread::Builder::new()
        .name(config.thread_name.clone())
        .spawn(move || run(initial, dispatch, terminal, config, commands, responses))?;

    Ok(QueuedManager {
        inbox,
        outbox,
        handle,
    })
}

fn run(
    initial: Option<(String, Box<dyn Panel>)>,
    dispatch: DispatchTable,
    terminal: Box<dyn Terminal>,
    config: ManagerConfig,
    commands: Receiver<Command>,
    responses: Sender<Response>,
) {
    let mut manager = match Manager::new(initial, dispatch, terminal, config) {
        Ok(manager) => manager,
        Err(err) => {
            let _ = responses.send(Response::Ending {
                reason: Some(err.to_string()),
            });
            return;
        }
    };

    loop {
        let command = match commands.try_recv() {
            Ok(command) => Some(command),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                manager.end(Some(DISCONNECT_REASON.to_string()));
                forward(&mut manager, &responses);
                break;
            }
        };

        let running = manager.step(command);
        if !forward(&mut manager, &responses) {
            manager.end(Some(DISCONNECT_REASON.to_string()));
            break;
        }
        if !running {
            break;
        }
    }
}

/// Push every pending response to the controller. Returns `false` once the
/// receiving side has gone away.
fn forward(manager: &mut Manager, responses: &Sender<Response>) -> bool {
    for response in manager.drain_responses() {
        if responses.send(response).is_err() {
            return false;
        }
    }
    true
}

impl QueuedManager {
    pub fn inbox(&self) -> &Sender<Command> {
        &self.inbox
    }

    pub fn outbox(&self) -> &Receiver<Response> {
        &self.outbox
    }

    pub fn send(&self, command: Command) -> std::result::Result<(), SendError<Command>> {
        self.inbox.send(command)
    }

    /// Wait up to `timeout` for the next response. `None` on timeout or
    /// once the manager thread has exited and the outbox is drained.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Response> {
        match self.outbox.recv_timeout(timeout) {
            Ok(response) => Some(response),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Disconnect the controller and wait for the manager thread to exit.
    /// Responses still queued, including the final `Ending`, are returned.
    pub fn join(self) -> Result<Vec<Response>> {
        let QueuedManager {
            inbox,
            outbox,
            handle,
        } = self;
        drop(inbox);
        handle
            .join()
            .map_err(|_| PanelError::Panicked("manager thread panicked".to_string()))?;
        Ok(outbox.try_iter().collect())
    }

    pub fn into_channels(self) -> (Sender<Command>, Receiver<Response>, JoinHandle<()>) {
        (self.inbox, self.outbox, self.handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;
    use crate::terminal::ScriptedTerminal;

    #[test]
    fn runs_on_named_thread_and_pongs() {
        let (term, _handle) = ScriptedTerminal::new(Size::new(10, 3));
        let config = ManagerConfig::default().with_poll_interval(Duration::from_millis(2));
        let manager = spawn_queued(None, DispatchTable::new(), Box::new(term), config).unwrap();
        manager.send(Command::Ping).unwrap();
        assert_eq!(
            manager.recv_timeout(Duration::from_secs(2)),
            Some(Response::Pong)
        );

        let rest = manager.join().unwrap();
        assert_eq!(
            rest,
            vec![Response::Ending {
                reason: Some(DISCONNECT_REASON.to_string())
            }]
        );
    }
}
