use std::collections::HashMap;
use std::fmt;

use crate::messages::{Command, CommandKind};

/// Hook run before the default handling of a command. Returning `false`
/// suppresses the default handling.
pub type CommandHandler = Box<dyn FnMut(&Command) -> bool + Send>;

/// Per-kind hooks consulted for every inbound command.
#[derive(Default)]
pub struct DispatchTable {
    handlers: HashMap<CommandKind, CommandHandler>,
}

impl DispatchTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `kind`, replacing any earlier one.
    pub fn on<F>(mut self, kind: CommandKind, handler: F) -> Self
    where
        F: FnMut(&Command) -> bool + Send + 'static,
    {
        self.insert(kind, handler);
        self
    }

    pub fn insert<F>(&mut self, kind: CommandKind, handler: F)
    where
        F: FnMut(&Command) -> bool + Send + 'static,
    {
        self.handlers.insert(kind, Box::new(handler));
    }

    pub fn remove(&mut self, kind: CommandKind) -> bool {
        self.handlers.remove(&kind).is_some()
    }

    pub fn contains(&self, kind: CommandKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    /// Run the hook for the command's kind. Commands without a hook proceed.
    pub fn proceed(&mut self, command: &Command) -> bool {
        match self.handlers.get_mut(&command.kind()) {
            Some(handler) => handler(command),
            None => true,
        }
    }
}

impl fmt::Debug for DispatchTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.handlers.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn hooks_can_veto() {
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);
        let mut table = DispatchTable::new()
            .on(CommandKind::Ping, move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                false
            })
            .on(CommandKind::Show, |_| true);

        assert!(!table.proceed(&Command::Ping));
        assert!(table.proceed(&Command::show("a")));
        assert!(table.proceed(&Command::Storing));
        assert_eq!(seen.load(Ordering::SeqCst), 1);

        assert!(table.remove(CommandKind::Ping));
        assert!(table.proceed(&Command::Ping));
    }
}
