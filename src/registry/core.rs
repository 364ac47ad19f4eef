use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::error::{PanelError, Result};
use crate::panel::Panel;

/// Keyed collection of panels. Storing under an existing key replaces the
/// previous panel.
#[derive(Default)]
pub struct PanelStore {
    entries: HashMap<String, Box<dyn Panel>>,
}

impl PanelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `panel`, returning the panel it replaced.
    pub fn store(&mut self, key: impl Into<String>, panel: Box<dyn Panel>) -> Option<Box<dyn Panel>> {
        match self.entries.entry(key.into()) {
            Entry::Occupied(mut occupied) => Some(occupied.insert(panel)),
            Entry::Vacant(vacant) => {
                vacant.insert(panel);
                None
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<Box<dyn Panel>> {
        self.entries.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&dyn Panel> {
        self.entries.get(key).map(|panel| panel.as_ref())
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut (dyn Panel + 'static)> {
        self.entries.get_mut(key).map(|panel| panel.as_mut())
    }

    /// Like [`PanelStore::get_mut`] but reports a missing key as an error.
    pub fn require_mut(&mut self, key: &str) -> Result<&mut (dyn Panel + 'static)> {
        self.get_mut(key)
            .ok_or_else(|| PanelError::UnknownPanel(key.to_string()))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Stored keys in sorted order.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
