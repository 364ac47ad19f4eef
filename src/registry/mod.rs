//! Panel store.
//!
//! Maps controller-chosen keys to retained panels. The manager is the only
//! owner; panels are created by the controller and moved in with a `Store`
//! command.

mod core;

pub use self::core::PanelStore;
