//! Event groups and the manager that routes dispatch through them.
//!
//! - [`EventGroup`] named collection of events (plain, protected or ephemeral)
//! - [`EventManager`] registry of groups with the built-in `default`,
//!   `system` and `temp` groups

mod group;
mod manager;

pub use group::EventGroup;
pub use manager::{DEFAULT_GROUP, EventManager, SYSTEM_GROUP, TEMP_GROUP};
