//! Application layer for SafeSteps.
//!
//! [`App`] owns the navigation state, the persisted stores, the position
//! tracker and the voice assistant, and reaches the outside world only
//! through the adapters bundled in a [`Platform`]. The [`sim`] module
//! provides in-process adapters standing in for a real device.

pub mod app;
pub mod assistant;
pub mod error;
pub mod locations;
pub mod occurrences;
pub mod platform;
pub mod preferences;
pub mod sim;
pub mod tracker;

mod persist;

pub use app::{App, Tracking};
pub use error::{Error, Result};
pub use platform::{Adapters, Platform};
