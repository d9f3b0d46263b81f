//! Core types and trait definitions for SafeSteps.
//!
//! This crate holds the domain model (positions, saved locations,
//! occurrences, preferences), the pure navigation reducer, form validation,
//! the voice command table, and the adapter traits through which the
//! application reaches storage, geolocation, speech and authentication.
//! It performs no I/O of its own.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod auth;
pub mod clock;
pub mod error;
pub mod geolocation;
pub mod location;
pub mod navigation;
pub mod notice;
pub mod occurrence;
pub mod position;
pub mod preferences;
pub mod speech;
pub mod storage;
pub mod voice;

pub use error::{Error, Result, ValidationError};
