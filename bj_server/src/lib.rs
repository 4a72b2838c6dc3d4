//! Web adapter for the blackjack engine.
//!
//! Each HTTP request loads the session's persisted round state, validates it,
//! mutates it through the engine, and persists it back. No request suspends
//! mid-round and sessions share no mutable state beyond the store itself.

pub mod api;
pub mod config;
