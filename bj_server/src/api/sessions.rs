//! In-process session store.
//!
//! Rounds are persisted between requests as serialized JSON rather than live
//! objects, so every request goes through the same deserialize, validate,
//! mutate, serialize cycle a backing store would impose. Sessions are
//! independent; the store mutex is the only shared state.

use blackjack::Round;
use log::warn;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use thiserror::Error;
use uuid::Uuid;

/// Errors from session storage and retrieval
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session limit reached")]
    CapacityReached,
    #[error("session does not exist")]
    NotFound,
    #[error("session state is corrupt: {0}")]
    Corrupt(String),
}

/// Keyed store of persisted round state, one blob per session.
#[derive(Debug)]
pub struct SessionStore {
    max_sessions: usize,
    rounds: Mutex<HashMap<Uuid, String>>,
}

impl SessionStore {
    #[must_use]
    pub fn new(max_sessions: usize) -> Self {
        Self {
            max_sessions,
            rounds: Mutex::new(HashMap::new()),
        }
    }

    /// Persists a fresh round under a new session id.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::CapacityReached`] once the configured session
    /// limit is hit, and [`SessionError::Corrupt`] if the round does not
    /// serialize.
    pub fn create(&self, round: &Round) -> Result<Uuid, SessionError> {
        let blob = serialize(round)?;
        let mut rounds = self.rounds.lock().unwrap_or_else(PoisonError::into_inner);
        if rounds.len() >= self.max_sessions {
            warn!("refusing new session, {} already active", rounds.len());
            return Err(SessionError::CapacityReached);
        }
        let session_id = Uuid::new_v4();
        rounds.insert(session_id, blob);
        Ok(session_id)
    }

    /// Reconstructs the session's round from its persisted state, validating
    /// invariants before handing it to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotFound`] for unknown sessions and
    /// [`SessionError::Corrupt`] if the blob fails to deserialize or
    /// validate.
    pub fn load(&self, session_id: Uuid) -> Result<Round, SessionError> {
        let rounds = self.rounds.lock().unwrap_or_else(PoisonError::into_inner);
        let blob = rounds.get(&session_id).ok_or(SessionError::NotFound)?;
        let round: Round =
            serde_json::from_str(blob).map_err(|e| SessionError::Corrupt(e.to_string()))?;
        round
            .validate()
            .map_err(|e| SessionError::Corrupt(e.to_string()))?;
        Ok(round)
    }

    /// Persists the session's updated round.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotFound`] if the session was reset in the
    /// meantime.
    pub fn store(&self, session_id: Uuid, round: &Round) -> Result<(), SessionError> {
        let blob = serialize(round)?;
        let mut rounds = self.rounds.lock().unwrap_or_else(PoisonError::into_inner);
        match rounds.get_mut(&session_id) {
            Some(existing) => {
                *existing = blob;
                Ok(())
            }
            None => Err(SessionError::NotFound),
        }
    }

    /// Destroys the session. Returns whether it existed.
    pub fn remove(&self, session_id: Uuid) -> bool {
        let mut rounds = self.rounds.lock().unwrap_or_else(PoisonError::into_inner);
        rounds.remove(&session_id).is_some()
    }

    #[must_use]
    pub fn active_count(&self) -> usize {
        let rounds = self.rounds.lock().unwrap_or_else(PoisonError::into_inner);
        rounds.len()
    }
}

fn serialize(round: &Round) -> Result<String, SessionError> {
    serde_json::to_string(round).map_err(|e| SessionError::Corrupt(e.to_string()))
}
