use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::{
    phase::Phase,
    session::{PhaseTransition, SessionError},
};

/// A serializable representation of a timestamp
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TimeStamp {
    /// Seconds since Unix epoch
    pub seconds: u64,
    /// Nanoseconds part
    pub nanos: u32,
}

impl TimeStamp {
    /// Create a new timestamp from the current system time
    ///
    /// # Panics
    ///
    /// Panics if the system time is before the Unix epoch.
    #[must_use]
    pub fn now() -> Self {
        let now = SystemTime::now();
        #[allow(clippy::expect_used)]
        let duration = now.duration_since(UNIX_EPOCH).expect("System time is before UNIX epoch");

        Self { seconds: duration.as_secs(), nanos: duration.subsec_nanos() }
    }
}

/// Serializable point-in-time view of a session, for the display boundary
///
/// This is a copy of the session record, not a live handle; capturing one
/// never blocks or mutates the session, and nothing is written to disk.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionSnapshot {
    /// Identifier of the captured session
    pub session_id: String,
    /// Phase at capture time
    pub phase: Phase,
    /// 1-based catalog indices of rented movies, in rental order
    pub rented: Vec<usize>,
    /// Genre of the most recently rented movie; empty before any rental
    pub last_rented_genre: String,
    /// The full transcript, line by line
    pub transcript: Vec<String>,
    /// Record of processed inputs
    pub history: Vec<PhaseTransition>,
    /// When the snapshot was captured
    pub captured_at: TimeStamp,
}

impl SessionSnapshot {
    /// Render the snapshot as pretty-printed JSON
    ///
    /// # Errors
    ///
    /// Returns a `SessionError::SnapshotError` if the snapshot cannot be
    /// serialized to JSON
    pub fn to_json(&self) -> Result<String, SessionError> {
        serde_json::to_string_pretty(self).map_err(|e| SessionError::SnapshotError(e.to_string()))
    }

    /// Parse a snapshot previously rendered with [`Self::to_json`]
    ///
    /// # Errors
    ///
    /// Returns a `SessionError::RestoreError` if the JSON parsing fails
    pub fn from_json(json: &str) -> Result<Self, SessionError> {
        serde_json::from_str(json).map_err(|e| SessionError::RestoreError(e.to_string()))
    }
}
