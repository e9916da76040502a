use serde::{Deserialize, Serialize};

/// Represents the possible phases of a rental session
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Phase {
    /// User is choosing movies to rent
    #[default]
    Renting,
    /// User is returning previously rented movies
    Returning,
    /// Session is finished; no further input is processed
    Done,
}

impl Phase {
    /// Get a human-readable description of the current phase
    #[must_use]
    pub fn get_description(&self) -> String {
        match self {
            Self::Renting => "Choosing movies to rent".to_string(),
            Self::Returning => "Returning rented movies".to_string(),
            Self::Done => "Session finished".to_string(),
        }
    }

    /// Whether the session accepts further input in this phase
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }
}
