use serde::{Deserialize, Serialize};

/// Outcome of one processed line of user input
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub enum SessionEvent {
    /// A movie was rented (1-based catalog index)
    Rented(usize),
    /// The selected movie was already rented (1-based catalog index)
    AlreadyRented(usize),
    /// A movie was returned (1-based catalog index)
    Returned(usize),
    /// The user chose to stop renting
    RentingFinished,
    /// The user chose to stop returning
    ReturningFinished,
    /// The input was not a usable movie number (raw text as submitted)
    InvalidInput(String),
}
