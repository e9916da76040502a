use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    catalog::{Catalog, CatalogError},
    events::SessionEvent,
    observers::SessionObserver,
    phase::Phase,
    snapshot::{SessionSnapshot, TimeStamp},
    transcript::Transcript,
};

/// Message shown when input cannot be used as a movie number
const INVALID_NUMBER: &str = "Invalid movie number. Please try again.";
/// Message shown when the selected movie is already rented
const ALREADY_RENTED: &str = "You have already rented this movie. Please try again.";
/// Message shown when the session ends with nothing left rented
const NOTHING_RENTED: &str = "You have not rented movies.";
/// Message shown when the user stops returning with rentals outstanding
const STILL_TO_RETURN: &str = "You still have movies to return.";
/// Farewell shown when the user stops renting
const RENTING_FAREWELL: &str = "Thank you for using our renting service. See you soon!";
/// Farewell shown when the user stops returning
const RETURNING_FAREWELL: &str = "Thank you for using our returning service. See you soon!";
/// Header of the catalog listing block
const CATALOG_HEADER: &str = "Available movies:";
/// Prompt of the catalog listing block
const RENT_PROMPT: &str = "Enter the number of the movie you want to rent (0 to finish):";
/// Header of the rented-list block
const RENTED_HEADER: &str = "Your rented movies:";
/// Prompt of the rented-list block
const RETURN_PROMPT: &str = "Enter the number of the movie you want to return (0 to finish):";

/// Custom error type for rental session operations
#[derive(Debug)]
pub enum SessionError {
    /// A catalog lookup failed after validation; indicates a logic defect
    Catalog(CatalogError),
    /// Input was submitted after the session reached the Done phase
    SessionFinished,
    /// Error occurred while encoding a snapshot
    SnapshotError(String),
    /// Error occurred while decoding a snapshot
    RestoreError(String),
}

impl std::error::Error for SessionError {}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Catalog(err) => write!(f, "Catalog error: {err}"),
            Self::SessionFinished => {
                write!(f, "Session is finished and no longer accepts input")
            }
            Self::SnapshotError(msg) => write!(f, "Snapshot error: {msg}"),
            Self::RestoreError(msg) => write!(f, "Restore error: {msg}"),
        }
    }
}

impl From<CatalogError> for SessionError {
    fn from(err: CatalogError) -> Self {
        Self::Catalog(err)
    }
}

/// Record of one processed input
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PhaseTransition {
    /// The phase before the input was processed
    pub from: Phase,
    /// The phase after the input was processed
    pub to: Phase,
    /// What the input did
    pub event: SessionEvent,
    /// When the input was processed
    pub timestamp: TimeStamp,
}

/// Parse one line of raw input as a movie number
fn parse_selection(raw_text: &str) -> Option<i64> {
    raw_text.trim().parse().ok()
}

/// Single-user rental session state machine
///
/// Owns the catalog, the mutable session record, and the accumulated
/// transcript. One instance per session; the hosting boundary is expected to
/// serialize submissions.
pub struct RentalSession {
    /// The fixed movie catalog
    catalog: Catalog,
    /// 1-based catalog indices of rented movies, in rental order
    rented: Vec<usize>,
    /// Genre of the most recently rented movie; empty before any rental
    last_rented_genre: String,
    /// The currently active phase
    phase: Phase,
    /// Accumulated display lines
    transcript: Transcript,
    /// Record of processed inputs
    history: Vec<PhaseTransition>,
    /// Maximum number of history entries to keep
    max_history_size: usize,
    /// Registered input observers
    observers: Vec<Box<dyn SessionObserver>>,
    /// Unique identifier for this session
    session_id: String,
}

// Manual implementation of Debug for RentalSession
impl fmt::Debug for RentalSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RentalSession")
            .field("catalog", &self.catalog)
            .field("rented", &self.rented)
            .field("last_rented_genre", &self.last_rented_genre)
            .field("phase", &self.phase)
            .field("transcript", &self.transcript)
            .field("history", &self.history)
            .field("max_history_size", &self.max_history_size)
            .field("observers_count", &self.observers.len())
            .field("session_id", &self.session_id)
            .finish()
    }
}

impl RentalSession {
    /// Create a new session over the given catalog
    ///
    /// The catalog listing block is emitted immediately so the transcript is
    /// ready to render before the first submission.
    #[must_use]
    pub fn new(catalog: Catalog, session_id: &str) -> Self {
        let mut session = Self {
            catalog,
            rented: Vec::new(),
            last_rented_genre: String::new(),
            phase: Phase::Renting,
            transcript: Transcript::new(),
            history: Vec::new(),
            max_history_size: 100,
            observers: Vec::new(),
            session_id: session_id.to_string(),
        };
        session.emit_catalog_listing();
        session
    }

    /// Register an observer to be notified of processed input
    pub fn register_observer(&mut self, observer: Box<dyn SessionObserver>) {
        self.observers.push(observer);
    }

    /// Process one line of user input, mutating the session state and
    /// appending to the transcript
    ///
    /// Invalid input is not an error: it appends the fixed message, re-emits
    /// the active listing block, and leaves the phase unchanged.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::SessionFinished` if the session has already
    /// reached the Done phase, or a propagated `SessionError::Catalog` if a
    /// validated index fails to resolve (a logic defect, not a user error)
    pub fn submit(&mut self, raw_text: &str) -> Result<&Phase, SessionError> {
        let from = self.phase.clone();
        let event = match self.phase {
            Phase::Renting => self.process_rent_selection(raw_text)?,
            Phase::Returning => self.process_return_selection(raw_text)?,
            Phase::Done => return Err(SessionError::SessionFinished),
        };
        self.record(from, event);
        Ok(&self.phase)
    }

    /// Apply one rent-phase selection
    fn process_rent_selection(&mut self, raw_text: &str) -> Result<SessionEvent, SessionError> {
        let Some(selection) = parse_selection(raw_text) else {
            return Ok(self.invalid_rent_input(raw_text));
        };

        if selection == 0 {
            self.transcript.notice(RENTING_FAREWELL);
            if self.rented.is_empty() {
                self.transcript.line(NOTHING_RENTED);
                self.phase = Phase::Done;
            } else {
                self.phase = Phase::Returning;
                self.emit_rented_listing()?;
            }
            return Ok(SessionEvent::RentingFinished);
        }

        let in_range = usize::try_from(selection)
            .ok()
            .filter(|index| (1..=self.catalog.len()).contains(index));
        let Some(index) = in_range else {
            return Ok(self.invalid_rent_input(raw_text));
        };

        if self.rented.contains(&index) {
            self.transcript.notice(ALREADY_RENTED);
            self.emit_catalog_listing();
            return Ok(SessionEvent::AlreadyRented(index));
        }

        let title = self.catalog.title_at(index)?.to_string();
        let genre = self.catalog.genre_at(index)?.to_string();
        self.rented.push(index);
        self.last_rented_genre = genre.clone();

        self.transcript.notice(format!("You have rented {title}"));
        self.transcript.line(format!("Recommended {genre} movies:"));
        for (rec_index, rec_title) in self.catalog.recommendations(&genre, &self.rented) {
            self.transcript.line(format!("{rec_index}) {rec_title}"));
        }

        self.emit_catalog_listing();
        Ok(SessionEvent::Rented(index))
    }

    /// Apply one return-phase selection
    fn process_return_selection(&mut self, raw_text: &str) -> Result<SessionEvent, SessionError> {
        let Some(selection) = parse_selection(raw_text) else {
            return self.invalid_return_input(raw_text);
        };

        if selection == 0 {
            if !self.rented.is_empty() {
                self.transcript.notice(STILL_TO_RETURN);
            }
            self.transcript.line(RETURNING_FAREWELL);
            self.phase = Phase::Done;
            return Ok(SessionEvent::ReturningFinished);
        }

        // Selections address positions in the rented list, not the catalog
        let list_index = usize::try_from(selection).ok().and_then(|p| p.checked_sub(1));
        let Some(list_index) = list_index else {
            return self.invalid_return_input(raw_text);
        };
        let Some(catalog_index) = self.rented.get(list_index).copied() else {
            return self.invalid_return_input(raw_text);
        };

        let title = self.catalog.title_at(catalog_index)?.to_string();
        self.transcript.notice(format!("You have returned {title}"));
        // Positional removal; later entries shift down by one
        self.rented.remove(list_index);

        if self.rented.is_empty() {
            self.transcript.line(NOTHING_RENTED);
            self.phase = Phase::Done;
        } else {
            self.emit_rented_listing()?;
        }
        Ok(SessionEvent::Returned(catalog_index))
    }

    /// Reject a rent-phase input and re-issue the catalog listing
    fn invalid_rent_input(&mut self, raw_text: &str) -> SessionEvent {
        self.transcript.notice(INVALID_NUMBER);
        self.emit_catalog_listing();
        SessionEvent::InvalidInput(raw_text.to_string())
    }

    /// Reject a return-phase input and re-issue the rented list
    fn invalid_return_input(&mut self, raw_text: &str) -> Result<SessionEvent, SessionError> {
        self.transcript.notice(INVALID_NUMBER);
        self.emit_rented_listing()?;
        Ok(SessionEvent::InvalidInput(raw_text.to_string()))
    }

    /// Append the catalog listing block and rent prompt
    fn emit_catalog_listing(&mut self) {
        let mut block = vec![CATALOG_HEADER.to_string()];
        for (index, item) in self.catalog.entries() {
            block.push(format!("{index}) {} ({})", item.title, item.genre));
        }
        block.push(RENT_PROMPT.to_string());
        self.transcript.section(block);
    }

    /// Append the rented-list block and return prompt
    ///
    /// # Errors
    ///
    /// Returns a propagated `SessionError::Catalog` if a rented index fails
    /// to resolve, which would indicate a broken invariant
    #[allow(clippy::arithmetic_side_effects)]
    fn emit_rented_listing(&mut self) -> Result<(), SessionError> {
        let mut block = vec![RENTED_HEADER.to_string()];
        for (position, index) in self.rented.iter().enumerate() {
            let item = self.catalog.item_at(*index)?;
            block.push(format!("{}) {} ({})", position + 1, item.title, item.genre));
        }
        block.push(RETURN_PROMPT.to_string());
        self.transcript.section(block);
        Ok(())
    }

    /// Record a processed input and notify observers
    fn record(&mut self, from: Phase, event: SessionEvent) {
        self.history.push(PhaseTransition {
            from: from.clone(),
            to: self.phase.clone(),
            event: event.clone(),
            timestamp: TimeStamp::now(),
        });

        // Maintain history size limit
        if self.history.len() > self.max_history_size {
            self.history.remove(0); // Remove oldest entry
        }

        for observer in &self.observers {
            observer.on_transition(&from, &self.phase, &event);
        }
    }

    /// The currently active phase
    #[must_use]
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// 1-based catalog indices of rented movies, in rental order
    #[must_use]
    pub fn rented_indices(&self) -> &[usize] {
        &self.rented
    }

    /// Genre of the most recently rented movie; empty before any rental
    #[must_use]
    pub fn last_rented_genre(&self) -> &str {
        &self.last_rented_genre
    }

    /// The full accumulated transcript, line by line
    #[must_use]
    pub fn transcript(&self) -> &[String] {
        self.transcript.lines()
    }

    /// The record of processed inputs, oldest first
    #[must_use]
    pub fn history(&self) -> &[PhaseTransition] {
        &self.history
    }

    /// The catalog this session rents from
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Identifier carried into snapshots
    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Capture a serializable point-in-time view of the session
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.session_id.clone(),
            phase: self.phase.clone(),
            rented: self.rented.clone(),
            last_rented_genre: self.last_rented_genre.clone(),
            transcript: self.transcript.lines().to_vec(),
            history: self.history.clone(),
            captured_at: TimeStamp::now(),
        }
    }
}

// Implementing display for nicer output
impl fmt::Display for RentalSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.phase.get_description())
    }
}

// Include tests module
#[cfg(test)]
mod tests;
