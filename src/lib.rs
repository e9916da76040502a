//! Interactive session simulator for renting and returning movies from a
//! fixed catalog.
//!
//! This crate provides the session state machine governing the Renting,
//! Returning, and Done phases, plus the validation and recommendation logic
//! applied to each numeric selection. Presentation is left to a display
//! adapter that renders the accumulated transcript and forwards raw input.

pub mod catalog;
pub mod events;
pub mod observers;
pub mod phase;
pub mod session;
pub mod snapshot;
pub mod transcript;
pub mod visualization;

pub use catalog::Catalog;
pub use events::SessionEvent;
pub use phase::Phase;
pub use session::RentalSession;
pub use visualization::SessionVisualization;
