use std::sync::{Arc, Mutex};

use crate::{
    catalog::{Catalog, CatalogError},
    events::SessionEvent,
    observers::SessionObserver,
    phase::Phase,
    session::{RentalSession, SessionError},
    snapshot::SessionSnapshot,
    visualization::SessionVisualization,
};

/// Helper function to set up a session over the standard catalog
fn setup_session() -> RentalSession {
    RentalSession::new(Catalog::standard(), "test-session")
}

/// Helper to check whether a transcript line was emitted verbatim
fn has_line(session: &RentalSession, needle: &str) -> bool {
    session.transcript().iter().any(|line| line == needle)
}

#[test]
fn test_initial_listing() {
    let session = setup_session();

    assert_eq!(*session.phase(), Phase::Renting);
    assert!(session.rented_indices().is_empty());
    assert_eq!(session.last_rented_genre(), "");

    assert_eq!(session.transcript().first().map(String::as_str), Some("Available movies:"));
    assert!(has_line(&session, "3) Jurassic Park (Science Fiction)"));
    assert_eq!(
        session.transcript().last().map(String::as_str),
        Some("Enter the number of the movie you want to rent (0 to finish):")
    );
}

#[test]
fn test_rent_marks_movie_rented() {
    let mut session = setup_session();

    drop(session.submit("3"));

    assert_eq!(session.rented_indices(), &[3]);
    assert_eq!(session.last_rented_genre(), "Science Fiction");
    assert_eq!(*session.phase(), Phase::Renting);
    assert!(has_line(&session, "You have rented Jurassic Park"));
}

#[test]
#[allow(clippy::expect_used, clippy::arithmetic_side_effects)]
fn test_recommendations_exclude_rented_movie() {
    let mut session = setup_session();

    drop(session.submit("3"));

    let transcript = session.transcript();
    let header = transcript
        .iter()
        .position(|line| line == "Recommended Science Fiction movies:")
        .expect("Recommendation header should be present");

    // The only other science fiction movie follows the header; the block
    // ends at the blank separator before the re-emitted listing
    assert_eq!(transcript.get(header + 1).map(String::as_str), Some("8) Inception"));
    assert_eq!(transcript.get(header + 2).map(String::as_str), Some(""));
}

#[test]
#[allow(clippy::expect_used, clippy::arithmetic_side_effects)]
fn test_empty_recommendation_block_is_header_only() {
    let mut session = setup_session();

    drop(session.submit("3"));
    drop(session.submit("8"));

    let transcript = session.transcript();
    let header = transcript
        .iter()
        .rposition(|line| line == "Recommended Science Fiction movies:")
        .expect("Recommendation header should be present");

    assert_eq!(transcript.get(header + 1).map(String::as_str), Some(""));
}

#[test]
fn test_duplicate_rent_rejected() {
    let mut session = setup_session();

    drop(session.submit("1"));
    drop(session.submit("1"));

    assert!(has_line(&session, "You have already rented this movie. Please try again."));
    assert_eq!(session.rented_indices(), &[1]);
    assert_eq!(*session.phase(), Phase::Renting);
}

#[test]
fn test_rent_parse_failure_reprompts() {
    let mut session = setup_session();

    drop(session.submit("abc"));

    assert!(has_line(&session, "Invalid movie number. Please try again."));
    assert_eq!(*session.phase(), Phase::Renting);
    assert!(session.rented_indices().is_empty());
}

#[test]
fn test_rent_out_of_range_rejected() {
    let mut session = setup_session();

    drop(session.submit("11"));
    drop(session.submit("-1"));

    let invalid_count = session
        .transcript()
        .iter()
        .filter(|line| *line == "Invalid movie number. Please try again.")
        .count();
    assert_eq!(invalid_count, 2);
    assert!(session.rented_indices().is_empty());
}

#[test]
fn test_selection_whitespace_is_trimmed() {
    let mut session = setup_session();

    drop(session.submit(" 3 "));

    assert_eq!(session.rented_indices(), &[3]);
}

#[test]
fn test_finish_renting_empty_skips_returning() {
    let mut session = setup_session();

    drop(session.submit("0"));

    assert_eq!(*session.phase(), Phase::Done);
    assert!(has_line(&session, "Thank you for using our renting service. See you soon!"));
    assert!(has_line(&session, "You have not rented movies."));
}

#[test]
fn test_finish_renting_with_rentals_enters_returning() {
    let mut session = setup_session();

    drop(session.submit("1"));
    drop(session.submit("0"));

    assert_eq!(*session.phase(), Phase::Returning);
    assert!(has_line(&session, "Thank you for using our renting service. See you soon!"));
    assert!(has_line(&session, "Your rented movies:"));
    assert!(has_line(&session, "1) Avengers: Endgame (Action)"));
    assert_eq!(
        session.transcript().last().map(String::as_str),
        Some("Enter the number of the movie you want to return (0 to finish):")
    );
}

#[test]
fn test_return_removal_is_positional() {
    let mut session = setup_session();

    drop(session.submit("2"));
    drop(session.submit("5"));
    drop(session.submit("0"));
    assert_eq!(session.rented_indices(), &[2, 5]);

    drop(session.submit("1"));

    assert!(has_line(&session, "You have returned Titanic"));
    assert_eq!(session.rented_indices(), &[5]);
    assert_eq!(*session.phase(), Phase::Returning);
}

#[test]
fn test_returning_last_movie_finishes_session() {
    let mut session = setup_session();

    drop(session.submit("1"));
    drop(session.submit("0"));
    drop(session.submit("1"));

    assert_eq!(*session.phase(), Phase::Done);
    assert!(session.rented_indices().is_empty());
    assert!(has_line(&session, "You have returned Avengers: Endgame"));
    assert!(has_line(&session, "You have not rented movies."));
}

#[test]
fn test_return_out_of_range_rejected() {
    let mut session = setup_session();

    drop(session.submit("1"));
    drop(session.submit("2"));
    drop(session.submit("0"));

    drop(session.submit("3"));

    assert!(has_line(&session, "Invalid movie number. Please try again."));
    assert_eq!(session.rented_indices(), &[1, 2]);
    assert_eq!(*session.phase(), Phase::Returning);
}

#[test]
#[allow(clippy::expect_used, clippy::arithmetic_side_effects)]
fn test_finish_returning_warns_about_outstanding_rentals() {
    let mut session = setup_session();

    drop(session.submit("1"));
    drop(session.submit("0"));
    drop(session.submit("0"));

    assert_eq!(*session.phase(), Phase::Done);

    let transcript = session.transcript();
    let warning = transcript
        .iter()
        .position(|line| line == "You still have movies to return.")
        .expect("Outstanding-rentals warning should be present");
    assert_eq!(
        transcript.get(warning + 1).map(String::as_str),
        Some("Thank you for using our returning service. See you soon!")
    );
}

#[test]
fn test_done_phase_is_terminal() {
    let mut session = setup_session();

    drop(session.submit("1"));
    drop(session.submit("0"));
    drop(session.submit("0"));
    assert_eq!(*session.phase(), Phase::Done);

    let rented_before = session.rented_indices().to_vec();
    let transcript_len_before = session.transcript().len();
    let history_len_before = session.history().len();

    let result = session.submit("1");

    assert!(matches!(result, Err(SessionError::SessionFinished)));
    assert_eq!(session.rented_indices(), rented_before.as_slice());
    assert_eq!(session.transcript().len(), transcript_len_before);
    assert_eq!(session.history().len(), history_len_before);
    assert_eq!(*session.phase(), Phase::Done);
}

#[test]
fn test_rented_indices_never_duplicate() {
    let mut session = setup_session();

    for input in ["1", "1", "2", "1", "3"] {
        drop(session.submit(input));
    }

    assert_eq!(session.rented_indices(), &[1, 2, 3]);
}

#[test]
fn test_history_records_processed_inputs() {
    let mut session = setup_session();

    drop(session.submit("3"));
    drop(session.submit("abc"));

    assert_eq!(session.history().len(), 2);

    let first = session.history().first();
    assert!(matches!(
        first,
        Some(transition) if transition.event == SessionEvent::Rented(3)
            && transition.from == Phase::Renting
            && transition.to == Phase::Renting
    ));
    let second = session.history().last();
    assert!(matches!(
        second,
        Some(transition) if matches!(transition.event, SessionEvent::InvalidInput(_))
    ));
}

#[test]
fn test_history_size_is_bounded() {
    let mut session = setup_session();

    for _ in 0..120 {
        drop(session.submit("abc"));
    }

    assert_eq!(session.history().len(), 100);
}

/// Counts observer notifications
struct CountingObserver(Arc<Mutex<usize>>);

impl SessionObserver for CountingObserver {
    fn on_transition(&self, _from: &Phase, _to: &Phase, _event: &SessionEvent) {
        if let Ok(mut count) = self.0.lock() {
            *count = count.saturating_add(1);
        }
    }
}

#[test]
#[allow(clippy::expect_used)]
fn test_observers_notified_per_input() {
    let count = Arc::new(Mutex::new(0_usize));
    let mut session = setup_session();
    session.register_observer(Box::new(CountingObserver(Arc::clone(&count))));

    drop(session.submit("3"));
    drop(session.submit("abc"));
    drop(session.submit("0"));

    assert_eq!(*count.lock().expect("Counter lock should not be poisoned"), 3);
}

#[test]
#[allow(clippy::expect_used)]
fn test_snapshot_round_trips_through_json() {
    let mut session = setup_session();
    drop(session.submit("3"));
    drop(session.submit("1"));

    let snapshot = session.snapshot();
    let json = snapshot.to_json().expect("Snapshot should encode");
    let restored = SessionSnapshot::from_json(&json).expect("Snapshot should decode");

    assert_eq!(restored.session_id, "test-session");
    assert_eq!(restored.phase, snapshot.phase);
    assert_eq!(restored.rented, snapshot.rented);
    assert_eq!(restored.last_rented_genre, "Action");
    assert_eq!(restored.transcript, snapshot.transcript);
    assert_eq!(restored.history.len(), snapshot.history.len());
}

#[test]
fn test_snapshot_restore_rejects_garbage() {
    let result = SessionSnapshot::from_json("not json");
    assert!(matches!(result, Err(SessionError::RestoreError(_))));
}

#[test]
fn test_dot_highlights_current_phase() {
    let mut session = setup_session();

    let dot = SessionVisualization::generate_dot(&session, false);
    assert!(dot.contains("digraph phase_machine"));
    assert!(dot.contains("p0 [label=\"Renting\", fillcolor=palegreen"));

    drop(session.submit("0"));
    let dot = SessionVisualization::generate_dot(&session, true);
    assert!(dot.contains("p2 [label=\"Done\", fillcolor=palegreen"));
}

#[test]
fn test_history_table_placeholder_when_empty() {
    assert_eq!(SessionVisualization::history_table(&[]), "No input processed yet.");
}

#[test]
fn test_catalog_accessors() {
    let catalog = Catalog::standard();

    assert_eq!(catalog.len(), 10);
    assert!(!catalog.is_empty());
    assert_eq!(catalog.title_at(1), Ok("Avengers: Endgame"));
    assert_eq!(catalog.genre_at(3), Ok("Science Fiction"));
    assert_eq!(catalog.title_at(0), Err(CatalogError::OutOfRange { index: 0, len: 10 }));
    assert_eq!(catalog.title_at(11), Err(CatalogError::OutOfRange { index: 11, len: 10 }));
}

#[test]
fn test_catalog_recommendations_scan_in_catalog_order() {
    let catalog = Catalog::standard();

    let recommendations = catalog.recommendations("Animation", &[4]);
    assert_eq!(recommendations, vec![(7, "Finding Nemo"), (10, "Toy Story")]);

    assert!(catalog.recommendations("Romance", &[2]).is_empty());
}
