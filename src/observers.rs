use crate::events::SessionEvent;
use crate::phase::Phase;

/// Trait for observing processed session input
pub trait SessionObserver {
    /// Called after each processed input, with the phase before and after
    fn on_transition(&self, from: &Phase, to: &Phase, event: &SessionEvent);
}

/// Logs every processed input
#[derive(Debug)]
pub struct TransitionLogger;

impl SessionObserver for TransitionLogger {
    fn on_transition(&self, from: &Phase, to: &Phase, event: &SessionEvent) {
        println!("LOGGER: Processed input: {from:?} --({event:?})--> {to:?}");
    }
}

/// Announces session milestones
#[derive(Debug)]
pub struct NotificationService;

impl SessionObserver for NotificationService {
    fn on_transition(&self, from: &Phase, to: &Phase, event: &SessionEvent) {
        match (from, to, event) {
            (Phase::Renting, Phase::Returning, SessionEvent::RentingFinished) => {
                println!("NOTIFICATION: Renting finished, time to return your movies!");
            }
            (Phase::Renting, Phase::Done, SessionEvent::RentingFinished) => {
                println!("NOTIFICATION: Session ended without any rentals.");
            }
            (Phase::Returning, Phase::Done, _) => {
                println!("NOTIFICATION: Session finished, see you next time!");
            }
            _ => {}
        }
    }
}
