use std::collections::{HashMap, HashSet};

use crate::{
    events::SessionEvent,
    phase::Phase,
    session::{PhaseTransition, RentalSession},
};

/// Visualization tools for the session phase machine
#[derive(Debug)]
pub struct SessionVisualization;

/// The defined phase-machine edges as (from, label, to) triples
fn phase_edges() -> Vec<(Phase, &'static str, Phase)> {
    vec![
        (Phase::Renting, "rent / reject input", Phase::Renting),
        (Phase::Renting, "finish renting, rentals outstanding", Phase::Returning),
        (Phase::Renting, "finish renting, nothing rented", Phase::Done),
        (Phase::Returning, "return / reject input", Phase::Returning),
        (Phase::Returning, "return last movie", Phase::Done),
        (Phase::Returning, "finish returning", Phase::Done),
    ]
}

/// Stable node index for a phase, used for DOT node names
fn phase_index(phase: &Phase) -> usize {
    match phase {
        Phase::Renting => 0,
        Phase::Returning => 1,
        Phase::Done => 2,
    }
}

/// The three phases in machine order
fn all_phases() -> [Phase; 3] {
    [Phase::Renting, Phase::Returning, Phase::Done]
}

impl SessionVisualization {
    /// Print a textual representation of the phase machine
    pub fn print_phase_machine(session: &RentalSession) {
        println!("=== Phase Machine Structure ===");
        println!("Current phase: {:?}", session.phase());

        // Group edges by source phase for better readability
        let mut edges_by_source: HashMap<usize, Vec<(&'static str, Phase)>> = HashMap::new();
        for (from, label, to) in phase_edges() {
            edges_by_source.entry(phase_index(&from)).or_default().push((label, to));
        }

        for phase in all_phases() {
            let idx = phase_index(&phase);
            println!("\nPhase {idx}: {phase:?}");

            if let Some(edges) = edges_by_source.get(&idx) {
                for (label, to) in edges {
                    println!("  --({label})--> Phase {}: {to:?}", phase_index(to));
                }
            } else {
                println!("  (No outgoing transitions)");
            }
        }
    }

    /// Generate a DOT graph representation of the phase machine
    #[must_use]
    pub fn generate_dot(session: &RentalSession, highlight_path: bool) -> String {
        let mut dot = String::from("digraph phase_machine {\n");
        dot.push_str("  rankdir=LR;\n");
        dot.push_str("  node [shape=circle, style=filled, fillcolor=lightblue];\n");

        // Add phases; the current one is highlighted
        for phase in all_phases() {
            let idx = phase_index(&phase);
            let label = format!("{phase:?}");
            if phase == *session.phase() {
                dot.push_str(&format!(
                    "  p{idx} [label=\"{label}\", fillcolor=palegreen, peripheries=2];\n",
                ));
            } else {
                dot.push_str(&format!("  p{idx} [label=\"{label}\"];\n"));
            }
        }

        // If highlighting, determine which edges the session has walked
        let mut walked = HashSet::new();
        if highlight_path {
            for transition in session.history() {
                walked.insert((phase_index(&transition.from), phase_index(&transition.to)));
            }
        }

        for (from, label, to) in phase_edges() {
            let from_idx = phase_index(&from);
            let to_idx = phase_index(&to);
            let style = if highlight_path && walked.contains(&(from_idx, to_idx)) {
                "color=red, penwidth=2.0"
            } else {
                "color=black"
            };
            dot.push_str(&format!("  p{from_idx} -> p{to_idx} [label=\"{label}\", {style}];\n"));
        }

        dot.push_str("}\n");
        dot
    }

    /// Print a visualization of the processed-input history
    #[allow(clippy::arithmetic_side_effects)]
    pub fn visualize_history(transitions: &[PhaseTransition]) {
        println!("=== Session Input History ===");

        if transitions.is_empty() {
            println!("No input processed yet.");
            return;
        }

        for (i, transition) in transitions.iter().enumerate() {
            println!(
                "{}: {} --({:?})--> {}",
                i + 1,
                Self::format_phase(&transition.from),
                transition.event,
                Self::format_phase(&transition.to)
            );
        }
    }

    /// Format a phase for display
    fn format_phase(phase: &Phase) -> String {
        match phase {
            Phase::Renting => "🎬 Renting".to_string(),
            Phase::Returning => "📼 Returning".to_string(),
            Phase::Done => "✅ Done".to_string(),
        }
    }

    /// Generate a markdown table of the history
    #[must_use]
    #[allow(clippy::arithmetic_side_effects)]
    pub fn history_table(transitions: &[PhaseTransition]) -> String {
        if transitions.is_empty() {
            return "No input processed yet.".to_string();
        }

        let mut table = String::from("| # | From | Event | To |\n");
        table.push_str("|---|------|-------|----|\n");

        for (i, transition) in transitions.iter().enumerate() {
            table.push_str(&format!(
                "| {} | {} | {:?} | {} |\n",
                i + 1,
                Self::format_phase(&transition.from),
                transition.event,
                Self::format_phase(&transition.to)
            ));
        }

        table
    }

    /// Print a summary of session statistics
    pub fn print_stats(session: &RentalSession) {
        println!("=== Session Statistics ===");
        println!("Current phase: {:?}", session.phase());
        println!("Movies currently rented: {}", session.rented_indices().len());
        println!("Transcript lines: {}", session.transcript().len());
        println!("Inputs processed: {}", session.history().len());

        // Count processed inputs by kind
        let mut rentals = 0_usize;
        let mut returns = 0_usize;
        let mut rejected = 0_usize;
        for transition in session.history() {
            match transition.event {
                SessionEvent::Rented(_) => rentals = rentals.saturating_add(1),
                SessionEvent::Returned(_) => returns = returns.saturating_add(1),
                SessionEvent::AlreadyRented(_) | SessionEvent::InvalidInput(_) => {
                    rejected = rejected.saturating_add(1);
                }
                SessionEvent::RentingFinished | SessionEvent::ReturningFinished => {}
            }
        }

        println!("\nInput counts:");
        println!("  rentals: {rentals}");
        println!("  returns: {returns}");
        println!("  rejected: {rejected}");
    }
}
