use std::io::{self, BufRead};

use clap::Parser;
use colored::Colorize;
use rental_session::{
    Catalog, RentalSession, SessionVisualization,
    observers::{NotificationService, TransitionLogger},
};

/// Command-line arguments for the rental session demo
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Read selections interactively from standard input
    #[arg(short, long)]
    interactive: bool,

    /// Log every processed selection and phase change
    #[arg(short, long)]
    verbose: bool,

    /// Print a DOT graph of the phase machine when the session ends
    #[arg(long)]
    dot: bool,

    /// Print session statistics when the session ends
    #[arg(long)]
    stats: bool,

    /// Print a JSON snapshot of the finished session
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();

    println!("{}", "Movie Rental Session Simulator".green().bold());
    println!("==============================\n");

    let mut session = RentalSession::new(Catalog::standard(), "session-1");

    if args.verbose {
        session.register_observer(Box::new(TransitionLogger));
        session.register_observer(Box::new(NotificationService));
    }

    // The intro listing is already in the transcript; render it first
    let mut rendered = 0;
    render_new_lines(&session, &mut rendered);

    if args.interactive {
        interactive_loop(&mut session, &mut rendered);
    } else {
        scripted_demo(&mut session, &mut rendered);
    }

    if args.stats {
        println!();
        SessionVisualization::print_stats(&session);
    }

    if args.dot {
        println!("\n{}", "Phase machine (DOT):".yellow().bold());
        print!("{}", SessionVisualization::generate_dot(&session, true));
    }

    if args.json {
        println!("\n{}", "Session snapshot:".yellow().bold());
        match session.snapshot().to_json() {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("Failed to encode snapshot: {e}"),
        }
    }
}

/// Print any transcript lines appended since the last render
fn render_new_lines(session: &RentalSession, rendered: &mut usize) {
    for line in session.transcript().iter().skip(*rendered) {
        println!("{line}");
    }
    *rendered = session.transcript().len();
}

/// Walk a session through a fixed sequence of selections
fn scripted_demo(session: &mut RentalSession, rendered: &mut usize) {
    // Rent two science fiction movies and an action movie, trip over a
    // duplicate and a typo along the way, then return one movie and leave
    let script = ["3", "8", "3", "abc", "1", "0", "2", "0"];

    for input in script {
        println!("{}", format!("> {input}").cyan());
        match session.submit(input) {
            Ok(_) => render_new_lines(session, rendered),
            Err(e) => {
                eprintln!("Session error: {e}");
                break;
            }
        }
    }
}

/// Forward lines from standard input until the session finishes
fn interactive_loop(session: &mut RentalSession, rendered: &mut usize) {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let Ok(text) = line else { break };
        match session.submit(&text) {
            Ok(phase) => {
                let done = phase.is_terminal();
                render_new_lines(session, rendered);
                if done {
                    break;
                }
            }
            Err(e) => {
                eprintln!("Session error: {e}");
                break;
            }
        }
    }
}
