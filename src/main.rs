use crate::error::InputError;
use crate::event_log::EventLog;
use crate::plane::{FuelLevel, Plane, PlaneId};
use crate::pool::LandingPool;
use crate::session::Session;
use crate::store::QueueStore;
use clap::Parser;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Context, Editor, Helper, Highlighter, Hinter, Validator};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tabled::settings::Style;
use tracing_subscriber::EnvFilter;

mod error;
mod event_log;
mod plane;
mod pool;
mod session;
mod store;
mod time;

#[derive(Parser)]
struct Args {
    /// Path to the saved runway queue
    #[arg(short, long, value_name = "FILE", default_value = "runway_queue.txt")]
    queue_file: PathBuf,

    /// Path to the append-only action log
    #[arg(short, long, value_name = "FILE", default_value = "action_log.txt")]
    log_file: PathBuf,

    /// Initial capacity of the landing pool
    #[arg(short, long, default_value_t = LandingPool::DEFAULT_CAPACITY)]
    capacity: usize,
}

type Console = Editor<CompleteHelper, DefaultHistory>;

#[derive(Helper, Hinter, Highlighter, Validator)]
pub struct CompleteHelper {
    pub commands: Vec<String>,
}

impl Completer for CompleteHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, _pos: usize, _ctx: &Context<'_>) -> rustyline::Result<(usize, Vec<Pair>)> {
        let mut candidates = Vec::new();

        for cmd in &self.commands {
            if cmd.starts_with(line) {
                candidates.push(Pair {
                    display: cmd.clone(),
                    replacement: format!("{} ", cmd),
                });
            }
        }

        Ok((0, candidates))
    }
}

fn paginate(content: String) {
    let pager = Command::new("less")
        .arg("-R")
        .stdin(Stdio::piped())
        .spawn()
        // Fallback to 'more' if 'less' isn't available
        .or_else(|_| Command::new("more").stdin(Stdio::piped()).spawn());

    let Ok(mut pager) = pager else {
        println!("{}", content);
        return;
    };

    if let Some(mut stdin) = pager.stdin.take() {
        if let Err(e) = stdin.write_all(content.as_bytes()) {
            // Broken pipe is common if the user quits the pager early
            if e.kind() != std::io::ErrorKind::BrokenPipe {
                eprintln!("Error writing to pager: {}", e);
            }
        }
    }

    let _ = pager.wait();
}

fn print_menu() {
    println!("\n{}", "--- Airport Runway Management ---".bold());
    println!("  1. enqueue [fuel] [y/n] - Admit a plane; missing values are prompted");
    println!("  2. land                 - Clear the highest priority plane for landing");
    println!("  3. peek                 - Show the next plane to land");
    println!("  4. free                 - Check whether the runway is free");
    println!("  5. ls                   - Display the queue");
    println!("  6. save                 - Save the queue to file");
    println!("  7. load                 - Load the queue from file and re-order it");
    println!("  8. cancel <id>          - Cancel a plane's landing clearance");
    println!("  9. rebuild              - Re-order the whole queue");
    println!(" 10. exit / quit          - Exit");
    println!("     log [n]              - Show the last n logged actions");
    println!("     menu / help / ?      - Show this menu\n");
}

fn parse_yes_no(raw: &str) -> Result<bool, InputError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "y" | "yes" => Ok(true),
        "0" | "n" | "no" => Ok(false),
        other => Err(InputError::NotAYesNo(other.to_string())),
    }
}

/// Keeps asking until `parse` accepts the answer. `None` when the operator bails out.
fn prompt<T>(rl: &mut Console, question: &str, parse: impl Fn(&str) -> Result<T, InputError>) -> Option<T> {
    loop {
        match rl.readline(question) {
            Ok(line) => match parse(&line) {
                Ok(value) => return Some(value),
                Err(e) => println!("{} {}", "Invalid input.".yellow(), e),
            },
            Err(_) => return None,
        }
    }
}

fn describe(plane: &Plane) -> String {
    let text = plane.to_string();
    if plane.is_emergency() {
        text.red().to_string()
    } else {
        text
    }
}

fn report_log_failures(session: &mut Session) {
    for e in session.take_log_failures() {
        println!("{} {}", "Error writing to log file:".yellow(), e);
    }
}

fn enqueue(rl: &mut Console, session: &mut Session, parts: &[&str]) {
    let fuel_question = format!("Enter a fuel level between 0 and {}: ", FuelLevel::MAX);
    let fuel = match parts.get(1) {
        Some(raw) => match raw.parse::<FuelLevel>() {
            Ok(fuel) => Some(fuel),
            Err(e) => {
                println!("{} {}", "Invalid input.".yellow(), e);
                prompt(rl, &fuel_question, |s| s.parse::<FuelLevel>())
            }
        },
        None => prompt(rl, &fuel_question, |s| s.parse::<FuelLevel>()),
    };
    let Some(fuel) = fuel else { return };

    let emergency = if fuel.is_critical() {
        println!(
            "Fuel level is below {}. Automatically considered as an emergency.",
            FuelLevel::EMERGENCY_THRESHOLD
        );
        Some(true)
    } else {
        match parts.get(2).map(|raw| parse_yes_no(raw)) {
            Some(Ok(flag)) => Some(flag),
            _ => prompt(rl, "Is it an emergency landing? (y/n): ", parse_yes_no),
        }
    };
    let Some(emergency) = emergency else { return };

    match session.enqueue(fuel, emergency) {
        Ok(plane) => println!("Plane {} added to the queue: {}", plane.id(), describe(&plane)),
        Err(e) => println!("{} {}", "Plane not admitted:".yellow(), e),
    }
}

fn list(session: &Session) {
    let planes = session.planes().collect::<Vec<&Plane>>();
    if planes.is_empty() {
        println!("No planes in the queue.");
        return;
    }
    let mut table = tabled::Table::new(&planes);
    table.with(Style::rounded());
    table.with(tabled::settings::Alignment::left());
    let header = format!(
        "{} of {} slots in use (heap order, next to land first)",
        planes.len(),
        session.pool().capacity()
    );
    if planes.len() > 20 {
        paginate(format!("{}\n{}", header, table));
    } else {
        println!("{}\n{}", header, table);
    }
}

fn parse_log_count(raw: Option<&str>) -> Result<usize, InputError> {
    match raw {
        None => Ok(10),
        Some(raw) => raw
            .parse::<usize>()
            .map_err(|_| InputError::NotANumber(raw.to_string())),
    }
}

fn show_log(session: &Session, parts: &[&str]) {
    let count = match parse_log_count(parts.get(1).copied()) {
        Ok(n) => n,
        Err(e) => {
            println!("{} {}", "Invalid input.".yellow(), e);
            return;
        }
    };
    match EventLog::read_all(session.log().path()) {
        Ok(events) => {
            let skip = events.len().saturating_sub(count);
            for event in &events[skip..] {
                match event.plane {
                    Some(p) => println!(
                        "#{:<4} {:<15} plane {} (fuel {}, arrival {}, emergency {}, canceled {})",
                        event.seq, event.action, p.id, p.fuel_level, p.arrival_time, p.emergency, p.canceled
                    ),
                    None => println!("#{:<4} {}", event.seq, event.action),
                }
            }
        }
        Err(e) => println!("{} {}", "Error reading log file:".yellow(), e),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .try_init();

    let mut session = Session::new(
        LandingPool::with_capacity(args.capacity),
        QueueStore::new(args.queue_file),
        EventLog::new(args.log_file),
    );
    println!(
        "Tower online. Queue file {}, action log {}",
        session.store().path().display(),
        session.log().path().display()
    );

    let config = rustyline::Config::builder()
        .history_ignore_space(true)
        .completion_type(rustyline::CompletionType::List)
        .build();

    let helper = CompleteHelper {
        commands: [
            "enqueue", "land", "peek", "free", "ls", "save", "load", "cancel", "rebuild", "log",
            "menu", "help", "exit",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect(),
    };

    let mut rl: Console = Editor::with_config(config)?;
    rl.set_helper(Some(helper));
    print_menu();

    loop {
        let readline = rl.readline(">> ");
        match readline {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() { continue; }

                rl.add_history_entry(trimmed)?;

                let parts: Vec<&str> = trimmed.split_whitespace().collect();
                match parts[0] {
                    "1" | "enqueue" => enqueue(&mut rl, &mut session, &parts),
                    "2" | "land" => match session.land() {
                        Ok(plane) => {
                            println!("{} {}", "Cleared for landing:".green(), describe(&plane));
                            if plane.is_canceled() {
                                println!("{}", "Note: this plane's landing clearance was canceled.".yellow());
                            }
                            if session.runway_free() {
                                println!("All planes have landed. The queue is now empty.");
                            }
                        }
                        Err(e) => println!("{}", e),
                    },
                    "3" | "peek" => match session.next_to_land() {
                        Ok(plane) => println!("Next plane to land: {}", describe(plane)),
                        Err(e) => println!("{}", e),
                    },
                    "4" | "free" => {
                        if session.runway_free() {
                            println!("{}", "Runway is free.".green());
                        } else {
                            println!("Runway is occupied. {} planes waiting.", session.pool().len());
                        }
                    },
                    "5" | "ls" => list(&session),
                    "6" | "save" => match session.save() {
                        Ok(n) => println!("Queue saved to {} ({} planes).", session.store().path().display(), n),
                        Err(e) => println!("{} {}", "Error saving queue:".yellow(), e),
                    },
                    "7" | "load" => match session.load() {
                        Ok(n) => println!("Queue loaded from {} ({} planes).", session.store().path().display(), n),
                        Err(e) => println!("{} {}", "Error loading queue:".yellow(), e),
                    },
                    "8" | "cancel" => {
                        let id = match parts.get(1) {
                            Some(raw) => match raw.parse::<PlaneId>() {
                                Ok(id) => Some(id),
                                Err(e) => {
                                    println!("{} {}", "Invalid input.".yellow(), e);
                                    None
                                }
                            },
                            None => prompt(&mut rl, "Enter the ID of the plane to cancel: ", |s| s.parse::<PlaneId>()),
                        };
                        if let Some(id) = id {
                            match session.cancel(id) {
                                Ok(_) => println!("Plane {}'s landing clearance has been canceled.", id),
                                Err(e) => println!("{}", e),
                            }
                        }
                    },
                    "9" | "rebuild" => {
                        session.rebuild();
                        println!("Queue re-ordered.");
                    },
                    "log" => show_log(&session, &parts),
                    "menu" | "help" | "?" => print_menu(),
                    "10" | "exit" | "quit" => {
                        println!("Exiting Airport Runway Management.");
                        break;
                    },
                    _ => println!("Unknown command: {}", parts[0]),
                }
                report_log_failures(&mut session);
            },
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            },
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            },
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    Ok(())
}
