use std::time::Duration;

use clap::Subcommand;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tomato_core::storage::MAX_FOCUS_MINUTES;
use tomato_core::{Session, SessionEvent, SessionManager, SessionStatus, SessionType};

use super::Workspace;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start a focus session and run it in the foreground
    Focus {
        /// Length in minutes, up to a day (defaults to focus.default_minutes)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..=MAX_FOCUS_MINUTES))]
        minutes: Option<u64>,
        /// What this session is for
        #[arg(long)]
        goal: Option<String>,
    },
    /// Start a 5-minute break
    Break,
    /// Start a 15-minute break
    LongBreak,
    /// Resume the paused session in the foreground
    Resume,
    /// Complete the paused session now
    Skip,
    /// Cancel the paused session
    Cancel,
    /// Print saved state as JSON
    Status,
}

pub async fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let ws = Workspace::open().await?;

    match action {
        TimerAction::Focus { minutes, goal } => {
            let duration = focus_length(minutes, ws.config.focus_duration())?;
            let events = ws.manager.subscribe();
            ws.manager.start_focus_for(duration, goal);
            run_foreground(&ws.manager, events).await?;
        }
        TimerAction::Break => {
            let events = ws.manager.subscribe();
            ws.manager.start_break();
            run_foreground(&ws.manager, events).await?;
        }
        TimerAction::LongBreak => {
            let events = ws.manager.subscribe();
            ws.manager.start_long_break();
            run_foreground(&ws.manager, events).await?;
        }
        TimerAction::Resume => {
            require_paused(&ws.manager)?;
            let events = ws.manager.subscribe();
            ws.manager.resume();
            run_foreground(&ws.manager, events).await?;
        }
        TimerAction::Skip => {
            require_paused(&ws.manager)?;
            ws.manager.skip();
            print_session(&ws.manager)?;
        }
        TimerAction::Cancel => {
            require_paused(&ws.manager)?;
            ws.manager.cancel();
            print_session(&ws.manager)?;
        }
        TimerAction::Status => {
            println!("{}", serde_json::to_string_pretty(&ws.manager.snapshot())?);
        }
    }

    ws.save().await?;
    Ok(())
}

fn focus_length(
    minutes: Option<u64>,
    default: Duration,
) -> Result<Duration, Box<dyn std::error::Error>> {
    match minutes {
        Some(0) => Err("--minutes must be at least 1".into()),
        Some(m) => Ok(Duration::from_secs(m.saturating_mul(60))),
        None => Ok(default),
    }
}

fn require_paused(manager: &SessionManager) -> Result<(), Box<dyn std::error::Error>> {
    match manager.current_session() {
        Some(s) if s.status() == SessionStatus::Paused => Ok(()),
        _ => Err("no paused session".into()),
    }
}

fn print_session(manager: &SessionManager) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(session) = manager.current_session() {
        println!("{}", serde_json::to_string_pretty(&session)?);
    }
    Ok(())
}

enum Flow {
    Continue,
    Quit,
}

/// Drive the session until it finishes or the user quits.
///
/// Quitting (`q` or Ctrl-C) pauses the session so a later
/// `tomato timer resume` picks it up.
async fn run_foreground(
    manager: &SessionManager,
    mut events: UnboundedReceiver<SessionEvent>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut input = spawn_stdin_reader();
    let mut stdin_open = true;
    let mut stdout = tokio::io::stdout();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    eprintln!("commands: [p]ause/resume  [s]kip  [r]estart  [c]ancel  [q]uit");

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else { break };
                match event {
                    SessionEvent::Tick { remaining, .. } => {
                        let line = countdown_line(manager.current_session().as_ref(), remaining);
                        stdout.write_all(line.as_bytes()).await?;
                        stdout.flush().await?;
                    }
                    SessionEvent::StateChanged { session, current, .. } => {
                        println!("\r{}", describe(&session, current));
                        if current.is_finished() {
                            if current == SessionStatus::Completed {
                                print_next_step(manager, &session);
                            }
                            break;
                        }
                    }
                }
            }
            line = input.recv(), if stdin_open => {
                match line {
                    Some(line) => {
                        if let Flow::Quit = handle_command(manager, line.trim()) {
                            eprintln!("paused; run `tomato timer resume` to continue");
                            break;
                        }
                    }
                    None => stdin_open = false,
                }
            }
            _ = &mut ctrl_c => {
                manager.pause();
                eprintln!("\npaused; run `tomato timer resume` to continue");
                break;
            }
        }
    }
    Ok(())
}

/// Lines from stdin, read on a plain thread so a pending read never holds up
/// runtime shutdown.
fn spawn_stdin_reader() -> UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

fn handle_command(manager: &SessionManager, command: &str) -> Flow {
    match command {
        "p" => match manager.current_session().map(|s| s.status()) {
            Some(SessionStatus::Paused) => manager.resume(),
            _ => manager.pause(),
        },
        "s" => manager.skip(),
        "r" => manager.restart(),
        "c" => manager.cancel(),
        "q" => {
            manager.pause();
            return Flow::Quit;
        }
        "" => {}
        other => eprintln!("unknown command '{other}'"),
    }
    Flow::Continue
}

fn describe(session: &Session, status: SessionStatus) -> String {
    let what = session.session_type().label();
    match status {
        SessionStatus::Running => match session.goal() {
            Some(goal) => format!("{what} running ({}) - {goal}", format_remaining(session.time_remaining())),
            None => format!("{what} running ({})", format_remaining(session.time_remaining())),
        },
        SessionStatus::Paused => format!("{what} paused at {}", format_remaining(session.time_remaining())),
        SessionStatus::Completed => format!("{what} complete"),
        SessionStatus::Cancelled => format!("{what} cancelled"),
        SessionStatus::NotStarted => format!("{what} not started"),
    }
}

/// Single-line countdown, redrawn in place on every tick.
fn countdown_line(session: Option<&Session>, remaining: Duration) -> String {
    match session {
        Some(s) => format!(
            "\r{} {} [{:>3}%] ",
            s.session_type().label(),
            format_remaining(remaining),
            (s.progress() * 100.0).floor() as u32
        ),
        None => format!("\r{} ", format_remaining(remaining)),
    }
}

fn print_next_step(manager: &SessionManager, session: &Session) {
    if session.session_type().is_break() {
        return;
    }
    let cycle = manager.cycle();
    let next = match cycle.next_break_type() {
        SessionType::LongBreak => "tomato timer long-break",
        _ => "tomato timer break",
    };
    println!(
        "{}/4 focus sessions this cycle; next: `{next}`, then `tomato results`",
        cycle.completed_focus_sessions()
    );
}

fn format_remaining(remaining: Duration) -> String {
    let secs = remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0);
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
