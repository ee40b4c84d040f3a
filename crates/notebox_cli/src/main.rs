//! Interactive note shell.
//!
//! # Responsibility
//! - Parse startup flags and build the core session.
//! - Read one command per stdin line and print the outcome.
//!
//! # Invariants
//! - A failing command never ends the loop; only EOF or `quit` does.
//! - A failed `--open` load is reported and the shell starts anyway.

mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use commands::{Command, Outcome};
use log::{info, warn};
use notebox_core::{init_logging, LoadMode, NoteSession, SessionConfig};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "notebox", about = "Per-user HTML notes in the terminal", version)]
struct Cli {
    /// User selected at startup
    #[arg(long)]
    user: Option<String>,
    /// Log level: trace|debug|info|warn|error
    #[arg(long)]
    log_level: Option<String>,
    /// Absolute directory for rolling log files; logging is off without it
    #[arg(long)]
    log_dir: Option<PathBuf>,
    /// Note file to load into the startup user
    #[arg(long)]
    open: Option<PathBuf>,
    /// Start without the initial sample note
    #[arg(long)]
    no_seed: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(dir) = cli.log_dir.as_deref() {
        let level = cli
            .log_level
            .as_deref()
            .unwrap_or(notebox_core::default_log_level());
        let dir = dir.to_str().context("log directory must be valid UTF-8")?;
        init_logging(level, dir).context("failed to start logging")?;
    }

    let mut config = SessionConfig::default();
    if let Some(user) = cli.user.as_deref() {
        config = config.with_user(user);
    }
    if cli.no_seed || cli.open.is_some() {
        config = config.without_seed();
    }
    let mut session = NoteSession::new(config);

    if let Some(path) = cli.open.as_deref() {
        for line in open_startup_file(&mut session, path) {
            println!("{line}");
        }
    }

    info!("event=shell_start module=cli status=ok");
    let result = run_shell(&mut session);
    info!(
        "event=shell_exit module=cli status={}",
        if result.is_ok() { "ok" } else { "error" }
    );
    result
}

/// Loads `path` into the startup user; a failure is reported, not fatal.
fn open_startup_file(session: &mut NoteSession, path: &Path) -> Vec<String> {
    match session.load(path, LoadMode::Replace) {
        Ok(count) => vec![format!("Loaded {count} notes from {}", path.display())],
        Err(err) => {
            warn!("event=startup_open module=cli status=error");
            vec![format!(
                "error: failed to open `{}`: {err}; starting empty",
                path.display()
            )]
        }
    }
}

fn run_shell(session: &mut NoteSession) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    print_prompt(&mut stdout, session)?;

    for line in stdin.lock().lines() {
        let line = line.context("failed to read command")?;
        match Command::parse(&line) {
            Ok(None) => {}
            Ok(Some(command)) => match command.execute(session) {
                Ok(Outcome::Continue(lines)) => {
                    for line in lines {
                        println!("{line}");
                    }
                }
                Ok(Outcome::Quit) => return Ok(()),
                Err(err) => {
                    warn!("event=command module=cli status=error");
                    eprintln!("error: {err}");
                }
            },
            Err(err) => eprintln!("error: {err}"),
        }
        print_prompt(&mut stdout, session)?;
    }
    Ok(())
}

fn print_prompt(stdout: &mut io::Stdout, session: &NoteSession) -> Result<()> {
    write!(stdout, "{}> ", session.current_user_name())?;
    stdout.flush()?;
    Ok(())
}
