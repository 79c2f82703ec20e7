//! CLI entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `birthdaybook_core` linkage.
//! - List and edit a local SQLite roster for quick manual checks.

use birthdaybook_core::db::open_db;
use birthdaybook_core::{
    init_logging, NewPerson, RosterConfig, RosterEntry, RosterError, RosterService, RosterStore,
    SqlitePersonRepository, SystemClock,
};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "birthdaybook", version, about = "Birthday countdown roster")]
struct Cli {
    /// Absolute directory for rolling log files.
    #[arg(long, global = true)]
    log_dir: Option<String>,

    /// Log level used with `--log-dir`.
    #[arg(long, global = true, default_value = birthdaybook_core::default_log_level())]
    log_level: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print people ordered by days until their next birthday.
    List { db: PathBuf },
    /// Add a person.
    Add {
        db: PathBuf,
        name: String,
        day: u8,
        month: u8,
    },
    /// Remove a person by id.
    Remove { db: PathBuf, id: Uuid },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        if let Err(err) = init_logging(&cli.log_level, log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let Some(command) = cli.command else {
        println!("birthdaybook_core ping={}", birthdaybook_core::ping());
        println!("birthdaybook_core version={}", birthdaybook_core::core_version());
        return ExitCode::SUCCESS;
    };

    match run(command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), String> {
    match command {
        Command::List { db } => {
            let mut service = open_service(&db)?;
            print_roster(&service.snapshot());
        }
        Command::Add {
            db,
            name,
            day,
            month,
        } => {
            let mut service = open_service(&db)?;
            let draft = NewPerson::new(name, day, month).map_err(|err| err.to_string())?;
            let person = service.add_person(&draft).map_err(describe)?;
            println!("added {}", person.id);
            print_roster(&service.snapshot());
        }
        Command::Remove { db, id } => {
            let mut service = open_service(&db)?;
            let removed = service.delete_person(id).map_err(describe)?;
            println!("{} {id}", if removed { "removed" } else { "absent" });
        }
    }
    Ok(())
}

fn open_service(
    db: &Path,
) -> Result<RosterService<SqlitePersonRepository, SystemClock>, String> {
    let conn = open_db(db).map_err(|err| format!("cannot open {}: {err}", db.display()))?;
    let repo = SqlitePersonRepository::try_new(conn).map_err(|err| err.to_string())?;
    let roster = RosterStore::from_config(SystemClock, &RosterConfig::from_env());
    let mut service = RosterService::new(repo, roster);
    service.refresh().map_err(describe)?;
    Ok(service)
}

fn describe(err: RosterError) -> String {
    if err.needs_resync() {
        format!("{err} (roster out of sync; run `list` to reload)")
    } else {
        err.to_string()
    }
}

fn print_roster(entries: &[RosterEntry]) {
    if entries.is_empty() {
        println!("no people yet");
        return;
    }
    for entry in entries {
        let unit = if entry.remaining_days == 1 { "day " } else { "days" };
        println!(
            "{:>3} {unit}  {:02}/{:02}  {}  {}",
            entry.remaining_days,
            entry.person.day,
            entry.person.month,
            entry.person.name,
            entry.person.id
        );
    }
}
