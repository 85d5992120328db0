#![forbid(unsafe_code)]

mod commands;
mod render;

use fd_storage::{SqliteStore, StoreError};
use std::path::PathBuf;

const DEFAULT_DB_DIR: &str = ".fincadesk";

fn usage() -> &'static str {
    "fd_cli — front-desk ticket log for a property office\n\n\
USAGE:\n\
  fd_cli [--db-dir DIR] <COMMAND> [OPTIONS]\n\n\
COMMANDS:\n\
  create      --user NAME --client NAME --reason TEXT\n\
              [--contact TEXT] [--priority P] [--assign NAME]\n\
  note ID     --user NAME [--message TEXT] [--status S]\n\
  close ID    --user NAME [--message TEXT]\n\
  reopen ID   --user NAME\n\
  list        [--all] [--json]        (--all includes closed tickets)\n\
  search TEXT [--json]\n\
  show ID     [--json]\n\
  next-code\n\n\
OPTIONS:\n\
  --db-dir DIR   storage directory (env FINCADESK_DIR, default .fincadesk)\n\
  priorities: normal | urgent | very_urgent\n\
  statuses:   pending | in_progress | awaiting_response | closed\n"
}

#[derive(Debug)]
enum CliError {
    Store(StoreError),
    Usage(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Usage(message) => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<StoreError> for CliError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn main() {
    // Diagnostics go to stderr so command output stays pipeable.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run() {
        match err {
            CliError::Usage(message) => {
                eprintln!("{message}");
                eprintln!();
                eprintln!("{}", usage());
                std::process::exit(2);
            }
            CliError::Store(err) => {
                eprintln!("error: {err}");
                std::process::exit(1);
            }
        }
    }
}

fn run() -> Result<(), CliError> {
    let mut args = std::env::args().skip(1);
    let mut db_dir: Option<PathBuf> = None;
    let mut command: Option<String> = None;
    let mut rest: Vec<String> = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--db-dir" => {
                let Some(value) = args.next() else {
                    return Err(CliError::Usage("--db-dir requires a value".to_string()));
                };
                db_dir = Some(PathBuf::from(value));
            }
            "--help" | "-h" => {
                println!("{}", usage());
                return Ok(());
            }
            _ => {
                if command.is_none() {
                    command = Some(arg);
                } else {
                    rest.push(arg);
                }
            }
        }
    }

    let Some(command) = command else {
        return Err(CliError::Usage("missing command".to_string()));
    };

    let db_dir = db_dir
        .or_else(|| env_var("FINCADESK_DIR").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_DIR));
    let mut store = SqliteStore::open(&db_dir)?;
    tracing::debug!(dir = %store.storage_dir().display(), "store opened");

    match command.as_str() {
        "create" => commands::create(&mut store, &rest),
        "note" => commands::note(&mut store, &rest),
        "close" => commands::close(&mut store, &rest),
        "reopen" => commands::reopen(&mut store, &rest),
        "list" => commands::list(&store, &rest),
        "search" => commands::search(&store, &rest),
        "show" => commands::show(&store, &rest),
        "next-code" => commands::next_code(&store),
        other => Err(CliError::Usage(format!("unknown command: {other}"))),
    }
}
