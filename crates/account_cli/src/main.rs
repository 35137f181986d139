//! Command-line entry point for the account fixture lab.
//!
//! # Responsibility
//! - Print fake accounts, seed the configured database, list stored rows.
//! - Keep output machine-readable (one JSON object per line).
//!
//! # Invariants
//! - `version` and `fake` never depend on database configuration.
//! - Exit code 2 for usage errors, 1 for runtime errors.

use account_core::db::open_db_with_target;
use account_core::{
    core_version, init_logging, AccountFactory, AccountService, ConfigError, CoreConfig,
    SqliteAccountRepository,
};
use log::{info, warn};
use std::error::Error;
use std::io::Write;
use std::process::ExitCode;

const USAGE: &str = "usage: account_cli <version | fake <count> | seed <count> | list>";
const EXIT_RUNTIME_ERROR: u8 = 1;
const EXIT_USAGE_ERROR: u8 = 2;

#[derive(Debug)]
enum Command {
    Version,
    Fake(usize),
    Seed(usize),
    List,
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = CoreConfig::from_env();
    if let Ok(CoreConfig {
        log_level,
        log_dir: Some(log_dir),
        ..
    }) = &config
    {
        if let Err(err) = init_logging(log_level, log_dir) {
            eprintln!("warning: file logging disabled: {err}");
        }
    }

    let mut stdout = std::io::stdout().lock();
    ExitCode::from(execute(&args, config, &mut stdout))
}

/// Runs one invocation and returns the process exit code.
fn execute(args: &[String], config: Result<CoreConfig, ConfigError>, out: &mut impl Write) -> u8 {
    let command = match parse_command(args) {
        Ok(command) => command,
        Err(message) => {
            eprintln!("{message}\n{USAGE}");
            return EXIT_USAGE_ERROR;
        }
    };

    match run(command, config, out) {
        Ok(()) => 0,
        Err(err) => {
            warn!("event=cli_run module=cli status=error error={err}");
            eprintln!("error: {err}");
            EXIT_RUNTIME_ERROR
        }
    }
}

fn parse_command(args: &[String]) -> Result<Command, String> {
    let parse_count = |value: Option<&String>| -> Result<usize, String> {
        let value = value.ok_or_else(|| "missing <count>".to_string())?;
        value.parse().map_err(|_| format!("invalid count `{value}`"))
    };

    match args.first().map(String::as_str) {
        Some("version") => Ok(Command::Version),
        Some("fake") => Ok(Command::Fake(parse_count(args.get(1))?)),
        Some("seed") => Ok(Command::Seed(parse_count(args.get(1))?)),
        Some("list") => Ok(Command::List),
        Some(other) => Err(format!("unknown command `{other}`")),
        None => Err("missing command".to_string()),
    }
}

fn run(
    command: Command,
    config: Result<CoreConfig, ConfigError>,
    out: &mut impl Write,
) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Version => writeln!(out, "account_core version={}", core_version())?,
        Command::Fake(count) => {
            for account in AccountFactory::new().build_batch(count) {
                writeln!(out, "{}", serde_json::to_string(&account.to_dict())?)?;
            }
        }
        Command::Seed(count) => {
            let config = config?;
            let conn = open_db_with_target(&config.database)?;
            let service = AccountService::new(SqliteAccountRepository::try_new(&conn)?);
            for mut account in AccountFactory::new().build_batch(count) {
                service.create(&mut account)?;
            }

            let total = service.count()?;
            info!("event=cli_seed module=cli status=ok created={count} total={total}");
            writeln!(out, "seeded={count} total={total}")?;
        }
        Command::List => {
            let config = config?;
            let conn = open_db_with_target(&config.database)?;
            let service = AccountService::new(SqliteAccountRepository::try_new(&conn)?);
            for account in service.all()? {
                writeln!(out, "{}", serde_json::to_string(&account.to_dict())?)?;
            }
        }
    }

    Ok(())
}
