use std::process::ExitCode;

use anstream::eprintln;
use anyhow::Result;
use clap::Parser;
use owo_colors::OwoColorize;

use pypicloud_logging::{setup_logging, Level};
use pypicloud_settings::Settings;

use crate::cli::{Cli, Commands};
use crate::commands::ExitStatus;

mod cli;
mod commands;

fn run(cli: Cli) -> Result<ExitStatus> {
    setup_logging(Level::from_verbosity(cli.verbose))?;

    let settings = match &cli.config {
        Some(path) => Settings::read(path)?,
        None => Settings::default(),
    };

    match cli.command {
        Commands::Normalize(args) => commands::normalize(&args.names),
        Commands::Parse(args) => commands::parse(&args.filename, args.name.as_deref()),
        Commands::Locate(args) => commands::locate(&args, &settings),
        Commands::Ts2dt(args) => commands::ts2dt(args.timestamp),
        Commands::Dt2ts(args) => commands::dt2ts(&args.datetime),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(status) => status.into(),
        Err(err) => {
            let mut causes = err.chain();
            eprintln!(
                "{}: {}",
                "error".red().bold(),
                causes.next().map(ToString::to_string).unwrap_or_default()
            );
            for err in causes {
                eprintln!("  {}: {}", "Caused by".red().bold(), err);
            }
            ExitStatus::Error.into()
        }
    }
}
