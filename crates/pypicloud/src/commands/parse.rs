use anstream::{eprintln, println};
use anyhow::Result;
use owo_colors::OwoColorize;

use pypicloud_filename::parse_filename;

use crate::commands::ExitStatus;

/// Print the name and version parsed from a distribution filename.
pub(crate) fn parse(filename: &str, name: Option<&str>) -> Result<ExitStatus> {
    match parse_filename(filename, name) {
        Ok(parsed) => {
            println!("{} {}", parsed.name, parsed.version);
            Ok(ExitStatus::Success)
        }
        Err(err) => {
            eprintln!("{}: {err}", "error".red().bold());
            Ok(ExitStatus::Failure)
        }
    }
}
