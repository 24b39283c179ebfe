use anstream::println;
use anyhow::Result;

use pypicloud_normalize::normalize_name;

use crate::commands::ExitStatus;

/// Print the normalized form of each name, one per line.
pub(crate) fn normalize(names: &[String]) -> Result<ExitStatus> {
    for name in names {
        println!("{}", normalize_name(name));
    }
    Ok(ExitStatus::Success)
}
