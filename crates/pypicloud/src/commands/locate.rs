use std::num::NonZeroUsize;
use std::str::FromStr;

use anstream::{eprintln, println};
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use tracing::debug;
use url::Url;

use pypicloud_locator::{
    Error, PreferWheelLocatorBuilder, Requirement, DEFAULT_CANONICAL_HOST,
};
use pypicloud_retry::RetryPolicy;
use pypicloud_settings::{getdefaults, Settings};

use crate::cli::LocateArgs;
use crate::commands::ExitStatus;

/// The index to scrape when neither the command line nor the settings name one.
const DEFAULT_INDEX_URL: &str = "https://pypi.python.org/simple/";

/// Locate and print the best download for a requirement.
pub(crate) fn locate(args: &LocateArgs, settings: &Settings) -> Result<ExitStatus> {
    let requirement = Requirement::from_str(&args.requirement)?;

    let index_url = match &args.index_url {
        Some(index_url) => index_url.clone(),
        None => {
            let index_url = getdefaults(
                settings,
                &["pypi.fallback_base_url", "pypi.fallback_url"],
                DEFAULT_INDEX_URL,
            );
            Url::parse(index_url)
                .with_context(|| format!("Invalid index URL: `{index_url}`"))?
        }
    };
    let canonical_host = args.canonical_host.as_deref().unwrap_or_else(|| {
        settings
            .get("pypi.canonical_host")
            .unwrap_or(DEFAULT_CANONICAL_HOST)
    });
    let retry = retry_policy(settings)?;

    let locator = PreferWheelLocatorBuilder::new(index_url)
        .canonical_host(canonical_host)
        .user_agent(concat!("pypicloud-util/", env!("CARGO_PKG_VERSION")))
        .build()?;
    debug!(
        "Locating `{requirement}` on {} (tries: {})",
        locator.base_url().as_str(),
        retry.tries()
    );

    let distribution = retry.run_when(Error::is_transient, || {
        locator.locate(&requirement, args.pre, !args.no_wheel)
    })?;

    match distribution {
        Some(distribution) => {
            println!("{} {}", distribution.name, distribution.version);
            println!("{}", distribution.source_url);
            if let Some(digest) = distribution.digest() {
                println!("{digest}");
            }
            Ok(ExitStatus::Success)
        }
        None => {
            eprintln!(
                "{}: No distribution found for `{requirement}`",
                "error".red().bold()
            );
            Ok(ExitStatus::Failure)
        }
    }
}

/// Read the retry policy from the `pypi.retries` setting.
fn retry_policy(settings: &Settings) -> Result<RetryPolicy> {
    let Some(tries) = settings.get("pypi.retries") else {
        return Ok(RetryPolicy::default());
    };
    let tries = NonZeroUsize::from_str(tries.trim())
        .with_context(|| format!("Invalid `pypi.retries` setting: `{tries}`"))?;
    Ok(RetryPolicy::new(tries))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retries_setting() {
        let settings = Settings::default();
        assert_eq!(retry_policy(&settings).unwrap().tries(), 3);

        let settings = Settings::from_iter([("pypi.retries", "5")]);
        assert_eq!(retry_policy(&settings).unwrap().tries(), 5);

        let settings = Settings::from_iter([("pypi.retries", "0")]);
        assert!(retry_policy(&settings).is_err());
    }
}
