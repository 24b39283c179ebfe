use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use url::Url;

#[derive(Parser)]
#[command(name = "pypicloud-util", author, version, about)]
#[command(propagate_version = true)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Commands,

    /// Use verbose output.
    ///
    /// You can configure fine-grained logging using the `RUST_LOG` environment variable.
    #[arg(global = true, action = clap::ArgAction::Count, long, short)]
    pub(crate) verbose: u8,

    /// Read settings from the given TOML file.
    #[arg(global = true, long, value_name = "FILE")]
    pub(crate) config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Normalize package names.
    Normalize(NormalizeArgs),
    /// Parse the package name and version out of a distribution filename.
    Parse(ParseArgs),
    /// Locate the best download for a requirement on a package index.
    Locate(LocateArgs),
    /// Convert a float Unix timestamp to a UTC datetime.
    Ts2dt(Ts2dtArgs),
    /// Convert a datetime to a float Unix timestamp.
    Dt2ts(Dt2tsArgs),
}

#[derive(Args)]
pub(crate) struct NormalizeArgs {
    /// The package names to normalize.
    #[arg(required = true)]
    pub(crate) names: Vec<String>,
}

#[derive(Args)]
pub(crate) struct ParseArgs {
    /// The distribution filename, e.g., `requests-2.18.4.tar.gz`.
    pub(crate) filename: String,

    /// The expected package name, used as a hint when splitting the filename.
    #[arg(long)]
    pub(crate) name: Option<String>,
}

#[derive(Args)]
pub(crate) struct LocateArgs {
    /// The requirement to locate, e.g., `requests>=2.0`.
    pub(crate) requirement: String,

    /// The base URL of the "simple" index.
    ///
    /// Defaults to the `pypi.fallback_base_url` setting, or the public index.
    #[arg(long)]
    pub(crate) index_url: Option<Url>,

    /// The host whose links are preferred over mirrors.
    ///
    /// Defaults to the `pypi.canonical_host` setting.
    #[arg(long)]
    pub(crate) canonical_host: Option<String>,

    /// Allow pre-release versions.
    #[arg(long)]
    pub(crate) pre: bool,

    /// Prefer source distributions over wheels.
    #[arg(long)]
    pub(crate) no_wheel: bool,
}

#[derive(Args)]
pub(crate) struct Ts2dtArgs {
    /// Seconds since the Unix epoch.
    #[arg(allow_negative_numbers = true)]
    pub(crate) timestamp: f64,
}

#[derive(Args)]
pub(crate) struct Dt2tsArgs {
    /// An RFC 3339 timestamp (e.g., `2017-07-14T02:40:00Z`) or a zoned datetime (e.g.,
    /// `2017-07-14T04:40:00+02:00[Europe/Paris]`).
    pub(crate) datetime: String,
}
