use std::fmt;
use std::str::FromStr;

use anstream::ColorChoice;
use anyhow::Context;
use jiff::Timestamp;
use owo_colors::OwoColorize;
use tracing::{Event, Subscriber};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Show warnings and errors by default (overridable by `RUST_LOG`).
    #[default]
    Default,
    /// Show debug messages by default (overridable by `RUST_LOG`).
    Verbose,
    /// Show trace messages, with timestamps, by default (overridable by `RUST_LOG`).
    ExtraVerbose,
}

impl Level {
    /// The verbosity level for a count of `-v` flags.
    pub fn from_verbosity(verbose: u8) -> Self {
        match verbose {
            0 => Self::Default,
            1 => Self::Verbose,
            _ => Self::ExtraVerbose,
        }
    }
}

/// The style of a pypicloud logging line: `[timestamp] LEVEL [target:] message`.
///
/// The level is always shown, colored when stderr supports it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PypicloudFormat {
    pub display_timestamp: bool,
    pub display_target: bool,
}

impl From<Level> for PypicloudFormat {
    fn from(level: Level) -> Self {
        match level {
            Level::Default => Self::default(),
            Level::Verbose => Self {
                display_timestamp: false,
                display_target: true,
            },
            Level::ExtraVerbose => Self {
                display_timestamp: true,
                display_target: true,
            },
        }
    }
}

impl<S, N> FormatEvent<S, N> for PypicloudFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();
        let ansi = writer.has_ansi_escapes();

        if self.display_timestamp {
            let now = Timestamp::now();
            if ansi {
                write!(writer, "{} ", now.dimmed())?;
            } else {
                write!(writer, "{now} ")?;
            }
        }

        let level = meta.level();
        if ansi {
            match *level {
                tracing::Level::TRACE => write!(writer, "{} ", level.purple())?,
                tracing::Level::DEBUG => write!(writer, "{} ", level.blue())?,
                tracing::Level::INFO => write!(writer, "{} ", level.green())?,
                tracing::Level::WARN => write!(writer, "{} ", level.yellow())?,
                tracing::Level::ERROR => write!(writer, "{} ", level.red())?,
            }
        } else {
            write!(writer, "{level} ")?;
        }

        if self.display_target {
            if ansi {
                write!(writer, "{}: ", meta.target().bold())?;
            } else {
                write!(writer, "{}: ", meta.target())?;
            }
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Configure `tracing` based on the given [`Level`], taking into account the `RUST_LOG`
/// environment variable.
///
/// The [`Level`] dictates the default filters (which can be overridden by `RUST_LOG`) along
/// with the formatting of the output.
pub fn setup_logging(level: Level) -> anyhow::Result<()> {
    let default_directive = match level {
        Level::Default => tracing::level_filters::LevelFilter::WARN.into(),
        Level::Verbose => Directive::from_str("pypicloud=debug")?,
        Level::ExtraVerbose => Directive::from_str("pypicloud=trace")?,
    };

    let filter = EnvFilter::builder()
        .with_default_directive(default_directive)
        .from_env()
        .context("Invalid RUST_LOG directives")?;

    let format = PypicloudFormat::from(level);

    let ansi = match anstream::Stderr::choice(&std::io::stderr()) {
        ColorChoice::Always | ColorChoice::AlwaysAnsi => true,
        ColorChoice::Never => false,
        // We just asked anstream for a choice, that can't be auto
        ColorChoice::Auto => unreachable!(),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_writer(std::io::stderr)
                .with_ansi(ansi)
                .with_filter(filter),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture(format: PypicloudFormat, emit: impl FnOnce()) -> String {
        let buffer = Buffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::TRACE)
            .event_format(format)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, emit);
        let bytes = buffer.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn level_and_message() {
        let output = capture(PypicloudFormat::default(), || {
            tracing::warn!("Using deprecated option `a` (replaced by `b`)");
        });
        assert_eq!(output, "WARN Using deprecated option `a` (replaced by `b`)\n");
    }

    #[test]
    fn target() {
        let output = capture(PypicloudFormat::from(Level::Verbose), || {
            tracing::debug!(target: "pypicloud_locator", "Fetching: https://pypi.org/simple/foo/");
        });
        assert_eq!(
            output,
            "DEBUG pypicloud_locator: Fetching: https://pypi.org/simple/foo/\n"
        );
    }

    #[test]
    fn format_for_level() {
        assert_eq!(PypicloudFormat::from(Level::Default), PypicloudFormat::default());
        assert!(!PypicloudFormat::from(Level::Verbose).display_timestamp);
        assert!(PypicloudFormat::from(Level::ExtraVerbose).display_timestamp);
    }

    #[test]
    fn verbosity() {
        assert_eq!(Level::from_verbosity(0), Level::Default);
        assert_eq!(Level::from_verbosity(1), Level::Verbose);
        assert_eq!(Level::from_verbosity(3), Level::ExtraVerbose);
    }
}
