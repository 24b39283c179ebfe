use std::process::ExitCode;

pub(crate) use locate::locate;
pub(crate) use normalize::normalize;
pub(crate) use parse::parse;
pub(crate) use time::{dt2ts, ts2dt};

mod locate;
mod normalize;
mod parse;
mod time;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum ExitStatus {
    /// The command succeeded.
    Success,

    /// The command failed due to an error in the user input, or found nothing.
    Failure,

    /// The command failed with an unexpected error.
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => Self::from(0),
            ExitStatus::Failure => Self::from(1),
            ExitStatus::Error => Self::from(2),
        }
    }
}
