use std::cmp::Ordering;
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use pep440_rs::Version;

/// The last part of every legacy sort key. Alphabetic parts that sort before it mark a
/// pre-release.
const FINAL: &str = "*final";

/// The version of a release found on an index.
///
/// Indexes list plenty of files whose versions predate PEP 440 (`2004d`, `1.0-foo`). Versions
/// that parse as PEP 440 are compared as such; anything else is kept as a [`LegacyVersion`],
/// which sorts before every PEP 440 version.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReleaseVersion {
    Legacy(LegacyVersion),
    Pep440(Version),
}

impl ReleaseVersion {
    /// Parse a version, falling back to the legacy scheme. Never fails.
    pub fn parse(version: &str) -> Self {
        match Version::from_str(version) {
            Ok(version) => Self::Pep440(version),
            Err(_) => Self::Legacy(LegacyVersion::new(version)),
        }
    }

    pub fn is_prerelease(&self) -> bool {
        match self {
            Self::Legacy(version) => version.is_prerelease(),
            Self::Pep440(version) => version.any_prerelease(),
        }
    }

    pub fn as_pep440(&self) -> Option<&Version> {
        match self {
            Self::Legacy(_) => None,
            Self::Pep440(version) => Some(version),
        }
    }

    /// The version under the legacy scheme, for comparison against legacy specifiers.
    pub fn to_legacy(&self) -> LegacyVersion {
        match self {
            Self::Legacy(version) => version.clone(),
            Self::Pep440(version) => LegacyVersion::new(&version.to_string()),
        }
    }
}

impl FromStr for ReleaseVersion {
    type Err = Infallible;

    fn from_str(version: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(version))
    }
}

impl Display for ReleaseVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Legacy(version) => version.fmt(f),
            Self::Pep440(version) => version.fmt(f),
        }
    }
}

impl From<Version> for ReleaseVersion {
    fn from(version: Version) -> Self {
        Self::Pep440(version)
    }
}

/// A version compared by its legacy (setuptools-style) sort key.
///
/// The key splits the lowercased version into runs of digits, runs of letters, and other
/// characters. Numbers are zero-padded to eight digits, everything else is prefixed with `*`,
/// and `pre`, `preview` and `rc` sort as `c`, `dev` as `@`. Trailing zeros are dropped before
/// each alphabetic part, so `1.0` and `1` compare equal.
#[derive(Debug, Clone)]
pub struct LegacyVersion {
    version: String,
    key: Vec<String>,
}

impl LegacyVersion {
    pub fn new(version: &str) -> Self {
        Self {
            version: version.to_string(),
            key: legacy_key(version),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.version
    }

    /// Returns `true` if any alphabetic part sorts before `final`, e.g. `1.0a`, `2004d`, or
    /// `1.0.dev1`.
    pub fn is_prerelease(&self) -> bool {
        self.key
            .iter()
            .any(|part| part.starts_with('*') && part.as_str() < FINAL)
    }

    /// Returns `true` if the version is `prefix`, or starts with `prefix` followed by a `.`.
    pub(crate) fn matches_prefix(&self, prefix: &str) -> bool {
        self.version
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
    }
}

impl PartialEq for LegacyVersion {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for LegacyVersion {}

impl PartialOrd for LegacyVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LegacyVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl Hash for LegacyVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl Display for LegacyVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.version)
    }
}

fn legacy_key(version: &str) -> Vec<String> {
    let mut key: Vec<String> = Vec::new();
    for part in legacy_parts(&version.to_lowercase()) {
        if part.starts_with('*') {
            if part.as_str() < FINAL {
                while key.last().is_some_and(|last| last == "*final-") {
                    key.pop();
                }
            }
            while key.last().is_some_and(|last| last == "00000000") {
                key.pop();
            }
        }
        key.push(part);
    }
    key
}

fn legacy_parts(version: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut rest = version;
    while let Some(first) = rest.chars().next() {
        let end = if first.is_ascii_digit() {
            rest.find(|char: char| !char.is_ascii_digit())
        } else if first.is_ascii_alphabetic() {
            rest.find(|char: char| !char.is_ascii_alphabetic())
        } else if matches!(first, '.' | '-') {
            Some(1)
        } else {
            rest.find(|char: char| char.is_ascii_alphanumeric() || matches!(char, '.' | '-'))
        };
        let (token, tail) = rest.split_at(end.unwrap_or(rest.len()));
        rest = tail;

        let token = match token {
            "pre" | "preview" | "rc" => "c",
            "dev" => "@",
            "-" => "final-",
            "." => continue,
            token => token,
        };
        if token.starts_with(|char: char| char.is_ascii_digit()) {
            parts.push(format!("{token:0>8}"));
        } else {
            parts.push(format!("*{token}"));
        }
    }
    parts.push(FINAL.to_string());
    parts
}
