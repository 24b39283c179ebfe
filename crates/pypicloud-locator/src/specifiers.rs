use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::LazyLock;

use pep440_rs::{Operator, VersionSpecifier, VersionSpecifiers, VersionSpecifiersParseError};
use regex::Regex;
use tracing::warn;

use crate::version::{LegacyVersion, ReleaseVersion};

/// `>=3.6.*` and friends: a wildcard on an ordered comparison.
static ORDERED_WILDCARD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(>=|<=|>|<)\s*(\d+(?:\.\d+)*)\.\*").unwrap());
/// `!=3.0*`: a wildcard without the separating dot.
static MISSING_WILDCARD_DOT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(==|!=)\s*(\d+(?:\.\d+)*)\*").unwrap());
static TRAILING_COMMA: LazyLock<Regex> = LazyLock::new(|| Regex::new(r",\s*$").unwrap());
static NUMERIC_PREFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+(?:\.\d+)*").unwrap());

/// Like [`VersionSpecifiers`], but tolerant of what indexes and users actually write.
///
/// Common mistakes (`>=3.6.*`, `!=3.0*`, a trailing comma) are corrected. Specifiers that still
/// aren't PEP 440, like `==2004d`, are kept as legacy comparisons evaluated on legacy sort keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LenientVersionSpecifiers {
    Pep440(VersionSpecifiers),
    Legacy(Vec<LegacySpecifier>),
}

impl LenientVersionSpecifiers {
    /// Returns `true` if `version` satisfies every specifier.
    ///
    /// PEP 440 versions are checked against PEP 440 specifiers directly. As soon as either side
    /// is legacy, both are compared by their legacy sort keys.
    pub fn contains(&self, version: &ReleaseVersion) -> bool {
        match (self, version) {
            (Self::Pep440(specifiers), ReleaseVersion::Pep440(version)) => {
                specifiers.contains(version)
            }
            (Self::Pep440(specifiers), ReleaseVersion::Legacy(version)) => specifiers
                .iter()
                .map(LegacySpecifier::from)
                .all(|specifier| specifier.contains(version)),
            (Self::Legacy(specifiers), version) => {
                let version = version.to_legacy();
                specifiers
                    .iter()
                    .all(|specifier| specifier.contains(&version))
            }
        }
    }
}

impl FromStr for LenientVersionSpecifiers {
    type Err = VersionSpecifiersParseError;

    fn from_str(specifiers: &str) -> Result<Self, Self::Err> {
        let err = match VersionSpecifiers::from_str(specifiers) {
            Ok(specifiers) => return Ok(Self::Pep440(specifiers)),
            Err(err) => err,
        };

        let patched = ORDERED_WILDCARD.replace_all(specifiers, "$1$2");
        let patched = MISSING_WILDCARD_DOT.replace_all(&patched, "$1$2.*");
        let patched = TRAILING_COMMA.replace(&patched, "");
        if patched != specifiers {
            if let Ok(corrected) = VersionSpecifiers::from_str(&patched) {
                warn!(
                    "Correcting invalid version specifier (before: `{specifiers}`; after: `{patched}`)"
                );
                return Ok(Self::Pep440(corrected));
            }
        }

        let legacy = patched
            .split(',')
            .map(LegacySpecifier::parse)
            .collect::<Option<Vec<_>>>();
        match legacy {
            Some(legacy) if !legacy.is_empty() => Ok(Self::Legacy(legacy)),
            _ => Err(err),
        }
    }
}

impl Display for LenientVersionSpecifiers {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pep440(specifiers) => write!(f, "{specifiers}"),
            Self::Legacy(specifiers) => {
                for (index, specifier) in specifiers.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{specifier}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<VersionSpecifiers> for LenientVersionSpecifiers {
    fn from(specifiers: VersionSpecifiers) -> Self {
        Self::Pep440(specifiers)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LegacyOperator {
    Equal,
    EqualPrefix,
    NotEqual,
    NotEqualPrefix,
    Compatible,
    LessThan,
    LessThanEqual,
    GreaterThan,
    GreaterThanEqual,
}

/// A single comparison such as `>=2004d`, evaluated on legacy sort keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacySpecifier {
    operator: LegacyOperator,
    version: LegacyVersion,
}

impl LegacySpecifier {
    fn parse(specifier: &str) -> Option<Self> {
        let specifier = specifier.trim();
        let (operator, version) = [
            ("===", LegacyOperator::Equal),
            ("==", LegacyOperator::Equal),
            ("!=", LegacyOperator::NotEqual),
            ("~=", LegacyOperator::Compatible),
            ("<=", LegacyOperator::LessThanEqual),
            (">=", LegacyOperator::GreaterThanEqual),
            ("<", LegacyOperator::LessThan),
            (">", LegacyOperator::GreaterThan),
        ]
        .into_iter()
        .find_map(|(prefix, operator)| {
            specifier
                .strip_prefix(prefix)
                .map(|version| (operator, version.trim()))
        })?;

        let (operator, version) = match (operator, version.strip_suffix(".*")) {
            (LegacyOperator::Equal, Some(prefix)) => (LegacyOperator::EqualPrefix, prefix),
            (LegacyOperator::NotEqual, Some(prefix)) => (LegacyOperator::NotEqualPrefix, prefix),
            _ => (operator, version),
        };
        let valid = !version.is_empty()
            && version.chars().all(|char| {
                char.is_ascii_alphanumeric() || matches!(char, '.' | '-' | '_' | '+' | '!')
            });
        valid.then(|| Self {
            operator,
            version: LegacyVersion::new(version),
        })
    }

    fn contains(&self, version: &LegacyVersion) -> bool {
        match self.operator {
            LegacyOperator::Equal => *version == self.version,
            LegacyOperator::EqualPrefix => version.matches_prefix(self.version.as_str()),
            LegacyOperator::NotEqual => *version != self.version,
            LegacyOperator::NotEqualPrefix => !version.matches_prefix(self.version.as_str()),
            LegacyOperator::LessThan => *version < self.version,
            LegacyOperator::LessThanEqual => *version <= self.version,
            LegacyOperator::GreaterThan => *version > self.version,
            LegacyOperator::GreaterThanEqual => *version >= self.version,
            LegacyOperator::Compatible => {
                if *version < self.version {
                    return false;
                }
                let Some(numeric) = NUMERIC_PREFIX.find(self.version.as_str()) else {
                    warn!(
                        "Cannot compute compatible match for version {version} and constraint {}",
                        self.version
                    );
                    return true;
                };
                let numeric = numeric.as_str();
                let prefix = numeric
                    .rsplit_once('.')
                    .map_or(numeric, |(prefix, _)| prefix);
                version.matches_prefix(prefix)
            }
        }
    }
}

impl From<&VersionSpecifier> for LegacySpecifier {
    fn from(specifier: &VersionSpecifier) -> Self {
        let operator = match specifier.operator() {
            Operator::Equal | Operator::ExactEqual => LegacyOperator::Equal,
            Operator::EqualStar => LegacyOperator::EqualPrefix,
            Operator::NotEqual => LegacyOperator::NotEqual,
            Operator::NotEqualStar => LegacyOperator::NotEqualPrefix,
            Operator::TildeEqual => LegacyOperator::Compatible,
            Operator::LessThan => LegacyOperator::LessThan,
            Operator::LessThanEqual => LegacyOperator::LessThanEqual,
            Operator::GreaterThan => LegacyOperator::GreaterThan,
            Operator::GreaterThanEqual => LegacyOperator::GreaterThanEqual,
        };
        Self {
            operator,
            version: LegacyVersion::new(&specifier.version().to_string()),
        }
    }
}

impl Display for LegacySpecifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let (operator, suffix) = match self.operator {
            LegacyOperator::Equal => ("==", ""),
            LegacyOperator::EqualPrefix => ("==", ".*"),
            LegacyOperator::NotEqual => ("!=", ""),
            LegacyOperator::NotEqualPrefix => ("!=", ".*"),
            LegacyOperator::Compatible => ("~=", ""),
            LegacyOperator::LessThan => ("<", ""),
            LegacyOperator::LessThanEqual => ("<=", ""),
            LegacyOperator::GreaterThan => (">", ""),
            LegacyOperator::GreaterThanEqual => (">=", ""),
        };
        write!(f, "{operator}{}{suffix}", self.version)
    }
}
