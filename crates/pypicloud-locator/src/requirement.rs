use std::fmt::{Display, Formatter};
use std::str::FromStr;

use pep440_rs::VersionSpecifiersParseError;
use thiserror::Error;

use pypicloud_normalize::PackageName;

use crate::specifiers::LenientVersionSpecifiers;
use crate::version::ReleaseVersion;

/// A project name with optional version specifiers, e.g. `requests>=2.0,<3` or
/// `Foo_Bar (==1.0)`.
///
/// Extras (`name[extra]`) are accepted and ignored: they don't affect which release is located.
/// Specifiers are parsed leniently, so legacy constraints like `(==2004d)` are accepted too.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub name: PackageName,
    pub specifiers: Option<LenientVersionSpecifiers>,
}

impl Requirement {
    /// Returns `true` if `version` satisfies the version specifiers.
    pub fn contains(&self, version: &ReleaseVersion) -> bool {
        self.specifiers
            .as_ref()
            .is_none_or(|specifiers| specifiers.contains(version))
    }
}

impl FromStr for Requirement {
    type Err = RequirementError;

    fn from_str(requirement: &str) -> Result<Self, Self::Err> {
        let trimmed = requirement.trim();
        let end = trimmed
            .find(|char: char| !(char.is_ascii_alphanumeric() || matches!(char, '-' | '_' | '.')))
            .unwrap_or(trimmed.len());
        let (name, rest) = trimmed.split_at(end);
        if name.is_empty() {
            return Err(RequirementError::MissingName(requirement.to_string()));
        }

        let mut rest = rest.trim_start();
        if let Some(extras) = rest.strip_prefix('[') {
            let Some((_, after)) = extras.split_once(']') else {
                return Err(RequirementError::UnterminatedExtras(requirement.to_string()));
            };
            rest = after.trim_start();
        }
        if let Some(parenthesized) = rest.strip_prefix('(') {
            let Some(inner) = parenthesized.trim_end().strip_suffix(')') else {
                return Err(RequirementError::UnterminatedParenthesis(
                    requirement.to_string(),
                ));
            };
            rest = inner;
        }

        let rest = rest.trim();
        let specifiers = if rest.is_empty() {
            None
        } else {
            Some(
                LenientVersionSpecifiers::from_str(rest)
                    .map_err(|err| RequirementError::Specifiers(requirement.to_string(), err))?,
            )
        };

        Ok(Self {
            name: PackageName::new(name),
            specifiers,
        })
    }
}

impl Display for Requirement {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(specifiers) = &self.specifiers {
            write!(f, "{specifiers}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum RequirementError {
    #[error("Requirement `{0}` must start with a project name")]
    MissingName(String),
    #[error("Requirement `{0}` has an unterminated extras list")]
    UnterminatedExtras(String),
    #[error("Requirement `{0}` has an unterminated parenthesis")]
    UnterminatedParenthesis(String),
    #[error("Requirement `{0}` has invalid version specifiers")]
    Specifiers(String, #[source] VersionSpecifiersParseError),
}
