use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use pypicloud_normalize::PackageName;

pub use crate::extension::DistExtension;
pub use crate::split::{split_filename, SplitFilename};
pub use crate::wheel::{WheelFilename, WheelFilenameError};

mod extension;
mod split;
mod wheel;

/// The name and version recovered from a distribution filename.
///
/// The name is normalized; the version is kept exactly as it appeared in the filename.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DistFilename {
    pub name: PackageName,
    pub version: String,
    pub extension: DistExtension,
}

impl DistFilename {
    /// Split into the `(name, version)` pair.
    pub fn into_parts(self) -> (PackageName, String) {
        (self.name, self.version)
    }
}

impl Display for DistFilename {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Cannot parse package file '{0}'")]
    InvalidFilename(String),
}

/// Parse a name and version out of a distribution filename.
///
/// The extensions in [`DistExtension::ALL`] are tried in order. Only the first extension that
/// the filename ends with is considered: if the remaining stem can't be split into a name and a
/// version, parsing fails without trying any later extension.
///
/// `name`, if provided, is used as a hint when splitting; the returned name is always the
/// normalized name component that the split produced.
pub fn parse_filename(filename: &str, name: Option<&str>) -> Result<DistFilename, ParseError> {
    let Some(extension) = DistExtension::from_filename(filename) else {
        return Err(ParseError::InvalidFilename(filename.to_string()));
    };
    let stem = &filename[..filename.len() - extension.suffix().len()];

    let Some(split) = split_filename(stem, name) else {
        return Err(ParseError::InvalidFilename(filename.to_string()));
    };

    Ok(DistFilename {
        name: PackageName::from_owned(split.name),
        version: split.version,
        extension,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(filename: &str) -> (String, String) {
        let parsed = parse_filename(filename, None).unwrap();
        (parsed.name.to_string(), parsed.version)
    }

    #[test]
    fn source_dist() {
        assert_eq!(
            parse("requests-2.18.4.tar.gz"),
            ("requests".to_string(), "2.18.4".to_string())
        );
        assert_eq!(
            parse("mypkg-1.1.tar.gz"),
            ("mypkg".to_string(), "1.1".to_string())
        );
        assert_eq!(
            parse("Zope.Interface-4.0.zip"),
            ("zope-interface".to_string(), "4.0".to_string())
        );
    }

    #[test]
    fn wheel() {
        assert_eq!(
            parse("Foo_Bar-1.0-py2-none-any.whl"),
            ("foo-bar".to_string(), "1.0".to_string())
        );
        assert_eq!(
            parse("mypkg-1.1-py2.py3-none-any.whl"),
            ("mypkg".to_string(), "1.1".to_string())
        );
    }

    #[test]
    fn egg() {
        let parsed = parse_filename("setuptools-0.6c11-py2.7.egg", None).unwrap();
        assert_eq!(parsed.name.as_str(), "setuptools");
        assert_eq!(parsed.version, "0.6c11");
        assert_eq!(parsed.extension, DistExtension::Egg);
    }

    #[test]
    fn version_is_verbatim() {
        assert_eq!(
            parse("Django-1.11RC1.tar.gz"),
            ("django".to_string(), "1.11RC1".to_string())
        );
    }

    #[test]
    fn name_hint() {
        let parsed = parse_filename("mypkg-1.1-py2.py3-none-any.whl", Some("mypkg")).unwrap();
        assert_eq!(
            parsed.into_parts(),
            (PackageName::from("mypkg"), "1.1".to_string())
        );

        // The hint disambiguates names that contain a dash followed by a digit.
        let parsed = parse_filename("foo-2-1.0.tar.gz", Some("foo-2")).unwrap();
        assert_eq!(parsed.name.as_str(), "foo-2");
        assert_eq!(parsed.version, "1.0");

        // The returned name comes from the filename, not the hint.
        let parsed = parse_filename("Foo_Bar-1.0.tar.gz", Some("Foo_Bar")).unwrap();
        assert_eq!(parsed.name.as_str(), "foo-bar");
    }

    #[test]
    fn name_hint_mismatch_falls_back() {
        let parsed = parse_filename("other-1.0.tar.gz", Some("mypkg")).unwrap();
        assert_eq!(parsed.name.as_str(), "other");
        assert_eq!(parsed.version, "1.0");
    }

    #[test]
    fn invalid_extension() {
        let err = parse_filename("not-a-package-file.txt", None).unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidFilename("not-a-package-file.txt".to_string())
        );
        assert!(parse_filename("mypkg-1.1.pdf", None).is_err());
    }

    #[test]
    fn invalid_name() {
        let err = parse_filename("invalid_package_name.tar.gz", None).unwrap_err();
        insta::assert_snapshot!(err, @"Cannot parse package file 'invalid_package_name.tar.gz'");
    }

    #[test]
    fn first_matching_extension_wins() {
        // `.tar` precedes `.zip` in the table, but only the suffix that actually matches counts.
        let parsed = parse_filename("pkg-1.0.tar", None).unwrap();
        assert_eq!(parsed.extension, DistExtension::Tar);
        let parsed = parse_filename("pkg-1.0.tar.gz", None).unwrap();
        assert_eq!(parsed.extension, DistExtension::TarGz);
    }
}
