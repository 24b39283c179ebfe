use std::fmt::{Display, Formatter};
use std::str::FromStr;

use thiserror::Error;

use pypicloud_normalize::PackageName;

/// A parsed wheel filename, per the binary distribution format.
///
/// See: <https://packaging.python.org/en/latest/specifications/binary-distribution-format/#file-name-convention>
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct WheelFilename {
    pub name: PackageName,
    /// The version, exactly as spelled in the filename.
    pub version: String,
    pub build_tag: Option<String>,
    pub python_tag: Vec<String>,
    pub abi_tag: Vec<String>,
    pub platform_tag: Vec<String>,
}

impl FromStr for WheelFilename {
    type Err = WheelFilenameError;

    fn from_str(filename: &str) -> Result<Self, Self::Err> {
        let basename = filename.strip_suffix(".whl").ok_or_else(|| {
            WheelFilenameError::InvalidWheelFileName(
                filename.to_string(),
                "Must end with .whl".to_string(),
            )
        })?;

        // The wheel filename should contain either five or six entries. If six, then the third
        // entry is the build tag. If five, then the third entry is the Python tag.
        let parts = basename.split('-').collect::<Vec<_>>();
        let (name, version, build_tag, python_tag, abi_tag, platform_tag) = match parts[..] {
            [name, version, python_tag, abi_tag, platform_tag] => {
                (name, version, None, python_tag, abi_tag, platform_tag)
            }
            [name, version, build_tag, python_tag, abi_tag, platform_tag] => (
                name,
                version,
                Some(build_tag),
                python_tag,
                abi_tag,
                platform_tag,
            ),
            [] | [_] => return Err(WheelFilenameError::missing(filename, "a version")),
            [_, _] => return Err(WheelFilenameError::missing(filename, "a Python tag")),
            [_, _, _] => return Err(WheelFilenameError::missing(filename, "an ABI tag")),
            [_, _, _, _] => return Err(WheelFilenameError::missing(filename, "a platform tag")),
            _ => {
                return Err(WheelFilenameError::InvalidWheelFileName(
                    filename.to_string(),
                    "Must have 5 or 6 components, but has more".to_string(),
                ));
            }
        };

        if name.is_empty() {
            return Err(WheelFilenameError::missing(filename, "a name"));
        }
        if version.is_empty() {
            return Err(WheelFilenameError::missing(filename, "a version"));
        }

        Ok(Self {
            name: PackageName::new(name),
            version: version.to_string(),
            build_tag: build_tag.map(ToString::to_string),
            python_tag: python_tag.split('.').map(String::from).collect(),
            abi_tag: abi_tag.split('.').map(String::from).collect(),
            platform_tag: platform_tag.split('.').map(String::from).collect(),
        })
    }
}

impl WheelFilename {
    /// The Python versions the wheel targets (e.g., `2.7` for `py27` or `cp27`), comma-separated.
    pub fn python_version(&self) -> String {
        self.python_tag
            .iter()
            .map(|tag| {
                let digits = tag.get(2..).unwrap_or_default();
                let mut chars = digits.chars();
                match (chars.next(), chars.as_str()) {
                    (Some(major), "") => major.to_string(),
                    (Some(major), minor) => format!("{major}.{minor}"),
                    (None, _) => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Get the tag for this wheel.
    pub fn get_tag(&self) -> String {
        format!(
            "{}-{}-{}",
            self.python_tag.join("."),
            self.abi_tag.join("."),
            self.platform_tag.join(".")
        )
    }
}

impl Display for WheelFilename {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.name, self.version)?;
        if let Some(build_tag) = &self.build_tag {
            write!(f, "-{build_tag}")?;
        }
        write!(f, "-{}.whl", self.get_tag())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WheelFilenameError {
    #[error("The wheel filename \"{0}\" is invalid: {1}")]
    InvalidWheelFileName(String, String),
}

impl WheelFilenameError {
    fn missing(filename: &str, component: &str) -> Self {
        Self::InvalidWheelFileName(filename.to_string(), format!("Must have {component}"))
    }
}
