use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// A recognized distribution archive extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DistExtension {
    TarGz,
    TarBz2,
    Tar,
    Zip,
    Tgz,
    Tbz,
    Egg,
    Exe,
    Whl,
}

impl DistExtension {
    /// Every recognized extension, source distributions first, in matching order.
    pub const ALL: [Self; 9] = [
        Self::TarGz,
        Self::TarBz2,
        Self::Tar,
        Self::Zip,
        Self::Tgz,
        Self::Tbz,
        Self::Egg,
        Self::Exe,
        Self::Whl,
    ];

    /// The filename suffix, including the leading dot.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::TarGz => ".tar.gz",
            Self::TarBz2 => ".tar.bz2",
            Self::Tar => ".tar",
            Self::Zip => ".zip",
            Self::Tgz => ".tgz",
            Self::Tbz => ".tbz",
            Self::Egg => ".egg",
            Self::Exe => ".exe",
            Self::Whl => ".whl",
        }
    }

    pub fn is_source(self) -> bool {
        matches!(
            self,
            Self::TarGz | Self::TarBz2 | Self::Tar | Self::Zip | Self::Tgz | Self::Tbz
        )
    }

    pub fn is_wheel(self) -> bool {
        matches!(self, Self::Whl)
    }

    /// Returns `true` if an index link with this extension is a download candidate.
    ///
    /// Eggs and Windows installers are recognized as distributions but never downloaded.
    pub fn is_downloadable(self) -> bool {
        self.is_source() || self.is_wheel()
    }

    /// Return the first extension in [`DistExtension::ALL`] that `filename` ends with.
    pub fn from_filename(filename: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|extension| filename.ends_with(extension.suffix()))
    }
}

impl Display for DistExtension {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.suffix())
    }
}
