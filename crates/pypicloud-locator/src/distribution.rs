use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};

use url::Url;

use pypicloud_normalize::PackageName;

use crate::version::ReleaseVersion;

/// A hash advertised in the fragment of an index link (e.g., `#sha256=...`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Digest {
    pub algorithm: String,
    pub value: String,
}

impl Digest {
    /// Parse a `<algorithm>=<hex digest>` URL fragment.
    ///
    /// Only the leading run of lowercase hexadecimal characters is taken as the digest. `#egg=`
    /// fragments name a project rather than a hash, and are ignored.
    pub fn parse_fragment(fragment: &str) -> Option<Self> {
        let (algorithm, value) = fragment.split_once('=')?;
        if algorithm.is_empty()
            || algorithm.eq_ignore_ascii_case("egg")
            || !algorithm
                .chars()
                .all(|char| char.is_alphanumeric() || char == '_')
        {
            return None;
        }
        let end = value
            .find(|char: char| !matches!(char, '0'..='9' | 'a'..='f'))
            .unwrap_or(value.len());
        if end == 0 {
            return None;
        }
        Some(Self {
            algorithm: algorithm.to_string(),
            value: value[..end].to_string(),
        })
    }
}

impl Display for Digest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.algorithm, self.value)
    }
}

/// A release of a project found on the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distribution {
    pub name: PackageName,
    pub version: ReleaseVersion,
    /// The preferred download URL for this release.
    pub source_url: Url,
    /// Every download URL seen for this release.
    pub download_urls: BTreeSet<Url>,
    /// Digests advertised for the download URLs, keyed by URL.
    pub digests: BTreeMap<Url, Digest>,
}

impl Distribution {
    pub(crate) fn new(name: PackageName, version: ReleaseVersion, url: Url) -> Self {
        Self {
            name,
            version,
            download_urls: BTreeSet::from([url.clone()]),
            source_url: url,
            digests: BTreeMap::new(),
        }
    }

    /// The digest of the preferred download, if the index advertised one.
    pub fn digest(&self) -> Option<&Digest> {
        self.digests.get(&self.source_url)
    }
}

impl Display for Distribution {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.version)
    }
}
