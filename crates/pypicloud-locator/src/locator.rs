use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;
use std::time::Duration;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use tracing::{debug, instrument, trace, warn};
use url::Url;

use pypicloud_filename::{split_filename, DistExtension, WheelFilename};
use pypicloud_normalize::PackageName;

use crate::html::SimpleHtml;
use crate::score::prefer_url;
use crate::{score_url, Digest, Distribution, Error, ReleaseVersion, Requirement, UrlScore};

/// The host whose links are preferred over those on mirrors.
pub const DEFAULT_CANONICAL_HOST: &str = "pypi.python.org";

/// Characters to percent-encode in a project name used as a URL path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// A builder for a [`PreferWheelLocator`].
#[derive(Debug, Clone)]
pub struct PreferWheelLocatorBuilder {
    base_url: Url,
    canonical_host: String,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl PreferWheelLocatorBuilder {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            canonical_host: DEFAULT_CANONICAL_HOST.to_string(),
            timeout: None,
            user_agent: None,
        }
    }

    #[must_use]
    pub fn canonical_host(mut self, canonical_host: impl Into<String>) -> Self {
        self.canonical_host = canonical_host.into();
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn build(self) -> Result<PreferWheelLocator, Error> {
        let mut client = Client::builder();
        if let Some(timeout) = self.timeout {
            client = client.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            client = client.user_agent(user_agent);
        }
        let client = client.build().map_err(Error::Client)?;

        // Project pages are resolved relative to the base URL, so it must end in a slash.
        let mut base_url = self.base_url;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(PreferWheelLocator {
            client,
            base_url,
            canonical_host: self.canonical_host,
        })
    }
}

/// Locates distributions by scraping a PEP 503 "simple" HTML index.
///
/// When a release offers several downloads, HTTPS links are preferred, then links in the
/// preferred format (wheel or source), then links on the canonical host, then the greatest
/// filename. Project names are matched by normalized equivalence, so an index listing
/// `Foo_Bar-1.0.tar.gz` satisfies a requirement on `foo.bar`.
///
/// All network I/O is blocking.
#[derive(Debug, Clone)]
pub struct PreferWheelLocator {
    client: Client,
    base_url: Url,
    canonical_host: String,
}

/// A download link that belongs to the requested project.
#[derive(Debug, Clone, PartialEq, Eq)]
struct DownloadInfo {
    name: PackageName,
    version: String,
    filename: String,
    /// The download URL, without its fragment.
    url: Url,
    python_version: Option<String>,
    digest: Option<Digest>,
}

impl PreferWheelLocator {
    /// Create a locator for the index at `base_url` with the default settings.
    pub fn new(base_url: Url) -> Result<Self, Error> {
        PreferWheelLocatorBuilder::new(base_url).build()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn canonical_host(&self) -> &str {
        &self.canonical_host
    }

    /// Score a candidate download URL. See [`score_url`].
    pub fn score_url(&self, url: &Url, prefer_wheel: bool) -> UrlScore {
        score_url(url, prefer_wheel, &self.canonical_host)
    }

    /// Find the newest release matching `requirement`.
    ///
    /// Pre-releases are skipped unless `prereleases` is set. Returns `Ok(None)` if the index
    /// has no such project or no release matches.
    ///
    /// Versions that aren't PEP 440 are kept under the legacy scheme (see [`ReleaseVersion`]).
    /// Wheels are not checked against the running interpreter's tags: every wheel on the page
    /// is a candidate.
    #[instrument(skip_all, fields(requirement = %requirement))]
    pub fn locate(
        &self,
        requirement: &Requirement,
        prereleases: bool,
        prefer_wheel: bool,
    ) -> Result<Option<Distribution>, Error> {
        let Some(versions) = self.get_project(&requirement.name, prefer_wheel)? else {
            debug!("No project found for: `{}`", requirement.name);
            return Ok(None);
        };

        let distribution = versions
            .into_values()
            .rev()
            .filter(|distribution| requirement.contains(&distribution.version))
            .find(|distribution| {
                if prereleases || !distribution.version.is_prerelease() {
                    true
                } else {
                    debug!(
                        "Skipping pre-release version {} of {}",
                        distribution.version, requirement.name
                    );
                    false
                }
            });

        match &distribution {
            Some(distribution) => debug!(
                "Located {distribution} at: {}",
                distribution.source_url.as_str()
            ),
            None => debug!("No matching release found for: `{requirement}`"),
        }
        Ok(distribution)
    }

    /// List the project names on the index root page.
    #[instrument(skip_all)]
    pub fn project_names(&self) -> Result<BTreeSet<PackageName>, Error> {
        let Some(text) = self.fetch(&self.base_url)? else {
            return Ok(BTreeSet::new());
        };
        let html = SimpleHtml::parse(&text, &self.base_url)?;
        Ok(html
            .links
            .into_iter()
            .filter(|link| !link.text.is_empty())
            .map(|link| PackageName::from_owned(link.text))
            .collect())
    }

    /// Fetch the releases of a project, keyed by version.
    ///
    /// Returns `Ok(None)` if the index has no page for the project.
    fn get_project(
        &self,
        name: &PackageName,
        prefer_wheel: bool,
    ) -> Result<Option<BTreeMap<ReleaseVersion, Distribution>>, Error> {
        let url = self.project_url(name)?;
        let Some(text) = self.fetch(&url)? else {
            return Ok(None);
        };
        let html = SimpleHtml::parse(&text, &url)?;

        let mut versions = BTreeMap::new();
        for link in html.links {
            let Some(info) = download_info(&link.url, name) else {
                continue;
            };
            self.update_version_data(&mut versions, info, prefer_wheel);
        }
        Ok(Some(versions))
    }

    /// Record a download link against its release, keeping the best-scoring URL as the
    /// release's source URL.
    fn update_version_data(
        &self,
        versions: &mut BTreeMap<ReleaseVersion, Distribution>,
        info: DownloadInfo,
        prefer_wheel: bool,
    ) {
        let version = ReleaseVersion::parse(&info.version);
        if let ReleaseVersion::Legacy(legacy) = &version {
            debug!("Using legacy version `{legacy}` for: {}", info.filename);
        }

        trace!(
            "Found {} {} at {} (python: {})",
            info.name,
            version,
            info.url.as_str(),
            info.python_version.as_deref().unwrap_or("any")
        );

        let distribution = versions
            .entry(version.clone())
            .or_insert_with(|| Distribution::new(info.name.clone(), version, info.url.clone()));
        if let Some(digest) = info.digest {
            distribution.digests.insert(info.url.clone(), digest);
        }
        if distribution.source_url != info.url {
            let preferred = prefer_url(
                &distribution.source_url,
                &info.url,
                prefer_wheel,
                &self.canonical_host,
            )
            .clone();
            if preferred != distribution.source_url {
                debug!(
                    "Preferring {} over {}",
                    preferred.as_str(),
                    distribution.source_url.as_str()
                );
            }
            distribution.source_url = preferred;
            distribution.download_urls.insert(info.url);
        }
    }

    fn project_url(&self, name: &PackageName) -> Result<Url, Error> {
        let segment = format!(
            "{}/",
            percent_encoding::utf8_percent_encode(name.as_str(), PATH_SEGMENT)
        );
        self.base_url
            .join(&segment)
            .map_err(|err| Error::UrlParse(segment, err))
    }

    /// Fetch a page, returning `Ok(None)` on a 404.
    fn fetch(&self, url: &Url) -> Result<Option<String>, Error> {
        debug!("Fetching: {}", url.as_str());
        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|err| Error::Fetch(url.clone(), err))?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!("Page not found: {}", url.as_str());
            return Ok(None);
        }
        let text = response
            .error_for_status()
            .and_then(reqwest::blocking::Response::text)
            .map_err(|err| Error::Fetch(url.clone(), err))?;
        Ok(Some(text))
    }
}

/// Interpret an index link as a download of `project`.
///
/// Returns `None` if the link isn't a downloadable distribution, can't be parsed, or belongs
/// to a different project.
fn download_info(url: &Url, project: &PackageName) -> Option<DownloadInfo> {
    let digest = url.fragment().and_then(|fragment| {
        if fragment.to_ascii_lowercase().starts_with("egg=") {
            debug!("Ignoring egg fragment: {fragment}");
        }
        Digest::parse_fragment(fragment)
    });

    let mut download_url = url.clone();
    download_url.set_fragment(None);

    let path = url.path();
    let path = path.strip_suffix('/').unwrap_or(path);
    let filename = path.rsplit('/').next().unwrap_or(path);
    let filename = percent_encoding::percent_decode_str(filename)
        .decode_utf8()
        .ok()?
        .into_owned();

    if filename.ends_with(".whl") {
        let wheel = match WheelFilename::from_str(&filename) {
            Ok(wheel) => wheel,
            Err(err) => {
                warn!("Invalid path for wheel: {path}: {err}");
                return None;
            }
        };
        if wheel.name != *project {
            trace!("Skipping wheel for another project: {filename}");
            return None;
        }
        let python_version = Some(wheel.python_version());
        return Some(DownloadInfo {
            name: wheel.name,
            version: wheel.version,
            filename,
            url: download_url,
            python_version,
            digest,
        });
    }

    let Some(extension) =
        DistExtension::from_filename(&filename).filter(|extension| extension.is_downloadable())
    else {
        trace!("Not downloadable: {path}");
        return None;
    };

    let stem = &filename[..filename.len() - extension.suffix().len()];
    let Some(split) = split_filename(stem, Some(project.as_str())) else {
        debug!("No match for project/version: {filename}");
        return None;
    };
    if !project.matches(&split.name) {
        trace!("Skipping download for another project: {filename}");
        return None;
    }

    Some(DownloadInfo {
        name: PackageName::from_owned(split.name),
        version: split.version,
        filename,
        url: download_url,
        python_version: split.python_version,
        digest,
    })
}
