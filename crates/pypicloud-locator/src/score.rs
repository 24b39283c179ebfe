use url::Url;

/// The sort key used to choose between download URLs for the same release.
///
/// Fields are compared in declaration order, and a greater score is preferred.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UrlScore {
    /// Whether the URL uses HTTPS.
    pub https: bool,
    /// Whether the file is a wheel if wheels are preferred, or not a wheel otherwise.
    pub preferred_format: bool,
    /// Whether the URL is hosted on the canonical index host.
    pub canonical_host: bool,
    /// The final path component of the URL, as a deterministic tiebreaker.
    pub filename: String,
}

/// Score a candidate download URL.
pub fn score_url(url: &Url, prefer_wheel: bool, canonical_host: &str) -> UrlScore {
    let filename = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default();
    UrlScore {
        https: url.scheme() == "https",
        preferred_format: prefer_wheel == filename.ends_with(".whl"),
        canonical_host: url
            .host_str()
            .is_some_and(|host| host.contains(canonical_host)),
        filename: filename.to_string(),
    }
}

/// Return whichever of `current` and `candidate` scores higher, keeping `candidate` on a tie.
pub(crate) fn prefer_url<'a>(
    current: &'a Url,
    candidate: &'a Url,
    prefer_wheel: bool,
    canonical_host: &str,
) -> &'a Url {
    if score_url(current, prefer_wheel, canonical_host)
        > score_url(candidate, prefer_wheel, canonical_host)
    {
        current
    } else {
        candidate
    }
}
