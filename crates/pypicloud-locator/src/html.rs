use tl::HTMLTag;
use tracing::{instrument, warn};
use url::Url;

use crate::Error;

/// A link scraped from a "simple" HTML index page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct IndexLink {
    /// The absolute URL of the link, including any fragment.
    pub(crate) url: Url,
    /// The text content of the anchor.
    pub(crate) text: String,
}

/// The links parsed from a PEP 503 "simple" HTML index page.
#[derive(Debug, Clone)]
pub(crate) struct SimpleHtml {
    /// The URL to which all relative links were resolved.
    pub(crate) base: Url,
    /// The links on the page, in document order.
    pub(crate) links: Vec<IndexLink>,
}

impl SimpleHtml {
    /// Parse the `<a>` links from the simple HTML page returned by the given URL.
    #[instrument(skip_all, fields(url = % url))]
    pub(crate) fn parse(text: &str, url: &Url) -> Result<Self, Error> {
        let dom = tl::parse(text, tl::ParserOptions::default())?;

        // Parse the first `<base>` tag, if any, to determine the base URL to which all
        // relative URLs should be resolved. The HTML spec requires that the `<base>` tag
        // appear before other tags with attribute values of URLs.
        let base = dom
            .nodes()
            .iter()
            .filter_map(|node| node.as_tag())
            .take_while(|tag| !matches!(tag.name().as_bytes(), b"a" | b"link"))
            .find(|tag| tag.name().as_bytes() == b"base")
            .map(|base| Self::parse_base(base, url))
            .transpose()?
            .flatten()
            .unwrap_or_else(|| url.clone());

        let links = dom
            .nodes()
            .iter()
            .filter_map(|node| node.as_tag())
            .filter(|tag| tag.name().as_bytes() == b"a")
            .map(|tag| Self::parse_anchor(tag, dom.parser(), &base))
            .filter_map(Result::transpose)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { base, links })
    }

    /// Parse the `href` from a `<base>` tag, relative to the page URL.
    fn parse_base(base: &HTMLTag, url: &Url) -> Result<Option<Url>, Error> {
        let Some(Some(href)) = base.attributes().get("href") else {
            return Ok(None);
        };
        let href = std::str::from_utf8(href.as_bytes())?;
        let href = html_escape::decode_html_entities(href);
        let base = url
            .join(&href)
            .map_err(|err| Error::UrlParse(href.to_string(), err))?;
        Ok(Some(base))
    }

    /// Parse an [`IndexLink`] from an `<a>` tag.
    ///
    /// Returns `None` if the `<a>` tag doesn't have a non-empty `href` attribute, or if the
    /// `href` isn't a valid URL; one broken link doesn't spoil the rest of the page.
    fn parse_anchor(
        link: &HTMLTag,
        parser: &tl::Parser,
        base: &Url,
    ) -> Result<Option<IndexLink>, Error> {
        let Some(href) = link
            .attributes()
            .get("href")
            .flatten()
            .filter(|bytes| !bytes.as_bytes().is_empty())
        else {
            return Ok(None);
        };
        let href = std::str::from_utf8(href.as_bytes())?;
        let href = html_escape::decode_html_entities(href);
        let url = match base.join(&href) {
            Ok(url) => url,
            Err(err) => {
                warn!("Skipping link with invalid URL `{href}`: {err}");
                return Ok(None);
            }
        };

        let text = link.inner_text(parser);
        let text = html_escape::decode_html_entities(text.trim()).into_owned();

        Ok(Some(IndexLink { url, text }))
    }
}
