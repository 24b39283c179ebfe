use reqwest::StatusCode;
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to build the HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("Failed to fetch: `{0}`")]
    Fetch(Url, #[source] reqwest::Error),

    #[error(transparent)]
    Utf8(#[from] std::str::Utf8Error),

    #[error("Failed to parse URL: {0}")]
    UrlParse(String, #[source] url::ParseError),

    #[error(transparent)]
    HtmlParse(#[from] tl::ParseError),
}

impl Error {
    /// Returns `true` if the error is likely to go away when the request is repeated: a
    /// connection failure, a timeout, or a server error.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Fetch(_, err) => {
                err.is_connect()
                    || err.is_timeout()
                    || err.status().is_some_and(|status| {
                        status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
                    })
            }
            _ => false,
        }
    }
}
