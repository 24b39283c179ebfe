//! Integration tests for locating distributions on a mock "simple" index.

use std::str::FromStr;

use anyhow::Result;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pypicloud_locator::{Distribution, Error, PreferWheelLocator, Requirement};
use pypicloud_normalize::PackageName;

const PROJECT_PAGE: &str = r#"
<!DOCTYPE html>
<html>
<body>
<h1>Links for foo-bar</h1>
<a href="../../packages/Foo_Bar-1.0.tar.gz#sha256=0123456789abcdef">Foo_Bar-1.0.tar.gz</a><br/>
<a href="../../packages/Foo_Bar-1.0-py2.py3-none-any.whl">Foo_Bar-1.0-py2.py3-none-any.whl</a><br/>
<a href="../../packages/foo-bar-1.1.zip">foo-bar-1.1.zip</a><br/>
<a href="../../packages/foo.bar-2.0b1.tar.gz">foo.bar-2.0b1.tar.gz</a><br/>
<a href="../../packages/foo-bar-1.1-py2.7.egg">foo-bar-1.1-py2.7.egg</a><br/>
<a href="../../packages/other-3.0.tar.gz">other-3.0.tar.gz</a><br/>
</body>
</html>
"#;

const ROOT_PAGE: &str = r#"
<!DOCTYPE html>
<html>
<body>
<a href="foo-bar/">Foo_Bar</a><br/>
<a href="other/">other</a><br/>
<a href="zope-interface/">zope.interface</a><br/>
</body>
</html>
"#;

const LEGACY_PAGE: &str = r#"
<!DOCTYPE html>
<html>
<body>
<h1>Links for pytz</h1>
<a href="https://files.example.com/pytz-2004d.tar.gz#md5=0a1b2c3d">pytz-2004d.tar.gz</a><br/>
<a href="https://files.example.com/pytz-1.0-foo.tar.gz">pytz-1.0-foo.tar.gz</a><br/>
<a href="https://[broken/pytz-2005a.tar.gz">pytz-2005a.tar.gz</a><br/>
</body>
</html>
"#;

async fn mock_index() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/simple/foo-bar/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PROJECT_PAGE))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/simple/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ROOT_PAGE))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/simple/pytz/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LEGACY_PAGE))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/simple/broken/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    server
}

/// Run a locator query against the mock index.
///
/// The blocking client must be created, used and dropped outside of the async runtime.
async fn locate(
    server: &MockServer,
    requirement: &str,
    prereleases: bool,
    prefer_wheel: bool,
) -> Result<Option<Distribution>> {
    let base_url = Url::parse(&format!("{}/simple", server.uri()))?;
    let requirement = Requirement::from_str(requirement)?;
    let distribution = tokio::task::spawn_blocking(move || {
        let locator = PreferWheelLocator::new(base_url)?;
        locator.locate(&requirement, prereleases, prefer_wheel)
    })
    .await??;
    Ok(distribution)
}

#[tokio::test]
async fn latest_release() -> Result<()> {
    let server = mock_index().await;

    let distribution = locate(&server, "Foo.Bar", false, true).await?.unwrap();
    assert_eq!(distribution.name, PackageName::from("foo-bar"));
    assert_eq!(distribution.version.to_string(), "1.1");
    assert!(distribution
        .source_url
        .as_str()
        .ends_with("/packages/foo-bar-1.1.zip"));
    assert_eq!(distribution.download_urls.len(), 1);
    assert_eq!(distribution.digest(), None);

    Ok(())
}

#[tokio::test]
async fn prefer_wheel() -> Result<()> {
    let server = mock_index().await;

    let distribution = locate(&server, "foo_bar<1.1", false, true).await?.unwrap();
    assert_eq!(distribution.version.to_string(), "1.0");
    assert!(distribution
        .source_url
        .as_str()
        .ends_with("/packages/Foo_Bar-1.0-py2.py3-none-any.whl"));
    assert_eq!(distribution.download_urls.len(), 2);
    assert_eq!(distribution.digests.len(), 1);
    assert_eq!(distribution.digest(), None);

    Ok(())
}

#[tokio::test]
async fn prefer_source() -> Result<()> {
    let server = mock_index().await;

    let distribution = locate(&server, "foo_bar<1.1", false, false).await?.unwrap();
    assert!(distribution
        .source_url
        .as_str()
        .ends_with("/packages/Foo_Bar-1.0.tar.gz"));
    let digest = distribution.digest().unwrap();
    assert_eq!(digest.algorithm, "sha256");
    assert_eq!(digest.value, "0123456789abcdef");

    Ok(())
}

#[tokio::test]
async fn prereleases() -> Result<()> {
    let server = mock_index().await;

    let distribution = locate(&server, "foo-bar", true, true).await?.unwrap();
    assert_eq!(distribution.version.to_string(), "2.0b1");

    // Only pre-releases match, and they aren't allowed.
    let distribution = locate(&server, "foo-bar>=2.0a0", false, true).await?;
    assert_eq!(distribution, None);

    Ok(())
}

#[tokio::test]
async fn no_matching_version() -> Result<()> {
    let server = mock_index().await;

    let distribution = locate(&server, "foo-bar>=5", false, true).await?;
    assert_eq!(distribution, None);

    Ok(())
}

#[tokio::test]
async fn missing_project() -> Result<()> {
    let server = mock_index().await;

    let distribution = locate(&server, "missing", false, true).await?;
    assert_eq!(distribution, None);

    Ok(())
}

#[tokio::test]
async fn server_error() -> Result<()> {
    let server = mock_index().await;

    let err = locate(&server, "broken", false, true).await.unwrap_err();
    let err = err.downcast::<Error>()?;
    assert!(matches!(err, Error::Fetch(..)));
    assert!(err.is_transient());

    Ok(())
}

#[tokio::test]
async fn project_names() -> Result<()> {
    let server = mock_index().await;

    let base_url = Url::parse(&format!("{}/simple/", server.uri()))?;
    let names = tokio::task::spawn_blocking(move || {
        PreferWheelLocator::new(base_url)?.project_names()
    })
    .await??;
    assert_eq!(
        names.iter().map(PackageName::as_str).collect::<Vec<_>>(),
        ["foo-bar", "other", "zope-interface"]
    );

    Ok(())
}

#[tokio::test]
async fn legacy_versions() -> Result<()> {
    let server = mock_index().await;

    // `2004d` sorts as a pre-release under the legacy scheme.
    let distribution = locate(&server, "pytz", false, true).await?.unwrap();
    assert_eq!(distribution.version.to_string(), "1.0-foo");
    assert_eq!(
        distribution.source_url.as_str(),
        "https://files.example.com/pytz-1.0-foo.tar.gz"
    );

    let distribution = locate(&server, "pytz", true, true).await?.unwrap();
    assert_eq!(distribution.version.to_string(), "2004d");
    assert_eq!(distribution.digest().unwrap().to_string(), "md5=0a1b2c3d");

    let distribution = locate(&server, "pytz (<2004d)", true, true).await?.unwrap();
    assert_eq!(distribution.version.to_string(), "1.0-foo");

    let distribution = locate(&server, "pytz==2004d", true, true).await?.unwrap();
    assert_eq!(distribution.version.to_string(), "2004d");
    Ok(())
}
