//! Bounded HTTP downloads for pages and icons.
//!
//! Both generation-time network consumers (the metadata resolver and the
//! icon normalizer) go through [`Fetcher`], so they share one connection
//! pool, one timeout, and one `User-Agent`. Redirects are followed (up to
//! reqwest's default of ten); the final URL is reported so relative
//! references resolve against the page that was actually served.
//!
//! Any non-2xx status is an error here. The callers decide how to degrade.

use crate::config::FetchConfig;
use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{url} answered {status}")]
    Status { url: Url, status: StatusCode },
}

/// A fetched HTML document.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL after following redirects.
    pub final_url: Url,
    pub body: String,
}

/// Shared HTTP client with a bounded per-request timeout.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        Self::build(config.timeout(), &config.user_agent)
    }

    /// A fetcher with default headers and a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        Self::build(timeout, &FetchConfig::default().user_agent)
    }

    fn build(timeout: Duration, user_agent: &str) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Download an HTML page, following redirects.
    pub async fn page(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        log::debug!("GET {url}");
        let response = self.client.get(url.clone()).send().await?;
        let response = check_status(response)?;
        let final_url = response.url().clone();
        let body = response.text().await?;
        if &final_url != url {
            log::debug!("{url} redirected to {final_url}");
        }
        Ok(FetchedPage { final_url, body })
    }

    /// Download raw bytes (an icon).
    pub async fn bytes(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        log::debug!("GET {url}");
        let response = self.client.get(url.clone()).send().await?;
        let response = check_status(response)?;
        Ok(response.bytes().await?.to_vec())
    }
}

fn check_status(response: reqwest::Response) -> Result<reqwest::Response, FetchError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(FetchError::Status {
            url: response.url().clone(),
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher() -> Fetcher {
        Fetcher::with_timeout(Duration::from_millis(500)).unwrap()
    }

    #[tokio::test]
    async fn page_reports_final_url_after_redirect() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/old"))
            .respond_with(ResponseTemplate::new(301).insert_header("Location", "/new/home.html"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/new/home.html"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<p>hi</p>"))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/old", server.uri())).unwrap();
        let page = fetcher().page(&url).await.unwrap();
        assert_eq!(page.final_url.path(), "/new/home.html");
        assert_eq!(page.body, "<p>hi</p>");
    }

    #[tokio::test]
    async fn non_success_status_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/missing", server.uri())).unwrap();
        let err = fetcher().bytes(&url).await.unwrap_err();
        assert!(
            matches!(err, FetchError::Status { status, .. } if status == StatusCode::NOT_FOUND)
        );
    }

    #[tokio::test]
    async fn slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let url = Url::parse(&server.uri()).unwrap();
        let err = fetcher().page(&url).await.unwrap_err();
        assert!(
            matches!(&err, FetchError::Http(e) if e.is_timeout()),
            "expected timeout, got {err}"
        );
    }

    #[tokio::test]
    async fn sends_configured_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("user-agent", "pwa-shell-test"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8, 2, 3]))
            .mount(&server)
            .await;

        let config = FetchConfig {
            timeout_secs: 1,
            user_agent: "pwa-shell-test".into(),
        };
        let url = Url::parse(&server.uri()).unwrap();
        let bytes = Fetcher::new(&config).unwrap().bytes(&url).await.unwrap();
        assert_eq!(bytes, vec![1, 2, 3]);
    }
}
