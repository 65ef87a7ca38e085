pub mod gateway;
pub mod images;
pub mod models;
#[cfg(test)]
pub(crate) mod testing;

pub use gateway::{ErrorPolicy, MovieGateway};
pub use images::{ImageKind, ImageSize, ImageUrls};
pub use models::*;

use reqwest::StatusCode;

/// Errors raised by the low-level fetch primitive. Everything above
/// [`Fetcher`] either absorbs these or passes them through untouched.
#[derive(Debug, thiserror::Error)]
pub enum TmdbError {
    #[error("TMDB API key is not configured")]
    MissingApiKey,
    #[error("Resource not found")]
    NotFound { status: u16 },
    #[error("Invalid API key")]
    Unauthorized { status: u16 },
    #[error("Rate limit exceeded")]
    RateLimited { status: u16 },
    #[error("TMDB API error: {status} {reason}")]
    Status { status: u16, reason: String },
    #[error("Failed to fetch from TMDB: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Unexpected TMDB response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl TmdbError {
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::NOT_FOUND => TmdbError::NotFound { status: 404 },
            StatusCode::UNAUTHORIZED => TmdbError::Unauthorized { status: 401 },
            StatusCode::TOO_MANY_REQUESTS => TmdbError::RateLimited { status: 429 },
            other => TmdbError::Status {
                status: other.as_u16(),
                reason: other.canonical_reason().unwrap_or("").to_string(),
            },
        }
    }

    /// HTTP status behind the error, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            TmdbError::NotFound { status }
            | TmdbError::Unauthorized { status }
            | TmdbError::RateLimited { status }
            | TmdbError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A GET against the movie API returning the raw JSON body.
///
/// `params` with empty values are not sent.
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<serde_json::Value, TmdbError>;
}

#[derive(Clone, Debug)]
pub struct TmdbClient {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl TmdbClient {
    /// Create a new client with the given base URL (e.g. "https://api.themoviedb.org/3").
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().build()?;
        let base_url_str = base_url.into();
        tracing::debug!(base_url = %base_url_str, "creating TmdbClient");
        Ok(TmdbClient {
            base_url: base_url_str.trim_end_matches('/').to_string(),
            api_key: None,
            client,
        })
    }

    /// Return a client with the provided API key. An empty key counts as missing.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        let api_key = api_key.into();
        self.api_key = (!api_key.is_empty()).then_some(api_key);
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

#[async_trait::async_trait]
impl Fetcher for TmdbClient {
    #[tracing::instrument(level = "debug", skip(self, params))]
    async fn fetch(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<serde_json::Value, TmdbError> {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::error!("TMDB API key is missing, set TMDB_API_KEY in .env.local");
            return Err(TmdbError::MissingApiKey);
        };

        let url = self.url(endpoint);
        let mut query: Vec<(&str, &str)> = vec![("api_key", api_key)];
        query.extend(
            params
                .iter()
                .filter(|(_, v)| !v.is_empty())
                .map(|(k, v)| (*k, v.as_str())),
        );
        tracing::debug!(%url, params = params.len(), "GET");

        let resp = match self.client.get(&url).query(&query).send().await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::error!(error = %e, %url, "network error fetching from TMDB");
                return Err(TmdbError::Transport(e));
            }
        };
        let status = resp.status();
        if !status.is_success() {
            return Err(TmdbError::from_status(status));
        }
        let body = resp.text().await?;
        match serde_json::from_str(&body) {
            Ok(parsed) => Ok(parsed),
            Err(e) => {
                let snippet_len = body.len().min(2000);
                let snippet = body.get(..snippet_len).unwrap_or("");
                tracing::error!(error = %e, body_snippet = %snippet, "failed to parse TMDB response");
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    #[test]
    fn build_url_trims_trailing_slash() {
        let c = TmdbClient::new("https://api.themoviedb.org/3/").unwrap();
        assert_eq!(c.url("/movie/550"), "https://api.themoviedb.org/3/movie/550");
        assert_eq!(c.url("genre/movie/list"), "https://api.themoviedb.org/3/genre/movie/list");
    }

    #[test]
    fn empty_api_key_counts_as_missing() {
        let c = TmdbClient::new("http://localhost").unwrap().with_api_key("");
        assert!(!c.has_api_key());
    }

    #[test]
    fn status_classification() {
        assert!(matches!(
            TmdbError::from_status(StatusCode::NOT_FOUND),
            TmdbError::NotFound { status: 404 }
        ));
        assert!(matches!(
            TmdbError::from_status(StatusCode::UNAUTHORIZED),
            TmdbError::Unauthorized { status: 401 }
        ));
        assert!(matches!(
            TmdbError::from_status(StatusCode::TOO_MANY_REQUESTS),
            TmdbError::RateLimited { status: 429 }
        ));
        let other = TmdbError::from_status(StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(other.status(), Some(503));
        assert_eq!(
            other.to_string(),
            "TMDB API error: 503 Service Unavailable"
        );
    }

    #[tokio::test]
    async fn fetch_sends_api_key_and_non_empty_params() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/discover/movie")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("api_key".into(), "secret".into()),
                Matcher::UrlEncoded("with_genres".into(), "28".into()),
                Matcher::UrlEncoded("page".into(), "2".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"page":2,"results":[],"total_pages":3,"total_results":41}"#)
            .create_async()
            .await;

        let client = TmdbClient::new(server.url()).unwrap().with_api_key("secret");
        let value = client
            .fetch(
                "/discover/movie",
                &[
                    ("page", "2".to_string()),
                    ("with_genres", "28".to_string()),
                    ("sort_by", String::new()),
                ],
            )
            .await
            .unwrap();
        assert_eq!(value["total_results"], 41);
    }

    #[tokio::test]
    async fn fetch_classifies_http_errors() {
        let mut server = Server::new_async().await;
        let _not_found = server
            .mock("GET", "/movie/1")
            .match_query(Matcher::Any)
            .with_status(404)
            .create_async()
            .await;
        let _unauthorized = server
            .mock("GET", "/movie/2")
            .match_query(Matcher::Any)
            .with_status(401)
            .create_async()
            .await;
        let _limited = server
            .mock("GET", "/movie/3")
            .match_query(Matcher::Any)
            .with_status(429)
            .create_async()
            .await;
        let _broken = server
            .mock("GET", "/movie/4")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let client = TmdbClient::new(server.url()).unwrap().with_api_key("k");
        let err = client.fetch("/movie/1", &[]).await.unwrap_err();
        assert!(matches!(err, TmdbError::NotFound { status: 404 }));
        let err = client.fetch("/movie/2", &[]).await.unwrap_err();
        assert!(matches!(err, TmdbError::Unauthorized { status: 401 }));
        assert_eq!(err.status(), Some(401));
        let err = client.fetch("/movie/3", &[]).await.unwrap_err();
        assert!(matches!(err, TmdbError::RateLimited { status: 429 }));
        let err = client.fetch("/movie/4", &[]).await.unwrap_err();
        assert!(matches!(err, TmdbError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn fetch_without_api_key_fails_before_any_request() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let client = TmdbClient::new(server.url()).unwrap();
        let err = client.fetch("/genre/movie/list", &[]).await.unwrap_err();
        assert!(matches!(err, TmdbError::MissingApiKey));
        m.assert_async().await;
    }

    #[tokio::test]
    async fn fetch_maps_connection_failure_to_transport() {
        let client = TmdbClient::new("http://127.0.0.1:1").unwrap().with_api_key("k");
        let err = client.fetch("/movie/popular", &[]).await.unwrap_err();
        assert!(matches!(err, TmdbError::Transport(_)));
        assert_eq!(err.status(), None);
    }

    #[tokio::test]
    async fn fetch_rejects_non_json_body() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/movie/popular")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>oops</html>")
            .create_async()
            .await;

        let client = TmdbClient::new(server.url()).unwrap().with_api_key("k");
        let err = client.fetch("/movie/popular", &[]).await.unwrap_err();
        assert!(matches!(err, TmdbError::Decode(_)));
    }
}
