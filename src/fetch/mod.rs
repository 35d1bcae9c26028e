mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

/// Failure modes of a single API request.
///
/// Request URLs may carry credentials in their path, so none of these
/// variants keep the URL around; `host` is all that gets reported.
#[derive(Debug, Error)]
pub enum FetchError {
    /// No response at all: DNS failure, refused or dropped connection, timeout.
    #[error("could not connect to {host}: {source}")]
    Unreachable {
        host: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{host} answered with HTTP {status}")]
    Status { host: String, status: StatusCode },

    #[error("request to {host} failed: {source}")]
    Transport {
        host: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected response from {host}: {source}")]
    Decode {
        host: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("response from {host} is missing `{field}`")]
    MissingField { host: String, field: &'static str },

    #[error("invalid base url `{0}`")]
    InvalidUrl(String),
}

impl FetchError {
    /// Whether the remote could not be reached at all, as opposed to
    /// answering with something unusable.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, FetchError::Unreachable { .. })
    }

    /// Anything that fails before a response arrives counts as unreachable,
    /// including a peer that accepts and then hangs up.
    fn from_send(host: &str, err: reqwest::Error) -> Self {
        let host = host.to_string();
        let source = err.without_url();
        if source.is_connect() || source.is_timeout() || source.is_request() {
            FetchError::Unreachable { host, source }
        } else {
            FetchError::Transport { host, source }
        }
    }

    fn from_body(host: &str, err: reqwest::Error) -> Self {
        FetchError::Transport {
            host: host.to_string(),
            source: err.without_url(),
        }
    }
}

/// Appends `segments` to the path of `base`, percent-encoding each one.
pub fn endpoint<I>(base: &str, segments: I) -> Result<Url, FetchError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut url = Url::parse(base).map_err(|_| FetchError::InvalidUrl(base.to_string()))?;
    url.path_segments_mut()
        .map_err(|()| FetchError::InvalidUrl(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Issues a GET for `url` and decodes the body as JSON.
pub async fn fetch_json<C, T>(client: &C, url: Url) -> Result<T, FetchError>
where
    C: HttpClient + ?Sized,
    T: DeserializeOwned,
{
    let host = url.host_str().unwrap_or_default().to_string();
    let req = reqwest::Request::new(reqwest::Method::GET, url);

    let resp = client
        .execute(req)
        .await
        .map_err(|e| FetchError::from_send(&host, e))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(FetchError::Status { host, status });
    }

    let body = resp
        .bytes()
        .await
        .map_err(|e| FetchError::from_body(&host, e))?;
    debug!(host = %host, bytes = body.len(), "Response received");

    serde_json::from_slice(&body).map_err(|source| FetchError::Decode { host, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Deserialize)]
    struct Probe {
        ok: bool,
    }

    fn closed_port_url() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        format!("http://127.0.0.1:{port}")
    }

    /// Accepts every connection and closes it without answering.
    fn hang_up_url() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        std::thread::spawn(move || {
            for stream in listener.incoming() {
                drop(stream);
            }
        });
        format!("http://127.0.0.1:{port}")
    }

    #[test]
    fn test_endpoint_appends_segments() {
        let url = endpoint("https://travelynx.de", ["api", "v1", "status", "key"]).unwrap();
        assert_eq!(url.as_str(), "https://travelynx.de/api/v1/status/key");
    }

    #[test]
    fn test_endpoint_keeps_base_path_and_encodes() {
        let url = endpoint("http://localhost:8080/proxy/", ["details", "ICE 1/2"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/proxy/details/ICE%201%2F2");
    }

    #[test]
    fn test_endpoint_rejects_garbage() {
        let err = endpoint("not a url", ["x"]).unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn test_fetch_json_decodes_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/probe"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .mount(&server)
            .await;

        let url = endpoint(&server.uri(), ["probe"]).unwrap();
        let probe: Probe = fetch_json(&BasicClient::new(), url).await.unwrap();
        assert!(probe.ok);
    }

    #[tokio::test]
    async fn test_fetch_json_reports_http_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let url = endpoint(&server.uri(), ["probe"]).unwrap();
        let err = fetch_json::<_, Probe>(&BasicClient::new(), url)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Status { status, .. } if status.as_u16() == 503));
        assert!(!err.is_unreachable());
    }

    #[tokio::test]
    async fn test_fetch_json_reports_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let url = endpoint(&server.uri(), ["probe"]).unwrap();
        let err = fetch_json::<_, Probe>(&BasicClient::new(), url)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_fetch_json_refused_connection_is_unreachable() {
        let url = endpoint(&closed_port_url(), ["probe"]).unwrap();
        let err = fetch_json::<_, Probe>(&BasicClient::new(), url)
            .await
            .unwrap_err();
        assert!(err.is_unreachable(), "got {err:?}");
    }

    #[tokio::test]
    async fn test_fetch_json_hang_up_before_response_is_unreachable() {
        let url = endpoint(&hang_up_url(), ["probe"]).unwrap();
        let err = fetch_json::<_, Probe>(&BasicClient::new(), url)
            .await
            .unwrap_err();
        assert!(err.is_unreachable(), "got {err:?}");
    }

    #[tokio::test]
    async fn test_errors_do_not_leak_path() {
        let url = endpoint(&closed_port_url(), ["status", "secret-key"]).unwrap();
        let err = fetch_json::<_, Probe>(&BasicClient::new(), url)
            .await
            .unwrap_err();
        assert!(!format!("{err}").contains("secret-key"));
        assert!(!format!("{err:?}").contains("secret-key"));
    }
}
