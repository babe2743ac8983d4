//! Authenticated HTTP client for the Jamf Pro classic API (`/JSSResource`).
//!
//! `JssClient` wraps a `reqwest::Client` whose default headers already carry
//! the Basic auth token, computed once from the run's credentials. All
//! requests go through [`JssClient::send`], the single place where transport
//! failures and HTTP status codes are translated into [`JssError`]:
//!
//! - no status at all (DNS, TCP, TLS, timeout) → `Unreachable`
//! - a 2xx whose body cannot be read in full → `Unreachable`
//! - `409 Conflict` → `Conflict`
//! - any other non-2xx → `ServerRejected`, with the response body kept
//! - an XML body that does not deserialize → `MalformedResponse`

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::credentials::Credentials;
use crate::error::{JssError, Result};

/// Root of the classic API below the server URL.
const API_ROOT: &str = "JSSResource";

/// The classic API speaks XML in both directions.
const XML_MIME: &str = "text/xml";

/// Covers TCP + TLS handshake only.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Full round-trip limit. Large `match` results can take a while to render
/// server-side, so this is generous.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Builds the `Authorization: Basic …` value. Marked sensitive so it is
/// never printed by reqwest's debug output.
fn basic_auth_header(credentials: &Credentials) -> Result<HeaderValue> {
    let token = STANDARD.encode(format!(
        "{}:{}",
        credentials.username, credentials.password
    ));
    let mut value = HeaderValue::try_from(format!("Basic {token}"))
        .map_err(|_| JssError::Usage("credentials cannot be sent as a header".to_string()))?;
    value.set_sensitive(true);
    Ok(value)
}

/// Authenticated HTTP client for one JSS server.
///
/// `base_url` is the normalized server URL (scheme included, no trailing
/// slash). Tests point it at a wiremock server.
#[derive(Debug)]
pub struct JssClient {
    client: Client,
    base_url: Url,
}

impl JssClient {
    /// Creates a client for `server_url` authenticating as `credentials`.
    ///
    /// # Errors
    ///
    /// - `JssError::Usage` — `server_url` is not an absolute http(s) URL.
    /// - `JssError::Unreachable` — the TLS backend could not be initialized.
    pub fn new(server_url: &str, credentials: &Credentials) -> Result<Self> {
        let base_url = Url::parse(server_url)
            .map_err(|e| JssError::Usage(format!("invalid server URL '{server_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(JssError::Usage(format!(
                "invalid server URL '{server_url}': not a base URL"
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, basic_auth_header(credentials)?);

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(JssClient { client, base_url })
    }

    /// Full URL of a classic API resource: `{base}/JSSResource/{segments…}`.
    ///
    /// Each segment is percent-encoded on its own, so a search term
    /// containing `/`, `?` or spaces stays a single path segment.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // cannot_be_a_base() was rejected in new(), so this always succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push(API_ROOT).extend(segments);
        }
        url
    }

    /// Sends one request and returns the body of a 2xx response.
    async fn send(&self, method: Method, segments: &[&str], body: Option<String>) -> Result<String> {
        let url = self.endpoint(segments);
        debug!(%method, %url, "sending JSS request");

        let mut req = self.client.request(method, url).header(ACCEPT, XML_MIME);
        if let Some(payload) = body {
            req = req.header(CONTENT_TYPE, XML_MIME).body(payload);
        }
        let resp = req.send().await?;

        let status = resp.status();
        if status.is_success() {
            let text = resp.text().await?;
            debug!(%status, bytes = text.len(), "JSS response received");
            return Ok(text);
        }

        // On failure the body carries the JSS explanation; keep whatever
        // could be read.
        let text = resp.text().await.unwrap_or_default();
        debug!(%status, bytes = text.len(), "JSS request failed");
        if status == StatusCode::CONFLICT {
            return Err(JssError::Conflict { body: text });
        }
        Err(JssError::ServerRejected { status, body: text })
    }

    /// Sends an authenticated GET and deserializes the XML response.
    pub async fn get_xml<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let body = self.send(Method::GET, segments, None).await?;
        Ok(quick_xml::de::from_str(&body)?)
    }

    /// Sends an authenticated POST with an XML body and deserializes the
    /// XML response.
    pub async fn post_xml<T: DeserializeOwned>(&self, segments: &[&str], body: String) -> Result<T> {
        let resp = self.send(Method::POST, segments, Some(body)).await?;
        Ok(quick_xml::de::from_str(&resp)?)
    }
}
