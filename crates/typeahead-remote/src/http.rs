//! Hyper-based HTTP client for the suggestion service.

use crate::wire;
use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::{BodyExt, Empty};
use hyper::header::ACCEPT;
use hyper::{Request, Uri};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use typeahead_core::collab::encode_component;
use typeahead_core::{Lookup, LookupError, Suggestion};

/// `GET <endpoint>?q=<query>` lookup over plain HTTP.
///
/// The connection pool is shared by clones.
#[derive(Clone)]
pub struct HttpLookup {
    endpoint: String,
    client: Client<HttpConnector, Empty<Bytes>>,
}

impl HttpLookup {
    /// Validate `endpoint` and build a client for it.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, LookupError> {
        let endpoint = endpoint.into();
        let uri: Uri = endpoint
            .parse()
            .map_err(|e| LookupError::InvalidEndpoint(format!("{endpoint}: {e}")))?;
        if uri.scheme_str() != Some("http") || uri.host().is_none() {
            return Err(LookupError::InvalidEndpoint(format!(
                "{endpoint}: expected an absolute http:// URL"
            )));
        }
        let client = Client::builder(TokioExecutor::new()).build_http();
        Ok(Self { endpoint, client })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Full request URL for `query`.
    pub fn request_url(&self, query: &str) -> String {
        let sep = if self.endpoint.contains('?') { '&' } else { '?' };
        format!("{}{}q={}", self.endpoint, sep, encode_component(query))
    }
}

impl std::fmt::Debug for HttpLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpLookup")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

#[async_trait]
impl Lookup for HttpLookup {
    async fn lookup(&self, query: &str) -> Result<Vec<Suggestion>, LookupError> {
        let url = self.request_url(query);
        let uri: Uri = url
            .parse()
            .map_err(|e| LookupError::InvalidEndpoint(format!("{url}: {e}")))?;
        let request = Request::get(uri)
            .header(ACCEPT, "application/json")
            .body(Empty::<Bytes>::new())
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        tracing::debug!(url = %url, "http lookup: sending request");
        let response = self
            .client
            .request(request)
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?
            .to_bytes();
        tracing::debug!(url = %url, status = status.as_u16(), bytes = body.len(), "http lookup: response");

        if !status.is_success() {
            return Err(LookupError::Status {
                status: status.as_u16(),
                message: wire::error_message(&body, status.canonical_reason().unwrap_or("error")),
            });
        }
        wire::decode_suggestions(&body)
    }

    fn request_key(&self, query: &str) -> String {
        self.request_url(query)
    }
}
