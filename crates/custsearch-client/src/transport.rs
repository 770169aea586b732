//! Transport: one raw attempt at the remote search endpoint.
//!
//! [`SearchTransport`] is the seam between request shaping and the network.
//! [`HttpTransport`] speaks HTTP/1 to the search service through a pooled
//! `hyper-util` client; tests substitute scripted transports.

use crate::error::TransportError;
use bytes::Bytes;
use custsearch_core::{SearchPage, SearchRequest};
use http_body_util::{BodyExt, Empty};
use hyper::Uri;
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use std::future::Future;

/// A single attempt at running a search remotely. No timeout, no retry;
/// those belong to [`SearchClient`](crate::SearchClient).
pub trait SearchTransport: Send + Sync + 'static {
    fn search(
        &self,
        request: &SearchRequest,
    ) -> impl Future<Output = Result<SearchPage, TransportError>> + Send;
}

/// HTTP transport for `GET {base_url}/customers/search`.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client<HttpConnector, Empty<Bytes>>,
    base_url: String,
}

impl HttpTransport {
    /// `base_url` is the API root, e.g. `http://127.0.0.1:5175/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = Client::builder(TokioExecutor::new()).build_http();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the request URI with the query percent-encoded.
    pub fn search_uri(&self, request: &SearchRequest) -> Result<Uri, TransportError> {
        let mut uri = format!(
            "{}/customers/search?query={}",
            self.base_url,
            urlencoding::encode(&request.query)
        );
        if let Some(limit) = request.limit {
            uri.push_str(&format!("&limit={limit}"));
        }
        uri.parse()
            .map_err(|e: hyper::http::uri::InvalidUri| TransportError::InvalidRequest(e.to_string()))
    }
}

impl SearchTransport for HttpTransport {
    async fn search(&self, request: &SearchRequest) -> Result<SearchPage, TransportError> {
        let uri = self.search_uri(request)?;
        tracing::debug!(%uri, "GET search");

        let response = self
            .client
            .get(uri)
            .await
            .map_err(|e| TransportError::Connect(e.to_string()))?;
        let status = response.status();
        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|e| TransportError::Connect(e.to_string()))?
            .to_bytes();

        if !status.is_success() {
            return Err(TransportError::from_status(status.as_u16()));
        }

        serde_json::from_slice(&body).map_err(|e| TransportError::Decode(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
