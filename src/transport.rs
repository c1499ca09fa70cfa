//! The HTTP seam between the client and the network.
//!
//! [`ReqwestTransport`] is what clients use by default. Anything else that can
//! move an [`HttpRequest`] and hand back status plus body (a proxy-aware
//! stack, an in-memory fake in tests) can stand in through [`Transport`].

use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::{header::HeaderMap, Client, ClientBuilder, Method, StatusCode};
use std::time::Duration;

/// A fully resolved request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<serde_json::Value>,
    pub timeout: Duration,
}

/// Status and raw body of a response, whatever the status.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: String,
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one request. Only failures to get a response at all
    /// (timeout, DNS, refused or reset connection) are errors here; every
    /// received status comes back as `Ok`.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// [`Transport`] backed by a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(timeout)
            .build()
            .map_err(Error::Http)?;
        Ok(Self { client })
    }

    /// Reuse an existing client, e.g. one configured with a proxy.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = self
            .client
            .request(request.method, &request.url)
            .headers(request.headers)
            .timeout(request.timeout);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let resp = builder.send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        Ok(HttpResponse { status, body })
    }
}
