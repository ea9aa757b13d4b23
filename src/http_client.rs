// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::errors::{NetworkError, ScannerError, ScannerResult};

/// Maximum response body size (1MB); job API responses are tiny
const MAX_BODY_SIZE: usize = 1024 * 1024;

const DEFAULT_POOL_IDLE_PER_HOST: usize = 4;
const DEFAULT_POOL_MAX_IDLE_TIMEOUT: u64 = 90;

/// Network seam used by the probe and exploit operations.
///
/// Every status code is a successful response at this layer; only transport
/// failures are errors. Callers decide what a status means.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Read-only request
    async fn get(&self, url: &str) -> ScannerResult<HttpResponse>;

    /// Structured-body request with `Content-Type: application/json`
    async fn post_json(&self, url: &str, json: &serde_json::Value)
        -> ScannerResult<HttpResponse>;
}

/// Options for building an [`HttpClient`]
#[derive(Debug, Clone)]
pub struct HttpClientOptions {
    pub timeout: Duration,
    /// Optional identifying header `(name, value)`; never an auth header
    pub client_header: Option<(String, String)>,
    pub accept_invalid_certs: bool,
}

impl Default for HttpClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            client_header: None,
            accept_invalid_certs: false,
        }
    }
}

#[derive(Clone)]
pub struct HttpClient {
    client: Arc<Client>,
    timeout: Duration,
    client_header: Option<(String, String)>,
    max_body_size: usize,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        Self::with_options(HttpClientOptions {
            timeout,
            ..HttpClientOptions::default()
        })
    }

    pub fn with_options(options: HttpClientOptions) -> Result<Self> {
        // Self-signed dashboards are common in lab clusters, but this stays opt-in
        if options.accept_invalid_certs {
            tracing::warn!("TLS certificate validation is DISABLED for this client");
        }

        let client = Client::builder()
            .timeout(options.timeout)
            .danger_accept_invalid_certs(options.accept_invalid_certs)
            .redirect(reqwest::redirect::Policy::none())
            .pool_max_idle_per_host(DEFAULT_POOL_IDLE_PER_HOST)
            .pool_idle_timeout(Duration::from_secs(DEFAULT_POOL_MAX_IDLE_TIMEOUT))
            .tcp_nodelay(true)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client: Arc::new(client),
            timeout: options.timeout,
            client_header: options.client_header,
            max_body_size: MAX_BODY_SIZE,
        })
    }

    fn apply_client_header(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.client_header {
            Some((name, value)) => builder.header(name.as_str(), value.as_str()),
            None => builder,
        }
    }

    /// Attach the configured timeout to timeout errors
    fn map_transport_error(&self, err: reqwest::Error) -> ScannerError {
        match ScannerError::from(err) {
            ScannerError::Network(NetworkError::ConnectionTimeout { url, .. }) => {
                ScannerError::Network(NetworkError::ConnectionTimeout {
                    url,
                    timeout: self.timeout,
                })
            }
            other => other,
        }
    }

    async fn read_response(
        &self,
        mut response: reqwest::Response,
        started: Instant,
    ) -> ScannerResult<HttpResponse> {
        let status_code = response.status().as_u16();

        let headers = {
            let headers = response.headers();
            let mut map = HashMap::with_capacity(headers.len());
            for (k, v) in headers.iter() {
                if let Ok(value_str) = v.to_str() {
                    map.insert(k.as_str().to_string(), value_str.to_string());
                }
            }
            map
        };

        // Stop reading at the cap; a body that fails mid-read still counts as a response
        let mut body_bytes: Vec<u8> = Vec::new();
        while body_bytes.len() < self.max_body_size {
            match response.chunk().await {
                Ok(Some(chunk)) => {
                    let room = self.max_body_size - body_bytes.len();
                    body_bytes.extend_from_slice(&chunk[..chunk.len().min(room)]);
                }
                Ok(None) => break,
                Err(e) => {
                    debug!(error = %e, "Response body read failed");
                    break;
                }
            }
        }
        let body = String::from_utf8_lossy(&body_bytes).to_string();

        Ok(HttpResponse {
            status_code,
            body,
            headers,
            duration_ms: started.elapsed().as_millis() as u64,
        })
    }
}

#[async_trait]
impl HttpTransport for HttpClient {
    async fn get(&self, url: &str) -> ScannerResult<HttpResponse> {
        let started = Instant::now();
        let request = self.apply_client_header(self.client.get(url));

        match request.send().await {
            Ok(response) => {
                let http_response = self.read_response(response, started).await?;
                debug!(
                    url = url,
                    status = http_response.status_code,
                    duration_ms = http_response.duration_ms,
                    "GET completed"
                );
                Ok(http_response)
            }
            Err(e) => Err(self.map_transport_error(e)),
        }
    }

    async fn post_json(
        &self,
        url: &str,
        json: &serde_json::Value,
    ) -> ScannerResult<HttpResponse> {
        let started = Instant::now();
        let request = self.apply_client_header(
            self.client
                .post(url)
                .header("Content-Type", "application/json")
                .header("Accept", "application/json")
                .body(json.to_string()),
        );

        match request.send().await {
            Ok(response) => {
                let http_response = self.read_response(response, started).await?;
                debug!(
                    url = url,
                    status = http_response.status_code,
                    duration_ms = http_response.duration_ms,
                    "POST completed"
                );
                Ok(http_response)
            }
            Err(e) => Err(self.map_transport_error(e)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status_code: u16,
    pub body: String,
    pub headers: HashMap<String, String>,
    pub duration_ms: u64,
}

impl HttpResponse {
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers.get(&name.to_lowercase()).cloned()
    }

    pub fn json<T: serde::de::DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_str(&self.body)
    }
}
