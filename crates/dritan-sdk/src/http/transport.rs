/*
[INPUT]:  HttpRequest values built by the clients
[OUTPUT]: Status + body responses, checked and decoded into typed results
[POS]:    HTTP layer - injectable transport seam (reqwest by default)
[UPDATE]: When changing how responses are checked, decoded or logged
*/

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use crate::http::endpoint::Service;
use crate::http::request::HttpRequest;
use crate::http::{DritanError, Result};
use crate::types::LenientPayload;

/// Raw response handed back by a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs a single HTTP round trip.
///
/// Implementations report network-level failures as errors and return every
/// received response, success or not, as `HttpResponse`.
#[async_trait]
pub trait HttpTransport: Send + Sync + fmt::Debug {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// Default transport backed by `reqwest`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration, connect_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()?;
        Ok(Self { client })
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = self.client.request(request.method, request.url);
        for (name, value) in request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            // error bodies are best effort; the status alone is reported
            Err(err) if !status.is_success() => {
                debug!(status = status.as_u16(), error = %err, "failed to read error body");
                String::new()
            }
            Err(err) => return Err(err.into()),
        };

        Ok(HttpResponse {
            status: status.as_u16(),
            body,
        })
    }
}

/// Execute a request, logging the round trip
async fn execute_logged(
    transport: &dyn HttpTransport,
    service: Service,
    request: HttpRequest,
) -> Result<HttpResponse> {
    let method = request.method.clone();
    let url = request.url.clone();
    debug!(%service, %method, url = %url, "sending request");

    let response = transport.execute(request).await?;
    debug!(
        %method,
        url = %url,
        status = response.status,
        bytes = response.body.len(),
        "response received"
    );
    Ok(response)
}

/// Execute a request and turn non-success statuses into `DritanError::Request`
pub(crate) async fn execute_checked(
    transport: &dyn HttpTransport,
    service: Service,
    request: HttpRequest,
) -> Result<HttpResponse> {
    let response = execute_logged(transport, service, request).await?;
    if !response.is_success() {
        return Err(DritanError::request_failed(
            service,
            response.status,
            &response.body,
        ));
    }
    Ok(response)
}

/// Execute a request and decode a successful body as JSON
pub(crate) async fn send_json<T: DeserializeOwned>(
    transport: &dyn HttpTransport,
    service: Service,
    request: HttpRequest,
) -> Result<T> {
    let response = execute_checked(transport, service, request).await?;
    Ok(serde_json::from_str(&response.body)?)
}

/// Execute a request whose body is decoded leniently before the status check.
///
/// Empty bodies become `{}` and non-JSON bodies become `{"raw": <text>}`.
pub(crate) async fn send_lenient<T: DeserializeOwned>(
    transport: &dyn HttpTransport,
    service: Service,
    request: HttpRequest,
) -> Result<LenientPayload<T>> {
    let response = execute_logged(transport, service, request).await?;
    let payload = lenient_json(&response.body);

    if !response.is_success() {
        return Err(DritanError::request_failed(
            service,
            response.status,
            &response.body,
        ));
    }
    Ok(LenientPayload::from_value(payload))
}

fn lenient_json(body: &str) -> Value {
    if body.is_empty() {
        return Value::Object(Map::new());
    }
    serde_json::from_str(body).unwrap_or_else(|_| {
        let mut raw = Map::new();
        raw.insert("raw".to_string(), Value::String(body.to_string()));
        Value::Object(raw)
    })
}
