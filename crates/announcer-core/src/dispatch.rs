//! Request dispatch and outcome classification
//!
//! The [`Transport`] trait is the seam between dispatch logic and the HTTP
//! stack; contract tests substitute scripted transports for it. The real
//! implementation, [`HttpTransport`], keeps two reqwest clients: directory
//! API requests must observe redirect responses themselves, so they go
//! through a client with redirects disabled, while legacy requests keep the
//! default redirect behavior.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HOST, REFERER, USER_AGENT};

use crate::error::{Error, Result};
use crate::outcome::Outcome;
use crate::request::AnnounceRequest;
use crate::sink::OutcomeSink;
use crate::target::{ApiVariant, Target};

/// Sends a built announce request and reports the response status.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue the request; `Ok` carries the HTTP status code of whatever
    /// response was observed, `Err` means no response at all was obtained.
    async fn send(&self, api: ApiVariant, request: &AnnounceRequest) -> Result<u16>;
}

/// reqwest-backed transport.
pub struct HttpTransport {
    /// Client with default redirect handling (legacy requests)
    follow_client: reqwest::Client,
    /// Client that surfaces redirect responses as-is (directory requests)
    no_redirect_client: reqwest::Client,
}

impl HttpTransport {
    /// Build the two underlying clients. No explicit timeout is set beyond
    /// reqwest's defaults; a hung request stalls only its own target.
    pub fn new() -> Result<Self> {
        let follow_client = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::transport(e.to_string()))?;
        let no_redirect_client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| Error::transport(e.to_string()))?;
        Ok(Self {
            follow_client,
            no_redirect_client,
        })
    }

    fn client_for(&self, api: ApiVariant) -> &reqwest::Client {
        match api {
            ApiVariant::DirectoryApi => &self.no_redirect_client,
            _ => &self.follow_client,
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, api: ApiVariant, request: &AnnounceRequest) -> Result<u16> {
        let mut builder = self
            .client_for(api)
            .request(request.method.clone(), &request.url)
            .header(ACCEPT, "*/*")
            .header(HOST, &request.host);
        if !request.user_agent.is_empty() {
            builder = builder.header(USER_AGENT, &request.user_agent);
        }
        if !request.referer.is_empty() {
            builder = builder.header(REFERER, &request.referer);
        }
        if let Some(body) = &request.body {
            tracing::debug!(body = body.as_str(), "announce request body");
            builder = builder
                .header(CONTENT_TYPE, body.content_type())
                .body(body.as_str().to_owned());
        }

        match builder.send().await {
            Ok(response) => Ok(response.status().as_u16()),
            // Some transport-level failures still carry a response status;
            // fold those into a delivered status instead of losing it.
            Err(e) => match e.status() {
                Some(code) => Ok(code.as_u16()),
                None => Err(Error::transport(e.to_string())),
            },
        }
    }
}

/// Issues one announce request and records its outcome.
///
/// Failures are contained here: whatever happens to a target, `dispatch`
/// returns an outcome and never an error, and the outcome has been handed
/// to the sink before it returns.
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
    sink: Arc<dyn OutcomeSink>,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn Transport>, sink: Arc<dyn OutcomeSink>) -> Self {
        Self { transport, sink }
    }

    /// Send a built request and record the result.
    pub async fn dispatch(&self, target: &Target, request: AnnounceRequest) -> Outcome {
        self.sink
            .line(
                &format!(
                    "requesting at \"{}\" with API \"{}\"...",
                    request.url, target.api
                ),
                false,
            )
            .await;

        let outcome = match self.transport.send(target.api, &request).await {
            Ok(status) => Outcome::delivered(target, &request, status),
            Err(e) => Outcome::transport_failed(target, &request, e.to_string()),
        };
        self.sink.record(&outcome).await;
        outcome
    }

    /// Record a target that never produced a request.
    pub async fn skip(&self, target: &Target, diagnostic: impl Into<String>) -> Outcome {
        let outcome = Outcome::not_attempted(target, diagnostic);
        self.sink.record(&outcome).await;
        outcome
    }
}
