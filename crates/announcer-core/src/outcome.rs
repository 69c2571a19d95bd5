//! Per-target announce outcomes
//!
//! One [`Outcome`] is produced for every target that enters the fan-out,
//! whether or not a request was ultimately sent. Outcomes are immutable
//! records; sinks render them through [`fmt::Display`].

use std::fmt;

use reqwest::Method;

use crate::request::AnnounceRequest;
use crate::target::{ApiVariant, Target};

/// Final status of one announce attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeStatus {
    /// The target responded; carries the HTTP status code
    Delivered(u16),
    /// The request produced no response (DNS failure, refusal, timeout)
    TransportFailed,
    /// No request was built for this target
    NotAttempted,
}

/// Record of one announce attempt against one target.
#[derive(Debug, Clone)]
pub struct Outcome {
    /// API dialect of the target
    pub api: ApiVariant,
    /// `host:port` identity of the target
    pub endpoint: String,
    /// Request method
    pub method: Method,
    /// Request URL; absent when no request was built
    pub url: Option<String>,
    /// Final status
    pub status: OutcomeStatus,
    /// Optional diagnostic detail
    pub diagnostic: Option<String>,
}

impl Outcome {
    /// Outcome for a delivered request.
    pub fn delivered(target: &Target, request: &AnnounceRequest, status: u16) -> Self {
        Self {
            api: target.api,
            endpoint: target.endpoint(),
            method: request.method.clone(),
            url: Some(request.url.clone()),
            status: OutcomeStatus::Delivered(status),
            diagnostic: None,
        }
    }

    /// Outcome for a request that never reached the target.
    pub fn transport_failed(
        target: &Target,
        request: &AnnounceRequest,
        diagnostic: impl Into<String>,
    ) -> Self {
        Self {
            api: target.api,
            endpoint: target.endpoint(),
            method: request.method.clone(),
            url: Some(request.url.clone()),
            status: OutcomeStatus::TransportFailed,
            diagnostic: Some(diagnostic.into()),
        }
    }

    /// Outcome for a target that was skipped before any request existed.
    pub fn not_attempted(target: &Target, diagnostic: impl Into<String>) -> Self {
        Self {
            api: target.api,
            endpoint: target.endpoint(),
            method: target.method.clone(),
            url: None,
            status: OutcomeStatus::NotAttempted,
            diagnostic: Some(diagnostic.into()),
        }
    }

    /// Error classification for sink routing.
    ///
    /// Redirect-class responses are benign: the directory answers some
    /// announce revisions with a redirect while still registering the
    /// server. Skipped targets are not errors either.
    pub fn is_error(&self) -> bool {
        match self.status {
            OutcomeStatus::Delivered(code) => !(200..400).contains(&code),
            OutcomeStatus::TransportFailed => true,
            OutcomeStatus::NotAttempted => false,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.api, self.endpoint)?;
        match self.status {
            OutcomeStatus::Delivered(code) => {
                write!(
                    f,
                    " {} {} -> {code}",
                    self.method,
                    self.url.as_deref().unwrap_or("-")
                )?;
            }
            OutcomeStatus::TransportFailed => {
                write!(
                    f,
                    " {} {} -> transport failure",
                    self.method,
                    self.url.as_deref().unwrap_or("-")
                )?;
            }
            OutcomeStatus::NotAttempted => {
                write!(f, " -> skipped")?;
            }
        }
        if let Some(diagnostic) = &self.diagnostic {
            write!(f, " ({diagnostic})")?;
        }
        Ok(())
    }
}
