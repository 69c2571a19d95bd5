//! Test doubles and common utilities for the fan-out contract tests
//!
//! These doubles substitute for the HTTP transport, the IPv4 resolver and
//! the outcome sinks, with atomic call counters so tests can assert how
//! often each seam was exercised.

use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use announcer_core::config::{AnnounceConfig, TargetConfig};
use announcer_core::dispatch::Transport;
use announcer_core::request::AnnounceRequest;
use announcer_core::resolver::Ipv4Resolver;
use announcer_core::sink::OutcomeSink;
use announcer_core::target::{ApiVariant, Target};
use announcer_core::{Error, Result};

/// Scripted behavior for one target host.
pub enum ScriptedResponse {
    /// Respond with this HTTP status
    Status(u16),
    /// Sleep, then fail without a response
    FailAfter(Duration),
}

/// Transport whose behavior is scripted per target host.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: HashMap<String, ScriptedResponse>,
    calls: AtomicUsize,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, host: &str, response: ScriptedResponse) -> Self {
        self.responses.insert(host.to_string(), response);
        self
    }

    /// Number of times send() was called
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, _api: ApiVariant, request: &AnnounceRequest) -> Result<u16> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.responses.get(&request.host) {
            Some(ScriptedResponse::Status(code)) => Ok(*code),
            Some(ScriptedResponse::FailAfter(delay)) => {
                tokio::time::sleep(*delay).await;
                Err(Error::transport("connection timed out"))
            }
            None => Err(Error::transport(format!(
                "no scripted response for {}",
                request.host
            ))),
        }
    }
}

/// Sink that collects every line for assertions.
#[derive(Default)]
pub struct CollectingSink {
    lines: Mutex<Vec<(String, bool)>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<(String, bool)> {
        self.lines.lock().unwrap().clone()
    }

    pub fn error_lines(&self) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|(_, is_error)| *is_error)
            .map(|(line, _)| line)
            .collect()
    }
}

#[async_trait]
impl OutcomeSink for CollectingSink {
    async fn line(&self, message: &str, is_error: bool) {
        self.lines
            .lock()
            .unwrap()
            .push((message.to_string(), is_error));
    }
}

/// Resolver returning a fixed answer and counting attempts.
pub struct FixedResolver {
    address: Option<Ipv4Addr>,
    calls: AtomicUsize,
}

impl FixedResolver {
    pub fn with_address(address: Ipv4Addr) -> Self {
        Self {
            address: Some(address),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failed() -> Self {
        Self {
            address: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of times resolve() was called
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Ipv4Resolver for FixedResolver {
    async fn resolve(&self) -> Option<Ipv4Addr> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.address
    }
}

/// Helper: a normalized legacy target against the given host.
pub fn legacy_target(host: &str, port: u16) -> Target {
    let raw = TargetConfig {
        api: "legacy".to_string(),
        host: host.to_string(),
        port,
        version: "0.3.7".to_string(),
        ..TargetConfig::default()
    };
    Target::normalize(&raw, &AnnounceConfig::default(), 7777)
}

/// Helper: a normalized directory target; `address` empty means "needs the
/// shared resolved address".
pub fn directory_target(host: &str, port: u16, address: &str) -> Target {
    let raw = TargetConfig {
        api: "samp-servers-api".to_string(),
        host: host.to_string(),
        port,
        address: address.to_string(),
        use_custom_server_info: false,
        ..TargetConfig::default()
    };
    Target::normalize(&raw, &AnnounceConfig::default(), 7777)
}
