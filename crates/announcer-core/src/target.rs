//! Announce target descriptors
//!
//! A [`Target`] is the validated, fully-defaulted form of one entry in the
//! configuration's announcer list. Defaulting and validation happen exactly
//! once, in [`Target::normalize`]; the resulting value is immutable for the
//! rest of the run. Validity is therefore a pure function of the value:
//! a target is valid iff it has a host, a non-zero port and a user agent.

use std::fmt;
use std::net::Ipv4Addr;

use reqwest::Method;

use crate::config::{AnnounceConfig, TargetConfig};
use crate::payload::ServerInfo;

/// Default user agent for legacy announce requests.
const LEGACY_USER_AGENT: &str = "SAMP/0.30";

/// API dialect a target speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiVariant {
    /// The original master-list announce endpoint
    Legacy,
    /// The samp-servers.net directory API (v2)
    DirectoryApi,
    /// Unrecognized dialect; never produces a request
    Unknown,
}

impl ApiVariant {
    /// Parse an API spelling from the configuration, case-insensitively.
    /// Unrecognized or empty spellings map to [`ApiVariant::Unknown`].
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "legacy" => Self::Legacy,
            "samp-servers-api" | "sampservers-api" | "samp-serversapi" | "sampserversapi" => {
                Self::DirectoryApi
            }
            _ => Self::Unknown,
        }
    }

    /// Well-known directory host for this dialect.
    fn default_host(self) -> &'static str {
        match self {
            Self::Legacy => "server.sa-mp.com",
            Self::DirectoryApi => "api.samp-servers.net",
            Self::Unknown => "",
        }
    }

    fn default_method(self) -> Method {
        match self {
            Self::DirectoryApi => Method::POST,
            _ => Method::GET,
        }
    }

    fn default_referer(self) -> &'static str {
        // The legacy endpoint expects this literal referer.
        match self {
            Self::Legacy => "http://Bonus",
            _ => "",
        }
    }
}

impl fmt::Display for ApiVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Legacy => "legacy",
            Self::DirectoryApi => "samp-servers-api",
            Self::Unknown => "unknown",
        })
    }
}

/// A validated, fully-defaulted announce destination.
#[derive(Debug, Clone)]
pub struct Target {
    /// API dialect
    pub api: ApiVariant,
    /// Per-target public IPv4 override (directory API)
    pub address: Option<Ipv4Addr>,
    /// Destination host
    pub host: String,
    /// Request method
    pub method: Method,
    /// Destination port
    pub port: u16,
    /// Referer header value; empty omits the header
    pub referer: String,
    /// Use HTTPS instead of HTTP
    pub use_https: bool,
    /// User-Agent header value
    pub user_agent: String,
    /// Announce version path segment (legacy API)
    pub version: String,
    /// Custom payload, attached only for directory targets that opt in
    pub server_info: Option<ServerInfo>,
}

impl Target {
    /// Produce the fully-defaulted descriptor for one raw config entry.
    ///
    /// `default_port` replaces a zero port before validity is checked.
    /// The config-level user agent and custom payload fill in for targets
    /// that do not carry their own.
    pub fn normalize(raw: &TargetConfig, config: &AnnounceConfig, default_port: u16) -> Self {
        let api = ApiVariant::parse(&raw.api);

        let host = match raw.host.trim() {
            "" => api.default_host().to_string(),
            host => host.to_string(),
        };

        let method = match raw.method.trim() {
            "" => api.default_method(),
            token => Method::from_bytes(token.to_ascii_uppercase().as_bytes())
                .unwrap_or_else(|_| api.default_method()),
        };

        let referer = match raw.referer.trim() {
            "" => api.default_referer().to_string(),
            referer => referer.to_string(),
        };

        let user_agent = match (raw.user_agent.trim(), api) {
            ("", ApiVariant::Legacy) => LEGACY_USER_AGENT.to_string(),
            ("", _) => config.user_agent_or_default().to_string(),
            (ua, _) => ua.to_string(),
        };

        let server_info = if api == ApiVariant::DirectoryApi && raw.use_custom_server_info {
            config.custom_server_info.clone()
        } else {
            None
        };

        Self {
            api,
            address: raw.address.trim().parse().ok(),
            host,
            method,
            port: if raw.port == 0 { default_port } else { raw.port },
            referer,
            use_https: raw.use_https,
            user_agent,
            version: raw.version.trim().to_string(),
            server_info,
        }
    }

    /// A target is valid iff it has a host, a non-zero port and a user agent.
    pub fn is_valid(&self) -> bool {
        !self.host.is_empty() && self.port != 0 && !self.user_agent.is_empty()
    }

    /// True when dispatching this target consumes the shared resolved
    /// address (directory API without a per-target override).
    pub fn needs_resolved_address(&self) -> bool {
        self.api == ApiVariant::DirectoryApi && self.address.is_none()
    }

    /// `host:port` identity used in outcome lines.
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Normalize the configured announcer list, silently dropping entries that
/// remain invalid after defaulting.
pub fn collect_targets(config: &AnnounceConfig, default_port: u16) -> Vec<Target> {
    let mut targets = Vec::with_capacity(config.announcers.len());
    for raw in &config.announcers {
        let target = Target::normalize(raw, config, default_port);
        if target.is_valid() {
            targets.push(target);
        } else {
            tracing::debug!(
                api = %target.api,
                host = %target.host,
                port = target.port,
                "dropping invalid announce target"
            );
        }
    }
    targets
}
