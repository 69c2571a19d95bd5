//! Configuration types for the announcer
//!
//! The configuration document (`announce.json`) supplies the announce target
//! list plus the shared settings: an optional static IPv4 address, the
//! "what is my IP" service list, log destinations, a default user agent and
//! an optional custom server-info payload.
//!
//! These structs are the raw serde image of the document. No defaulting
//! happens on access; targets are defaulted and validated in one explicit
//! step by [`crate::target::Target::normalize`].

use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

use crate::error::Result;
use crate::payload::ServerInfo;

/// User agent applied when the document does not configure one.
pub const DEFAULT_USER_AGENT: &str = "samp-announcer/1.0";

/// Top-level announcer configuration document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnnounceConfig {
    /// Announce targets, in document order
    pub announcers: Vec<TargetConfig>,

    /// Custom server-info payload shared by targets that opt into it
    pub custom_server_info: Option<ServerInfo>,

    /// Error log destination; empty disables the file channel
    pub error_log_path: String,

    /// Static public IPv4 address; empty means "discover via services"
    pub ipv4_address: String,

    /// "What is my IP" service URIs, tried in order
    #[serde(rename = "ipv4ServiceURIs")]
    pub ipv4_service_uris: Vec<String>,

    /// Log destination for non-error lines; empty disables the file channel
    pub log_path: String,

    /// Default user agent for targets that do not configure one
    pub user_agent: String,
}

impl AnnounceConfig {
    /// Parse a configuration document from a reader.
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Parse a configuration document from a file path.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Config-level user agent with the built-in default applied.
    pub fn user_agent_or_default(&self) -> &str {
        let ua = self.user_agent.trim();
        if ua.is_empty() { DEFAULT_USER_AGENT } else { ua }
    }
}

/// One raw announce target entry.
///
/// Every field is optional in the document; `useCustomServerInfo` defaults
/// to true, everything else to empty/zero/false.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TargetConfig {
    /// API dialect spelling; parsed case-insensitively
    pub api: String,

    /// Per-target public IPv4 override for the directory API
    pub address: String,

    /// Destination host; defaulted per variant when empty
    pub host: String,

    /// HTTP method token; defaulted per variant when empty
    pub method: String,

    /// Destination port; zero means "use the process default port"
    pub port: u16,

    /// Referer header value; defaulted per variant when empty
    pub referer: String,

    /// Attach the document's custom server-info payload
    pub use_custom_server_info: bool,

    /// Use HTTPS instead of HTTP
    #[serde(rename = "useHTTPS")]
    pub use_https: bool,

    /// User agent; defaulted per variant when empty
    pub user_agent: String,

    /// Announce version path segment (legacy API only)
    pub version: String,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            api: String::new(),
            address: String::new(),
            host: String::new(),
            method: String::new(),
            port: 0,
            referer: String::new(),
            use_custom_server_info: true,
            use_https: false,
            user_agent: String::new(),
            version: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_document() {
        let doc = r#"{
            "announcers": [
                { "api": "legacy", "version": "0.3.7" },
                { "api": "samp-servers-api", "useHTTPS": true, "useCustomServerInfo": false }
            ],
            "ipv4Address": "203.0.113.5",
            "ipv4ServiceURIs": ["https://api.ipify.org"],
            "logPath": "announce.log",
            "errorLogPath": "announce-error.log",
            "userAgent": "my-server/2.0"
        }"#;

        let config = AnnounceConfig::from_reader(doc.as_bytes()).unwrap();
        assert_eq!(config.announcers.len(), 2);
        assert_eq!(config.announcers[0].version, "0.3.7");
        assert!(config.announcers[1].use_https);
        assert!(!config.announcers[1].use_custom_server_info);
        assert_eq!(config.ipv4_address, "203.0.113.5");
        assert_eq!(config.ipv4_service_uris, vec!["https://api.ipify.org"]);
        assert_eq!(config.user_agent_or_default(), "my-server/2.0");
    }

    #[test]
    fn empty_document_defaults() {
        let config = AnnounceConfig::from_reader("{}".as_bytes()).unwrap();
        assert!(config.announcers.is_empty());
        assert!(config.custom_server_info.is_none());
        assert!(config.ipv4_service_uris.is_empty());
        assert_eq!(config.user_agent_or_default(), DEFAULT_USER_AGENT);
    }

    #[test]
    fn use_custom_server_info_defaults_true() {
        let config =
            AnnounceConfig::from_reader(r#"{ "announcers": [{}] }"#.as_bytes()).unwrap();
        assert!(config.announcers[0].use_custom_server_info);
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(AnnounceConfig::from_reader("not json".as_bytes()).is_err());
    }
}
