//! Server-info payload for the directory API
//!
//! The directory expects the abbreviated wire names below; the Rust field
//! names spell them out. Targets without a custom payload never serialize
//! this struct — the request builder sends a minimal form-encoded
//! address/port pair instead.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Structured game-server state announced to the directory API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerInfo {
    /// Banner image URI
    #[serde(rename = "banner")]
    pub banner_uri: String,

    /// Core server state
    pub core: ServerCore,

    /// Free-form server description
    pub description: String,

    /// Whether the server is accepting players
    #[serde(rename = "active")]
    pub is_active: bool,

    /// Free-form rule mapping shown in server browsers
    #[serde(rename = "ru")]
    pub rules: HashMap<String, String>,
}

/// Core server state block of the directory payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerCore {
    /// Public IPv4 address
    #[serde(rename = "ip")]
    pub ipv4_address: String,

    /// Server hostname shown in browsers
    #[serde(rename = "hn")]
    pub hostname: String,

    /// Current player count
    #[serde(rename = "pc")]
    pub player_count: u32,

    /// Player slot limit
    #[serde(rename = "pm")]
    pub max_players: u32,

    /// Active gamemode name
    #[serde(rename = "gm")]
    pub gamemode: String,

    /// Server language
    #[serde(rename = "la")]
    pub language: String,

    /// Whether a join password is required
    #[serde(rename = "pa")]
    pub requires_password: bool,

    /// Server software version
    #[serde(rename = "vn")]
    pub server_version: String,
}
