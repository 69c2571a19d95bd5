//! Per-variant announce request construction
//!
//! One building arm per [`ApiVariant`]; all dialect-specific literals live
//! here. Building is pure: it never touches the network, and a target whose
//! prerequisites are missing yields a typed skip reason instead of a
//! request.

use std::fmt;
use std::net::Ipv4Addr;

use reqwest::Method;

use crate::target::{ApiVariant, Target};

/// Request body together with its content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// Serialized server-info payload
    Json(String),
    /// Form-encoded minimal address/port pair
    Form(String),
}

impl RequestBody {
    /// `Content-Type` header value for this body.
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Json(_) => "application/json",
            Self::Form(_) => "application/x-www-form-urlencoded",
        }
    }

    /// Raw body bytes as a string slice.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Json(body) | Self::Form(body) => body,
        }
    }
}

/// A fully built announce request, ready for the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnounceRequest {
    /// Request method
    pub method: Method,
    /// Absolute request URL
    pub url: String,
    /// Explicit `Host` header value
    pub host: String,
    /// `User-Agent` header value; empty omits the header
    pub user_agent: String,
    /// `Referer` header value; empty omits the header
    pub referer: String,
    /// Optional request body
    pub body: Option<RequestBody>,
}

/// Why no request could be built for an otherwise valid target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildSkip {
    /// Legacy target without an announce version
    MissingVersion,
    /// Directory target with no configured or resolved IPv4 address
    MissingAddress,
    /// Unrecognized API dialect
    UnknownApi,
    /// Custom payload could not be serialized
    Payload(String),
}

impl fmt::Display for BuildSkip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingVersion => f.write_str("no announce version configured"),
            Self::MissingAddress => f.write_str("no public IPv4 address available"),
            Self::UnknownApi => f.write_str("unknown announce API"),
            Self::Payload(msg) => write!(f, "server info payload rejected: {msg}"),
        }
    }
}

/// Build the announce request for one target.
///
/// `resolved` is the shared resolved IPv4 address, if any; directory
/// targets fall back to it when they carry no per-target override.
pub fn build(target: &Target, resolved: Option<Ipv4Addr>) -> Result<AnnounceRequest, BuildSkip> {
    let scheme = if target.use_https { "https" } else { "http" };

    let (url, body) = match target.api {
        ApiVariant::Legacy => {
            if target.version.is_empty() {
                return Err(BuildSkip::MissingVersion);
            }
            let url = format!(
                "{scheme}://{}/{}/announce/{}",
                target.host, target.version, target.port
            );
            (url, None)
        }
        ApiVariant::DirectoryApi => {
            let address = target
                .address
                .or(resolved)
                .ok_or(BuildSkip::MissingAddress)?;
            match &target.server_info {
                Some(info) => {
                    let json = serde_json::to_string(info)
                        .map_err(|e| BuildSkip::Payload(e.to_string()))?;
                    let url = format!("{scheme}://{}/v2/server", target.host);
                    (url, Some(RequestBody::Json(json)))
                }
                None => {
                    let url = format!(
                        "{scheme}://{}/v2/server/{address}:{}",
                        target.host, target.port
                    );
                    let form = format!("ip={address}&port={}", target.port);
                    (url, Some(RequestBody::Form(form)))
                }
            }
        }
        ApiVariant::Unknown => return Err(BuildSkip::UnknownApi),
    };

    Ok(AnnounceRequest {
        method: target.method.clone(),
        url,
        host: target.host.clone(),
        user_agent: target.user_agent.clone(),
        referer: target.referer.clone(),
        body,
    })
}
