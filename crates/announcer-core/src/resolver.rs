//! Public IPv4 resolution seam
//!
//! The coordinator consumes this trait; the HTTP-backed implementation
//! lives in the `announcer-ip-http` crate. Implementations own their cache:
//! the first `resolve()` performs the actual discovery and every later call
//! returns the same answer, including a cached failure.

use std::net::Ipv4Addr;

use async_trait::async_trait;

/// Source of the host's public IPv4 address.
#[async_trait]
pub trait Ipv4Resolver: Send + Sync {
    /// The public IPv4 address, or `None` when resolution failed.
    ///
    /// Must be idempotent: at most one discovery attempt per run.
    async fn resolve(&self) -> Option<Ipv4Addr>;
}
