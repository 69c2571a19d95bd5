// # HTTP IPv4 resolver
//
// Discovers the host's public IPv4 address for directory announcements.
//
// A statically configured address short-circuits discovery entirely (no
// network call). Otherwise the configured "what is my IP" services are
// queried in order; the first HTTP 200 wins, its body trimmed and parsed as
// an IPv4 address. A failed service is logged and the next one is tried.
//
// The first overall result, success or failure, is cached for the rest of
// the run: the announcer never performs a second round of lookups, and a
// failed run stays failed.

use std::net::Ipv4Addr;

use announcer_core::resolver::Ipv4Resolver;
use announcer_core::{AnnounceConfig, Error, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, USER_AGENT};
use tokio::sync::OnceCell;

/// Resolves the public IPv4 address via configured lookup services.
pub struct HttpIpv4Resolver {
    /// Statically configured address; set means "never call out"
    static_address: Option<Ipv4Addr>,

    /// Lookup service URIs, tried in order
    service_uris: Vec<String>,

    /// User agent presented to the lookup services
    user_agent: String,

    /// HTTP client
    client: reqwest::Client,

    /// Once-only result cache, covering success and failure alike
    cached: OnceCell<Option<Ipv4Addr>>,
}

impl HttpIpv4Resolver {
    /// Create a resolver over an explicit service list.
    pub fn new(
        static_address: Option<Ipv4Addr>,
        service_uris: Vec<String>,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            static_address,
            service_uris,
            user_agent: user_agent.into(),
            client: reqwest::Client::new(),
            cached: OnceCell::new(),
        }
    }

    /// Build from the configuration document. An unparsable static address
    /// is treated as absent, falling back to the service list.
    pub fn from_config(config: &AnnounceConfig) -> Self {
        Self::new(
            config.ipv4_address.trim().parse().ok(),
            config.ipv4_service_uris.clone(),
            config.user_agent_or_default(),
        )
    }

    async fn lookup(&self) -> Option<Ipv4Addr> {
        if let Some(address) = self.static_address {
            tracing::debug!(%address, "using statically configured IPv4 address");
            return Some(address);
        }

        for uri in &self.service_uris {
            let uri = uri.trim();
            if uri.is_empty() {
                continue;
            }
            match self.query_service(uri).await {
                Ok(address) => {
                    tracing::info!(%address, service = uri, "resolved public IPv4 address");
                    return Some(address);
                }
                Err(e) => tracing::warn!(service = uri, "IPv4 lookup failed: {e}"),
            }
        }

        tracing::warn!("exhausted all IPv4 lookup services without an answer");
        None
    }

    async fn query_service(&self, uri: &str) -> Result<Ipv4Addr> {
        let response = self
            .client
            .get(uri)
            .header(ACCEPT, "*/*")
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await
            .map_err(|e| Error::resolve(format!("request failed: {e}")))?;

        if response.status() != StatusCode::OK {
            return Err(Error::resolve(format!(
                "service returned {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::resolve(format!("failed to read response: {e}")))?;
        body.trim()
            .parse()
            .map_err(|_| Error::resolve(format!("not an IPv4 address: {:?}", body.trim())))
    }
}

#[async_trait]
impl Ipv4Resolver for HttpIpv4Resolver {
    async fn resolve(&self) -> Option<Ipv4Addr> {
        *self.cached.get_or_init(|| self.lookup()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve a canned HTTP response on a loopback port, counting hits.
    async fn serve(response: &'static str, hits: Arc<AtomicUsize>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                hits.fetch_add(1, Ordering::SeqCst);
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        format!("http://{addr}/")
    }

    /// A loopback URI nothing is listening on.
    async fn dead_service() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}/")
    }

    const OK_RESPONSE: &str =
        "HTTP/1.1 200 OK\r\nContent-Length: 13\r\nConnection: close\r\n\r\n198.51.100.7\n";
    const ERROR_RESPONSE: &str =
        "HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";

    #[tokio::test]
    async fn static_address_short_circuits_discovery() {
        let hits = Arc::new(AtomicUsize::new(0));
        let service = serve(OK_RESPONSE, hits.clone()).await;
        let resolver = HttpIpv4Resolver::new(
            Some("10.0.0.1".parse().unwrap()),
            vec![service],
            "test-agent/1.0",
        );

        assert_eq!(resolver.resolve().await, Some("10.0.0.1".parse().unwrap()));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn falls_through_failing_services_and_trims_the_body() {
        let hits = Arc::new(AtomicUsize::new(0));
        let good = serve(OK_RESPONSE, hits.clone()).await;
        let resolver = HttpIpv4Resolver::new(
            None,
            vec![dead_service().await, good],
            "test-agent/1.0",
        );

        assert_eq!(
            resolver.resolve().await,
            Some("198.51.100.7".parse().unwrap())
        );
    }

    #[tokio::test]
    async fn non_200_service_is_skipped() {
        let error_hits = Arc::new(AtomicUsize::new(0));
        let ok_hits = Arc::new(AtomicUsize::new(0));
        let failing = serve(ERROR_RESPONSE, error_hits.clone()).await;
        let good = serve(OK_RESPONSE, ok_hits.clone()).await;
        let resolver = HttpIpv4Resolver::new(None, vec![failing, good], "test-agent/1.0");

        assert_eq!(
            resolver.resolve().await,
            Some("198.51.100.7".parse().unwrap())
        );
        assert_eq!(error_hits.load(Ordering::SeqCst), 1);
        assert_eq!(ok_hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn result_is_cached_after_the_first_attempt() {
        let hits = Arc::new(AtomicUsize::new(0));
        let service = serve(OK_RESPONSE, hits.clone()).await;
        let resolver = HttpIpv4Resolver::new(None, vec![service], "test-agent/1.0");

        let first = resolver.resolve().await;
        let second = resolver.resolve().await;
        assert_eq!(first, second);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failure_is_cached_too() {
        let resolver =
            HttpIpv4Resolver::new(None, vec![dead_service().await], "test-agent/1.0");

        assert_eq!(resolver.resolve().await, None);
        // The second call returns the cached failure without reconnecting;
        // nothing to count on a dead port, but the cached cell guarantees
        // no further attempt is made.
        assert_eq!(resolver.resolve().await, None);
        assert!(resolver.cached.initialized());
    }

    #[tokio::test]
    async fn exhausted_list_resolves_to_none() {
        let resolver = HttpIpv4Resolver::new(
            None,
            vec![dead_service().await, " ".to_string()],
            "test-agent/1.0",
        );
        assert_eq!(resolver.resolve().await, None);
    }

    #[test]
    fn from_config_parses_static_address() {
        let config = AnnounceConfig {
            ipv4_address: " 203.0.113.5 ".to_string(),
            ..AnnounceConfig::default()
        };
        let resolver = HttpIpv4Resolver::from_config(&config);
        assert_eq!(resolver.static_address, Some("203.0.113.5".parse().unwrap()));

        let config = AnnounceConfig {
            ipv4_address: "not-an-address".to_string(),
            ..AnnounceConfig::default()
        };
        assert!(HttpIpv4Resolver::from_config(&config).static_address.is_none());
    }
}
