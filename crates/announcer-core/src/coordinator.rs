//! Concurrent fan-out over all announce targets
//!
//! The [`Announcer`] owns the validated target list, the shared IPv4
//! resolver and the dispatcher. One tokio task per target; the join set is
//! drained to completion, so every target contributes an outcome no matter
//! what happens to its siblings. The shared address is resolved at most
//! once, before any task that consumes it is spawned.

use std::net::Ipv4Addr;
use std::sync::Arc;

use tokio::task::JoinSet;

use crate::config::AnnounceConfig;
use crate::dispatch::Dispatcher;
use crate::outcome::Outcome;
use crate::request;
use crate::resolver::Ipv4Resolver;
use crate::target::{self, Target};

/// Runs the dispatcher concurrently over every valid target and joins
/// completion.
pub struct Announcer {
    targets: Vec<Target>,
    resolver: Arc<dyn Ipv4Resolver>,
    dispatcher: Arc<Dispatcher>,
}

impl Announcer {
    /// Create an announcer over an already-validated target list.
    pub fn new(
        targets: Vec<Target>,
        resolver: Arc<dyn Ipv4Resolver>,
        dispatcher: Dispatcher,
    ) -> Self {
        Self {
            targets,
            resolver,
            dispatcher: Arc::new(dispatcher),
        }
    }

    /// Create an announcer from a parsed configuration document, dropping
    /// invalid targets.
    pub fn from_config(
        config: &AnnounceConfig,
        default_port: u16,
        resolver: Arc<dyn Ipv4Resolver>,
        dispatcher: Dispatcher,
    ) -> Self {
        Self::new(
            target::collect_targets(config, default_port),
            resolver,
            dispatcher,
        )
    }

    /// Number of targets in the fan-out set.
    pub fn target_count(&self) -> usize {
        self.targets.len()
    }

    /// Announce to every target concurrently.
    ///
    /// Returns one outcome per target, in completion order. The call
    /// returns only after every dispatch has finished; a failing or slow
    /// target never suppresses the outcomes of its siblings.
    pub async fn announce_all(&self) -> Vec<Outcome> {
        let resolved = self.resolve_if_needed().await;

        let mut tasks = JoinSet::new();
        for target in self.targets.iter().cloned() {
            let dispatcher = Arc::clone(&self.dispatcher);
            tasks.spawn(async move {
                match request::build(&target, resolved) {
                    Ok(req) => dispatcher.dispatch(&target, req).await,
                    Err(skip) => dispatcher.skip(&target, skip.to_string()).await,
                }
            });
        }

        let mut outcomes = Vec::with_capacity(self.targets.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => tracing::error!("announce task failed: {e}"),
            }
        }
        outcomes
    }

    /// Resolve the shared address once, and only when some target consumes
    /// it.
    async fn resolve_if_needed(&self) -> Option<Ipv4Addr> {
        if !self.targets.iter().any(Target::needs_resolved_address) {
            return None;
        }
        let resolved = self.resolver.resolve().await;
        if resolved.is_none() {
            tracing::warn!(
                "public IPv4 resolution failed; directory targets without a configured address will be skipped"
            );
        }
        resolved
    }
}
