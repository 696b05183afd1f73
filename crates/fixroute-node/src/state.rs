//! Shared node state handed to the HTTP handlers.

use std::sync::Arc;
use std::time::Instant;

use fixroute_routing::{GossipCache, RouteBuilder};

/// Everything a request handler needs, shared behind an `Arc`.
pub struct NodeState {
    /// Cache refreshed at startup and on purge.
    pub cache: Arc<GossipCache>,
    /// Builder reading the same cache.
    pub builder: RouteBuilder,
    /// Upstream endpoint, reported by the status endpoint.
    pub upstream: String,
    /// When the node started.
    pub start_time: Instant,
}

impl NodeState {
    pub fn new(cache: Arc<GossipCache>, builder: RouteBuilder, upstream: String) -> Self {
        Self {
            cache,
            builder,
            upstream,
            start_time: Instant::now(),
        }
    }

    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
