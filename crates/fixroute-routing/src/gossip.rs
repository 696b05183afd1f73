use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use fixroute_core::{ChannelRecord, NodeFeatures, NodeId, NodeRecord};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::error::RoutingError;
use crate::traits::{GossipSource, ListedNode};

/// Directed channel key: (source, destination).
type ChannelKey = (NodeId, NodeId);

/// An immutable, internally consistent view of the gossip store.
#[derive(Debug, Default)]
pub struct GossipSnapshot {
    channels: HashMap<ChannelKey, ChannelRecord>,
    nodes: HashMap<NodeId, NodeRecord>,
    refreshed_at: Option<DateTime<Utc>>,
}

impl GossipSnapshot {
    /// A snapshot with no channels or nodes, as held before the first refresh.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Index full channel and node listings.
    ///
    /// Later channel entries for the same (source, destination) pair replace
    /// earlier ones. Feature hex is decoded here; one undecodable entry
    /// rejects the whole listing.
    pub fn build(
        channels: Vec<ChannelRecord>,
        nodes: Vec<ListedNode>,
    ) -> Result<Self, RoutingError> {
        let listed = channels.len();
        let mut channel_index = HashMap::with_capacity(listed);
        for channel in channels {
            channel_index.insert((channel.source, channel.destination), channel);
        }
        if channel_index.len() < listed {
            tracing::debug!(
                listed,
                indexed = channel_index.len(),
                "collapsed parallel channels onto one record per direction"
            );
        }

        let mut node_index = HashMap::with_capacity(nodes.len());
        for node in nodes {
            let features = match node.feature_hex() {
                Some(hex) => NodeFeatures::from_hex(hex).map_err(|e| {
                    RoutingError::MalformedFeatureData {
                        node_id: node.node_id,
                        reason: e.to_string(),
                    }
                })?,
                None => NodeFeatures::empty(),
            };
            node_index.insert(
                node.node_id,
                NodeRecord {
                    node_id: node.node_id,
                    features,
                },
            );
        }

        Ok(Self {
            channels: channel_index,
            nodes: node_index,
            refreshed_at: Some(Utc::now()),
        })
    }

    pub fn channel(&self, source: &NodeId, destination: &NodeId) -> Option<&ChannelRecord> {
        self.channels.get(&(*source, *destination))
    }

    pub fn node(&self, node_id: &NodeId) -> Option<&NodeRecord> {
        self.nodes.get(node_id)
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            channels: self.channel_count(),
            nodes: self.node_count(),
            refreshed_at: self.refreshed_at,
        }
    }
}

/// Size of the cached gossip and when it was last replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub channels: usize,
    pub nodes: usize,
    pub refreshed_at: Option<DateTime<Utc>>,
}

/// Process-wide gossip cache.
///
/// Readers take an `Arc` of the current snapshot; `refresh` builds a new
/// snapshot off to the side and swaps it in under the write lock, so no
/// reader ever sees a channel index and node index from different refreshes.
pub struct GossipCache {
    source: Arc<dyn GossipSource>,
    current: RwLock<Arc<GossipSnapshot>>,
    /// Serializes refreshes.
    refresh_lock: Mutex<()>,
}

impl GossipCache {
    /// Create an empty cache backed by `source`. Call [`refresh`](Self::refresh)
    /// before building routes.
    pub fn new(source: Arc<dyn GossipSource>) -> Self {
        Self {
            source,
            current: RwLock::new(Arc::new(GossipSnapshot::empty())),
            refresh_lock: Mutex::new(()),
        }
    }

    /// Re-query both listings in full and replace the cache contents.
    ///
    /// On any failure the previous snapshot stays in place.
    pub async fn refresh(&self) -> Result<CacheStats, RoutingError> {
        let _guard = self.refresh_lock.lock().await;
        tracing::debug!("refreshing gossip cache");

        let channels = self
            .source
            .list_channels()
            .await
            .map_err(RoutingError::Refresh)?;
        let nodes = self
            .source
            .list_nodes()
            .await
            .map_err(RoutingError::Refresh)?;

        let snapshot = Arc::new(GossipSnapshot::build(channels, nodes)?);
        let stats = snapshot.stats();
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = snapshot;

        tracing::info!(
            channels = stats.channels,
            nodes = stats.nodes,
            "gossip cache reindexed"
        );
        Ok(stats)
    }

    /// The current snapshot. Holding it keeps a consistent view even while a
    /// refresh swaps in a newer one.
    pub fn snapshot(&self) -> Arc<GossipSnapshot> {
        let current = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*current)
    }

    pub fn lookup_channel(&self, source: &NodeId, destination: &NodeId) -> Option<ChannelRecord> {
        self.snapshot().channel(source, destination).cloned()
    }

    pub fn lookup_node(&self, node_id: &NodeId) -> Option<NodeRecord> {
        self.snapshot().node(node_id).cloned()
    }

    pub fn stats(&self) -> CacheStats {
        self.snapshot().stats()
    }
}
