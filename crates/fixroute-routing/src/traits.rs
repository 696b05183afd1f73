use async_trait::async_trait;
use fixroute_core::{ChannelRecord, NodeId, RouteHop};
use serde::{Deserialize, Serialize};

use crate::error::UpstreamError;

/// A node directory entry before its feature bits are decoded.
///
/// Older nodes report the features as `globalfeatures`, newer ones as
/// `features`; nodes that never sent an announcement report neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListedNode {
    #[serde(rename = "nodeid")]
    pub node_id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub globalfeatures: Option<String>,
}

impl ListedNode {
    pub fn new(node_id: NodeId, features: Option<String>) -> Self {
        Self {
            node_id,
            features,
            globalfeatures: None,
        }
    }

    /// The advertised feature hex, preferring `features` over `globalfeatures`.
    pub fn feature_hex(&self) -> Option<&str> {
        self.features
            .as_deref()
            .or(self.globalfeatures.as_deref())
    }
}

/// Parameters of a gap-filling path query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRequest {
    /// Node the path must end at.
    pub destination: NodeId,
    /// Amount the destination must receive.
    pub amount_msat: u64,
    pub risk_factor: u64,
    /// CLTV delta the destination must receive.
    pub final_cltv: u32,
    /// Node the path must start from.
    pub from: NodeId,
}

/// Full listings of the channel graph and node directory.
///
/// Implementations return everything they know; the cache does the
/// indexing.
#[async_trait]
pub trait GossipSource: Send + Sync {
    /// Every directed channel record currently known.
    async fn list_channels(&self) -> Result<Vec<ChannelRecord>, UpstreamError>;

    /// Every node currently known.
    async fn list_nodes(&self) -> Result<Vec<ListedNode>, UpstreamError>;
}

/// External path finder used when two consecutive waypoints share no
/// cached channel.
#[async_trait]
pub trait PathFindingOracle: Send + Sync {
    /// Returns hops ordered from `request.from` toward
    /// `request.destination`, with amounts and delays already accumulated.
    async fn find_path(&self, request: &PathRequest) -> Result<Vec<RouteHop>, UpstreamError>;
}
