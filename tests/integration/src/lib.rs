//! Test doubles shared by the integration tests: a gossip source whose
//! listings can be swapped between refreshes and a path finder answering
//! from a fixed table.

use async_trait::async_trait;
use fixroute_core::{ChannelRecord, NodeId, OnionStyle, RouteHop};
use fixroute_routing::{GossipSource, ListedNode, PathFindingOracle, PathRequest, UpstreamError};
use std::collections::HashMap;
use std::sync::Mutex;

/// Node id `02 tag tag ... tag`.
pub fn node(tag: u8) -> NodeId {
    let mut bytes = [tag; 33];
    bytes[0] = 0x02;
    NodeId::from_bytes(bytes).expect("valid prefix")
}

pub fn channel(
    source: NodeId,
    destination: NodeId,
    scid: &str,
    base_fee_msat: u32,
    fee_per_millionth: u32,
    cltv_delta: u32,
) -> ChannelRecord {
    ChannelRecord {
        source,
        destination,
        short_channel_id: scid.parse().expect("valid short channel id"),
        base_fee_msat,
        fee_per_millionth,
        cltv_delta,
    }
}

pub fn hop(id: NodeId, scid: &str, amount_msat: u64, delay: u32) -> RouteHop {
    RouteHop {
        id,
        channel: scid.parse().expect("valid short channel id"),
        direction: 0,
        amount_msat,
        delay,
        style: OnionStyle::Tlv,
    }
}

/// Node entry advertising `var_onion_optin` as optional.
pub fn tlv_node(id: NodeId) -> ListedNode {
    ListedNode::new(id, Some("0200".into()))
}

pub fn legacy_node(id: NodeId) -> ListedNode {
    ListedNode::new(id, None)
}

#[derive(Default)]
struct Listings {
    channels: Vec<ChannelRecord>,
    nodes: Vec<ListedNode>,
    failing: bool,
}

/// Gossip source whose answers can be changed between refreshes.
#[derive(Default)]
pub struct SwappableGossip {
    listings: Mutex<Listings>,
}

impl SwappableGossip {
    pub fn new(channels: Vec<ChannelRecord>, nodes: Vec<ListedNode>) -> Self {
        Self {
            listings: Mutex::new(Listings {
                channels,
                nodes,
                failing: false,
            }),
        }
    }

    pub fn set_channels(&self, channels: Vec<ChannelRecord>) {
        self.listings.lock().expect("listings lock").channels = channels;
    }

    /// Make every following listing fail with a transport error.
    pub fn set_failing(&self, failing: bool) {
        self.listings.lock().expect("listings lock").failing = failing;
    }
}

#[async_trait]
impl GossipSource for SwappableGossip {
    async fn list_channels(&self) -> Result<Vec<ChannelRecord>, UpstreamError> {
        let listings = self.listings.lock().expect("listings lock");
        if listings.failing {
            return Err(UpstreamError::Transport {
                method: "listchannels".into(),
                reason: "connection refused".into(),
            });
        }
        Ok(listings.channels.clone())
    }

    async fn list_nodes(&self) -> Result<Vec<ListedNode>, UpstreamError> {
        let listings = self.listings.lock().expect("listings lock");
        if listings.failing {
            return Err(UpstreamError::Transport {
                method: "listnodes".into(),
                reason: "connection refused".into(),
            });
        }
        Ok(listings.nodes.clone())
    }
}

/// Path finder answering `(from, destination)` queries from a table and
/// recording every request it receives.
#[derive(Default)]
pub struct PathTable {
    paths: HashMap<(NodeId, NodeId), Vec<RouteHop>>,
    requests: Mutex<Vec<PathRequest>>,
}

impl PathTable {
    pub fn with_path(mut self, from: NodeId, destination: NodeId, hops: Vec<RouteHop>) -> Self {
        self.paths.insert((from, destination), hops);
        self
    }

    pub fn requests(&self) -> Vec<PathRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

#[async_trait]
impl PathFindingOracle for PathTable {
    async fn find_path(&self, request: &PathRequest) -> Result<Vec<RouteHop>, UpstreamError> {
        self.requests
            .lock()
            .expect("requests lock")
            .push(request.clone());
        self.paths
            .get(&(request.from, request.destination))
            .cloned()
            .ok_or_else(|| UpstreamError::Rpc {
                method: "getroute".into(),
                code: 205,
                message: "Could not find a route".into(),
            })
    }
}
