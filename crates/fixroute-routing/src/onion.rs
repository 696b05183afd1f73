use fixroute_core::{NodeId, OnionStyle};

use crate::error::RoutingError;
use crate::gossip::GossipSnapshot;

/// Picks the onion payload style for a hop from its destination's features.
pub struct OnionStyleSelector<'a> {
    snapshot: &'a GossipSnapshot,
}

impl<'a> OnionStyleSelector<'a> {
    pub fn new(snapshot: &'a GossipSnapshot) -> Self {
        Self { snapshot }
    }

    /// `tlv` when the node advertises `var_onion_optin` (bit 8 or 9),
    /// `legacy` otherwise.
    pub fn select(&self, node_id: &NodeId) -> Result<OnionStyle, RoutingError> {
        let node = self
            .snapshot
            .node(node_id)
            .ok_or(RoutingError::MissingNode(*node_id))?;
        Ok(OnionStyle::for_features(&node.features))
    }
}
