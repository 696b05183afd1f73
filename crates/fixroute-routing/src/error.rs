use fixroute_core::NodeId;

/// Failure talking to the node that provides gossip and path finding.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UpstreamError {
    #[error("transport error calling {method}: {reason}")]
    Transport { method: String, reason: String },

    #[error("{method} returned error {code}: {message}")]
    Rpc {
        method: String,
        code: i64,
        message: String,
    },

    #[error("could not decode {method} response: {reason}")]
    Decode { method: String, reason: String },
}

/// Errors that abort a route build or a cache refresh.
#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    #[error("no cached channel from {from} to {to}")]
    MissingChannel { from: NodeId, to: NodeId },

    #[error("no cached node announcement for {0}")]
    MissingNode(NodeId),

    #[error("malformed feature data for node {node_id}: {reason}")]
    MalformedFeatureData { node_id: NodeId, reason: String },

    #[error("path finding from {from} to {to} failed: {source}")]
    Oracle {
        from: NodeId,
        to: NodeId,
        #[source]
        source: UpstreamError,
    },

    #[error("no usable path from {from} to {to}: {reason}")]
    NoPath {
        from: NodeId,
        to: NodeId,
        reason: String,
    },

    #[error("gossip refresh failed: {0}")]
    Refresh(#[source] UpstreamError),

    #[error("invalid waypoints: {0}")]
    InvalidWaypoints(String),

    #[error("amount must be greater than zero")]
    InvalidAmount,

    #[error("{0} overflowed while accumulating the route")]
    Overflow(&'static str),
}
