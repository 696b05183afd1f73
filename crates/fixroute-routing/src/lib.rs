//! fixroute routing — builds source routes over a fixed list of waypoints.
//!
//! This crate provides:
//! - [`GossipCache`] — a snapshot of the channel graph and node directory,
//!   replaced wholesale on every refresh.
//! - [`RouteBuilder`] — walks the waypoints backward, accumulating fees and
//!   CLTV deltas, and asks a [`PathFindingOracle`] to fill gaps.
//! - [`OnionStyleSelector`] — picks the per-hop onion payload style.
//! - [`GossipSource`] and [`PathFindingOracle`] — the seams to the node that
//!   owns the gossip store.

pub mod builder;
pub mod error;
pub mod gossip;
pub mod onion;
pub mod traits;

// Re-exports for convenience.
pub use builder::{channel_direction, RouteBuilder};
pub use error::{RoutingError, UpstreamError};
pub use gossip::{CacheStats, GossipCache, GossipSnapshot};
pub use onion::OnionStyleSelector;
pub use traits::{GossipSource, ListedNode, PathFindingOracle, PathRequest};
