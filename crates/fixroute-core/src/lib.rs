pub mod config;
pub mod error;
pub mod features;
pub mod route;
pub mod types;

pub use config::RouteConfig;
pub use error::CoreError;
pub use features::{NodeFeatures, OnionStyle};
pub use route::{Route, RouteHop};
pub use types::{ChannelRecord, NodeId, NodeRecord, ShortChannelId};
