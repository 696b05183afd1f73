//! The fixroute node orchestrator.
//!
//! Wires the Core Lightning client into the gossip cache and route builder,
//! indexes the gossip store once, then serves the HTTP API.

use anyhow::Result;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use fixroute_routing::{GossipCache, RouteBuilder};

use crate::config::FixrouteConfig;
use crate::state::NodeState;
use crate::upstream::ClnRestClient;

pub struct FixrouteNode {
    config: FixrouteConfig,
    cache: Arc<GossipCache>,
    /// Moved into the shared state by `start`.
    builder: Option<RouteBuilder>,
    state: Option<Arc<NodeState>>,
    server: Option<JoinHandle<Result<()>>>,
}

impl FixrouteNode {
    pub fn new(config: FixrouteConfig) -> Result<Self> {
        let client = Arc::new(ClnRestClient::new(&config.upstream)?);
        let cache = Arc::new(GossipCache::new(client.clone()));
        let builder = RouteBuilder::new(cache.clone(), client, config.routing.clone());

        tracing::info!(upstream = %config.upstream.endpoint, "fixroute node created");

        Ok(Self {
            config,
            cache,
            builder: Some(builder),
            state: None,
            server: None,
        })
    }

    /// Index the gossip store, then start accepting API requests.
    pub async fn start(&mut self) -> Result<()> {
        let builder = self
            .builder
            .take()
            .ok_or_else(|| anyhow::anyhow!("node already started"))?;

        tracing::info!("indexing gossip store");
        let stats = self.cache.refresh().await?;
        tracing::info!(
            channels = stats.channels,
            nodes = stats.nodes,
            "gossip store indexed"
        );

        let state = Arc::new(NodeState::new(
            self.cache.clone(),
            builder,
            self.config.upstream.endpoint.clone(),
        ));

        let listener = TcpListener::bind(self.config.api_addr()).await?;
        let server = tokio::spawn(crate::api::start_api_server(listener, state.clone()));

        self.state = Some(state);
        self.server = Some(server);
        Ok(())
    }

    /// Wait until the API server stops.
    pub async fn run(&mut self) -> Result<()> {
        let server = self
            .server
            .as_mut()
            .ok_or_else(|| anyhow::anyhow!("node not started"))?;
        let result = server.await;
        self.server = None;
        result?
    }

    pub async fn shutdown(&mut self) -> Result<()> {
        tracing::info!("shutting down fixroute node");
        if let Some(server) = self.server.take() {
            server.abort();
        }
        if let Some(state) = self.state.take() {
            tracing::info!(uptime_secs = state.uptime_secs(), "fixroute node stopped");
        }
        Ok(())
    }
}
