//! Client for the Core Lightning REST interface.
//!
//! Every RPC is `POST {endpoint}/v1/{method}` with the parameters as a JSON
//! object. Failed calls come back as a non-2xx status with a
//! `{"code", "message"}` body.

use async_trait::async_trait;
use fixroute_core::{ChannelRecord, RouteHop};
use fixroute_routing::{GossipSource, ListedNode, PathFindingOracle, PathRequest, UpstreamError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::UpstreamConfig;

#[derive(Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

#[derive(Deserialize)]
struct ListChannelsResponse {
    channels: Vec<ChannelRecord>,
}

#[derive(Deserialize)]
struct ListNodesResponse {
    nodes: Vec<ListedNode>,
}

#[derive(Deserialize)]
struct GetRouteResponse {
    route: Vec<RouteHop>,
}

#[derive(Serialize)]
struct NoParams {}

#[derive(Serialize)]
struct GetRouteParams {
    id: String,
    amount_msat: u64,
    riskfactor: u64,
    cltv: u32,
    fromid: String,
}

/// Gossip listings and `getroute` served by a Core Lightning node.
#[derive(Clone)]
pub struct ClnRestClient {
    http: reqwest::Client,
    endpoint: String,
    rune: Option<String>,
}

impl ClnRestClient {
    pub fn new(config: &UpstreamConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;
        Ok(Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            rune: config.rune.clone(),
        })
    }

    async fn call<P, R>(&self, method: &str, params: &P) -> Result<R, UpstreamError>
    where
        P: Serialize + Sync,
        R: DeserializeOwned,
    {
        let transport = |e: reqwest::Error| UpstreamError::Transport {
            method: method.to_string(),
            reason: e.to_string(),
        };

        let url = format!("{}/v1/{}", self.endpoint, method);
        let mut request = self.http.post(&url).json(params);
        if let Some(rune) = &self.rune {
            request = request.header("Rune", rune);
        }

        tracing::trace!(%method, "calling upstream");
        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        let body = response.bytes().await.map_err(transport)?;

        if !status.is_success() {
            let err = match serde_json::from_slice::<RpcErrorBody>(&body) {
                Ok(rpc) => UpstreamError::Rpc {
                    method: method.to_string(),
                    code: rpc.code,
                    message: rpc.message,
                },
                Err(_) => UpstreamError::Rpc {
                    method: method.to_string(),
                    code: i64::from(status.as_u16()),
                    message: String::from_utf8_lossy(&body).into_owned(),
                },
            };
            tracing::warn!(%method, %status, error = %err, "upstream call failed");
            return Err(err);
        }

        serde_json::from_slice(&body).map_err(|e| UpstreamError::Decode {
            method: method.to_string(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl GossipSource for ClnRestClient {
    async fn list_channels(&self) -> Result<Vec<ChannelRecord>, UpstreamError> {
        let response: ListChannelsResponse = self.call("listchannels", &NoParams {}).await?;
        Ok(response.channels)
    }

    async fn list_nodes(&self) -> Result<Vec<ListedNode>, UpstreamError> {
        let response: ListNodesResponse = self.call("listnodes", &NoParams {}).await?;
        Ok(response.nodes)
    }
}

#[async_trait]
impl PathFindingOracle for ClnRestClient {
    async fn find_path(&self, request: &PathRequest) -> Result<Vec<RouteHop>, UpstreamError> {
        let params = GetRouteParams {
            id: request.destination.to_string(),
            amount_msat: request.amount_msat,
            riskfactor: request.risk_factor,
            cltv: request.final_cltv,
            fromid: request.from.to_string(),
        };
        let response: GetRouteResponse = self.call("getroute", &params).await?;
        Ok(response.route)
    }
}
