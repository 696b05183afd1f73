//! `fixroute purge` — Reindex the node's gossip store.

use clap::Args;
use serde::Deserialize;

use super::{read_response, unreachable_node, DEFAULT_ENDPOINT};

#[derive(Args, Debug)]
pub struct PurgeArgs {
    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

#[derive(Deserialize)]
struct PurgeResponse {
    result: String,
}

pub async fn run(args: &PurgeArgs) -> anyhow::Result<()> {
    let url = format!("{}/v1/getfixedroute_purge", args.endpoint);
    let resp = reqwest::Client::new()
        .post(&url)
        .send()
        .await
        .map_err(|e| unreachable_node(&args.endpoint, e))?;
    let data: PurgeResponse = read_response("purge", resp).await?;
    println!("{}", data.result);
    Ok(())
}
