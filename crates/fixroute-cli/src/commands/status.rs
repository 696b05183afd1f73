//! `fixroute status` — Query the status of a running node.

use clap::Args;
use serde::Deserialize;

use super::{read_response, unreachable_node, DEFAULT_ENDPOINT};

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Print the raw JSON response.
    #[arg(long)]
    pub json: bool,
}

#[derive(Deserialize)]
struct StatusResponse {
    version: String,
    uptime_secs: u64,
    upstream: String,
    channels: usize,
    nodes: usize,
    refreshed_at: Option<String>,
}

pub async fn run(args: &StatusArgs) -> anyhow::Result<()> {
    let url = format!("{}/v1/status", args.endpoint);
    let resp = reqwest::get(&url)
        .await
        .map_err(|e| unreachable_node(&args.endpoint, e))?;

    if args.json {
        let data: serde_json::Value = read_response("status", resp).await?;
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(());
    }

    let data: StatusResponse = read_response("status", resp).await?;
    print!("{}", render_status(&args.endpoint, &data));
    Ok(())
}

fn render_status(endpoint: &str, data: &StatusResponse) -> String {
    let indexed = data.refreshed_at.as_deref().unwrap_or("never");
    [
        "Node Status:".to_string(),
        format!("  Endpoint:  {endpoint}"),
        format!("  Version:   {}", data.version),
        format!("  Uptime:    {}s", data.uptime_secs),
        format!("  Upstream:  {}", data.upstream),
        format!("  Channels:  {}", data.channels),
        format!("  Nodes:     {}", data.nodes),
        format!("  Indexed:   {indexed}"),
    ]
    .iter()
    .map(|line| format!("{line}\n"))
    .collect()
}
