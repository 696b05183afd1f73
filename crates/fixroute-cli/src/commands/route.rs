//! `fixroute route` — Build a route through fixed waypoints.

use clap::Args;
use fixroute_core::{NodeId, Route};
use serde::{Deserialize, Serialize};

use super::{read_response, unreachable_node, DEFAULT_ENDPOINT};

#[derive(Args, Debug)]
pub struct RouteArgs {
    /// Amount delivered to the last waypoint, in millisatoshi.
    #[arg(short, long)]
    pub amount: u64,

    /// Waypoint node ids, source first.
    #[arg(required = true, num_args = 2..)]
    pub nodes: Vec<NodeId>,

    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Print the raw JSON route.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct FixedRouteRequest<'a> {
    amount: u64,
    nodes: &'a [NodeId],
}

#[derive(Deserialize)]
struct FixedRouteResponse {
    route: Route,
}

fn render_route(route: &Route) -> String {
    let mut out = String::new();
    for (i, hop) in route.hops().iter().enumerate() {
        out.push_str(&format!(
            "  {:>2}. {} via {} (dir {})  {} msat  delay {}  {}\n",
            i + 1,
            hop.id,
            hop.channel,
            hop.direction,
            hop.amount_msat,
            hop.delay,
            hop.style
        ));
    }
    out.push_str(&format!(
        "  sent {} msat, delivered {} msat, fees {} msat, total delay {}\n",
        route.sent_msat(),
        route.delivered_msat(),
        route.total_fees_msat(),
        route.total_delay()
    ));
    out
}

pub async fn run(args: &RouteArgs) -> anyhow::Result<()> {
    let url = format!("{}/v1/getfixedroute", args.endpoint);
    let body = FixedRouteRequest {
        amount: args.amount,
        nodes: &args.nodes,
    };

    let resp = reqwest::Client::new()
        .post(&url)
        .json(&body)
        .send()
        .await
        .map_err(|e| unreachable_node(&args.endpoint, e))?;
    let data: FixedRouteResponse = read_response("route", resp).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&data.route)?);
    } else {
        println!("Route ({} hops):", data.route.hop_count());
        print!("{}", render_route(&data.route));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_route() {
        let route: Route = serde_json::from_value(json!([
            {
                "id": "032222222222222222222222222222222222222222222222222222222222222222",
                "channel": "100x1x0",
                "direction": 0,
                "msatoshi": 1004,
                "amount_msat": "1004msat",
                "delay": 29,
                "style": "tlv"
            },
            {
                "id": "023333333333333333333333333333333333333333333333333333333333333333",
                "channel": "200x1x0",
                "direction": 1,
                "msatoshi": 1000,
                "amount_msat": "1000msat",
                "delay": 9,
                "style": "legacy"
            }
        ]))
        .unwrap();

        let rendered = render_route(&route);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("100x1x0"));
        assert!(lines[0].contains("1004 msat"));
        assert!(lines[1].contains("legacy"));
        assert!(lines[2].contains("fees 4 msat"));
        assert!(lines[2].contains("total delay 29"));
    }
}
