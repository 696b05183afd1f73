pub mod init;
pub mod purge;
pub mod route;
pub mod status;

use serde::de::DeserializeOwned;
use serde::Deserialize;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:9737";

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

/// Decode a node API response, turning `{error}` bodies into a failure.
async fn read_response<T: DeserializeOwned>(what: &str, resp: reqwest::Response) -> anyhow::Result<T> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp.json().await?);
    }
    match resp.json::<ErrorResponse>().await {
        Ok(err) => anyhow::bail!("{what} failed (HTTP {status}): {}", err.error),
        Err(_) => anyhow::bail!("{what} failed (HTTP {status})"),
    }
}

fn unreachable_node(endpoint: &str, err: reqwest::Error) -> anyhow::Error {
    anyhow::anyhow!(
        "could not reach node at {endpoint}: {err}\nIs the node running? Start it with: fixroute-node"
    )
}
