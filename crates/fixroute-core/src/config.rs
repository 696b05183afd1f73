use serde::{Deserialize, Serialize};

/// Route construction policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteConfig {
    /// CLTV delta handed to the final recipient.
    #[serde(default = "default_min_final_cltv")]
    pub min_final_cltv: u32,
    /// `riskfactor` passed to the path-finding oracle when filling a gap.
    #[serde(default = "default_risk_factor")]
    pub risk_factor: u64,
}

fn default_min_final_cltv() -> u32 {
    9
}
fn default_risk_factor() -> u64 {
    1
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            min_final_cltv: default_min_final_cltv(),
            risk_factor: default_risk_factor(),
        }
    }
}
