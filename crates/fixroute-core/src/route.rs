use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::CoreError;
use crate::features::OnionStyle;
use crate::types::{NodeId, ShortChannelId};

/// One forwarding step of a source route, in the shape `sendpay` expects.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RouteHopRepr")]
pub struct RouteHop {
    /// Node this hop delivers to.
    pub id: NodeId,
    pub channel: ShortChannelId,
    /// Direction of the channel update used for this hop (0 or 1).
    pub direction: u8,
    /// Amount handed to `id`, already including every downstream fee.
    pub amount_msat: u64,
    /// CLTV expiry delta handed to `id`.
    pub delay: u32,
    pub style: OnionStyle,
}

impl Serialize for RouteHop {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut hop = serializer.serialize_struct("RouteHop", 7)?;
        hop.serialize_field("id", &self.id)?;
        hop.serialize_field("channel", &self.channel)?;
        hop.serialize_field("direction", &self.direction)?;
        hop.serialize_field("msatoshi", &self.amount_msat)?;
        hop.serialize_field("amount_msat", &format!("{}msat", self.amount_msat))?;
        hop.serialize_field("delay", &self.delay)?;
        hop.serialize_field("style", &self.style)?;
        hop.end()
    }
}

/// Amount field as found in hop JSON: a bare number or the `"<n>msat"` string.
#[derive(Deserialize)]
#[serde(untagged)]
enum MsatField {
    Number(u64),
    Text(String),
}

impl MsatField {
    fn value(self) -> Result<u64, CoreError> {
        match self {
            MsatField::Number(n) => Ok(n),
            MsatField::Text(s) => s
                .strip_suffix("msat")
                .unwrap_or(&s)
                .parse()
                .map_err(|_| CoreError::InvalidAmount(s.clone())),
        }
    }
}

#[derive(Deserialize)]
struct RouteHopRepr {
    id: NodeId,
    channel: ShortChannelId,
    direction: u8,
    #[serde(default)]
    msatoshi: Option<u64>,
    #[serde(default)]
    amount_msat: Option<MsatField>,
    delay: u32,
    #[serde(default)]
    style: Option<OnionStyle>,
}

impl TryFrom<RouteHopRepr> for RouteHop {
    type Error = CoreError;

    fn try_from(repr: RouteHopRepr) -> Result<Self, Self::Error> {
        if repr.direction > 1 {
            return Err(CoreError::InvalidDirection(repr.direction));
        }
        let amount_msat = match (repr.amount_msat, repr.msatoshi) {
            (Some(field), _) => field.value()?,
            (None, Some(n)) => n,
            (None, None) => return Err(CoreError::InvalidAmount("missing".into())),
        };
        Ok(Self {
            id: repr.id,
            channel: repr.channel,
            direction: repr.direction,
            amount_msat,
            delay: repr.delay,
            // Nodes stopped reporting the style once legacy onions were retired.
            style: repr.style.unwrap_or(OnionStyle::Tlv),
        })
    }
}

/// A source route: hops ordered from the sender toward the final recipient.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Route {
    hops: Vec<RouteHop>,
}

impl Route {
    pub fn new(hops: Vec<RouteHop>) -> Self {
        Self { hops }
    }

    pub fn hops(&self) -> &[RouteHop] {
        &self.hops
    }

    pub fn into_hops(self) -> Vec<RouteHop> {
        self.hops
    }

    pub fn hop_count(&self) -> usize {
        self.hops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }

    /// Amount the sender hands to the first hop.
    pub fn sent_msat(&self) -> u64 {
        self.hops.first().map_or(0, |h| h.amount_msat)
    }

    /// Amount the final hop delivers.
    pub fn delivered_msat(&self) -> u64 {
        self.hops.last().map_or(0, |h| h.amount_msat)
    }

    /// Total fees paid to intermediate nodes.
    pub fn total_fees_msat(&self) -> u64 {
        self.sent_msat().saturating_sub(self.delivered_msat())
    }

    /// CLTV delta of the first hop, i.e. the total lock time of the route.
    pub fn total_delay(&self) -> u32 {
        self.hops.first().map_or(0, |h| h.delay)
    }
}
