use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::features::NodeFeatures;

/// Length of a compressed secp256k1 public key.
pub const NODE_ID_LEN: usize = 33;

/// A Lightning node identifier: the node's compressed public key.
///
/// Ordering is byte-wise, which is the ordering BOLT 7 uses to decide
/// which end of a channel is `node_id_1`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId([u8; NODE_ID_LEN]);

impl NodeId {
    pub fn from_bytes(bytes: [u8; NODE_ID_LEN]) -> Result<Self, CoreError> {
        match bytes[0] {
            0x02 | 0x03 => Ok(Self(bytes)),
            prefix => Err(CoreError::InvalidNodeId {
                input: hex::encode(bytes),
                reason: format!("unexpected key prefix {prefix:#04x}"),
            }),
        }
    }

    pub fn as_bytes(&self) -> &[u8; NODE_ID_LEN] {
        &self.0
    }
}

impl FromStr for NodeId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: String| CoreError::InvalidNodeId {
            input: s.to_string(),
            reason,
        };
        let raw = hex::decode(s).map_err(|e| invalid(e.to_string()))?;
        let bytes: [u8; NODE_ID_LEN] = raw
            .try_into()
            .map_err(|raw: Vec<u8>| invalid(format!("expected 33 bytes, got {}", raw.len())))?;
        Self::from_bytes(bytes)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({self})")
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Compact channel reference `<block>x<tx>x<output>`, packed as in BOLT 7:
/// 3 bytes block height, 3 bytes transaction index, 2 bytes output index.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShortChannelId(u64);

impl ShortChannelId {
    const MAX_BLOCK: u32 = 0x00ff_ffff;
    const MAX_TX: u32 = 0x00ff_ffff;

    pub fn new(block: u32, tx_index: u32, output_index: u16) -> Option<Self> {
        if block > Self::MAX_BLOCK || tx_index > Self::MAX_TX {
            return None;
        }
        Some(Self(
            (u64::from(block) << 40) | (u64::from(tx_index) << 16) | u64::from(output_index),
        ))
    }

    pub fn block_height(&self) -> u32 {
        (self.0 >> 40) as u32
    }

    pub fn tx_index(&self) -> u32 {
        ((self.0 >> 16) & 0x00ff_ffff) as u32
    }

    pub fn output_index(&self) -> u16 {
        (self.0 & 0xffff) as u16
    }

    pub fn to_u64(&self) -> u64 {
        self.0
    }
}

impl FromStr for ShortChannelId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidShortChannelId(s.to_string());
        let mut parts = s.split('x');
        let (Some(block), Some(tx), Some(output), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };
        let block = block.parse::<u32>().map_err(|_| invalid())?;
        let tx = tx.parse::<u32>().map_err(|_| invalid())?;
        let output = output.parse::<u16>().map_err(|_| invalid())?;
        Self::new(block, tx, output).ok_or_else(invalid)
    }
}

impl fmt::Display for ShortChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{}x{}",
            self.block_height(),
            self.tx_index(),
            self.output_index()
        )
    }
}

impl fmt::Debug for ShortChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ShortChannelId({self})")
    }
}

impl Serialize for ShortChannelId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ShortChannelId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One direction of a channel as advertised in gossip.
///
/// Field names on the wire follow the `listchannels` output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelRecord {
    pub source: NodeId,
    pub destination: NodeId,
    pub short_channel_id: ShortChannelId,
    /// Flat fee charged for forwarding over this direction.
    #[serde(rename = "base_fee_millisatoshi")]
    pub base_fee_msat: u32,
    /// Proportional fee in millionths of the forwarded amount.
    pub fee_per_millionth: u32,
    /// Blocks added to the incoming HTLC's expiry by this hop.
    #[serde(rename = "delay")]
    pub cltv_delta: u32,
}

impl ChannelRecord {
    /// Fee charged for forwarding `amount_msat` over this channel:
    /// `base + floor(amount * ppm / 1_000_000)`. `None` on overflow.
    pub fn fee_for(&self, amount_msat: u64) -> Option<u64> {
        let proportional =
            u128::from(amount_msat) * u128::from(self.fee_per_millionth) / 1_000_000;
        let fee = u128::from(self.base_fee_msat) + proportional;
        u64::try_from(fee).ok()
    }
}

/// Node metadata with its feature bits already decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRecord {
    pub node_id: NodeId,
    pub features: NodeFeatures,
}
