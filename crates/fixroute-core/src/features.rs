//! Node feature bits as advertised in `node_announcement`.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

use crate::error::CoreError;

/// Feature bits of a node, decoded once from the hex string reported by
/// `listnodes`.
///
/// Stored big-endian like the wire encoding, so bit 0 lives in the last
/// byte. Leading zero bytes are dropped, which makes equality independent of
/// how much padding the upstream hex string carried.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct NodeFeatures {
    flags: Vec<u8>,
}

impl NodeFeatures {
    /// `var_onion_optin`, required.
    pub const VAR_ONION_REQUIRED: usize = 8;
    /// `var_onion_optin`, optional.
    pub const VAR_ONION_OPTIONAL: usize = 9;

    pub fn empty() -> Self {
        Self::default()
    }

    /// Decode a hex-encoded feature integer. Accepts an optional `0x` prefix
    /// and odd-length strings. A zero-length vector means no bits are set.
    pub fn from_hex(input: &str) -> Result<Self, CoreError> {
        let digits = input
            .strip_prefix("0x")
            .or_else(|| input.strip_prefix("0X"))
            .unwrap_or(input);
        if digits.is_empty() {
            return Ok(Self::empty());
        }
        let padded = if digits.len() % 2 == 1 {
            format!("0{digits}")
        } else {
            digits.to_string()
        };
        let bytes = hex::decode(&padded).map_err(|e| CoreError::MalformedFeatures {
            input: input.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self::from_be_bytes(bytes))
    }

    pub fn from_be_bytes(bytes: Vec<u8>) -> Self {
        let first_set = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
        Self {
            flags: bytes[first_set..].to_vec(),
        }
    }

    /// Build a feature set with exactly the given bits set.
    pub fn from_bits(bits: &[usize]) -> Self {
        let len = bits.iter().map(|b| b / 8 + 1).max().unwrap_or(0);
        let mut flags = vec![0u8; len];
        for bit in bits {
            flags[len - 1 - bit / 8] |= 1 << (bit % 8);
        }
        Self::from_be_bytes(flags)
    }

    pub fn is_set(&self, bit: usize) -> bool {
        let byte = bit / 8;
        if byte >= self.flags.len() {
            return false;
        }
        self.flags[self.flags.len() - 1 - byte] & (1 << (bit % 8)) != 0
    }

    pub fn supports_var_onion_optin(&self) -> bool {
        self.is_set(Self::VAR_ONION_REQUIRED) || self.is_set(Self::VAR_ONION_OPTIONAL)
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.flags)
    }
}

impl fmt::Debug for NodeFeatures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeFeatures(0x{})", self.to_hex())
    }
}

impl Serialize for NodeFeatures {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Per-hop onion payload encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnionStyle {
    /// Fixed 65-byte hop data.
    Legacy,
    /// Variable-length TLV payload.
    Tlv,
}

impl OnionStyle {
    pub fn for_features(features: &NodeFeatures) -> Self {
        if features.supports_var_onion_optin() {
            OnionStyle::Tlv
        } else {
            OnionStyle::Legacy
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OnionStyle::Legacy => "legacy",
            OnionStyle::Tlv => "tlv",
        }
    }
}

impl fmt::Display for OnionStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
