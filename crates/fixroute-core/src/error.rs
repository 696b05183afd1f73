/// Errors raised while parsing identifiers and gossip fields.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid node id {input:?}: {reason}")]
    InvalidNodeId { input: String, reason: String },

    #[error("invalid short channel id {0:?}: expected <block>x<tx>x<output>")]
    InvalidShortChannelId(String),

    #[error("malformed feature bits {input:?}: {reason}")]
    MalformedFeatures { input: String, reason: String },

    #[error("invalid msat amount: {0:?}")]
    InvalidAmount(String),

    #[error("invalid direction {0}: must be 0 or 1")]
    InvalidDirection(u8),
}
