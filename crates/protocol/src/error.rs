use thiserror::Error;

/// Failures while decoding frames or event payloads from the backend
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("empty packet")]
    EmptyPacket,

    #[error("unknown {layer} packet type '{kind}'")]
    UnknownPacketType { layer: &'static str, kind: char },

    #[error("binary packets are not supported")]
    BinaryUnsupported,

    #[error("malformed event: {0}")]
    MalformedEvent(&'static str),

    #[error("invalid payload for '{event}': {source}")]
    Payload {
        event: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ProtocolError>;
