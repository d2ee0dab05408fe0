use syncify_protocol::{PlaylistId, ProtocolError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("no playlist with id {0}")]
    UnknownPlaylist(PlaylistId),

    #[error("playlist index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
