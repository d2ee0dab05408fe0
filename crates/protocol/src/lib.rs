//! Shared protocol types for the Syncify dashboard
//!
//! Defines the JSON records exchanged with the sync backend and the
//! Socket.IO / Engine.IO text framing they travel in.

pub mod error;
pub mod messages;
pub mod socketio;

pub use error::ProtocolError;
pub use messages::*;
pub use socketio::*;
