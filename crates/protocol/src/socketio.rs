//! Socket.IO v5 over Engine.IO v4, text frames only
//!
//! The backend is a Flask-SocketIO server. Every WebSocket text frame is an
//! Engine.IO packet whose first character is its type; Socket.IO packets ride
//! inside Engine.IO `message` packets.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ProtocolError, Result};

pub const ENGINE_IO_VERSION: u8 = 4;
pub const DEFAULT_NAMESPACE: &str = "/";

/// Build the WebSocket endpoint for the page's origin
///
/// `page_protocol` is `location.protocol` (`"http:"` or `"https:"`).
pub fn endpoint_url(page_protocol: &str, host: &str, path: &str) -> String {
    let scheme = if page_protocol == "https:" { "wss" } else { "ws" };
    let trimmed = path.trim_matches('/');
    let path = if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{trimmed}/")
    };
    format!("{scheme}://{host}{path}?EIO={ENGINE_IO_VERSION}&transport=websocket")
}

/// Payload of the Engine.IO `open` packet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Handshake {
    pub sid: String,
    #[serde(default)]
    pub upgrades: Vec<String>,
    pub ping_interval: u64,
    pub ping_timeout: u64,
    #[serde(default)]
    pub max_payload: u64,
}

impl Handshake {
    /// How long to wait for the next server ping before giving up
    pub const fn ping_deadline_ms(&self) -> u64 {
        self.ping_interval.saturating_add(self.ping_timeout)
    }
}

/// Engine.IO packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnginePacket {
    Open(Handshake),
    Close,
    Ping(String),
    Pong(String),
    Message(String),
    Upgrade,
    Noop,
}

impl EnginePacket {
    pub fn decode(frame: &str) -> Result<Self> {
        let mut chars = frame.chars();
        let kind = chars.next().ok_or(ProtocolError::EmptyPacket)?;
        let body = chars.as_str();

        match kind {
            '0' => Ok(Self::Open(serde_json::from_str(body)?)),
            '1' => Ok(Self::Close),
            '2' => Ok(Self::Ping(body.to_string())),
            '3' => Ok(Self::Pong(body.to_string())),
            '4' => Ok(Self::Message(body.to_string())),
            '5' => Ok(Self::Upgrade),
            '6' => Ok(Self::Noop),
            'b' => Err(ProtocolError::BinaryUnsupported),
            other => Err(ProtocolError::UnknownPacketType {
                layer: "engine.io",
                kind: other,
            }),
        }
    }

    pub fn encode(&self) -> String {
        match self {
            Self::Open(handshake) => {
                // Handshake only holds strings and integers
                let json = serde_json::to_string(handshake).unwrap_or_default();
                format!("0{json}")
            }
            Self::Close => "1".to_string(),
            Self::Ping(data) => format!("2{data}"),
            Self::Pong(data) => format!("3{data}"),
            Self::Message(data) => format!("4{data}"),
            Self::Upgrade => "5".to_string(),
            Self::Noop => "6".to_string(),
        }
    }
}

/// Socket.IO packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocketPacket {
    Connect {
        namespace: String,
        data: Option<Value>,
    },
    Disconnect {
        namespace: String,
    },
    Event {
        namespace: String,
        ack: Option<u64>,
        name: String,
        args: Vec<Value>,
    },
    Ack {
        namespace: String,
        ack: u64,
        args: Vec<Value>,
    },
    ConnectError {
        namespace: String,
        data: Option<Value>,
    },
}

impl SocketPacket {
    /// Connect request for the default namespace
    pub fn connect() -> Self {
        Self::Connect {
            namespace: DEFAULT_NAMESPACE.to_string(),
            data: None,
        }
    }

    /// Event on the default namespace, no acknowledgement requested
    pub fn event(name: impl Into<String>, args: Vec<Value>) -> Self {
        Self::Event {
            namespace: DEFAULT_NAMESPACE.to_string(),
            ack: None,
            name: name.into(),
            args,
        }
    }

    pub fn decode(payload: &str) -> Result<Self> {
        let mut chars = payload.chars();
        let kind = chars.next().ok_or(ProtocolError::EmptyPacket)?;
        let rest = chars.as_str();

        if matches!(kind, '5' | '6') {
            return Err(ProtocolError::BinaryUnsupported);
        }

        let (namespace, rest) = split_namespace(rest);
        let (ack, rest) = split_ack(rest);
        let data: Option<Value> = if rest.is_empty() {
            None
        } else {
            Some(serde_json::from_str(rest)?)
        };

        match kind {
            '0' => Ok(Self::Connect { namespace, data }),
            '1' => Ok(Self::Disconnect { namespace }),
            '2' => {
                let Some(Value::Array(mut items)) = data else {
                    return Err(ProtocolError::MalformedEvent("event payload is not an array"));
                };
                if items.is_empty() {
                    return Err(ProtocolError::MalformedEvent("event without a name"));
                }
                let Value::String(name) = items.remove(0) else {
                    return Err(ProtocolError::MalformedEvent("event name is not a string"));
                };
                Ok(Self::Event {
                    namespace,
                    ack,
                    name,
                    args: items,
                })
            }
            '3' => {
                let ack = ack.ok_or(ProtocolError::MalformedEvent("ack without an id"))?;
                let args = match data {
                    Some(Value::Array(items)) => items,
                    None => Vec::new(),
                    Some(_) => {
                        return Err(ProtocolError::MalformedEvent("ack payload is not an array"))
                    }
                };
                Ok(Self::Ack {
                    namespace,
                    ack,
                    args,
                })
            }
            '4' => Ok(Self::ConnectError { namespace, data }),
            other => Err(ProtocolError::UnknownPacketType {
                layer: "socket.io",
                kind: other,
            }),
        }
    }

    pub fn encode(&self) -> String {
        let mut out = String::new();
        match self {
            Self::Connect { namespace, data } | Self::ConnectError { namespace, data } => {
                out.push(if matches!(self, Self::Connect { .. }) { '0' } else { '4' });
                push_namespace(&mut out, namespace, data.is_some());
                if let Some(data) = data {
                    out.push_str(&data.to_string());
                }
            }
            Self::Disconnect { namespace } => {
                out.push('1');
                push_namespace(&mut out, namespace, false);
            }
            Self::Event {
                namespace,
                ack,
                name,
                args,
            } => {
                out.push('2');
                push_namespace(&mut out, namespace, true);
                if let Some(id) = ack {
                    out.push_str(&id.to_string());
                }
                let mut items = Vec::with_capacity(args.len() + 1);
                items.push(Value::String(name.clone()));
                items.extend(args.iter().cloned());
                out.push_str(&Value::Array(items).to_string());
            }
            Self::Ack {
                namespace,
                ack,
                args,
            } => {
                out.push('3');
                push_namespace(&mut out, namespace, true);
                out.push_str(&ack.to_string());
                out.push_str(&Value::Array(args.clone()).to_string());
            }
        }
        out
    }

    /// Wrap in an Engine.IO message, ready to put on the socket
    pub fn to_frame(&self) -> String {
        EnginePacket::Message(self.encode()).encode()
    }
}

fn split_namespace(rest: &str) -> (String, &str) {
    if !rest.starts_with('/') {
        return (DEFAULT_NAMESPACE.to_string(), rest);
    }
    match rest.find(',') {
        Some(idx) => (rest[..idx].to_string(), &rest[idx + 1..]),
        None => (rest.to_string(), ""),
    }
}

fn split_ack(rest: &str) -> (Option<u64>, &str) {
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if end == 0 {
        return (None, rest);
    }
    (rest[..end].parse().ok(), &rest[end..])
}

fn push_namespace(out: &mut String, namespace: &str, followed: bool) {
    if namespace != DEFAULT_NAMESPACE {
        out.push_str(namespace);
        if followed {
            out.push(',');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_endpoint_url() {
        assert_eq!(
            endpoint_url("http:", "localhost:5000", "/socket.io/"),
            "ws://localhost:5000/socket.io/?EIO=4&transport=websocket"
        );
        assert_eq!(
            endpoint_url("https:", "sync.example.org", "socket.io"),
            "wss://sync.example.org/socket.io/?EIO=4&transport=websocket"
        );
    }

    #[test]
    fn test_decode_open() {
        let frame = r#"0{"sid":"lv_VI97HAXpY6yYWAAAC","upgrades":[],"pingInterval":25000,"pingTimeout":20000,"maxPayload":1000000}"#;
        let EnginePacket::Open(handshake) = EnginePacket::decode(frame).unwrap() else {
            panic!("expected open");
        };
        assert_eq!(handshake.sid, "lv_VI97HAXpY6yYWAAAC");
        assert_eq!(handshake.ping_interval, 25000);
        assert_eq!(handshake.ping_deadline_ms(), 45000);
    }

    #[test]
    fn test_ping_pong() {
        assert_eq!(EnginePacket::decode("2").unwrap(), EnginePacket::Ping(String::new()));
        assert_eq!(EnginePacket::Pong(String::new()).encode(), "3");
        assert_eq!(EnginePacket::Pong("probe".into()).encode(), "3probe");
    }

    #[test]
    fn test_engine_errors() {
        assert!(matches!(EnginePacket::decode(""), Err(ProtocolError::EmptyPacket)));
        assert!(matches!(
            EnginePacket::decode("bAQID"),
            Err(ProtocolError::BinaryUnsupported)
        ));
        assert!(matches!(
            EnginePacket::decode("9"),
            Err(ProtocolError::UnknownPacketType { kind: '9', .. })
        ));
    }

    #[test]
    fn test_connect_frames() {
        assert_eq!(SocketPacket::connect().to_frame(), "40");
        let packet = SocketPacket::decode(r#"0{"sid":"abc"}"#).unwrap();
        assert_eq!(
            packet,
            SocketPacket::Connect {
                namespace: "/".into(),
                data: Some(json!({"sid": "abc"})),
            }
        );
    }

    #[test]
    fn test_decode_event() {
        let packet = SocketPacket::decode(r#"2["Update",{"sync_list":[]}]"#).unwrap();
        assert_eq!(
            packet,
            SocketPacket::Event {
                namespace: "/".into(),
                ack: None,
                name: "Update".into(),
                args: vec![json!({"sync_list": []})],
            }
        );
    }

    #[test]
    fn test_decode_event_with_namespace_and_ack() {
        let packet = SocketPacket::decode(r#"2/admin,12["ping"]"#).unwrap();
        assert_eq!(
            packet,
            SocketPacket::Event {
                namespace: "/admin".into(),
                ack: Some(12),
                name: "ping".into(),
                args: vec![],
            }
        );
        assert_eq!(packet.encode(), r#"2/admin,12["ping"]"#);
    }

    #[test]
    fn test_encode_event_without_args() {
        assert_eq!(
            SocketPacket::event("loadSettings", vec![]).to_frame(),
            r#"42["loadSettings"]"#
        );
    }

    #[test]
    fn test_decode_socket_errors() {
        assert!(matches!(
            SocketPacket::decode(r#"2{"a":1}"#),
            Err(ProtocolError::MalformedEvent(_))
        ));
        assert!(matches!(
            SocketPacket::decode("2[1]"),
            Err(ProtocolError::MalformedEvent(_))
        ));
        assert!(matches!(
            SocketPacket::decode(r#"51-["x",{"_placeholder":true,"num":0}]"#),
            Err(ProtocolError::BinaryUnsupported)
        ));
        assert!(matches!(SocketPacket::decode("2[oops"), Err(ProtocolError::Json(_))));
    }

    #[test]
    fn test_ack_and_disconnect() {
        assert_eq!(
            SocketPacket::decode(r#"31["ok"]"#).unwrap(),
            SocketPacket::Ack {
                namespace: "/".into(),
                ack: 1,
                args: vec![json!("ok")],
            }
        );
        assert_eq!(
            SocketPacket::decode("1").unwrap(),
            SocketPacket::Disconnect {
                namespace: "/".into()
            }
        );
        assert_eq!(
            SocketPacket::Disconnect {
                namespace: "/admin".into()
            }
            .encode(),
            "1/admin"
        );
    }
}
