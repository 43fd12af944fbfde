//! JSON serialization for hub frames.

use super::types::{Invocation, OutboundMessage};

/// Serialize an outbound message to a text frame.
pub fn serialize_outbound(msg: &OutboundMessage) -> Result<String, serde_json::Error> {
    serde_json::to_string(msg)
}

/// Deserialize an inbound text frame.
pub fn deserialize_invocation(text: &str) -> Result<Invocation, serde_json::Error> {
    serde_json::from_str(text)
}
