//! Inbound and outbound hub frame definitions.
//!
//! Frames are JSON objects tagged by `"type"`; the tag names match the RPC
//! and push-event names the device agent and operator console speak.

use serde::{Deserialize, Serialize};

use securenet_entity::DeviceRecord;

/// An inbound frame: an RPC plus an optional caller-chosen invocation id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invocation {
    /// Echoed back in the `Completion` frame when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invocation_id: Option<String>,
    /// The call itself.
    #[serde(flatten)]
    pub message: InboundMessage,
}

/// RPCs invoked by device and operator sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InboundMessage {
    /// A device announces itself.
    #[serde(rename_all = "camelCase")]
    RegisterClient {
        /// Device identity.
        name: String,
        /// Reported network address.
        address: String,
        /// Reported access code.
        access_code: String,
    },
    /// An operator asks for both snapshots.
    RequestInitialData,
    /// An operator adds a blacklist item.
    AddToBlacklist {
        /// Item to add.
        item: String,
    },
    /// An operator removes a blacklist item.
    RemoveFromBlacklist {
        /// Item to remove.
        item: String,
    },
    /// An operator sends a command to one device.
    #[serde(rename = "SendCommandToPC")]
    SendCommandToPc {
        /// Target device identity.
        name: String,
        /// Command verb; interpreted by the device agent.
        command: String,
        /// Optional command argument.
        #[serde(default)]
        parameter: Option<String>,
    },
    /// Pong response to a server ping.
    Pong {
        /// Echoed timestamp.
        #[serde(default)]
        timestamp: i64,
    },
}

impl InboundMessage {
    /// RPC name, for logging.
    pub fn method(&self) -> &'static str {
        match self {
            Self::RegisterClient { .. } => "RegisterClient",
            Self::RequestInitialData => "RequestInitialData",
            Self::AddToBlacklist { .. } => "AddToBlacklist",
            Self::RemoveFromBlacklist { .. } => "RemoveFromBlacklist",
            Self::SendCommandToPc { .. } => "SendCommandToPC",
            Self::Pong { .. } => "Pong",
        }
    }
}

/// Frames pushed by the hub.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OutboundMessage {
    /// Full device list snapshot.
    #[serde(rename = "UpdatePCList")]
    UpdatePcList {
        /// Every known device.
        devices: Vec<DeviceRecord>,
    },
    /// Full blacklist snapshot (items only).
    UpdateBlacklist {
        /// Every blacklisted item.
        items: Vec<String>,
    },
    /// A command for the receiving device.
    ReceiveCommand {
        /// Command verb.
        command: String,
        /// Optional command argument.
        parameter: Option<String>,
    },
    /// Result of an invocation that carried an id.
    #[serde(rename_all = "camelCase")]
    Completion {
        /// The caller's invocation id.
        invocation_id: Option<String>,
        /// Failure description; `None` on success.
        error: Option<String>,
    },
    /// Server keepalive.
    Ping {
        /// Server timestamp (unix millis).
        timestamp: i64,
    },
    /// Frame-level or uncorrelated failure.
    Error {
        /// Error code.
        code: String,
        /// Error description.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_register_client() {
        let raw = r#"{"type":"RegisterClient","invocationId":"1","name":"PC1","address":"10.0.0.5","accessCode":"ABC"}"#;
        let invocation: Invocation = serde_json::from_str(raw).unwrap();
        assert_eq!(invocation.invocation_id.as_deref(), Some("1"));
        assert_eq!(
            invocation.message,
            InboundMessage::RegisterClient {
                name: "PC1".to_string(),
                address: "10.0.0.5".to_string(),
                access_code: "ABC".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_send_command_without_parameter() {
        let raw = r#"{"type":"SendCommandToPC","name":"PC1","command":"Lock"}"#;
        let invocation: Invocation = serde_json::from_str(raw).unwrap();
        assert_eq!(invocation.invocation_id, None);
        assert_eq!(
            invocation.message,
            InboundMessage::SendCommandToPc {
                name: "PC1".to_string(),
                command: "Lock".to_string(),
                parameter: None,
            }
        );
    }

    #[test]
    fn test_parse_unit_variant() {
        let invocation: Invocation =
            serde_json::from_str(r#"{"type":"RequestInitialData"}"#).unwrap();
        assert_eq!(invocation.message, InboundMessage::RequestInitialData);
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        assert!(serde_json::from_str::<Invocation>(r#"{"type":"FormatDisk"}"#).is_err());
    }

    #[test]
    fn test_outbound_tags() {
        let json = serde_json::to_value(OutboundMessage::UpdatePcList { devices: vec![] }).unwrap();
        assert_eq!(json["type"], "UpdatePCList");

        let json = serde_json::to_value(OutboundMessage::ReceiveCommand {
            command: "Lock".to_string(),
            parameter: None,
        })
        .unwrap();
        assert_eq!(json["type"], "ReceiveCommand");
        assert!(json["parameter"].is_null());

        let json = serde_json::to_value(OutboundMessage::Completion {
            invocation_id: Some("7".to_string()),
            error: None,
        })
        .unwrap();
        assert_eq!(json["invocationId"], "7");
    }
}
