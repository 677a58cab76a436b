use crate::commands::Command;
use serde::{Deserialize, Serialize};

/// Messages the device sends over the session channel.
///
/// `run` is the canonical kind for run requests; `executeCommand` is
/// accepted as an alias for older device builds. No acknowledgement
/// message is defined — outcomes are observed through editor-level
/// feedback on the workstation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DeviceMessage {
    /// Full command-set sync; replaces the receiving registry wholesale.
    /// Entries stay raw so one invalid command cannot sink the sync.
    #[serde(rename = "commandList")]
    CommandList { data: Vec<serde_json::Value> },
    /// Run a single command by id.
    #[serde(rename = "run", alias = "executeCommand")]
    Run { id: String },
}

/// Decode failure classification for the session loop.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum WireError {
    /// Not a JSON object carrying the fields its kind requires.
    #[error("malformed message: {0}")]
    Malformed(String),
    /// Well-formed envelope with a kind this side does not understand.
    #[error("unknown message kind {0:?}")]
    UnknownKind(String),
}

impl DeviceMessage {
    /// Decode one text frame.
    ///
    /// Unknown-but-well-formed kinds are distinguished from malformed
    /// payloads so callers can ignore the former and diagnose the latter,
    /// keeping the session open in both cases.
    pub fn decode(text: &str) -> Result<Self, WireError> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|e| WireError::Malformed(e.to_string()))?;
        let kind = value
            .get("type")
            .and_then(|v| v.as_str())
            .ok_or_else(|| WireError::Malformed("missing \"type\" field".into()))?
            .to_string();
        match serde_json::from_value::<DeviceMessage>(value) {
            Ok(message) => Ok(message),
            Err(e) => {
                if matches!(kind.as_str(), "commandList" | "run" | "executeCommand") {
                    Err(WireError::Malformed(e.to_string()))
                } else {
                    Err(WireError::UnknownKind(kind))
                }
            }
        }
    }

    pub fn encode(&self) -> String {
        serde_json::to_string(self).expect("BUG: DeviceMessage must serialize")
    }

    /// Build a sync message carrying the full catalog. The whole object
    /// goes over the wire, visibility flags included, for forward
    /// compatibility with server-side filtering.
    pub fn command_list(commands: &[Command]) -> Self {
        DeviceMessage::CommandList {
            data: commands
                .iter()
                .map(|c| serde_json::to_value(c).expect("BUG: Command must serialize"))
                .collect(),
        }
    }
}
