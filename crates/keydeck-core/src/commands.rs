use serde::{Deserialize, Serialize};

/// A remote-triggerable editor action, as defined by the device.
///
/// The device is the sole source of truth for the catalog; the workstation
/// only ever receives full copies of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Command {
    /// Unique within a registry, stable across syncs.
    pub id: String,
    /// Human-readable label.
    pub display_name: String,
    /// Short label for compact button rendering.
    pub button_label: String,
    /// Client-local filter; does not affect dispatch eligibility.
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(flatten)]
    pub kind: CommandKind,
}

fn default_visible() -> bool {
    true
}

/// Kind-specific payload of a [`Command`].
///
/// Unknown kinds fail to decode; the sync path rejects such entries rather
/// than coercing them to an editor command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CommandKind {
    /// Invoke a built-in editor action by identifier.
    EditorCommand { command: String },
    /// Insert literal text into the active editable surface.
    Snippet { snippet: String },
    /// Close the active terminal.
    TerminalClose,
}

impl CommandKind {
    pub fn name(&self) -> &'static str {
        match self {
            CommandKind::EditorCommand { .. } => "editorCommand",
            CommandKind::Snippet { .. } => "snippet",
            CommandKind::TerminalClose => "terminalClose",
        }
    }
}

/// A synced catalog entry that failed validation.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("rejected command entry {id:?}: {reason}")]
pub struct CommandRejected {
    /// The `id` field of the entry, when one was present.
    pub id: Option<String>,
    pub reason: String,
}

/// Decode the entries of a command-set sync individually.
///
/// Valid entries are returned in order; entries with a missing payload or
/// an unknown kind become [`CommandRejected`] without sinking the rest of
/// the sync.
pub fn decode_command_entries(
    entries: &[serde_json::Value],
) -> (Vec<Command>, Vec<CommandRejected>) {
    let mut commands = Vec::with_capacity(entries.len());
    let mut rejected = Vec::new();
    for entry in entries {
        match serde_json::from_value::<Command>(entry.clone()) {
            Ok(command) => commands.push(command),
            Err(e) => rejected.push(CommandRejected {
                id: entry
                    .get("id")
                    .and_then(|v| v.as_str())
                    .map(str::to_string),
                reason: e.to_string(),
            }),
        }
    }
    (commands, rejected)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snippet(id: &str, text: &str) -> Command {
        Command {
            id: id.into(),
            display_name: format!("Insert {text}"),
            button_label: text.into(),
            visible: true,
            kind: CommandKind::Snippet {
                snippet: text.into(),
            },
        }
    }

    #[test]
    fn command_round_trip_all_kinds() {
        let commands = vec![
            Command {
                id: "scm".into(),
                display_name: "Source Control".into(),
                button_label: "SCM".into(),
                visible: true,
                kind: CommandKind::EditorCommand {
                    command: "workbench.view.scm".into(),
                },
            },
            snippet("braces", "{}"),
            Command {
                id: "close-term".into(),
                display_name: "Close Terminal".into(),
                button_label: "✕".into(),
                visible: false,
                kind: CommandKind::TerminalClose,
            },
        ];
        for command in commands {
            let json = serde_json::to_string(&command).unwrap();
            let parsed: Command = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, command);
        }
    }

    #[test]
    fn wire_shape_is_flat_and_camel_case() {
        let json = serde_json::to_value(snippet("braces", "{")).unwrap();
        assert_eq!(json["id"], "braces");
        assert_eq!(json["displayName"], "Insert {");
        assert_eq!(json["buttonLabel"], "{");
        assert_eq!(json["kind"], "snippet");
        assert_eq!(json["snippet"], "{");
    }

    #[test]
    fn visible_defaults_to_true() {
        let parsed: Command = serde_json::from_str(
            r#"{"id":"a","displayName":"A","buttonLabel":"a","kind":"terminalClose"}"#,
        )
        .unwrap();
        assert!(parsed.visible);
    }

    #[test]
    fn unknown_kind_fails_to_decode() {
        let result = serde_json::from_str::<Command>(
            r#"{"id":"a","displayName":"A","buttonLabel":"a","kind":"macro","steps":[]}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn missing_payload_fails_to_decode() {
        let result = serde_json::from_str::<Command>(
            r#"{"id":"a","displayName":"A","buttonLabel":"a","kind":"snippet"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn empty_snippet_payload_decodes() {
        // An empty payload is a configuration error caught at dispatch
        // time, not a wire error.
        let parsed: Command = serde_json::from_str(
            r#"{"id":"a","displayName":"A","buttonLabel":"a","kind":"snippet","snippet":""}"#,
        )
        .unwrap();
        assert_eq!(parsed.kind, CommandKind::Snippet { snippet: "".into() });
    }

    #[test]
    fn decode_entries_keeps_valid_and_reports_invalid() {
        let entries = vec![
            serde_json::to_value(snippet("a", "{")).unwrap(),
            serde_json::json!({"id": "b", "displayName": "B", "buttonLabel": "b", "kind": "macro"}),
            serde_json::json!("not even an object"),
            serde_json::to_value(snippet("c", "|")).unwrap(),
        ];
        let (commands, rejected) = decode_command_entries(&entries);
        assert_eq!(
            commands.iter().map(|c| c.id.as_str()).collect::<Vec<_>>(),
            vec!["a", "c"]
        );
        assert_eq!(rejected.len(), 2);
        assert_eq!(rejected[0].id.as_deref(), Some("b"));
        assert_eq!(rejected[1].id, None);
    }
}
