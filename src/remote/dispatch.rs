use crate::host::{EditorHost, NoticeLevel};
use crate::remote::registry::CommandRegistry;
use keydeck_core::commands::CommandKind;
use std::sync::Arc;
use tokio::sync::oneshot;

/// Why a run request produced no editor action. All of these are reported
/// to the operator; none stop the listener or drop the session.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("command not found: {0}")]
    NotFound(String),
    #[error("no active {target} for command {id:?}")]
    NoActiveTarget { id: String, target: &'static str },
    #[error("command {0:?} has an empty snippet payload")]
    EmptySnippet(String),
    #[error("editor action {action:?} failed: {reason}")]
    ActionFailed { action: String, reason: String },
}

/// Resolve `id` against the registry and fire the matching editor action.
///
/// Host context is looked up here, at dispatch time. Editor invocations
/// complete asynchronously; their outcome is watched on a separate task so
/// the session loop keeps accepting messages immediately.
pub fn dispatch(
    registry: &CommandRegistry,
    host: &Arc<dyn EditorHost>,
    id: &str,
) -> Result<(), DispatchError> {
    let command = registry
        .lookup(id)
        .ok_or_else(|| DispatchError::NotFound(id.to_string()))?;
    log::info!("dispatching {:?} ({})", command.id, command.kind.name());

    match &command.kind {
        CommandKind::EditorCommand { command: action } => {
            watch_invocation(host.clone(), action.clone(), host.invoke(action));
            Ok(())
        }
        CommandKind::Snippet { snippet } => {
            if snippet.is_empty() {
                return Err(DispatchError::EmptySnippet(command.id.clone()));
            }
            match host.active_editor() {
                Some(editor) => {
                    editor.insert_snippet(snippet);
                    Ok(())
                }
                None => Err(DispatchError::NoActiveTarget {
                    id: command.id.clone(),
                    target: "editor",
                }),
            }
        }
        CommandKind::TerminalClose => match host.active_terminal() {
            Some(terminal) => {
                terminal.dispose();
                Ok(())
            }
            None => Err(DispatchError::NoActiveTarget {
                id: command.id.clone(),
                target: "terminal",
            }),
        },
    }
}

/// Observe an asynchronous editor invocation without blocking the caller.
/// There is no timeout: a hung action never reports and never blocks the
/// channel.
fn watch_invocation(
    host: Arc<dyn EditorHost>,
    action: String,
    done: oneshot::Receiver<Result<(), String>>,
) {
    tokio::spawn(async move {
        let reason = match done.await {
            Ok(Ok(())) => {
                log::info!("editor action {action:?} completed");
                return;
            }
            Ok(Err(reason)) => reason,
            Err(_) => "invocation dropped without completing".to_string(),
        };
        let err = DispatchError::ActionFailed { action, reason };
        log::warn!("{err}");
        host.notify(NoticeLevel::Error, &err.to_string());
    });
}
