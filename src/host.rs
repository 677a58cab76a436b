use std::sync::Arc;
use tokio::sync::oneshot;

/// Severity of an operator-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Warning,
    Error,
}

/// Editor capabilities the dispatcher depends on but does not implement.
///
/// The embedding editor provides the real implementation; tests use fakes.
/// Surfaces are looked up at dispatch time, never cached — "active" always
/// means active right now.
pub trait EditorHost: Send + Sync + 'static {
    /// Invoke a built-in editor action by identifier. The editor may
    /// complete the action later; the receiver reports completion or
    /// failure. A dropped sender counts as failure.
    fn invoke(&self, command: &str) -> oneshot::Receiver<Result<(), String>>;

    /// Currently focused editable surface, if any.
    fn active_editor(&self) -> Option<Arc<dyn EditableSurface>>;

    /// Currently focused terminal surface, if any.
    fn active_terminal(&self) -> Option<Arc<dyn TerminalSurface>>;

    /// Show an operator-facing message in the editor UI.
    fn notify(&self, level: NoticeLevel, message: &str);
}

/// An editable document that accepts snippet text at the cursor.
pub trait EditableSurface: Send + Sync {
    fn insert_snippet(&self, text: &str);
}

/// A terminal pane that can be disposed.
pub trait TerminalSurface: Send + Sync {
    fn dispose(&self);
}
