use keydeck_core::commands::Command;
use std::collections::HashMap;

/// Per-session command store.
///
/// Owned by the session task, which processes messages strictly in order,
/// so replacement is a plain move and needs no locking. Every sync
/// replaces the whole map; sets are never merged.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Command>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a freshly synced set. Ids from earlier syncs that are
    /// absent here are gone.
    pub fn replace_all(&mut self, commands: Vec<Command>) {
        self.commands = commands.into_iter().map(|c| (c.id.clone(), c)).collect();
    }

    pub fn lookup(&self, id: &str) -> Option<&Command> {
        self.commands.get(id)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
