//! Connection registry: binds device names to live sessions.

use dashmap::DashMap;

use securenet_core::types::id::SessionId;

/// Concurrent bidirectional `name <-> session` index.
///
/// A name maps to at most one session; a session holds at most one name.
/// A newer binding for a name silently supersedes the older one.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    /// Device name → session.
    by_name: DashMap<String, SessionId>,
    /// Reverse index: session → device name.
    by_session: DashMap<SessionId, String>,
}

impl ConnectionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` to `session`, overwriting any existing binding.
    ///
    /// Returns the session that previously held `name`, if it was a
    /// different one.
    pub fn bind(&self, name: &str, session: SessionId) -> Option<SessionId> {
        let previous = self.by_name.insert(name.to_string(), session);

        let superseded = previous.filter(|p| *p != session);
        if let Some(old_session) = superseded {
            self.by_session
                .remove_if(&old_session, |_, bound| bound.as_str() == name);
        }

        if let Some(old_name) = self.by_session.insert(session, name.to_string())
            && old_name != name
        {
            self.by_name.remove_if(&old_name, |_, bound| *bound == session);
        }

        // A concurrent bind of the same name may have won between the two
        // inserts; drop the reverse entry it could not see.
        if self.lookup(name) != Some(session) {
            self.by_session
                .remove_if(&session, |_, bound| bound.as_str() == name);
        }

        superseded
    }

    /// Removes the binding held by `session`.
    ///
    /// Returns the released name, or `None` if the session held none (never
    /// registered, or already superseded).
    pub fn unbind(&self, session: SessionId) -> Option<String> {
        let (_, name) = self.by_session.remove(&session)?;
        self.by_name
            .remove_if(&name, |_, bound| *bound == session)
            .map(|_| name)
    }

    /// Resolves `name` to its live session.
    pub fn lookup(&self, name: &str) -> Option<SessionId> {
        self.by_name.get(name).map(|entry| *entry.value())
    }

    /// Number of bound names.
    pub fn binding_count(&self) -> usize {
        self.by_name.len()
    }
}
