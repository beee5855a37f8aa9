//! Passcode gate for the admin affordances.
//!
//! The passcodes live in client configuration in plain text and nothing on
//! the database side checks them. The gate only decides which buttons a
//! session gets to see; it is not an access-control boundary.

use tracing::info;

/// Proof that the session passed the passcode check.
///
/// Only [`AdminGate::unlock`] creates one. Write entry points take it by
/// reference so they cannot be reached from an anonymous session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminCapability {
    _private: (),
}

#[derive(Debug, Clone)]
pub struct AdminGate {
    passcodes: Vec<String>,
}

impl AdminGate {
    pub fn new<I, S>(passcodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            passcodes: passcodes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn unlock(&self, attempt: &str) -> Option<AdminCapability> {
        if !attempt.is_empty() && self.passcodes.iter().any(|p| p == attempt) {
            info!("Admin mode unlocked");
            Some(AdminCapability { _private: () })
        } else {
            None
        }
    }
}

/// Per-session UI state. Lives as long as the session, never persisted.
#[derive(Debug, Default)]
pub struct Session {
    admin: Option<AdminCapability>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the attempt was accepted.
    pub fn login(&mut self, gate: &AdminGate, attempt: &str) -> bool {
        self.admin = gate.unlock(attempt);
        self.admin.is_some()
    }

    pub fn logout(&mut self) {
        self.admin = None;
    }

    pub fn admin(&self) -> Option<&AdminCapability> {
        self.admin.as_ref()
    }

    pub fn is_admin(&self) -> bool {
        self.admin.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlock_with_known_passcode() {
        let gate = AdminGate::new(["800123", "admin"]);
        assert!(gate.unlock("admin").is_some());
        assert!(gate.unlock("Admin").is_none());
        assert!(gate.unlock("").is_none());
    }

    #[test]
    fn session_login_logout() {
        let gate = AdminGate::new(["secret"]);
        let mut session = Session::new();
        assert!(!session.is_admin());

        assert!(!session.login(&gate, "wrong"));
        assert!(session.admin().is_none());

        assert!(session.login(&gate, "secret"));
        assert!(session.is_admin());

        session.logout();
        assert!(!session.is_admin());
    }

    #[test]
    fn failed_login_drops_existing_capability() {
        let gate = AdminGate::new(["secret"]);
        let mut session = Session::new();
        session.login(&gate, "secret");
        session.login(&gate, "typo");
        assert!(!session.is_admin());
    }
}
