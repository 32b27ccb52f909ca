use std::{collections::HashSet, sync::RwLock};

use crate::transport::UserId;

/// Users that have presented the admin secret and not logged out since.
///
/// Sessions live in memory only and never expire.
#[derive(Debug, Default)]
pub struct AdminSessions {
    authenticated: RwLock<HashSet<UserId>>,
}

impl AdminSessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self, user_id: UserId) -> bool {
        self.authenticated
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&user_id)
    }

    /// Insert or remove `user_id`. Idempotent in both directions.
    pub fn set_authenticated(&self, user_id: UserId, authenticated: bool) {
        let mut set = self
            .authenticated
            .write()
            .unwrap_or_else(|e| e.into_inner());
        if authenticated {
            set.insert(user_id);
        } else {
            set.remove(&user_id);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn login_and_logout_are_idempotent() {
        let sessions = AdminSessions::new();
        assert!(!sessions.is_authenticated(1));

        sessions.set_authenticated(1, true);
        sessions.set_authenticated(1, true);
        assert!(sessions.is_authenticated(1));

        sessions.set_authenticated(1, false);
        sessions.set_authenticated(1, false);
        assert!(!sessions.is_authenticated(1));
    }

    #[test]
    fn other_users_do_not_affect_a_session() {
        let sessions = Arc::new(AdminSessions::new());
        sessions.set_authenticated(7, true);

        let handles: Vec<_> = (100..132)
            .map(|id| {
                let sessions = Arc::clone(&sessions);
                std::thread::spawn(move || {
                    sessions.set_authenticated(id, true);
                    sessions.set_authenticated(id, false);
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert!(sessions.is_authenticated(7));
        assert!(!sessions.is_authenticated(100));
    }
}
