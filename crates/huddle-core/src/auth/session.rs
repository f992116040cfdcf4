//! Session store.
//!
//! Holds the locally cached identity. Only the auth controller writes it
//! (`set_session`/`clear` are crate-private); everything else reads.

use serde::{Deserialize, Serialize};

/// The authenticated identity, or the anonymous value when `user_id` is `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: Option<String>,
    pub fullname: String,
    pub email: String,
    pub avatar_url: Option<String>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }
}

#[derive(Debug, Default)]
pub struct SessionStore {
    current: Session,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with an existing session.
    pub fn with_session(session: Session) -> Self {
        Self { current: session }
    }

    pub fn read(&self) -> &Session {
        &self.current
    }

    pub(crate) fn set_session(&mut self, session: Session) {
        self.current = session;
    }

    pub(crate) fn clear(&mut self) {
        self.current = Session::anonymous();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_store_is_anonymous() {
        let store = SessionStore::new();
        assert!(!store.read().is_authenticated());
        assert_eq!(store.read(), &Session::anonymous());
    }

    #[test]
    fn test_set_then_clear() {
        let mut store = SessionStore::new();
        store.set_session(Session {
            user_id: Some("1".to_string()),
            fullname: "A".to_string(),
            email: "a@b.com".to_string(),
            avatar_url: None,
        });
        assert!(store.read().is_authenticated());

        store.clear();
        assert_eq!(store.read(), &Session::anonymous());
    }

    #[test]
    fn test_session_serializes_camel_case() {
        let session = Session {
            user_id: Some("7".to_string()),
            fullname: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            avatar_url: Some("https://img/ada.png".to_string()),
        };
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["userId"], "7");
        assert_eq!(json["avatarUrl"], "https://img/ada.png");
    }
}
