use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use super::{Session, SessionId};

/// Shared handle to one session. Holding its lock for a whole event keeps
/// events on the same session strictly sequential.
pub type SessionHandle = Arc<Mutex<Session>>;

#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<SessionId, SessionHandle>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self) -> SessionId {
        let session = Session::new();
        let id = session.id;
        let mut guard = self.inner.write().await;
        guard.insert(id, Arc::new(Mutex::new(session)));
        id
    }

    pub async fn get(&self, id: &SessionId) -> Option<SessionHandle> {
        let guard = self.inner.read().await;
        guard.get(id).cloned()
    }

    /// Drop a session. Returns whether it existed.
    pub async fn remove(&self, id: &SessionId) -> bool {
        let mut guard = self.inner.write().await;
        guard.remove(id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Message;

    #[tokio::test]
    async fn test_create_get_remove() {
        let store = SessionStore::new();
        let id = store.create().await;
        assert_eq!(store.len().await, 1);

        let handle = store.get(&id).await.expect("session exists");
        assert_eq!(handle.lock().await.id, id);

        assert!(store.remove(&id).await);
        assert!(!store.remove(&id).await);
        assert!(store.get(&id).await.is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = SessionStore::new();
        let first = store.create().await;
        let second = store.create().await;
        assert_ne!(first, second);

        {
            let handle = store.get(&first).await.unwrap();
            let mut session = handle.lock().await;
            session.add_document("notes.txt", "hello");
            session.push_message(Message::user("hi"));
        }

        let handle = store.get(&second).await.unwrap();
        let session = handle.lock().await;
        assert!(session.documents().is_empty());
        assert!(session.messages().is_empty());
        assert!(!session.has_processed("notes.txt"));
    }
}
