use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

type SessionKey = (String, String);

/// One async mutex per (user, session). Holding the guard for a whole turn
/// keeps two requests for the same session from overwriting each other.
#[derive(Clone, Default)]
pub struct SessionLocks {
    inner: Arc<Mutex<HashMap<SessionKey, Arc<Mutex<()>>>>>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, user_id: &str, session_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.inner.lock().await;
            // Only the map holds an unused lock; drop those.
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks
                .entry((user_id.to_string(), session_id.to_string()))
                .or_default()
                .clone()
        };
        lock.lock_owned().await
    }

    #[cfg(test)]
    async fn tracked(&self) -> usize {
        self.inner.lock().await.len()
    }
}
