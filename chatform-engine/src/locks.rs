//! Per-conversation mutual exclusion.

use chatform_proto::SessionKey;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError, Weak};
use tokio::sync::OwnedMutexGuard;

type ConversationLock = tokio::sync::Mutex<()>;

tokio::task_local! {
    /// Conversations whose locks the current task holds, outermost first.
    static HELD: Vec<SessionKey>;
}

/// The calling task already holds the conversation's lock, so waiting
/// for it would never end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AlreadyHeld;

/// Hands out one async lock per [`SessionKey`].
///
/// Entries are weak: a lock lives as long as someone holds or waits on
/// it. Dead entries are swept once the table doubles past its last
/// sweep.
#[derive(Debug)]
pub(crate) struct SessionLocks {
    table: Mutex<LockTable>,
}

#[derive(Debug)]
struct LockTable {
    locks: HashMap<SessionKey, Weak<ConversationLock>>,
    sweep_at: usize,
}

const MIN_SWEEP: usize = 64;

impl SessionLocks {
    pub(crate) fn new() -> Self {
        Self {
            table: Mutex::new(LockTable {
                locks: HashMap::new(),
                sweep_at: MIN_SWEEP,
            }),
        }
    }

    /// Wait for exclusive access to one conversation. Other
    /// conversations are unaffected.
    pub(crate) async fn acquire(&self, key: &SessionKey) -> OwnedMutexGuard<()> {
        let lock = {
            let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
            table.lock_for(key)
        };
        lock.lock_owned().await
    }

    /// Run `fut` with exclusive access to one conversation.
    ///
    /// Holding is tracked per task: a call for a key this task already
    /// holds fails at once with [`AlreadyHeld`]. Work spawned onto another
    /// task does not inherit the keys and waits like any other caller.
    pub(crate) async fn exclusive<F: Future>(
        &self,
        key: &SessionKey,
        fut: F,
    ) -> Result<F::Output, AlreadyHeld> {
        let mut held = HELD.try_with(Vec::clone).unwrap_or_default();
        if held.contains(key) {
            return Err(AlreadyHeld);
        }
        let _guard = self.acquire(key).await;
        held.push(key.clone());
        Ok(HELD.scope(held, fut).await)
    }

    /// Number of tracked entries, live or not yet swept.
    #[cfg(test)]
    pub(crate) fn tracked(&self) -> usize {
        self.table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .locks
            .len()
    }
}

impl LockTable {
    fn lock_for(&mut self, key: &SessionKey) -> Arc<ConversationLock> {
        if let Some(lock) = self.locks.get(key).and_then(Weak::upgrade) {
            return lock;
        }
        if self.locks.len() >= self.sweep_at {
            self.locks.retain(|_, weak| weak.strong_count() > 0);
            self.sweep_at = (self.locks.len() * 2).max(MIN_SWEEP);
        }
        let lock = Arc::new(ConversationLock::new(()));
        self.locks.insert(key.clone(), Arc::downgrade(&lock));
        lock
    }
}

impl Default for SessionLocks {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn same_key_is_exclusive() {
        let locks = SessionLocks::new();
        let key = SessionKey::new("c", "u");
        let guard = locks.acquire(&key).await;
        let second = tokio::time::timeout(Duration::from_millis(20), locks.acquire(&key)).await;
        assert!(second.is_err(), "second acquire should wait");
        drop(guard);
        let third = tokio::time::timeout(Duration::from_millis(20), locks.acquire(&key)).await;
        assert!(third.is_ok());
    }

    #[tokio::test]
    async fn different_keys_do_not_block() {
        let locks = SessionLocks::new();
        let _a = locks.acquire(&SessionKey::new("c", "a")).await;
        let b = tokio::time::timeout(
            Duration::from_millis(20),
            locks.acquire(&SessionKey::new("c", "b")),
        )
        .await;
        assert!(b.is_ok());
    }

    #[tokio::test]
    async fn nested_exclusive_on_same_key_fails_fast() {
        let locks = SessionLocks::new();
        let key = SessionKey::new("c", "u");
        let inner = tokio::time::timeout(
            Duration::from_secs(1),
            locks.exclusive(&key, locks.exclusive(&key, async {})),
        )
        .await
        .expect("nested call must not wait");
        assert_eq!(inner, Ok(Err(AlreadyHeld)));
    }

    #[tokio::test]
    async fn nested_exclusive_on_other_key_runs() {
        let locks = SessionLocks::new();
        let a = SessionKey::new("c", "a");
        let b = SessionKey::new("c", "b");
        let result = locks
            .exclusive(&a, async {
                locks
                    .exclusive(&b, async { locks.exclusive(&a, async {}).await })
                    .await
            })
            .await;
        assert_eq!(result, Ok(Ok(Err(AlreadyHeld))));
    }

    #[tokio::test]
    async fn held_keys_are_released_after_the_scope() {
        let locks = SessionLocks::new();
        let key = SessionKey::new("c", "u");
        assert_eq!(locks.exclusive(&key, async { 1 }).await, Ok(1));
        assert_eq!(locks.exclusive(&key, async { 2 }).await, Ok(2));
    }

    #[tokio::test]
    async fn dead_entries_are_swept() {
        let locks = SessionLocks::new();
        for i in 0..(MIN_SWEEP * 3) {
            let key = SessionKey::new("c", i.to_string());
            drop(locks.acquire(&key).await);
        }
        assert!(locks.tracked() <= MIN_SWEEP + 1);
    }
}
