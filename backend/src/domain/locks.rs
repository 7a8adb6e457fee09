//! Per-entity mutual exclusion for read-modify-write operations.
//!
//! Toggles read current membership and write back a new value. Two toggles on
//! the same entity must not interleave, otherwise one update is lost. Guards
//! are keyed by entity UUID and released when dropped, including on early
//! returns and errors.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

/// Number of slots kept before idle ones are swept.
const SWEEP_THRESHOLD: usize = 1024;

/// Registry of async mutexes keyed by entity id.
#[derive(Debug, Default)]
pub struct EntityLocks {
    slots: Mutex<HashMap<Uuid, Arc<AsyncMutex<()>>>>,
}

/// Guard holding one or more entity locks.
#[derive(Debug)]
pub struct EntityGuard {
    _held: Vec<OwnedMutexGuard<()>>,
}

impl EntityLocks {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock a single entity.
    pub async fn lock(&self, key: Uuid) -> EntityGuard {
        self.lock_all([key]).await
    }

    /// Lock several entities at once.
    ///
    /// Keys are acquired in ascending order with duplicates removed, so two
    /// callers locking the same pair in opposite orders cannot deadlock.
    ///
    /// # Examples
    /// ```
    /// use greencare::domain::EntityLocks;
    /// use uuid::Uuid;
    ///
    /// # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
    /// let locks = EntityLocks::new();
    /// let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
    /// let guard = locks.lock_all([a, b]).await;
    /// drop(guard);
    /// let _again = locks.lock_all([b, a]).await;
    /// # });
    /// ```
    pub async fn lock_all(&self, keys: impl IntoIterator<Item = Uuid>) -> EntityGuard {
        let mut keys: Vec<Uuid> = keys.into_iter().collect();
        keys.sort_unstable();
        keys.dedup();

        let mutexes: Vec<Arc<AsyncMutex<()>>> = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            if slots.len() > SWEEP_THRESHOLD {
                slots.retain(|_, slot| Arc::strong_count(slot) > 1);
            }
            keys.iter()
                .map(|key| Arc::clone(slots.entry(*key).or_default()))
                .collect()
        };

        let mut held = Vec::with_capacity(mutexes.len());
        for mutex in mutexes {
            held.push(mutex.lock_owned().await);
        }
        EntityGuard { _held: held }
    }

    /// Number of slots currently registered.
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no slot is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn second_locker_waits_for_first() {
        let locks = Arc::new(EntityLocks::new());
        let key = Uuid::new_v4();
        let guard = locks.lock(key).await;

        let contender = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move {
                let _guard = locks.lock(key).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(guard);
        tokio::time::timeout(Duration::from_secs(1), contender)
            .await
            .expect("contender acquires after release")
            .expect("task completes");
    }

    #[tokio::test]
    async fn different_keys_do_not_block() {
        let locks = EntityLocks::new();
        let _first = locks.lock(Uuid::new_v4()).await;
        tokio::time::timeout(Duration::from_millis(100), locks.lock(Uuid::new_v4()))
            .await
            .expect("independent key is free");
    }

    #[tokio::test]
    async fn duplicate_keys_lock_once() {
        let locks = EntityLocks::new();
        let key = Uuid::new_v4();
        tokio::time::timeout(Duration::from_millis(100), locks.lock_all([key, key]))
            .await
            .expect("duplicates must not self-deadlock");
        assert_eq!(locks.len(), 1);
    }
}
