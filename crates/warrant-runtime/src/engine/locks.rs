//! Per-subject write locks.
//!
//! Every read-modify-write of a subject record runs while holding that
//! subject's lock. Different subjects never contend.
//!
//! Lock order when two keys are needed: group, then user.
//!
//! An entry lives only while a guard or a waiter refers to it; the last
//! guard released removes it from the table.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use warrant_types::{Subject, SubjectKey};

type Table = Mutex<HashMap<SubjectKey, Arc<AsyncMutex<()>>>>;

/// Exclusive access to one subject, released on drop.
#[derive(Debug)]
#[must_use = "the subject is unlocked as soon as the guard is dropped"]
pub struct SubjectGuard {
    guard: Option<OwnedMutexGuard<()>>,
    key: SubjectKey,
    table: Arc<Table>,
}

impl Drop for SubjectGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        let mut table = self.table.lock();
        // Waiters hold their own clone of the entry.
        if table
            .get(&self.key)
            .is_some_and(|entry| Arc::strong_count(entry) == 1)
        {
            table.remove(&self.key);
        }
    }
}

/// Table of one async mutex per [`SubjectKey`].
///
/// The table itself is guarded by a short synchronous lock that is never
/// held across an await.
#[derive(Debug, Default)]
pub struct SubjectLocks {
    table: Arc<Table>,
}

impl SubjectLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&self, key: SubjectKey) -> Arc<AsyncMutex<()>> {
        Arc::clone(self.table.lock().entry(key).or_default())
    }

    /// Waits for exclusive access to `subject`.
    pub async fn lock(&self, subject: &Subject) -> SubjectGuard {
        let key = subject.key();
        let guard = self.entry(key.clone()).lock_owned().await;
        SubjectGuard {
            guard: Some(guard),
            key,
            table: Arc::clone(&self.table),
        }
    }

    /// Locks `first` then `second`.
    pub async fn lock_both(&self, first: &Subject, second: &Subject) -> (SubjectGuard, SubjectGuard) {
        let a = self.lock(first).await;
        let b = self.lock(second).await;
        (a, b)
    }

    /// Number of subjects currently locked or waited on.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.lock().is_empty()
    }
}
