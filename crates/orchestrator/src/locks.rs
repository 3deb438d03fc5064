//! Per-campaign-id mutual exclusion.
//!
//! Webhook reconciliation and retry can race on the same campaign id in
//! concurrently-scheduled request contexts. Serializing each campaign's
//! read-modify-write through one async mutex keeps transitions atomic
//! without locking unrelated campaigns against each other.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use promogen_core::types::CampaignId;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// A table of async locks keyed by campaign id.
///
/// Entries are created on first use and kept for the lifetime of the
/// process; a campaign id is 16 bytes plus one mutex, so the table stays
/// small at single-instance scale.
#[derive(Default)]
pub struct LockTable {
    entries: Mutex<HashMap<CampaignId, Arc<AsyncMutex<()>>>>,
}

impl LockTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for a campaign id, waiting if another task holds it.
    pub async fn acquire(&self, id: CampaignId) -> OwnedMutexGuard<()> {
        let entry = {
            let mut entries = self.entries.lock().expect("lock table poisoned");
            Arc::clone(entries.entry(id).or_default())
        };
        entry.lock_owned().await
    }
}
