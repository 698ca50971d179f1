use crate::ledger::Ledger;
use crate::storage::Storage;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

#[derive(Clone)]
pub struct AppState {
    pub storage: Storage,
    pub ledger: Arc<Mutex<Ledger>>,
}

impl AppState {
    pub fn new(storage: Storage, ledger: Ledger) -> Self {
        Self {
            storage,
            ledger: Arc::new(Mutex::new(ledger)),
        }
    }

    /// Loads the stored records, seeding the default catalog into an empty
    /// tracker.
    pub async fn load(storage: Storage) -> Self {
        let stored = storage.read_records().await;
        let cached = storage.load_stats().await;
        let mut ledger = Ledger::new(stored.records);

        if ledger.stats() != cached {
            debug!("stored stats {cached:?} are stale, using recomputed {:?}", ledger.stats());
        }

        if stored.malformed && ledger.records().is_empty() {
            warn!("stored items could not be read; not seeding defaults over them");
        } else if ledger.seed_defaults() {
            info!("seeded {} default items", ledger.records().len());
            persist(&storage, &ledger).await;
        }

        Self::new(storage, ledger)
    }
}

/// Writes the ledger out. Failures are logged and dropped: the in-memory
/// ledger stays authoritative for the rest of the process.
pub async fn persist(storage: &Storage, ledger: &Ledger) {
    if let Err(err) = storage.save_all(ledger.records(), &ledger.stats()).await {
        error!("failed to persist tracker data: {err}");
    }
}
