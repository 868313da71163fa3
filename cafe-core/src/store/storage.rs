//! redb-based key-value snapshot storage
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `kv` | namespace | JSON-serialized `PersistedState` | Session snapshot |
//!
//! The whole persisted subset of the store is written under one namespace
//! key and restored verbatim on the next session.

use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableDatabase, TableDefinition};
use thiserror::Error;

use super::PersistedState;

/// Table for snapshots: key = namespace, value = JSON bytes
const KV_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("kv");

/// Default storage namespace
pub const DEFAULT_NAMESPACE: &str = "bb-cart-storage";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Session state storage backed by redb
#[derive(Clone)]
pub struct StateStorage {
    db: Arc<Database>,
    namespace: String,
}

impl std::fmt::Debug for StateStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateStorage")
            .field("db", &"<redb::Database>")
            .field("namespace", &self.namespace)
            .finish()
    }
}

impl StateStorage {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        // Create the table if it doesn't exist
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(KV_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self {
            db: Arc::new(db),
            namespace: DEFAULT_NAMESPACE.to_string(),
        })
    }

    /// Use a different namespace key
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Overwrite the snapshot
    pub fn save(&self, state: &PersistedState) -> StorageResult<()> {
        let bytes = serde_json::to_vec(state)?;
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(KV_TABLE)?;
            table.insert(self.namespace.as_str(), bytes.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Load the snapshot, `None` on first run
    pub fn load(&self) -> StorageResult<Option<PersistedState>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(KV_TABLE)?;

        match table.get(self.namespace.as_str())? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Remove the snapshot
    pub fn clear(&self) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(KV_TABLE)?;
            table.remove(self.namespace.as_str())?;
        }
        txn.commit()?;
        Ok(())
    }
}
