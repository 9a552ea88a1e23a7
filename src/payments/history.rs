//! Withdrawal history persistence.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

/// A completed withdrawal, as shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithdrawalRecord {
    /// Gateway transaction id (or a local `WD-` id when none was returned).
    pub id: String,
    pub amount: f64,
    /// Destination PIX key.
    pub key: String,
    /// Seconds since epoch.
    pub created_at: u64,
    pub status: String,
}

impl WithdrawalRecord {
    /// Record for a successful payout made now.
    pub fn success(id: Option<String>, amount: f64, key: impl Into<String>) -> Self {
        let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
        let id = id.unwrap_or_else(|| {
            let millis = now.as_millis().to_string();
            format!("WD-{}", &millis[millis.len().saturating_sub(6)..])
        });
        Self {
            id,
            amount,
            key: key.into(),
            created_at: now.as_secs(),
            status: "success".to_string(),
        }
    }
}

/// Storage for recent withdrawals, newest first.
pub trait WithdrawalHistory: Send + Sync {
    fn record(&self, entry: WithdrawalRecord) -> std::io::Result<()>;
    fn entries(&self) -> Vec<WithdrawalRecord>;
}

/// Withdrawal history kept in a JSON file.
#[derive(Debug)]
pub struct JsonFileHistory {
    path: PathBuf,
    max_entries: usize,
    entries: Mutex<Vec<WithdrawalRecord>>,
}

impl JsonFileHistory {
    /// Open the history, loading existing entries if the file exists.
    pub fn open(path: impl AsRef<Path>, max_entries: usize) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut entries: Vec<WithdrawalRecord> = Vec::new();
        if path.exists() {
            let reader = BufReader::new(File::open(&path)?);
            entries = serde_json::from_reader(reader)?;
            entries.truncate(max_entries);
            tracing::debug!("Loaded {} withdrawals from history file", entries.len());
        }
        Ok(Self {
            path,
            max_entries,
            entries: Mutex::new(entries),
        })
    }

    fn save(&self, entries: &[WithdrawalRecord]) -> std::io::Result<()> {
        let writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(writer, entries)?;
        Ok(())
    }
}

impl WithdrawalHistory for JsonFileHistory {
    fn record(&self, entry: WithdrawalRecord) -> std::io::Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let mut updated = Vec::with_capacity(self.max_entries);
        updated.push(entry);
        updated.extend(entries.iter().cloned());
        updated.truncate(self.max_entries);

        // Memory only follows a successful write.
        self.save(&updated)?;
        *entries = updated;
        Ok(())
    }

    fn entries(&self) -> Vec<WithdrawalRecord> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}
