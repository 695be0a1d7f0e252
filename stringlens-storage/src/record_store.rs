// Copyright 2025 Sushanth (https://github.com/sushanthpy)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Record store
//!
//! Records are keyed by content hash and additionally indexed by their
//! canonical value, which is how clients address them for lookup and deletion.
//!
//! ## Persistence
//!
//! A persistent store keeps two files in its data directory:
//!
//! - `records.json`: compacted snapshot of every record, in insertion order
//! - `records.journal`: one JSON line per mutation since the snapshot
//!
//! Each mutation appends a single journal line before it is applied in memory.
//! If the append fails, the mutation is rejected and the store is unchanged.
//! Opening the store replays the journal over the snapshot, then compacts both
//! into a fresh snapshot.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use stringlens_core::{content_hash, AnalyzedRecord, FilterSet, Result, StringLensError};
use tracing::{debug, info, warn};

/// Snapshot file name inside the data directory
const SNAPSHOT_FILE: &str = "records.json";

/// Journal file name inside the data directory
const JOURNAL_FILE: &str = "records.journal";

/// An analyzed record together with its insertion time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub record: AnalyzedRecord,
    pub created_at: DateTime<Utc>,
}

/// Outcome of [`RecordStore::insert_if_absent`]
#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome {
    /// The record was stored
    Created(StoredRecord),
    /// A record with the same id was already present; it is returned unchanged
    AlreadyExists(StoredRecord),
}

/// Outcome of [`RecordStore::delete_by_value`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}

/// Store statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub record_count: usize,
    pub palindrome_count: usize,
}

/// Capability interface expected of a record store
pub trait RecordStore: Send + Sync {
    /// Insert keyed by `record.id`; atomic per id
    fn insert_if_absent(&self, record: AnalyzedRecord) -> Result<InsertOutcome>;

    fn get_by_id(&self, id: &str) -> Result<Option<StoredRecord>>;

    /// Lookup by exact canonical value
    fn get_by_value(&self, value: &str) -> Result<Option<StoredRecord>>;

    fn delete_by_value(&self, value: &str) -> Result<DeleteOutcome>;

    /// All records matching `filter`, in insertion order
    fn scan(&self, filter: &FilterSet) -> Result<Vec<StoredRecord>>;

    fn stats(&self) -> StoreStats;

    fn len(&self) -> usize {
        self.stats().record_count
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One journaled mutation
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum JournalEntry {
    Insert { stored: StoredRecord },
    Delete { id: String },
}

#[derive(Debug)]
struct Entry {
    /// Insertion sequence number
    seq: u64,
    stored: StoredRecord,
}

#[derive(Debug, Default)]
struct StoreInner {
    /// Records by content hash
    records: HashMap<String, Entry>,
    /// Content hash by canonical value
    ids_by_value: HashMap<String, String>,
    next_seq: u64,
}

impl StoreInner {
    fn insert(&mut self, stored: StoredRecord) {
        let seq = self.next_seq;
        self.next_seq += 1;

        self.ids_by_value
            .insert(stored.record.value.clone(), stored.record.id.clone());
        self.records
            .insert(stored.record.id.clone(), Entry { seq, stored });
    }

    fn remove(&mut self, id: &str) -> bool {
        match self.records.remove(id) {
            Some(entry) => {
                self.ids_by_value.remove(&entry.stored.record.value);
                true
            }
            None => false,
        }
    }

    fn get(&self, id: &str) -> Option<&StoredRecord> {
        self.records.get(id).map(|entry| &entry.stored)
    }

    fn sorted(&self, filter: &FilterSet) -> Vec<StoredRecord> {
        let mut matched: Vec<&Entry> = self
            .records
            .values()
            .filter(|entry| filter.matches(&entry.stored.record))
            .collect();
        matched.sort_by_key(|entry| entry.seq);
        matched
            .into_iter()
            .map(|entry| entry.stored.clone())
            .collect()
    }
}

/// Thread-safe in-memory record store
///
/// When opened on a data directory, every mutation is journaled to disk before
/// it becomes visible, and the record set is rebuilt on the next open.
#[derive(Debug)]
pub struct InMemoryRecordStore {
    inner: RwLock<StoreInner>,
    journal_path: Option<PathBuf>,
}

impl InMemoryRecordStore {
    /// Create a volatile store
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StoreInner::default()),
            journal_path: None,
        }
    }

    /// Open a persistent store rooted at `data_dir`
    ///
    /// Fails on an unreadable snapshot, a corrupt journal line that is not the
    /// last one, or a record whose id does not match its value's hash.
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self> {
        let data_dir = data_dir.as_ref();
        fs::create_dir_all(data_dir)?;

        let snapshot_path = data_dir.join(SNAPSHOT_FILE);
        let journal_path = data_dir.join(JOURNAL_FILE);
        let mut inner = StoreInner::default();

        if snapshot_path.exists() {
            let reader = BufReader::new(File::open(&snapshot_path)?);
            let records: Vec<StoredRecord> = serde_json::from_reader(reader)?;
            for stored in records {
                verify_hash(&stored)?;
                inner.insert(stored);
            }
            let count = inner.records.len();
            info!("Loaded {} records from {:?}", count, snapshot_path);
        } else {
            info!("No snapshot at {:?}, starting empty", snapshot_path);
        }

        if journal_path.exists() {
            let replayed = replay_journal(&journal_path, &mut inner)?;
            if replayed > 0 {
                info!("Replayed {} journal entries", replayed);
            }

            write_snapshot(&snapshot_path, &inner.sorted(&FilterSet::new()))?;
            fs::remove_file(&journal_path)?;
            debug!("Compacted journal into {:?}", snapshot_path);
        }

        Ok(Self {
            inner: RwLock::new(inner),
            journal_path: Some(journal_path),
        })
    }

    /// Whether mutations are written to disk
    pub fn is_persistent(&self) -> bool {
        self.journal_path.is_some()
    }

    /// Append one mutation to the journal. Must be called with the write lock
    /// held and before the mutation is applied in memory.
    fn append(&self, entry: &JournalEntry) -> Result<()> {
        let Some(path) = &self.journal_path else {
            return Ok(());
        };

        let mut line = serde_json::to_vec(entry)?;
        line.push(b'\n');

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(&line)?;
        file.flush()?;
        Ok(())
    }
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for InMemoryRecordStore {
    fn insert_if_absent(&self, record: AnalyzedRecord) -> Result<InsertOutcome> {
        let mut inner = self.inner.write();

        if let Some(existing) = inner.get(&record.id) {
            debug!(id = %record.id, "record already exists");
            return Ok(InsertOutcome::AlreadyExists(existing.clone()));
        }

        let stored = StoredRecord {
            record,
            created_at: Utc::now(),
        };
        self.append(&JournalEntry::Insert {
            stored: stored.clone(),
        })?;
        inner.insert(stored.clone());

        info!(id = %stored.record.id, length = stored.record.length, "stored record");
        Ok(InsertOutcome::Created(stored))
    }

    fn get_by_id(&self, id: &str) -> Result<Option<StoredRecord>> {
        Ok(self.inner.read().get(id).cloned())
    }

    fn get_by_value(&self, value: &str) -> Result<Option<StoredRecord>> {
        let inner = self.inner.read();
        Ok(inner
            .ids_by_value
            .get(value)
            .and_then(|id| inner.get(id))
            .cloned())
    }

    fn delete_by_value(&self, value: &str) -> Result<DeleteOutcome> {
        let mut inner = self.inner.write();

        let Some(id) = inner.ids_by_value.get(value).cloned() else {
            return Ok(DeleteOutcome::NotFound);
        };
        self.append(&JournalEntry::Delete { id: id.clone() })?;
        inner.remove(&id);

        info!(id = %id, "deleted record");
        Ok(DeleteOutcome::Deleted)
    }

    fn scan(&self, filter: &FilterSet) -> Result<Vec<StoredRecord>> {
        Ok(self.inner.read().sorted(filter))
    }

    fn stats(&self) -> StoreStats {
        let inner = self.inner.read();
        StoreStats {
            record_count: inner.records.len(),
            palindrome_count: inner
                .records
                .values()
                .filter(|entry| entry.stored.record.is_palindrome)
                .count(),
        }
    }
}

fn verify_hash(stored: &StoredRecord) -> Result<()> {
    if stored.record.id != content_hash(&stored.record.value) {
        return Err(StringLensError::Storage(format!(
            "stored record {} does not match its value hash",
            stored.record.id
        )));
    }
    Ok(())
}

/// Apply journal entries in order; returns how many were applied
///
/// An unparseable final line is a torn append and is dropped.
fn replay_journal(path: &Path, inner: &mut StoreInner) -> Result<usize> {
    let reader = BufReader::new(File::open(path)?);
    let lines: Vec<String> = reader.lines().collect::<std::io::Result<_>>()?;
    let last = lines.iter().rposition(|line| !line.trim().is_empty());

    let mut applied = 0;
    for (index, line) in lines.iter().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let entry: JournalEntry = match serde_json::from_str(line) {
            Ok(entry) => entry,
            Err(e) if Some(index) == last => {
                warn!("Dropping torn journal entry at line {}: {}", index + 1, e);
                break;
            }
            Err(e) => return Err(e.into()),
        };

        match entry {
            JournalEntry::Insert { stored } => {
                verify_hash(&stored)?;
                if inner.get(&stored.record.id).is_none() {
                    inner.insert(stored);
                }
            }
            JournalEntry::Delete { id } => {
                inner.remove(&id);
            }
        }
        applied += 1;
    }

    Ok(applied)
}

/// Temp file then rename
fn write_snapshot(path: &Path, records: &[StoredRecord]) -> Result<()> {
    let temp_path = path.with_extension("json.tmp");

    {
        let mut writer = BufWriter::new(File::create(&temp_path)?);
        serde_json::to_writer(&mut writer, records)?;
        writer.flush()?;
    }

    fs::rename(&temp_path, path)?;
    Ok(())
}
