//! The authoritative, write-through persisted collection of expenses.

use std::{ops::Deref, sync::Arc};

use chrono::{NaiveDate, Utc};
use expense_domain::{parse_date, Amount, Category, Record, RecordId};
use tracing::{debug, info, warn};

use crate::{
    codec,
    store::{BlobStore, DEFAULT_STORAGE_KEY},
    view::snapshot_warnings,
    LedgerError, LedgerResult,
};

/// Immutable, cheaply clonable view of the ledger's records, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot(Arc<[Record]>);

impl Snapshot {
    pub fn records(&self) -> &[Record] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<Record> {
        self.0.to_vec()
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self(Arc::from(Vec::new()))
    }
}

impl From<Vec<Record>> for Snapshot {
    fn from(records: Vec<Record>) -> Self {
        Self(Arc::from(records))
    }
}

impl Deref for Snapshot {
    type Target = [Record];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// How the initial snapshot was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    /// Nothing stored under the key yet.
    Missing,
    /// The stored value could not be read or parsed; the ledger started empty.
    StoreReadFailure(String),
}

/// Outcome of reading a snapshot from a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub outcome: LoadOutcome,
    pub record_count: usize,
    /// Stored elements dropped because they were not valid records.
    pub skipped: usize,
    pub warnings: Vec<String>,
    /// Key that receives a copy of the unreadable stored value before the
    /// first write replaces it.
    pub backup_key: Option<String>,
}

impl LoadReport {
    pub fn recovered(&self) -> bool {
        matches!(self.outcome, LoadOutcome::StoreReadFailure(_))
    }

    fn missing() -> Self {
        Self {
            outcome: LoadOutcome::Missing,
            record_count: 0,
            skipped: 0,
            warnings: Vec::new(),
            backup_key: None,
        }
    }
}

/// Key used to preserve an unreadable value stored under `key`.
pub fn backup_key_for(key: &str) -> String {
    format!("{key}.unreadable-{}", Utc::now().format("%Y%m%d%H%M%S"))
}

/// Reads the snapshot stored under `key`.
///
/// Never fails: a missing, unreadable, or malformed value yields an empty
/// sequence and the reason is recorded in the report. Invalid elements of an
/// otherwise readable array are skipped one by one.
pub fn load_from_store(store: &dyn BlobStore, key: &str) -> (Vec<Record>, LoadReport) {
    let (records, report, _) = load_with_original(store, key);
    (records, report)
}

// Also hands back the raw text when some of it could not be used.
fn load_with_original(
    store: &dyn BlobStore,
    key: &str,
) -> (Vec<Record>, LoadReport, Option<String>) {
    let raw = match store.read(key) {
        Ok(Some(raw)) if !raw.trim().is_empty() => raw,
        Ok(_) => return (Vec::new(), LoadReport::missing(), None),
        Err(err) => return (Vec::new(), recovered_empty(key, err, None), None),
    };

    match codec::decode_each(&raw) {
        Ok((records, skipped)) => {
            let skipped_count = skipped.len();
            let mut warnings = skipped;
            warnings.extend(snapshot_warnings(&records));
            for warning in &warnings {
                warn!(key, "{warning}");
            }
            let backup_key = (skipped_count > 0).then(|| backup_key_for(key));
            let report = LoadReport {
                outcome: LoadOutcome::Loaded,
                record_count: records.len(),
                skipped: skipped_count,
                warnings,
                backup_key,
            };
            let original = report.backup_key.is_some().then_some(raw);
            (records, report, original)
        }
        Err(err) => {
            let report = recovered_empty(key, err, Some(backup_key_for(key)));
            (Vec::new(), report, Some(raw))
        }
    }
}

fn recovered_empty(key: &str, err: LedgerError, backup_key: Option<String>) -> LoadReport {
    warn!(key, error = %err, "stored expenses unreadable; starting with an empty ledger");
    LoadReport {
        outcome: LoadOutcome::StoreReadFailure(err.to_string()),
        record_count: 0,
        skipped: 0,
        warnings: Vec::new(),
        backup_key,
    }
}

/// Owns the ordered expense records and keeps the store in sync with them.
pub struct Ledger {
    records: Snapshot,
    store: Box<dyn BlobStore>,
    key: String,
    load_report: LoadReport,
    // Unreadable stored text still waiting to be copied to the backup key.
    pending_backup: Option<String>,
}

impl Ledger {
    /// Opens the ledger stored under [`DEFAULT_STORAGE_KEY`].
    pub fn open(store: Box<dyn BlobStore>) -> Self {
        Self::open_with_key(store, DEFAULT_STORAGE_KEY)
    }

    pub fn open_with_key(store: Box<dyn BlobStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        let (records, load_report, pending_backup) = load_with_original(store.as_ref(), &key);
        info!(
            key = %key,
            records = load_report.record_count,
            skipped = load_report.skipped,
            outcome = ?load_report.outcome,
            "expense ledger opened"
        );
        Self {
            records: Snapshot::from(records),
            store,
            key,
            load_report,
            pending_backup,
        }
    }

    /// Records a new expense and persists the updated snapshot.
    pub fn add(
        &mut self,
        amount: f64,
        category: Category,
        date: NaiveDate,
        note: impl Into<String>,
    ) -> LedgerResult<Record> {
        let amount = Amount::new(amount)?;
        let record = Record::new(amount, category, date, note);

        let mut next = Vec::with_capacity(self.records.len() + 1);
        next.push(record.clone());
        next.extend_from_slice(&self.records);
        self.commit(next)?;

        debug!(id = %record.id, amount = %record.amount, category = %record.category, "expense added");
        Ok(record)
    }

    /// Validates raw form input before delegating to [`Ledger::add`].
    pub fn add_raw(
        &mut self,
        amount: &str,
        category: &str,
        date: &str,
        note: &str,
    ) -> LedgerResult<Record> {
        let amount = Amount::parse(amount)?;
        let category: Category = category.parse()?;
        let date = parse_date(date)?;
        self.add(amount.value(), category, date, note)
    }

    /// Deletes the expense with `id`, returning it.
    pub fn remove(&mut self, id: &RecordId) -> LedgerResult<Record> {
        let position = self
            .records
            .iter()
            .position(|record| &record.id == id)
            .ok_or_else(|| LedgerError::NotFound(id.clone()))?;

        let mut next = self.records.to_vec();
        let removed = next.remove(position);
        self.commit(next)?;

        debug!(id = %removed.id, "expense removed");
        Ok(removed)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.records.clone()
    }

    pub fn get(&self, id: &RecordId) -> Option<&Record> {
        self.records.iter().find(|record| &record.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn load_report(&self) -> &LoadReport {
        &self.load_report
    }

    pub fn storage_key(&self) -> &str {
        &self.key
    }

    // The in-memory snapshot only changes once the store has accepted the new one.
    fn commit(&mut self, next: Vec<Record>) -> LedgerResult<()> {
        let encoded = codec::encode(&next)?;
        self.preserve_original()?;
        if let Err(err) = self.store.write(&self.key, &encoded) {
            warn!(key = %self.key, error = %err, "failed to persist expenses; change discarded");
            return Err(err);
        }
        self.records = Snapshot::from(next);
        Ok(())
    }

    // Nothing may overwrite the key until its unreadable value is safe elsewhere.
    fn preserve_original(&mut self) -> LedgerResult<()> {
        let (Some(raw), Some(backup_key)) =
            (self.pending_backup.as_deref(), self.load_report.backup_key.as_deref())
        else {
            return Ok(());
        };
        if let Err(err) = self.store.write(backup_key, raw) {
            warn!(key = %self.key, backup = %backup_key, error = %err, "could not back up unreadable expenses");
            return Err(err);
        }
        info!(key = %self.key, backup = %backup_key, "unreadable expenses backed up");
        self.pending_backup = None;
        Ok(())
    }
}
