//! Persistence of debt records and the user profile
//!
//! The calculation engine never touches storage; callers load debts and the
//! profile through a `DebtStore`, run the engine, then write any changes back.
//! Implementors only provide snapshot read/write; record-level operations are
//! built on top of those two primitives and refuse records that fail validation.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::data::{DebtId, DebtRecord, DebtUpdate, UserProfile};
use super::validation::{check_record, check_records};
use crate::error::{PlannerError, PlannerResult};

/// Everything a store persists
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    #[serde(default)]
    pub debts: Vec<DebtRecord>,

    #[serde(default)]
    pub user_profile: Option<UserProfile>,
}

/// Document produced by `export`
#[derive(Debug, Serialize)]
struct ExportDocument<'a> {
    debts: &'a [DebtRecord],
    user_profile: Option<&'a UserProfile>,
    exported_at: DateTime<Utc>,
}

/// Document accepted by `import`; absent sections leave stored data alone
#[derive(Debug, Deserialize)]
struct ImportDocument {
    #[serde(default)]
    debts: Option<Vec<DebtRecord>>,
    #[serde(default)]
    user_profile: Option<UserProfile>,
}

/// Storage collaborator for debts and the user profile
pub trait DebtStore {
    /// Read the full persisted snapshot
    fn read_snapshot(&self) -> PlannerResult<StoreSnapshot>;

    /// Replace the full persisted snapshot
    fn write_snapshot(&mut self, snapshot: &StoreSnapshot) -> PlannerResult<()>;

    fn load_debts(&self) -> PlannerResult<Vec<DebtRecord>> {
        Ok(self.read_snapshot()?.debts)
    }

    fn save_debts(&mut self, debts: &[DebtRecord]) -> PlannerResult<()> {
        check_records(debts)?;
        let mut snapshot = self.read_snapshot()?;
        snapshot.debts = debts.to_vec();
        self.write_snapshot(&snapshot)
    }

    fn add_debt(&mut self, debt: DebtRecord) -> PlannerResult<()> {
        check_record(&debt)?;
        let mut snapshot = self.read_snapshot()?;
        debug!("Adding debt {} ({})", debt.id, debt.creditor_name);
        snapshot.debts.push(debt);
        self.write_snapshot(&snapshot)
    }

    /// Replace a debt with an updated snapshot
    ///
    /// The updated record must still pass validation; `updated_at` is set to `now`.
    fn update_debt(
        &mut self,
        id: DebtId,
        update: &DebtUpdate,
        now: DateTime<Utc>,
    ) -> PlannerResult<DebtRecord> {
        let mut snapshot = self.read_snapshot()?;
        let slot = snapshot
            .debts
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or(PlannerError::DebtNotFound(id))?;

        let updated = slot.with_update(update, now);
        check_record(&updated)?;

        *slot = updated.clone();
        self.write_snapshot(&snapshot)?;
        Ok(updated)
    }

    /// Remove a debt; removing an unknown id is a no-op
    fn delete_debt(&mut self, id: DebtId) -> PlannerResult<()> {
        let mut snapshot = self.read_snapshot()?;
        let before = snapshot.debts.len();
        snapshot.debts.retain(|d| d.id != id);
        if snapshot.debts.len() == before {
            debug!("Delete of unknown debt {} ignored", id);
            return Ok(());
        }
        self.write_snapshot(&snapshot)
    }

    fn load_profile(&self) -> PlannerResult<Option<UserProfile>> {
        Ok(self.read_snapshot()?.user_profile)
    }

    fn save_profile(&mut self, profile: UserProfile) -> PlannerResult<()> {
        let mut snapshot = self.read_snapshot()?;
        snapshot.user_profile = Some(profile);
        self.write_snapshot(&snapshot)
    }

    fn clear(&mut self) -> PlannerResult<()> {
        self.write_snapshot(&StoreSnapshot::default())
    }

    /// Pretty-printed JSON of all debts and the profile
    fn export(&self) -> PlannerResult<String> {
        let snapshot = self.read_snapshot()?;
        let document = ExportDocument {
            debts: &snapshot.debts,
            user_profile: snapshot.user_profile.as_ref(),
            exported_at: Utc::now(),
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }

    /// Replace debts and/or profile from an exported document
    ///
    /// Nothing is written unless every imported debt validates.
    fn import(&mut self, json: &str) -> PlannerResult<()> {
        let document: ImportDocument = serde_json::from_str(json)?;
        if let Some(debts) = &document.debts {
            check_records(debts)?;
        }

        let mut snapshot = self.read_snapshot()?;
        if let Some(debts) = document.debts {
            snapshot.debts = debts;
        }
        if let Some(profile) = document.user_profile {
            snapshot.user_profile = Some(profile);
        }
        self.write_snapshot(&snapshot)
    }
}

/// Store backed by a single JSON document on disk
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DebtStore for JsonFileStore {
    fn read_snapshot(&self) -> PlannerResult<StoreSnapshot> {
        if !self.path.exists() {
            return Ok(StoreSnapshot::default());
        }

        let contents = fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(StoreSnapshot::default());
        }

        serde_json::from_str(&contents).map_err(|e| {
            warn!("Error reading debt store {}: {}", self.path.display(), e);
            PlannerError::from(e)
        })
    }

    fn write_snapshot(&mut self, snapshot: &StoreSnapshot) -> PlannerResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(snapshot)?;
        fs::write(&self.path, json)?;
        info!(
            "Saved {} debts to {}",
            snapshot.debts.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// In-memory store for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    snapshot: StoreSnapshot,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_debts(debts: Vec<DebtRecord>) -> Self {
        Self {
            snapshot: StoreSnapshot { debts, user_profile: None },
        }
    }
}

impl DebtStore for MemoryStore {
    fn read_snapshot(&self) -> PlannerResult<StoreSnapshot> {
        Ok(self.snapshot.clone())
    }

    fn write_snapshot(&mut self, snapshot: &StoreSnapshot) -> PlannerResult<()> {
        self.snapshot = snapshot.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn visa() -> DebtRecord {
        DebtRecord::revolving("Visa", 5000.0, None, 24.99)
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("debts.json"));
        assert!(store.load_debts().unwrap().is_empty());
        assert!(store.load_profile().unwrap().is_none());
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("debts.json");

        let mut store = JsonFileStore::new(&path);
        let debt = visa();
        store.add_debt(debt.clone()).unwrap();
        store.save_profile(UserProfile::new(1000.0)).unwrap();

        let reopened = JsonFileStore::new(&path);
        assert_eq!(reopened.load_debts().unwrap(), vec![debt]);
        assert_eq!(reopened.load_profile().unwrap().unwrap().available_funds, 1000.0);
    }

    #[test]
    fn test_corrupt_file_is_json_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("debts.json");
        fs::write(&path, "{ not json").unwrap();

        let store = JsonFileStore::new(&path);
        assert!(matches!(store.load_debts(), Err(PlannerError::Json(_))));
    }

    #[test]
    fn test_update_replaces_snapshot() {
        let debt = visa();
        let id = debt.id;
        let mut store = MemoryStore::with_debts(vec![debt.clone()]);
        let later = debt.updated_at + chrono::Duration::minutes(5);

        let update = DebtUpdate { balance: Some(4500.0), ..Default::default() };
        let updated = store.update_debt(id, &update, later).unwrap();

        assert_eq!(updated.balance, 4500.0);
        assert_eq!(updated.updated_at, later);
        assert_eq!(updated.created_at, debt.created_at);
        assert_eq!(store.load_debts().unwrap(), vec![updated]);
    }

    #[test]
    fn test_update_unknown_debt() {
        let mut store = MemoryStore::new();
        let id = DebtId::new();
        let result = store.update_debt(id, &DebtUpdate::default(), Utc::now());
        assert!(matches!(result, Err(PlannerError::DebtNotFound(missing)) if missing == id));
    }

    #[test]
    fn test_update_rejects_invalid_result() {
        let debt = visa();
        let id = debt.id;
        let mut store = MemoryStore::with_debts(vec![debt.clone()]);

        let update = DebtUpdate { balance: Some(-10.0), ..Default::default() };
        let result = store.update_debt(id, &update, Utc::now());
        assert!(matches!(result, Err(PlannerError::Validation(_))));
        assert_eq!(store.load_debts().unwrap(), vec![debt]);
    }

    #[test]
    fn test_delete_debt() {
        let keep = visa();
        let drop = DebtRecord::revolving("Store Card", 300.0, None, 29.0);
        let drop_id = drop.id;
        let mut store = MemoryStore::with_debts(vec![keep.clone(), drop]);

        store.delete_debt(drop_id).unwrap();
        store.delete_debt(DebtId::new()).unwrap();
        assert_eq!(store.load_debts().unwrap(), vec![keep]);
    }

    #[test]
    fn test_export_then_import_into_fresh_store() {
        let mut source = MemoryStore::with_debts(vec![visa()]);
        source.save_profile(UserProfile::new(750.0)).unwrap();
        let exported = source.export().unwrap();
        assert!(exported.contains("exported_at"));

        let mut target = MemoryStore::new();
        target.import(&exported).unwrap();
        assert_eq!(target.read_snapshot().unwrap(), source.read_snapshot().unwrap());
    }

    #[test]
    fn test_import_keeps_absent_sections() {
        let mut store = MemoryStore::with_debts(vec![visa()]);
        store.import(r#"{"user_profile": {"available_funds": 300.0}}"#).unwrap();

        assert_eq!(store.load_debts().unwrap().len(), 1);
        assert_eq!(store.load_profile().unwrap().unwrap().available_funds, 300.0);
    }

    #[test]
    fn test_import_rejects_malformed_json() {
        let mut store = MemoryStore::new();
        assert!(matches!(store.import("[1, 2"), Err(PlannerError::Json(_))));
    }

    #[test]
    fn test_add_rejects_invalid_debt() {
        let mut store = MemoryStore::new();
        let bad = DebtRecord::revolving("Visa", -100.0, None, 250.0);

        match store.add_debt(bad) {
            Err(PlannerError::Validation(errors)) => assert_eq!(
                errors,
                vec!["Balance must be greater than 0", "Interest rate must be between 0 and 100"]
            ),
            other => panic!("expected validation error, got {:?}", other),
        }
        assert!(store.load_debts().unwrap().is_empty());
    }

    #[test]
    fn test_import_rejects_invalid_debts() {
        let existing = visa();
        let mut store = MemoryStore::with_debts(vec![existing.clone()]);

        let good = DebtRecord::revolving("Amex", 800.0, Some(40.0), 21.0);
        let bad = DebtRecord::revolving("   ", -5.0, Some(-1.0), 500.0);
        let document = serde_json::json!({ "debts": [good, bad] }).to_string();

        match store.import(&document) {
            Err(PlannerError::Validation(errors)) => {
                assert_eq!(errors.len(), 4);
                assert!(errors.iter().all(|e| e.starts_with("Debt 2: ")));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert_eq!(store.load_debts().unwrap(), vec![existing]);
    }

    #[test]
    fn test_clear() {
        let mut store = MemoryStore::with_debts(vec![visa()]);
        store.save_profile(UserProfile::new(100.0)).unwrap();
        store.clear().unwrap();
        assert_eq!(store.read_snapshot().unwrap(), StoreSnapshot::default());
    }
}
