//! The school data store.
//!
//! All state lives in memory behind one async lock and is written through
//! to a [`KeyValueStore`], one JSON value per storage key. Every change goes
//! through [`SchoolStore::mutate`]: the closure edits a working copy, the
//! changed keys are persisted, and only then is the copy swapped in. A
//! failed write leaves both memory and (best effort) storage as they were.

use std::sync::Arc;

use chrono::Utc;
use schoolhub_config::StorageConfig;
use schoolhub_core::{FileKeyValueStore, IdGenerator, KeyValueStore, MemoryKeyValueStore};
use schoolhub_models::messages::default_chat_groups;
use schoolhub_models::timetable::Timetable;
use schoolhub_models::{BackupBundle, SchoolData};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn};

use crate::error::StoreError;
use crate::keys;
use crate::state::{Mutation, SchoolState};

struct Inner {
    state: SchoolState,
    undo: Vec<SchoolData>,
    redo: Vec<SchoolData>,
}

pub struct SchoolStore {
    kv: Arc<dyn KeyValueStore>,
    session_kv: Arc<dyn KeyValueStore>,
    inner: RwLock<Inner>,
    ids: IdGenerator,
    audit_limit: usize,
    history_limit: usize,
}

impl std::fmt::Debug for SchoolStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchoolStore")
            .field("audit_limit", &self.audit_limit)
            .field("history_limit", &self.history_limit)
            .finish_non_exhaustive()
    }
}

/// Storage keys whose value differs between two states.
fn changed_keys(prev: &SchoolState, next: &SchoolState) -> Vec<&'static str> {
    let mut changed = Vec::new();
    if prev.data != next.data {
        changed.push(keys::SCHOOL_DATA);
    }
    if prev.users != next.users {
        changed.push(keys::REGISTERED_USERS);
    }
    if prev.chat_groups != next.chat_groups {
        changed.push(keys::CHAT_GROUPS);
    }
    if prev.audit_log != next.audit_log {
        changed.push(keys::AUDIT_LOG);
    }
    if prev.study_materials != next.study_materials {
        changed.push(keys::STUDY_MATERIALS);
    }
    if prev.documents != next.documents {
        changed.push(keys::DOCUMENTS);
    }
    if prev.syllabi != next.syllabi {
        changed.push(keys::SYLLABI);
    }
    if prev.attendance_history != next.attendance_history {
        changed.push(keys::ATTENDANCE_HISTORY);
    }
    if prev.timetable != next.timetable {
        changed.push(keys::TEACHER_TIMETABLE);
    }
    if prev.dark_mode != next.dark_mode {
        changed.push(keys::DARK_MODE);
    }
    changed
}

const STATE_KEYS: [&str; 10] = [
    keys::SCHOOL_DATA,
    keys::REGISTERED_USERS,
    keys::CHAT_GROUPS,
    keys::AUDIT_LOG,
    keys::STUDY_MATERIALS,
    keys::DOCUMENTS,
    keys::SYLLABI,
    keys::ATTENDANCE_HISTORY,
    keys::TEACHER_TIMETABLE,
    keys::DARK_MODE,
];

fn encode_key(state: &SchoolState, key: &'static str) -> Result<String, StoreError> {
    let value = match key {
        keys::SCHOOL_DATA => serde_json::to_string(&state.data)?,
        keys::REGISTERED_USERS => serde_json::to_string(&state.users)?,
        keys::CHAT_GROUPS => serde_json::to_string(&state.chat_groups)?,
        keys::AUDIT_LOG => serde_json::to_string(&state.audit_log)?,
        keys::STUDY_MATERIALS => serde_json::to_string(&state.study_materials)?,
        keys::DOCUMENTS => serde_json::to_string(&state.documents)?,
        keys::SYLLABI => serde_json::to_string(&state.syllabi)?,
        keys::ATTENDANCE_HISTORY => serde_json::to_string(&state.attendance_history)?,
        keys::TEACHER_TIMETABLE => serde_json::to_string(&state.timetable)?,
        _ => state.dark_mode.to_string(),
    };
    Ok(value)
}

async fn load_key<T: DeserializeOwned>(
    kv: &dyn KeyValueStore,
    key: &'static str,
) -> Result<Option<T>, StoreError> {
    let Some(raw) = kv
        .get(key)
        .await
        .map_err(|source| StoreError::Load { key, source })?
    else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StoreError::Corrupt { key, source })
}

impl SchoolStore {
    /// Load every key from `kv`, falling back to the default dataset for
    /// anything never saved. `session_kv` holds the secondary shared copy.
    #[instrument(skip(kv, session_kv))]
    pub async fn open(
        kv: Arc<dyn KeyValueStore>,
        session_kv: Arc<dyn KeyValueStore>,
        config: &StorageConfig,
    ) -> Result<Self, StoreError> {
        let kv_ref = kv.as_ref();
        let mut state = SchoolState::default();

        match load_key::<SchoolData>(kv_ref, keys::SCHOOL_DATA).await? {
            Some(data) => state.data = data,
            None => info!("No saved school data, starting from the default dataset"),
        }
        state.data.recompute_gpas();

        if let Some(users) = load_key(kv_ref, keys::REGISTERED_USERS).await? {
            state.users = users;
        }
        if let Some(groups) = load_key(kv_ref, keys::CHAT_GROUPS).await? {
            state.chat_groups = groups;
        }
        for (id, group) in default_chat_groups() {
            state.chat_groups.entry(id).or_insert(group);
        }
        if let Some(audit_log) = load_key(kv_ref, keys::AUDIT_LOG).await? {
            state.audit_log = audit_log;
        }
        if let Some(materials) = load_key(kv_ref, keys::STUDY_MATERIALS).await? {
            state.study_materials = materials;
        }
        if let Some(documents) = load_key(kv_ref, keys::DOCUMENTS).await? {
            state.documents = documents;
        }
        if let Some(syllabi) = load_key(kv_ref, keys::SYLLABI).await? {
            state.syllabi = syllabi;
        }
        if let Some(history) = load_key(kv_ref, keys::ATTENDANCE_HISTORY).await? {
            state.attendance_history = history;
        }
        // Older saves hold `{}` when no timetable was ever written.
        if let Some(value) = load_key::<serde_json::Value>(kv_ref, keys::TEACHER_TIMETABLE).await? {
            if value.is_array() {
                state.timetable = serde_json::from_value(value).map_err(|source| StoreError::Corrupt {
                    key: keys::TEACHER_TIMETABLE,
                    source,
                })?;
            }
        }
        if let Some(dark_mode) = load_key(kv_ref, keys::DARK_MODE).await? {
            state.dark_mode = dark_mode;
        }

        let ids = IdGenerator::starting_after(state.max_record_id());
        info!(
            students = state.data.students.len(),
            users = state.users.len(),
            "School data loaded"
        );

        let store = Self {
            kv,
            session_kv,
            inner: RwLock::new(Inner {
                state,
                undo: Vec::new(),
                redo: Vec::new(),
            }),
            ids,
            audit_limit: config.audit_log_limit.max(1),
            history_limit: config.undo_history_limit,
        };

        store.merge_legacy_shared_users().await;
        store.sync_from_shared().await;
        Ok(store)
    }

    /// Store backed by `<data_dir>/<key>.json` files.
    pub async fn open_dir(config: &StorageConfig) -> Result<Self, StoreError> {
        Self::open(
            Arc::new(FileKeyValueStore::new(&config.data_dir)),
            Arc::new(MemoryKeyValueStore::new()),
            config,
        )
        .await
    }

    /// Store that never touches the filesystem.
    pub async fn in_memory() -> Result<Self, StoreError> {
        Self::open(
            Arc::new(MemoryKeyValueStore::new()),
            Arc::new(MemoryKeyValueStore::new()),
            &StorageConfig::default(),
        )
        .await
    }

    pub fn kv(&self) -> &dyn KeyValueStore {
        self.kv.as_ref()
    }

    pub(crate) fn session_kv(&self) -> &dyn KeyValueStore {
        self.session_kv.as_ref()
    }

    pub(crate) fn ids(&self) -> &IdGenerator {
        &self.ids
    }

    pub fn next_id(&self) -> schoolhub_core::RecordId {
        self.ids.next_id()
    }

    pub async fn read<T>(&self, f: impl FnOnce(&SchoolState) -> T) -> T {
        let inner = self.inner.read().await;
        f(&inner.state)
    }

    pub async fn snapshot(&self) -> SchoolState {
        self.inner.read().await.state.clone()
    }

    /// Apply one change. Data-store changes can be undone.
    pub async fn mutate<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Mutation<'_>) -> Result<T, E>,
        E: From<StoreError>,
    {
        self.apply(f, true).await
    }

    pub(crate) async fn apply<T, E, F>(&self, f: F, track_undo: bool) -> Result<T, E>
    where
        F: FnOnce(&mut Mutation<'_>) -> Result<T, E>,
        E: From<StoreError>,
    {
        let mut inner = self.inner.write().await;
        let mut next = inner.state.clone();
        let result = f(&mut Mutation::new(&mut next, &self.ids, self.audit_limit))?;

        let changed = changed_keys(&inner.state, &next);
        if changed.is_empty() {
            return Ok(result);
        }
        self.persist(&inner.state, &next, &changed).await?;

        if track_undo && inner.state.data != next.data {
            let previous = inner.state.data.clone();
            inner.undo.push(previous);
            if inner.undo.len() > self.history_limit {
                inner.undo.remove(0);
            }
            inner.redo.clear();
        }

        let shared_changed = inner.state.users != next.users
            || inner.state.data.messages != next.data.messages;
        inner.state = next;
        if shared_changed {
            self.write_shared(&inner.state).await;
        }
        Ok(result)
    }

    async fn persist(
        &self,
        prev: &SchoolState,
        next: &SchoolState,
        changed: &[&'static str],
    ) -> Result<(), StoreError> {
        for (written, &key) in changed.iter().enumerate() {
            let value = encode_key(next, key)?;
            if let Err(source) = self.kv.set(key, value).await {
                error!(key = %key, error = %source, "Failed to persist, rolling back");
                for &key in &changed[..written] {
                    let restored = match encode_key(prev, key) {
                        Ok(value) => self.kv.set(key, value).await.is_ok(),
                        Err(_) => false,
                    };
                    if !restored {
                        warn!(key = %key, "Rollback write failed");
                    }
                }
                return Err(StoreError::Persist { key, source });
            }
            debug!(key = %key, "Persisted");
        }
        Ok(())
    }

    /// Record an audit entry on its own.
    pub async fn record_audit(
        &self,
        user: &str,
        action: &str,
        details: impl Into<String>,
    ) -> Result<(), StoreError> {
        let details = details.into();
        self.apply(
            |tx| {
                tx.audit(user, action, details);
                Ok::<_, StoreError>(())
            },
            false,
        )
        .await
    }

    /// (undo, redo) depths.
    pub async fn history_depth(&self) -> (usize, usize) {
        let inner = self.inner.read().await;
        (inner.undo.len(), inner.redo.len())
    }

    /// Step the data store back one change. `false` when there is nothing
    /// to undo.
    #[instrument(skip(self))]
    pub async fn undo(&self) -> Result<bool, StoreError> {
        self.step_history(true).await
    }

    #[instrument(skip(self))]
    pub async fn redo(&self) -> Result<bool, StoreError> {
        self.step_history(false).await
    }

    async fn step_history(&self, backwards: bool) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        let popped = if backwards {
            inner.undo.pop()
        } else {
            inner.redo.pop()
        };
        let Some(target) = popped else {
            return Ok(false);
        };

        let mut next = inner.state.clone();
        next.data = target;
        if let Err(e) = self.persist(&inner.state, &next, &[keys::SCHOOL_DATA]).await {
            if backwards {
                inner.undo.push(next.data);
            } else {
                inner.redo.push(next.data);
            }
            return Err(e);
        }

        let current = std::mem::replace(&mut inner.state, next).data;
        if backwards {
            inner.redo.push(current);
        } else {
            inner.undo.push(current);
        }
        let state = inner.state.clone();
        drop(inner);
        self.write_shared(&state).await;
        Ok(true)
    }

    pub async fn backup(&self) -> BackupBundle {
        let inner = self.inner.read().await;
        BackupBundle {
            timestamp: Utc::now(),
            data: inner.state.data.clone(),
            users: inner.state.users.clone(),
            audit: inner.state.audit_log.clone(),
        }
    }

    /// Replace data, users and audit log with the contents of a backup.
    #[instrument(skip(self, bundle), fields(backup_time = %bundle.timestamp))]
    pub async fn restore(&self, bundle: BackupBundle, actor: &str) -> Result<(), StoreError> {
        let BackupBundle {
            mut data,
            users,
            audit,
            ..
        } = bundle;
        data.recompute_gpas();
        let floor = users
            .iter()
            .map(|u| u.id)
            .chain(audit.iter().map(|e| e.id))
            .max()
            .unwrap_or(0)
            .max(data.max_record_id());
        self.ids.observe(floor);

        self.mutate(|tx| {
            tx.data = data;
            tx.users = users;
            tx.audit_log = audit;
            tx.audit(actor, "restore_completed", "System restored from backup");
            Ok::<_, StoreError>(())
        })
        .await?;
        info!("Restore completed");
        Ok(())
    }

    /// Return the data store and per-feature collections to their defaults.
    /// Accounts and the audit log are kept.
    #[instrument(skip(self))]
    pub async fn reset(&self, actor: &str) -> Result<(), StoreError> {
        self.mutate(|tx| {
            let defaults = SchoolState::default();
            tx.data = defaults.data;
            tx.study_materials.clear();
            tx.documents.clear();
            tx.syllabi.clear();
            tx.attendance_history.clear();
            tx.timetable = Timetable::default();
            tx.audit(actor, "data_reset", "School data reset to defaults");
            Ok::<_, StoreError>(())
        })
        .await
    }

    /// Read an auxiliary JSON value that is not part of [`SchoolState`].
    pub async fn load_json<T: DeserializeOwned>(&self, key: &'static str) -> Result<Option<T>, StoreError> {
        load_key(self.kv.as_ref(), key).await
    }

    pub async fn save_json<T: Serialize>(&self, key: &'static str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value)?;
        self.kv
            .set(key, raw)
            .await
            .map_err(|source| StoreError::Persist { key, source })
    }

    /// Keys owned by the store's state, in persistence order.
    pub fn state_keys() -> &'static [&'static str] {
        &STATE_KEYS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schoolhub_core::StorageError;
    use schoolhub_core::kv::StorageFuture;
    use schoolhub_models::students::{Fees, Student, default_marks};
    use std::sync::atomic::{AtomicBool, Ordering};

    fn student(tx: &Mutation<'_>, name: &str) -> Student {
        Student {
            id: tx.next_id(),
            name: name.to_string(),
            class_name: "10A".to_string(),
            attendance: 100,
            marks: default_marks(),
            fees: Fees::new(5000.0),
            gpa: 0.0,
            parent: None,
            email: None,
            phone: None,
            dob: None,
            address: None,
        }
    }

    async fn add_student(store: &SchoolStore, name: &str) -> schoolhub_core::RecordId {
        store
            .mutate(|tx| {
                let s = student(tx, name);
                let id = s.id;
                tx.data.students.push(s);
                Ok::<_, StoreError>(id)
            })
            .await
            .unwrap()
    }

    /// Wraps a memory store and fails writes while `failing` is set.
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryKeyValueStore,
        failing: AtomicBool,
    }

    impl KeyValueStore for FlakyStore {
        fn get<'a>(&'a self, key: &'a str) -> StorageFuture<'a, Option<String>> {
            self.inner.get(key)
        }

        fn set<'a>(&'a self, key: &'a str, value: String) -> StorageFuture<'a, ()> {
            if self.failing.load(Ordering::SeqCst) {
                return Box::pin(async {
                    Err(StorageError::Io(std::io::Error::other("disk full")))
                });
            }
            self.inner.set(key, value)
        }

        fn remove<'a>(&'a self, key: &'a str) -> StorageFuture<'a, ()> {
            self.inner.remove(key)
        }

        fn keys<'a>(&'a self, prefix: &'a str) -> StorageFuture<'a, Vec<String>> {
            self.inner.keys(prefix)
        }
    }

    #[tokio::test]
    async fn test_open_empty_uses_default_dataset() {
        let store = SchoolStore::in_memory().await.unwrap();
        let state = store.snapshot().await;
        assert_eq!(state.data, SchoolData::default_dataset());
        assert_eq!(state.chat_groups.len(), 3);
        assert_eq!(state.timetable.rows.len(), 7);
    }

    #[tokio::test]
    async fn test_mutation_is_persisted_and_reloaded() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            data_dir: dir.path().to_path_buf(),
            ..Default::default()
        };

        let store = SchoolStore::open_dir(&config).await.unwrap();
        let id = add_student(&store, "Ada Lovelace").await;
        drop(store);

        let reopened = SchoolStore::open_dir(&config).await.unwrap();
        let found = reopened
            .read(|s| s.data.student(id).map(|s| s.name.clone()))
            .await;
        assert_eq!(found.as_deref(), Some("Ada Lovelace"));
        assert!(dir.path().join("schoolHubData.json").exists());
        assert!(reopened.next_id() > id);
    }

    #[tokio::test]
    async fn test_failed_write_leaves_memory_unchanged() {
        let kv = Arc::new(FlakyStore::default());
        let store = SchoolStore::open(
            kv.clone(),
            Arc::new(MemoryKeyValueStore::new()),
            &StorageConfig::default(),
        )
        .await
        .unwrap();

        kv.failing.store(true, Ordering::SeqCst);
        let result = store
            .mutate(|tx| {
                let s = student(tx, "Lost");
                tx.data.students.push(s);
                Ok::<_, StoreError>(())
            })
            .await;
        assert!(matches!(result, Err(StoreError::Persist { .. })));
        assert_eq!(store.read(|s| s.data.students.len()).await, 2);
        assert_eq!(store.history_depth().await, (0, 0));
    }

    #[tokio::test]
    async fn test_closure_error_discards_changes() {
        let store = SchoolStore::in_memory().await.unwrap();
        let result: Result<(), StoreError> = store
            .mutate(|tx| {
                tx.data.students.clear();
                Err(StoreError::Serialize(serde_json::from_str::<u8>("x").unwrap_err()))
            })
            .await;
        assert!(result.is_err());
        assert_eq!(store.read(|s| s.data.students.len()).await, 2);
    }

    #[tokio::test]
    async fn test_undo_and_redo() {
        let store = SchoolStore::in_memory().await.unwrap();
        let id = add_student(&store, "Grace").await;
        assert_eq!(store.history_depth().await, (1, 0));

        assert!(store.undo().await.unwrap());
        assert!(store.read(|s| s.data.student(id).is_none()).await);
        assert_eq!(store.history_depth().await, (0, 1));

        assert!(store.redo().await.unwrap());
        assert!(store.read(|s| s.data.student(id).is_some()).await);
        assert!(!store.redo().await.unwrap());
    }

    #[tokio::test]
    async fn test_new_change_clears_redo() {
        let store = SchoolStore::in_memory().await.unwrap();
        add_student(&store, "One").await;
        store.undo().await.unwrap();
        add_student(&store, "Two").await;
        assert_eq!(store.history_depth().await, (1, 0));
    }

    #[tokio::test]
    async fn test_undo_history_is_bounded() {
        let config = StorageConfig {
            undo_history_limit: 3,
            ..Default::default()
        };
        let store = SchoolStore::open(
            Arc::new(MemoryKeyValueStore::new()),
            Arc::new(MemoryKeyValueStore::new()),
            &config,
        )
        .await
        .unwrap();
        for i in 0..5 {
            add_student(&store, &format!("Student {}", i)).await;
        }
        assert_eq!(store.history_depth().await, (3, 0));
    }

    #[tokio::test]
    async fn test_audit_is_not_undoable() {
        let store = SchoolStore::in_memory().await.unwrap();
        store.record_audit("admin", "login", "User logged in").await.unwrap();
        assert_eq!(store.history_depth().await, (0, 0));
        assert_eq!(store.read(|s| s.audit_log.len()).await, 1);
    }

    #[tokio::test]
    async fn test_backup_restore_roundtrip() {
        let store = SchoolStore::in_memory().await.unwrap();
        add_student(&store, "Backed Up").await;
        let bundle = store.backup().await;
        let json = serde_json::to_string(&bundle).unwrap();

        store.reset("admin").await.unwrap();
        assert_eq!(store.read(|s| s.data.students.len()).await, 2);

        let bundle: BackupBundle = serde_json::from_str(&json).unwrap();
        store.restore(bundle, "admin").await.unwrap();
        let state = store.snapshot().await;
        assert_eq!(state.data.students.len(), 3);
        assert_eq!(state.audit_log.last().unwrap().action, "restore_completed");
    }

    #[tokio::test]
    async fn test_corrupt_value_is_reported() {
        let kv = Arc::new(MemoryKeyValueStore::new());
        kv.set(keys::SCHOOL_DATA, "{not json".to_string()).await.unwrap();
        let err = SchoolStore::open(kv, Arc::new(MemoryKeyValueStore::new()), &StorageConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { key: "schoolHubData", .. }));
    }

    #[tokio::test]
    async fn test_legacy_empty_timetable_object() {
        let kv = Arc::new(MemoryKeyValueStore::new());
        kv.set(keys::TEACHER_TIMETABLE, "{}".to_string()).await.unwrap();
        kv.set(keys::DARK_MODE, "true".to_string()).await.unwrap();
        let store = SchoolStore::open(kv, Arc::new(MemoryKeyValueStore::new()), &StorageConfig::default())
            .await
            .unwrap();
        let state = store.snapshot().await;
        assert_eq!(state.timetable, Timetable::default());
        assert!(state.dark_mode);
    }
}
