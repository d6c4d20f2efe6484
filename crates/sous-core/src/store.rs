//! Durable persistence for cooking sessions.
//!
//! One session per recipe slug, behind a small key-value interface so the
//! backend (YAML files, redb) is swappable without touching session logic.
//! `load` never fails: an absent or unparseable record is simply "no
//! session". `save` and `clear` report errors; the controller decides
//! whether to swallow them.

use crate::config::StorageBackend;
use crate::error::{Result, SousError};
use crate::paths;
use crate::session::CookingSession;
use redb::{Database, TableDefinition};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// SessionKey
// ---------------------------------------------------------------------------

/// Typed storage key: one session per recipe slug.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub recipe: String,
}

impl SessionKey {
    pub fn new(recipe: impl Into<String>) -> Self {
        Self {
            recipe: recipe.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// SessionStore
// ---------------------------------------------------------------------------

pub trait SessionStore {
    /// Returns the stored session, or None when absent or unparseable.
    fn load(&self, key: &SessionKey) -> Option<CookingSession>;

    /// Serialize and store the full session under its recipe key.
    fn save(&self, session: &CookingSession) -> Result<()>;

    /// Remove the stored session for this recipe, if any.
    fn clear(&self, key: &SessionKey) -> Result<()>;
}

/// Open the configured backend rooted at `root`.
pub fn open_store(root: &Path, backend: StorageBackend) -> Result<Box<dyn SessionStore>> {
    match backend {
        StorageBackend::File => Ok(Box::new(FileStore::new(root))),
        StorageBackend::Redb => Ok(Box::new(RedbStore::open(&paths::sessions_db_path(root))?)),
    }
}

// ---------------------------------------------------------------------------
// FileStore
// ---------------------------------------------------------------------------

/// Default backend: one YAML file per session under `.sous/sessions/`,
/// written atomically so a reload never observes a partial session.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SessionStore for FileStore {
    fn load(&self, key: &SessionKey) -> Option<CookingSession> {
        let path = paths::session_file(&self.root, &key.recipe);
        let data = std::fs::read_to_string(&path).ok()?;
        match serde_yaml::from_str::<CookingSession>(&data) {
            Ok(mut session) => {
                session.normalize();
                Some(session)
            }
            Err(e) => {
                // Corrupt session == no session; the cook starts over
                tracing::warn!("discarding unparseable session {}: {e}", path.display());
                None
            }
        }
    }

    fn save(&self, session: &CookingSession) -> Result<()> {
        let path = paths::session_file(&self.root, &session.recipe);
        let data = serde_yaml::to_string(session)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    fn clear(&self, key: &SessionKey) -> Result<()> {
        let path = paths::session_file(&self.root, &key.recipe);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// RedbStore
// ---------------------------------------------------------------------------

/// Key: recipe slug. Value: JSON-encoded CookingSession.
const SESSIONS: TableDefinition<&str, &[u8]> = TableDefinition::new("sessions");

/// Alternate backend: a single redb database file holding all sessions.
pub struct RedbStore {
    db: Database,
}

impl RedbStore {
    /// Open or create the redb database at `path`.
    ///
    /// Creates the `SESSIONS` table if it doesn't already exist.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            crate::io::ensure_dir(parent)?;
        }
        let db = Database::create(path).map_err(|e| SousError::Store(e.to_string()))?;
        // Ensure the table exists before any reads
        let wt = db
            .begin_write()
            .map_err(|e| SousError::Store(e.to_string()))?;
        wt.open_table(SESSIONS)
            .map_err(|e| SousError::Store(e.to_string()))?;
        wt.commit().map_err(|e| SousError::Store(e.to_string()))?;
        Ok(Self { db })
    }
}

impl SessionStore for RedbStore {
    fn load(&self, key: &SessionKey) -> Option<CookingSession> {
        let rt = self.db.begin_read().ok()?;
        let table = rt.open_table(SESSIONS).ok()?;
        let value = table.get(key.recipe.as_str()).ok()??;
        match serde_json::from_slice::<CookingSession>(value.value()) {
            Ok(mut session) => {
                session.normalize();
                Some(session)
            }
            Err(e) => {
                tracing::warn!("discarding unparseable session '{}': {e}", key.recipe);
                None
            }
        }
    }

    fn save(&self, session: &CookingSession) -> Result<()> {
        let value = serde_json::to_vec(session)?;
        let wt = self
            .db
            .begin_write()
            .map_err(|e| SousError::Store(e.to_string()))?;
        {
            let mut table = wt
                .open_table(SESSIONS)
                .map_err(|e| SousError::Store(e.to_string()))?;
            table
                .insert(session.recipe.as_str(), value.as_slice())
                .map_err(|e| SousError::Store(e.to_string()))?;
        }
        wt.commit().map_err(|e| SousError::Store(e.to_string()))?;
        Ok(())
    }

    fn clear(&self, key: &SessionKey) -> Result<()> {
        let wt = self
            .db
            .begin_write()
            .map_err(|e| SousError::Store(e.to_string()))?;
        {
            let mut table = wt
                .open_table(SESSIONS)
                .map_err(|e| SousError::Store(e.to_string()))?;
            table
                .remove(key.recipe.as_str())
                .map_err(|e| SousError::Store(e.to_string()))?;
        }
        wt.commit().map_err(|e| SousError::Store(e.to_string()))?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer;
    use crate::types::Phase;
    use tempfile::TempDir;

    fn sample_session() -> CookingSession {
        let mut s = CookingSession::new("pho");
        s.toggle_ingredient("star anise");
        s.toggle_ingredient("rice noodles");
        timer::add(&mut s.timers, 600, "broth");
        timer::add(&mut s.timers, 120, "noodles");
        s.begin_cooking(4).unwrap();
        s.next_step(4).unwrap();
        s
    }

    fn assert_roundtrip(store: &dyn SessionStore) {
        let session = sample_session();
        let key = SessionKey::new("pho");

        assert!(store.load(&key).is_none());
        store.save(&session).unwrap();

        let loaded = store.load(&key).expect("session should round-trip");
        assert_eq!(loaded.recipe, "pho");
        assert_eq!(loaded.phase, Phase::Cooking);
        assert_eq!(loaded.current_step, 1);
        assert_eq!(
            loaded.checked_ingredients,
            vec!["star anise", "rice noodles"]
        );
        assert_eq!(loaded.timers.len(), 2);
        assert_eq!(loaded.timers[0].label, "broth");
        assert_eq!(loaded.timers[0].remaining_seconds, 600);
        assert_eq!(loaded.timers[1].id, session.timers[1].id);

        store.clear(&key).unwrap();
        assert!(store.load(&key).is_none());
    }

    #[test]
    fn file_store_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        assert_roundtrip(&store);
    }

    #[test]
    fn redb_store_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = RedbStore::open(&dir.path().join("sessions.redb")).unwrap();
        assert_roundtrip(&store);
    }

    #[test]
    fn file_store_corrupt_session_loads_as_none() {
        let dir = TempDir::new().unwrap();
        let path = paths::session_file(dir.path(), "pho");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "phase: [not a session").unwrap();

        let store = FileStore::new(dir.path());
        assert!(store.load(&SessionKey::new("pho")).is_none());
    }

    #[test]
    fn file_store_load_dedupes_checked_ingredients() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        let mut session = CookingSession::new("pho");
        session.checked_ingredients =
            vec!["salt".to_string(), "salt".to_string(), "eggs".to_string()];
        store.save(&session).unwrap();

        let loaded = store.load(&SessionKey::new("pho")).unwrap();
        assert_eq!(loaded.checked_ingredients, vec!["salt", "eggs"]);
    }

    #[test]
    fn file_store_load_stops_timers_at_zero() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        let mut session = CookingSession::new("pho");
        timer::add(&mut session.timers, 300, "simmer");
        session.timers[0].remaining_seconds = 0;
        session.timers[0].running = true;
        store.save(&session).unwrap();

        let loaded = store.load(&SessionKey::new("pho")).unwrap();
        assert!(!loaded.timers[0].running, "a timer at zero must load stopped");
    }

    #[test]
    fn clear_missing_session_is_ok() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        store.clear(&SessionKey::new("never-cooked")).unwrap();
    }

    #[test]
    fn sessions_are_keyed_per_recipe() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        store.save(&CookingSession::new("pho")).unwrap();
        store.save(&CookingSession::new("toast")).unwrap();

        store.clear(&SessionKey::new("pho")).unwrap();
        assert!(store.load(&SessionKey::new("pho")).is_none());
        assert!(store.load(&SessionKey::new("toast")).is_some());
    }

    #[test]
    fn open_store_selects_backend() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".sous")).unwrap();
        let file = open_store(dir.path(), StorageBackend::File).unwrap();
        file.save(&CookingSession::new("pho")).unwrap();
        assert!(dir.path().join(".sous/sessions/pho.yaml").exists());

        let redb = open_store(dir.path(), StorageBackend::Redb).unwrap();
        redb.save(&CookingSession::new("pho")).unwrap();
        assert!(dir.path().join(".sous/sessions.redb").exists());
    }
}
