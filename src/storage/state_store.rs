//! JSON storage for the todo state
//!
//! The state lives in `<data dir>/tasks.json`. Writes go to a temp file in
//! the same directory and are renamed over the real file, so readers never
//! see a half-written state. A file that cannot be parsed is moved aside to
//! `tasks.json.bak` and replaced by a fresh seeded state.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use fs2::FileExt;

use super::record::{SavedState, StateRecord};
use crate::domain::State;

/// File name of the state inside the data directory
pub const STATE_FILE_NAME: &str = "tasks.json";

/// How a loaded state came to be
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOrigin {
    /// Read from an existing file
    Existing,
    /// No file existed; seed tasks were written
    Seeded,
    /// The file was unreadable and was moved to `backup`
    Recovered { backup: PathBuf, reason: String },
}

/// Result of [`StateStore::load_outcome`]
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub state: State,
    pub origin: LoadOrigin,
}

#[derive(Debug, Clone, Copy)]
enum LockMode {
    Shared,
    Exclusive,
}

/// Store for the todo state file
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    /// Creates a store backed by the given file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates the default store inside a data directory
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(STATE_FILE_NAME))
    }

    /// Returns the path to the state file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where a corrupt file is moved to
    pub fn backup_path(&self) -> PathBuf {
        Self::with_suffix(&self.path, ".bak")
    }

    /// Advisory lock file shared by readers and writers
    pub fn lock_path(&self) -> PathBuf {
        Self::with_suffix(&self.path, ".lock")
    }

    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// Takes the store lock; released when the returned file is dropped
    ///
    /// The state file itself is replaced by rename on every save, so the
    /// lock lives on a separate file that is never replaced.
    fn lock(&self, mode: LockMode) -> Result<File> {
        let lock_path = self.lock_path();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("Failed to open lock file: {}", lock_path.display()))?;

        match mode {
            LockMode::Shared => FileExt::lock_shared(&file)
                .context("Failed to acquire read lock on state file")?,
            LockMode::Exclusive => FileExt::lock_exclusive(&file)
                .context("Failed to acquire write lock on state file")?,
        }
        Ok(file)
    }

    fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
        let mut name = path.as_os_str().to_os_string();
        name.push(suffix);
        PathBuf::from(name)
    }

    fn ensure_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        Ok(())
    }

    /// Loads the state, seeding or recovering as needed
    pub fn load(&self) -> Result<State> {
        Ok(self.load_outcome()?.state)
    }

    /// Loads the state and reports where it came from
    pub fn load_outcome(&self) -> Result<LoadOutcome> {
        self.ensure_dir()?;

        if !self.path.exists() {
            let state = self.write_seed()?;
            return Ok(LoadOutcome {
                state,
                origin: LoadOrigin::Seeded,
            });
        }

        let bytes = self.read_bytes()?;

        match StateRecord::parse(&bytes) {
            Ok(record) => Ok(LoadOutcome {
                state: record.into_state(),
                origin: LoadOrigin::Existing,
            }),
            Err(e) => {
                let backup = self.backup_path();
                fs::rename(&self.path, &backup).with_context(|| {
                    format!(
                        "Failed to move corrupt state {} to {}",
                        self.path.display(),
                        backup.display()
                    )
                })?;
                let state = self.write_seed()?;
                Ok(LoadOutcome {
                    state,
                    origin: LoadOrigin::Recovered {
                        backup,
                        reason: e.to_string(),
                    },
                })
            }
        }
    }

    fn read_bytes(&self) -> Result<Vec<u8>> {
        let _guard = self.lock(LockMode::Shared)?;

        let mut file = File::open(&self.path)
            .with_context(|| format!("Failed to open state file: {}", self.path.display()))?;

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)
            .with_context(|| format!("Failed to read state file: {}", self.path.display()))?;

        Ok(bytes)
    }

    fn write_seed(&self) -> Result<State> {
        let state = State::seeded(Utc::now());
        self.save(&state)?;
        Ok(state)
    }

    /// Writes the full state (temp file + atomic rename)
    ///
    /// Each save stages into its own uniquely named temp file, so concurrent
    /// writers never share a half-written file. The last rename wins.
    pub fn save(&self, state: &State) -> Result<()> {
        self.ensure_dir()?;

        let _guard = self.lock(LockMode::Exclusive)?;

        let mut prefix = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| STATE_FILE_NAME.into());
        prefix.push(".");

        let dir = self.dir();
        let mut temp = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(".tmp")
            .tempfile_in(dir)
            .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;

        {
            let mut writer = BufWriter::new(temp.as_file_mut());
            serde_json::to_writer_pretty(&mut writer, &SavedState::from(state))
                .context("Failed to serialize state")?;
            writeln!(writer).context("Failed to write state")?;
            writer.flush().context("Failed to flush state file")?;
        }
        temp.as_file()
            .sync_all()
            .context("Failed to sync state file")?;

        // Atomic rename
        temp.persist(&self.path)
            .map_err(|e| e.error)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TaskId, SEED_QUICKSTART_ID};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> StateStore {
        StateStore::in_dir(dir.path())
    }

    #[test]
    fn first_load_seeds_and_persists() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let outcome = store.load_outcome().unwrap();
        assert_eq!(outcome.origin, LoadOrigin::Seeded);
        assert_eq!(outcome.state.len(), 2);
        assert!(store.path().exists());

        let again = store.load_outcome().unwrap();
        assert_eq!(again.origin, LoadOrigin::Existing);
        assert_eq!(again.state, outcome.state);
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let mut state = store.load().unwrap();
        state.add_task("Write tests", 2).unwrap();
        state.toggle_task(&SEED_QUICKSTART_ID.parse::<TaskId>().unwrap());
        state.show_index = 1;
        store.save(&state).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, state);
    }

    #[test]
    fn corrupt_file_is_backed_up() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "{ this is not json").unwrap();

        let outcome = store.load_outcome().unwrap();
        assert!(matches!(outcome.origin, LoadOrigin::Recovered { .. }));
        assert_eq!(outcome.state.len(), 2);

        let backup = dir.path().join("tasks.json.bak");
        assert!(backup.exists());
        assert_eq!(fs::read_to_string(&backup).unwrap(), "{ this is not json");

        // The replacement is valid again
        assert_eq!(store.load_outcome().unwrap().origin, LoadOrigin::Existing);
    }

    #[test]
    fn mistyped_field_recovery_names_the_cause() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let raw = r#"{"tasks": [{"id": "a", "title": "Keep me", "priority": "4"}]}"#;
        fs::write(store.path(), raw).unwrap();

        match store.load_outcome().unwrap().origin {
            LoadOrigin::Recovered { reason, .. } => {
                assert!(reason.contains("wrong type"), "reason: {}", reason);
            }
            other => panic!("expected recovery, got {:?}", other),
        }
        // The original list is kept in the backup
        assert_eq!(fs::read_to_string(store.backup_path()).unwrap(), raw);
    }

    #[test]
    fn non_object_file_is_backed_up() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "[]").unwrap();

        let state = store.load().unwrap();
        assert_eq!(state.len(), 2);
        assert!(store.backup_path().exists());
    }

    #[test]
    fn missing_fields_are_not_corruption() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "{}").unwrap();

        let outcome = store.load_outcome().unwrap();
        assert_eq!(outcome.origin, LoadOrigin::Existing);
        assert!(outcome.state.is_empty());
        assert!(!store.backup_path().exists());
    }

    #[test]
    fn creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::in_dir(&dir.path().join("nested").join("dir"));

        store.load().unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn atomic_write() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save(&State::seeded(Utc::now())).unwrap();
        store.save(&State::new()).unwrap();

        // No staged temp files are left behind
        let mut names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["tasks.json", "tasks.json.lock"]);
    }

    #[test]
    fn concurrent_saves_never_expose_partial_files() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let mut state = State::seeded(Utc::now());
        for i in 0..200i64 {
            state.add_task(&format!("Task number {}", i), i % 5 + 1).unwrap();
        }
        store.save(&state).unwrap();

        let writers_done = AtomicUsize::new(0);
        let corrupt_reads = thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..25 {
                        store.save(&state).unwrap();
                    }
                    writers_done.fetch_add(1, Ordering::SeqCst);
                });
            }

            let mut corrupt = 0;
            while writers_done.load(Ordering::SeqCst) < 4 {
                let bytes = store.read_bytes().unwrap();
                if StateRecord::parse(&bytes).is_err() {
                    corrupt += 1;
                }
            }
            corrupt
        });

        assert_eq!(corrupt_reads, 0);
        assert_eq!(store.load().unwrap(), state);
    }

    #[test]
    fn save_fails_when_directory_cannot_be_created() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "file, not a dir").unwrap();

        let store = StateStore::in_dir(&blocker.join("data"));
        assert!(store.save(&State::new()).is_err());
        assert!(store.load().is_err());
    }

    #[test]
    fn written_file_has_expected_fields() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.load().unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["show_index"], 0);
        let first = &raw["tasks"][0];
        assert_eq!(first["id"], SEED_QUICKSTART_ID);
        assert_eq!(first["title"], "Part 6");
        assert_eq!(first["priority"], 1);
        assert_eq!(first["done"], false);
        assert!(first["created"].is_string());
    }
}
