use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use studymate_core::session::{SessionStore, StoreError};
use tempfile::NamedTempFile;
use tracing::{debug, info};

pub const SESSION_FILE: &str = "session.json";

/// Session keys persisted as one JSON object under the data directory.
#[derive(Debug)]
pub struct SessionFile {
    pub path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl SessionFile {
    #[tracing::instrument(skip(data_dir))]
    pub fn open(data_dir: &Path) -> anyhow::Result<Self> {
        fs::create_dir_all(data_dir)
            .with_context(|| format!("failed to create {}", data_dir.display()))?;

        let path = data_dir.join(SESSION_FILE);
        let entries = if path.exists() {
            load_entries(&path)?
        } else {
            BTreeMap::new()
        };

        info!(
            file = %path.display(),
            keys = entries.len(),
            "opened session file"
        );

        Ok(Self { path, entries })
    }

    fn flush(&self) -> Result<(), StoreError> {
        save_entries_atomic(&self.path, &self.entries).map_err(|err| StoreError(format!("{err:#}")))
    }
}

impl SessionStore for SessionFile {
    fn load(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if self.entries.remove(key).is_none() {
            return Ok(());
        }
        self.flush()
    }
}

#[tracing::instrument(skip(path))]
fn load_entries(path: &Path) -> anyhow::Result<BTreeMap<String, String>> {
    debug!(file = %path.display(), "loading session entries");
    let text = fs::read_to_string(path)?;
    if text.trim().is_empty() {
        return Ok(BTreeMap::new());
    }

    serde_json::from_str(&text).with_context(|| format!("failed parsing {}", path.display()))
}

fn save_entries_atomic(path: &Path, entries: &BTreeMap<String, String>) -> anyhow::Result<()> {
    debug!(file = %path.display(), count = entries.len(), "saving session atomically");

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut temp = NamedTempFile::new_in(dir)?;
    serde_json::to_writer_pretty(&mut temp, entries)?;
    writeln!(temp)?;
    temp.flush()?;

    temp.persist(path)
        .map_err(|err| anyhow!("failed to persist {}: {}", path.display(), err))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use studymate_core::session::TOKEN_KEY;
    use tempfile::tempdir;

    #[test]
    fn keys_survive_reopen_and_removal_sticks() {
        let temp = tempdir().expect("tempdir");

        let mut file = SessionFile::open(temp.path()).expect("open");
        file.save(TOKEN_KEY, "jwt").expect("save token");
        file.save("currentUser", r#"{"id":1}"#).expect("save user");

        let mut reopened = SessionFile::open(temp.path()).expect("reopen");
        assert_eq!(reopened.load(TOKEN_KEY).as_deref(), Some("jwt"));

        reopened.remove(TOKEN_KEY).expect("remove");
        let again = SessionFile::open(temp.path()).expect("reopen again");
        assert_eq!(again.load(TOKEN_KEY), None);
        assert!(again.load("currentUser").is_some());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let temp = tempdir().expect("tempdir");
        fs::write(temp.path().join(SESSION_FILE), "not json").expect("write");

        let err = SessionFile::open(temp.path()).expect_err("corrupt");
        assert!(format!("{err:#}").contains("failed parsing"));
    }
}
