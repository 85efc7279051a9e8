//! Key-value store keeping one file per key in a directory.
//!
//! Keys are `/`-separated segments of ASCII letters, digits, `-` and `_`.
//! Each key maps to a single file name with `/` replaced by `.`, so
//! `session/user` lives in `session.user`. All access goes through a
//! `cap_std` directory handle and never escapes it.

use std::io;
use std::sync::Arc;

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use tokio::task;
use tracing::debug;

use super::atomic_io::write_atomic;
use crate::domain::ports::{KeyValueStore, KeyValueStoreError};

/// Durable key-value store rooted at a directory.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    root: Utf8PathBuf,
    dir: Arc<Dir>,
}

impl FileKeyValueStore {
    /// Open `root`, creating it when missing.
    pub fn open(root: impl AsRef<Utf8Path>) -> Result<Self, KeyValueStoreError> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(root.as_std_path()).map_err(|err| io_error(&root, &err))?;
        let dir = Dir::open_ambient_dir(root.as_std_path(), ambient_authority())
            .map_err(|err| io_error(&root, &err))?;
        debug!(root = %root, "opened file key-value store");
        Ok(Self {
            root,
            dir: Arc::new(dir),
        })
    }

    /// Directory holding the values.
    pub fn root(&self) -> &Utf8Path {
        self.root.as_path()
    }

    fn file_name(key: &str) -> Result<String, KeyValueStoreError> {
        let valid = !key.is_empty()
            && key.split('/').all(|segment| {
                !segment.is_empty()
                    && segment
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
            });
        if valid {
            Ok(key.replace('/', "."))
        } else {
            Err(KeyValueStoreError::invalid_key(key))
        }
    }

    async fn blocking<T, F>(&self, op: F) -> Result<T, KeyValueStoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Dir) -> Result<T, KeyValueStoreError> + Send + 'static,
    {
        let dir = Arc::clone(&self.dir);
        task::spawn_blocking(move || op(&dir))
            .await
            .map_err(|err| KeyValueStoreError::io(format!("storage task failed: {err}")))?
    }
}

fn io_error(path: &Utf8Path, err: &io::Error) -> KeyValueStoreError {
    KeyValueStoreError::io(format!("{path}: {err}"))
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, KeyValueStoreError> {
        let name = Self::file_name(key)?;
        self.blocking(move |dir| match dir.read_to_string(&name) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(io_error(Utf8Path::new(&name), &err)),
        })
        .await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), KeyValueStoreError> {
        let name = Self::file_name(key)?;
        let value = value.to_owned();
        self.blocking(move |dir| {
            let path = Utf8Path::new(&name);
            write_atomic(dir, path, &value).map_err(|err| io_error(path, &err))
        })
        .await
    }

    async fn remove(&self, key: &str) -> Result<(), KeyValueStoreError> {
        let name = Self::file_name(key)?;
        self.blocking(move |dir| match dir.remove_file(&name) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(io_error(Utf8Path::new(&name), &err)),
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn temp_dir() -> TempDir {
        TempDir::new().expect("create temp dir")
    }

    fn utf8_root(temp: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(temp.path().join("store")).expect("utf-8 temp path")
    }

    #[rstest]
    #[tokio::test]
    async fn value_survives_a_fresh_adapter(temp_dir: TempDir) {
        let root = utf8_root(&temp_dir);
        let first = FileKeyValueStore::open(&root).expect("open store");
        first
            .set("session/token", "abc")
            .await
            .expect("write value");

        let second = FileKeyValueStore::open(&root).expect("reopen store");
        assert_eq!(
            second.get("session/token").await.expect("read").as_deref(),
            Some("abc")
        );
        assert!(root.join("session.token").is_file());
    }

    #[rstest]
    #[tokio::test]
    async fn overwrite_replaces_value_and_leaves_no_temp_files(temp_dir: TempDir) {
        let root = utf8_root(&temp_dir);
        let store = FileKeyValueStore::open(&root).expect("open store");
        store.set("session/user", "one").await.expect("first write");
        store.set("session/user", "two").await.expect("second write");

        assert_eq!(
            store.get("session/user").await.expect("read").as_deref(),
            Some("two")
        );
        let names: Vec<String> = std::fs::read_dir(root.as_std_path())
            .expect("list store")
            .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["session.user"]);
    }

    #[rstest]
    #[tokio::test]
    async fn missing_keys_read_as_none_and_remove_cleanly(temp_dir: TempDir) {
        let store = FileKeyValueStore::open(utf8_root(&temp_dir)).expect("open store");
        assert!(store.get("session/user").await.expect("read").is_none());
        store.remove("session/user").await.expect("remove absent key");
    }

    #[rstest]
    #[case("")]
    #[case("../escape")]
    #[case("session//user")]
    #[case("session/user.json")]
    #[case("/absolute")]
    #[tokio::test]
    async fn rejects_keys_outside_the_layout(temp_dir: TempDir, #[case] key: &str) {
        let store = FileKeyValueStore::open(utf8_root(&temp_dir)).expect("open store");
        let err = store.set(key, "x").await.expect_err("invalid key");
        assert_eq!(err, KeyValueStoreError::invalid_key(key));
    }
}
