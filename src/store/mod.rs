// User record store
//
// This module implements the durable user collection: a single JSON document
// read in full at the start of every operation and rewritten in full on every
// mutation. All mutations are serialized through one writer lock so that
// pipelined requests cannot lose updates.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::fs;
use tokio::sync::Mutex;

use crate::errors::StoreError;

/// A user record. A small closed set of known fields plus an open extension
/// map, so handlers can stamp arbitrary properties onto records without
/// losing type safety on the fields everything else relies on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Positive integer uniquely identifying the record within the collection
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Any additional properties carried by the record
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A user record before an id has been assigned
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// File-backed store for the user collection
pub struct UserStore {
    path: PathBuf,
    // Single-writer discipline: every read-modify-write cycle holds this
    // lock from load through persist.
    write_gate: Mutex<()>,
}

impl UserStore {
    /// Create a store backed by the JSON document at `path`
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_gate: Mutex::new(()),
        }
    }

    /// Create the backing document with an empty collection if it is missing
    pub async fn init(&self) -> Result<(), StoreError> {
        match fs::metadata(&self.path).await {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                if let Some(parent) = self.path.parent() {
                    fs::create_dir_all(parent)
                        .await
                        .map_err(|e| StoreError::Unavailable(e.to_string()))?;
                }
                self.persist(&[]).await
            }
            Err(e) => Err(StoreError::Unavailable(e.to_string())),
        }
    }

    /// Read the full collection from durable storage
    pub async fn load(&self) -> Result<Vec<User>, StoreError> {
        let bytes = fs::read(&self.path)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| StoreError::Unavailable(e.to_string()))
    }

    /// Append a record, assigning `id = count + 1`, and return the new id
    pub async fn append(&self, user: NewUser) -> Result<u64, StoreError> {
        let _guard = self.write_gate.lock().await;
        let mut users = self.load().await?;
        let id = users.len() as u64 + 1;
        users.push(User {
            id,
            name: user.name,
            email: user.email,
            address: user.address,
            phone: user.phone,
            extra: user.extra,
        });
        self.persist(&users).await?;
        Ok(id)
    }

    /// Remove the final record and return the id slot it occupied, i.e. the
    /// pre-removal count. Storage is left untouched when the collection is
    /// already empty.
    pub async fn remove_last(&self) -> Result<u64, StoreError> {
        let _guard = self.write_gate.lock().await;
        let mut users = self.load().await?;
        if users.is_empty() {
            return Err(StoreError::EmptyCollection);
        }
        let id = users.len() as u64;
        users.pop();
        self.persist(&users).await?;
        Ok(id)
    }

    /// Overwrite durable storage with the given collection
    pub async fn replace_all(&self, users: Vec<User>) -> Result<(), StoreError> {
        let _guard = self.write_gate.lock().await;
        self.persist(&users).await
    }

    /// Rebuild every record through a pure per-record transform and persist
    /// the result. Returns the number of records rewritten.
    pub async fn map_fields<F>(&self, transform: F) -> Result<usize, StoreError>
    where
        F: Fn(&mut User) + Send,
    {
        let _guard = self.write_gate.lock().await;
        let mut users = self.load().await?;
        for user in &mut users {
            transform(user);
        }
        let count = users.len();
        self.persist(&users).await?;
        Ok(count)
    }

    async fn persist(&self, users: &[User]) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(users)
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        fs::write(&self.path, bytes)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::NamedTempFile;

    fn seeded_store(initial: &Value) -> (UserStore, NamedTempFile) {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), serde_json::to_vec_pretty(initial).unwrap()).unwrap();
        (UserStore::new(file.path()), file)
    }

    fn named(name: &str) -> NewUser {
        NewUser {
            name: Some(name.to_string()),
            email: Some(format!("{}@example.com", name.to_lowercase())),
            address: Some("1 Main St".to_string()),
            phone: Some("555-0100".to_string()),
            extra: Map::new(),
        }
    }

    #[tokio::test]
    async fn append_assigns_next_id_and_persists() {
        let (store, _file) = seeded_store(&json!([]));

        let id = store.append(named("A")).await.unwrap();
        assert_eq!(id, 1);

        let users = store.load().await.unwrap();
        assert_eq!(users.len(), 1);
        let last = users.last().unwrap();
        assert_eq!(last.id, 1);
        assert_eq!(last.name.as_deref(), Some("A"));
    }

    #[tokio::test]
    async fn append_preserves_unknown_fields() {
        let (store, _file) = seeded_store(&json!([]));

        let mut user = named("A");
        user.extra.insert("role".to_string(), json!("admin"));
        store.append(user).await.unwrap();

        let users = store.load().await.unwrap();
        assert_eq!(users[0].extra.get("role"), Some(&json!("admin")));
    }

    #[tokio::test]
    async fn remove_last_returns_pre_removal_count() {
        let (store, _file) = seeded_store(&json!([
            {"id": 1, "name": "A"},
            {"id": 2, "name": "B"},
            {"id": 3, "name": "C"}
        ]));

        let id = store.remove_last().await.unwrap();
        assert_eq!(id, 3);

        let users = store.load().await.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users.last().unwrap().id, 2);
    }

    #[tokio::test]
    async fn remove_last_on_empty_fails_and_leaves_storage_unchanged() {
        let (store, file) = seeded_store(&json!([]));
        let before = std::fs::read(file.path()).unwrap();

        let err = store.remove_last().await.unwrap_err();
        assert!(matches!(err, StoreError::EmptyCollection));

        let after = std::fs::read(file.path()).unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn replace_all_round_trip_is_idempotent() {
        let (store, _file) = seeded_store(&json!([
            {"id": 1, "name": "A", "email": "a@example.com"},
            {"id": 2, "name": "B", "city": "Springfield"}
        ]));

        let users = store.load().await.unwrap();
        store.replace_all(users.clone()).await.unwrap();

        let reloaded = store.load().await.unwrap();
        assert_eq!(reloaded, users);
    }

    #[tokio::test]
    async fn map_fields_stamps_every_record() {
        let (store, _file) = seeded_store(&json!([
            {"id": 1, "name": "A"},
            {"id": 2, "name": "B"}
        ]));

        let count = store
            .map_fields(|user| {
                user.extra.insert("active".to_string(), json!(true));
            })
            .await
            .unwrap();
        assert_eq!(count, 2);

        let users = store.load().await.unwrap();
        assert!(users.iter().all(|u| u.extra.get("active") == Some(&json!(true))));
    }

    #[tokio::test]
    async fn unparseable_document_surfaces_as_unavailable() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), b"not json").unwrap();
        let store = UserStore::new(file.path());

        let err = store.load().await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }

    #[tokio::test]
    async fn init_creates_missing_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("users.json");
        let store = UserStore::new(&path);

        store.init().await.unwrap();
        assert_eq!(store.load().await.unwrap(), Vec::<User>::new());
    }
}
