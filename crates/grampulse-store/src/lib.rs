//! Key-value blob storage for raw post collections, profile snapshots,
//! the trained model artifact, and scrape resume cursors.
//!
//! The rest of the system only depends on the narrow [`BlobStore`]
//! contract (`get`/`put` of whole byte blobs, no multi-key transactions).
//! Two implementations ship: a local filesystem store with atomic replace
//! and an in-memory store for tests. Cloud object stores and document
//! databases sit behind the same trait and are external concerns.

mod local;
mod memory;

pub use local::LocalBlobStore;
pub use memory::MemoryBlobStore;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Well-known key for the single trained model artifact. Replaced
/// wholesale on each successful retrain.
pub const MODEL_KEY: &str = "models/likes_predictor.json";

/// Key for the stored post collection of one account.
#[must_use]
pub fn posts_key(identity: &str) -> String {
    format!("posts/{identity}.json")
}

/// Key for the raw profile snapshot of one account.
#[must_use]
pub fn profile_key(identity: &str) -> String {
    format!("profiles/{identity}.json")
}

/// Key for the persisted pagination cursor of one account's scrape.
#[must_use]
pub fn cursor_key(identity: &str) -> String {
    format!("scrape_cursors/{identity}.json")
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error for key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error for key {key}: {source}")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid blob key \"{key}\": {reason}")]
    InvalidKey { key: String, reason: String },
}

/// Byte-oriented blob store with get/put semantics.
///
/// `put` must replace the value for a key atomically: a concurrent `get`
/// observes either the old blob or the new one in full, never a torn
/// write. The model artifact relies on this.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError>;
}

/// Reads and deserializes a JSON blob. Absent keys map to `Ok(None)`.
///
/// # Errors
///
/// Returns [`StoreError::Json`] when the stored bytes are not valid JSON
/// for `T`, or any underlying store error.
pub async fn get_json<T: DeserializeOwned>(
    store: &dyn BlobStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    let Some(bytes) = store.get(key).await? else {
        return Ok(None);
    };
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|source| StoreError::Json {
            key: key.to_owned(),
            source,
        })
}

/// Serializes `value` as JSON and writes it under `key`.
///
/// # Errors
///
/// Returns [`StoreError::Json`] on serialization failure or any
/// underlying store error.
pub async fn put_json<T: Serialize>(
    store: &dyn BlobStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec_pretty(value).map_err(|source| StoreError::Json {
        key: key.to_owned(),
        source,
    })?;
    store.put(key, &bytes).await
}

/// Rejects keys that could escape the store root or collide with temp
/// files. Keys are relative slash-separated paths like `posts/acme.json`.
pub(crate) fn validate_key(key: &str) -> Result<(), StoreError> {
    let reject = |reason: &str| {
        Err(StoreError::InvalidKey {
            key: key.to_owned(),
            reason: reason.to_owned(),
        })
    };

    if key.is_empty() {
        return reject("key is empty");
    }
    if key.starts_with('/') {
        return reject("key must be relative");
    }
    if key.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..") {
        return reject("key contains empty or dot path segments");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_helpers_produce_expected_layout() {
        assert_eq!(posts_key("acme"), "posts/acme.json");
        assert_eq!(profile_key("acme"), "profiles/acme.json");
        assert_eq!(cursor_key("acme"), "scrape_cursors/acme.json");
        assert_eq!(MODEL_KEY, "models/likes_predictor.json");
    }

    #[test]
    fn validate_key_rejects_traversal_and_absolute_paths() {
        assert!(validate_key("posts/../secrets").is_err());
        assert!(validate_key("/etc/passwd").is_err());
        assert!(validate_key("").is_err());
        assert!(validate_key("a//b").is_err());
        assert!(validate_key("./a").is_err());
        assert!(validate_key("posts/acme.json").is_ok());
    }

    #[tokio::test]
    async fn get_json_maps_absent_key_to_none() {
        let store = MemoryBlobStore::new();
        let value: Option<Vec<u32>> = get_json(&store, "posts/none.json").await.expect("get");
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn put_json_then_get_json_round_trips() {
        let store = MemoryBlobStore::new();
        put_json(&store, "posts/x.json", &vec![1u32, 2, 3])
            .await
            .expect("put");
        let value: Option<Vec<u32>> = get_json(&store, "posts/x.json").await.expect("get");
        assert_eq!(value, Some(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn get_json_surfaces_malformed_blob_as_json_error() {
        let store = MemoryBlobStore::new();
        store.put("posts/bad.json", b"not json").await.expect("put");
        let err = get_json::<Vec<u32>>(&store, "posts/bad.json")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Json { .. }));
    }
}
