//! Narrow object-store seam and the encrypting composition over it.
//!
//! The backing transport (S3 client, filesystem, test double) stays behind
//! the [`ObjectStore`] trait; this crate never performs store I/O itself.

use std::collections::HashMap;
use std::future::Future;

use crate::context::EncryptionContext;
use crate::engine::EncryptionEngine;
use crate::error::StoreResult;
use crate::provider::MaterialsProvider;

/// The only operations this crate needs from a backing object store.
/// Callers supply an adapter over their actual transport; failures surface
/// as [`crate::StoreError::Storage`].
pub trait ObjectStore: Send + Sync {
    fn put(
        &self,
        object_key: &str,
        body: Vec<u8>,
        metadata: HashMap<String, String>,
    ) -> impl Future<Output = StoreResult<()>> + Send;

    fn get(
        &self,
        object_key: &str,
    ) -> impl Future<Output = StoreResult<(Vec<u8>, HashMap<String, String>)>> + Send;
}

/// Client-side encrypting wrapper over an object store.
///
/// Bodies are sealed before `put` and opened after `get`; the backing store
/// only ever sees ciphertext and the metadata envelope.
pub struct EncryptedObjectStore<P, S> {
    engine: EncryptionEngine<P>,
    store: S,
    store_name: String,
}

impl<P: MaterialsProvider, S: ObjectStore> EncryptedObjectStore<P, S> {
    pub fn new(provider: P, store: S, store_name: impl Into<String>) -> Self {
        Self {
            engine: EncryptionEngine::new(provider),
            store,
            store_name: store_name.into(),
        }
    }

    /// Seals `plaintext` and stores it together with its envelope metadata.
    pub async fn put(&self, object_key: &str, plaintext: &[u8]) -> StoreResult<()> {
        let ctx = self.context(object_key);
        let (ciphertext, metadata) = self.engine.seal(plaintext, &ctx).await?;
        self.store.put(object_key, ciphertext, metadata).await
    }

    /// Fetches an object and opens it back to plaintext.
    pub async fn get(&self, object_key: &str) -> StoreResult<Vec<u8>> {
        let (ciphertext, metadata) = self.store.get(object_key).await?;
        let ctx = self.context(object_key);
        self.engine.open(&ciphertext, &metadata, &ctx).await
    }

    fn context(&self, object_key: &str) -> EncryptionContext {
        EncryptionContext::new(self.store_name.clone(), object_key)
    }
}
