//! Shared test doubles: an in-process key service and an in-memory store.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use envault_store::{
    GeneratedDataKey, KeyService, KeyServiceError, ObjectStore, StoreError, StoreResult,
};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// Wire form of the mock's "wrapped" key: the generation-time context is
/// embedded alongside the key so `decrypt` can enforce context matching the
/// way a real key-management service does.
#[derive(Serialize, Deserialize)]
struct MockWrappedKey {
    master_key_id: String,
    encryption_context: BTreeMap<String, String>,
    key: Vec<u8>,
}

/// In-process key service simulating remote generate/decrypt semantics:
/// fresh random key material per call, context-bound decryption, and
/// switchable failure injection.
#[derive(Default)]
pub struct MockKeyService {
    pub fail_generate: bool,
    pub fail_decrypt: bool,
}

impl MockKeyService {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyService for MockKeyService {
    async fn generate_data_key(
        &self,
        master_key_id: &str,
        num_bytes: usize,
        encryption_context: &BTreeMap<String, String>,
    ) -> Result<GeneratedDataKey, KeyServiceError> {
        if self.fail_generate {
            return Err(KeyServiceError::Unavailable("injected outage".to_string()));
        }

        let mut key = vec![0u8; num_bytes];
        getrandom::getrandom(&mut key)
            .map_err(|e| KeyServiceError::Unavailable(e.to_string()))?;

        let wrapped = serde_json::to_vec(&MockWrappedKey {
            master_key_id: master_key_id.to_string(),
            encryption_context: encryption_context.clone(),
            key: key.clone(),
        })
        .map_err(|e| KeyServiceError::Unavailable(e.to_string()))?;

        Ok(GeneratedDataKey {
            plaintext: Zeroizing::new(key),
            wrapped,
        })
    }

    async fn decrypt(
        &self,
        wrapped_key: &[u8],
        encryption_context: &BTreeMap<String, String>,
    ) -> Result<Zeroizing<Vec<u8>>, KeyServiceError> {
        if self.fail_decrypt {
            return Err(KeyServiceError::Unavailable("injected outage".to_string()));
        }

        let parsed: MockWrappedKey = serde_json::from_slice(wrapped_key)
            .map_err(|_| KeyServiceError::Rejected("unrecognized ciphertext".to_string()))?;

        if &parsed.encryption_context != encryption_context {
            return Err(KeyServiceError::Rejected(
                "encryption context mismatch".to_string(),
            ));
        }

        Ok(Zeroizing::new(parsed.key))
    }
}

type StoredObject = (Vec<u8>, HashMap<String, String>);

/// In-memory object store implementing the narrow put/get seam. Clones
/// share the same map, so tests can keep a handle for raw inspection after
/// handing one to the encrypting wrapper.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    objects: Arc<Mutex<HashMap<String, StoredObject>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored bytes and metadata, for asserting on what the backing
    /// store actually sees.
    pub fn raw(&self, object_key: &str) -> Option<StoredObject> {
        self.objects.lock().unwrap().get(object_key).cloned()
    }

    /// Overwrites stored bytes in place, for tamper tests.
    pub fn corrupt(&self, object_key: &str, byte_index: usize) {
        let mut objects = self.objects.lock().unwrap();
        let (body, _) = objects.get_mut(object_key).expect("object present");
        body[byte_index] ^= 0x01;
    }
}

impl ObjectStore for InMemoryStore {
    async fn put(
        &self,
        object_key: &str,
        body: Vec<u8>,
        metadata: HashMap<String, String>,
    ) -> StoreResult<()> {
        self.objects
            .lock()
            .unwrap()
            .insert(object_key.to_string(), (body, metadata));
        Ok(())
    }

    async fn get(&self, object_key: &str) -> StoreResult<(Vec<u8>, HashMap<String, String>)> {
        self.objects
            .lock()
            .unwrap()
            .get(object_key)
            .cloned()
            .ok_or_else(|| StoreError::Storage(format!("no such object: {object_key}")))
    }
}

/// Random bytes helper for wrapping keys and bodies.
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    getrandom::getrandom(&mut bytes).unwrap();
    bytes
}
