//! Client-side envelope encryption for S3-like object stores.
//!
//! Each object body is encrypted with a fresh single-use data key; the data
//! key travels wrapped under a master key inside a string-keyed metadata
//! envelope stored alongside the ciphertext. Two wrapping strategies are
//! provided:
//!
//! - [`KmsMaterialsProvider`]: delegates key generation and unwrapping to an
//!   external key-management service, binding the store/object identity into
//!   the call so a wrapped key cannot be unwrapped under a different
//!   identity.
//! - [`WrappedMaterialsProvider`]: wraps data keys with a locally held AES
//!   key using deterministic AES-KW.
//!
//! [`EncryptionEngine`] orchestrates seal/open over either provider, and
//! [`EncryptedObjectStore`] composes the engine with a caller-supplied
//! [`ObjectStore`] adapter. The store transport itself (I/O, retries,
//! listing) is out of scope here; this crate only produces and consumes the
//! `(body, metadata)` pairs handed to `put` and returned by `get`.

pub mod context;
pub mod engine;
pub mod envelope;
pub mod error;
pub mod kms;
pub mod provider;
pub mod store;
pub mod wrapped;

pub use context::EncryptionContext;
pub use engine::EncryptionEngine;
pub use envelope::Envelope;
pub use error::{StoreError, StoreResult};
pub use kms::{
    GeneratedDataKey, KMS_WRAP_ALGORITHM, KeyService, KeyServiceError, KmsMaterialsProvider,
};
pub use provider::{EncryptionMaterials, MaterialsProvider};
pub use store::{EncryptedObjectStore, ObjectStore};
pub use wrapped::WrappedMaterialsProvider;
