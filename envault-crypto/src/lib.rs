//! Cryptographic primitives for envault.
//!
//! Implements the two-tier key scheme behind client-side envelope
//! encryption:
//!
//! 1. **Data key**: a random AES-GCM key plus IV, generated per object
//!    write and used exactly once to encrypt the object body.
//! 2. **Master key**: a long-lived key (remote key-management service or a
//!    local AES wrapping key) used only to wrap/unwrap data keys. It never
//!    touches body plaintext.
//!
//! This crate holds the leaf pieces: the algorithm parameter table, the
//! single-use [`DataKey`], and the deterministic [`WrappingKey`] used by the
//! local-wrapping provider. The envelope format and the provider strategies
//! live in `envault-store`.
//!
//! Raw key bytes are held in [`zeroize::Zeroizing`] buffers and cleared when
//! dropped.

mod algorithm;
mod data_key;
mod error;
mod wrapping_key;

pub use algorithm::DataKeyAlgorithm;
pub use data_key::DataKey;
pub use error::{CryptoError, CryptoResult};
pub use wrapping_key::{AES_WRAP_ALGORITHM, WrappingKey};
