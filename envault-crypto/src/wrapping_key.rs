//! Local AES key wrapping (RFC 3394 AES-KW).
//!
//! Deterministic: wrapping the same data key twice under the same wrapping
//! key yields identical bytes, unlike the randomized remote KMS path. The
//! wrap algorithm embeds its own 8-byte integrity check, distinct from the
//! AEAD tag protecting the object body.

use aes_kw::{KekAes128, KekAes192, KekAes256};
use zeroize::Zeroizing;

use crate::error::{CryptoError, CryptoResult};

/// Wire name recorded in the `wrap-algorithm` metadata field.
pub const AES_WRAP_ALGORITHM: &str = "AESWrap";

/// AES-KW prepends one 8-byte integrity block to the wrapped key.
const AES_KW_OVERHEAD: usize = 8;

/// Key-encryption key dispatch over the three AES widths. The `aes-kw`
/// types are distinct per width, so the enum is built once per operation
/// from the validated key bytes.
enum Kek {
    Aes128(KekAes128),
    Aes192(KekAes192),
    Aes256(KekAes256),
}

impl Kek {
    fn from_key(key: &[u8]) -> CryptoResult<Self> {
        match key.len() {
            16 => {
                let mut k = [0u8; 16];
                k.copy_from_slice(key);
                Ok(Kek::Aes128(KekAes128::from(k)))
            }
            24 => {
                let mut k = [0u8; 24];
                k.copy_from_slice(key);
                Ok(Kek::Aes192(KekAes192::from(k)))
            }
            32 => {
                let mut k = [0u8; 32];
                k.copy_from_slice(key);
                Ok(Kek::Aes256(KekAes256::from(k)))
            }
            n => Err(CryptoError::InvalidKeyLength {
                expected: 32,
                actual: n,
            }),
        }
    }

    fn wrap(&self, data: &[u8], out: &mut [u8]) -> Result<(), aes_kw::Error> {
        match self {
            Kek::Aes128(kek) => kek.wrap(data, out).map(|_| ()),
            Kek::Aes192(kek) => kek.wrap(data, out).map(|_| ()),
            Kek::Aes256(kek) => kek.wrap(data, out).map(|_| ()),
        }
    }

    fn unwrap(&self, data: &[u8], out: &mut [u8]) -> Result<(), aes_kw::Error> {
        match self {
            Kek::Aes128(kek) => kek.unwrap(data, out).map(|_| ()),
            Kek::Aes192(kek) => kek.unwrap(data, out).map(|_| ()),
            Kek::Aes256(kek) => kek.unwrap(data, out).map(|_| ()),
        }
    }
}

/// A locally held AES key used only to wrap/unwrap data keys.
pub struct WrappingKey {
    key: Zeroizing<Vec<u8>>,
}

impl WrappingKey {
    /// Accepts a 16-, 24- or 32-byte AES key.
    pub fn new(key: impl Into<Vec<u8>>) -> CryptoResult<Self> {
        let key = Zeroizing::new(key.into());
        // Validate eagerly so wrap/unwrap cannot hit an unexpected width.
        Kek::from_key(&key)?;
        Ok(Self { key })
    }

    /// Wire name of the wrap mechanism.
    pub fn algorithm_name(&self) -> &'static str {
        AES_WRAP_ALGORITHM
    }

    /// Wraps a data key, producing `data_key.len() + 8` bytes.
    /// Deterministic for a given (wrapping key, data key) pair.
    pub fn wrap(&self, data_key: &[u8]) -> CryptoResult<Vec<u8>> {
        let kek = Kek::from_key(&self.key)?;
        let mut wrapped = vec![0u8; data_key.len() + AES_KW_OVERHEAD];
        kek.wrap(data_key, &mut wrapped)
            .map_err(|e| CryptoError::WrapFailure(format!("{e:?}")))?;
        Ok(wrapped)
    }

    /// Unwraps a wrapped data key, failing closed on the integrity check.
    pub fn unwrap(&self, wrapped: &[u8]) -> CryptoResult<Zeroizing<Vec<u8>>> {
        if wrapped.len() <= AES_KW_OVERHEAD {
            return Err(CryptoError::UnwrapFailure);
        }
        let kek = Kek::from_key(&self.key)?;
        let mut data_key = Zeroizing::new(vec![0u8; wrapped.len() - AES_KW_OVERHEAD]);
        kek.unwrap(wrapped, data_key.as_mut_slice())
            .map_err(|_| CryptoError::UnwrapFailure)?;
        Ok(data_key)
    }
}
