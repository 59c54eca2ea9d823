//! Pluggable encrypt/decrypt capability applied to whole-buffer content.

use crate::error::Result;

/// Symmetric transform over raw buffer bytes.
///
/// Implementations are chosen when an [`EditSession`](crate::EditSession) is
/// built; the core never loads one dynamically.
pub trait Cipher: Send + Sync {
    /// Human-readable name of this cipher.
    fn name(&self) -> &str;

    /// Transform plain bytes into their encrypted form.
    fn encrypt(&self, data: &[u8]) -> Result<Vec<u8>>;

    /// Inverse of [`encrypt`](Self::encrypt).
    fn decrypt(&self, data: &[u8]) -> Result<Vec<u8>>;
}

/// Cipher that returns its input unchanged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassThrough;

impl Cipher for PassThrough {
    fn name(&self) -> &str {
        "pass-through"
    }

    fn encrypt(&self, data: &[u8]) -> Result<Vec<u8>> {
        Ok(data.to_vec())
    }

    fn decrypt(&self, data: &[u8]) -> Result<Vec<u8>> {
        Ok(data.to_vec())
    }
}
