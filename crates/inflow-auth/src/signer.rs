//! HS256 signing key derived from a shared base64 secret.

use base64::{engine::general_purpose::URL_SAFE, Engine as _};
use jsonwebtoken::{DecodingKey, EncodingKey};

use crate::error::Result;

/// Signing key for service tokens.
///
/// Services exchange a single shared secret, distributed as a base64
/// string (URL-safe alphabet, padded). Both the encoding and decoding
/// keys are derived from it at construction time.
#[derive(Clone)]
pub struct Signer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl Signer {
    /// Create a signer from a base64-encoded secret.
    pub fn new(secret_b64: &str) -> Result<Self> {
        let secret = URL_SAFE.decode(secret_b64)?;
        Ok(Self {
            encoding_key: EncodingKey::from_secret(&secret),
            decoding_key: DecodingKey::from_secret(&secret),
        })
    }

    pub(crate) fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    pub(crate) fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }
}

impl std::fmt::Debug for Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signer")
            .field("encoding_key", &"[REDACTED]")
            .field("decoding_key", &"[REDACTED]")
            .finish()
    }
}
