use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;
use rand::TryRngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};

/// Minimum number of random bytes behind every session or reset token.
pub const MIN_BYTES_PER_TOKEN: usize = 32;

/// Issues opaque tokens and hashes them for storage.
#[derive(Debug, Clone, Copy)]
pub struct TokenManager {
    bytes_per_token: usize,
}

impl TokenManager {
    /// Values below [`MIN_BYTES_PER_TOKEN`] are raised to it.
    pub fn new(bytes_per_token: usize) -> Self {
        Self {
            bytes_per_token: bytes_per_token.max(MIN_BYTES_PER_TOKEN),
        }
    }

    pub fn bytes_per_token(&self) -> usize {
        self.bytes_per_token
    }

    /// Generate a URL-safe base64 token from fresh OS randomness.
    pub fn generate(&self) -> Result<String, String> {
        let mut bytes = vec![0u8; self.bytes_per_token];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| format!("Token generation failed: {e}"))?;
        Ok(URL_SAFE.encode(&bytes))
    }

    /// SHA-256 of the token, URL-safe base64 encoded. Used as the lookup key.
    pub fn hash(&self, token: &str) -> String {
        URL_SAFE.encode(Sha256::digest(token.as_bytes()))
    }
}

impl Default for TokenManager {
    fn default() -> Self {
        Self::new(MIN_BYTES_PER_TOKEN)
    }
}
