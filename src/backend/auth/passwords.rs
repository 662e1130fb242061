/**
 * Password Hashing
 *
 * bcrypt wrapper used by registration, login and password reset.
 *
 * - Every digest embeds its own random salt, so two hashes of the same
 *   password differ.
 * - `verify` never fails: a malformed digest simply does not match.
 * - Input past bcrypt's 72-byte limit is rejected rather than silently
 *   truncated, so two long passwords sharing a prefix never collide.
 * - bcrypt is CPU-bound; the `*_blocking` variants move the work onto
 *   tokio's blocking pool so request workers keep serving other requests.
 */

use std::sync::OnceLock;

use thiserror::Error;

/// Errors raised while producing a digest
#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("bcrypt failure: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
    #[error("hashing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// One-way salted password hashing
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a plaintext password
    pub fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        Ok(bcrypt::non_truncating_hash(plaintext, self.cost)?)
    }

    /// Check a plaintext password against a stored digest
    ///
    /// Returns `false` for any parse or comparison failure, including a
    /// plaintext longer than 72 bytes.
    pub fn verify(&self, plaintext: &str, digest: &str) -> bool {
        bcrypt::non_truncating_verify(plaintext, digest).unwrap_or(false)
    }

    /// `hash` on the blocking pool
    pub async fn hash_blocking(&self, plaintext: &str) -> Result<String, PasswordError> {
        let hasher = *self;
        let plaintext = plaintext.to_owned();
        tokio::task::spawn_blocking(move || hasher.hash(&plaintext)).await?
    }

    /// `verify` on the blocking pool
    pub async fn verify_blocking(&self, plaintext: &str, digest: &str) -> bool {
        let hasher = *self;
        let plaintext = plaintext.to_owned();
        let digest = digest.to_owned();
        tokio::task::spawn_blocking(move || hasher.verify(&plaintext, &digest))
            .await
            .unwrap_or_else(|e| {
                tracing::error!("Password verification task failed: {:?}", e);
                false
            })
    }

    /// Spend one verification's worth of work without a real digest.
    ///
    /// Used when the account does not exist, so that an unknown email and a
    /// wrong password take comparable time.
    pub async fn verify_dummy(&self, plaintext: &str) {
        let digest = self.dummy_digest().await;
        let _ = self.verify_blocking(plaintext, &digest).await;
    }

    async fn dummy_digest(&self) -> String {
        static DUMMY: OnceLock<(u32, String)> = OnceLock::new();

        if let Some((cost, digest)) = DUMMY.get() {
            if *cost == self.cost {
                return digest.clone();
            }
        }

        // Recomputed when the cached digest was made at another cost
        let digest = self
            .hash_blocking("reelbase-timing-equalizer")
            .await
            .unwrap_or_default();
        let _ = DUMMY.set((self.cost, digest.clone()));
        digest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // bcrypt's minimum cost keeps the tests fast
    fn hasher() -> PasswordHasher {
        PasswordHasher::new(4)
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = hasher();
        let digest = hasher.hash("password123").unwrap();
        assert!(hasher.verify("password123", &digest));
        assert!(!hasher.verify("password124", &digest));
    }

    #[test]
    fn test_hash_is_salted() {
        let hasher = hasher();
        let first = hasher.hash("password123").unwrap();
        let second = hasher.hash("password123").unwrap();
        assert_ne!(first, second);
        assert!(hasher.verify("password123", &first));
        assert!(hasher.verify("password123", &second));
    }

    #[test]
    fn test_digest_does_not_contain_plaintext() {
        let digest = hasher().hash("password123").unwrap();
        assert!(!digest.contains("password123"));
        assert!(digest.starts_with("$2"));
    }

    #[test]
    fn test_verify_malformed_digest_is_false() {
        let hasher = hasher();
        assert!(!hasher.verify("password123", ""));
        assert!(!hasher.verify("password123", "not-a-bcrypt-digest"));
        assert!(!hasher.verify("password123", "$2b$04$truncated"));
    }

    #[test]
    fn test_long_passwords_are_not_truncated() {
        let hasher = hasher();
        assert!(hasher.hash(&"a".repeat(100)).is_err());

        let digest = hasher.hash(&"a".repeat(72)).unwrap();
        assert!(hasher.verify(&"a".repeat(72), &digest));
        let extended = format!("{}{}", "a".repeat(72), "b".repeat(28));
        assert!(!hasher.verify(&extended, &digest));
    }

    #[tokio::test]
    async fn test_blocking_variants() {
        let hasher = hasher();
        let digest = hasher.hash_blocking("password123").await.unwrap();
        assert!(hasher.verify_blocking("password123", &digest).await);
        assert!(!hasher.verify_blocking("wrong-password", &digest).await);
    }

    #[tokio::test]
    async fn test_verify_dummy_completes() {
        hasher().verify_dummy("whatever").await;
    }
}
