use crate::error::StreamlineError;
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use std::sync::LazyLock;

/// Hash verified when the email is unknown, so a miss costs the same as a wrong password.
static DUMMY_HASH: LazyLock<Option<String>> = LazyLock::new(|| {
    PasswordHasher::new()
        .hash_password("streamline-timing-equalizer")
        .ok()
});

/// Argon2id with a random per-password salt.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher {
    /// m=19 MiB, t=2, p=1
    pub fn new() -> Self {
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::default()),
        }
    }

    /// Returns a PHC string, e.g. `$argon2id$v=19$m=19456,t=2,p=1$...`.
    pub fn hash_password(&self, password: &str) -> Result<String, StreamlineError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| StreamlineError::PasswordHash(format!("hashing failed: {e}")))?;
        Ok(hash.to_string())
    }

    /// `Ok(false)` on mismatch; `Err` only when the stored hash is malformed.
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, StreamlineError> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| StreamlineError::PasswordHash(format!("invalid stored hash: {e}")))?;
        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(StreamlineError::PasswordHash(format!(
                "verification failed: {e}"
            ))),
        }
    }

    /// Burn one verification against a fixed hash. Always reports a mismatch.
    pub fn verify_dummy(&self, password: &str) -> bool {
        if let Some(hash) = DUMMY_HASH.as_deref() {
            let _ = self.verify_password(password, hash);
        }
        false
    }
}

/// Hashing is CPU bound; keep it off the async workers.
pub async fn hash_blocking(
    hasher: PasswordHasher,
    password: String,
) -> Result<String, StreamlineError> {
    tokio::task::spawn_blocking(move || hasher.hash_password(&password))
        .await
        .map_err(|e| StreamlineError::UnexpectedError(format!("hash task failed: {e}")))?
}

/// `stored_hash == None` runs the dummy verification.
pub async fn verify_blocking(
    hasher: PasswordHasher,
    password: String,
    stored_hash: Option<String>,
) -> Result<bool, StreamlineError> {
    tokio::task::spawn_blocking(move || match stored_hash {
        Some(hash) => hasher.verify_password(&password, &hash),
        None => Ok(hasher.verify_dummy(&password)),
    })
    .await
    .map_err(|e| StreamlineError::UnexpectedError(format!("verify task failed: {e}")))?
}
