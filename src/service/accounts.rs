use crate::db::{Database, DbUser};
use crate::error::StreamlineError;
use crate::service::password::{PasswordHasher, hash_blocking, verify_blocking};
use crate::types::auth::Credentials;
use tracing::{debug, info};

/// Registration and credential checks over the user store.
#[derive(Clone, Default)]
pub struct AccountService {
    hasher: PasswordHasher,
    min_password_length: usize,
}

impl AccountService {
    pub fn new(min_password_length: usize) -> Self {
        Self {
            hasher: PasswordHasher::new(),
            min_password_length,
        }
    }

    /// Create a user. The existence check is a fast path; the UNIQUE
    /// constraint decides races between concurrent registrations.
    pub async fn register(
        &self,
        db: &Database,
        creds: Credentials,
    ) -> Result<i64, StreamlineError> {
        if creds.password.chars().count() < self.min_password_length {
            return Err(StreamlineError::validation(format!(
                "Password must be at least {} characters",
                self.min_password_length
            )));
        }

        let storage = db.storage().await?;
        if storage.find_by_email(&creds.email).await?.is_some() {
            debug!(email = %creds.email, "registration rejected: email taken");
            return Err(StreamlineError::UserExists);
        }

        let hash = hash_blocking(self.hasher.clone(), creds.password).await?;
        let id = storage.insert(&creds.email, &hash).await?;
        info!(user_id = id, email = %creds.email, "user registered");
        Ok(id)
    }

    /// Verify credentials. Unknown email and wrong password are the same error.
    pub async fn authenticate(
        &self,
        db: &Database,
        creds: Credentials,
    ) -> Result<DbUser, StreamlineError> {
        let storage = db.storage().await?;
        let user = storage.find_by_email(&creds.email).await?;
        let stored_hash = user.as_ref().map(|u| u.password_hash.clone());

        let matched = verify_blocking(self.hasher.clone(), creds.password, stored_hash).await?;
        match user {
            Some(user) if matched => {
                info!(user_id = user.id, "sign-in succeeded");
                Ok(user)
            }
            _ => {
                debug!(email = %creds.email, "sign-in rejected");
                Err(StreamlineError::InvalidCredentials)
            }
        }
    }
}
