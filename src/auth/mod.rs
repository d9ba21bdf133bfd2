pub mod password;

use crate::error::{AppError, AppResult};
use crate::store::admin::AdminStore;

/// Stand-in secret hashed once at startup. Unknown usernames are checked
/// against its digest so every attempt costs one bcrypt verify.
const DUMMY_PASSWORD: &str = "osma-no-such-administrator";

/// Checks administrator credentials against the admin store.
pub struct Authenticator {
    admins: AdminStore,
    dummy_digest: String,
}

impl Authenticator {
    /// `cost` should match the cost used for stored admin digests.
    pub fn new(admins: AdminStore, cost: u32) -> Result<Self, bcrypt::BcryptError> {
        Ok(Self {
            admins,
            dummy_digest: password::hash_password(DUMMY_PASSWORD, cost)?,
        })
    }

    /// Unknown users and wrong passwords are both reported as
    /// [`AppError::AuthFailure`] after the same amount of hashing work.
    /// Blocks for the duration of a bcrypt verify.
    pub fn authenticate(&self, username: &str, password: &str) -> AppResult<()> {
        self.authenticate_with(username, password, password::verify_password)
    }

    fn authenticate_with(
        &self,
        username: &str,
        password: &str,
        verify: impl Fn(&str, &str) -> bool,
    ) -> AppResult<()> {
        let admin = self.admins.find(username)?;
        let digest = admin
            .as_ref()
            .map_or(self.dummy_digest.as_str(), |a| a.password_hash.as_str());
        let verified = verify(digest, password);

        match admin {
            Some(admin) if verified => {
                tracing::info!(username = %admin.username, "Administrator authenticated");
                Ok(())
            }
            _ => Err(AppError::AuthFailure),
        }
    }
}
