//! Username/password verification against the user store.

use crate::auth::password::{hash_password, verify_password};
use crate::db::UserStore;
use crate::types::{AuthError, Identity, Result};
use std::sync::{Arc, OnceLock};
use tracing::{debug, error};

/// Resolves raw credentials to a verified [`Identity`].
///
/// "No such user" and "wrong password" both surface as
/// [`AuthError::BadCredentials`]. A missing user is still run through a
/// hash verification so the two paths take comparable time.
pub struct CredentialVerifier {
    users: Arc<dyn UserStore>,
}

impl CredentialVerifier {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Identity> {
        let Some(user) = self.users.find_by_username(username).await? else {
            debug!("Login attempt for unknown principal");
            burn_verification(password);
            return Err(AuthError::BadCredentials.into());
        };

        let matches = match verify_password(password, &user.password_hash) {
            Ok(matches) => matches,
            Err(e) => {
                error!(principal = %user.username, "Stored password hash is unusable: {}", e);
                false
            }
        };

        if !matches {
            return Err(AuthError::BadCredentials.into());
        }

        Ok(Identity::new(user.username, user.roles, user.id))
    }
}

fn burn_verification(password: &str) {
    static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();

    let dummy = DUMMY_HASH.get_or_init(|| hash_password("warden-dummy-password").ok());
    if let Some(hash) = dummy {
        let _ = verify_password(password, hash);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::traits::{MockUserStore, User};
    use crate::types::AppError;

    fn stored_alice() -> User {
        User {
            id: 1,
            username: "alice".to_string(),
            password_hash: hash_password("correctpw").unwrap(),
            roles: vec!["USER".to_string()],
        }
    }

    fn verifier_with(user: Option<User>) -> CredentialVerifier {
        let mut store = MockUserStore::new();
        store
            .expect_find_by_username()
            .times(1)
            .returning(move |_| Ok(user.clone()));
        CredentialVerifier::new(Arc::new(store))
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let verifier = verifier_with(Some(stored_alice()));

        let identity = verifier
            .authenticate("alice", "correctpw")
            .await
            .expect("should authenticate");

        assert_eq!(identity.principal, "alice");
        assert_eq!(identity.roles, vec!["USER".to_string()]);
        assert_eq!(identity.user_id, 1);
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_user_are_indistinguishable() {
        let wrong_password = verifier_with(Some(stored_alice()))
            .authenticate("alice", "wrongpw")
            .await
            .unwrap_err();
        let unknown_user = verifier_with(None)
            .authenticate("ghost", "correctpw")
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, AppError::Auth(AuthError::BadCredentials)));
        assert!(matches!(unknown_user, AppError::Auth(AuthError::BadCredentials)));
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    }

    #[tokio::test]
    async fn test_corrupt_stored_hash_is_bad_credentials() {
        let mut user = stored_alice();
        user.password_hash = "plaintext".to_string();

        let err = verifier_with(Some(user))
            .authenticate("alice", "plaintext")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Auth(AuthError::BadCredentials)));
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let mut store = MockUserStore::new();
        store
            .expect_find_by_username()
            .returning(|_| Err(AppError::Database("connection lost".to_string())));
        let verifier = CredentialVerifier::new(Arc::new(store));

        let err = verifier.authenticate("alice", "correctpw").await.unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
    }
}
