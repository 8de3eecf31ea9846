// ============================
// bookstore-lib/src/auth/session.rs
// ============================
//! Session authenticator: credential verification at login, token
//! validation on every protected request.
use std::sync::LazyLock;

use chrono::{DateTime, Utc};

use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::TokenCodec;
use crate::error::AppError;
use crate::models::User;
use crate::store::Store;

/// Hash verified against when a login names an unknown email, so that the
/// unknown-email path costs the same as a wrong password.
static DECOY_HASH: LazyLock<String> =
    LazyLock::new(|| hash_password("decoy-password-never-matched").unwrap_or_default());

/// Successful login result.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub user_id: i64,
}

/// Orchestrates credential verification and token validation over a
/// credential store and the token codec.
#[derive(Clone)]
pub struct Authenticator<S> {
    store: S,
    codec: TokenCodec,
}

impl<S: Store> Authenticator<S> {
    pub fn new(store: S, codec: TokenCodec) -> Self {
        Self { store, codec }
    }

    /// Verify a credential presentation and issue a session token.
    ///
    /// Unknown email and wrong password are indistinguishable to the
    /// caller: both return [`AppError::InvalidCredentials`]. The internal
    /// reason is logged at debug level only.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<LoginOutcome, AppError> {
        let user = match self.store.user_by_email(email).await? {
            Some(user) => user,
            None => {
                let _ = verify_password(&DECOY_HASH, password);
                tracing::debug!(email, "login rejected: no such account");
                return Err(AppError::InvalidCredentials);
            },
        };

        if !verify_password(&user.password_hash, password) {
            tracing::debug!(user_id = user.id, "login rejected: password mismatch");
            return Err(AppError::InvalidCredentials);
        }

        // Issuance is atomic: either a complete token comes back or the
        // login fails as a server fault. Never a 401.
        let token = self.codec.issue(user.id, now).map_err(|err| {
            tracing::error!(user_id = user.id, error = %err, "token issuance failed");
            AppError::TokenIssuance(err.to_string())
        })?;

        tracing::info!(user_id = user.id, "login succeeded");
        Ok(LoginOutcome {
            token,
            user_id: user.id,
        })
    }

    /// Validate a presented token and resolve the principal it names.
    ///
    /// All codec failures collapse to [`AppError::InvalidToken`]; a token
    /// whose account has since been deleted yields
    /// [`AppError::UnauthorizedAccess`].
    pub async fn authenticate(&self, token: &str, now: DateTime<Utc>) -> Result<User, AppError> {
        let user_id = self.codec.verify(token, now).map_err(|reason| {
            tracing::debug!(%reason, "token rejected");
            AppError::InvalidToken
        })?;

        match self.store.user_by_id(user_id).await? {
            Some(user) => Ok(user),
            None => {
                tracing::debug!(user_id, "token resolved to a deleted account");
                Err(AppError::UnauthorizedAccess)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::hash_password;
    use crate::policy::Role;
    use crate::store::MemoryStore;

    const SECRET: &[u8] = b"session-test-secret";

    async fn authenticator_with_user(email: &str, password: &str) -> (Authenticator<MemoryStore>, User) {
        let store = MemoryStore::default();
        let hash = hash_password(password).unwrap();
        let user = store
            .create_user(email, &hash, Role::Customer)
            .await
            .unwrap();
        let auth = Authenticator::new(store, TokenCodec::new(SECRET, 3600));
        (auth, user)
    }

    #[tokio::test]
    async fn test_login_and_authenticate_round_trip() {
        let (auth, user) = authenticator_with_user("a@x.com", "secret1!").await;
        let now = Utc::now();

        let outcome = auth.login("a@x.com", "secret1!", now).await.unwrap();
        assert_eq!(outcome.user_id, user.id);

        let principal = auth.authenticate(&outcome.token, now).await.unwrap();
        assert_eq!(principal.id, user.id);
        assert_eq!(principal.email, "a@x.com");

        // Verifying the same token again resolves the same identity.
        let again = auth.authenticate(&outcome.token, now).await.unwrap();
        assert_eq!(again.id, principal.id);
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email_are_identical() {
        let (auth, _) = authenticator_with_user("a@x.com", "secret1!").await;
        let now = Utc::now();

        let wrong_password = auth.login("a@x.com", "WRONG", now).await.unwrap_err();
        let unknown_email = auth.login("z@x.com", "anything", now).await.unwrap_err();

        assert!(matches!(wrong_password, AppError::InvalidCredentials));
        assert!(matches!(unknown_email, AppError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
        assert_eq!(
            wrong_password.status_code(),
            unknown_email.status_code()
        );
    }

    #[tokio::test]
    async fn test_expired_token_is_rejected_as_invalid() {
        let (auth, _) = authenticator_with_user("a@x.com", "secret1!").await;
        let issued = Utc::now();

        let outcome = auth.login("a@x.com", "secret1!", issued).await.unwrap();
        let later = issued + chrono::Duration::seconds(3600);

        let err = auth.authenticate(&outcome.token, later).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidToken));
    }

    #[tokio::test]
    async fn test_token_for_deleted_account_is_rejected() {
        let (auth, user) = authenticator_with_user("a@x.com", "secret1!").await;
        let now = Utc::now();
        let outcome = auth.login("a@x.com", "secret1!", now).await.unwrap();

        let store = MemoryStore::default();
        // Same codec and secret, but a store that never knew the user.
        let orphaned = Authenticator::new(store, TokenCodec::new(SECRET, 3600));
        let err = orphaned.authenticate(&outcome.token, now).await.unwrap_err();
        assert!(matches!(err, AppError::UnauthorizedAccess));

        // The original store still resolves it.
        let principal = auth.authenticate(&outcome.token, now).await.unwrap();
        assert_eq!(principal.id, user.id);
    }

    #[tokio::test]
    async fn test_forged_token_is_rejected() {
        let (auth, _) = authenticator_with_user("a@x.com", "secret1!").await;
        let now = Utc::now();

        let foreign = TokenCodec::new(b"other-secret", 3600)
            .issue(1, now)
            .unwrap();
        let err = auth.authenticate(&foreign, now).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidToken));

        let err = auth.authenticate("garbage", now).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidToken));
    }
}
