use std::sync::Arc;

use cinegraph_core::{AuthConfig, AuthPayload, Claims, Error, Result, UserIdentity};
use cinegraph_storage::{StorageError, UserStore};
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument, warn};

use super::password::{hash_password_blocking, verify_password_blocking};
use super::token::TokenService;

/// Outcome of a credential check
///
/// `Rejected` covers both an unknown email and a wrong password, so callers
/// cannot tell which one failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    Authenticated(AuthPayload),
    Rejected,
}

impl AuthOutcome {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    pub fn into_payload(self) -> Option<AuthPayload> {
        match self {
            Self::Authenticated(payload) => Some(payload),
            Self::Rejected => None,
        }
    }
}

/// Plaintext behind the hash checked when no account matches an email
const DUMMY_PASSWORD: &str = "cinegraph-unknown-account";

/// Registration and login against the credential store
pub struct AuthService {
    store: Arc<dyn UserStore>,
    tokens: TokenService,
    password_hash_cost: u32,
    /// Hash at the configured cost, verified against for unknown emails
    dummy_hash: OnceCell<String>,
}

impl AuthService {
    pub fn new(store: Arc<dyn UserStore>, config: &AuthConfig) -> Self {
        Self {
            store,
            tokens: TokenService::from_config(config),
            password_hash_cost: config.password_hash_cost,
            dummy_hash: OnceCell::new(),
        }
    }

    /// The token service this instance signs with
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Create a user and sign them in
    ///
    /// Fails with [`Error::Validation`] on the `email` field if the address is
    /// already registered.
    #[instrument(skip(self, plain_password, name))]
    pub async fn register(&self, email: &str, plain_password: &str, name: &str) -> Result<AuthPayload> {
        let hash = hash_password_blocking(plain_password.to_string(), self.password_hash_cost).await?;

        let user = match self.store.create_user(email, &hash, name).await {
            Ok(user) => user,
            Err(StorageError::DuplicateIdentifier { field, .. }) => {
                warn!(field = %field, "Registration rejected: identifier already in use");
                return Err(Error::validation(
                    field,
                    format!("An account already exists with the email address {email}"),
                ));
            }
            Err(e) => return Err(e.into()),
        };

        info!(user_id = %user.user_id, "Registered user");
        self.sign_in(user.identity())
    }

    /// Check credentials and issue a session token on success
    ///
    /// An unknown email still pays for one bcrypt verification, so response
    /// time does not reveal whether the account exists.
    #[instrument(skip(self, plain_password))]
    pub async fn authenticate(&self, email: &str, plain_password: &str) -> Result<AuthOutcome> {
        let Some(user) = self.store.find_user_by_email(email).await? else {
            let dummy = self.unknown_account_hash().await?;
            verify_password_blocking(plain_password.to_string(), dummy.to_string()).await?;
            debug!("Authentication rejected");
            return Ok(AuthOutcome::Rejected);
        };

        let matches =
            verify_password_blocking(plain_password.to_string(), user.password_hash.clone()).await?;
        if !matches {
            debug!("Authentication rejected");
            return Ok(AuthOutcome::Rejected);
        }

        debug!(user_id = %user.user_id, "Authenticated user");
        self.sign_in(user.identity()).map(AuthOutcome::Authenticated)
    }

    /// Validate a session token signed with the configured secret
    pub fn decode_token(&self, token: &str) -> Option<Claims> {
        self.tokens.verify(token)
    }

    async fn unknown_account_hash(&self) -> Result<&str> {
        let cost = self.password_hash_cost;
        self.dummy_hash
            .get_or_try_init(|| hash_password_blocking(DUMMY_PASSWORD.to_string(), cost))
            .await
            .map(String::as_str)
    }

    fn sign_in(&self, identity: UserIdentity) -> Result<AuthPayload> {
        let token = self.tokens.issue(&identity)?;
        Ok(AuthPayload::new(identity, token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinegraph_storage::MockNeo4jClient;

    fn config() -> AuthConfig {
        AuthConfig {
            password_hash_cost: 4,
            ..AuthConfig::new("unit-test-secret")
        }
    }

    #[tokio::test]
    async fn test_register_stores_hash_not_plaintext() {
        let store = Arc::new(MockNeo4jClient::new());
        let service = AuthService::new(store.clone(), &config());

        service
            .register("hash@example.com", "letmein", "Hash")
            .await
            .unwrap();

        let user = store
            .find_user_by_email("hash@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_ne!(user.password_hash, "letmein");
        assert!(user.password_hash.starts_with("$2"));
    }

    #[tokio::test]
    async fn test_unknown_email_verifies_against_dummy_hash() {
        let service = AuthService::new(Arc::new(MockNeo4jClient::new()), &config());
        assert!(service.dummy_hash.get().is_none());

        let outcome = service
            .authenticate("nobody@example.com", DUMMY_PASSWORD)
            .await
            .unwrap();
        assert_eq!(outcome, AuthOutcome::Rejected);

        let dummy = service.dummy_hash.get().unwrap();
        assert!(dummy.starts_with("$2b$04$"), "hashed at the configured cost: {dummy}");

        // The same hash is reused for later misses
        service.authenticate("ghost@example.com", "pw").await.unwrap();
        assert_eq!(service.dummy_hash.get(), Some(dummy));
    }

    #[tokio::test]
    async fn test_register_rejects_overlong_password() {
        let store = Arc::new(MockNeo4jClient::new());
        let service = AuthService::new(store.clone(), &config());

        let result = service
            .register("long@example.com", &"p".repeat(100), "Long")
            .await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));
        assert_eq!(store.user_count(), 0);
    }

    #[tokio::test]
    async fn test_outcome_helpers() {
        let service = AuthService::new(Arc::new(MockNeo4jClient::new()), &config());
        let outcome = service.authenticate("nobody@example.com", "pw").await.unwrap();
        assert!(!outcome.is_authenticated());
        assert_eq!(outcome.into_payload(), None);
    }
}
