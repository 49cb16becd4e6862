//! Stateless HS256 session tokens
//!
//! A token is valid while its signature checks out and the current time lies
//! in `[nbf, exp]`. There is no revocation list.

use chrono::Utc;
use cinegraph_core::{AuthConfig, Claims, Error, Result, UserIdentity};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::time::Duration;
use tracing::debug;

/// Issues and validates session tokens with a process-wide secret
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiration_secs: i64,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("expiration_secs", &self.expiration_secs)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(secret: &str, expiration: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiration_secs: i64::try_from(expiration.as_secs()).unwrap_or(i64::MAX / 2),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.jwt_secret, config.token_expiration())
    }

    /// Token lifetime in seconds
    pub fn expiration_secs(&self) -> i64 {
        self.expiration_secs
    }

    /// Issue a token for `identity`, valid from now for the configured lifetime
    pub fn issue(&self, identity: &UserIdentity) -> Result<String> {
        self.issue_at(identity, Utc::now().timestamp())
    }

    /// Issue a token as if the current time were `now` (seconds since the epoch)
    pub fn issue_at(&self, identity: &UserIdentity, now: i64) -> Result<String> {
        let claims = Claims {
            user_id: identity.user_id.clone(),
            email: identity.email.clone(),
            name: identity.name.clone(),
            sub: identity.user_id.clone(),
            iat: now,
            nbf: now,
            exp: now.saturating_add(self.expiration_secs),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| Error::token(format!("Failed to create session token: {e}")))
    }

    /// Validate a token signed with this service's secret
    pub fn verify(&self, token: &str) -> Option<Claims> {
        decode_with_key(token, &self.decoding_key, Utc::now().timestamp())
    }

    /// Validate a token as if the current time were `now`
    pub fn verify_at(&self, token: &str, now: i64) -> Option<Claims> {
        decode_with_key(token, &self.decoding_key, now)
    }
}

/// Decode and validate a token against `secret`
///
/// Returns `None` for a bad signature, a malformed token, or a token outside
/// its validity window. Callers treat `None` as unauthenticated.
pub fn decode_token(token: &str, secret: &str) -> Option<Claims> {
    decode_token_at(token, secret, Utc::now().timestamp())
}

/// [`decode_token`] as if the current time were `now`
pub fn decode_token_at(token: &str, secret: &str, now: i64) -> Option<Claims> {
    decode_with_key(token, &DecodingKey::from_secret(secret.as_bytes()), now)
}

fn decode_with_key(token: &str, key: &DecodingKey, now: i64) -> Option<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    // Time bounds are checked below against the supplied clock
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.leeway = 0;

    let claims = match jsonwebtoken::decode::<Claims>(token, key, &validation) {
        Ok(data) => data.claims,
        Err(e) => {
            debug!(error = %e, "Rejected session token");
            return None;
        }
    };

    if now < claims.nbf {
        debug!(user_id = %claims.user_id, "Rejected session token: not yet valid");
        return None;
    }
    if now > claims.exp {
        debug!(user_id = %claims.user_id, "Rejected session token: expired");
        return None;
    }

    Some(claims)
}
