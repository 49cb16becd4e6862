//! Credential checks and session tokens

mod password;
mod service;
mod token;

pub use password::{
    hash_password, hash_password_blocking, verify_password, verify_password_blocking,
    MAX_PASSWORD_BYTES,
};
pub use service::{AuthOutcome, AuthService};
pub use token::{decode_token, decode_token_at, TokenService};
