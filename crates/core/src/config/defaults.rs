//! Default values and functions for configuration

// Default constants
pub(crate) const DEFAULT_STORAGE_PROVIDER: &str = "neo4j";
pub(crate) const DEFAULT_NEO4J_HOST: &str = "localhost";
pub(crate) const DEFAULT_NEO4J_USER: &str = "neo4j";
pub(crate) const DEFAULT_NEO4J_PASSWORD: &str = "cinegraph";

/// bcrypt accepts work factors in this range
pub const MIN_PASSWORD_HASH_COST: u32 = 4;
pub const MAX_PASSWORD_HASH_COST: u32 = 31;

pub(crate) fn default_storage_provider() -> String {
    DEFAULT_STORAGE_PROVIDER.to_string()
}

pub(crate) fn default_neo4j_host() -> String {
    DEFAULT_NEO4J_HOST.to_string()
}

pub(crate) fn default_neo4j_bolt_port() -> u16 {
    7687
}

pub(crate) fn default_neo4j_user() -> String {
    DEFAULT_NEO4J_USER.to_string()
}

pub(crate) fn default_neo4j_password() -> String {
    DEFAULT_NEO4J_PASSWORD.to_string()
}

pub(crate) fn default_token_expiration_secs() -> u64 {
    86_400
}

pub(crate) fn default_password_hash_cost() -> u32 {
    10
}
