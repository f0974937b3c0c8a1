use std::net::SocketAddr;

use anyhow::Context;
use sha2::{Digest, Sha256};

use crate::models::Caller;

pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub admin_key: Option<AdminKey>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Config> {
        Config::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests don't touch the process env.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("BIND_ADDR is not a valid socket address")?;

        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw
                .parse::<u32>()
                .context("DATABASE_MAX_CONNECTIONS must be a positive integer")?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Config {
            bind_addr,
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            max_connections,
            admin_key: lookup("ADMIN_KEY")
                .filter(|key| !key.is_empty())
                .map(|key| AdminKey::new(&key)),
        })
    }
}

/// SHA-256 digest of the configured admin key. The plain key is not kept.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminKey(String);

impl AdminKey {
    pub fn new(key: &str) -> Self {
        AdminKey(digest(key))
    }

    pub fn matches(&self, candidate: &str) -> bool {
        self.0 == digest(candidate)
    }
}

impl std::fmt::Debug for AdminKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AdminKey(..)")
    }
}

fn digest(value: &str) -> String {
    let mut hasher: Sha256 = Digest::new();
    hasher.update(value.as_bytes());
    hex::encode(hasher.finalize())
}

/// Resolves request privilege from the admin key header.
pub fn resolve_caller(admin_key: Option<&AdminKey>, presented: Option<&str>) -> Caller {
    match (admin_key, presented) {
        (Some(key), Some(candidate)) if key.matches(candidate) => Caller::Admin,
        _ => Caller::Student,
    }
}
