//! Process settings read from the environment (a `.env` file is honoured by the binary).

use crate::error::ConfigError;
use std::str::FromStr;

const DEFAULT_BIND: &str = "0.0.0.0:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_BODY_LIMIT: usize = 64 * 1024;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    Memory,
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub environment: Environment,
    pub database_url: String,
    pub bind: String,
    pub max_connections: u32,
    /// Request body limit in bytes.
    pub body_limit: usize,
    pub store: StoreKind,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            environment: Environment::Development,
            database_url: default_database_url(Environment::Development).into(),
            bind: DEFAULT_BIND.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            body_limit: DEFAULT_BODY_LIMIT,
            store: StoreKind::Postgres,
        }
    }
}

fn default_database_url(env: Environment) -> &'static str {
    match env {
        Environment::Development => "postgres://localhost/books",
        Environment::Test => "postgres://localhost/books_test",
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env` but reads through `lookup`, so callers can supply a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("BOOKSTORE_ENV").as_deref() {
            None | Some("development") => Environment::Development,
            Some("test") => Environment::Test,
            Some(other) => return Err(invalid("BOOKSTORE_ENV", other)),
        };
        let store = match lookup("BOOKSTORE_STORE").as_deref() {
            None | Some("postgres") => StoreKind::Postgres,
            Some("memory") => StoreKind::Memory,
            Some(other) => return Err(invalid("BOOKSTORE_STORE", other)),
        };
        Ok(Self {
            environment,
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| default_database_url(environment).into()),
            bind: lookup("BOOKSTORE_BIND").unwrap_or_else(|| DEFAULT_BIND.into()),
            max_connections: parse_or(&lookup, "BOOKSTORE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?,
            body_limit: parse_or(&lookup, "BOOKSTORE_BODY_LIMIT", DEFAULT_BODY_LIMIT)?,
            store,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| invalid(key, &raw)),
    }
}

fn invalid(key: &'static str, value: &str) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
    }
}
