use crate::models::Credentials;
use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

pub const USERNAME_VAR: &str = "ZILLOW_USERNAME";
pub const PASSWORD_VAR: &str = "ZILLOW_PASSWORD";

/// File the export is written to, relative to the working directory
pub const OUTPUT_PATH: &str = "favorites.csv";

impl Credentials {
    /// Load credentials from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build credentials from any key/value source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let fetch = |key: &str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .with_context(|| format!("{} must be set", key))
        };

        Ok(Self::new(fetch(USERNAME_VAR)?, fetch(PASSWORD_VAR)?))
    }
}
