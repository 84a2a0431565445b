use anyhow::{Result, anyhow};
use keyring::{Entry, Error as KeyringError};
use std::fmt;

const SERVICE: &str = "daily_briefing";
const API_KEY_USER: &str = "openai_api_key";
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// API key for the completion provider. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Save the API key into the OS keyring
pub fn save_api_key(key: &str) -> Result<()> {
    let entry = Entry::new(SERVICE, API_KEY_USER);
    entry?
        .set_password(key)
        .map_err(|e| anyhow!(e.to_string()))?;
    Ok(())
}

/// Load the API key from the keyring
pub fn load_api_key() -> Result<Option<String>> {
    let entry = Entry::new(SERVICE, API_KEY_USER);
    match entry?.get_password() {
        Ok(v) => Ok(Some(v)),
        Err(KeyringError::NoEntry) => Ok(None),
        Err(e) => Err(anyhow!(e.to_string())),
    }
}

/// Keyring first, then the environment. Blank values count as missing.
pub fn resolve_api_key() -> Result<Option<ApiKey>> {
    let from_keyring = match load_api_key() {
        Ok(v) => v,
        Err(e) => {
            // headless machines often have no secret service
            log::warn!("Keyring unavailable ({e}); falling back to {API_KEY_ENV}");
            None
        }
    };
    let key = from_keyring.or_else(|| std::env::var(API_KEY_ENV).ok());
    Ok(non_blank(key))
}

fn non_blank(key: Option<String>) -> Option<ApiKey> {
    key.map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .map(ApiKey)
}
