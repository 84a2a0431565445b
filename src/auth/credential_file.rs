use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Seconds before expiry at which a token is already treated as stale.
const EXPIRY_SKEW_SECS: i64 = 60;

/// Cached OAuth credential in the google-auth "authorized user" layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredCredential {
    #[serde(alias = "access_token")]
    pub token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    pub client_id: String,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub expiry: Option<DateTime<Utc>>,
}

pub(crate) fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

impl StoredCredential {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expiry {
            Some(exp) => now + Duration::seconds(EXPIRY_SKEW_SECS) >= exp,
            None => false,
        }
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.token.is_empty() && !self.is_expired_at(now)
    }

    pub fn is_refreshable(&self) -> bool {
        self.refresh_token
            .as_deref()
            .is_some_and(|t| !t.is_empty())
    }
}

pub trait CredentialStore {
    fn load(&self) -> Result<Option<StoredCredential>>;
    fn save(&self, credential: &StoredCredential) -> Result<()>;
}

/// Credential persisted as pretty JSON at a fixed path.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<StoredCredential>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let s = fs::read_to_string(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))?;
        match serde_json::from_str(&s) {
            Ok(cred) => Ok(Some(cred)),
            Err(e) => {
                log::warn!(
                    "Ignoring unreadable credential file {}: {e}",
                    self.path.display()
                );
                Ok(None)
            }
        }
    }

    fn save(&self, credential: &StoredCredential) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let s = serde_json::to_string_pretty(credential)?;
        fs::write(&self.path, s)
            .with_context(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credential(expiry: Option<DateTime<Utc>>) -> StoredCredential {
        StoredCredential {
            token: "ya29.access".into(),
            refresh_token: Some("1//refresh".into()),
            token_uri: default_token_uri(),
            client_id: "client.apps.googleusercontent.com".into(),
            client_secret: Some("shh".into()),
            scopes: vec!["https://www.googleapis.com/auth/gmail.readonly".into()],
            expiry,
        }
    }

    #[test]
    fn expiry_rules() {
        let now = Utc::now();
        assert!(credential(None).is_valid_at(now));
        assert!(credential(Some(now + Duration::hours(1))).is_valid_at(now));
        assert!(credential(Some(now - Duration::minutes(5))).is_expired_at(now));
        // inside the skew window counts as expired
        assert!(credential(Some(now + Duration::seconds(30))).is_expired_at(now));
    }

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileCredentialStore::new(dir.path().join("token.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileCredentialStore::new(dir.path().join("nested").join("token.json"));
        let cred = credential(Some(Utc::now() + Duration::hours(1)));

        store.save(&cred).unwrap();
        assert_eq!(store.load().unwrap(), Some(cred));
    }

    #[test]
    fn reads_python_written_token_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("token.json");
        fs::write(
            &path,
            r#"{"token": "ya29.a0", "refresh_token": "1//0g", "token_uri": "https://oauth2.googleapis.com/token",
                "client_id": "123.apps.googleusercontent.com", "client_secret": "GOCSPX",
                "scopes": ["https://www.googleapis.com/auth/gmail.readonly"],
                "universe_domain": "googleapis.com", "account": "",
                "expiry": "2025-03-01T10:00:00.123456Z"}"#,
        )
        .unwrap();

        let cred = FileCredentialStore::new(&path).load().unwrap().unwrap();
        assert_eq!(cred.token, "ya29.a0");
        assert!(cred.is_refreshable());
        assert!(cred.is_expired_at(Utc::now()));
    }

    #[test]
    fn garbage_file_is_treated_as_absent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("token.json");
        fs::write(&path, "not json").unwrap();
        assert!(FileCredentialStore::new(&path).load().unwrap().is_none());
    }
}
