use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use std::path::PathBuf;

use crate::auth::credential_file::{CredentialStore, StoredCredential};
use crate::auth::oauth::{ClientSecrets, GMAIL_READONLY_SCOPE, TokenEndpoint, Tokens};
use crate::error::FatalError;

/// Assumed lifetime when the provider omits `expires_in`.
const FALLBACK_LIFETIME_SECS: i64 = 3500;

/// Bearer token for the mail service, valid for this run.
#[derive(Clone)]
pub struct AuthHandle {
    access_token: String,
}

impl AuthHandle {
    pub fn access_token(&self) -> &str {
        &self.access_token
    }
}

impl std::fmt::Debug for AuthHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AuthHandle(***)")
    }
}

/// Owns the persisted credential: reuse, refresh or re-consent, then persist.
pub struct CredentialProvider<S, E> {
    store: S,
    endpoint: E,
    client_secret_path: PathBuf,
}

impl<S: CredentialStore, E: TokenEndpoint> CredentialProvider<S, E> {
    pub fn new(store: S, endpoint: E, client_secret_path: impl Into<PathBuf>) -> Self {
        Self {
            store,
            endpoint,
            client_secret_path: client_secret_path.into(),
        }
    }

    pub fn acquire(&self) -> Result<AuthHandle> {
        self.acquire_at(Utc::now())
    }

    fn acquire_at(&self, now: DateTime<Utc>) -> Result<AuthHandle> {
        let stored = self.store.load()?;

        // 1) cached & not expired
        if let Some(cred) = &stored
            && cred.is_valid_at(now)
        {
            log::debug!("Using cached access token");
            return Ok(AuthHandle {
                access_token: cred.token.clone(),
            });
        }

        // 2) refresh if possible
        if let Some(cred) = stored.filter(|c| c.is_refreshable()) {
            log::info!("Cached token expired; refreshing");
            match self.endpoint.refresh(&cred) {
                Ok(tokens) => return self.persist(apply_tokens(cred, tokens, now)),
                Err(e) => log::warn!("Refresh failed: {e}, falling back to interactive auth"),
            }
        }

        // 3) otherwise consent
        if !self.client_secret_path.exists() {
            return Err(FatalError::MissingClientSecret(self.client_secret_path.clone()).into());
        }
        let secrets = ClientSecrets::from_file(&self.client_secret_path)?;
        log::info!("No usable credential; running interactive consent flow");
        let tokens = self.endpoint.consent(&secrets, GMAIL_READONLY_SCOPE)?;
        self.persist(credential_from_consent(&secrets, tokens, now))
    }

    fn persist(&self, cred: StoredCredential) -> Result<AuthHandle> {
        self.store.save(&cred)?;
        Ok(AuthHandle {
            access_token: cred.token,
        })
    }
}

fn expiry_from(tokens: &Tokens, now: DateTime<Utc>) -> DateTime<Utc> {
    let secs = tokens
        .expires_in
        .map(|s| s as i64)
        .unwrap_or(FALLBACK_LIFETIME_SECS);
    now + Duration::seconds(secs)
}

fn apply_tokens(mut cred: StoredCredential, tokens: Tokens, now: DateTime<Utc>) -> StoredCredential {
    cred.expiry = Some(expiry_from(&tokens, now));
    cred.token = tokens.access_token;
    // Google only sometimes rotates the refresh token
    if let Some(rt) = tokens.refresh_token {
        cred.refresh_token = Some(rt);
    }
    cred
}

fn credential_from_consent(
    secrets: &ClientSecrets,
    tokens: Tokens,
    now: DateTime<Utc>,
) -> StoredCredential {
    StoredCredential {
        expiry: Some(expiry_from(&tokens, now)),
        token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        token_uri: secrets.token_uri.clone(),
        client_id: secrets.client_id.clone(),
        client_secret: secrets.client_secret.clone(),
        scopes: vec![GMAIL_READONLY_SCOPE.to_string()],
    }
}
