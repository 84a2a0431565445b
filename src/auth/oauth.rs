use anyhow::{Context, Result, anyhow};
use oauth2::TokenResponse;
use oauth2::basic::BasicClient;
use oauth2::reqwest::http_client;
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, PkceCodeChallenge,
    RedirectUrl, RefreshToken, Scope, TokenUrl,
};
use serde::Deserialize;
use std::fs;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;
use std::time::{Duration, Instant};
use tiny_http::{Response, Server};
use url::Url;

use crate::auth::credential_file::StoredCredential;

pub const GMAIL_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/gmail.readonly";

const CONSENT_TIMEOUT: Duration = Duration::from_secs(120);

/// Tokens returned by the oauth flow (in-memory)
#[derive(Debug, Clone)]
pub struct Tokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<u64>,
}

/// OAuth client registration as downloaded from the Google console.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSecrets {
    pub client_id: String,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "crate::auth::credential_file::default_token_uri")]
    pub token_uri: String,
}

fn default_auth_uri() -> String {
    "https://accounts.google.com/o/oauth2/auth".to_string()
}

#[derive(Deserialize)]
struct ClientSecretsFile {
    installed: Option<ClientSecrets>,
    web: Option<ClientSecrets>,
}

impl ClientSecrets {
    pub fn parse(json: &str) -> Result<Self> {
        let file: ClientSecretsFile = serde_json::from_str(json)?;
        file.installed
            .or(file.web)
            .ok_or_else(|| anyhow!("client secret file has neither an 'installed' nor a 'web' entry"))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let s = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::parse(&s).with_context(|| format!("parsing {}", path.display()))
    }

    fn client(&self) -> Result<BasicClient> {
        Ok(BasicClient::new(
            ClientId::new(self.client_id.clone()),
            self.client_secret.clone().map(ClientSecret::new),
            AuthUrl::new(self.auth_uri.clone())?,
            Some(TokenUrl::new(self.token_uri.clone())?),
        ))
    }
}

/// Token-issuing side of the credential provider.
pub trait TokenEndpoint {
    /// Exchange the credential's refresh token for a fresh access token.
    fn refresh(&self, credential: &StoredCredential) -> Result<Tokens>;
    /// Run the interactive consent flow for a new credential.
    fn consent(&self, secrets: &ClientSecrets, scope: &str) -> Result<Tokens>;
}

/// Google's OAuth endpoints driven through the `oauth2` crate.
pub struct GoogleOAuth {
    pub redirect_port: u16,
    pub open_browser: bool,
}

impl GoogleOAuth {
    pub fn new(redirect_port: u16, open_browser: bool) -> Self {
        Self {
            redirect_port,
            open_browser,
        }
    }
}

impl TokenEndpoint for GoogleOAuth {
    fn refresh(&self, credential: &StoredCredential) -> Result<Tokens> {
        let refresh_token = credential
            .refresh_token
            .as_deref()
            .ok_or_else(|| anyhow!("credential has no refresh token"))?;
        let secrets = ClientSecrets {
            client_id: credential.client_id.clone(),
            client_secret: credential.client_secret.clone(),
            auth_uri: default_auth_uri(),
            token_uri: credential.token_uri.clone(),
        };
        refresh_access_token(&secrets, refresh_token)
    }

    fn consent(&self, secrets: &ClientSecrets, scope: &str) -> Result<Tokens> {
        perform_pkce_flow(secrets, self.redirect_port, scope, self.open_browser)
    }
}

/// Exchange a refresh token for a new access token using the oauth2 crate
pub fn refresh_access_token(secrets: &ClientSecrets, refresh_token: &str) -> Result<Tokens> {
    let oauth_client = secrets.client()?;

    let rt = RefreshToken::new(refresh_token.to_string());
    let token = oauth_client
        .exchange_refresh_token(&rt)
        .request(http_client)?;

    Ok(Tokens {
        access_token: token.access_token().secret().to_string(),
        refresh_token: token.refresh_token().map(|r| r.secret().to_string()),
        expires_in: token.expires_in().map(|d| d.as_secs()),
    })
}

/// Perform Authorization Code + PKCE flow. Opens system browser and captures
/// the code via a loopback server bound before the browser is launched.
pub fn perform_pkce_flow(
    secrets: &ClientSecrets,
    port: u16,
    scope: &str,
    open_browser: bool,
) -> Result<Tokens> {
    let bind_addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), port);
    let server = Server::http(bind_addr)
        .map_err(|e| anyhow!("Failed to bind OAuth callback server on {bind_addr}: {e:?}"))?;
    let port = server.server_addr().port();
    let redirect_uri = format!("http://127.0.0.1:{port}/");

    let oauth_client = secrets
        .client()?
        .set_redirect_uri(RedirectUrl::new(redirect_uri.clone())?);

    let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

    let (auth_url, csrf_token) = oauth_client
        .authorize_url(CsrfToken::new_random)
        .add_scope(Scope::new(scope.to_string()))
        .add_extra_param("access_type", "offline")
        .set_pkce_challenge(pkce_challenge)
        .url();

    println!("Open this URL in your browser:\n{auth_url}");
    if open_browser && let Err(e) = open::that(auth_url.as_str()) {
        log::warn!("could not open browser automatically: {e}");
    }

    let code = wait_for_code(&server, &redirect_uri, csrf_token.secret())?;

    let token = match oauth_client
        .exchange_code(AuthorizationCode::new(code))
        .set_pkce_verifier(pkce_verifier)
        .request(http_client)
    {
        Ok(tok) => tok,
        Err(err) => {
            log::debug!("Token exchange failed: {err:#?}");
            return Err(anyhow!("Token exchange failed: {err}"));
        }
    };

    Ok(Tokens {
        access_token: token.access_token().secret().to_string(),
        refresh_token: token.refresh_token().map(|r| r.secret().to_string()),
        expires_in: token.expires_in().map(|d| d.as_secs()),
    })
}

fn wait_for_code(server: &Server, redirect_uri: &str, expected_state: &str) -> Result<String> {
    let base = Url::parse(redirect_uri)?;
    let wait_until = Instant::now() + CONSENT_TIMEOUT;

    while Instant::now() < wait_until {
        let Ok(maybe_request) = server.recv_timeout(Duration::from_millis(500)) else {
            continue;
        };
        let Some(request) = maybe_request else {
            continue;
        };

        // request.url() is a path+query like "/?code=...&state=..."
        let Ok(parsed) = base.join(request.url()) else {
            let _ = request.respond(Response::from_string("Bad redirect"));
            continue;
        };

        match extract_code(&parsed, expected_state) {
            CallbackResult::Code(code) => {
                let _ = request.respond(Response::from_string(
                    "Authorization received. You can close this tab.",
                ));
                return Ok(code);
            }
            CallbackResult::Denied(reason) => {
                let _ = request.respond(Response::from_string(
                    "Authorization was not granted. You can close this tab.",
                ));
                return Err(anyhow!("Authorization denied: {reason}"));
            }
            CallbackResult::Ignored => {
                let _ = request.respond(Response::from_string(
                    "No code found in redirect. You can close this tab.",
                ));
            }
        }
    }

    Err(anyhow!("No code received within timeout"))
}

#[derive(Debug, PartialEq)]
enum CallbackResult {
    Code(String),
    Denied(String),
    Ignored,
}

fn extract_code(url: &Url, expected_state: &str) -> CallbackResult {
    let mut code = None;
    let mut state = None;
    for (k, v) in url.query_pairs() {
        match k.as_ref() {
            "code" => code = Some(v.into_owned()),
            "state" => state = Some(v.into_owned()),
            "error" => return CallbackResult::Denied(v.into_owned()),
            _ => {}
        }
    }
    match (code, state) {
        (Some(code), Some(state)) if state == expected_state => CallbackResult::Code(code),
        (Some(_), _) => CallbackResult::Denied("state mismatch".to_string()),
        _ => CallbackResult::Ignored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_installed_client_file() {
        let json = r#"{"installed": {
            "client_id": "123.apps.googleusercontent.com",
            "project_id": "teacher-briefing",
            "auth_uri": "https://accounts.google.com/o/oauth2/auth",
            "token_uri": "https://oauth2.googleapis.com/token",
            "client_secret": "GOCSPX-abc",
            "redirect_uris": ["http://localhost"]
        }}"#;
        let secrets = ClientSecrets::parse(json).unwrap();
        assert_eq!(secrets.client_id, "123.apps.googleusercontent.com");
        assert_eq!(secrets.client_secret.as_deref(), Some("GOCSPX-abc"));
    }

    #[test]
    fn parses_web_client_file_with_defaults() {
        let json = r#"{"web": {"client_id": "web-client"}}"#;
        let secrets = ClientSecrets::parse(json).unwrap();
        assert_eq!(secrets.client_id, "web-client");
        assert_eq!(secrets.token_uri, "https://oauth2.googleapis.com/token");
    }

    #[test]
    fn rejects_unknown_client_file_shape() {
        assert!(ClientSecrets::parse(r#"{"service_account": {}}"#).is_err());
    }

    #[test]
    fn callback_code_requires_matching_state() {
        let ok = Url::parse("http://127.0.0.1:9/?state=abc&code=4%2F0Ab").unwrap();
        assert_eq!(extract_code(&ok, "abc"), CallbackResult::Code("4/0Ab".into()));

        let forged = Url::parse("http://127.0.0.1:9/?state=zzz&code=x").unwrap();
        assert!(matches!(extract_code(&forged, "abc"), CallbackResult::Denied(_)));

        let denied = Url::parse("http://127.0.0.1:9/?error=access_denied").unwrap();
        assert_eq!(
            extract_code(&denied, "abc"),
            CallbackResult::Denied("access_denied".into())
        );

        let favicon = Url::parse("http://127.0.0.1:9/favicon.ico").unwrap();
        assert_eq!(extract_code(&favicon, "abc"), CallbackResult::Ignored);
    }
}
