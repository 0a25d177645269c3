use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info};

use crate::sheets::SheetsError;

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const DEFAULT_TOKEN_FILE: &str = "token.json";

/// Authorized-user credentials as saved by the Google client libraries.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthorizedUser {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default)]
    pub token_uri: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// Where a bearer token can come from.
#[derive(Debug, Clone)]
pub struct TokenSource {
    pub access_token: Option<String>,
    pub token_file: PathBuf,
}

impl TokenSource {
    pub fn from_env() -> Self {
        Self {
            access_token: std::env::var("GOOGLE_ACCESS_TOKEN")
                .ok()
                .filter(|token| !token.trim().is_empty()),
            token_file: std::env::var("GOOGLE_TOKEN_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_TOKEN_FILE)),
        }
    }

    /// Resolves a bearer token, refreshing saved credentials when possible.
    pub async fn acquire(&self) -> Result<String, SheetsError> {
        if let Some(token) = &self.access_token {
            debug!("using access token from environment");
            return Ok(token.clone());
        }

        let user = load_authorized_user(&self.token_file)?;
        if user.refresh_token.is_some() {
            return refresh(&user).await;
        }

        user.token.ok_or_else(|| {
            SheetsError::Auth(format!(
                "{} has neither a token nor a refresh_token",
                self.token_file.display()
            ))
        })
    }
}

pub fn load_authorized_user(path: &Path) -> Result<AuthorizedUser, SheetsError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|err| SheetsError::Auth(format!("cannot read {}: {err}", path.display())))?;
    serde_json::from_str(&raw)
        .map_err(|err| SheetsError::Auth(format!("cannot parse {}: {err}", path.display())))
}

/// Exchanges the saved refresh token for a fresh access token.
pub async fn refresh(user: &AuthorizedUser) -> Result<String, SheetsError> {
    let refresh_token = user
        .refresh_token
        .as_deref()
        .ok_or_else(|| SheetsError::Auth("missing refresh_token".into()))?;
    let client_id = user
        .client_id
        .as_deref()
        .ok_or_else(|| SheetsError::Auth("missing client_id".into()))?;
    let client_secret = user
        .client_secret
        .as_deref()
        .ok_or_else(|| SheetsError::Auth("missing client_secret".into()))?;
    let token_uri = user.token_uri.as_deref().unwrap_or(DEFAULT_TOKEN_URI);

    info!("refreshing google access token");
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()?;
    let response = client
        .post(token_uri)
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", client_id),
            ("client_secret", client_secret),
        ])
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(SheetsError::Auth(format!("token refresh returned {status}: {body}")));
    }

    let token: RefreshResponse = response.json().await?;
    debug!(expires_in = ?token.expires_in, "access token refreshed");
    Ok(token.access_token)
}
