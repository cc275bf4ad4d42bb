//! Service-account authentication for the Sheets API.
//!
//! A signed RS256 assertion is exchanged for a bearer token at the key's
//! `token_uri` (OAuth 2.0 JWT bearer grant).

use std::fmt::{Debug, Formatter};
use std::path::Path;
use std::sync::Arc;

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::info;

use crate::error::AuthError;
use crate::http_client::{HttpClient, HttpRequest};

pub const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

const TOKEN_LIFETIME_SECS: i64 = 3600;

/// Access scope requested for the spreadsheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    ReadWrite,
    ReadOnly,
}

impl Scope {
    pub const fn as_url(self) -> &'static str {
        match self {
            Self::ReadWrite => "https://www.googleapis.com/auth/spreadsheets",
            Self::ReadOnly => "https://www.googleapis.com/auth/spreadsheets.readonly",
        }
    }

    pub const fn allows_writes(self) -> bool {
        matches!(self, Self::ReadWrite)
    }
}

/// The fields of a service-account key file that the token exchange needs.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    String::from(DEFAULT_TOKEN_URI)
}

impl Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key_id", &self.private_key_id)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

impl ServiceAccountKey {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AuthError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| AuthError::CredentialFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(path, &raw)
    }

    /// `path` is only used to label errors.
    pub fn from_json(path: impl AsRef<Path>, raw: &str) -> Result<Self, AuthError> {
        let invalid = |reason: String| AuthError::InvalidCredentials {
            path: path.as_ref().to_path_buf(),
            reason,
        };

        let key: Self = serde_json::from_str(raw).map_err(|e| invalid(e.to_string()))?;
        if key.client_email.trim().is_empty() {
            return Err(invalid(String::from("client_email is empty")));
        }
        if key.private_key.trim().is_empty() {
            return Err(invalid(String::from("private_key is empty")));
        }
        Ok(key)
    }
}

/// Bearer token bound to the scope it was issued for.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    value: String,
    scope: Scope,
}

impl AccessToken {
    pub fn new(value: impl Into<String>, scope: Scope) -> Self {
        Self {
            value: value.into(),
            scope,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub const fn scope(&self) -> Scope {
        self.scope
    }
}

impl Debug for AccessToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"<redacted>")
            .field("scope", &self.scope)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Exchanges service-account credentials for scoped access tokens.
pub struct ServiceAccountAuthenticator {
    key: ServiceAccountKey,
    http_client: Arc<dyn HttpClient>,
}

impl ServiceAccountAuthenticator {
    pub fn new(key: ServiceAccountKey, http_client: Arc<dyn HttpClient>) -> Self {
        Self { key, http_client }
    }

    pub async fn authorize(&self, scope: Scope) -> Result<AccessToken, AuthError> {
        let issued_at = OffsetDateTime::now_utc().unix_timestamp();
        let assertion = self.sign_assertion(scope, issued_at)?;

        let request = HttpRequest::post(&self.key.token_uri)
            .with_form_body(&[("grant_type", JWT_BEARER_GRANT), ("assertion", &assertion)])
            .with_timeout_ms(10_000);

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|e| AuthError::TokenExchange(e.message().to_owned()))?;

        if !response.is_success() {
            return Err(AuthError::TokenExchange(format!(
                "token endpoint returned status {}: {}",
                response.status,
                response.body.trim()
            )));
        }

        let token: TokenResponse = serde_json::from_str(&response.body)
            .map_err(|e| AuthError::TokenExchange(format!("malformed token response: {e}")))?;

        info!(
            client = %self.key.client_email,
            scope = scope.as_url(),
            "authorized service account"
        );
        Ok(AccessToken::new(token.access_token, scope))
    }

    fn sign_assertion(&self, scope: Scope, issued_at: i64) -> Result<String, AuthError> {
        let signing_key = EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())
            .map_err(|e| AuthError::Signing(e.to_string()))?;

        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key.private_key_id.clone();

        let claims = AssertionClaims {
            iss: &self.key.client_email,
            scope: scope.as_url(),
            aud: &self.key.token_uri,
            iat: issued_at,
            exp: issued_at + TOKEN_LIFETIME_SECS,
        };

        encode(&header, &claims, &signing_key).map_err(|e| AuthError::Signing(e.to_string()))
    }
}
