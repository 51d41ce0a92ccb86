//! Google service-account authentication
//!
//! Signs an RS256 JWT with the account's private key and exchanges it at the
//! account's token endpoint for a short-lived bearer token.

use std::path::Path;

use base64::prelude::BASE64_URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use ring::signature::RsaKeyPair;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{JobError, JobResult};

/// Scopes needed to create, edit and share spreadsheets
pub const SHEETS_SCOPES: &str =
    "https://www.googleapis.com/auth/spreadsheets https://www.googleapis.com/auth/drive";

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

#[derive(Clone, Deserialize)]
pub struct ServiceAccount {
    pub client_email: String,
    private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    #[serde(default)]
    pub project_id: Option<String>,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl std::fmt::Debug for ServiceAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccount")
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .field("project_id", &self.project_id)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct JwtHeader {
    alg: &'static str,
    typ: &'static str,
}

#[derive(Serialize)]
struct JwtClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    exp: i64,
    iat: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: u64,
}

impl ServiceAccount {
    pub fn from_file(path: impl AsRef<Path>) -> JobResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            JobError::Credentials(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::try_from_str(&content)
    }

    pub fn try_from_str(input: &str) -> JobResult<Self> {
        serde_json::from_str(input).map_err(|e| {
            JobError::Credentials(format!("Failed to parse service account key: {}", e))
        })
    }

    /// Build the signed assertion sent to the token endpoint
    pub fn signed_jwt(&self, scope: &str, now: DateTime<Utc>) -> JobResult<String> {
        let claims = JwtClaims {
            iss: &self.client_email,
            scope,
            aud: &self.token_uri,
            iat: now.timestamp(),
            exp: (now + Duration::hours(1)).timestamp(),
        };
        let header = JwtHeader {
            alg: "RS256",
            typ: "JWT",
        };

        let header_b64 = BASE64_URL_SAFE_NO_PAD.encode(to_json(&header)?);
        let claims_b64 = BASE64_URL_SAFE_NO_PAD.encode(to_json(&claims)?);
        let signing_input = format!("{}.{}", header_b64, claims_b64);

        let key_pair = self.key_pair()?;
        let mut signature = vec![0; key_pair.public().modulus_len()];
        key_pair
            .sign(
                &ring::signature::RSA_PKCS1_SHA256,
                &ring::rand::SystemRandom::new(),
                signing_input.as_bytes(),
                &mut signature,
            )
            .map_err(|_| JobError::Credentials("Failed to sign JWT".to_string()))?;

        Ok(format!(
            "{}.{}",
            signing_input,
            BASE64_URL_SAFE_NO_PAD.encode(&signature)
        ))
    }

    fn key_pair(&self) -> JobResult<RsaKeyPair> {
        let mut reader = std::io::Cursor::new(self.private_key.as_bytes());
        let item = rustls_pemfile::read_one(&mut reader)
            .map_err(|e| JobError::Credentials(format!("Invalid PEM private key: {}", e)))?;

        match item {
            Some(rustls_pemfile::Item::Pkcs8Key(der)) => {
                RsaKeyPair::from_pkcs8(der.secret_pkcs8_der()).map_err(|_| {
                    JobError::Credentials("Failed to load RSA key from PKCS#8".to_string())
                })
            }
            Some(rustls_pemfile::Item::Pkcs1Key(der)) => {
                RsaKeyPair::from_der(der.secret_pkcs1_der()).map_err(|_| {
                    JobError::Credentials("Failed to load RSA key from PKCS#1".to_string())
                })
            }
            _ => Err(JobError::Credentials("Missing private key".to_string())),
        }
    }

    /// Exchange a signed JWT for an access token
    pub async fn fetch_access_token(
        &self,
        http: &reqwest::Client,
        scope: &str,
    ) -> JobResult<AccessToken> {
        let jwt = self.signed_jwt(scope, Utc::now())?;
        let params = [
            ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
            ("assertion", jwt.as_str()),
        ];

        debug!(token_uri = %self.token_uri, account = %self.client_email, "Requesting access token");

        let response = http
            .post(&self.token_uri)
            .form(&params)
            .send()
            .await
            .map_err(|e| JobError::Credentials(format!("Token request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(JobError::Credentials(format!(
                "Token endpoint returned {}: {}",
                status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| JobError::Credentials(format!("Invalid token response: {}", e)))
    }
}

fn to_json<T: Serialize>(value: &T) -> JobResult<String> {
    serde_json::to_string(value)
        .map_err(|e| JobError::Credentials(format!("Failed to encode JWT: {}", e)))
}
