//! Google Sheets append client
//!
//! Records one contact submission as one spreadsheet row. Each append
//! is a single one-shot attempt: sign a service-account assertion,
//! exchange it for an access token, append the row. No retry, no
//! backoff, no idempotency key. A failed append surfaces as one error
//! and the row is simply not written.

use atelier_common::config::SheetsConfig;
use atelier_common::validation::ContactSubmission;
use chrono::{DateTime, SecondsFormat, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const SHEETS_BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const TOKEN_TTL_SECS: i64 = 3600;

/// Sheets client errors
#[derive(Debug, Error)]
pub enum SheetsError {
    #[error("Credential error: {0}")]
    Credentials(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),
}

/// Service-account assertion claims
#[derive(Debug, Serialize)]
struct Claims<'a> {
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

#[derive(Debug, Serialize)]
struct AppendRequest {
    values: Vec<Vec<String>>,
}

/// Authenticated append access to one spreadsheet
pub struct SheetsClient {
    http: reqwest::Client,
    config: SheetsConfig,
}

impl SheetsClient {
    pub fn new(config: SheetsConfig) -> Result<Self, SheetsError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SheetsError::Network(e.to_string()))?;
        Ok(Self { http, config })
    }

    /// The appended row: `[timestamp, email, firstName, lastName, message]`
    pub fn build_row(submission: &ContactSubmission, now: DateTime<Utc>) -> Vec<String> {
        vec![
            now.to_rfc3339_opts(SecondsFormat::Millis, true),
            submission.email.clone(),
            submission.first_name.clone(),
            submission.last_name.clone(),
            submission.message.clone(),
        ]
    }

    /// Target range covering the five row columns
    fn append_range(&self) -> String {
        format!("{}!A:E", self.config.sheet_name)
    }

    fn signed_assertion(&self, now: DateTime<Utc>) -> Result<String, SheetsError> {
        let key = EncodingKey::from_rsa_pem(self.config.private_key.as_bytes())
            .map_err(|e| SheetsError::Credentials(format!("invalid private key: {e}")))?;
        let claims = Claims {
            iss: &self.config.service_account_email,
            scope: SHEETS_SCOPE,
            aud: TOKEN_URL,
            iat: now.timestamp(),
            exp: now.timestamp() + TOKEN_TTL_SECS,
        };
        encode(&Header::new(Algorithm::RS256), &claims, &key)
            .map_err(|e| SheetsError::Credentials(e.to_string()))
    }

    async fn fetch_access_token(&self) -> Result<String, SheetsError> {
        let assertion = self.signed_assertion(Utc::now())?;
        let response = self
            .http
            .post(TOKEN_URL)
            .form(&[
                ("grant_type", JWT_BEARER_GRANT),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await
            .map_err(|e| SheetsError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SheetsError::Api(status.as_u16(), body));
        }
        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| SheetsError::Api(status.as_u16(), e.to_string()))?;
        Ok(token.access_token)
    }

    /// Append one submission as a new row. One attempt only.
    pub async fn append_submission(
        &self,
        submission: &ContactSubmission,
        now: DateTime<Utc>,
    ) -> Result<(), SheetsError> {
        let token = self.fetch_access_token().await?;
        let url = format!(
            "{SHEETS_BASE_URL}/{}/values/{}:append",
            self.config.spreadsheet_id,
            self.append_range()
        );
        let response = self
            .http
            .post(&url)
            .query(&[("valueInputOption", "USER_ENTERED")])
            .bearer_auth(token)
            .json(&AppendRequest {
                values: vec![Self::build_row(submission, now)],
            })
            .send()
            .await
            .map_err(|e| SheetsError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SheetsError::Api(status.as_u16(), body));
        }
        Ok(())
    }
}
