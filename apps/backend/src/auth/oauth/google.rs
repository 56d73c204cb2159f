use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::debug;

use super::{ExternalProfile, IdentityProvider};
use crate::auth::{AuthError, ExternalFlowError};
use crate::config::GoogleOAuthConfig;

const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";
const SCOPES: &str = "openid email profile";
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
}

#[derive(Deserialize)]
struct UserInfo {
    email: Option<String>,
    name: Option<String>,
}

pub struct GoogleProvider {
    http: Client,
    config: GoogleOAuthConfig,
}

impl GoogleProvider {
    pub fn new(config: GoogleOAuthConfig) -> Result<Self, AuthError> {
        let http = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| AuthError::FatalConfiguration(format!("oauth http client: {e}")))?;
        Ok(Self { http, config })
    }
}

/// Build the consent URL. Split out so it can be checked without a client.
fn consent_url(config: &GoogleOAuthConfig, state: &str) -> String {
    let Ok(mut url) = Url::parse(AUTH_URL) else {
        return AUTH_URL.to_string();
    };
    url.query_pairs_mut()
        .append_pair("client_id", &config.client_id)
        .append_pair("redirect_uri", &config.redirect_url)
        .append_pair("response_type", "code")
        .append_pair("scope", SCOPES)
        .append_pair("state", state);
    url.into()
}

fn parse_token_response(body: &str) -> Result<String, ExternalFlowError> {
    let parsed: TokenResponse = serde_json::from_str(body)
        .map_err(|e| ExternalFlowError::ExchangeFailed(format!("token response: {e}")))?;
    match (parsed.access_token, parsed.error) {
        (Some(token), _) if !token.is_empty() => Ok(token),
        (_, Some(error)) => Err(ExternalFlowError::ExchangeFailed(error)),
        _ => Err(ExternalFlowError::ExchangeFailed(
            "token response without access_token".into(),
        )),
    }
}

fn parse_profile(body: String) -> Result<ExternalProfile, ExternalFlowError> {
    let info: UserInfo = serde_json::from_str(&body)
        .map_err(|e| ExternalFlowError::ProfileFetchFailed(format!("userinfo: {e}")))?;
    let email = info
        .email
        .filter(|e| !e.trim().is_empty())
        .ok_or_else(|| ExternalFlowError::ProfileFetchFailed("profile without email".into()))?;
    Ok(ExternalProfile {
        email,
        name: info.name,
        raw: body,
    })
}

#[async_trait]
impl IdentityProvider for GoogleProvider {
    fn authorization_url(&self, state: &str) -> String {
        consent_url(&self.config, state)
    }

    async fn exchange_code(&self, code: &str) -> Result<String, ExternalFlowError> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("redirect_uri", self.config.redirect_url.as_str()),
        ];
        let response = self
            .http
            .post(TOKEN_URL)
            .form(&params)
            .send()
            .await
            .map_err(|e| ExternalFlowError::ExchangeFailed(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ExternalFlowError::ExchangeFailed(e.to_string()))?;
        debug!(status = status.as_u16(), "Token endpoint responded");
        if !status.is_success() {
            return Err(ExternalFlowError::ExchangeFailed(format!(
                "token endpoint returned {status}"
            )));
        }
        parse_token_response(&body)
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<ExternalProfile, ExternalFlowError> {
        let response = self
            .http
            .get(USERINFO_URL)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| ExternalFlowError::ProfileFetchFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExternalFlowError::ProfileFetchFailed(format!(
                "userinfo endpoint returned {status}"
            )));
        }
        let body = response
            .text()
            .await
            .map_err(|e| ExternalFlowError::ProfileFetchFailed(e.to_string()))?;
        parse_profile(body)
    }
}
