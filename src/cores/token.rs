use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::configs::settings::Credentials;
use crate::cores::errors::InviteError;

// Opaque bearer token, fetched fresh for every inbound request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Serialize)]
struct TokenRequest<'a> {
    grant_type: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

pub struct TokenProvider {
    client: Client,
    token_url: String,
    credentials: Credentials,
}

impl TokenProvider {
    pub fn new(client: Client, token_url: String, credentials: Credentials) -> Self {
        TokenProvider { client, token_url, credentials }
    }

    // OAuth2 client-credentials exchange; no retry, any failure aborts the request
    pub async fn get_access_token(&self) -> Result<AccessToken, InviteError> {
        // 1. Build the url-encoded form body
        let form = serde_urlencoded::to_string(TokenRequest { grant_type: "client_credentials" })
            .map_err(|err| InviteError::Auth(format!("Failed to encode token request: {}", err)))?;

        // 2. POST with Basic auth built from the API key and secret
        debug!("Requesting access token from {}", self.token_url);
        let response = self.client.post(&self.token_url)
            .basic_auth(&self.credentials.api_key, Some(&self.credentials.api_secret))
            .header(reqwest::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(form)
            .send()
            .await
            .map_err(|err| InviteError::Auth(format!("Token request failed: {}", err)))?;

        // 3. Any non-success status is fatal
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InviteError::Auth(format!("Token endpoint responded with {}: {}", status.as_u16(), body)));
        }

        // 4. Extract the token
        let token: TokenResponse = response.json().await
            .map_err(|err| InviteError::Auth(format!("Failed to parse token response: {}", err)))?;
        match token.access_token {
            Some(token) if !token.is_empty() => Ok(AccessToken(token)),
            _ => Err(InviteError::Auth("Token response did not contain an access_token".to_string())),
        }
    }
}
