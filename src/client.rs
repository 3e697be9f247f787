/// Authenticated HTTP client with refresh-then-retry.
///
/// A caller-owned session object around `reqwest`: it holds the
/// current token pair explicitly and, when a protected call comes back
/// 401, rotates the pair through POST /auth/refresh and retries the
/// call exactly once. No ambient global session state.
use serde::Deserialize;

use crate::auth::TokenPair;

#[derive(Debug)]
pub enum ClientError {
    /// Transport-level failure
    Http(reqwest::Error),
    /// The server refused the credentials, including after a refresh
    Unauthorized,
    /// Any other non-success response
    Unexpected(u16),
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Http(e) => write!(f, "HTTP error: {}", e),
            ClientError::Unauthorized => write!(f, "Unauthorized"),
            ClientError::Unexpected(status) => write!(f, "Unexpected status: {}", status),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Http(err)
    }
}

/// Profile payload returned by GET /auth/profile
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    pub id: String,
    pub email: String,
}

#[derive(Deserialize)]
struct LoginResponse {
    access_token: String,
    refresh_token: String,
}

pub struct AuthClient {
    http: reqwest::Client,
    base_url: String,
    tokens: TokenPair,
}

impl AuthClient {
    /// Build a session from an already-issued token pair.
    pub fn from_tokens(base_url: impl Into<String>, tokens: TokenPair) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            tokens,
        }
    }

    /// Log in and build a session from the returned pair.
    pub async fn login(
        base_url: impl Into<String>,
        email: &str,
        password: &str,
    ) -> Result<Self, ClientError> {
        let base_url = base_url.into();
        let http = reqwest::Client::new();

        let response = http
            .post(format!("{}/auth/login", base_url))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ClientError::Unauthorized);
        }
        if !response.status().is_success() {
            return Err(ClientError::Unexpected(response.status().as_u16()));
        }

        let body: LoginResponse = response.json().await?;
        Ok(Self {
            http,
            base_url,
            tokens: TokenPair {
                access_token: body.access_token,
                refresh_token: body.refresh_token,
            },
        })
    }

    /// The pair this session currently holds.
    pub fn tokens(&self) -> &TokenPair {
        &self.tokens
    }

    /// Fetch the authenticated profile.
    ///
    /// On a 401 the session rotates its pair and retries once; a 401
    /// on the retry is final.
    pub async fn get_profile(&mut self) -> Result<Profile, ClientError> {
        let response = self.profile_request().await?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            self.refresh().await?;
            let retry = self.profile_request().await?;
            return Self::parse_profile(retry).await;
        }

        Self::parse_profile(response).await
    }

    /// Rotate the held pair through the refresh endpoint.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        let response = self
            .http
            .post(format!("{}/auth/refresh", self.base_url))
            .json(&serde_json::json!({ "refresh_token": self.tokens.refresh_token }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ClientError::Unauthorized);
        }

        let body: LoginResponse = response.json().await?;
        self.tokens = TokenPair {
            access_token: body.access_token,
            refresh_token: body.refresh_token,
        };
        Ok(())
    }

    async fn profile_request(&self) -> Result<reqwest::Response, ClientError> {
        let response = self
            .http
            .get(format!("{}/auth/profile", self.base_url))
            .header(
                "Authorization",
                format!("Bearer {}", self.tokens.access_token),
            )
            .send()
            .await?;
        Ok(response)
    }

    async fn parse_profile(response: reqwest::Response) -> Result<Profile, ClientError> {
        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ClientError::Unauthorized);
        }
        if !response.status().is_success() {
            return Err(ClientError::Unexpected(response.status().as_u16()));
        }
        Ok(response.json().await?)
    }
}
