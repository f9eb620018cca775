use crate::error::{ClaimError, Result};
use crate::portal::{Portal, SignInRequest};
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

/// Reqwest-backed client for the Magna claims portal.
#[derive(Debug, Clone)]
pub struct PortalClient {
    http: reqwest::Client,
    base_url: String,
}

impl PortalClient {
    pub fn new(base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// Turn a non-success response into an error carrying the body verbatim.
    async fn into_json(context: &'static str, response: reqwest::Response) -> Result<Value> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClaimError::Portal {
                context,
                status,
                body,
            });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl Portal for PortalClient {
    async fn fetch_nonce(&self, address: &str) -> Result<Value> {
        let url = format!("{}/auth/nonce?wallet={}", self.base_url, address);
        debug!("Fetching auth nonce for {}", address);
        let response = self.http.get(&url).send().await?;
        Self::into_json("nonce", response).await
    }

    async fn sign_in(&self, request: &SignInRequest) -> Result<Value> {
        let url = format!("{}/auth/signin", self.base_url);
        debug!("Signing in {}", request.wallet);
        let response = self.http.post(&url).json(request).send().await?;
        Self::into_json("signin", response).await
    }

    async fn fetch_accounts(&self, access_token: &str) -> Result<Value> {
        let url = format!("{}/submission/accounts", self.base_url);
        debug!("Fetching submission accounts");
        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await?;
        Self::into_json("accounts", response).await
    }
}
