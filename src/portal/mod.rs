pub mod auth;
pub mod client;

use crate::error::Result;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

/// Sign-in payload submitted after the challenge is signed.
#[derive(Debug, Clone, Serialize)]
pub struct SignInRequest {
    pub wallet: String,
    pub platform: String,
    pub message: String,
    pub signature: String,
}

/// Bearer token scoped to one wallet's portal session.
#[derive(Debug, Clone)]
pub struct Credential {
    pub access_token: String,
}

/// Portal HTTP surface. The pipeline only talks to this trait so tests can
/// substitute a stub portal.
#[async_trait]
pub trait Portal: Send + Sync {
    /// `GET /auth/nonce?wallet=<address>` challenge payload.
    async fn fetch_nonce(&self, address: &str) -> Result<Value>;

    /// `POST /auth/signin` with the signed message.
    async fn sign_in(&self, request: &SignInRequest) -> Result<Value>;

    /// `GET /submission/accounts` eligibility record (opaque shape).
    async fn fetch_accounts(&self, access_token: &str) -> Result<Value>;
}

pub use client::PortalClient;
