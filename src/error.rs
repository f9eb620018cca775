use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClaimError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Portal {context} failed: {status} {body}")]
    Portal {
        context: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("No claim transaction found: {0}")]
    NoClaimTransaction(String),

    #[error("Transaction submission failed: {0}")]
    Submission(String),

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Wallet error: {0}")]
    Wallet(#[from] ethers::signers::WalletError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ClaimError>;
