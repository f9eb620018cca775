pub mod analysis;
pub mod claim;
pub mod config;
pub mod error;
pub mod portal;
pub mod storage;
pub mod utils;
pub mod wallet;

pub use config::Config;
pub use error::{ClaimError, Result};
