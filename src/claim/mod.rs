pub mod extract;
pub mod pipeline;
pub mod signals;
pub mod value;

pub use extract::{extract_claim_tx, TransactionCandidate};
pub use pipeline::{ClaimPipeline, ClaimRecord, ClaimStatus};
pub use signals::EligibilitySignals;
