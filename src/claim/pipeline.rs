use crate::claim::extract::extract_claim_tx;
use crate::claim::signals::EligibilitySignals;
use crate::config::Config;
use crate::error::{ClaimError, Result};
use crate::portal::{auth, Portal};
use crate::storage;
use crate::wallet::DerivedWallet;
use colored::Colorize;
use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Middleware, Provider};
use ethers::signers::Signer;
use ethers::types::{Address, Bytes, TransactionRequest, U256};
use serde::Serialize;
use serde_json::Value;
use std::io::Write;
use std::time::Duration;
use tracing::{info, warn};

/// Portal-documented claim fee fallback: 0.0005 ETH.
pub const DEFAULT_CLAIM_VALUE_WEI: u64 = 500_000_000_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    DryRun,
    Sent,
    Fail,
}

impl std::fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClaimStatus::DryRun => write!(f, "dry_run"),
            ClaimStatus::Sent => write!(f, "sent"),
            ClaimStatus::Fail => write!(f, "fail"),
        }
    }
}

/// Terminal outcome for one wallet.
#[derive(Debug, Clone, Serialize)]
pub struct ClaimRecord {
    pub index: u32,
    pub address: String,
    pub private_key: String,
    pub status: ClaimStatus,
    pub tx_hash: Option<String>,
    pub to: Option<String>,
    pub value_wei: Option<String>,
    pub note: String,
}

/// Outcome of a login-and-fetch probe in check mode.
#[derive(Debug, Clone, Serialize)]
pub struct CheckRecord {
    pub index: u32,
    pub address: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A claim ready for submission, with the value override chain applied.
#[derive(Debug, Clone)]
struct PreparedClaim {
    to: String,
    data: String,
    value: U256,
    source_path: String,
}

/// Sequential per-wallet orchestrator: authenticate, fetch, extract, then
/// dry-run or submit. Every step's error is caught at this boundary and
/// becomes a `fail` record for that wallet only.
pub struct ClaimPipeline<P> {
    portal: P,
    config: Config,
}

impl<P: Portal> ClaimPipeline<P> {
    pub fn new(portal: P, config: Config) -> Self {
        Self { portal, config }
    }

    pub async fn run(&self, wallets: &[DerivedWallet]) -> Vec<ClaimRecord> {
        let dry_run = self.config.claim.dry_run;
        let mut records = Vec::with_capacity(wallets.len());

        for (position, wallet) in wallets.iter().enumerate() {
            let address = wallet.address_string();
            print!("[{}/{}] {} ... ", position + 1, wallets.len(), address);
            let _ = std::io::stdout().flush();

            let record = match self.prepare_claim(wallet).await {
                Ok(prepared) if dry_run => {
                    println!("{} to={}", "DRY_RUN".yellow(), prepared.to);
                    self.record(wallet, ClaimStatus::DryRun, None, &prepared)
                }
                Ok(prepared) => match self.submit(wallet, &prepared).await {
                    Ok(tx_hash) => {
                        println!("{} {}", "SENT".green(), tx_hash);
                        self.record(wallet, ClaimStatus::Sent, Some(tx_hash), &prepared)
                    }
                    Err(e) => self.fail(wallet, e),
                },
                Err(e) => self.fail(wallet, e),
            };
            records.push(record);

            if self.config.claim.sleep_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.config.claim.sleep_ms)).await;
            }
        }

        records
    }

    /// Login-and-fetch probe for every wallet, no extraction or submission.
    pub async fn check(&self, wallets: &[DerivedWallet]) -> Vec<CheckRecord> {
        let mut records = Vec::with_capacity(wallets.len());

        for (position, wallet) in wallets.iter().enumerate() {
            let address = wallet.address_string();
            print!("[{}/{}] {} ... ", position + 1, wallets.len(), address);
            let _ = std::io::stdout().flush();

            let record = match self.fetch_record(wallet).await {
                Ok(record) => {
                    println!("{}", "OK".green());
                    CheckRecord {
                        index: wallet.index,
                        address,
                        ok: true,
                        data: Some(record),
                        error: None,
                    }
                }
                Err(e) => {
                    println!("{}", "FAIL".red());
                    warn!("Check failed for {}: {}", address, e);
                    CheckRecord {
                        index: wallet.index,
                        address,
                        ok: false,
                        data: None,
                        error: Some(e.to_string()),
                    }
                }
            };
            records.push(record);

            if self.config.check.sleep_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.config.check.sleep_ms)).await;
            }
        }

        records
    }

    async fn fetch_record(&self, wallet: &DerivedWallet) -> Result<Value> {
        let credential = auth::authenticate(
            &self.portal,
            wallet,
            &self.config.auth,
            &self.config.portal.platform,
        )
        .await?;
        self.portal.fetch_accounts(&credential.access_token).await
    }

    async fn prepare_claim(&self, wallet: &DerivedWallet) -> Result<PreparedClaim> {
        let record = self.fetch_record(wallet).await?;

        let candidate = match extract_claim_tx(&record) {
            Some(candidate) => candidate,
            None => {
                // dump the raw record so the operator can inspect the shape
                let address = wallet.address_string();
                let signals = EligibilitySignals::from_record(&record);
                let dump = storage::dump_record(
                    &self.config.claim.debug_dir,
                    &address,
                    "accounts",
                    &record,
                )?;
                return Err(ClaimError::NoClaimTransaction(format!(
                    "no claim tx payload in /submission/accounts. {}. Saved: {}",
                    signals.describe(),
                    dump.display()
                )));
            }
        };

        // operator override, then the candidate's own value, then the
        // portal-documented default
        let value = self
            .config
            .value_override()
            .unwrap_or_else(|| {
                if candidate.value.is_zero() {
                    U256::from(DEFAULT_CLAIM_VALUE_WEI)
                } else {
                    candidate.value
                }
            });

        info!(
            "Prepared claim for {}: to={} value={} path={}",
            wallet.address_string(),
            candidate.to,
            value,
            candidate.source_path
        );

        Ok(PreparedClaim {
            to: candidate.to,
            data: candidate.data,
            value,
            source_path: candidate.source_path,
        })
    }

    async fn submit(&self, wallet: &DerivedWallet, prepared: &PreparedClaim) -> Result<String> {
        let provider = Provider::<Http>::try_from(self.config.rpc.url.as_str())
            .map_err(|e| ClaimError::Submission(format!("invalid RPC endpoint: {}", e)))?;
        let signer = wallet
            .signer()
            .clone()
            .with_chain_id(self.config.auth.chain_id);
        let client = SignerMiddleware::new(provider, signer);

        let to: Address = prepared
            .to
            .parse()
            .map_err(|e| ClaimError::Submission(format!("invalid destination {}: {}", prepared.to, e)))?;
        let data = hex::decode(prepared.data.trim_start_matches("0x"))
            .map_err(|e| ClaimError::Submission(format!("invalid calldata: {}", e)))?;

        let tx = TransactionRequest::new()
            .to(to)
            .data(Bytes::from(data))
            .value(prepared.value);

        let pending = client
            .send_transaction(tx, None)
            .await
            .map_err(|e| ClaimError::Submission(e.to_string()))?;

        Ok(format!("{:?}", pending.tx_hash()))
    }

    fn record(
        &self,
        wallet: &DerivedWallet,
        status: ClaimStatus,
        tx_hash: Option<String>,
        prepared: &PreparedClaim,
    ) -> ClaimRecord {
        ClaimRecord {
            index: wallet.index,
            address: wallet.address_string(),
            private_key: wallet.private_key_hex(),
            status,
            tx_hash,
            to: Some(prepared.to.clone()),
            value_wei: Some(prepared.value.to_string()),
            note: format!("payload={}", prepared.source_path),
        }
    }

    fn fail(&self, wallet: &DerivedWallet, error: ClaimError) -> ClaimRecord {
        println!("{}", "FAIL".red());
        warn!("Claim failed for {}: {}", wallet.address_string(), error);
        ClaimRecord {
            index: wallet.index,
            address: wallet.address_string(),
            private_key: wallet.private_key_hex(),
            status: ClaimStatus::Fail,
            tx_hash: None,
            to: None,
            value_wei: None,
            note: error.to_string(),
        }
    }
}

/// Print the end-of-run summary block.
pub fn print_summary(records: &[ClaimRecord], output_file: &str) {
    let sent = records.iter().filter(|r| r.status == ClaimStatus::Sent).count();
    let dry_run = records
        .iter()
        .filter(|r| r.status == ClaimStatus::DryRun)
        .count();
    let fail = records.iter().filter(|r| r.status == ClaimStatus::Fail).count();

    println!("\n{}", "=== SUMMARY ===".cyan().bold());
    println!("checked: {}", records.len());
    println!("sent: {}", sent.to_string().green());
    println!("dry_run: {}", dry_run.to_string().yellow());
    println!("fail: {}", fail.to_string().red());
    println!("saved: {}", output_file);
}
