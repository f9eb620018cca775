use crate::claim::extract::WITHDRAW_SELECTOR;
use crate::claim::pipeline::DEFAULT_CLAIM_VALUE_WEI;
use crate::error::{ClaimError, Result};
use crate::utils::format_eth;
use ethers::providers::{Http, Middleware, Provider};
use ethers::types::{Address, Log, Transaction, TransactionReceipt, H256, U256};
use serde::Serialize;

const WITHDRAW_SIGNATURE: &str = "withdraw(uint256,uint32,bytes,bytes32[])";
const ESP_TOKEN: &str = "0x031de51f3e8016514bd0963d0b2ab825a591db9a";
const TRANSFER_TOPIC: &str =
    "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef";

/// ERC-20 Transfer decoded from a receipt log.
#[derive(Debug, Clone, Serialize)]
pub struct TokenTransfer {
    pub token: String,
    pub from: String,
    pub to: String,
    pub value_raw: String,
    pub value_esp: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisChecks {
    pub chain_is_ethereum_mainnet: bool,
    pub method_is_withdraw: bool,
    pub claim_fee_matches: bool,
    pub has_esp_transfer: bool,
}

impl AnalysisChecks {
    pub fn score(&self) -> usize {
        [
            self.chain_is_ethereum_mainnet,
            self.method_is_withdraw,
            self.claim_fee_matches,
            self.has_esp_transfer,
        ]
        .iter()
        .filter(|&&passed| passed)
        .count()
    }
}

/// Report on whether a mined transaction looks like an Espresso claim.
#[derive(Debug, Clone, Serialize)]
pub struct TxAnalysis {
    pub tx_hash: String,
    pub from: String,
    pub to: Option<String>,
    pub chain_id: Option<u64>,
    pub value_eth: String,
    pub gas_used: Option<u64>,
    pub selector: Option<String>,
    pub method: String,
    pub checks: AnalysisChecks,
    pub likely_espresso_claim: bool,
    pub esp_transfers: Vec<TokenTransfer>,
}

/// Fetch a transaction and its receipt and score them against the known
/// claim fingerprint.
pub async fn analyze_transaction(rpc_url: &str, tx_hash: &str) -> Result<TxAnalysis> {
    let provider = Provider::<Http>::try_from(rpc_url)
        .map_err(|e| ClaimError::Config(format!("invalid RPC endpoint: {}", e)))?;
    let hash: H256 = tx_hash
        .parse()
        .map_err(|e| ClaimError::Config(format!("invalid tx hash {}: {}", tx_hash, e)))?;

    let tx = provider
        .get_transaction(hash)
        .await
        .map_err(|e| ClaimError::Other(anyhow::anyhow!("eth_getTransactionByHash failed: {}", e)))?
        .ok_or_else(|| ClaimError::Other(anyhow::anyhow!("tx not found: {}", tx_hash)))?;
    let receipt = provider
        .get_transaction_receipt(hash)
        .await
        .map_err(|e| ClaimError::Other(anyhow::anyhow!("eth_getTransactionReceipt failed: {}", e)))?
        .ok_or_else(|| ClaimError::Other(anyhow::anyhow!("receipt not found: {}", tx_hash)))?;

    Ok(analyze(&tx, &receipt))
}

/// Pure scoring over an already-fetched transaction and receipt.
pub fn analyze(tx: &Transaction, receipt: &TransactionReceipt) -> TxAnalysis {
    let selector = input_selector(&tx.input);
    let method = match selector.as_deref() {
        Some(s) if s.eq_ignore_ascii_case(WITHDRAW_SELECTOR) => WITHDRAW_SIGNATURE.to_string(),
        Some(_) => "unknown".to_string(),
        None => "unknown".to_string(),
    };

    let esp_transfers: Vec<TokenTransfer> = receipt
        .logs
        .iter()
        .filter(|log| is_esp_transfer(log))
        .map(|log| {
            let value = U256::from_big_endian(&log.data);
            TokenTransfer {
                token: format!("{:?}", log.address),
                from: format!("{:?}", topic_to_address(&log.topics[1])),
                to: format!("{:?}", topic_to_address(&log.topics[2])),
                value_raw: value.to_string(),
                value_esp: format_eth(value),
            }
        })
        .collect();

    let checks = AnalysisChecks {
        chain_is_ethereum_mainnet: tx.chain_id == Some(U256::one()),
        method_is_withdraw: selector
            .as_deref()
            .map(|s| s.eq_ignore_ascii_case(WITHDRAW_SELECTOR))
            .unwrap_or(false),
        // exact wei comparison, never a float epsilon
        claim_fee_matches: tx.value == U256::from(DEFAULT_CLAIM_VALUE_WEI),
        has_esp_transfer: !esp_transfers.is_empty(),
    };
    let likely_espresso_claim = checks.score() >= 3;

    TxAnalysis {
        tx_hash: format!("{:?}", tx.hash),
        from: format!("{:?}", tx.from),
        to: tx.to.map(|to| format!("{:?}", to)),
        chain_id: tx.chain_id.map(|id| id.as_u64()),
        value_eth: format_eth(tx.value),
        gas_used: receipt.gas_used.map(|gas| gas.as_u64()),
        selector,
        method,
        checks,
        likely_espresso_claim,
        esp_transfers,
    }
}

fn input_selector(input: &[u8]) -> Option<String> {
    if input.len() < 4 {
        return None;
    }
    Some(format!("0x{}", hex::encode(&input[..4])))
}

fn is_esp_transfer(log: &Log) -> bool {
    log.topics.len() >= 3
        && format!("{:?}", log.topics[0]) == TRANSFER_TOPIC
        && format!("{:?}", log.address) == ESP_TOKEN
}

fn topic_to_address(topic: &H256) -> Address {
    Address::from_slice(&topic.as_bytes()[12..])
}
