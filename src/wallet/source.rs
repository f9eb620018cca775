use crate::error::{ClaimError, Result};
use ethers::signers::{coins_bip39::English, LocalWallet, MnemonicBuilder, Signer};
use ethers::types::Address;
use ethers::utils::to_checksum;
use tracing::debug;

/// One HD wallet derived from the operator seed phrase.
///
/// The signer is kept for message signing and transaction submission; the
/// private key is only rendered on demand for the result records.
#[derive(Debug, Clone)]
pub struct DerivedWallet {
    pub index: u32,
    pub derivation_path: String,
    signer: LocalWallet,
}

impl DerivedWallet {
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Checksummed address string as the portal expects it.
    pub fn address_string(&self) -> String {
        to_checksum(&self.signer.address(), None)
    }

    pub fn private_key_hex(&self) -> String {
        format!("0x{}", hex::encode(self.signer.signer().to_bytes()))
    }

    pub fn signer(&self) -> &LocalWallet {
        &self.signer
    }
}

/// Derive `count` wallets from one mnemonic at `{path_prefix}/{index}`.
///
/// Deterministic for identical inputs; indices are contiguous from 0.
pub fn derive_wallets(mnemonic: &str, count: u32, path_prefix: &str) -> Result<Vec<DerivedWallet>> {
    if count == 0 {
        return Err(ClaimError::Config(
            "wallet count must be a positive integer".to_string(),
        ));
    }

    let mut wallets = Vec::with_capacity(count as usize);
    for index in 0..count {
        let derivation_path = format!("{}/{}", path_prefix, index);
        let signer = MnemonicBuilder::<English>::default()
            .phrase(mnemonic)
            .derivation_path(&derivation_path)?
            .build()?;

        debug!(
            "Derived wallet {} at {}: {}",
            index,
            derivation_path,
            to_checksum(&signer.address(), None)
        );

        wallets.push(DerivedWallet {
            index,
            derivation_path,
            signer,
        });
    }

    Ok(wallets)
}
