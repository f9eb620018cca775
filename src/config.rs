use ethers::types::U256;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub wallet: WalletConfig,
    #[serde(default)]
    pub portal: PortalConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub claim: ClaimConfig,
    #[serde(default)]
    pub check: CheckConfig,
    #[serde(default)]
    pub rpc: RpcConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WalletConfig {
    #[serde(default)]
    pub mnemonic: String,
    #[serde(default = "default_wallet_count")]
    pub count: u32,
    #[serde(default = "default_path_prefix")]
    pub path_prefix: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PortalConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_portal_id")]
    pub id: String,
    #[serde(default = "default_platform")]
    pub platform: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Optional operator template with `{address}` / `{nonce}` placeholders.
    /// When unset, a standard SIWE message is built instead.
    #[serde(default)]
    pub message_template: Option<String>,
    #[serde(default = "default_statement")]
    pub statement: String,
    #[serde(default = "default_domain")]
    pub domain: String,
    #[serde(default = "default_uri")]
    pub uri: String,
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ClaimConfig {
    #[serde(default = "default_true")]
    pub dry_run: bool,
    #[serde(default = "default_claim_sleep_ms")]
    pub sleep_ms: u64,
    /// Overrides the extracted value for every wallet, in wei.
    #[serde(default)]
    pub value_override_wei: Option<String>,
    #[serde(default = "default_claim_output")]
    pub output_file: String,
    #[serde(default = "default_debug_dir")]
    pub debug_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CheckConfig {
    #[serde(default = "default_check_sleep_ms")]
    pub sleep_ms: u64,
    #[serde(default = "default_check_output")]
    pub output_file: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RpcConfig {
    #[serde(default = "default_rpc_url")]
    pub url: String,
}

fn default_wallet_count() -> u32 {
    20
}

fn default_path_prefix() -> String {
    "m/44'/60'/0'/0".to_string()
}

fn default_api_base() -> String {
    "https://portal-api.magna.so/api/v2".to_string()
}

fn default_portal_id() -> String {
    "bbe62884-b0e3-4328-a20c-0544351402b5".to_string()
}

fn default_platform() -> String {
    "EVM".to_string()
}

fn default_statement() -> String {
    "Espresso".to_string()
}

fn default_domain() -> String {
    "claim.espresso.foundation".to_string()
}

fn default_uri() -> String {
    "https://claim.espresso.foundation".to_string()
}

fn default_chain_id() -> u64 {
    1
}

fn default_true() -> bool {
    true
}

fn default_claim_sleep_ms() -> u64 {
    300
}

fn default_check_sleep_ms() -> u64 {
    250
}

fn default_claim_output() -> String {
    "claim-results.csv".to_string()
}

fn default_check_output() -> String {
    "espresso-results.json".to_string()
}

fn default_debug_dir() -> String {
    "debug".to_string()
}

fn default_rpc_url() -> String {
    "https://ethereum-rpc.publicnode.com".to_string()
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            mnemonic: String::new(),
            count: default_wallet_count(),
            path_prefix: default_path_prefix(),
        }
    }
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            id: default_portal_id(),
            platform: default_platform(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            message_template: None,
            statement: default_statement(),
            domain: default_domain(),
            uri: default_uri(),
            chain_id: default_chain_id(),
        }
    }
}

impl Default for ClaimConfig {
    fn default() -> Self {
        Self {
            dry_run: default_true(),
            sleep_ms: default_claim_sleep_ms(),
            value_override_wei: None,
            output_file: default_claim_output(),
            debug_dir: default_debug_dir(),
        }
    }
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            sleep_ms: default_check_sleep_ms(),
            output_file: default_check_output(),
        }
    }
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: default_rpc_url(),
        }
    }
}

impl Config {
    pub fn load(file: &str) -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name(file).required(false))
            .add_source(
                config::Environment::with_prefix("ESPRESSO")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Fatal pre-run checks. Everything else degrades to a per-wallet failure.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.wallet.mnemonic.trim().is_empty() {
            return Err(crate::error::ClaimError::Config(
                "wallet.mnemonic (ESPRESSO__WALLET__MNEMONIC) is required".to_string(),
            ));
        }
        if self.wallet.count == 0 {
            return Err(crate::error::ClaimError::Config(
                "wallet.count must be a positive integer".to_string(),
            ));
        }
        if let Some(raw) = &self.claim.value_override_wei {
            U256::from_dec_str(raw).map_err(|e| {
                crate::error::ClaimError::Config(format!("invalid claim.value_override_wei: {}", e))
            })?;
        }
        Ok(())
    }

    /// Portal API base for the configured portal id.
    pub fn portal_base_url(&self) -> String {
        format!(
            "{}/{}",
            self.portal.api_base.trim_end_matches('/'),
            self.portal.id
        )
    }

    pub fn value_override(&self) -> Option<U256> {
        self.claim
            .value_override_wei
            .as_deref()
            .and_then(|raw| U256::from_dec_str(raw).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            wallet: WalletConfig {
                mnemonic: "test test test test test test test test test test test junk"
                    .to_string(),
                count: 3,
                path_prefix: default_path_prefix(),
            },
            portal: PortalConfig::default(),
            auth: AuthConfig::default(),
            claim: ClaimConfig::default(),
            check: CheckConfig::default(),
            rpc: RpcConfig::default(),
        }
    }

    #[test]
    fn validate_rejects_missing_mnemonic() {
        let mut config = base_config();
        config.wallet.mnemonic = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_count() {
        let mut config = base_config();
        config.wallet.count = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_value_override() {
        let mut config = base_config();
        config.claim.value_override_wei = Some("0.0005".to_string());
        assert!(config.validate().is_err());

        config.claim.value_override_wei = Some("500000000000000".to_string());
        assert!(config.validate().is_ok());
        assert_eq!(config.value_override(), Some(U256::from(500_000_000_000_000u64)));
    }

    #[test]
    fn portal_base_url_joins_id() {
        let config = base_config();
        assert_eq!(
            config.portal_base_url(),
            "https://portal-api.magna.so/api/v2/bbe62884-b0e3-4328-a20c-0544351402b5"
        );
    }
}
