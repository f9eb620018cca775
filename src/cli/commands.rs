use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "espresso-claim")]
#[command(about = "Batch Espresso airdrop claimer for HD-derived wallets")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, global = true, default_value = "config/default")]
    pub config: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Authenticate, fetch eligibility and claim for every wallet
    Claim {
        /// Force dry-run mode (no transactions are sent)
        #[arg(long)]
        dry_run: bool,

        /// Force live mode (overrides the configured dry-run default)
        #[arg(long, conflicts_with = "dry_run")]
        live: bool,

        /// Override the configured wallet count
        #[arg(short = 'n', long)]
        count: Option<u32>,
    },

    /// Login and fetch eligibility records without claiming
    Check {
        /// Override the configured wallet count
        #[arg(short = 'n', long)]
        count: Option<u32>,
    },

    /// Analyze a mined transaction against the claim fingerprint
    Analyze {
        /// Transaction hash to inspect
        tx_hash: String,

        /// Report output file
        #[arg(short, long, default_value = "tx-analysis.json")]
        out: String,
    },
}
