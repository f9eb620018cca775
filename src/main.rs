mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use espresso_claimer::claim::{pipeline, ClaimPipeline};
use espresso_claimer::portal::PortalClient;
use espresso_claimer::{analysis, error, storage, wallet, Config};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("espresso_claimer=debug,info")
        .init();

    let cli = Cli::parse();

    let config = match Config::load(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Claim {
            dry_run,
            live,
            count,
        } => run_claim(config, dry_run, live, count).await,

        Commands::Check { count } => run_check(config, count).await,

        Commands::Analyze { tx_hash, out } => run_analyze(&config, &tx_hash, &out).await,
    };

    if let Err(e) = result {
        error!("{}", format!("Error: {}", e).red());
        std::process::exit(1);
    }
}

async fn run_claim(
    mut config: Config,
    dry_run: bool,
    live: bool,
    count: Option<u32>,
) -> error::Result<()> {
    if dry_run {
        config.claim.dry_run = true;
    }
    if live {
        config.claim.dry_run = false;
    }
    if let Some(count) = count {
        config.wallet.count = count;
    }
    config.validate()?;

    let wallets = wallet::derive_wallets(
        &config.wallet.mnemonic,
        config.wallet.count,
        &config.wallet.path_prefix,
    )?;
    info!("Derived {} wallets", wallets.len());

    if config.claim.dry_run {
        println!("{}", "DRY RUN: no transactions will be sent".yellow());
    }

    let portal = PortalClient::new(config.portal_base_url());
    let output_file = config.claim.output_file.clone();
    let claim_pipeline = ClaimPipeline::new(portal, config);

    let records = claim_pipeline.run(&wallets).await;

    storage::write_claim_csv(&output_file, &records)?;
    pipeline::print_summary(&records, &output_file);
    Ok(())
}

async fn run_check(mut config: Config, count: Option<u32>) -> error::Result<()> {
    if let Some(count) = count {
        config.wallet.count = count;
    }
    config.validate()?;

    let wallets = wallet::derive_wallets(
        &config.wallet.mnemonic,
        config.wallet.count,
        &config.wallet.path_prefix,
    )?;
    info!("Derived {} wallets", wallets.len());

    let portal = PortalClient::new(config.portal_base_url());
    let output_file = config.check.output_file.clone();
    let claim_pipeline = ClaimPipeline::new(portal, config);

    let records = claim_pipeline.check(&wallets).await;

    storage::write_check_json(&output_file, &records)?;

    let ok = records.iter().filter(|r| r.ok).count();
    println!("\n{}", "=== SUMMARY ===".cyan().bold());
    println!("checked: {}", records.len());
    println!("login+query success: {}", ok.to_string().green());
    println!("failed: {}", (records.len() - ok).to_string().red());
    println!("saved: {}", output_file);
    Ok(())
}

async fn run_analyze(config: &Config, tx_hash: &str, out: &str) -> error::Result<()> {
    let report = analysis::analyze_transaction(&config.rpc.url, tx_hash).await?;

    std::fs::write(out, serde_json::to_string_pretty(&report)?)?;

    println!("{}", "=== TX ANALYSIS ===".cyan().bold());
    println!("tx: {}", report.tx_hash);
    println!("likelyEspressoClaim: {}", report.likely_espresso_claim);
    println!(
        "method: {} ({})",
        report.method,
        report.selector.as_deref().unwrap_or("none")
    );
    println!("to: {}", report.to.as_deref().unwrap_or(""));
    println!("valueEth: {}", report.value_eth);
    println!("espTransfers: {}", report.esp_transfers.len());
    println!("saved: {}", out);
    Ok(())
}
