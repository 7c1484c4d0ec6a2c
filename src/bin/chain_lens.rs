//! Command-line balance checker
//!
//! Reads a JSON config and a wallet list, runs one query session and prints
//! every resolved balance followed by a summary.

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use chain_lens::{
    connect,
    types::Address,
    utils::{address_utils::load_addresses, balance_utils::format_balance},
    AppConfig, BalanceSession, SessionReport, TokenType,
};

#[derive(Debug, Parser)]
#[command(name = "chain-lens", version, about = "Batch token balance checker")]
struct Args {
    /// JSON configuration file
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Wallet list, one address per line
    #[arg(short, long, default_value = "wallets.txt")]
    file: PathBuf,

    /// Override the configured token type (native, erc20, erc721)
    #[arg(long)]
    token_type: Option<String>,

    /// Override the configured token contract
    #[arg(long)]
    token: Option<String>,

    /// Print the full report as JSON
    #[arg(long)]
    json: bool,
}

fn short_address(address: &Address) -> String {
    let s = address.to_string();
    format!("{}...{}", &s[..6], &s[s.len() - 4..])
}

fn print_report(report: &SessionReport) {
    let with_balance = report.balances.iter().enumerate().filter(|(_, tb)| tb.success);
    for (index, tb) in with_balance {
        println!(
            "[{:>4}] {}  {} {}",
            index,
            short_address(&tb.owner),
            format_balance(&tb.balance, 4),
            tb.symbol
        );
    }

    println!("----------------------------------------");
    println!("Token: {} ({})", report.token.symbol, report.token.token_type);
    println!("{}", report.summary);
    println!("Retried: {} (recovered {})", report.retried, report.recovered);
    println!("Elapsed: {:.2?}", report.elapsed);
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = AppConfig::from_file(&args.config)?;
    if let Some(token_type) = args.token_type {
        config.token_type = token_type;
    }
    if let Some(token) = args.token {
        config.token_address = token;
    }
    let token = config.token_address()?;
    let token_type: Option<TokenType> = config.token_type()?;

    let parsed = load_addresses(&args.file)?;
    info!(
        "Loaded {} addresses from {} ({} invalid lines skipped)",
        parsed.addresses.len(),
        args.file.display(),
        parsed.skipped.len()
    );

    let connector = connect(&config.rpc_url, &config.connect, config.query.multicall_address)
        .await
        .with_context(|| format!("connecting to {}", config.rpc_url))?;
    let session = BalanceSession::new(Arc::new(connector), config.query.clone());
    let report = session.run(token, token_type, &parsed.addresses).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}
