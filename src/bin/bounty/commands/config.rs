//! Config command - show the effective configuration

use crate::style::*;
use anyhow::Result;
use base_bounty::{ApprovalPolicy, Config, InclusionMode};

pub fn run(config: &Config) -> Result<()> {
    print_header("Configuration");

    println!();
    println!("App label:        {}", style_cyan(&config.app.label));
    println!();
    println!("{}", style_bold("Network:"));
    println!("  Chain ID:         {}", config.network.chain_id);
    println!("  RPC:              {}", config.network.rpc_url);
    if let Some(explorer) = &config.network.explorer_url {
        println!("  Explorer:         {}", explorer);
    }

    println!();
    println!("{}", style_bold("Contracts:"));
    println!("  Bounty:           {}", config.contracts.bounty);
    println!(
        "  Token:            {} ({}, {} decimals)",
        config.contracts.token, config.token.symbol, config.token.decimals
    );

    println!();
    println!("{}", style_bold("Approval:"));
    match config.approval.policy {
        ApprovalPolicy::Requested => println!("  Policy:           requested amount"),
        ApprovalPolicy::Fixed => println!(
            "  Policy:           fixed allowance of {} {}",
            config.approval.fixed_allowance, config.token.symbol
        ),
    }

    println!();
    println!("{}", style_bold("Inclusion:"));
    match config.inclusion.mode {
        InclusionMode::Receipt => println!(
            "  Mode:             poll receipt every {}s, timeout {}s",
            config.inclusion.poll_interval().as_secs(),
            config.inclusion.timeout_secs
        ),
        InclusionMode::FixedDelay => println!(
            "  Mode:             {}",
            style_yellow(&format!(
                "fixed delay of {}s (unverified)",
                config.inclusion.fixed_delay_secs
            ))
        ),
    }

    println!();
    println!("{}", style_bold("Wallet:"));
    println!("  Endpoint:         {}", config.wallet.rpc_url);

    Ok(())
}
