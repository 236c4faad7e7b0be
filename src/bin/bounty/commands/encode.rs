//! Encode command - show calldata without sending it

use anyhow::{Context, Result};
use base_bounty::contracts::{approve_calldata, legacy_post_bounty_calldata, post_bounty_calldata};
use base_bounty::{format_units, parse_units, Config};

use crate::style::*;

pub fn run(config: &Config, amount: &str, question: &str, legacy: bool) -> Result<()> {
    print_header("Transaction Payloads");

    let decimals = config.token.decimals;
    let units = parse_units(amount, decimals).context("Invalid amount")?;
    let allowance = config
        .approval
        .allowance(units, decimals)
        .context("Invalid approval allowance")?;

    println!();
    println!("{}", style_bold("1. approve(address,uint256)"));
    println!("  To:         {}", config.contracts.token);
    println!(
        "  Allowance:  {} {} ({} units)",
        format_units(allowance, decimals),
        config.token.symbol,
        allowance
    );
    println!(
        "  Data:       0x{}",
        hex::encode(approve_calldata(config.contracts.bounty, allowance))
    );

    println!();
    println!("{}", style_bold("2. postBounty(uint256,string)"));
    println!("  To:         {}", config.contracts.bounty);
    println!("  Amount:     {} units", units);
    println!(
        "  Data:       0x{}",
        hex::encode(post_bounty_calldata(units, question.trim()))
    );

    if legacy {
        println!();
        print_warning("Legacy fixed-slot layout (no offset/length words, not valid ABI):");
        println!(
            "  Data:       0x{}",
            style_dim(&hex::encode(legacy_post_bounty_calldata(units, question.trim())))
        );
    }

    Ok(())
}
