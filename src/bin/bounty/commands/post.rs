//! Post command - approve the payment token and post a bounty

use std::time::Duration;

use anyhow::Result;
use base_bounty::{format_units, ApprovalPolicy, PostReceipt};
use dialoguer::{theme::ColorfulTheme, Confirm, Input};

use crate::app::App;
use crate::style::*;

pub async fn run(
    app: &App,
    amount: Option<String>,
    question: Option<String>,
    yes: bool,
    open: bool,
) -> Result<()> {
    print_header("Post Bounty");

    let address = app.connect().await?;
    print_success(&format!(
        "Connected: {}",
        style_cyan(&truncate_address(&address.to_string()))
    ));
    println!();

    let amount = match amount {
        Some(amount) => amount,
        None => prompt_amount(&app.config.token.symbol)?,
    };
    let question = match question {
        Some(question) => question,
        None => prompt_question()?,
    };
    app.flow.set_amount(amount);
    app.flow.set_question_id(question);

    if !yes && !confirm(app)? {
        println!("  {} Post cancelled", style_red("✗"));
        return Ok(());
    }

    if let Some(receipt) = submit_with_progress(app).await {
        if open {
            if let Some(url) = app.config.explorer_tx_url(&receipt.post_tx.to_string()) {
                if open::that(&url).is_ok() {
                    print_info("Browser opened automatically.");
                }
            }
        }
    }

    Ok(())
}

pub fn prompt_amount(symbol: &str) -> Result<String> {
    let amount: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("  Amount ({})", symbol))
        .allow_empty(true)
        .interact_text()?;
    Ok(amount)
}

pub fn prompt_question() -> Result<String> {
    let question: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("  Question ID")
        .allow_empty(true)
        .interact_text()?;
    Ok(question)
}

/// Review screen; returns whether the user agreed to send both transactions
pub fn confirm(app: &App) -> Result<bool> {
    let form = app.flow.form();
    let config = &app.config;

    println!();
    println!("  {}", style_bold("Review Bounty"));
    println!("  {}", style_dim(&"─".repeat(40)));
    println!();
    println!("  Amount:     {} {}", form.amount.trim(), config.token.symbol);
    println!("  Question:   {}", form.question_id.trim());
    match config.approval.policy {
        ApprovalPolicy::Requested => {
            println!("  Approval:   the posted amount");
        }
        ApprovalPolicy::Fixed => {
            println!(
                "  Approval:   {} {} (fixed allowance)",
                config.approval.fixed_allowance, config.token.symbol
            );
        }
    }
    println!();
    print_info("Two transactions will be requested: approval, then the bounty post.");

    let confirmed = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("  Send both transactions?")
        .default(true)
        .interact()?;
    Ok(confirmed)
}

/// Run the flow with a spinner that follows the flow's progress messages.
///
/// Errors are printed, not returned; the form keeps its fields on failure.
pub async fn submit_with_progress(app: &App) -> Option<PostReceipt> {
    let pb = spinner("Requesting account...");
    let submit = app.flow.submit();
    tokio::pin!(submit);

    let mut ticker = tokio::time::interval(Duration::from_millis(250));
    let outcome = loop {
        tokio::select! {
            outcome = &mut submit => break outcome,
            _ = ticker.tick() => {
                if let Some(progress) = app.flow.form().result {
                    pb.set_message(format!("{} - waiting for inclusion...", progress));
                }
            }
        }
    };
    pb.finish_and_clear();

    match outcome {
        Ok(receipt) => {
            let decimals = app.config.token.decimals;
            print_success(&format!(
                "Approved {} {}: {}",
                format_units(receipt.allowance, decimals),
                app.config.token.symbol,
                style_dim(&receipt.approval_tx.to_string())
            ));
            print_success(&format!(
                "Bounty of {} {} posted: {}",
                format_units(receipt.amount, decimals),
                app.config.token.symbol,
                style_cyan(&receipt.post_tx.to_string())
            ));
            if let Some(url) = app.config.explorer_tx_url(&receipt.post_tx.to_string()) {
                println!("  {}", style_dim(&url));
            }

            let counter = app.flow.counter();
            match counter.error {
                Some(e) => print_warning(&format!("Could not refresh bounty count: {}", e)),
                None => println!("  Bounty count: {}", style_bold(&counter.value)),
            }
            Some(receipt)
        }
        Err(_) => {
            let form = app.flow.form();
            if let Some(progress) = form.result {
                print_warning(&format!("{} (the approval may still land)", progress));
            }
            print_error(&form.error.unwrap_or_else(|| "Failed to post bounty".to_string()));
            None
        }
    }
}
