//! Post Wizard - Interactive bounty posting
//!
//! Shows the bounty counter, connects the wallet, then walks the user through
//! posting one or more bounties.

use anyhow::Result;
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm};

use crate::app::App;
use crate::commands::count::print_count;
use crate::commands::post::{confirm, prompt_amount, prompt_question, submit_with_progress};
use crate::print_banner;
use crate::style::truncate_address;

pub async fn run_post_wizard(app: App) -> Result<()> {
    print_banner();
    println!("{}", style("  Interactive Post Wizard").cyan().bold());
    println!("  {}", style("Decentralized bounties on Coinbase Base").dim());
    println!();

    println!("  {}", style("Current bounty count").bold());
    print_count(&app).await;

    // Step 1: Connect wallet
    println!();
    println!("  {}", style("Step 1: Connect Wallet").bold());
    println!(
        "  {}",
        style(format!("(wallet endpoint {})", app.config.wallet.rpc_url)).dim()
    );
    println!();

    let address = match app.connect().await {
        Ok(address) => address,
        Err(e) => {
            println!("  {} {}", style("✗").red(), e);
            return Ok(());
        }
    };
    println!(
        "  {} Connected: {}",
        style("✓").green(),
        style(truncate_address(&address.to_string())).cyan()
    );

    loop {
        // Step 2: Bounty details; the form keeps its values after a failed post
        println!();
        println!("  {}", style("Step 2: Bounty Details").bold());
        println!();

        let form = app.flow.form();
        if form.amount.is_empty() {
            app.flow.set_amount(prompt_amount(&app.config.token.symbol)?);
        }
        if form.question_id.is_empty() {
            app.flow.set_question_id(prompt_question()?);
        }

        // Step 3: Review and send
        let failed = if confirm(&app)? {
            println!();
            submit_with_progress(&app).await.is_none()
        } else {
            println!();
            println!("  {} Post cancelled", style("✗").red());
            app.flow.set_amount("");
            app.flow.set_question_id("");
            false
        };

        println!();
        let again = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(next_prompt(failed))
            .default(false)
            .interact()?;
        if !again {
            break;
        }
    }

    app.session.disconnect();
    println!();
    println!("  {} Disconnected", style("✓").green());
    Ok(())
}

/// Follow-up question after a post attempt
fn next_prompt(failed: bool) -> &'static str {
    if failed {
        "  Retry this bounty?"
    } else {
        "  Post another bounty?"
    }
}
