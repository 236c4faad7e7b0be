//! Count command - show the current bounty count

use crate::app::App;
use crate::style::*;
use anyhow::Result;

pub async fn run(app: &App) -> Result<()> {
    print_header("Current bounty count");

    print_count(app).await;
    Ok(())
}

/// Read the counter with a spinner and print it, or the read error
pub async fn print_count(app: &App) {
    let pb = spinner("Loading...");
    let _ = app.flow.read_bounty_count().await;
    pb.finish_and_clear();

    let counter = app.flow.counter();
    match counter.error {
        Some(e) => print_error(&e),
        None => println!("  {}", style_bold(&counter.value)),
    }
}
