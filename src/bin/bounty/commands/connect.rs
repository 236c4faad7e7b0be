//! Connect command - authorize the wallet and show the account

use crate::app::App;
use crate::style::*;
use anyhow::Result;

pub async fn run(app: &App) -> Result<()> {
    print_header("Wallet");

    if !app.session.is_initialized() {
        print_error(&app.session.error().unwrap_or_default());
        return Ok(());
    }

    print_info(&format!("Requesting accounts from {}...", app.config.wallet.rpc_url));

    match app.connect().await {
        Ok(address) => {
            let address = address.to_string();
            print_success(&format!("Connected: {}", style_cyan(&truncate_address(&address))));
            println!("  {}", style_dim(&address));
        }
        Err(e) => {
            print_error(&format!("{}", e));
        }
    }

    Ok(())
}
