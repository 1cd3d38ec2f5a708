//! # MedPlus POS Terminal
//!
//! Binary entry point: wire up configuration, the SQLite store, and the
//! checkout collaborators, then hand control to the command loop.
//!
//! ## Startup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  tracing init ──► PosConfig::load() ──► Database::new (migrations)     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Checkout<DatabaseLedger, UpiLinkProvider, SmsNotifier>                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Terminal command loop (stdin, line per command)                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::io::{self, BufRead, Write};

use tracing::info;
use tracing_subscriber::EnvFilter;

use medplus_pos::checkout::Checkout;
use medplus_pos::config::PosConfig;
use medplus_pos::ledger::DatabaseLedger;
use medplus_pos::payment::UpiLinkProvider;
use medplus_pos::sms::SmsNotifier;
use medplus_pos::terminal::Terminal;
use medplus_store::{Database, DbConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing; RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("Starting MedPlus POS terminal...");

    let config = PosConfig::load();
    info!(db = %config.database_path, vpa = %config.upi.merchant_vpa, "Configuration loaded");

    let db = Database::new(DbConfig::new(&config.database_path)).await?;
    info!("Database ready");

    let checkout = Checkout::new(
        DatabaseLedger::new(db.clone()),
        UpiLinkProvider::new(config.upi.clone()),
        SmsNotifier::new(config.sms.clone()),
    );
    let mut terminal = Terminal::new(db.clone(), checkout);

    println!("MedPlus POS. Type 'help' for commands.");

    let stdin = io::stdin();
    loop {
        let prompt = if terminal.in_payment() { "pay> " } else { "pos> " };
        print!("{}", prompt);
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        if line.trim() == "quit" {
            break;
        }

        terminal.handle_line(&line).await;
    }

    db.close().await;
    info!("Terminal shutdown complete");
    Ok(())
}
