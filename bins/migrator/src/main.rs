//! Schema migration runner for the cash box ledger.
//!
//! Reads `DATABASE_URL` (or `-u <url>`) and applies the ledger schema.
//!
//! Usage:
//!   migrator up      - Create the `transactions` and `denominations` tables
//!   migrator down    - Drop them again
//!   migrator status  - Show which migrations have run
//!   migrator fresh   - Drop everything and re-run

use cashbox_db::migration::Migrator;
use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // The migrator CLI sets up its own tracing.
    cli::run_cli(Migrator).await;
}
