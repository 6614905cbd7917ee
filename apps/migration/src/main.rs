//! Migration CLI tool.
//!
//! Reads `DATABASE_URL`; run `migration --help` for the subcommands.

use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // The CLI installs its own tracing subscriber.
    cli::run_cli(migration::Migrator).await;
}
