use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::database::PgStore;

#[derive(Subcommand)]
pub enum DbCommands {
    #[command(about = "Open a pool against DATABASE_URL and run SELECT 1")]
    Check,
}

pub async fn handle(cmd: DbCommands, config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        DbCommands::Check => {
            let target = PgStore::redacted_url(&config.database.url)?;
            let store = PgStore::connect(&config.database).await?;
            let result = store.health_check().await;
            store.close().await;
            result?;

            output_success(output_format, "Database reachable", Some(json!({ "database": target })))
        }
    }
}
