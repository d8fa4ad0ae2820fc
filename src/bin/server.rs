use anyhow::Context;
use trivia_api::config::Settings;
use trivia_api::db;
use trivia_api::server::app::run_server;
use trivia_api::telemetry::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let settings = Settings::load().context("Failed to load settings")?;

    tracing::info!(path = %settings.database.path, "Opening database");
    let pool = db::establish_connection(
        &settings.database.path,
        settings.database.max_connections,
    )
    .await
    .context("Cannot connect to DB")?;

    run_server(pool, &settings.addr()).await
}
