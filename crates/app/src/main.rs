use std::sync::Arc;
use std::time::Duration;

use assistant::{Assistant, ClassifierConfig, OpenAiClassifier};
use migration::{Migrator, MigratorTrait};
use settings::Database;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "hamyon={level},server={level},engine={level},assistant={level}",
            level = settings.app.level
        ))
        .init();

    let db = parse_database(&settings.server.database).await?;
    let engine = Arc::new(engine::Engine::builder().database(db).build().await?);

    // One-time seeding, finished before the listener accepts requests so
    // concurrent early calls can never double-seed.
    engine.seed_defaults().await?;

    let assistant = match settings.assistant {
        Some(cfg) => {
            let mut config = ClassifierConfig::new(cfg.api_key);
            if let Some(base_url) = cfg.base_url {
                config = config.base_url(base_url);
            }
            if let Some(model) = cfg.model {
                config = config.model(model);
            }
            if let Some(secs) = cfg.timeout_secs {
                config = config.timeout(Duration::from_secs(secs));
            }
            let classifier = OpenAiClassifier::new(config)?;
            Some(Arc::new(Assistant::new(
                Arc::clone(&engine),
                Box::new(classifier),
            )))
        }
        None => {
            tracing::info!("no assistant settings; /ai/parse is disabled");
            None
        }
    };

    let state = server::ServerState::new(engine, assistant);
    let bind = settings
        .server
        .bind
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let addr = format!("{}:{}", bind, settings.server.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    server::run_with_listener(state, listener).await?;

    Ok(())
}

async fn parse_database(
    config: &Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
