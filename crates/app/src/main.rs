use migration::{Migrator, MigratorTrait};
use settings::Database;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "goal_tracker={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let server = settings.server;
    let db = match parse_database(&server.database).await {
        Ok(db) => db,
        Err(err) => {
            tracing::error!("failed to initialize database: {err}");
            return Err(err);
        }
    };

    let engine = engine::Engine::builder().database(db).build().await?;

    let bind = server.bind.unwrap_or_else(|| "127.0.0.1".to_string());
    let addr = format!("{}:{}", bind, server.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener on {addr}: {err}");
            return Err(err.into());
        }
    };

    if server.require_auth {
        tracing::info!("anonymous access disabled, credentials required");
    }
    server::run_with_listener(engine, listener, server.require_auth).await?;

    Ok(())
}

async fn parse_database(
    config: &settings::Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
