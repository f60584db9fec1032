use clap::{Parser, ValueEnum};
use sea_orm::Database;
use sea_orm_migration::prelude::*;

/// Apply or inspect the goal tracker schema.
#[derive(Parser, Debug)]
#[command(name = "migration")]
struct Cli {
    #[arg(value_enum, default_value_t = Step::Up)]
    step: Step,

    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./goal_tracker.db?mode=rwc"
    )]
    database_url: String,
}

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
enum Step {
    /// Apply every pending migration.
    Up,
    /// Roll back every applied migration.
    Down,
    /// Drop all tables and migrate from scratch.
    Fresh,
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    let db = Database::connect(&cli.database_url).await?;

    match cli.step {
        Step::Up => migration::Migrator::up(&db, None).await?,
        Step::Down => migration::Migrator::down(&db, None).await?,
        Step::Fresh => migration::Migrator::fresh(&db).await?,
        Step::Status => migration::Migrator::status(&db).await?,
    }

    Ok(())
}
