use std::{error::Error, io::Write};

use clap::{Args, Parser, Subcommand};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::Print,
    terminal,
    terminal::ClearType,
};
use engine::{Engine, EngineError};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

#[derive(Parser, Debug)]
#[command(name = "goal_admin")]
#[command(about = "Admin utilities for the goal tracker (bootstrap users/goals)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./goal_tracker.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
    Goal(Goal),
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    Create(UserCreateArgs),
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    username: String,
}

#[derive(Args, Debug)]
struct Goal {
    #[command(subcommand)]
    command: GoalCommand,
}

#[derive(Subcommand, Debug)]
enum GoalCommand {
    Create(GoalCreateArgs),
    List(GoalListArgs),
}

#[derive(Args, Debug)]
struct GoalCreateArgs {
    /// Owner username. Without it the goal is visible to anonymous clients.
    #[arg(long)]
    owner: Option<String>,
    #[arg(long)]
    name: String,
    #[arg(long)]
    target: f64,
}

#[derive(Args, Debug)]
struct GoalListArgs {
    #[arg(long)]
    owner: Option<String>,
}

struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> Result<Self, Box<dyn Error + Send + Sync>> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn prompt_password(prompt: &str) -> Result<String, Box<dyn Error + Send + Sync>> {
    let _raw = RawModeGuard::enter()?;

    let mut out = std::io::stderr();
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(prompt)
    )?;
    out.flush()?;

    let mut buf = String::new();
    loop {
        let Event::Key(KeyEvent {
            code, modifiers, ..
        }) = event::read()?
        else {
            continue;
        };

        match code {
            KeyCode::Enter => {
                execute!(out, Print("\r\n"))?;
                out.flush()?;
                break;
            }
            KeyCode::Backspace => {
                if buf.pop().is_some() {
                    execute!(out, cursor::MoveLeft(1), Print(" "), cursor::MoveLeft(1))?;
                    out.flush()?;
                }
            }
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                execute!(out, Print("\r\n"))?;
                out.flush()?;
                return Err("interrupted".into());
            }
            KeyCode::Char(ch) if !modifiers.contains(KeyModifiers::CONTROL) => {
                buf.push(ch);
                execute!(out, Print("*"))?;
                out.flush()?;
            }
            _ => {}
        }
    }

    Ok(buf)
}

fn prompt_password_twice() -> Result<String, Box<dyn Error + Send + Sync>> {
    let mut out = std::io::stderr();
    for _ in 0..3 {
        let p1 = prompt_password("Password: ")?;
        if p1.is_empty() {
            execute!(
                out,
                cursor::MoveToColumn(0),
                terminal::Clear(ClearType::CurrentLine),
                Print("Password must not be empty.\r\n")
            )?;
            continue;
        }

        let p2 = prompt_password("Confirm password: ")?;
        if p1 == p2 {
            return Ok(p1);
        }

        execute!(
            out,
            cursor::MoveToColumn(0),
            terminal::Clear(ClearType::CurrentLine),
            Print("Passwords do not match. Try again.\r\n")
        )?;
    }

    Err("too many attempts".into())
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

/// Resolve an optional owner username to its user id.
async fn owner_id(
    engine: &Engine,
    owner: Option<&str>,
) -> Result<Option<String>, Box<dyn Error + Send + Sync>> {
    let Some(owner) = owner else {
        return Ok(None);
    };
    match engine.user_by_username(owner).await {
        Ok(user) => Ok(Some(user.id.to_string())),
        Err(EngineError::KeyNotFound(_)) => {
            eprintln!("user not found: {owner}");
            std::process::exit(1);
        }
        Err(err) => Err(err.into()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build().await?;

    match cli.command {
        Command::User(User {
            command: UserCommand::Create(args),
        }) => {
            let password = prompt_password_twice()?;

            match engine.register(&args.username, &password).await {
                Ok(user) => println!("created user: {} ({})", user.username, user.id),
                Err(EngineError::ExistingKey(_)) => {
                    eprintln!("user already exists: {}", args.username);
                    std::process::exit(1);
                }
                Err(err) => return Err(err.into()),
            }
        }
        Command::Goal(Goal {
            command: GoalCommand::Create(args),
        }) => {
            let owner_id = owner_id(&engine, args.owner.as_deref()).await?;
            let goal = engine
                .create_goal(&args.name, args.target, owner_id.as_deref())
                .await?;
            println!("created goal: {} ({})", goal.name, goal.id);
        }
        Command::Goal(Goal {
            command: GoalCommand::List(args),
        }) => {
            let owner_id = owner_id(&engine, args.owner.as_deref()).await?;
            for goal in engine.goals(owner_id.as_deref()).await? {
                let status = if goal.completed { "done" } else { "open" };
                println!(
                    "{}  {:<24} {:>12.2} / {:<12.2} {:>6.1}%  {status}",
                    goal.id,
                    goal.name,
                    goal.current_amount,
                    goal.target_amount,
                    goal.progress_percentage()
                );
            }
        }
    }

    Ok(())
}
