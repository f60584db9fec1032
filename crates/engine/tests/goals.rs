use chrono::{Duration, TimeZone, Utc};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{DepositCmd, Engine, EngineError};
use migration::MigratorTrait;
use uuid::Uuid;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

fn deposit(goal_id: Uuid, amount: f64) -> DepositCmd {
    DepositCmd {
        goal_id,
        amount,
        description: None,
        transaction_date: None,
        owner_id: None,
    }
}

async fn transactions_in_db(db: &DatabaseConnection, goal_id: Uuid) -> i64 {
    let backend = db.get_database_backend();
    let row = db
        .query_one(Statement::from_sql_and_values(
            backend,
            "SELECT COUNT(*) AS n FROM transactions WHERE goal_id = ?",
            vec![goal_id.to_string().into()],
        ))
        .await
        .unwrap()
        .unwrap();
    row.try_get("", "n").unwrap()
}

#[tokio::test]
async fn new_goal_has_no_progress() {
    let (engine, _db) = engine_with_db().await;

    let goal = engine.create_goal("  Bike ", 1000.0, None).await.unwrap();
    assert_eq!(goal.name, "Bike");
    assert_eq!(goal.current_amount, 0.0);
    assert!(!goal.completed);

    let progress = engine.goal_progress(goal.id, None).await.unwrap();
    assert_eq!(progress.progress_percentage, 0.0);
    assert_eq!(progress.remaining_amount, 1000.0);
    assert_eq!(progress.estimate.average_daily_savings, None);
    assert_eq!(progress.estimate.estimated_days_to_completion, None);
    assert_eq!(progress.estimate.estimated_completion_date, None);
}

#[tokio::test]
async fn create_goal_validates_input() {
    let (engine, _db) = engine_with_db().await;

    assert!(matches!(
        engine.create_goal("   ", 10.0, None).await,
        Err(EngineError::InvalidName(_))
    ));
    assert!(matches!(
        engine.create_goal("Bike", -5.0, None).await,
        Err(EngineError::InvalidAmount(_))
    ));
    assert_eq!(
        engine
            .create_goal("Bike", 10.0, Some(&Uuid::new_v4().to_string()))
            .await,
        Err(EngineError::KeyNotFound("User".to_string()))
    );
}

#[tokio::test]
async fn half_way_goal_reports_fifty_percent() {
    let (engine, _db) = engine_with_db().await;
    let goal = engine.create_goal("Laptop", 1000.0, None).await.unwrap();

    engine.post_transaction(deposit(goal.id, 500.0)).await.unwrap();

    let progress = engine.goal_progress(goal.id, None).await.unwrap();
    assert!((progress.progress_percentage - 50.0).abs() < 1e-9);
    assert_eq!(progress.remaining_amount, 500.0);
    assert_eq!(progress.estimate.average_daily_savings, Some(500.0));
    assert!(progress.estimate.estimated_days_to_completion.is_some());
    assert!(progress.estimate.estimated_completion_date.is_some());
}

#[tokio::test]
async fn deposits_accumulate() {
    let (engine, _db) = engine_with_db().await;
    let goal = engine.create_goal("Trip", 300.0, None).await.unwrap();

    for amount in [10.0, 20.5, 30.25] {
        engine.post_transaction(deposit(goal.id, amount)).await.unwrap();
    }

    let goal = engine.goal(goal.id, None).await.unwrap();
    assert_eq!(goal.current_amount, 60.75);
    assert!(!goal.completed);
}

#[tokio::test]
async fn completion_date_is_fixed_on_first_transition() {
    let (engine, _db) = engine_with_db().await;
    let goal = engine.create_goal("Phone", 100.0, None).await.unwrap();

    let first = engine.post_transaction(deposit(goal.id, 60.0)).await.unwrap();
    assert!(!first.completed_now);
    assert!(!first.goal.completed);
    assert!(first.goal.completion_date.is_none());

    let second = engine.post_transaction(deposit(goal.id, 40.0)).await.unwrap();
    assert!(second.completed_now);
    assert!(second.goal.completed);
    let completion_date = second.goal.completion_date.unwrap();

    let third = engine.post_transaction(deposit(goal.id, 25.0)).await.unwrap();
    assert!(!third.completed_now);
    assert!(third.goal.completed);
    assert_eq!(third.goal.completion_date, Some(completion_date));
    assert_eq!(third.goal.current_amount, 125.0);

    let progress = engine.goal_progress(goal.id, None).await.unwrap();
    assert_eq!(progress.estimate.estimated_days_to_completion, Some(0.0));
}

#[tokio::test]
async fn withdrawal_clears_completed_but_keeps_the_date() {
    let (engine, _db) = engine_with_db().await;
    let goal = engine.create_goal("Phone", 100.0, None).await.unwrap();

    engine.post_transaction(deposit(goal.id, 100.0)).await.unwrap();
    let after = engine.post_transaction(deposit(goal.id, -30.0)).await.unwrap();

    assert!(!after.goal.completed);
    assert!(after.goal.completion_date.is_some());
    assert_eq!(after.goal.current_amount, 70.0);
}

#[tokio::test]
async fn post_transaction_to_missing_goal_fails() {
    let (engine, _db) = engine_with_db().await;

    assert_eq!(
        engine.post_transaction(deposit(Uuid::new_v4(), 10.0)).await,
        Err(EngineError::KeyNotFound("Goal".to_string()))
    );
}

#[tokio::test]
async fn non_finite_amount_is_rejected_without_side_effects() {
    let (engine, db) = engine_with_db().await;
    let goal = engine.create_goal("Car", 100.0, None).await.unwrap();

    assert!(matches!(
        engine.post_transaction(deposit(goal.id, f64::INFINITY)).await,
        Err(EngineError::InvalidAmount(_))
    ));
    assert_eq!(transactions_in_db(&db, goal.id).await, 0);
    assert_eq!(engine.goal(goal.id, None).await.unwrap().current_amount, 0.0);
}

#[tokio::test]
async fn delete_goal_cascades_to_transactions() {
    let (engine, db) = engine_with_db().await;
    let goal = engine.create_goal("Sofa", 800.0, None).await.unwrap();
    engine.post_transaction(deposit(goal.id, 100.0)).await.unwrap();
    engine.post_transaction(deposit(goal.id, 50.0)).await.unwrap();
    assert_eq!(transactions_in_db(&db, goal.id).await, 2);

    engine.delete_goal(goal.id, None).await.unwrap();

    assert_eq!(transactions_in_db(&db, goal.id).await, 0);
    assert!(engine.transactions(goal.id, None).await.unwrap().is_empty());
    assert_eq!(
        engine.goal(goal.id, None).await,
        Err(EngineError::KeyNotFound("Goal".to_string()))
    );
    assert_eq!(
        engine.delete_goal(goal.id, None).await,
        Err(EngineError::KeyNotFound("Goal".to_string()))
    );
}

#[tokio::test]
async fn transactions_are_listed_oldest_first() {
    let (engine, _db) = engine_with_db().await;
    let goal = engine.create_goal("House", 10_000.0, None).await.unwrap();
    let base = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap();

    for (offset, amount) in [(3, 30.0), (1, 10.0), (2, 20.0)] {
        engine
            .post_transaction(DepositCmd {
                transaction_date: Some(base + Duration::days(offset)),
                description: Some(format!("  day {offset} ")),
                ..deposit(goal.id, amount)
            })
            .await
            .unwrap();
    }

    let txs = engine.transactions(goal.id, None).await.unwrap();
    let amounts: Vec<f64> = txs.iter().map(|tx| tx.amount).collect();
    assert_eq!(amounts, vec![10.0, 20.0, 30.0]);
    assert_eq!(txs[0].description.as_deref(), Some("day 1"));
    assert!(txs.iter().all(|tx| tx.goal_id == goal.id));
}

#[tokio::test]
async fn progress_uses_backfilled_history() {
    let (engine, _db) = engine_with_db().await;
    let goal = engine.create_goal("Camera", 1000.0, None).await.unwrap();
    let start = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();

    for (day, amount) in [(0, 100.0), (4, 100.0), (10, 100.0)] {
        engine
            .post_transaction(DepositCmd {
                transaction_date: Some(start + Duration::days(day)),
                ..deposit(goal.id, amount)
            })
            .await
            .unwrap();
    }

    let now = start + Duration::days(10);
    let progress = engine.goal_progress_at(goal.id, None, now).await.unwrap();
    assert_eq!(progress.estimate.average_daily_savings, Some(30.0));
    let days = progress.estimate.estimated_days_to_completion.unwrap();
    assert!((days - 700.0 / 30.0).abs() < 1e-9);
    assert!(progress.estimate.estimated_completion_date.unwrap() > now);
}

#[tokio::test]
async fn second_same_day_deposit_shortens_the_forecast() {
    let (engine, _db) = engine_with_db().await;
    let goal = engine.create_goal("Guitar", 1000.0, None).await.unwrap();
    let morning = Utc.with_ymd_and_hms(2024, 6, 3, 8, 0, 0).unwrap();
    let now = morning + Duration::hours(10);

    engine
        .post_transaction(DepositCmd {
            transaction_date: Some(morning),
            ..deposit(goal.id, 100.0)
        })
        .await
        .unwrap();
    let before = engine.goal_progress_at(goal.id, None, now).await.unwrap();

    engine
        .post_transaction(DepositCmd {
            transaction_date: Some(morning + Duration::hours(2)),
            ..deposit(goal.id, 100.0)
        })
        .await
        .unwrap();
    let after = engine.goal_progress_at(goal.id, None, now).await.unwrap();

    assert_eq!(after.estimate.average_daily_savings, Some(200.0));
    assert!(
        after.estimate.estimated_days_to_completion.unwrap()
            < before.estimate.estimated_days_to_completion.unwrap()
    );
}

#[tokio::test]
async fn negative_rate_has_no_forecast() {
    let (engine, _db) = engine_with_db().await;
    let goal = engine.create_goal("Watch", 500.0, None).await.unwrap();

    engine.post_transaction(deposit(goal.id, -20.0)).await.unwrap();

    let progress = engine.goal_progress(goal.id, None).await.unwrap();
    assert_eq!(progress.estimate.average_daily_savings, Some(-20.0));
    assert_eq!(progress.estimate.estimated_days_to_completion, None);
    assert_eq!(progress.estimate.estimated_completion_date, None);
}

#[tokio::test]
async fn register_and_authenticate() {
    let (engine, _db) = engine_with_db().await;

    let user = engine.register(" alice ", "s3cret").await.unwrap();
    assert_eq!(user.username, "alice");

    assert_eq!(
        engine.register("alice", "other").await,
        Err(EngineError::ExistingKey(
            "Username already registered".to_string()
        ))
    );

    let logged = engine.authenticate("alice", "s3cret").await.unwrap();
    assert_eq!(logged.id, user.id);

    assert!(matches!(
        engine.authenticate("alice", "wrong").await,
        Err(EngineError::Unauthorized(_))
    ));
    assert_eq!(
        engine.authenticate("bob", "s3cret").await,
        Err(EngineError::KeyNotFound("User".to_string()))
    );
    assert!(matches!(
        engine.register("carol", "").await,
        Err(EngineError::InvalidPassword(_))
    ));
}

#[tokio::test]
async fn password_is_never_stored_in_clear() {
    let (engine, db) = engine_with_db().await;
    engine.register("alice", "s3cret").await.unwrap();

    let backend = db.get_database_backend();
    let row = db
        .query_one(Statement::from_string(
            backend,
            "SELECT password_hash FROM users WHERE username = 'alice'",
        ))
        .await
        .unwrap()
        .unwrap();
    let hash: String = row.try_get("", "password_hash").unwrap();
    assert_ne!(hash, "s3cret");
    assert!(hash.starts_with("$argon2id$"));
}

#[tokio::test]
async fn goals_are_scoped_by_owner() {
    let (engine, _db) = engine_with_db().await;
    let alice = engine.register("alice", "pw").await.unwrap().id.to_string();
    let bob = engine.register("bob", "pw").await.unwrap().id.to_string();

    let alice_goal = engine
        .create_goal("Alice car", 5000.0, Some(&alice))
        .await
        .unwrap();
    engine.create_goal("Public", 100.0, None).await.unwrap();

    let alice_goals = engine.goals(Some(&alice)).await.unwrap();
    assert_eq!(alice_goals.len(), 1);
    assert_eq!(alice_goals[0].owner_id.as_deref(), Some(alice.as_str()));
    assert!(engine.goals(Some(&bob)).await.unwrap().is_empty());

    let anonymous = engine.goals(None).await.unwrap();
    assert_eq!(anonymous.len(), 1);
    assert_eq!(anonymous[0].name, "Public");

    let not_found = Err(EngineError::KeyNotFound("Goal".to_string()));
    assert_eq!(engine.goal(alice_goal.id, Some(&bob)).await, not_found);
    assert_eq!(engine.goal(alice_goal.id, None).await, not_found);
    assert_eq!(
        engine
            .post_transaction(DepositCmd {
                owner_id: Some(bob.clone()),
                ..deposit(alice_goal.id, 10.0)
            })
            .await
            .map(|outcome| outcome.transaction.amount),
        Err(EngineError::KeyNotFound("Goal".to_string()))
    );
    assert_eq!(
        engine.delete_goal(alice_goal.id, Some(&bob)).await,
        Err(EngineError::KeyNotFound("Goal".to_string()))
    );

    let posted = engine
        .post_transaction(DepositCmd {
            owner_id: Some(alice.clone()),
            ..deposit(alice_goal.id, 10.0)
        })
        .await
        .unwrap();
    assert_eq!(posted.transaction.owner_id.as_deref(), Some(alice.as_str()));
    assert_eq!(
        engine
            .transactions(alice_goal.id, Some(&alice))
            .await
            .unwrap()
            .len(),
        1
    );
    assert!(
        engine
            .transactions(alice_goal.id, Some(&bob))
            .await
            .unwrap()
            .is_empty()
    );
}
