//! Initial schema migration.
//!
//! Creates the complete schema for the goal tracker:
//!
//! - `users`: credentials for the multi-tenant mode
//! - `goals`: savings targets, optionally owned by a user
//! - `transactions`: immutable deposits recorded against a goal

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Username,
    PasswordHash,
    CreatedDate,
}

#[derive(Iden)]
enum Goals {
    Table,
    Id,
    OwnerId,
    Name,
    TargetAmount,
    CurrentAmount,
    Completed,
    CompletionDate,
    CreatedDate,
}

#[derive(Iden)]
enum Transactions {
    Table,
    Id,
    GoalId,
    OwnerId,
    Amount,
    TransactionDate,
    Description,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Users::Username).string().not_null())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::CreatedDate).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-users-username-unique")
                    .table(Users::Table)
                    .col(Users::Username)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Goals
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Goals::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Goals::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Goals::OwnerId).string())
                    .col(ColumnDef::new(Goals::Name).string().not_null())
                    .col(ColumnDef::new(Goals::TargetAmount).double().not_null())
                    .col(
                        ColumnDef::new(Goals::CurrentAmount)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Goals::Completed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Goals::CompletionDate).timestamp())
                    .col(ColumnDef::new(Goals::CreatedDate).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-goals-owner_id")
                            .from(Goals::Table, Goals::OwnerId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-goals-owner_id")
                    .table(Goals::Table)
                    .col(Goals::OwnerId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Transactions
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Transactions::GoalId).string().not_null())
                    .col(ColumnDef::new(Transactions::OwnerId).string())
                    .col(ColumnDef::new(Transactions::Amount).double().not_null())
                    .col(ColumnDef::new(Transactions::TransactionDate).timestamp().not_null())
                    .col(ColumnDef::new(Transactions::Description).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-goal_id")
                            .from(Transactions::Table, Transactions::GoalId)
                            .to(Goals::Table, Goals::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-goal_id-transaction_date")
                    .table(Transactions::Table)
                    .col(Transactions::GoalId)
                    .col(Transactions::TransactionDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Goals::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
