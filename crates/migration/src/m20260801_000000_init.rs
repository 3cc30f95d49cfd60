//! Initial schema migration - creates all tables from scratch.
//!
//! Tables:
//!
//! - `accounts`: money locations (cash, card, bank, savings) and per-person
//!   debt accounts
//! - `categories`: income/expense classification, one level of subcategories
//! - `transactions`: the posted ledger; every row records a balance change
//!   that has already been applied

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Accounts {
    Table,
    Id,
    Name,
    Kind,
    BalanceMinor,
    Currency,
    Color,
    Icon,
    IsDebt,
    IsHidden,
    DebtPerson,
}

#[derive(Iden)]
enum Categories {
    Table,
    Id,
    Name,
    Kind,
    Icon,
    Color,
    ParentId,
    IsDefault,
}

#[derive(Iden)]
enum Transactions {
    Table,
    Id,
    Kind,
    AmountMinor,
    Currency,
    CategoryId,
    AccountId,
    AccountToId,
    Description,
    Place,
    Person,
    Comment,
    DebtKind,
    OccurredAt,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Accounts::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Accounts::Name).string().not_null())
                    .col(ColumnDef::new(Accounts::Kind).string().not_null())
                    .col(
                        ColumnDef::new(Accounts::BalanceMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Accounts::Currency)
                            .string()
                            .not_null()
                            .default("TJS"),
                    )
                    .col(ColumnDef::new(Accounts::Color).string())
                    .col(ColumnDef::new(Accounts::Icon).string())
                    .col(ColumnDef::new(Accounts::IsDebt).boolean().not_null())
                    .col(ColumnDef::new(Accounts::IsHidden).boolean().not_null())
                    .col(ColumnDef::new(Accounts::DebtPerson).string())
                    .to_owned(),
            )
            .await?;

        // At most one debt account per counterparty. Non-debt accounts store
        // NULL here, which the unique index ignores.
        manager
            .create_index(
                Index::create()
                    .name("idx-accounts-debt_person-unique")
                    .table(Accounts::Table)
                    .col(Accounts::DebtPerson)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Categories::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Categories::Name).string().not_null())
                    .col(ColumnDef::new(Categories::Kind).string().not_null())
                    .col(ColumnDef::new(Categories::Icon).string())
                    .col(ColumnDef::new(Categories::Color).string())
                    .col(ColumnDef::new(Categories::ParentId).string())
                    .col(ColumnDef::new(Categories::IsDefault).boolean().not_null())
                    .to_owned(),
            )
            .await?;

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
                    .col(ColumnDef::new(Transactions::Kind).string().not_null())
                    .col(
                        ColumnDef::new(Transactions::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::Currency).string().not_null())
                    .col(ColumnDef::new(Transactions::CategoryId).string())
                    .col(ColumnDef::new(Transactions::AccountId).string().not_null())
                    .col(ColumnDef::new(Transactions::AccountToId).string())
                    .col(ColumnDef::new(Transactions::Description).string())
                    .col(ColumnDef::new(Transactions::Place).string())
                    .col(ColumnDef::new(Transactions::Person).string())
                    .col(ColumnDef::new(Transactions::Comment).string())
                    .col(ColumnDef::new(Transactions::DebtKind).string())
                    .col(
                        ColumnDef::new(Transactions::OccurredAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-occurred_at")
                    .table(Transactions::Table)
                    .col(Transactions::OccurredAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-account_id")
                    .table(Transactions::Table)
                    .col(Transactions::AccountId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await?;
        Ok(())
    }
}
