use chrono::Utc;
use sea_orm::{Database, DatabaseConnection};

use engine::{
    AccountKind, CategoryKind, Currency, DebtKind, Engine, EngineError, NewAccount, NewCategory,
    PostingCmd, TransactionKind,
};
use migration::MigratorTrait;
use uuid::Uuid;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db.clone()).build().await.unwrap();
    (engine, db)
}

async fn cash_account(engine: &Engine, name: &str, balance_minor: i64) -> engine::Account {
    engine
        .create_account(NewAccount::new(name, AccountKind::Cash).balance_minor(balance_minor))
        .await
        .unwrap()
}

async fn expense_category(engine: &Engine, name: &str) -> engine::Category {
    engine
        .create_category(NewCategory::new(name, CategoryKind::Expense))
        .await
        .unwrap()
}

#[tokio::test]
async fn transfer_conserves_money_across_accounts() {
    let (engine, _db) = engine_with_db().await;
    let from = cash_account(&engine, "Cash", 10_000).await;
    let to = cash_account(&engine, "Savings", 2_500).await;

    engine
        .post(
            PostingCmd::new(TransactionKind::Transfer, from.id, 3_000, Utc::now())
                .account_to_id(to.id),
        )
        .await
        .unwrap();

    let from_after = engine.account(from.id).await.unwrap();
    let to_after = engine.account(to.id).await.unwrap();
    assert_eq!(from_after.balance_minor, 7_000);
    assert_eq!(to_after.balance_minor, 5_500);
    assert_eq!(
        from_after.balance_minor + to_after.balance_minor,
        from.balance_minor + to.balance_minor
    );
}

#[tokio::test]
async fn debt_signs_are_symmetric_for_a_person() {
    let (engine, _db) = engine_with_db().await;
    let main = cash_account(&engine, "Main", 50_000).await;

    engine
        .post(
            PostingCmd::new(TransactionKind::Debt, main.id, 5_000, Utc::now())
                .person("Ivan")
                .debt_kind(DebtKind::IGave),
        )
        .await
        .unwrap();
    engine
        .post(
            PostingCmd::new(TransactionKind::Debt, main.id, 5_000, Utc::now())
                .person("Ivan")
                .debt_kind(DebtKind::TheyReturned),
        )
        .await
        .unwrap();

    let debt = engine
        .find_or_create_debt_account("Ivan", Currency::Tjs)
        .await
        .unwrap();
    assert_eq!(debt.balance_minor, 0);
    assert_eq!(engine.account(main.id).await.unwrap().balance_minor, 50_000);
}

#[tokio::test]
async fn debt_resolver_is_idempotent() {
    let (engine, _db) = engine_with_db().await;

    let first = engine
        .find_or_create_debt_account("Zarina", Currency::Tjs)
        .await
        .unwrap();
    let second = engine
        .find_or_create_debt_account("Zarina", Currency::Tjs)
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(engine.list_debt_accounts().await.unwrap().len(), 1);
}

#[tokio::test]
async fn debt_resolver_finds_hidden_accounts() {
    let (engine, _db) = engine_with_db().await;

    let debt = engine
        .find_or_create_debt_account("Rustam", Currency::Tjs)
        .await
        .unwrap();
    engine.set_account_hidden(debt.id, true).await.unwrap();

    let resolved = engine
        .find_or_create_debt_account("Rustam", Currency::Tjs)
        .await
        .unwrap();
    assert_eq!(resolved.id, debt.id);
    assert!(resolved.is_hidden);
}

#[tokio::test]
async fn transfer_without_target_is_rejected_without_side_effects() {
    let (engine, _db) = engine_with_db().await;
    let from = cash_account(&engine, "Cash", 10_000).await;

    let err = engine
        .post(PostingCmd::new(
            TransactionKind::Transfer,
            from.id,
            1_000,
            Utc::now(),
        ))
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::InvalidRequest(_)));
    assert_eq!(engine.account(from.id).await.unwrap().balance_minor, 10_000);
    assert!(engine.list_transactions().await.unwrap().is_empty());
}

#[tokio::test]
async fn transfer_involving_debt_account_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    let from = cash_account(&engine, "Cash", 10_000).await;
    let debt = engine
        .find_or_create_debt_account("Ivan", Currency::Tjs)
        .await
        .unwrap();

    let err = engine
        .post(
            PostingCmd::new(TransactionKind::Transfer, from.id, 1_000, Utc::now())
                .account_to_id(debt.id),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::InvalidRequest(_)));
    assert!(engine.list_transactions().await.unwrap().is_empty());
}

#[tokio::test]
async fn posting_against_unknown_account_is_not_found() {
    let (engine, _db) = engine_with_db().await;
    let category = expense_category(&engine, "Food").await;

    let err = engine
        .post(
            PostingCmd::new(TransactionKind::Expense, Uuid::new_v4(), 1_000, Utc::now())
                .category_id(category.id),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::NotFound(_)));
    assert!(engine.list_transactions().await.unwrap().is_empty());
}

#[tokio::test]
async fn income_and_expense_require_a_category() {
    let (engine, _db) = engine_with_db().await;
    let account = cash_account(&engine, "Cash", 10_000).await;

    for kind in [TransactionKind::Income, TransactionKind::Expense] {
        let err = engine
            .post(PostingCmd::new(kind, account.id, 1_000, Utc::now()))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidRequest(_)));
    }
    assert!(engine.list_transactions().await.unwrap().is_empty());
}

#[tokio::test]
async fn seeding_runs_once_per_empty_store() {
    let (engine, db) = engine_with_db().await;

    engine.seed_defaults().await.unwrap();
    let accounts_after_first = engine.list_accounts().await.unwrap().len();
    let categories_after_first = engine.list_categories().await.unwrap().len();
    assert!(accounts_after_first > 0);
    assert!(categories_after_first > 0);

    // A second startup against the same store must not duplicate anything.
    let engine_again = Engine::builder().database(db).build().await.unwrap();
    engine_again.seed_defaults().await.unwrap();
    assert_eq!(
        engine_again.list_accounts().await.unwrap().len(),
        accounts_after_first
    );
    assert_eq!(
        engine_again.list_categories().await.unwrap().len(),
        categories_after_first
    );
}

#[tokio::test]
async fn expense_settles_against_the_account() {
    let (engine, _db) = engine_with_db().await;
    let cash = cash_account(&engine, "Cash", 10_000).await;
    let food = expense_category(&engine, "Food").await;

    let tx = engine
        .post(
            PostingCmd::new(TransactionKind::Expense, cash.id, 2_200, Utc::now())
                .category_id(food.id)
                .description("americano"),
        )
        .await
        .unwrap();

    assert_eq!(tx.kind, TransactionKind::Expense);
    assert_eq!(tx.amount_minor, 2_200);
    assert_eq!(tx.category_id, Some(food.id));
    assert_eq!(engine.account(cash.id).await.unwrap().balance_minor, 7_800);

    let stored = engine.transaction(tx.id).await.unwrap();
    assert_eq!(stored.id, tx.id);
    assert_eq!(stored.amount_minor, 2_200);
    assert_eq!(stored.description.as_deref(), Some("americano"));
}

#[tokio::test]
async fn first_debt_posting_provisions_the_person_account() {
    let (engine, _db) = engine_with_db().await;
    let main = cash_account(&engine, "Main", 50_000).await;

    let tx = engine
        .post(
            PostingCmd::new(TransactionKind::Debt, main.id, 5_000, Utc::now())
                .person("Ivan")
                .debt_kind(DebtKind::IGave),
        )
        .await
        .unwrap();

    let debts = engine.list_debt_accounts().await.unwrap();
    assert_eq!(debts.len(), 1);
    let debt = &debts[0];
    assert_eq!(debt.debt_person.as_deref(), Some("Ivan"));
    assert_eq!(debt.balance_minor, 5_000);
    assert_eq!(tx.account_to_id, Some(debt.id));
    assert_eq!(engine.account(main.id).await.unwrap().balance_minor, 45_000);
}

#[tokio::test]
async fn removing_a_transaction_reverses_its_balance_effects() {
    let (engine, _db) = engine_with_db().await;
    let from = cash_account(&engine, "Cash", 10_000).await;
    let to = cash_account(&engine, "Savings", 0).await;

    let tx = engine
        .post(
            PostingCmd::new(TransactionKind::Transfer, from.id, 4_000, Utc::now())
                .account_to_id(to.id),
        )
        .await
        .unwrap();

    engine.remove_transaction(tx.id).await.unwrap();

    assert_eq!(engine.account(from.id).await.unwrap().balance_minor, 10_000);
    assert_eq!(engine.account(to.id).await.unwrap().balance_minor, 0);
    assert!(engine.list_transactions().await.unwrap().is_empty());
    assert_eq!(
        engine.transaction(tx.id).await.unwrap_err(),
        EngineError::NotFound(format!("transaction {}", tx.id))
    );
}

#[tokio::test]
async fn hiding_a_regular_account_is_not_found() {
    let (engine, _db) = engine_with_db().await;
    let cash = cash_account(&engine, "Cash", 0).await;

    let err = engine.set_account_hidden(cash.id, true).await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[tokio::test]
async fn account_lists_partition_on_the_debt_flag() {
    let (engine, _db) = engine_with_db().await;
    let cash = cash_account(&engine, "Cash", 0).await;
    let debt = engine
        .find_or_create_debt_account("Ivan", Currency::Tjs)
        .await
        .unwrap();

    let regular = engine.list_regular_accounts().await.unwrap();
    assert_eq!(regular.len(), 1);
    assert_eq!(regular[0].id, cash.id);

    let debts = engine.list_debt_accounts().await.unwrap();
    assert_eq!(debts.len(), 1);
    assert_eq!(debts[0].id, debt.id);
}

#[tokio::test]
async fn category_search_is_case_insensitive_and_partial() {
    let (engine, _db) = engine_with_db().await;
    expense_category(&engine, "Cafes & restaurants").await;
    expense_category(&engine, "Groceries").await;

    let matches = engine.find_categories_by_name("RESTAUR").await.unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].name, "Cafes & restaurants");

    assert!(engine.find_categories_by_name("  ").await.unwrap().is_empty());
}

#[tokio::test]
async fn adjust_balance_is_cumulative() {
    let (engine, _db) = engine_with_db().await;
    let cash = cash_account(&engine, "Cash", 1_000).await;

    engine.adjust_balance(cash.id, 500).await.unwrap();
    let updated = engine.adjust_balance(cash.id, -200).await.unwrap();
    assert_eq!(updated.balance_minor, 1_300);

    let err = engine.adjust_balance(Uuid::new_v4(), 100).await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}
