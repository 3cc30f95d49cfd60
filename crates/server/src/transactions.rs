//! Transactions API endpoints

use api_types::transaction::{
    DebtKind as ApiDebtKind, TransactionKind as ApiKind, TransactionNew, TransactionView,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    ServerError,
    accounts::{map_currency, map_currency_in},
    server::ServerState,
};

fn map_kind(kind: engine::TransactionKind) -> ApiKind {
    match kind {
        engine::TransactionKind::Income => ApiKind::Income,
        engine::TransactionKind::Expense => ApiKind::Expense,
        engine::TransactionKind::Transfer => ApiKind::Transfer,
        engine::TransactionKind::Debt => ApiKind::Debt,
    }
}

fn map_kind_in(kind: ApiKind) -> engine::TransactionKind {
    match kind {
        ApiKind::Income => engine::TransactionKind::Income,
        ApiKind::Expense => engine::TransactionKind::Expense,
        ApiKind::Transfer => engine::TransactionKind::Transfer,
        ApiKind::Debt => engine::TransactionKind::Debt,
    }
}

fn map_debt_kind(kind: engine::DebtKind) -> ApiDebtKind {
    match kind {
        engine::DebtKind::IGave => ApiDebtKind::IGave,
        engine::DebtKind::IReturned => ApiDebtKind::IReturned,
        engine::DebtKind::TheyGave => ApiDebtKind::TheyGave,
        engine::DebtKind::TheyReturned => ApiDebtKind::TheyReturned,
    }
}

fn map_debt_kind_in(kind: ApiDebtKind) -> engine::DebtKind {
    match kind {
        ApiDebtKind::IGave => engine::DebtKind::IGave,
        ApiDebtKind::IReturned => engine::DebtKind::IReturned,
        ApiDebtKind::TheyGave => engine::DebtKind::TheyGave,
        ApiDebtKind::TheyReturned => engine::DebtKind::TheyReturned,
    }
}

pub(crate) fn view(tx: engine::Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        kind: map_kind(tx.kind),
        amount_minor: tx.amount_minor,
        currency: map_currency(tx.currency),
        category_id: tx.category_id,
        account_id: tx.account_id,
        account_to_id: tx.account_to_id,
        description: tx.description,
        place: tx.place,
        person: tx.person,
        comment: tx.comment,
        debt_kind: tx.debt_kind.map(map_debt_kind),
        date: tx.occurred_at,
        created_at: tx.created_at,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<TransactionNew>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let mut cmd = engine::PostingCmd::new(
        map_kind_in(payload.kind),
        payload.account_id,
        payload.amount_minor,
        payload.date.unwrap_or_else(Utc::now),
    );
    if let Some(currency) = payload.currency {
        cmd = cmd.currency(map_currency_in(currency));
    }
    if let Some(category_id) = payload.category_id {
        cmd = cmd.category_id(category_id);
    }
    if let Some(account_to_id) = payload.account_to_id {
        cmd = cmd.account_to_id(account_to_id);
    }
    if let Some(description) = payload.description {
        cmd = cmd.description(description);
    }
    if let Some(place) = payload.place {
        cmd = cmd.place(place);
    }
    if let Some(person) = payload.person {
        cmd = cmd.person(person);
    }
    if let Some(comment) = payload.comment {
        cmd = cmd.comment(comment);
    }
    if let Some(debt_kind) = payload.debt_kind {
        cmd = cmd.debt_kind(map_debt_kind_in(debt_kind));
    }

    let tx = state.engine.post(cmd).await?;
    Ok((StatusCode::CREATED, Json(view(tx))))
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<Vec<TransactionView>>, ServerError> {
    let transactions = state.engine.list_transactions().await?;
    Ok(Json(transactions.into_iter().map(view).collect()))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransactionView>, ServerError> {
    let tx = state.engine.transaction(id).await?;
    Ok(Json(view(tx)))
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.remove_transaction(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
