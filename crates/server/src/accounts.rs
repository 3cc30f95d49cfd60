//! Accounts API endpoints

use api_types::account::{AccountKind as ApiAccountKind, AccountNew, AccountView};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

pub(crate) fn map_currency(currency: engine::Currency) -> api_types::Currency {
    match currency {
        engine::Currency::Tjs => api_types::Currency::Tjs,
        engine::Currency::Rub => api_types::Currency::Rub,
        engine::Currency::Usd => api_types::Currency::Usd,
        engine::Currency::Kzt => api_types::Currency::Kzt,
    }
}

pub(crate) fn map_currency_in(currency: api_types::Currency) -> engine::Currency {
    match currency {
        api_types::Currency::Tjs => engine::Currency::Tjs,
        api_types::Currency::Rub => engine::Currency::Rub,
        api_types::Currency::Usd => engine::Currency::Usd,
        api_types::Currency::Kzt => engine::Currency::Kzt,
    }
}

fn map_kind(kind: engine::AccountKind) -> ApiAccountKind {
    match kind {
        engine::AccountKind::Cash => ApiAccountKind::Cash,
        engine::AccountKind::Card => ApiAccountKind::Card,
        engine::AccountKind::Bank => ApiAccountKind::Bank,
        engine::AccountKind::Savings => ApiAccountKind::Savings,
        engine::AccountKind::Debt => ApiAccountKind::Debt,
    }
}

fn map_kind_in(kind: ApiAccountKind) -> engine::AccountKind {
    match kind {
        ApiAccountKind::Cash => engine::AccountKind::Cash,
        ApiAccountKind::Card => engine::AccountKind::Card,
        ApiAccountKind::Bank => engine::AccountKind::Bank,
        ApiAccountKind::Savings => engine::AccountKind::Savings,
        ApiAccountKind::Debt => engine::AccountKind::Debt,
    }
}

fn view(account: engine::Account) -> AccountView {
    AccountView {
        id: account.id,
        name: account.name,
        kind: map_kind(account.kind),
        balance_minor: account.balance_minor,
        currency: map_currency(account.currency),
        color: account.color,
        icon: account.icon,
        is_debt: account.is_debt,
        is_hidden: account.is_hidden,
        debt_person: account.debt_person,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<AccountNew>,
) -> Result<(StatusCode, Json<AccountView>), ServerError> {
    let mut cmd = engine::NewAccount::new(payload.name, map_kind_in(payload.kind));
    if let Some(balance_minor) = payload.balance_minor {
        cmd = cmd.balance_minor(balance_minor);
    }
    if let Some(currency) = payload.currency {
        cmd = cmd.currency(map_currency_in(currency));
    }
    if let Some(color) = payload.color {
        cmd = cmd.color(color);
    }
    if let Some(icon) = payload.icon {
        cmd = cmd.icon(icon);
    }

    let account = state.engine.create_account(cmd).await?;
    Ok((StatusCode::CREATED, Json(view(account))))
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<Vec<AccountView>>, ServerError> {
    let accounts = state.engine.list_accounts().await?;
    Ok(Json(accounts.into_iter().map(view).collect()))
}

pub async fn list_regular(
    State(state): State<ServerState>,
) -> Result<Json<Vec<AccountView>>, ServerError> {
    let accounts = state.engine.list_regular_accounts().await?;
    Ok(Json(accounts.into_iter().map(view).collect()))
}

pub async fn list_debts(
    State(state): State<ServerState>,
) -> Result<Json<Vec<AccountView>>, ServerError> {
    let accounts = state.engine.list_debt_accounts().await?;
    Ok(Json(accounts.into_iter().map(view).collect()))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AccountView>, ServerError> {
    let account = state.engine.account(id).await?;
    Ok(Json(view(account)))
}

pub async fn close_debt(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AccountView>, ServerError> {
    let account = state.engine.set_account_hidden(id, true).await?;
    Ok(Json(view(account)))
}

pub async fn reopen_debt(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AccountView>, ServerError> {
    let account = state.engine.set_account_hidden(id, false).await?;
    Ok(Json(view(account)))
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.remove_account(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
