use axum::{
    Router,
    routing::{get, patch, post},
};

use std::sync::Arc;

use assistant::Assistant;
use engine::Engine;

use crate::{accounts, ai, categories, transactions};

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    /// Absent when no classifier is configured; `/ai/parse` then reports a
    /// configuration failure instead of panicking.
    pub assistant: Option<Arc<Assistant>>,
}

impl ServerState {
    pub fn new(engine: Arc<Engine>, assistant: Option<Arc<Assistant>>) -> Self {
        Self { engine, assistant }
    }
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route(
            "/transactions",
            post(transactions::create).get(transactions::list),
        )
        .route(
            "/transactions/{id}",
            get(transactions::get).delete(transactions::remove),
        )
        .route("/accounts", post(accounts::create).get(accounts::list))
        .route("/accounts/regular/list", get(accounts::list_regular))
        .route("/accounts/debts/list", get(accounts::list_debts))
        .route(
            "/accounts/{id}",
            get(accounts::get).delete(accounts::remove),
        )
        .route("/accounts/{id}/close-debt", patch(accounts::close_debt))
        .route("/accounts/{id}/reopen-debt", patch(accounts::reopen_debt))
        .route(
            "/categories",
            post(categories::create).get(categories::list),
        )
        .route(
            "/categories/{id}",
            get(categories::get)
                .patch(categories::update)
                .delete(categories::remove),
        )
        .route("/ai/parse", post(ai::parse))
        .with_state(state)
}

pub async fn run(state: ServerState) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(state, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(state, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
