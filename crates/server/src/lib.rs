use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{ServerState, router, run, run_with_listener, spawn_with_listener};

mod accounts;
mod ai;
mod categories;
mod server;
mod transactions;

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

/// Error body: a machine-readable kind plus a human message.
#[derive(Serialize)]
struct Error {
    kind: &'static str,
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::NotFound(_) => StatusCode::NOT_FOUND,
        EngineError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn kind_for_engine_error(err: &EngineError) -> &'static str {
    match err {
        EngineError::NotFound(_) => "not_found",
        EngineError::InvalidRequest(_) => "invalid_request",
        EngineError::Database(_) => "internal",
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, kind, error) = match self {
            ServerError::Engine(err) => (
                status_for_engine_error(&err),
                kind_for_engine_error(&err),
                message_for_engine_error(err),
            ),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, "invalid_request", err),
        };

        (status, Json(Error { kind, error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::NotFound("account x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn engine_invalid_request_maps_to_400() {
        let res =
            ServerError::from(EngineError::InvalidRequest("bad".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn database_errors_map_to_500_without_leaking_details() {
        let res = ServerError::from(EngineError::Database(sea_orm::DbErr::Custom(
            "secret".to_string(),
        )))
        .into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
