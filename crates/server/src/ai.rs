//! Natural-language input endpoint

use api_types::assistant::{ParseRequest, ParseResponse};
use axum::{Json, extract::State};

use assistant::ParseOutcome;

use crate::{ServerError, server::ServerState, transactions};

fn empty_response() -> ParseResponse {
    ParseResponse {
        success: false,
        transactions: None,
        message: None,
        needs_clarification: None,
        question: None,
        error: None,
    }
}

pub async fn parse(
    State(state): State<ServerState>,
    Json(payload): Json<ParseRequest>,
) -> Result<Json<ParseResponse>, ServerError> {
    let Some(assistant) = state.assistant.as_ref() else {
        return Ok(Json(ParseResponse {
            error: Some(
                "The assistant is not configured. Add an [assistant] section to settings.toml."
                    .to_string(),
            ),
            ..empty_response()
        }));
    };

    let outcome = assistant.parse(&payload.text, payload.account_id).await?;
    let response = match outcome {
        ParseOutcome::Created {
            transactions: created,
            message,
        } => ParseResponse {
            success: true,
            transactions: Some(created.into_iter().map(transactions::view).collect()),
            message: Some(message),
            ..empty_response()
        },
        ParseOutcome::NeedsClarification { question } => ParseResponse {
            needs_clarification: Some(true),
            question: Some(question),
            ..empty_response()
        },
        ParseOutcome::Failed { error } => ParseResponse {
            error: Some(error),
            ..empty_response()
        },
    };

    Ok(Json(response))
}
