//! xAPI statement routes
//!
//! # Note
//!
//! This API is a stub. Launched xAPI content posts its statements here;
//! they are logged and acknowledged but not stored.

use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Path},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;

use crate::state::AppState;

/// Create the xAPI router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:course_id", post(receive_statement).put(receive_statement))
        .route(
            "/:course_id/*resource",
            post(receive_statement).put(receive_statement),
        )
        .layer(DefaultBodyLimit::max(50 * 1024 * 1024))
}

#[derive(Debug, Serialize)]
pub struct StatementAck {
    pub success: bool,
    pub message: &'static str,
}

/// POST|PUT /xapi/:course_id[/*resource]
async fn receive_statement(
    Path(params): Path<HashMap<String, String>>,
    body: Bytes,
) -> Json<StatementAck> {
    let course_id = params.get("course_id").map(String::as_str).unwrap_or("");
    let resource = params.get("resource").map(String::as_str).unwrap_or("");

    match serde_json::from_slice::<Value>(&body) {
        Ok(Value::Array(statements)) => {
            tracing::info!(
                course_id = %course_id,
                resource = %resource,
                count = statements.len(),
                "[xAPI] Received statement batch"
            );
        }
        Ok(statement) => {
            tracing::info!(
                course_id = %course_id,
                resource = %resource,
                verb = %verb_display(&statement),
                "[xAPI] Received statement"
            );
        }
        Err(e) => {
            tracing::debug!(
                course_id = %course_id,
                resource = %resource,
                "[xAPI] Received non-JSON body: {}",
                e
            );
        }
    }

    Json(StatementAck {
        success: true,
        message: "Statement received",
    })
}

/// Human-readable verb of a statement, for logging
fn verb_display(statement: &Value) -> String {
    let verb = &statement["verb"];
    match &verb["display"] {
        Value::Object(display) => display
            .get("en-US")
            .or_else(|| display.values().next())
            .and_then(Value::as_str)
            .unwrap_or("No verb")
            .to_string(),
        _ => verb["id"].as_str().unwrap_or("No verb").to_string(),
    }
}
