use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::error::StoreError;

pub const MISSING_TITLE: &str = "missing required field title";
pub const MISSING_COMMENT: &str = "missing required field comment";
pub const NO_BOOK: &str = "no book exists";
pub const DELETED: &str = "delete successful";
pub const DELETED_ALL: &str = "complete delete successful";

/// What a book handler answers with. Expected outcomes (a record, a missing
/// field, an unknown book) are all `200 OK` and are told apart by the body:
/// JSON for records, plain text for status messages.
#[derive(Debug)]
pub enum Reply {
    Json(Value),
    Text(&'static str),
    Failure(StoreError),
}

impl Reply {
    pub fn json<T: serde::Serialize>(body: &T) -> Self {
        match serde_json::to_value(body) {
            Ok(value) => Reply::Json(value),
            Err(e) => Reply::Failure(StoreError::Serialize(e)),
        }
    }
}

impl From<StoreError> for Reply {
    fn from(err: StoreError) -> Self {
        Reply::Failure(err)
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match self {
            Reply::Json(value) => (StatusCode::OK, Json(value)).into_response(),
            Reply::Text(msg) => (StatusCode::OK, msg).into_response(),
            Reply::Failure(err) => crate::internal_error(&err).into_response(),
        }
    }
}
