use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    Form, Json, async_trait,
    extract::{FromRequest, Path, Request, State},
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use tracing::info;

use crate::api::{DELETED, DELETED_ALL, MISSING_COMMENT, MISSING_TITLE, NO_BOOK, Reply};
use crate::db::Database;
use crate::id::BookId;
use crate::model::{NewBook, NewComment};

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        AppState { db: Arc::new(db) }
    }
}

/// Request body sent either as JSON or as an urlencoded form. Anything
/// else, including a body that does not decode, is read as the empty input so
/// the handler answers with its missing field message.
#[derive(Debug)]
pub struct Payload<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned + Default + Send,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("application/json") {
            return Ok(match Json::<T>::from_request(req, state).await {
                Ok(Json(body)) => Payload(body),
                Err(e) => {
                    info!(error = %e, "unreadable JSON body, using empty input");
                    Payload(T::default())
                }
            });
        }

        if content_type.starts_with("application/x-www-form-urlencoded") {
            return Ok(match Form::<T>::from_request(req, state).await {
                Ok(Form(body)) => Payload(body),
                Err(e) => {
                    info!(error = %e, "unreadable form body, using empty input");
                    Payload(T::default())
                }
            });
        }

        if !content_type.is_empty() {
            info!(content_type = %content_type, "unsupported body type, using empty input");
        }
        Ok(Payload(T::default()))
    }
}

fn parse_id(raw: &str) -> Option<BookId> {
    match BookId::parse(raw) {
        Ok(id) => Some(id),
        Err(e) => {
            info!(error = %e, "treating malformed id as unknown book");
            None
        }
    }
}

pub async fn healthcheck(State(state): State<AppState>) -> Response {
    match state.db.books().count().await {
        Ok(books) => Json(serde_json::json!({ "status": "ok", "books": books })).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "healthcheck failed");
            Reply::Failure(e).into_response()
        }
    }
}

pub async fn list_books(State(state): State<AppState>) -> Reply {
    match state.db.books().list().await {
        Ok(books) => {
            info!(count = books.len(), "listed books");
            Reply::json(&books)
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to list books");
            e.into()
        }
    }
}

pub async fn create_book(State(state): State<AppState>, Payload(input): Payload<NewBook>) -> Reply {
    let Some(title) = input.title() else {
        info!("create book rejected, no title");
        return Reply::Text(MISSING_TITLE);
    };

    match state.db.books().create(&title).await {
        Ok(book) => {
            info!(id = %book.id, created_at = ?book.id.timestamp(), "created book");
            Reply::json(&book)
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to create book");
            e.into()
        }
    }
}

pub async fn delete_books(State(state): State<AppState>) -> Reply {
    match state.db.books().delete_all().await {
        Ok(removed) => {
            info!(removed, "deleted all books");
            Reply::Text(DELETED_ALL)
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to delete books");
            e.into()
        }
    }
}

pub async fn get_book(State(state): State<AppState>, Path(id): Path<String>) -> Reply {
    let Some(id) = parse_id(&id) else {
        return Reply::Text(NO_BOOK);
    };

    match state.db.books().get(&id).await {
        Ok(Some(book)) => Reply::json(&book),
        Ok(None) => {
            info!(%id, "book not found");
            Reply::Text(NO_BOOK)
        }
        Err(e) => {
            tracing::error!(error = %e, %id, "failed to get book");
            e.into()
        }
    }
}

pub async fn add_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Payload(input): Payload<NewComment>,
) -> Reply {
    let Some(comment) = input.comment() else {
        info!(%id, "comment rejected, no comment");
        return Reply::Text(MISSING_COMMENT);
    };
    let Some(id) = parse_id(&id) else {
        return Reply::Text(NO_BOOK);
    };

    match state.db.books().append_comment(&id, &comment).await {
        Ok(Some(book)) => {
            info!(%id, comments = book.comments.len(), "added comment");
            Reply::json(&book)
        }
        Ok(None) => {
            info!(%id, "book not found");
            Reply::Text(NO_BOOK)
        }
        Err(e) => {
            tracing::error!(error = %e, %id, "failed to add comment");
            e.into()
        }
    }
}

pub async fn delete_book(State(state): State<AppState>, Path(id): Path<String>) -> Reply {
    let Some(id) = parse_id(&id) else {
        return Reply::Text(NO_BOOK);
    };

    match state.db.books().delete(&id).await {
        Ok(true) => {
            info!(%id, "deleted book");
            Reply::Text(DELETED)
        }
        Ok(false) => {
            info!(%id, "book not found");
            Reply::Text(NO_BOOK)
        }
        Err(e) => {
            tracing::error!(error = %e, %id, "failed to delete book");
            e.into()
        }
    }
}
