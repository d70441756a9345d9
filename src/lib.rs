use axum::http::StatusCode;
use std::error::Error;

pub mod api;
pub mod books;
pub mod config;
pub mod db;
pub mod error;
pub mod handler;
pub mod id;
pub mod model;
pub mod routes;

pub fn internal_error(err: &(dyn Error)) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, unpack_error(err))
}

pub fn unpack_error(err: &(dyn Error)) -> String {
    let mut parts = Vec::new();
    parts.push(err.to_string());
    let mut current = err.source();
    while let Some(source) = current {
        parts.push(source.to_string());
        current = source.source();
    }
    parts.join(": ")
}
