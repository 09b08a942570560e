use axum::extract::{FromRequest, FromRequestParts, Query};

use crate::error::AppError;

/// `axum::Json` with its rejection turned into [`AppError::BadRequest`], so a
/// malformed body or a missing field answers 400 with the usual error body
/// instead of axum's plain-text 415/422.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// `Query` counterpart of [`AppJson`]; `?theme_id=abc` becomes a 400.
#[derive(FromRequestParts)]
#[from_request(via(Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);
