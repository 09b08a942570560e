use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::CookieJar;
use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Admin, AdminProfile, Session},
    password,
    repository::{Repository, RepositoryState},
};

/// Name of the cookie carrying the server-side session id.
pub const SESSION_COOKIE: &str = "session_id";

/// AdminSession
///
/// The "session required" half of the auth gate. Resolves the `session_id`
/// cookie to a live row in `admin_sessions`.
///
/// Rejection: 401 when the cookie is missing, is not a UUID, or names no
/// unexpired session. A request without the cookie never reaches the store.
#[derive(Debug, Clone)]
pub struct AdminSession(pub Session);

impl<S> FromRequestParts<S> for AdminSession
where
    S: Send + Sync,
    RepositoryState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let session_id = jar
            .get(SESSION_COOKIE)
            .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
            .ok_or(AppError::Unauthorized)?;

        let repo = RepositoryState::from_ref(state);
        let session = repo
            .get_session(session_id)
            .await?
            .ok_or(AppError::Unauthorized)?;

        Ok(AdminSession(session))
    }
}

/// AuthAdmin
///
/// The full auth gate: a live session (401 otherwise) whose stored identity
/// still matches an admin record (403 otherwise). Handlers take it as their
/// first argument; once resolved by the route layer it is cached in the request
/// extensions so the lookup runs once per request.
#[derive(Debug, Clone)]
pub struct AuthAdmin {
    pub id: i32,
    pub email: String,
    pub session_id: Uuid,
}

impl AuthAdmin {
    pub fn profile(&self) -> AdminProfile {
        AdminProfile {
            id: self.id,
            email: self.email.clone(),
        }
    }
}

impl<S> FromRequestParts<S> for AuthAdmin
where
    S: Send + Sync,
    RepositoryState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(admin) = parts.extensions.get::<AuthAdmin>() {
            return Ok(admin.clone());
        }

        let AdminSession(session) = AdminSession::from_request_parts(parts, state).await?;
        let repo = RepositoryState::from_ref(state);

        let admin = repo.get_admin_by_email(&session.email).await?;
        match admin {
            Some(admin) if admin.email == session.email && admin.id == session.admin_id => {
                Ok(AuthAdmin {
                    id: admin.id,
                    email: admin.email,
                    session_id: session.id,
                })
            }
            _ => {
                tracing::warn!(
                    session_id = %session.id,
                    email = %session.email,
                    "session does not match any admin"
                );
                Err(AppError::Forbidden)
            }
        }
    }
}

/// login
///
/// Checks the credentials and opens a session lasting `ttl_hours`. Unknown email
/// and wrong password are indistinguishable to the caller (both 403).
pub async fn login(
    repo: &dyn Repository,
    email: &str,
    password: &str,
    ttl_hours: i64,
) -> AppResult<(AdminProfile, Session)> {
    let Some(admin) = repo.get_admin_by_email(email).await? else {
        tracing::info!(%email, "login rejected: unknown admin");
        return Err(AppError::Forbidden);
    };

    let valid = password::verify_password(password, &admin.password_hash).map_err(|e| {
        tracing::error!(admin_id = admin.id, error = %e, "stored password hash is unreadable");
        AppError::Internal("stored password hash is unreadable".to_string())
    })?;
    if !valid {
        tracing::info!(%email, "login rejected: wrong password");
        return Err(AppError::Forbidden);
    }

    let expires_at = Duration::try_hours(ttl_hours)
        .and_then(|ttl| Utc::now().checked_add_signed(ttl))
        .ok_or_else(|| AppError::Internal(format!("session ttl of {ttl_hours}h is out of range")))?;

    let session = repo.create_session(&admin.profile(), expires_at).await?;
    tracing::info!(admin_id = session.admin_id, "admin logged in");

    Ok((session.admin(), session))
}

/// ensure_admin
///
/// Startup bootstrap: creates the configured admin unless one with that email
/// already exists. An existing record is left untouched, password included.
pub async fn ensure_admin(repo: &dyn Repository, email: &str, password: &str) -> AppResult<Admin> {
    if let Some(admin) = repo.get_admin_by_email(email).await? {
        tracing::debug!(admin_id = admin.id, "admin already present");
        return Ok(admin);
    }

    let hash = password::hash_password(password)
        .map_err(|e| AppError::Internal(format!("failed to hash admin password: {e}")))?;
    let admin = repo.create_admin(email, &hash).await?;
    tracing::info!(admin_id = admin.id, %email, "admin account created");
    Ok(admin)
}

/// `Set-Cookie` value opening a session.
pub fn session_cookie(session_id: Uuid, max_age_secs: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{SESSION_COOKIE}={session_id}; HttpOnly; Max-Age={max_age_secs}; Path=/; SameSite=Lax"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that makes the browser drop the session cookie.
pub fn expired_session_cookie(secure: bool) -> String {
    let mut cookie = format!("{SESSION_COOKIE}=; HttpOnly; Max-Age=0; Path=/; SameSite=Lax");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}
