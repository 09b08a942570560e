use crate::{
    AppState,
    auth::{self, AuthAdmin},
    error::{AppError, AppResult},
    extract::{AppJson, AppQuery},
    models::{
        AdminProfile, CreateQuestionRequest, CreateThemeRequest, LoginRequest, Question,
        QuestionListResponse, Theme, ThemeListResponse,
    },
    quiz,
};
use axum::{
    Json,
    extract::State,
    http::header::SET_COOKIE,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

// --- Filter Structs ---

/// QuestionFilter
///
/// Query parameters of `GET /question.list`. Without `theme_id` every question
/// is returned.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
pub struct QuestionFilter {
    /// Only return questions belonging to this theme.
    pub theme_id: Option<i32>,
}

// --- Handlers ---

/// login
///
/// [Public Route] Verifies the admin credentials and opens a server-side session.
/// The session id is returned in the `session_id` cookie.
#[utoipa::path(
    post,
    path = "/admin.login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AdminProfile),
        (status = 400, description = "Malformed body"),
        (status = 403, description = "Wrong email or password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> AppResult<Response> {
    let ttl_hours = state.config.session_ttl_hours;
    let (profile, session) =
        auth::login(state.repo.as_ref(), &payload.email, &payload.password, ttl_hours).await?;

    let max_age_secs = ttl_hours.checked_mul(3600).ok_or_else(|| {
        AppError::Internal(format!("session ttl of {ttl_hours}h is out of range"))
    })?;
    let cookie = auth::session_cookie(session.id, max_age_secs, state.config.secure_cookies());
    Ok(([(SET_COOKIE, cookie)], Json(profile)).into_response())
}

/// current_admin
///
/// [Authenticated Route] Returns the admin bound to the current session.
#[utoipa::path(
    get,
    path = "/admin.current",
    responses(
        (status = 200, description = "Current admin", body = AdminProfile),
        (status = 401, description = "No session"),
        (status = 403, description = "Session does not match an admin")
    )
)]
pub async fn current_admin(admin: AuthAdmin) -> Json<AdminProfile> {
    Json(admin.profile())
}

/// logout
///
/// [Authenticated Route] Deletes the server-side session and clears the cookie.
#[utoipa::path(
    post,
    path = "/admin.logout",
    responses(
        (status = 200, description = "Logged out"),
        (status = 401, description = "No session"),
        (status = 403, description = "Session does not match an admin")
    )
)]
pub async fn logout(admin: AuthAdmin, State(state): State<AppState>) -> AppResult<Response> {
    state.repo.delete_session(admin.session_id).await?;
    tracing::info!(admin_id = admin.id, "admin logged out");

    let cookie = auth::expired_session_cookie(state.config.secure_cookies());
    Ok(([(SET_COOKIE, cookie)], Json(serde_json::json!({}))).into_response())
}

/// add_theme
///
/// [Authenticated Route] Creates a theme. Titles are unique.
#[utoipa::path(
    post,
    path = "/theme.add",
    request_body = CreateThemeRequest,
    responses(
        (status = 200, description = "Created", body = Theme),
        (status = 400, description = "Malformed body"),
        (status = 401, description = "No session"),
        (status = 403, description = "Session does not match an admin"),
        (status = 409, description = "Title already exists")
    )
)]
pub async fn add_theme(
    _admin: AuthAdmin,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateThemeRequest>,
) -> AppResult<Json<Theme>> {
    let theme = quiz::create_theme(state.repo.as_ref(), &payload.title).await?;
    Ok(Json(theme))
}

/// list_themes
///
/// [Authenticated Route] Lists every theme.
#[utoipa::path(
    get,
    path = "/theme.list",
    responses(
        (status = 200, description = "All themes", body = ThemeListResponse),
        (status = 401, description = "No session"),
        (status = 403, description = "Session does not match an admin")
    )
)]
pub async fn list_themes(
    _admin: AuthAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<ThemeListResponse>> {
    let themes = quiz::list_themes(state.repo.as_ref()).await?;
    Ok(Json(ThemeListResponse { themes }))
}

/// add_question
///
/// [Authenticated Route] Creates a question together with its answers. The
/// response echoes the input plus the assigned `id`.
#[utoipa::path(
    post,
    path = "/question.add",
    request_body = CreateQuestionRequest,
    responses(
        (status = 200, description = "Created", body = Question),
        (status = 400, description = "Malformed body or invalid answers"),
        (status = 401, description = "No session"),
        (status = 403, description = "Session does not match an admin"),
        (status = 404, description = "Theme not found"),
        (status = 409, description = "Title already exists")
    )
)]
pub async fn add_question(
    _admin: AuthAdmin,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateQuestionRequest>,
) -> AppResult<Json<Question>> {
    let question = quiz::create_question(state.repo.as_ref(), &payload).await?;
    Ok(Json(question))
}

/// list_questions
///
/// [Authenticated Route] Lists questions with their answers, optionally
/// restricted to one theme.
#[utoipa::path(
    get,
    path = "/question.list",
    params(QuestionFilter),
    responses(
        (status = 200, description = "Questions", body = QuestionListResponse),
        (status = 400, description = "theme_id is not an integer"),
        (status = 401, description = "No session"),
        (status = 403, description = "Session does not match an admin")
    )
)]
pub async fn list_questions(
    _admin: AuthAdmin,
    State(state): State<AppState>,
    AppQuery(filter): AppQuery<QuestionFilter>,
) -> AppResult<Json<QuestionListResponse>> {
    let questions = quiz::list_questions(state.repo.as_ref(), filter.theme_id).await?;
    Ok(Json(QuestionListResponse { questions }))
}
