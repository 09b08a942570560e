use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Authenticated Router Module
///
/// Every route here sits behind the `auth_middleware` layer installed in
/// `create_router`: no session cookie (or a dead one) is a 401, a session whose
/// admin no longer matches is a 403. Handlers also take `AuthAdmin`, which
/// reuses the identity the layer already resolved.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // --- Session ---
        // GET /admin.current
        .route("/admin.current", get(handlers::current_admin))
        // POST /admin.logout
        // Drops the server-side session and expires the cookie.
        .route("/admin.logout", post(handlers::logout))
        // --- Themes ---
        // POST /theme.add {title}; 409 when the title exists.
        .route("/theme.add", post(handlers::add_theme))
        .route("/theme.list", get(handlers::list_themes))
        // --- Questions ---
        // POST /question.add {title, theme_id, answers}
        // Answers are validated before the theme and title checks.
        .route("/question.add", post(handlers::add_question))
        // GET /question.list?theme_id=
        .route("/question.list", get(handlers::list_questions))
}
