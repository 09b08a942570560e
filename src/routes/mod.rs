/// Router Module Index
///
/// Routing split by access level. The auth layer is applied to the
/// `authenticated` router as a whole in `create_router`.

/// Routes reachable without a session (health check, login).
pub mod public;

/// Routes behind the session + admin-identity gate.
pub mod authenticated;
