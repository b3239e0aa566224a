mod calendar;
mod healthcheck;
mod reminders;
mod todos;

use salvo::Router;

use crate::middleware::auth::AuthMiddleware;

// Re-export route constants from core
pub use pawtrack_core::constants::{
    API_ROUTE_COMPONENT, API_ROUTE_PREFIX, CALENDAR_ROUTE_COMPONENT, REMINDERS_ROUTE_COMPONENT,
    TODOS_ROUTE_COMPONENT,
};

/// ## Summary
/// Constructs the main API router with all handlers.
#[must_use]
pub fn routes() -> Router {
    Router::with_path(API_ROUTE_COMPONENT)
        .push(healthcheck::routes())
        .push(
            Router::new()
                .hoop(AuthMiddleware)
                .push(reminders::routes())
                .push(todos::routes())
                .push(calendar::routes()),
        )
}
