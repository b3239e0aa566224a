/// Route component constants shared across crates
pub const API_ROUTE_COMPONENT: &str = "api";
pub const API_ROUTE_PREFIX: &str = "/api";

pub const REMINDERS_ROUTE_COMPONENT: &str = "reminders";
pub const TODOS_ROUTE_COMPONENT: &str = "todos";
pub const CALENDAR_ROUTE_COMPONENT: &str = "calendar";

/// Default page size for calendar listings.
pub const DEFAULT_CALENDAR_LIMIT: usize = 100;
/// Page size used by the uncapped derived views (`today`, `week`).
pub const DERIVED_VIEW_LIMIT: usize = 1000;
