//! Calendar endpoints: the merged listing and its derived views.

use chrono::{DateTime, Utc};
use salvo::writing::Json;
use salvo::{Depot, Request, Response, Router, handler};

use pawtrack_core::constants::CALENDAR_ROUTE_COMPONENT;
use pawtrack_core::error::CoreError;
use pawtrack_core::types::{ItemKind, ItemStatus};
use pawtrack_service::calendar::CalendarQuery;

use crate::error::{AppResult, render_error};
use crate::middleware::auth::require_user;
use crate::state::get_services_from_depot;

fn parse_instant(field: &str, raw: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| CoreError::ValidationError(format!("invalid {field}: {err}")).into())
}

/// Parses and validates the query string. Unknown enum values are rejected
/// here, before any store is queried.
fn parse_calendar_query(req: &Request) -> AppResult<CalendarQuery> {
    let mut query = CalendarQuery::default();

    if let Some(raw) = req.query::<String>("item_kind") {
        query.item_kind = Some(raw.parse::<ItemKind>()?);
    }
    if let Some(raw) = req.query::<String>("status") {
        query.status = Some(raw.parse::<ItemStatus>()?);
    }
    if let Some(raw) = req.query::<String>("start_date") {
        query.start_date = Some(parse_instant("start_date", &raw)?);
    }
    if let Some(raw) = req.query::<String>("end_date") {
        query.end_date = Some(parse_instant("end_date", &raw)?);
    }
    if let Some(raw) = req.query::<String>("limit") {
        let limit = raw
            .parse::<usize>()
            .map_err(|err| CoreError::ValidationError(format!("invalid limit: {err}")))?;
        query.limit = Some(limit);
    }
    if let Some(raw) = req.query::<String>("offset") {
        query.offset = raw
            .parse::<usize>()
            .map_err(|err| CoreError::ValidationError(format!("invalid offset: {err}")))?;
    }

    Ok(query)
}

/// ## Summary
/// GET /api/calendar - the merged, sorted, paginated calendar.
///
/// Query parameters: `item_kind`, `status`, `start_date`/`end_date`
/// (RFC 3339), `limit`, `offset`.
///
/// ## Errors
/// Returns HTTP 400 for unknown filter values or malformed dates.
#[handler]
async fn list_calendar(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let Some(user_id) = require_user(depot, res) else {
        return;
    };
    let services = match get_services_from_depot(depot) {
        Ok(services) => services,
        Err(err) => return render_error(res, &err),
    };
    let query = match parse_calendar_query(req) {
        Ok(query) => query,
        Err(err) => return render_error(res, &err),
    };

    match services.calendar.list(user_id, &query).await {
        Ok(page) => res.render(Json(page)),
        Err(err) => render_error(res, &err.into()),
    }
}

/// ## Summary
/// GET /api/calendar/today - pending items on the server-local day.
#[handler]
async fn today(depot: &mut Depot, res: &mut Response) {
    let Some(user_id) = require_user(depot, res) else {
        return;
    };
    let services = match get_services_from_depot(depot) {
        Ok(services) => services,
        Err(err) => return render_error(res, &err),
    };

    match services.calendar.today(user_id).await {
        Ok(page) => res.render(Json(page)),
        Err(err) => render_error(res, &err.into()),
    }
}

/// ## Summary
/// GET /api/calendar/week - pending items in the Monday-to-Sunday week
/// containing now.
#[handler]
async fn week(depot: &mut Depot, res: &mut Response) {
    let Some(user_id) = require_user(depot, res) else {
        return;
    };
    let services = match get_services_from_depot(depot) {
        Ok(services) => services,
        Err(err) => return render_error(res, &err),
    };

    match services.calendar.week(user_id).await {
        Ok(page) => res.render(Json(page)),
        Err(err) => render_error(res, &err.into()),
    }
}

/// ## Summary
/// GET /api/calendar/overdue - all pending items whose due time has passed.
#[handler]
async fn overdue(depot: &mut Depot, res: &mut Response) {
    let Some(user_id) = require_user(depot, res) else {
        return;
    };
    let services = match get_services_from_depot(depot) {
        Ok(services) => services,
        Err(err) => return render_error(res, &err),
    };

    match services.calendar.overdue(user_id).await {
        Ok(items) => res.render(Json(items)),
        Err(err) => render_error(res, &err.into()),
    }
}

/// ## Summary
/// GET /api/calendar/stats - roll-up counts across both sources.
#[handler]
async fn stats(depot: &mut Depot, res: &mut Response) {
    let Some(user_id) = require_user(depot, res) else {
        return;
    };
    let services = match get_services_from_depot(depot) {
        Ok(services) => services,
        Err(err) => return render_error(res, &err),
    };

    match services.calendar.stats(user_id).await {
        Ok(calendar_stats) => res.render(Json(calendar_stats)),
        Err(err) => render_error(res, &err.into()),
    }
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(CALENDAR_ROUTE_COMPONENT)
        .get(list_calendar)
        .push(Router::with_path("today").get(today))
        .push(Router::with_path("week").get(week))
        .push(Router::with_path("overdue").get(overdue))
        .push(Router::with_path("stats").get(stats))
}
