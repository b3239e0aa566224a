//! Reminder lifecycle endpoints.

use salvo::http::StatusCode;
use salvo::writing::Json;
use salvo::{Depot, Request, Response, Router, handler};
use serde::{Deserialize, Serialize};

use pawtrack_core::constants::REMINDERS_ROUTE_COMPONENT;
use pawtrack_service::reminder::NewReminder;
use pawtrack_store::model::reminder::{ReminderItem, ReminderPatch};

use crate::error::{ErrorResponse, render_error};
use crate::middleware::auth::require_user;
use crate::state::get_services_from_depot;

/// Batch completion request payload
#[derive(Debug, Deserialize)]
struct BatchCompleteRequest {
    ids: Vec<uuid::Uuid>,
}

/// Per-id failure in a batch completion response
#[derive(Debug, Serialize)]
struct BatchFailure {
    id: uuid::Uuid,
    error: String,
}

/// Batch completion response payload
#[derive(Debug, Serialize)]
struct BatchCompleteResponse {
    completed: Vec<ReminderItem>,
    failures: Vec<BatchFailure>,
}

fn render_bad_body(res: &mut Response, err: &salvo::http::ParseError) {
    res.status_code(StatusCode::BAD_REQUEST);
    res.render(Json(ErrorResponse {
        error: format!("invalid body: {err}"),
    }));
}

fn render_bad_id(res: &mut Response) {
    res.status_code(StatusCode::BAD_REQUEST);
    res.render(Json(ErrorResponse {
        error: "invalid reminder id".to_string(),
    }));
}

/// ## Summary
/// POST /api/reminders - create a pending reminder for the requesting user.
///
/// ## Errors
/// Returns HTTP 400 for a malformed body, empty title, or past schedule,
/// and HTTP 403 when the draft names a pet the user has no access to.
#[handler]
async fn create_reminder(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let Some(user_id) = require_user(depot, res) else {
        return;
    };
    let services = match get_services_from_depot(depot) {
        Ok(services) => services,
        Err(err) => return render_error(res, &err),
    };
    let draft: NewReminder = match req.parse_json().await {
        Ok(draft) => draft,
        Err(err) => return render_bad_body(res, &err),
    };

    match services.reminders.create(draft, user_id).await {
        Ok(item) => {
            res.status_code(StatusCode::CREATED);
            res.render(Json(item));
        }
        Err(err) => render_error(res, &err.into()),
    }
}

/// ## Summary
/// PATCH /api/reminders/<id> - edit fields of an owned reminder.
///
/// ## Errors
/// Returns HTTP 404 for a missing target, 403 for another user's reminder,
/// and 400 for an illegal status transition.
#[handler]
async fn update_reminder(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let Some(user_id) = require_user(depot, res) else {
        return;
    };
    let services = match get_services_from_depot(depot) {
        Ok(services) => services,
        Err(err) => return render_error(res, &err),
    };
    let Some(id) = req.param::<uuid::Uuid>("id") else {
        return render_bad_id(res);
    };
    let patch: ReminderPatch = match req.parse_json().await {
        Ok(patch) => patch,
        Err(err) => return render_bad_body(res, &err),
    };

    match services.reminders.update(id, patch, user_id).await {
        Ok(item) => res.render(Json(item)),
        Err(err) => render_error(res, &err.into()),
    }
}

/// ## Summary
/// POST /api/reminders/<id>/complete - complete a reminder, materializing
/// the next occurrence of a recurring one.
#[handler]
async fn complete_reminder(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let Some(user_id) = require_user(depot, res) else {
        return;
    };
    let services = match get_services_from_depot(depot) {
        Ok(services) => services,
        Err(err) => return render_error(res, &err),
    };
    let Some(id) = req.param::<uuid::Uuid>("id") else {
        return render_bad_id(res);
    };

    match services.reminders.complete(id, user_id).await {
        Ok(item) => res.render(Json(item)),
        Err(err) => render_error(res, &err.into()),
    }
}

/// ## Summary
/// POST /api/reminders/<id>/dismiss - archive a reminder without advancing
/// recurrence.
#[handler]
async fn dismiss_reminder(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let Some(user_id) = require_user(depot, res) else {
        return;
    };
    let services = match get_services_from_depot(depot) {
        Ok(services) => services,
        Err(err) => return render_error(res, &err),
    };
    let Some(id) = req.param::<uuid::Uuid>("id") else {
        return render_bad_id(res);
    };

    match services.reminders.dismiss(id, user_id).await {
        Ok(item) => res.render(Json(item)),
        Err(err) => render_error(res, &err.into()),
    }
}

/// ## Summary
/// DELETE /api/reminders/<id> - soft-delete a reminder; the row is hidden
/// from all reads but retained for audit.
#[handler]
async fn delete_reminder(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let Some(user_id) = require_user(depot, res) else {
        return;
    };
    let services = match get_services_from_depot(depot) {
        Ok(services) => services,
        Err(err) => return render_error(res, &err),
    };
    let Some(id) = req.param::<uuid::Uuid>("id") else {
        return render_bad_id(res);
    };

    match services.reminders.soft_delete(id, user_id).await {
        Ok(()) => {
            res.status_code(StatusCode::NO_CONTENT);
        }
        Err(err) => render_error(res, &err.into()),
    }
}

/// ## Summary
/// POST /api/reminders/batch-complete - complete each distinct id in the
/// request. Partial success is reported per id; the batch is not atomic.
#[handler]
async fn batch_complete(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let Some(user_id) = require_user(depot, res) else {
        return;
    };
    let services = match get_services_from_depot(depot) {
        Ok(services) => services,
        Err(err) => return render_error(res, &err),
    };
    let body: BatchCompleteRequest = match req.parse_json().await {
        Ok(body) => body,
        Err(err) => return render_bad_body(res, &err),
    };

    let outcome = services.reminders.batch_complete(&body.ids, user_id).await;
    res.render(Json(BatchCompleteResponse {
        completed: outcome.completed,
        failures: outcome
            .failures
            .into_iter()
            .map(|(id, err)| BatchFailure {
                id,
                error: err.to_string(),
            })
            .collect(),
    }));
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(REMINDERS_ROUTE_COMPONENT)
        .post(create_reminder)
        .push(Router::with_path("batch-complete").post(batch_complete))
        .push(
            Router::with_path("{id}")
                .patch(update_reminder)
                .delete(delete_reminder)
                .push(Router::with_path("complete").post(complete_reminder))
                .push(Router::with_path("dismiss").post(dismiss_reminder)),
        )
}
