//! Minimal to-do endpoints: enough surface for the calendar's second
//! source. Anything richer belongs to the main CRUD application.

use chrono::{DateTime, Utc};
use salvo::http::StatusCode;
use salvo::writing::Json;
use salvo::{Depot, Request, Response, Router, handler};
use serde::Deserialize;

use pawtrack_core::constants::TODOS_ROUTE_COMPONENT;
use pawtrack_core::error::CoreError;
use pawtrack_core::types::{ItemStatus, Priority};
use pawtrack_store::model::todo::NewTodoItem;
use pawtrack_store::store::TodoStore;

use crate::error::{AppError, ErrorResponse, render_error};
use crate::middleware::auth::require_user;
use crate::state::get_services_from_depot;

/// Create to-do request payload
#[derive(Debug, Deserialize)]
struct NewTodoRequest {
    pet_id: Option<uuid::Uuid>,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    priority: Priority,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    scheduled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    due_at: Option<DateTime<Utc>>,
}

/// ## Summary
/// POST /api/todos - create a pending to-do for the requesting user.
///
/// ## Errors
/// Returns HTTP 400 for a malformed body or empty title.
#[handler]
async fn create_todo(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let Some(user_id) = require_user(depot, res) else {
        return;
    };
    let services = match get_services_from_depot(depot) {
        Ok(services) => services,
        Err(err) => return render_error(res, &err),
    };
    let body: NewTodoRequest = match req.parse_json().await {
        Ok(body) => body,
        Err(err) => {
            res.status_code(StatusCode::BAD_REQUEST);
            res.render(Json(ErrorResponse {
                error: format!("invalid body: {err}"),
            }));
            return;
        }
    };

    if body.title.trim().is_empty() {
        return render_error(
            res,
            &AppError::CoreError(CoreError::ValidationError(
                "title must not be empty".to_string(),
            )),
        );
    }

    match services
        .todos
        .create(NewTodoItem {
            user_id,
            pet_id: body.pet_id,
            title: body.title,
            description: body.description,
            priority: body.priority,
            tags: body.tags,
            scheduled_at: body.scheduled_at,
            due_at: body.due_at,
        })
        .await
    {
        Ok(item) => {
            res.status_code(StatusCode::CREATED);
            res.render(Json(item));
        }
        Err(err) => render_error(res, &err.into()),
    }
}

/// ## Summary
/// POST /api/todos/<id>/complete - mark an owned to-do done; the store
/// stamps `completed_at`.
///
/// ## Errors
/// Returns HTTP 404 for a missing target and 403 for another user's to-do.
#[handler]
async fn complete_todo(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let Some(user_id) = require_user(depot, res) else {
        return;
    };
    let services = match get_services_from_depot(depot) {
        Ok(services) => services,
        Err(err) => return render_error(res, &err),
    };
    let Some(id) = req.param::<uuid::Uuid>("id") else {
        res.status_code(StatusCode::BAD_REQUEST);
        res.render(Json(ErrorResponse {
            error: "invalid to-do id".to_string(),
        }));
        return;
    };

    let found = match services.todos.find(id).await {
        Ok(found) => found,
        Err(err) => return render_error(res, &err.into()),
    };
    let Some(todo) = found else {
        return render_error(
            res,
            &AppError::CoreError(CoreError::NotFound(format!("to-do {id}"))),
        );
    };
    if todo.user_id != user_id {
        return render_error(
            res,
            &AppError::CoreError(CoreError::Forbidden(
                "to-do belongs to another user".to_string(),
            )),
        );
    }

    match services.todos.update_status(id, ItemStatus::Done).await {
        Ok(item) => res.render(Json(item)),
        Err(err) => render_error(res, &err.into()),
    }
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(TODOS_ROUTE_COMPONENT)
        .post(create_todo)
        .push(Router::with_path("{id}/complete").post(complete_todo))
}
