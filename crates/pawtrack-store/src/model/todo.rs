use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pawtrack_core::types::{ItemStatus, Priority};

/// A personal to-do owned by one user.
///
/// Same shape as a reminder minus recurrence; `completed_at` is maintained
/// by the store the instant status becomes `done`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    pub pet_id: Option<uuid::Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub status: ItemStatus,
    pub tags: Vec<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub due_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl TodoItem {
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Insert struct for creating new to-do rows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTodoItem {
    pub user_id: uuid::Uuid,
    pub pet_id: Option<uuid::Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub tags: Vec<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub due_at: Option<DateTime<Utc>>,
}
