//! Uniform calendar projection over the two item kinds.

use chrono::{DateTime, Utc};
use serde::Serialize;

use pawtrack_core::types::{ItemKind, ItemStatus, Priority};
use pawtrack_store::model::reminder::ReminderItem;
use pawtrack_store::model::todo::TodoItem;

/// Projection of a to-do for the calendar view.
#[derive(Debug, Clone, Serialize)]
pub struct CalendarTodo {
    pub item_id: uuid::Uuid,
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
}

/// Projection of a reminder for the calendar view, with reminder extras.
#[derive(Debug, Clone, Serialize)]
pub struct CalendarReminder {
    pub item_id: uuid::Uuid,
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
    pub snooze_until: Option<DateTime<Utc>>,
    pub repeat_rule: Option<String>,
    pub timezone: Option<String>,
}

/// One calendar entry: a to-do or a reminder behind a common projection.
///
/// The discriminant is explicit so that adding an item kind forces every
/// match below to be revisited.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "item_kind")]
pub enum CalendarItem {
    #[serde(rename = "user_todo")]
    Todo(CalendarTodo),
    #[serde(rename = "pet_reminder")]
    Reminder(CalendarReminder),
}

impl CalendarItem {
    #[must_use]
    pub const fn kind(&self) -> ItemKind {
        match self {
            Self::Todo(_) => ItemKind::UserTodo,
            Self::Reminder(_) => ItemKind::PetReminder,
        }
    }

    #[must_use]
    pub const fn item_id(&self) -> uuid::Uuid {
        match self {
            Self::Todo(todo) => todo.item_id,
            Self::Reminder(reminder) => reminder.item_id,
        }
    }

    #[must_use]
    pub const fn status(&self) -> ItemStatus {
        match self {
            Self::Todo(todo) => todo.status,
            Self::Reminder(reminder) => reminder.status,
        }
    }

    #[must_use]
    pub const fn priority(&self) -> Priority {
        match self {
            Self::Todo(todo) => todo.priority,
            Self::Reminder(reminder) => reminder.priority,
        }
    }

    #[must_use]
    pub const fn scheduled_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Todo(todo) => todo.scheduled_at,
            Self::Reminder(reminder) => reminder.scheduled_at,
        }
    }

    #[must_use]
    pub const fn due_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Todo(todo) => todo.due_at,
            Self::Reminder(reminder) => reminder.due_at,
        }
    }

    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        match self {
            Self::Todo(todo) => todo.created_at,
            Self::Reminder(reminder) => reminder.created_at,
        }
    }

    /// Instant used to tie-break the calendar sort: scheduled time, else due
    /// time, else creation time.
    #[must_use]
    pub fn effective_time(&self) -> DateTime<Utc> {
        self.scheduled_at()
            .or_else(|| self.due_at())
            .unwrap_or_else(|| self.created_at())
    }
}

impl From<TodoItem> for CalendarItem {
    fn from(todo: TodoItem) -> Self {
        Self::Todo(CalendarTodo {
            item_id: todo.id,
            user_id: todo.user_id,
            pet_id: todo.pet_id,
            title: todo.title,
            description: todo.description,
            priority: todo.priority,
            status: todo.status,
            tags: todo.tags,
            scheduled_at: todo.scheduled_at,
            due_at: todo.due_at,
            completed_at: todo.completed_at,
            created_at: todo.created_at,
            updated_at: todo.updated_at,
        })
    }
}

impl From<ReminderItem> for CalendarItem {
    fn from(reminder: ReminderItem) -> Self {
        Self::Reminder(CalendarReminder {
            item_id: reminder.id,
            user_id: reminder.user_id,
            pet_id: reminder.pet_id,
            title: reminder.title,
            description: reminder.description,
            priority: reminder.priority,
            status: reminder.status,
            tags: reminder.tags,
            scheduled_at: Some(reminder.scheduled_at),
            due_at: reminder.due_at,
            completed_at: None,
            created_at: reminder.created_at,
            updated_at: reminder.updated_at,
            snooze_until: reminder.snooze_until,
            repeat_rule: reminder.repeat_rule,
            timezone: reminder.timezone,
        })
    }
}
