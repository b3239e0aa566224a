use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pawtrack_core::types::{ItemStatus, Priority};

/// A reminder instance owned by one user, optionally scoped to a pet.
///
/// Soft-deleted rows keep their data for audit; `deleted_at` marks them
/// invisible to every normal read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderItem {
    pub id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    pub pet_id: Option<uuid::Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub status: ItemStatus,
    pub tags: Vec<String>,
    pub scheduled_at: DateTime<Utc>,
    pub due_at: Option<DateTime<Utc>>,
    pub snooze_until: Option<DateTime<Utc>>,
    /// Compact recurrence string, e.g. `FREQ=DAILY;INTERVAL=2`.
    pub repeat_rule: Option<String>,
    /// Carried opaquely; the core schedules in UTC.
    pub timezone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl ReminderItem {
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Insert struct for creating new reminder rows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReminderItem {
    pub user_id: uuid::Uuid,
    pub pet_id: Option<uuid::Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub tags: Vec<String>,
    pub scheduled_at: DateTime<Utc>,
    pub due_at: Option<DateTime<Utc>>,
    pub snooze_until: Option<DateTime<Utc>>,
    pub repeat_rule: Option<String>,
    pub timezone: Option<String>,
}

/// Field edits applied by `update`; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReminderPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<ItemStatus>,
    pub tags: Option<Vec<String>>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub due_at: Option<DateTime<Utc>>,
    pub snooze_until: Option<DateTime<Utc>>,
    pub repeat_rule: Option<String>,
    pub timezone: Option<String>,
}

/// Identity of one occurrence in a recurrence chain.
///
/// The conditional insert that materializes successors is keyed on this
/// tuple so a retried or concurrent completion cannot fork the chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SuccessorKey {
    pub user_id: uuid::Uuid,
    pub pet_id: Option<uuid::Uuid>,
    pub title: String,
    pub repeat_rule: String,
    pub scheduled_at: DateTime<Utc>,
}

impl SuccessorKey {
    #[must_use]
    pub fn matches(&self, item: &ReminderItem) -> bool {
        item.user_id == self.user_id
            && item.pet_id == self.pet_id
            && item.title == self.title
            && item.repeat_rule.as_deref() == Some(self.repeat_rule.as_str())
            && item.scheduled_at == self.scheduled_at
    }
}
