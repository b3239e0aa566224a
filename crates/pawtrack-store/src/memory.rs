//! In-memory store implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use pawtrack_core::types::ItemStatus;

use crate::error::{StoreError, StoreResult};
use crate::model::reminder::{NewReminderItem, ReminderItem, ReminderPatch, SuccessorKey};
use crate::model::todo::{NewTodoItem, TodoItem};
use crate::store::{ReminderStore, TodoStore};

/// In-memory store state.
#[derive(Debug, Default)]
struct MemoryState {
    /// All reminder rows, soft-deleted included (single source of truth).
    reminders: HashMap<uuid::Uuid, ReminderItem>,

    /// All to-do rows, soft-deleted included.
    todos: HashMap<uuid::Uuid, TodoItem>,
}

/// Process-local store backing both item kinds.
///
/// Cloning shares the underlying state, so one instance serves as both the
/// `ReminderStore` and the `TodoStore` collaborator. `insert_if_absent`
/// runs its existence check and insert under a single write guard, which
/// makes the successor guard atomic across concurrent completions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of reminder rows retained, soft-deleted included.
    pub async fn reminder_rows(&self) -> usize {
        self.state.read().await.reminders.len()
    }

    /// Number of to-do rows retained, soft-deleted included.
    pub async fn todo_rows(&self) -> usize {
        self.state.read().await.todos.len()
    }
}

fn build_reminder(item: NewReminderItem) -> ReminderItem {
    let now = Utc::now();
    ReminderItem {
        id: uuid::Uuid::now_v7(),
        user_id: item.user_id,
        pet_id: item.pet_id,
        title: item.title,
        description: item.description,
        priority: item.priority,
        status: ItemStatus::Pending,
        tags: item.tags,
        scheduled_at: item.scheduled_at,
        due_at: item.due_at,
        snooze_until: item.snooze_until,
        repeat_rule: item.repeat_rule,
        timezone: item.timezone,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    }
}

fn build_todo(item: NewTodoItem) -> TodoItem {
    let now = Utc::now();
    TodoItem {
        id: uuid::Uuid::now_v7(),
        user_id: item.user_id,
        pet_id: item.pet_id,
        title: item.title,
        description: item.description,
        priority: item.priority,
        status: ItemStatus::Pending,
        tags: item.tags,
        scheduled_at: item.scheduled_at,
        due_at: item.due_at,
        completed_at: None,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    }
}

fn apply_reminder_patch(row: &mut ReminderItem, patch: ReminderPatch) {
    if let Some(title) = patch.title {
        row.title = title;
    }
    if let Some(description) = patch.description {
        row.description = Some(description);
    }
    if let Some(priority) = patch.priority {
        row.priority = priority;
    }
    if let Some(status) = patch.status {
        row.status = status;
    }
    if let Some(tags) = patch.tags {
        row.tags = tags;
    }
    if let Some(scheduled_at) = patch.scheduled_at {
        row.scheduled_at = scheduled_at;
    }
    if let Some(due_at) = patch.due_at {
        row.due_at = Some(due_at);
    }
    if let Some(snooze_until) = patch.snooze_until {
        row.snooze_until = Some(snooze_until);
    }
    if let Some(repeat_rule) = patch.repeat_rule {
        row.repeat_rule = Some(repeat_rule);
    }
    if let Some(timezone) = patch.timezone {
        row.timezone = Some(timezone);
    }
    row.updated_at = Utc::now();
}

#[async_trait]
impl ReminderStore for MemoryStore {
    async fn find(&self, id: uuid::Uuid) -> StoreResult<Option<ReminderItem>> {
        let state = self.state.read().await;
        Ok(state.reminders.get(&id).filter(|r| !r.is_deleted()).cloned())
    }

    async fn find_for_user(
        &self,
        user_id: uuid::Uuid,
        status: Option<ItemStatus>,
    ) -> StoreResult<Vec<ReminderItem>> {
        let state = self.state.read().await;
        Ok(state
            .reminders
            .values()
            .filter(|r| r.user_id == user_id && !r.is_deleted())
            .filter(|r| status.is_none_or(|s| r.status == s))
            .cloned()
            .collect())
    }

    async fn create(&self, item: NewReminderItem) -> StoreResult<ReminderItem> {
        let row = build_reminder(item);
        let mut state = self.state.write().await;
        state.reminders.insert(row.id, row.clone());
        tracing::debug!(reminder_id = %row.id, "Reminder row inserted");
        Ok(row)
    }

    async fn update(&self, id: uuid::Uuid, patch: ReminderPatch) -> StoreResult<ReminderItem> {
        let mut state = self.state.write().await;
        let row = state
            .reminders
            .get_mut(&id)
            .filter(|r| !r.is_deleted())
            .ok_or(StoreError::RowNotFound(id))?;
        apply_reminder_patch(row, patch);
        Ok(row.clone())
    }

    async fn update_status(&self, id: uuid::Uuid, status: ItemStatus) -> StoreResult<ReminderItem> {
        let mut state = self.state.write().await;
        let row = state
            .reminders
            .get_mut(&id)
            .filter(|r| !r.is_deleted())
            .ok_or(StoreError::RowNotFound(id))?;
        row.status = status;
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn insert_if_absent(
        &self,
        key: &SuccessorKey,
        item: NewReminderItem,
    ) -> StoreResult<Option<ReminderItem>> {
        // Check and insert under one write guard. Soft-deleted rows still
        // occupy their key: the chain must not fork just because an
        // occurrence was deleted.
        let mut state = self.state.write().await;
        if state.reminders.values().any(|r| key.matches(r)) {
            tracing::debug!(title = %key.title, scheduled_at = %key.scheduled_at, "Successor already present, skipping insert");
            return Ok(None);
        }
        let row = build_reminder(item);
        state.reminders.insert(row.id, row.clone());
        tracing::debug!(reminder_id = %row.id, scheduled_at = %row.scheduled_at, "Successor row inserted");
        Ok(Some(row))
    }

    async fn soft_delete(&self, id: uuid::Uuid) -> StoreResult<()> {
        let mut state = self.state.write().await;
        let row = state
            .reminders
            .get_mut(&id)
            .filter(|r| !r.is_deleted())
            .ok_or(StoreError::RowNotFound(id))?;
        row.deleted_at = Some(Utc::now());
        row.updated_at = Utc::now();
        Ok(())
    }

    async fn count(&self, user_id: uuid::Uuid) -> StoreResult<usize> {
        let state = self.state.read().await;
        Ok(state
            .reminders
            .values()
            .filter(|r| r.user_id == user_id && !r.is_deleted())
            .count())
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn find(&self, id: uuid::Uuid) -> StoreResult<Option<TodoItem>> {
        let state = self.state.read().await;
        Ok(state.todos.get(&id).filter(|t| !t.is_deleted()).cloned())
    }

    async fn find_for_user(
        &self,
        user_id: uuid::Uuid,
        status: Option<ItemStatus>,
    ) -> StoreResult<Vec<TodoItem>> {
        let state = self.state.read().await;
        Ok(state
            .todos
            .values()
            .filter(|t| t.user_id == user_id && !t.is_deleted())
            .filter(|t| status.is_none_or(|s| t.status == s))
            .cloned()
            .collect())
    }

    async fn create(&self, item: NewTodoItem) -> StoreResult<TodoItem> {
        let row = build_todo(item);
        let mut state = self.state.write().await;
        state.todos.insert(row.id, row.clone());
        tracing::debug!(todo_id = %row.id, "To-do row inserted");
        Ok(row)
    }

    async fn update_status(&self, id: uuid::Uuid, status: ItemStatus) -> StoreResult<TodoItem> {
        let mut state = self.state.write().await;
        let row = state
            .todos
            .get_mut(&id)
            .filter(|t| !t.is_deleted())
            .ok_or(StoreError::RowNotFound(id))?;
        row.status = status;
        row.completed_at = if status == ItemStatus::Done {
            Some(Utc::now())
        } else {
            None
        };
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn soft_delete(&self, id: uuid::Uuid) -> StoreResult<()> {
        let mut state = self.state.write().await;
        let row = state
            .todos
            .get_mut(&id)
            .filter(|t| !t.is_deleted())
            .ok_or(StoreError::RowNotFound(id))?;
        row.deleted_at = Some(Utc::now());
        row.updated_at = Utc::now();
        Ok(())
    }

    async fn count(&self, user_id: uuid::Uuid) -> StoreResult<usize> {
        let state = self.state.read().await;
        Ok(state
            .todos
            .values()
            .filter(|t| t.user_id == user_id && !t.is_deleted())
            .count())
    }
}
