//! Abstract item-store traits consumed by the service layer.
//!
//! A persistence backend implements these against its own storage; the
//! bundled [`crate::memory::MemoryStore`] implements both in process.

use async_trait::async_trait;

use pawtrack_core::types::ItemStatus;

use crate::error::StoreResult;
use crate::model::reminder::{NewReminderItem, ReminderItem, ReminderPatch, SuccessorKey};
use crate::model::todo::{NewTodoItem, TodoItem};

/// Store surface for reminder rows.
///
/// Soft-deleted rows are invisible to `find`, `find_for_user`, and `count`;
/// they stay in the backing storage for audit.
#[async_trait]
pub trait ReminderStore: Send + Sync {
    /// Looks up a live reminder by id.
    async fn find(&self, id: uuid::Uuid) -> StoreResult<Option<ReminderItem>>;

    /// Returns all live reminders for a user, optionally filtered by status.
    async fn find_for_user(
        &self,
        user_id: uuid::Uuid,
        status: Option<ItemStatus>,
    ) -> StoreResult<Vec<ReminderItem>>;

    /// Inserts a new pending reminder and returns the stored row.
    async fn create(&self, item: NewReminderItem) -> StoreResult<ReminderItem>;

    /// Applies field edits to a live reminder.
    async fn update(&self, id: uuid::Uuid, patch: ReminderPatch) -> StoreResult<ReminderItem>;

    /// Sets the status of a live reminder.
    async fn update_status(&self, id: uuid::Uuid, status: ItemStatus) -> StoreResult<ReminderItem>;

    /// Inserts `item` only if no row matching `key` exists, atomically.
    ///
    /// Returns the created row, or `None` when a matching row (including a
    /// soft-deleted one) already occupies the key. Implementations must make
    /// the existence check and the insert a single atomic step; this is the
    /// idempotency guard for recurrence successors.
    async fn insert_if_absent(
        &self,
        key: &SuccessorKey,
        item: NewReminderItem,
    ) -> StoreResult<Option<ReminderItem>>;

    /// Marks a live reminder deleted, hiding it from all future reads.
    async fn soft_delete(&self, id: uuid::Uuid) -> StoreResult<()>;

    /// Counts live reminders for a user.
    async fn count(&self, user_id: uuid::Uuid) -> StoreResult<usize>;
}

/// Store surface for to-do rows.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Looks up a live to-do by id.
    async fn find(&self, id: uuid::Uuid) -> StoreResult<Option<TodoItem>>;

    /// Returns all live to-dos for a user, optionally filtered by status.
    async fn find_for_user(
        &self,
        user_id: uuid::Uuid,
        status: Option<ItemStatus>,
    ) -> StoreResult<Vec<TodoItem>>;

    /// Inserts a new pending to-do and returns the stored row.
    async fn create(&self, item: NewTodoItem) -> StoreResult<TodoItem>;

    /// Sets the status of a live to-do, maintaining `completed_at`.
    async fn update_status(&self, id: uuid::Uuid, status: ItemStatus) -> StoreResult<TodoItem>;

    /// Marks a live to-do deleted, hiding it from all future reads.
    async fn soft_delete(&self, id: uuid::Uuid) -> StoreResult<()>;

    /// Counts live to-dos for a user.
    async fn count(&self, user_id: uuid::Uuid) -> StoreResult<usize>;
}
