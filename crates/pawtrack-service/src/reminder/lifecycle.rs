//! Reminder lifecycle service: the pending/done/archived state machine and
//! lazy recurrence advancement.
//!
//! Recurrence is advanced only here, when an instance is explicitly
//! completed. There is no background clock; an ignored recurring reminder
//! simply stops producing instances.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use pawtrack_core::types::{ItemStatus, Priority};
use pawtrack_store::model::reminder::{
    NewReminderItem, ReminderItem, ReminderPatch, SuccessorKey,
};
use pawtrack_store::store::ReminderStore;

use crate::access::PetAccessGate;
use crate::error::{ServiceError, ServiceResult};
use crate::recurrence;

/// Draft for a new reminder, as supplied by the owner.
#[derive(Debug, Clone, Deserialize)]
pub struct NewReminder {
    pub pet_id: Option<uuid::Uuid>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub tags: Vec<String>,
    pub scheduled_at: DateTime<Utc>,
    #[serde(default)]
    pub due_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub snooze_until: Option<DateTime<Utc>>,
    #[serde(default)]
    pub repeat_rule: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
}

/// Per-id results of a batch completion; the batch is not atomic.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub completed: Vec<ReminderItem>,
    pub failures: Vec<(uuid::Uuid, ServiceError)>,
}

/// Owns the reminder state machine and successor materialization.
pub struct ReminderLifecycle {
    store: Arc<dyn ReminderStore>,
    gate: Arc<dyn PetAccessGate>,
}

impl ReminderLifecycle {
    pub fn new(store: Arc<dyn ReminderStore>, gate: Arc<dyn PetAccessGate>) -> Self {
        Self { store, gate }
    }

    /// ## Summary
    /// Creates a pending reminder owned by `owner_id`.
    ///
    /// ## Errors
    /// Returns `ValidationError` if the title is empty or `scheduled_at` is
    /// strictly in the past, and `Forbidden` if the draft is scoped to a pet
    /// the owner has no access to.
    #[tracing::instrument(skip(self, draft), fields(owner_id = %owner_id, title = %draft.title))]
    pub async fn create(&self, draft: NewReminder, owner_id: uuid::Uuid) -> ServiceResult<ReminderItem> {
        if draft.title.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "title must not be empty".to_string(),
            ));
        }
        if draft.scheduled_at < Utc::now() {
            return Err(ServiceError::ValidationError(
                "scheduled_at must not be in the past".to_string(),
            ));
        }
        if let Some(pet_id) = draft.pet_id
            && !self.gate.has_access(pet_id, owner_id).await?
        {
            return Err(ServiceError::Forbidden(format!("no access to pet {pet_id}")));
        }

        let created = self
            .store
            .create(NewReminderItem {
                user_id: owner_id,
                pet_id: draft.pet_id,
                title: draft.title,
                description: draft.description,
                priority: draft.priority,
                tags: draft.tags,
                scheduled_at: draft.scheduled_at,
                due_at: draft.due_at,
                snooze_until: draft.snooze_until,
                repeat_rule: draft.repeat_rule,
                timezone: draft.timezone,
            })
            .await?;

        tracing::info!(reminder_id = %created.id, "Reminder created");
        Ok(created)
    }

    /// ## Summary
    /// Applies field edits to a reminder owned by `requester_id`.
    ///
    /// A patched status must respect the state machine: terminal statuses
    /// never change again. Setting `done` through an update does NOT advance
    /// recurrence; only [`Self::complete`] materializes successors.
    ///
    /// ## Errors
    /// Returns `NotFound` for a missing or soft-deleted target, `Forbidden`
    /// for a requester that is not the owning user, and `ValidationError`
    /// for an illegal status transition.
    #[tracing::instrument(skip(self, patch), fields(reminder_id = %id, requester_id = %requester_id))]
    pub async fn update(
        &self,
        id: uuid::Uuid,
        patch: ReminderPatch,
        requester_id: uuid::Uuid,
    ) -> ServiceResult<ReminderItem> {
        let current = self.load_owned(id, requester_id).await?;

        if let Some(next_status) = patch.status
            && next_status != current.status
            && current.status.is_terminal()
        {
            return Err(ServiceError::ValidationError(format!(
                "cannot change status of a {} reminder",
                current.status
            )));
        }

        Ok(self.store.update(id, patch).await?)
    }

    /// ## Summary
    /// Completes a reminder and, for recurring ones, materializes the next
    /// occurrence exactly once.
    ///
    /// Safe to retry: completing an already-done instance is a status no-op,
    /// and the successor insert is conditional on the successor key, so a
    /// crashed or repeated call cannot fork the chain. A rule that fails to
    /// parse yields no successor and no error - recurrence is best-effort
    /// and never blocks completion.
    ///
    /// ## Side Effects
    /// - Marks the instance done
    /// - May insert one pending successor row
    ///
    /// ## Errors
    /// Returns `NotFound` for a missing or soft-deleted target and
    /// `Forbidden` for a requester that is not the owning user.
    #[tracing::instrument(skip(self), fields(reminder_id = %id, requester_id = %requester_id))]
    pub async fn complete(
        &self,
        id: uuid::Uuid,
        requester_id: uuid::Uuid,
    ) -> ServiceResult<ReminderItem> {
        let current = self.load_owned(id, requester_id).await?;

        // Dismissal is terminal and is not completion; nothing to do.
        if current.status == ItemStatus::Archived {
            return Ok(current);
        }

        let completed = if current.status == ItemStatus::Done {
            tracing::debug!("Instance already done, keeping status");
            current
        } else {
            self.store.update_status(id, ItemStatus::Done).await?
        };

        let Some(rule) = completed.repeat_rule.clone() else {
            return Ok(completed);
        };
        let Some(next_scheduled_at) =
            recurrence::next_occurrence(completed.scheduled_at, Some(rule.as_str()))
        else {
            tracing::debug!(rule = %rule, "Repeat rule yields no successor");
            return Ok(completed);
        };

        // Keep the due offset relative to the scheduled instant.
        let due_at = completed
            .due_at
            .map(|due| next_scheduled_at + (due - completed.scheduled_at));

        let key = SuccessorKey {
            user_id: completed.user_id,
            pet_id: completed.pet_id,
            title: completed.title.clone(),
            repeat_rule: rule.clone(),
            scheduled_at: next_scheduled_at,
        };
        let successor = NewReminderItem {
            user_id: completed.user_id,
            pet_id: completed.pet_id,
            title: completed.title.clone(),
            description: completed.description.clone(),
            priority: completed.priority,
            tags: completed.tags.clone(),
            scheduled_at: next_scheduled_at,
            due_at,
            snooze_until: None,
            repeat_rule: Some(rule),
            timezone: completed.timezone.clone(),
        };

        if let Some(created) = self.store.insert_if_absent(&key, successor).await? {
            tracing::info!(
                successor_id = %created.id,
                scheduled_at = %created.scheduled_at,
                "Materialized next occurrence"
            );
        }

        Ok(completed)
    }

    /// ## Summary
    /// Archives a pending reminder. Never generates a successor.
    ///
    /// ## Errors
    /// Returns `NotFound` for a missing or soft-deleted target and
    /// `Forbidden` for a requester that is not the owning user.
    #[tracing::instrument(skip(self), fields(reminder_id = %id, requester_id = %requester_id))]
    pub async fn dismiss(
        &self,
        id: uuid::Uuid,
        requester_id: uuid::Uuid,
    ) -> ServiceResult<ReminderItem> {
        let current = self.load_owned(id, requester_id).await?;
        if current.status.is_terminal() {
            return Ok(current);
        }
        Ok(self.store.update_status(id, ItemStatus::Archived).await?)
    }

    /// ## Summary
    /// Soft-deletes a reminder, hiding it from all subsequent reads while
    /// keeping the row for audit. Orthogonal to status.
    ///
    /// ## Errors
    /// Returns `NotFound` for a missing or already-deleted target and
    /// `Forbidden` for a requester that is not the owning user.
    #[tracing::instrument(skip(self), fields(reminder_id = %id, requester_id = %requester_id))]
    pub async fn soft_delete(&self, id: uuid::Uuid, requester_id: uuid::Uuid) -> ServiceResult<()> {
        self.load_owned(id, requester_id).await?;
        Ok(self.store.soft_delete(id).await?)
    }

    /// ## Summary
    /// Completes each distinct id in `ids` sequentially.
    ///
    /// The list is de-duplicated first; each completion is independently
    /// authorized and independently idempotent. Partial success is expected
    /// and reported per id.
    #[tracing::instrument(skip(self, ids), fields(requester_id = %requester_id, requested = ids.len()))]
    pub async fn batch_complete(&self, ids: &[uuid::Uuid], requester_id: uuid::Uuid) -> BatchOutcome {
        let mut seen = HashSet::new();
        let mut outcome = BatchOutcome::default();

        for &id in ids {
            if !seen.insert(id) {
                continue;
            }
            match self.complete(id, requester_id).await {
                Ok(item) => outcome.completed.push(item),
                Err(err) => {
                    tracing::warn!(reminder_id = %id, error = %err, "Batch entry failed");
                    outcome.failures.push((id, err));
                }
            }
        }

        outcome
    }

    async fn load_owned(
        &self,
        id: uuid::Uuid,
        requester_id: uuid::Uuid,
    ) -> ServiceResult<ReminderItem> {
        let item = self
            .store
            .find(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("reminder {id}")))?;
        if item.user_id != requester_id {
            return Err(ServiceError::Forbidden(
                "reminder belongs to another user".to_string(),
            ));
        }
        Ok(item)
    }
}
