//! Cross-entity calendar aggregation: merge, sort, paginate, and roll up
//! the two item kinds into one view.

use std::cmp::Ordering;
use std::sync::Arc;

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveTime, TimeDelta, Utc};
use serde::Serialize;

use pawtrack_core::constants::{DEFAULT_CALENDAR_LIMIT, DERIVED_VIEW_LIMIT};
use pawtrack_core::types::{ItemKind, ItemStatus};
use pawtrack_store::store::{ReminderStore, TodoStore};

use crate::access::PetAccessGate;
use crate::error::{ServiceError, ServiceResult};

use super::item::CalendarItem;

/// Filters and pagination for a calendar listing.
#[derive(Debug, Clone, Default)]
pub struct CalendarQuery {
    pub item_kind: Option<ItemKind>,
    pub status: Option<ItemStatus>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    /// Page size; `None` falls back to [`DEFAULT_CALENDAR_LIMIT`].
    pub limit: Option<usize>,
    pub offset: usize,
}

/// One page of the merged calendar.
#[derive(Debug, Serialize)]
pub struct CalendarPage {
    pub items: Vec<CalendarItem>,
    /// Merged count before pagination.
    pub total: usize,
}

/// Roll-up counts across both sources, recomputed from current rows on
/// every call.
#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct CalendarStats {
    pub pending: usize,
    pub done: usize,
    pub archived: usize,
    pub overdue: usize,
    pub todos: usize,
    pub reminders: usize,
}

/// Merges to-dos and reminders into one ordered, filterable view.
pub struct CalendarAggregator {
    todos: Arc<dyn TodoStore>,
    reminders: Arc<dyn ReminderStore>,
    gate: Arc<dyn PetAccessGate>,
}

impl CalendarAggregator {
    pub fn new(
        todos: Arc<dyn TodoStore>,
        reminders: Arc<dyn ReminderStore>,
        gate: Arc<dyn PetAccessGate>,
    ) -> Self {
        Self {
            todos,
            reminders,
            gate,
        }
    }

    /// ## Summary
    /// Lists the merged calendar for one user.
    ///
    /// Both sources are fetched independently, pet-scoped reminders pass
    /// through the co-owner visibility gate, the time-range filter matches
    /// an item when either its scheduled or its due time falls inside the
    /// inclusive window, and the merge is sorted by priority rank descending
    /// with ties broken by effective time ascending. `total` counts the
    /// merged sequence before the offset/limit slice; the page is a plain
    /// slice, not a transactional snapshot.
    ///
    /// ## Errors
    /// Returns an error when a store or the access gate fails.
    #[tracing::instrument(skip(self, query), fields(user_id = %user_id))]
    pub async fn list(
        &self,
        user_id: uuid::Uuid,
        query: &CalendarQuery,
    ) -> ServiceResult<CalendarPage> {
        let mut merged = self.fetch_merged(user_id, query.item_kind, query.status).await?;

        merged.retain(|item| in_range(item, query.start_date, query.end_date));
        merged.sort_by(compare_calendar_order);

        let total = merged.len();
        let limit = query.limit.unwrap_or(DEFAULT_CALENDAR_LIMIT);
        let items: Vec<CalendarItem> = merged.into_iter().skip(query.offset).take(limit).collect();

        tracing::debug!(total, returned = items.len(), "Calendar page assembled");
        Ok(CalendarPage { items, total })
    }

    /// ## Summary
    /// Pending items whose scheduled or due time falls on the server-local
    /// calendar day containing now.
    ///
    /// ## Errors
    /// Returns an error when a store or the access gate fails.
    pub async fn today(&self, user_id: uuid::Uuid) -> ServiceResult<CalendarPage> {
        let today = Local::now().date_naive();
        let start = local_midnight_utc(today)?;
        let end = next_window_end(today, 1)?;
        self.list(
            user_id,
            &CalendarQuery {
                status: Some(ItemStatus::Pending),
                start_date: Some(start),
                end_date: Some(end),
                limit: Some(DERIVED_VIEW_LIMIT),
                ..CalendarQuery::default()
            },
        )
        .await
    }

    /// ## Summary
    /// Pending items within the Monday-to-Sunday server-local week
    /// containing now.
    ///
    /// ## Errors
    /// Returns an error when a store or the access gate fails.
    pub async fn week(&self, user_id: uuid::Uuid) -> ServiceResult<CalendarPage> {
        let today = Local::now().date_naive();
        let monday = today
            - TimeDelta::days(i64::from(today.weekday().num_days_from_monday()));
        let start = local_midnight_utc(monday)?;
        let end = next_window_end(monday, 7)?;
        self.list(
            user_id,
            &CalendarQuery {
                status: Some(ItemStatus::Pending),
                start_date: Some(start),
                end_date: Some(end),
                limit: Some(DERIVED_VIEW_LIMIT),
                ..CalendarQuery::default()
            },
        )
        .await
    }

    /// ## Summary
    /// All pending items from both sources whose due time has passed.
    /// Unbounded: overdue work must never fall off the page.
    ///
    /// ## Errors
    /// Returns an error when a store or the access gate fails.
    pub async fn overdue(&self, user_id: uuid::Uuid) -> ServiceResult<Vec<CalendarItem>> {
        let now = Utc::now();
        let mut merged = self
            .fetch_merged(user_id, None, Some(ItemStatus::Pending))
            .await?;
        merged.retain(|item| item.due_at().is_some_and(|due| due < now));
        merged.sort_by(compare_calendar_order);
        Ok(merged)
    }

    /// ## Summary
    /// Roll-up counts by status across both sources, plus the overdue count
    /// and a per-kind breakdown. Pure read-time aggregation over current
    /// rows; no running counters are kept anywhere.
    ///
    /// ## Errors
    /// Returns an error when a store or the access gate fails.
    #[tracing::instrument(skip(self), fields(user_id = %user_id))]
    pub async fn stats(&self, user_id: uuid::Uuid) -> ServiceResult<CalendarStats> {
        let items = self.fetch_merged(user_id, None, None).await?;
        let now = Utc::now();

        let mut stats = CalendarStats::default();
        for item in &items {
            match item.status() {
                ItemStatus::Pending => stats.pending += 1,
                ItemStatus::Done => stats.done += 1,
                ItemStatus::Archived => stats.archived += 1,
            }
            if item.status() == ItemStatus::Pending && item.due_at().is_some_and(|due| due < now) {
                stats.overdue += 1;
            }
            match item {
                CalendarItem::Todo(_) => stats.todos += 1,
                CalendarItem::Reminder(_) => stats.reminders += 1,
            }
        }
        Ok(stats)
    }

    /// Fetches and projects both sources, applying the status filter and
    /// the reminder visibility gate.
    async fn fetch_merged(
        &self,
        user_id: uuid::Uuid,
        item_kind: Option<ItemKind>,
        status: Option<ItemStatus>,
    ) -> ServiceResult<Vec<CalendarItem>> {
        let mut merged = Vec::new();

        if item_kind.is_none_or(|kind| kind == ItemKind::UserTodo) {
            for todo in self.todos.find_for_user(user_id, status).await? {
                merged.push(CalendarItem::from(todo));
            }
        }

        if item_kind.is_none_or(|kind| kind == ItemKind::PetReminder) {
            for reminder in self.reminders.find_for_user(user_id, status).await? {
                if let Some(pet_id) = reminder.pet_id
                    && !self.gate.is_co_owner_visible(pet_id, user_id).await?
                {
                    continue;
                }
                merged.push(CalendarItem::from(reminder));
            }
        }

        Ok(merged)
    }
}

/// The range filter is an OR across the two timestamps: an item matches
/// when its scheduled time or its due time falls inside the window.
fn in_range(
    item: &CalendarItem,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> bool {
    if start.is_none() && end.is_none() {
        return true;
    }
    let within = |t: DateTime<Utc>| {
        start.is_none_or(|s| t >= s) && end.is_none_or(|e| t <= e)
    };
    item.scheduled_at().is_some_and(within) || item.due_at().is_some_and(within)
}

fn compare_calendar_order(a: &CalendarItem, b: &CalendarItem) -> Ordering {
    b.priority()
        .rank()
        .cmp(&a.priority().rank())
        .then_with(|| a.effective_time().cmp(&b.effective_time()))
        // Final id tie-break keeps the order deterministic for a fixed snapshot.
        .then_with(|| a.item_id().cmp(&b.item_id()))
}

fn local_midnight_utc(date: NaiveDate) -> ServiceResult<DateTime<Utc>> {
    date.and_time(NaiveTime::MIN)
        .and_local_timezone(Local)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or(ServiceError::InvariantViolation(
            "local midnight does not exist in the server timezone",
        ))
}

/// Inclusive upper bound just before the local midnight `days` days after
/// `start_day`.
fn next_window_end(start_day: NaiveDate, days: i64) -> ServiceResult<DateTime<Utc>> {
    Ok(local_midnight_utc(start_day + TimeDelta::days(days))? - TimeDelta::nanoseconds(1))
}
