//! End-to-end recurrence behavior through the service stack.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};

use pawtrack_core::types::ItemStatus;
use pawtrack_service::reminder::NewReminder;
use pawtrack_store::model::reminder::ReminderItem;
use pawtrack_store::store::ReminderStore;
use pawtrack_test::component::store::memory::MemoryStore;

use crate::helpers::open_services;

fn recurring_draft(title: &str, scheduled_at: DateTime<Utc>, rule: &str) -> NewReminder {
    NewReminder {
        pet_id: None,
        title: title.to_string(),
        description: Some("chain test".to_string()),
        priority: pawtrack_core::types::Priority::High,
        tags: vec!["meds".to_string(), "daily-care".to_string()],
        scheduled_at,
        due_at: None,
        snooze_until: None,
        repeat_rule: Some(rule.to_string()),
        timezone: Some("Europe/Berlin".to_string()),
    }
}

async fn sole_pending(store: &MemoryStore, user: uuid::Uuid) -> ReminderItem {
    let pending = store
        .find_for_user(user, Some(ItemStatus::Pending))
        .await
        .expect("find pending");
    assert_eq!(pending.len(), 1, "expected exactly one pending instance");
    pending.into_iter().next().expect("row")
}

#[test_log::test(tokio::test)]
async fn daily_chain_advances_one_interval_per_completion() {
    let store = MemoryStore::new();
    let services = open_services(&store);
    let user = uuid::Uuid::new_v4();

    let anchor = Utc::now() + TimeDelta::hours(1);
    let first = services
        .reminders
        .create(recurring_draft("insulin shot", anchor, "FREQ=DAILY;INTERVAL=2"), user)
        .await
        .expect("create");

    // Walk the chain three times; each completion hands over to a new
    // pending instance two days later.
    let mut current = first;
    for step in 1..=3 {
        services
            .reminders
            .complete(current.id, user)
            .await
            .expect("complete");
        let successor = sole_pending(&store, user).await;
        assert_eq!(
            successor.scheduled_at,
            anchor + TimeDelta::days(2 * step),
            "step {step}"
        );
        assert_eq!(successor.title, "insulin shot");
        assert_eq!(successor.tags, vec!["meds", "daily-care"]);
        assert_eq!(successor.repeat_rule.as_deref(), Some("FREQ=DAILY;INTERVAL=2"));
        assert_eq!(successor.timezone.as_deref(), Some("Europe/Berlin"));
        current = successor;
    }

    // Three done instances plus one pending tail.
    assert_eq!(store.reminder_rows().await, 4);
}

#[test_log::test(tokio::test)]
async fn monthly_chain_overflows_month_end() {
    let store = MemoryStore::new();
    let services = open_services(&store);
    let user = uuid::Uuid::new_v4();

    // A month-end anchor in the future; 2030 is not a leap year, so the
    // next occurrence overflows past February into March 3rd.
    let anchor = Utc.with_ymd_and_hms(2030, 1, 31, 9, 0, 0).unwrap();
    let created = services
        .reminders
        .create(recurring_draft("vet checkup", anchor, "FREQ=MONTHLY"), user)
        .await
        .expect("create");

    services
        .reminders
        .complete(created.id, user)
        .await
        .expect("complete");

    let successor = sole_pending(&store, user).await;
    assert_eq!(
        successor.scheduled_at,
        Utc.with_ymd_and_hms(2030, 3, 3, 9, 0, 0).unwrap()
    );
}

#[test_log::test(tokio::test)]
async fn duplicate_batch_ids_cannot_fork_the_chain() {
    let store = MemoryStore::new();
    let services = open_services(&store);
    let user = uuid::Uuid::new_v4();

    let anchor = Utc::now() + TimeDelta::hours(3);
    let created = services
        .reminders
        .create(recurring_draft("water change", anchor, "FREQ=WEEKLY"), user)
        .await
        .expect("create");

    let outcome = services
        .reminders
        .batch_complete(&[created.id, created.id, created.id], user)
        .await;
    assert_eq!(outcome.completed.len(), 1);
    assert!(outcome.failures.is_empty());

    // One done instance, one pending successor - no duplicates.
    assert_eq!(store.reminder_rows().await, 2);
    let successor = sole_pending(&store, user).await;
    assert_eq!(successor.scheduled_at, anchor + TimeDelta::days(7));
}

#[test_log::test(tokio::test)]
async fn completing_done_instance_backfills_missing_successor() {
    let store = MemoryStore::new();
    let services = open_services(&store);
    let user = uuid::Uuid::new_v4();

    let anchor = Utc::now() + TimeDelta::hours(1);
    let created = services
        .reminders
        .create(recurring_draft("litter scoop", anchor, "FREQ=DAILY"), user)
        .await
        .expect("create");

    // Simulate a completion that marked the row done but lost its
    // successor (e.g. the process died between the two steps).
    store
        .update_status(created.id, ItemStatus::Done)
        .await
        .expect("mark done");
    assert_eq!(store.reminder_rows().await, 1);

    // An explicit retry completes the job: still done, successor present.
    let retried = services
        .reminders
        .complete(created.id, user)
        .await
        .expect("retry");
    assert_eq!(retried.status, ItemStatus::Done);
    assert_eq!(store.reminder_rows().await, 2);

    // And a second retry cannot duplicate it.
    services
        .reminders
        .complete(created.id, user)
        .await
        .expect("second retry");
    assert_eq!(store.reminder_rows().await, 2);
}

#[test_log::test(tokio::test)]
async fn soft_deleted_rows_leave_views_but_stay_in_audit() {
    let store = MemoryStore::new();
    let services = open_services(&store);
    let user = uuid::Uuid::new_v4();

    let created = services
        .reminders
        .create(
            recurring_draft("nail trim", Utc::now() + TimeDelta::hours(2), "FREQ=MONTHLY"),
            user,
        )
        .await
        .expect("create");

    services
        .reminders
        .soft_delete(created.id, user)
        .await
        .expect("delete");

    let page = services
        .calendar
        .list(user, &pawtrack_service::calendar::CalendarQuery::default())
        .await
        .expect("list");
    assert_eq!(page.total, 0);

    let stats = services.calendar.stats(user).await.expect("stats");
    assert_eq!(stats.reminders, 0);
    assert_eq!(stats.pending, 0);

    // The audit store still holds the row.
    assert_eq!(store.reminder_rows().await, 1);
}
