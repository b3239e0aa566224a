//! Calendar aggregation through the service stack, including the pet
//! visibility gate.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{TimeDelta, Utc};

use pawtrack_core::types::{ItemKind, ItemStatus, Priority};
use pawtrack_service::calendar::{CalendarItem, CalendarQuery};
use pawtrack_service::reminder::NewReminder;
use pawtrack_store::model::todo::NewTodoItem;
use pawtrack_store::store::TodoStore;
use pawtrack_test::component::store::memory::MemoryStore;

use crate::helpers::{StaticGate, open_services, services_with_gate};

fn draft(title: &str, priority: Priority) -> NewReminder {
    NewReminder {
        pet_id: None,
        title: title.to_string(),
        description: None,
        priority,
        tags: vec![],
        scheduled_at: Utc::now() + TimeDelta::hours(1),
        due_at: None,
        snooze_until: None,
        repeat_rule: None,
        timezone: None,
    }
}

fn item_title(item: &CalendarItem) -> &str {
    match item {
        CalendarItem::Todo(todo) => &todo.title,
        CalendarItem::Reminder(reminder) => &reminder.title,
    }
}

#[test_log::test(tokio::test)]
async fn urgent_outranks_earlier_low_priority_items() {
    let store = MemoryStore::new();
    let services = open_services(&store);
    let user = uuid::Uuid::new_v4();

    services
        .todos
        .create(NewTodoItem {
            user_id: user,
            pet_id: None,
            title: "urgent later".to_string(),
            description: None,
            priority: Priority::Urgent,
            tags: vec![],
            scheduled_at: Some(Utc::now() + TimeDelta::hours(1)),
            due_at: None,
        })
        .await
        .expect("create");
    services
        .todos
        .create(NewTodoItem {
            user_id: user,
            pet_id: None,
            title: "low earlier".to_string(),
            description: None,
            priority: Priority::Low,
            tags: vec![],
            scheduled_at: Some(Utc::now() - TimeDelta::hours(1)),
            due_at: None,
        })
        .await
        .expect("create");

    let page = services
        .calendar
        .list(user, &CalendarQuery::default())
        .await
        .expect("list");
    assert_eq!(page.total, 2);
    assert_eq!(item_title(&page.items[0]), "urgent later");
    assert_eq!(item_title(&page.items[1]), "low earlier");
}

#[test_log::test(tokio::test)]
async fn kind_filters_never_leak_the_other_source() {
    let store = MemoryStore::new();
    let services = open_services(&store);
    let user = uuid::Uuid::new_v4();

    services
        .reminders
        .create(draft("reminder", Priority::Medium), user)
        .await
        .expect("create");
    services
        .todos
        .create(NewTodoItem {
            user_id: user,
            pet_id: None,
            title: "todo".to_string(),
            description: None,
            priority: Priority::Medium,
            tags: vec![],
            scheduled_at: None,
            due_at: None,
        })
        .await
        .expect("create");

    for (kind, other) in [
        (ItemKind::UserTodo, ItemKind::PetReminder),
        (ItemKind::PetReminder, ItemKind::UserTodo),
    ] {
        let page = services
            .calendar
            .list(
                user,
                &CalendarQuery {
                    item_kind: Some(kind),
                    ..CalendarQuery::default()
                },
            )
            .await
            .expect("list");
        assert_eq!(page.total, 1);
        assert!(page.items.iter().all(|item| item.kind() == kind));
        assert!(page.items.iter().all(|item| item.kind() != other));
    }
}

#[test_log::test(tokio::test)]
async fn pet_visibility_separates_co_owned_from_foreign_pets() {
    let store = MemoryStore::new();
    let shared_pet = uuid::Uuid::new_v4();
    let foreign_pet = uuid::Uuid::new_v4();

    // Both pets may be written to, but only the shared pet is visible to
    // the requesting user.
    let gate = StaticGate {
        writable: HashSet::from([shared_pet, foreign_pet]),
        visible: HashSet::from([shared_pet]),
    };
    let services = services_with_gate(&store, Arc::new(gate));
    let user = uuid::Uuid::new_v4();

    let mut shared = draft("walk shared dog", Priority::Medium);
    shared.pet_id = Some(shared_pet);
    services.reminders.create(shared, user).await.expect("create");

    let mut foreign = draft("walk foreign dog", Priority::Medium);
    foreign.pet_id = Some(foreign_pet);
    services.reminders.create(foreign, user).await.expect("create");

    let page = services
        .calendar
        .list(user, &CalendarQuery::default())
        .await
        .expect("list");
    assert_eq!(page.total, 1);
    assert_eq!(item_title(&page.items[0]), "walk shared dog");

    // The hidden reminder still counts in the raw store; only the view
    // filters it.
    assert_eq!(store.reminder_rows().await, 2);
}

#[test_log::test(tokio::test)]
async fn week_view_keeps_this_week_only() {
    let store = MemoryStore::new();
    let services = open_services(&store);
    let user = uuid::Uuid::new_v4();

    // "Now" is always inside the current Monday-Sunday window.
    let mut inside = draft("this week", Priority::Medium);
    inside.scheduled_at = Utc::now() + TimeDelta::minutes(5);
    services.reminders.create(inside, user).await.expect("create");

    let mut outside = draft("next month", Priority::Medium);
    outside.scheduled_at = Utc::now() + TimeDelta::days(40);
    services.reminders.create(outside, user).await.expect("create");

    let page = services.calendar.week(user).await.expect("week");
    assert_eq!(page.total, 1);
    assert_eq!(item_title(&page.items[0]), "this week");
}

#[test_log::test(tokio::test)]
async fn done_items_drop_out_of_pending_views_but_not_stats() {
    let store = MemoryStore::new();
    let services = open_services(&store);
    let user = uuid::Uuid::new_v4();

    let created = services
        .reminders
        .create(draft("give treats", Priority::Medium), user)
        .await
        .expect("create");
    services
        .reminders
        .complete(created.id, user)
        .await
        .expect("complete");

    let pending_page = services
        .calendar
        .list(
            user,
            &CalendarQuery {
                status: Some(ItemStatus::Pending),
                ..CalendarQuery::default()
            },
        )
        .await
        .expect("list");
    assert_eq!(pending_page.total, 0);

    let stats = services.calendar.stats(user).await.expect("stats");
    assert_eq!(stats.done, 1);
    assert_eq!(stats.reminders, 1);
    assert_eq!(stats.todos, 0);
}
