#![allow(clippy::expect_used, dead_code)]
//! Test helpers for integration tests.
//!
//! Provides utilities for:
//! - Building service stacks over a fresh in-memory store
//! - Creating a test Salvo service with proxy-header authentication
//! - Common request payloads

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use salvo::Router;

use pawtrack_test::app::api::routes;
use pawtrack_test::app::state::{Services, ServicesHandler};
use pawtrack_test::component::access::{OpenAccessGate, PetAccessGate};
use pawtrack_test::component::calendar::CalendarAggregator;
use pawtrack_test::component::config::{
    AuthConfig, AuthMethod, ConfigHandler, LoggingConfig, ServerConfig, Settings,
};
use pawtrack_test::component::reminder::ReminderLifecycle;
// `component::error` is ambiguous between the core and service globs; use
// the crate path directly.
use pawtrack_service::error::ServiceResult;
use pawtrack_test::component::store::memory::MemoryStore;

/// Header the proxy auth method trusts.
pub const USER_HEADER: &str = "x-auth-user-id";

/// Settings for HTTP tests: proxy-header authentication, so each request
/// picks its own user.
pub fn test_settings() -> Settings {
    Settings {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
        },
        auth: AuthConfig {
            method: AuthMethod::Proxy,
            single_user: None,
        },
    }
}

/// Gate backed by static pet sets: `writable` answers `has_access`,
/// `visible` answers `is_co_owner_visible`.
pub struct StaticGate {
    pub writable: HashSet<uuid::Uuid>,
    pub visible: HashSet<uuid::Uuid>,
}

#[async_trait]
impl PetAccessGate for StaticGate {
    async fn has_access(&self, pet_id: uuid::Uuid, _user_id: uuid::Uuid) -> ServiceResult<bool> {
        Ok(self.writable.contains(&pet_id))
    }

    async fn is_co_owner_visible(
        &self,
        pet_id: uuid::Uuid,
        _user_id: uuid::Uuid,
    ) -> ServiceResult<bool> {
        Ok(self.visible.contains(&pet_id))
    }
}

/// Builds the full service stack over `store` with the given gate.
pub fn services_with_gate(store: &MemoryStore, gate: Arc<dyn PetAccessGate>) -> Arc<Services> {
    Arc::new(Services {
        reminders: ReminderLifecycle::new(Arc::new(store.clone()), gate.clone()),
        calendar: CalendarAggregator::new(Arc::new(store.clone()), Arc::new(store.clone()), gate),
        todos: Arc::new(store.clone()),
    })
}

/// Builds the full service stack over `store` with a gate that grants
/// everything.
pub fn open_services(store: &MemoryStore) -> Arc<Services> {
    services_with_gate(store, Arc::new(OpenAccessGate))
}

/// Assembles a Salvo service around the stack for `TestClient` requests.
pub fn http_service(services: Arc<Services>) -> salvo::Service {
    let router = Router::new()
        .hoop(ConfigHandler {
            settings: test_settings(),
        })
        .hoop(ServicesHandler { services })
        .push(routes());
    salvo::Service::new(router)
}

/// JSON payload for a reminder creation request.
pub fn reminder_body(title: &str, scheduled_at: DateTime<Utc>) -> serde_json::Value {
    serde_json::json!({
        "title": title,
        "scheduled_at": scheduled_at.to_rfc3339(),
    })
}

/// JSON payload for a to-do creation request.
pub fn todo_body(title: &str) -> serde_json::Value {
    serde_json::json!({ "title": title })
}
