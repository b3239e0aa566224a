use std::sync::Arc;

use salvo::async_trait;

use pawtrack_core::error::CoreError;
use pawtrack_service::calendar::CalendarAggregator;
use pawtrack_service::reminder::ReminderLifecycle;
use pawtrack_store::store::TodoStore;

use crate::error::AppResult;

/// Shared service handles injected into every request.
pub struct Services {
    pub reminders: ReminderLifecycle,
    pub calendar: CalendarAggregator,
    pub todos: Arc<dyn TodoStore>,
}

pub struct ServicesHandler {
    pub services: Arc<Services>,
}

#[async_trait]
impl salvo::Handler for ServicesHandler {
    #[tracing::instrument(skip(self, _req, depot, _res, _ctrl))]
    async fn handle(
        &self,
        _req: &mut salvo::Request,
        depot: &mut salvo::Depot,
        _res: &mut salvo::Response,
        _ctrl: &mut salvo::FlowCtrl,
    ) {
        depot.inject(self.services.clone());
    }
}

/// ## Summary
/// Retrieves the shared services from the depot.
///
/// ## Errors
/// Returns an error if the services are not found in the depot.
pub fn get_services_from_depot(depot: &salvo::Depot) -> AppResult<Arc<Services>> {
    depot
        .obtain::<Arc<Services>>()
        .cloned()
        .map_err(|_err| CoreError::InvariantViolation("Services not found in depot").into())
}
