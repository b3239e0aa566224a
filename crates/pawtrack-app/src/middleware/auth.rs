use salvo::Depot;
use salvo::http::StatusCode;
use salvo::writing::Json;
use tracing::error;

use pawtrack_core::config::{AuthMethod, Settings};
use pawtrack_core::error::{CoreError, CoreResult};

use crate::config::get_config_from_depot;
use crate::error::ErrorResponse;

/// Depot keys written by the middleware for downstream handlers.
pub mod depot_keys {
    /// The authenticated user id.
    pub const AUTHENTICATED_USER: &str = "authenticated_user";
}

/// Header carrying the authenticated user id when a reverse proxy performs
/// authentication.
pub const PROXY_USER_HEADER: &str = "x-auth-user-id";

/// ## Summary
/// Middleware handler for authentication.
/// Use this as a handler in routes to protect them with authentication.
pub struct AuthMiddleware;

fn resolve_user(req: &salvo::Request, settings: &Settings) -> CoreResult<uuid::Uuid> {
    match settings.auth.method {
        AuthMethod::SingleUser => settings
            .auth
            .single_user
            .as_ref()
            .map(|single_user| single_user.user_id)
            .ok_or_else(|| {
                CoreError::InvalidConfiguration(
                    "single_user auth requires auth.single_user.user_id".to_string(),
                )
            }),
        AuthMethod::Proxy => {
            let raw = req
                .header::<String>(PROXY_USER_HEADER)
                .ok_or(CoreError::NotAuthenticated)?;
            uuid::Uuid::parse_str(&raw).map_err(|err| {
                CoreError::ValidationError(format!("invalid {PROXY_USER_HEADER} header: {err}"))
            })
        }
    }
}

/// ## Summary
/// Authentication middleware that resolves the requesting user and stores
/// the id in the depot. The identity itself comes from an external
/// provider: either a reverse proxy injecting a trusted header, or the
/// configured single user.
///
/// ## Side Effects
/// Inserts the user id into the depot under
/// [`depot_keys::AUTHENTICATED_USER`] for downstream handlers.
///
/// ## Errors
/// Renders HTTP 401 when no identity is present, 400 for a malformed
/// identity header, and 500 for configuration problems.
#[salvo::async_trait]
impl salvo::Handler for AuthMiddleware {
    #[tracing::instrument(skip(self, req, depot, res, ctrl), fields(
        method = %req.method(),
        path = %req.uri().path()
    ))]
    async fn handle(
        &self,
        req: &mut salvo::Request,
        depot: &mut Depot,
        res: &mut salvo::Response,
        ctrl: &mut salvo::FlowCtrl,
    ) {
        tracing::trace!("Authenticating request");

        let settings = match get_config_from_depot(depot) {
            Ok(cfg) => cfg,
            Err(e) => {
                error!(error = ?e, "Failed to get config from depot");
                res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
                ctrl.skip_rest();
                return;
            }
        };

        match resolve_user(req, &settings) {
            Ok(user_id) => {
                tracing::debug!(user_id = %user_id, "User authenticated");
                depot.insert(depot_keys::AUTHENTICATED_USER, user_id);
            }
            Err(err) => {
                tracing::debug!(error = %err, "Request not authenticated");
                crate::error::render_error(res, &err.into());
                ctrl.skip_rest();
            }
        }
    }
}

/// ## Summary
/// Reads the authenticated user id from the depot, rendering HTTP 401 when
/// it is missing.
pub fn require_user(depot: &Depot, res: &mut salvo::Response) -> Option<uuid::Uuid> {
    match depot.get::<uuid::Uuid>(depot_keys::AUTHENTICATED_USER) {
        Ok(user_id) => Some(*user_id),
        Err(_) => {
            res.status_code(StatusCode::UNAUTHORIZED);
            res.render(Json(ErrorResponse {
                error: "Authentication required".to_string(),
            }));
            None
        }
    }
}
