//! Request handlers and route composition for both services

pub mod rejection;
pub mod tasks;
pub mod users;

use std::convert::Infallible;
use std::sync::Arc;

use warp::{Filter, Rejection, Reply};

use crate::auth::gate::AuthenticationGate;
use crate::error::FocusFlowError;
use crate::security::with_api_security_headers;
use crate::tasks::service::TaskService;
use crate::users::service::UserService;

pub use rejection::handle_rejection;
pub use tasks::task_routes;
pub use users::user_routes;

pub(crate) fn reject(e: FocusFlowError) -> Rejection {
    warp::reject::custom(e)
}

/// Liveness probe
pub fn health_route() -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path("health").and(warp::get()).map(|| "OK")
}

/// Complete user service API, including error recovery and response headers
pub fn user_service_api(
    service: Arc<UserService>,
    gate: Arc<AuthenticationGate>,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    user_routes(service, gate)
        .or(health_route())
        .recover(handle_rejection)
        .map(|reply| with_api_security_headers(reply))
}

/// Complete task service API, including error recovery and response headers
pub fn task_service_api(
    service: Arc<TaskService>,
    gate: Arc<AuthenticationGate>,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    task_routes(service, gate)
        .or(health_route())
        .recover(handle_rejection)
        .map(|reply| with_api_security_headers(reply))
}
