//! Task service HTTP endpoints
//!
//! Every endpoint requires a numeric identity from the request context. The gate only
//! populates the context; the check happens here, once per endpoint, before the service
//! is called.

use std::convert::Infallible;
use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::Deserialize;
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

use crate::auth::gate::{with_request_context, AuthenticationGate, RequestContext};
use crate::constants::MAX_BODY_BYTES;
use crate::handlers::reject;
use crate::tasks::model::{Priority, Status, TaskRequest};
use crate::tasks::service::TaskService;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<Status>,
    pub priority: Option<Priority>,
}

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

fn with_service(
    service: Arc<TaskService>,
) -> impl Filter<Extract = (Arc<TaskService>,), Error = Infallible> + Clone {
    warp::any().map(move || service.clone())
}

fn json_body() -> impl Filter<Extract = (TaskRequest,), Error = Rejection> + Clone {
    warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::json())
}

/// Create task service API routes under `/api/tasks`
pub fn task_routes(
    service: Arc<TaskService>,
    gate: Arc<AuthenticationGate>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let ctx = with_request_context(gate);

    let list = warp::path!("api" / "tasks")
        .and(warp::get())
        .and(warp::query::<ListQuery>())
        .and(ctx.clone())
        .and(with_service(service.clone()))
        .and_then(list_tasks);

    let create = warp::path!("api" / "tasks")
        .and(warp::post())
        .and(json_body())
        .and(ctx.clone())
        .and(with_service(service.clone()))
        .and_then(create_task);

    let by_status = warp::path!("api" / "tasks" / "status" / Status)
        .and(warp::get())
        .and(ctx.clone())
        .and(with_service(service.clone()))
        .and_then(tasks_by_status);

    let overdue = warp::path!("api" / "tasks" / "overdue")
        .and(warp::get())
        .and(ctx.clone())
        .and(with_service(service.clone()))
        .and_then(overdue_tasks);

    let range = warp::path!("api" / "tasks" / "range")
        .and(warp::get())
        .and(warp::query::<RangeQuery>())
        .and(ctx.clone())
        .and(with_service(service.clone()))
        .and_then(tasks_in_range);

    let get = warp::path!("api" / "tasks" / i64)
        .and(warp::get())
        .and(ctx.clone())
        .and(with_service(service.clone()))
        .and_then(get_task);

    let update = warp::path!("api" / "tasks" / i64)
        .and(warp::put())
        .and(json_body())
        .and(ctx.clone())
        .and(with_service(service.clone()))
        .and_then(update_task);

    let delete = warp::path!("api" / "tasks" / i64)
        .and(warp::delete())
        .and(ctx)
        .and(with_service(service))
        .and_then(delete_task);

    list.or(create)
        .or(by_status)
        .or(overdue)
        .or(range)
        .or(get)
        .or(update)
        .or(delete)
}

async fn list_tasks(
    query: ListQuery,
    ctx: RequestContext,
    service: Arc<TaskService>,
) -> Result<impl Reply, Rejection> {
    let identity = ctx.require_identity().map_err(reject)?;
    let tasks = service
        .list(identity, query.status, query.priority)
        .await
        .map_err(reject)?;
    Ok(warp::reply::json(&tasks))
}

async fn create_task(
    request: TaskRequest,
    ctx: RequestContext,
    service: Arc<TaskService>,
) -> Result<impl Reply, Rejection> {
    let identity = ctx.require_identity().map_err(reject)?;
    let task = service.create(identity, request).await.map_err(reject)?;
    Ok(warp::reply::with_status(
        warp::reply::json(&task),
        StatusCode::CREATED,
    ))
}

async fn get_task(
    id: i64,
    ctx: RequestContext,
    service: Arc<TaskService>,
) -> Result<impl Reply, Rejection> {
    let identity = ctx.require_identity().map_err(reject)?;
    let task = service.get(identity, id).await.map_err(reject)?;
    Ok(warp::reply::json(&task))
}

async fn update_task(
    id: i64,
    request: TaskRequest,
    ctx: RequestContext,
    service: Arc<TaskService>,
) -> Result<impl Reply, Rejection> {
    let identity = ctx.require_identity().map_err(reject)?;
    let task = service.update(identity, id, request).await.map_err(reject)?;
    Ok(warp::reply::json(&task))
}

async fn delete_task(
    id: i64,
    ctx: RequestContext,
    service: Arc<TaskService>,
) -> Result<impl Reply, Rejection> {
    let identity = ctx.require_identity().map_err(reject)?;
    service.delete(identity, id).await.map_err(reject)?;
    Ok(warp::reply::json(&serde_json::json!({
        "message": "Task deleted successfully"
    })))
}

async fn tasks_by_status(
    status: Status,
    ctx: RequestContext,
    service: Arc<TaskService>,
) -> Result<impl Reply, Rejection> {
    let identity = ctx.require_identity().map_err(reject)?;
    let tasks = service.by_status(identity, status).await.map_err(reject)?;
    Ok(warp::reply::json(&tasks))
}

async fn overdue_tasks(ctx: RequestContext, service: Arc<TaskService>) -> Result<impl Reply, Rejection> {
    let identity = ctx.require_identity().map_err(reject)?;
    let now = chrono::Utc::now().naive_utc();
    let tasks = service.overdue(identity, now).await.map_err(reject)?;
    Ok(warp::reply::json(&tasks))
}

async fn tasks_in_range(
    query: RangeQuery,
    ctx: RequestContext,
    service: Arc<TaskService>,
) -> Result<impl Reply, Rejection> {
    let identity = ctx.require_identity().map_err(reject)?;
    let tasks = service
        .by_due_range(identity, query.start, query.end)
        .await
        .map_err(reject)?;
    Ok(warp::reply::json(&tasks))
}
