//! User service HTTP endpoints

use std::convert::Infallible;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

use crate::auth::gate::{with_request_context, AuthenticationGate, RequestContext};
use crate::auth::user::{ChangePasswordRequest, LoginRequest, RegisterRequest, UpdateEmailRequest};
use crate::constants::MAX_BODY_BYTES;
use crate::handlers::reject;
use crate::users::service::UserService;

fn with_service(
    service: Arc<UserService>,
) -> impl Filter<Extract = (Arc<UserService>,), Error = Infallible> + Clone {
    warp::any().map(move || service.clone())
}

fn json_body<T: DeserializeOwned + Send>() -> impl Filter<Extract = (T,), Error = Rejection> + Clone {
    warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::json())
}

/// Create user service API routes: `/api/auth/*` and `/api/users/me*`
pub fn user_routes(
    service: Arc<UserService>,
    gate: Arc<AuthenticationGate>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let ctx = with_request_context(gate);

    let register = warp::path!("api" / "auth" / "register")
        .and(warp::post())
        .and(json_body::<RegisterRequest>())
        .and(with_service(service.clone()))
        .and_then(register_user);

    let login = warp::path!("api" / "auth" / "login")
        .and(warp::post())
        .and(json_body::<LoginRequest>())
        .and(with_service(service.clone()))
        .and_then(login_user);

    let profile = warp::path!("api" / "users" / "me")
        .and(warp::get())
        .and(ctx.clone())
        .and(with_service(service.clone()))
        .and_then(get_profile);

    let email = warp::path!("api" / "users" / "me" / "email")
        .and(warp::put())
        .and(json_body::<UpdateEmailRequest>())
        .and(ctx.clone())
        .and(with_service(service.clone()))
        .and_then(update_email);

    let password = warp::path!("api" / "users" / "me" / "password")
        .and(warp::put())
        .and(json_body::<ChangePasswordRequest>())
        .and(ctx)
        .and(with_service(service))
        .and_then(change_password);

    register
        .or(login)
        .or(profile)
        .or(email)
        .or(password)
}

async fn register_user(
    request: RegisterRequest,
    service: Arc<UserService>,
) -> Result<impl Reply, Rejection> {
    let user = service.register(request).await.map_err(reject)?;
    Ok(warp::reply::with_status(
        warp::reply::json(&serde_json::json!({
            "message": "User registered successfully",
            "user": user.view(),
        })),
        StatusCode::CREATED,
    ))
}

async fn login_user(request: LoginRequest, service: Arc<UserService>) -> Result<impl Reply, Rejection> {
    let response = service.login(request).await.map_err(reject)?;
    Ok(warp::reply::json(&response))
}

async fn get_profile(ctx: RequestContext, service: Arc<UserService>) -> Result<impl Reply, Rejection> {
    let username = ctx.require_username().map_err(reject)?;
    let view = service.profile(username).await.map_err(reject)?;
    Ok(warp::reply::json(&view))
}

async fn update_email(
    request: UpdateEmailRequest,
    ctx: RequestContext,
    service: Arc<UserService>,
) -> Result<impl Reply, Rejection> {
    let username = ctx.require_username().map_err(reject)?;
    let view = service
        .update_email(username, &request.new_email)
        .await
        .map_err(reject)?;
    Ok(warp::reply::json(&serde_json::json!({
        "message": "Email updated successfully",
        "user": view,
    })))
}

async fn change_password(
    request: ChangePasswordRequest,
    ctx: RequestContext,
    service: Arc<UserService>,
) -> Result<impl Reply, Rejection> {
    let username = ctx.require_username().map_err(reject)?;
    service
        .change_password(username, &request.old_password, &request.new_password)
        .await
        .map_err(reject)?;
    Ok(warp::reply::json(&serde_json::json!({
        "message": "Password changed successfully"
    })))
}
