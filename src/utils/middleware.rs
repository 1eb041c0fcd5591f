use crate::{error::AppError, services::auth::CurrentUser, state::AppState};
use axum::{
    body::{Body, HttpBody},
    extract::{ConnectInfo, FromRequest, FromRequestParts, State},
    http::{header, request::Parts, HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::Response,
    BoxError, Json,
};
use serde::de::DeserializeOwned;
use std::{net::SocketAddr, sync::Arc};
use tracing::{debug, info};

/// 认证中间件
///
/// Resolves `Authorization: Bearer <token>` into a [`CurrentUser`] request
/// extension. Requests without a usable token pass through unauthenticated;
/// handlers decide whether that is acceptable.
pub async fn auth_middleware(
    State(app_state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next<Body>,
) -> Response {
    if let Some(token) = bearer_token(request.headers()) {
        match app_state.auth_service.resolve(token) {
            Some(user) => {
                debug!("Authenticated request as user {}", user.id);
                request.extensions_mut().insert(user);
            }
            None => debug!("Bearer token did not resolve to a user"),
        }
    }

    next.run(request).await
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// 请求日志中间件
pub async fn request_logging_middleware(request: Request<Body>, next: Next<Body>) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let client_ip = get_client_ip(&request);
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(|RequestId(id)| id.clone())
        .unwrap_or_else(|| "-".to_string());

    let start_time = std::time::Instant::now();

    debug!(
        "[{}] Incoming request: {} {} from {}",
        request_id, method, uri, client_ip
    );

    let response = next.run(request).await;

    info!(
        "[{}] Request completed: {} {} {} - {}ms",
        request_id,
        method,
        uri,
        response.status().as_u16(),
        start_time.elapsed().as_millis()
    );

    response
}

/// 请求 ID 中间件
///
/// Must wrap `request_logging_middleware` so the id is in the extensions by
/// the time the request is logged.
pub async fn request_id_middleware(mut request: Request<Body>, next: Next<Body>) -> Response {
    let request_id = uuid::Uuid::new_v4().to_string();

    request
        .extensions_mut()
        .insert(RequestId(request_id.clone()));

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert("x-request-id", value);
    }

    response
}

/// 获取客户端 IP 地址
fn get_client_ip(request: &Request<Body>) -> String {
    let headers = request.headers();

    if let Some(ip) = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
    {
        return ip.trim().to_string();
    }

    if let Some(ip) = headers.get("x-real-ip").and_then(|value| value.to_str().ok()) {
        return ip.to_string();
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// 请求 ID 包装器
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// 必须认证的提取器，未认证时返回 401
pub struct AuthUser(pub CurrentUser);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .copied()
            .map(AuthUser)
            .ok_or_else(|| AppError::unauthorized("Authentication required"))
    }
}

/// 可选认证提取器
pub struct OptionalAuth(pub Option<CurrentUser>);

#[axum::async_trait]
impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(OptionalAuth(parts.extensions.get::<CurrentUser>().copied()))
    }
}

/// `Json` whose rejections are reported through [`AppError`] so malformed
/// bodies get the usual JSON error shape.
pub struct JsonBody<T>(pub T);

#[axum::async_trait]
impl<T, S, B> FromRequest<S, B> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
    B: HttpBody + Send + 'static,
    B::Data: Send,
    B::Error: Into<BoxError>,
{
    type Rejection = AppError;

    async fn from_request(request: Request<B>, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(request, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        Ok(JsonBody(value))
    }
}
