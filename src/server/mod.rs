//! HTTP server for CodeRefine

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use serde_json::json;
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

use crate::config::AppConfig;
use crate::errors::{AppError, ReviewError};
use crate::review::{ReviewRequest, ReviewService};

const ALLOWED_HEADERS: [&str; 5] = [
    "content-type",
    "authorization",
    "accept",
    "origin",
    "x-requested-with",
];

const ALLOWED_METHODS: [&str; 7] = ["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS", "HEAD"];

/// Filter tree: `GET /` health check and `POST /review`, with CORS and
/// request logging. Every rejection is rendered as `{"detail": ...}`.
pub fn routes(
    service: Arc<ReviewService>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let body_limit = service.request_body_limit();
    let with_service = warp::any().map(move || service.clone());

    // GET /
    let health = warp::path::end()
        .and(warp::get())
        .and(with_service.clone())
        .map(|service: Arc<ReviewService>| {
            warp::reply::json(&json!({
                "message": "CodeRefine API is running",
                "status": "healthy",
                "version": env!("CARGO_PKG_VERSION"),
                "ai_enabled": service.ai_enabled(),
            }))
        });

    // POST /review
    let review = warp::path("review")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(body_limit))
        .and(warp::body::json())
        .and(with_service)
        .and_then(handle_review);

    health
        .or(review)
        .recover(handle_rejection)
        .with(
            warp::cors()
                .allow_any_origin()
                .allow_headers(ALLOWED_HEADERS)
                .allow_methods(ALLOWED_METHODS),
        )
        .with(warp::log("coderefine"))
}

async fn handle_review(
    request: ReviewRequest,
    service: Arc<ReviewService>,
) -> Result<warp::reply::Response, Infallible> {
    match service.execute_review(request).await {
        Ok(response) => Ok(warp::reply::json(&response).into_response()),
        Err(e) => Ok(review_error_reply(&e)),
    }
}

fn review_error_reply(err: &ReviewError) -> warp::reply::Response {
    let status = if err.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        tracing::error!("评审失败: {}", err);
        StatusCode::INTERNAL_SERVER_ERROR
    };
    detail_reply(status, err.to_string())
}

fn detail_reply(status: StatusCode, detail: String) -> warp::reply::Response {
    warp::reply::with_status(warp::reply::json(&json!({ "detail": detail })), status)
        .into_response()
}

async fn handle_rejection(err: Rejection) -> Result<warp::reply::Response, Infallible> {
    let (status, detail) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not Found".to_string())
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "Payload Too Large".to_string())
    } else if err.find::<warp::reject::LengthRequired>().is_some() {
        (StatusCode::LENGTH_REQUIRED, "Length Required".to_string())
    } else if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "Unsupported Media Type".to_string(),
        )
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            "Method Not Allowed".to_string(),
        )
    } else {
        tracing::error!("未处理的请求拒绝: {:?}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".to_string(),
        )
    };

    Ok(detail_reply(status, detail))
}

/// 按配置组装评审服务并开始监听
pub async fn run(config: &AppConfig) -> Result<(), AppError> {
    let addr = config.server.socket_addr()?;
    let service = ReviewService::from_config(config)?;
    serve(addr, Arc::new(service)).await
}

/// Bind and serve until Ctrl-C
pub async fn serve(addr: SocketAddr, service: Arc<ReviewService>) -> Result<(), AppError> {
    let (bound, server) = warp::serve(routes(service))
        .try_bind_with_graceful_shutdown(addr, async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("收到退出信号，正在关闭服务");
        })
        .map_err(|e| AppError::Server(format!("failed to bind {addr}: {e}")))?;

    tracing::info!("🚀 CodeRefine API listening on http://{}", bound);
    server.await;
    tracing::info!("👋 CodeRefine API shut down");
    Ok(())
}
