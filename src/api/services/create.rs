//! `POST /create` 与 `OPTIONS /create`

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Serialize;
use tracing::{debug, error};

use crate::errors::LinkforgeError;
use crate::services::{
    CreateLinkRequest, CreateOutcome, LinkService, RequestContext, SLUG_EXISTS_MESSAGE,
    ServiceOrigin,
};
use crate::utils::ip::{extract_client_ip, extract_user_agent};

pub const CORS_ALLOW_ORIGIN: &str = "*";
pub const CORS_ALLOW_HEADERS: &str = "Content-Type";
pub const CORS_ALLOW_METHODS: &str = "POST, OPTIONS";
pub const CORS_MAX_AGE: &str = "86400";

/// `{message}` 响应体
#[derive(Debug, Serialize)]
struct MessageBody<'a> {
    message: &'a str,
}

/// 带 CORS 头的 JSON 响应
fn cors_json<T: Serialize>(status: StatusCode, body: &T) -> HttpResponse {
    HttpResponse::build(status)
        .insert_header(("Access-Control-Allow-Origin", CORS_ALLOW_ORIGIN))
        .insert_header(("Access-Control-Allow-Headers", CORS_ALLOW_HEADERS))
        .insert_header(("Access-Control-Max-Age", CORS_MAX_AGE))
        .json(body)
}

fn message_response(status: StatusCode, message: &str) -> HttpResponse {
    cors_json(status, &MessageBody { message })
}

fn error_response(err: &LinkforgeError) -> HttpResponse {
    match err {
        LinkforgeError::Validation(_) => debug!("Rejected create request: {}", err.message()),
        _ => error!("Create request failed: {}", err),
    }
    message_response(err.http_status(), err.message())
}

fn request_context(req: &HttpRequest) -> RequestContext {
    let conn_info = req.connection_info();
    RequestContext {
        origin: ServiceOrigin::new(conn_info.scheme(), conn_info.host()),
        client_ip: extract_client_ip(req),
        user_agent: extract_user_agent(req),
    }
}

pub struct CreateService;

impl CreateService {
    pub async fn create_link(
        req: HttpRequest,
        body: Result<web::Bytes, actix_web::Error>,
        service: web::Data<Arc<LinkService>>,
    ) -> HttpResponse {
        // 超出 PayloadConfig 上限或读取失败也要带 CORS 头返回
        let body = match body {
            Ok(body) => body,
            Err(e) => {
                debug!("Unreadable request body: {}", e);
                return message_response(
                    e.as_response_error().status_code(),
                    &format!("Invalid request body: {}", e),
                );
            }
        };

        let payload: CreateLinkRequest = match serde_json::from_slice(&body) {
            Ok(payload) => payload,
            Err(e) => {
                debug!("Invalid JSON body: {}", e);
                return message_response(
                    StatusCode::BAD_REQUEST,
                    &format!("Invalid JSON body: {}", e),
                );
            }
        };

        let ctx = request_context(&req);

        match service.create_link(payload, &ctx).await {
            Ok(CreateOutcome::Created(link)) | Ok(CreateOutcome::Existing(link)) => {
                cors_json(StatusCode::OK, &link)
            }
            Ok(CreateOutcome::SlugConflict) => {
                message_response(service.policy().slug_conflict_status, SLUG_EXISTS_MESSAGE)
            }
            Err(e) => error_response(&e),
        }
    }

    /// CORS 预检，空响应体
    pub async fn preflight() -> HttpResponse {
        HttpResponse::Ok()
            .insert_header(("Access-Control-Allow-Origin", CORS_ALLOW_ORIGIN))
            .insert_header(("Access-Control-Allow-Methods", CORS_ALLOW_METHODS))
            .insert_header(("Access-Control-Allow-Headers", CORS_ALLOW_HEADERS))
            .insert_header(("Access-Control-Max-Age", CORS_MAX_AGE))
            .finish()
    }
}

/// 注册 `/create` 路由
pub fn create_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/create")
            .route(web::post().to(CreateService::create_link))
            .route(web::method(actix_web::http::Method::OPTIONS).to(CreateService::preflight)),
    );
}
