//! 请求来源信息提取
//!
//! 客户端 IP 与 User-Agent 按原样存储，不做可信代理判断。

use actix_web::HttpRequest;
use actix_web::http::header::{HeaderMap, USER_AGENT};

/// 代理注入的客户端 IP 头（按优先级）
pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";
pub const CLIENT_IP_HEADER: &str = "clientip";

fn non_empty_header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|h| h.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// 从 HeaderMap 提取客户端 IP
///
/// 优先 `x-forwarded-for`（整段保留，不拆分），其次 `clientIP`。
pub fn extract_client_ip_from_headers(headers: &HeaderMap) -> Option<String> {
    non_empty_header(headers, FORWARDED_FOR_HEADER)
        .or_else(|| non_empty_header(headers, CLIENT_IP_HEADER))
}

/// 从 HttpRequest 提取客户端 IP
pub fn extract_client_ip(req: &HttpRequest) -> Option<String> {
    extract_client_ip_from_headers(req.headers())
}

/// 从 HttpRequest 提取 User-Agent
pub fn extract_user_agent(req: &HttpRequest) -> Option<String> {
    non_empty_header(req.headers(), USER_AGENT.as_str())
}
