//! 请求发送与响应读取
//!
//! 签名与参数组装在 `client::http` 中完成，这里只负责发送一次请求、
//! 按状态码归类传输层错误并读取响应体。不做重试。

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;

use crate::error::ProviderError;
use crate::utils::log_sanitizer::truncate_for_log;

/// 已读取的 HTTP 响应
#[derive(Debug)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_error_status(&self) -> bool {
        self.status >= 400
    }

    /// 非 JSON 错误响应（网关页面等）统一视为网络错误
    pub fn into_network_error(self, service: &str) -> ProviderError {
        ProviderError::NetworkError {
            provider: service.to_string(),
            detail: format!("HTTP {}: {}", self.status, truncate_for_log(&self.body)),
        }
    }
}

/// 发送已签名的 RPC 请求
///
/// `action` 只用于日志，不得包含密钥。
pub async fn send(
    request: RequestBuilder,
    service: &str,
    action: &str,
) -> Result<RawResponse, ProviderError> {
    log::debug!("[{service}] POST Action: {action}");

    let response = request.send().await.map_err(|e| {
        let detail = e.to_string();
        let provider = service.to_string();
        if e.is_timeout() {
            ProviderError::Timeout { provider, detail }
        } else {
            ProviderError::NetworkError { provider, detail }
        }
    })?;

    let status = response.status().as_u16();
    let retry_after = response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());

    let body = response
        .text()
        .await
        .map_err(|e| ProviderError::NetworkError {
            provider: service.to_string(),
            detail: format!("Failed to read response body: {e}"),
        })?;
    log::debug!("[{service}] {action} -> HTTP {status}: {}", truncate_for_log(&body));

    match status {
        429 => {
            log::warn!("[{service}] {action} throttled (HTTP 429), retry_after={retry_after:?}");
            Err(ProviderError::RateLimited {
                provider: service.to_string(),
                retry_after,
                raw_message: Some(truncate_for_log(&body)),
            })
        }
        502..=504 => Err(RawResponse { status, body }.into_network_error(service)),
        _ => Ok(RawResponse { status, body }),
    }
}

/// 解析 JSON 响应体
pub fn parse_json<T: DeserializeOwned>(body: &str, service: &str) -> Result<T, ProviderError> {
    serde_json::from_str(body).map_err(|e| {
        log::error!("[{service}] Unparseable response ({e}): {}", truncate_for_log(body));
        ProviderError::ParseError {
            provider: service.to_string(),
            detail: e.to_string(),
        }
    })
}
