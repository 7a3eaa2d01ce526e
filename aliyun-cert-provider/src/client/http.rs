//! 阿里云 RPC 请求发送

use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::http_client;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::common::sha256_hex;
use super::types::encode_params;
use super::{AliyunClient, EMPTY_BODY_SHA256, Endpoint};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// 参数位置
enum Params {
    /// 参数放在 query string 中，body 为空
    Query(String),
    /// 参数放在 form body 中（证书、私钥等大字段）
    Form(String),
}

impl AliyunClient {
    /// 发起 RPC 请求（参数通过 query string 传递）
    pub(crate) async fn request<T: DeserializeOwned, B: Serialize>(
        &self,
        endpoint: &Endpoint,
        action: &str,
        params: &B,
        ctx: ErrorContext,
    ) -> Result<T> {
        let query = encode_params(params, endpoint.name)?;
        self.send(endpoint, action, Params::Query(query), ctx).await
    }

    /// 发起 RPC 请求（参数通过 form body 传递，不会出现在 URL 与日志中）
    pub(crate) async fn request_with_form<T: DeserializeOwned, B: Serialize>(
        &self,
        endpoint: &Endpoint,
        action: &str,
        params: &B,
        ctx: ErrorContext,
    ) -> Result<T> {
        let form = encode_params(params, endpoint.name)?;
        self.send(endpoint, action, Params::Form(form), ctx).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        action: &str,
        params: Params,
        ctx: ErrorContext,
    ) -> Result<T> {
        let (query_string, body) = match params {
            Params::Query(q) => (q, None),
            Params::Form(f) => (String::new(), Some(f)),
        };
        let content_sha256 = body
            .as_deref()
            .map_or_else(|| EMPTY_BODY_SHA256.to_string(), |b| sha256_hex(b.as_bytes()));

        let timestamp = Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
        let nonce = uuid::Uuid::new_v4().to_string();

        let authorization = self.sign(
            endpoint,
            action,
            &query_string,
            &content_sha256,
            &timestamp,
            &nonce,
        );

        let url = if query_string.is_empty() {
            format!("https://{}/", endpoint.host)
        } else {
            format!("https://{}/?{query_string}", endpoint.host)
        };

        let mut request = self
            .client
            .post(&url)
            .header("Host", endpoint.host)
            .header("x-acs-action", action)
            .header("x-acs-version", endpoint.version)
            .header("x-acs-date", &timestamp)
            .header("x-acs-signature-nonce", &nonce)
            .header("x-acs-content-sha256", &content_sha256)
            .header("Authorization", authorization);
        if let Some(body) = body {
            request = request.header("Content-Type", FORM_CONTENT_TYPE).body(body);
        }

        let response = http_client::send(request, endpoint.name, action).await?;

        let value: serde_json::Value = match http_client::parse_json(&response.body, endpoint.name) {
            Ok(value) => value,
            // 非 JSON 的 4xx/5xx 响应
            Err(_) if response.is_error_status() => {
                return Err(response.into_network_error(endpoint.name));
            }
            Err(e) => return Err(e),
        };

        if let Some(raw) = extract_api_error(&value) {
            log::error!(
                "[{}] {action} failed: {} - {}",
                endpoint.name,
                raw.code.as_deref().unwrap_or_default(),
                raw.message
            );
            return Err(endpoint.map_error(raw, ctx));
        }

        if response.is_error_status() {
            return Err(response.into_network_error(endpoint.name));
        }

        serde_json::from_value(value).map_err(|e| endpoint.parse_error(e))
    }
}

/// 阿里云错误响应: `{"RequestId": "...", "Code": "...", "Message": "..."}`
fn extract_api_error(value: &serde_json::Value) -> Option<RawApiError> {
    let code = value.get("Code").and_then(|v| v.as_str())?;
    let message = value
        .get("Message")
        .and_then(|v| v.as_str())
        .unwrap_or_default();
    Some(RawApiError::with_code(code, message))
}
