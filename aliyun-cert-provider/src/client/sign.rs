//! 阿里云 ACS3-HMAC-SHA256 签名

use super::common::{hmac_sha256, sha256_hex};
use super::{AliyunClient, Endpoint};

const SIGNED_HEADERS: &str =
    "host;x-acs-action;x-acs-content-sha256;x-acs-date;x-acs-signature-nonce;x-acs-version";

impl AliyunClient {
    /// 生成 ACS3-HMAC-SHA256 签名，返回 Authorization 头
    /// 参考: <https://www.alibabacloud.com/help/zh/sdk/product-overview/v3-request-structure-and-signature>
    ///
    /// `content_sha256` 为请求体的十六进制 SHA256（空 body 使用 `EMPTY_BODY_SHA256`）。
    pub(crate) fn sign(
        &self,
        endpoint: &Endpoint,
        action: &str,
        query_string: &str,
        content_sha256: &str,
        timestamp: &str,
        nonce: &str,
    ) -> String {
        let host = endpoint.host;
        let version = endpoint.version;

        // 1. 规范化请求头
        let canonical_headers = format!(
            "host:{host}\nx-acs-action:{action}\nx-acs-content-sha256:{content_sha256}\nx-acs-date:{timestamp}\nx-acs-signature-nonce:{nonce}\nx-acs-version:{version}\n"
        );

        // 2. 规范化请求 (RPC 风格)
        let canonical_request = format!(
            "POST\n/\n{query_string}\n{canonical_headers}\n{SIGNED_HEADERS}\n{content_sha256}"
        );

        log::debug!("[{}] CanonicalRequest:\n{canonical_request}", endpoint.name);

        // 3. 待签名字符串
        let string_to_sign = format!(
            "ACS3-HMAC-SHA256\n{}",
            sha256_hex(canonical_request.as_bytes())
        );

        // 4. 签名
        let signature = hex::encode(hmac_sha256(
            self.access_key.secret.as_bytes(),
            string_to_sign.as_bytes(),
        ));

        format!(
            "ACS3-HMAC-SHA256 Credential={},SignedHeaders={SIGNED_HEADERS},Signature={signature}",
            self.access_key.id
        )
    }
}
