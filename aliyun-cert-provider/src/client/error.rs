//! 阿里云错误映射
//!
//! 参考:
//! - <https://api.aliyun.com/document/cas/2020-04-07/errorCode>
//! - <https://api.aliyun.com/document/Cdn/2018-05-10/errorCode>
//! - <https://api.aliyun.com/document/live/2016-11-01/errorCode>
//! - <https://api.aliyun.com/document/Alidns/2015-01-09/errorCode>

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::Endpoint;

impl ProviderErrorMapper for Endpoint {
    fn provider_name(&self) -> &'static str {
        self.name
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        let provider = self.provider_name().to_string();

        match raw.code.as_deref() {
            // ============ 认证错误 ============
            Some(
                "InvalidAccessKeyId.NotFound"
                | "InvalidAccessKeyId.Inactive"
                | "InvalidAccessKeyId"
                | "SignatureDoesNotMatch"
                | "IncompleteSignature",
            ) => ProviderError::InvalidCredentials {
                provider,
                raw_message: Some(raw.message),
            },

            // ============ 权限不足 ============
            Some(
                "Forbidden"
                | "Forbidden.RAM"
                | "Forbidden.NoPermission"
                | "Forbidden.RiskControl"
                | "NoPermission"
                | "OperationDomain.NoPermission"
                | "IllegalUser"
                | "IncorrectDomainUser",
            ) => ProviderError::PermissionDenied {
                provider,
                raw_message: Some(raw.message),
            },

            // ============ 通用资源不存在，按端点和上下文归类 ============
            Some("NotFound" | "NotFoundResource" | "ResourceNotFound") => {
                self.resource_not_found(raw, context)
            }

            // ============ 证书不存在 ============
            Some(
                "CertNotExist"
                | "CertificateNotFound"
                | "InvalidCertificate.NotFound",
            ) => ProviderError::CertificateNotFound {
                provider,
                certificate_id: context.certificate_id.unwrap_or_default(),
                raw_message: Some(raw.message),
            },

            // ============ 域名 / zone 不存在 ============
            Some(
                "InvalidDomain.NotFound"
                | "DomainNotExist"
                | "InvalidDomainName.NoExist"
                | "DomainNotFound"
                | "PdnsZone.NotExists",
            ) => ProviderError::DomainNotFound {
                provider,
                domain: context.domain.unwrap_or_default(),
                raw_message: Some(raw.message),
            },

            // ============ 记录不存在 ============
            Some(
                "DomainRecordNotBelongToUser"
                | "InvalidRecordId.NotFound"
                | "InvalidRR.NoExist"
                | "PdnsRecord.NotExists",
            ) => ProviderError::RecordNotFound {
                provider,
                record_id: context.record_id.unwrap_or_default(),
                raw_message: Some(raw.message),
            },

            // ============ 频率限流 ============
            Some("Throttling" | "Throttling.User" | "Throttling.Api" | "ServiceUnavailable") => {
                ProviderError::RateLimited {
                    provider,
                    retry_after: None,
                    raw_message: Some(raw.message),
                }
            }

            // ============ 参数无效 - 证书内容 ============
            Some(
                "InvalidCert"
                | "InvalidCertificate"
                | "InvalidParameter.Cert"
                | "CertificateFormatError"
                | "InvalidCertificate.TooLong"
                | "InvalidCertificate.Format",
            ) => ProviderError::InvalidParameter {
                provider,
                param: "cert".to_string(),
                detail: raw.message,
            },

            // ============ 参数无效 - 私钥 ============
            Some("InvalidKey" | "InvalidParameter.Key" | "CertificateKeyMismatch") => {
                ProviderError::InvalidParameter {
                    provider,
                    param: "key".to_string(),
                    detail: raw.message,
                }
            }

            // ============ 参数无效 - 证书名称 ============
            Some("NameRepeat" | "InvalidParameter.Name" | "CertNameExist") => {
                ProviderError::InvalidParameter {
                    provider,
                    param: "name".to_string(),
                    detail: raw.message,
                }
            }

            // ============ 参数无效 - 主机记录 ============
            Some(
                "InvalidRR.RrEmpty" | "InvalidRR.Format" | "Record.Invalid.Rr" | "InvalidRR.Length",
            ) => ProviderError::InvalidParameter {
                provider,
                param: "rr".to_string(),
                detail: raw.message,
            },

            // ============ 参数无效 - TTL ============
            Some("SubDomainInvalid.TTL" | "PdnsRecord.InvalidTtl" | "QuotaExceeded.TTL") => {
                ProviderError::InvalidParameter {
                    provider,
                    param: "ttl".to_string(),
                    detail: raw.message,
                }
            }

            // ============ 记录重复 ============
            Some("DomainRecordDuplicate" | "DomainRecordConflict") => {
                ProviderError::InvalidParameter {
                    provider,
                    param: "record".to_string(),
                    detail: raw.message,
                }
            }

            // ============ 配额限制 ============
            Some(code) if code.starts_with("QuotaExceeded") || code.ends_with(".QuotaExceeded") => {
                ProviderError::QuotaExceeded {
                    provider,
                    raw_message: Some(raw.message),
                }
            }

            // ============ 其他参数错误 ============
            Some(code)
                if code.starts_with("InvalidParameter") || code.starts_with("MissingParameter") =>
            {
                let param = code
                    .split_once('.')
                    .map_or_else(|| "unknown".to_string(), |(_, p)| p.to_string());
                ProviderError::InvalidParameter {
                    provider,
                    param,
                    detail: raw.message,
                }
            }

            // ============ 其他错误 fallback ============
            _ => self.unknown_error(raw),
        }
    }
}

impl Endpoint {
    fn resource_not_found(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        let provider = self.provider_name().to_string();
        let raw_message = Some(raw.message.clone());

        if self.name == "cas" || context.certificate_id.is_some() {
            return ProviderError::CertificateNotFound {
                provider,
                certificate_id: context.certificate_id.unwrap_or_default(),
                raw_message,
            };
        }
        if let Some(record_id) = context.record_id {
            return ProviderError::RecordNotFound {
                provider,
                record_id,
                raw_message,
            };
        }
        if let Some(domain) = context.domain {
            return ProviderError::DomainNotFound {
                provider,
                domain,
                raw_message,
            };
        }
        self.unknown_error(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::super::{ALIDNS, CAS, CDN, LIVE};
    use super::*;

    fn raw(code: &str) -> RawApiError {
        RawApiError::with_code(code, "msg")
    }

    #[test]
    fn credentials_error_on_every_endpoint() {
        for endpoint in [CAS, CDN, LIVE, ALIDNS] {
            let err = endpoint.map_error(raw("SignatureDoesNotMatch"), ErrorContext::default());
            assert!(
                matches!(&err, ProviderError::InvalidCredentials { provider, .. } if provider == endpoint.name),
                "unexpected: {err:?}"
            );
        }
    }

    #[test]
    fn certificate_not_found_carries_id() {
        let err = CAS.map_error(raw("NotFound"), ErrorContext::certificate(42));
        assert!(
            matches!(&err, ProviderError::CertificateNotFound { certificate_id, .. } if certificate_id == "42"),
            "unexpected: {err:?}"
        );
    }

    #[test]
    fn generic_not_found_follows_endpoint_and_context() {
        let err = CDN.map_error(raw("NotFound"), ErrorContext::domain("cdn.example.com"));
        assert!(
            matches!(&err, ProviderError::DomainNotFound { domain, .. } if domain == "cdn.example.com"),
            "unexpected: {err:?}"
        );

        let err = ALIDNS.map_error(raw("ResourceNotFound"), ErrorContext::record("9001"));
        assert!(
            matches!(&err, ProviderError::RecordNotFound { record_id, .. } if record_id == "9001"),
            "unexpected: {err:?}"
        );

        let err = LIVE.map_error(raw("NotFoundResource"), ErrorContext::certificate(7));
        assert!(
            matches!(&err, ProviderError::CertificateNotFound { certificate_id, .. } if certificate_id == "7"),
            "unexpected: {err:?}"
        );

        let err = CDN.map_error(raw("NotFound"), ErrorContext::default());
        assert!(
            !matches!(err, ProviderError::CertificateNotFound { .. }),
            "unexpected: {err:?}"
        );
    }

    #[test]
    fn domain_not_found_carries_domain() {
        let err = CDN.map_error(
            raw("InvalidDomain.NotFound"),
            ErrorContext::domain("cdn.example.com"),
        );
        assert!(
            matches!(&err, ProviderError::DomainNotFound { domain, .. } if domain == "cdn.example.com"),
            "unexpected: {err:?}"
        );
    }

    #[test]
    fn record_not_found_carries_id() {
        let err = ALIDNS.map_error(raw("InvalidRecordId.NotFound"), ErrorContext::record("9001"));
        assert!(
            matches!(&err, ProviderError::RecordNotFound { record_id, .. } if record_id == "9001"),
            "unexpected: {err:?}"
        );
    }

    #[test]
    fn throttling_is_rate_limited() {
        let err = LIVE.map_error(raw("Throttling.User"), ErrorContext::default());
        assert!(matches!(err, ProviderError::RateLimited { .. }));
    }

    #[test]
    fn quota_prefix_and_suffix() {
        assert!(matches!(
            ALIDNS.map_error(raw("QuotaExceeded.Record"), ErrorContext::default()),
            ProviderError::QuotaExceeded { .. }
        ));
        assert!(matches!(
            ALIDNS.map_error(raw("LineDnsSlb.QuotaExceeded"), ErrorContext::default()),
            ProviderError::QuotaExceeded { .. }
        ));
    }

    #[test]
    fn generic_invalid_parameter_extracts_name() {
        let err = CDN.map_error(raw("InvalidParameter.SSLProtocol"), ErrorContext::default());
        assert!(
            matches!(&err, ProviderError::InvalidParameter { param, .. } if param == "SSLProtocol"),
            "unexpected: {err:?}"
        );
    }

    #[test]
    fn unknown_code_falls_back() {
        let err = CAS.map_error(raw("SomethingNew"), ErrorContext::default());
        assert!(
            matches!(&err, ProviderError::Unknown { raw_code: Some(c), .. } if c == "SomethingNew"),
            "unexpected: {err:?}"
        );
    }
}
