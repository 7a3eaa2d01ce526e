use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::types::{
    AddRecordRequest, BoundCertificate, Certificate, CertificateId, DnsRecord, Domain,
    RecordFilter, ServiceKind, UploadCertificateRequest,
};

/// 原始 API 错误（内部使用）
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// 错误码（如 `InvalidAccessKeyId.NotFound`）
    pub code: Option<String>,
    /// 原始错误消息
    pub message: String,
}

impl RawApiError {
    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

/// 错误上下文信息（内部使用）
/// 用于在映射错误时提供额外信息
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// 证书 ID（用于 `CertificateNotFound`）
    pub certificate_id: Option<String>,
    /// 域名或 zone（用于 `DomainNotFound`）
    pub domain: Option<String>,
    /// 记录 ID（用于 `RecordNotFound`）
    pub record_id: Option<String>,
}

impl ErrorContext {
    pub fn certificate(id: CertificateId) -> Self {
        Self {
            certificate_id: Some(id.to_string()),
            ..Self::default()
        }
    }

    pub fn domain(domain: &str) -> Self {
        Self {
            domain: Some(domain.to_string()),
            ..Self::default()
        }
    }

    pub fn record(record_id: &str) -> Self {
        Self {
            record_id: Some(record_id.to_string()),
            ..Self::default()
        }
    }
}

/// 错误映射 Trait（内部使用）
/// 每个阿里云产品端点实现此 trait，将原始 API 错误映射到统一错误类型
pub(crate) trait ProviderErrorMapper {
    /// 返回产品标识符
    fn provider_name(&self) -> &'static str;

    /// 将原始 API 错误映射到统一错误类型
    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError;

    /// 快捷方法：解析错误
    fn parse_error(&self, detail: impl ToString) -> ProviderError {
        ProviderError::ParseError {
            provider: self.provider_name().to_string(),
            detail: detail.to_string(),
        }
    }

    /// 快捷方法：未知错误（fallback）
    fn unknown_error(&self, raw: RawApiError) -> ProviderError {
        ProviderError::Unknown {
            provider: self.provider_name().to_string(),
            raw_code: raw.code,
            raw_message: raw.message,
        }
    }
}

/// 证书仓库 (CAS)
#[async_trait]
pub trait CertificateStore: Send + Sync {
    /// 列出已上传的证书（单页）
    async fn list_certificates(&self) -> Result<Vec<Certificate>>;

    /// 获取证书详情，不存在时返回 [`ProviderError::CertificateNotFound`]
    async fn get_certificate(&self, id: CertificateId) -> Result<Certificate>;

    /// 上传证书，返回新证书 ID
    async fn upload_certificate(&self, req: &UploadCertificateRequest) -> Result<CertificateId>;

    /// 删除证书
    async fn delete_certificate(&self, id: CertificateId) -> Result<()>;
}

/// 域名证书绑定 API（CDN 与 Live 各有一个实现）
#[async_trait]
pub trait DomainCertificateApi: Send + Sync {
    /// 服务类型
    fn kind(&self) -> ServiceKind;

    /// 列出域名（单页）
    ///
    /// CDN 只返回已开启 HTTPS 的域名。
    async fn list_domains(&self) -> Result<Vec<Domain>>;

    /// 获取域名当前绑定的证书
    async fn list_bindings(&self, domain: &str) -> Result<Vec<BoundCertificate>>;

    /// 将证书绑定到域名并开启 HTTPS
    ///
    /// CDN 按证书 ID 绑定，Live 按证书名称绑定。
    async fn set_certificate(&self, domain: &str, certificate: &Certificate) -> Result<()>;
}

/// DNS 解析 API (Alidns)
#[async_trait]
pub trait DnsZoneApi: Send + Sync {
    /// 按关键字搜索托管的 zone，返回 zone 名称
    async fn list_zones(&self, keyword: &str) -> Result<Vec<String>>;

    /// 列出 zone 下匹配过滤条件的记录（单页）
    async fn list_records(&self, zone: &str, filter: &RecordFilter) -> Result<Vec<DnsRecord>>;

    /// 创建记录，返回记录 ID
    async fn add_record(&self, req: &AddRecordRequest) -> Result<String>;

    /// 删除记录
    async fn delete_record(&self, record_id: &str) -> Result<()>;
}
