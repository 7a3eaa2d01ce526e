//! 业务逻辑服务层

mod certificate_service;
mod deploy_hook_service;
mod dns_challenge_service;
mod domain_service;
mod replacement_service;

pub use certificate_service::CertificateService;
pub use deploy_hook_service::{DeployHookService, FULL_CHAIN_FILE, PRIVATE_KEY_FILE};
pub use dns_challenge_service::{
    CHALLENGE_TTL, DnsChallengeService, relative_name, validation_name, zone_candidates,
};
pub use domain_service::DomainService;
pub use replacement_service::ReplacementService;

use std::sync::Arc;

use aliyun_cert_provider::{CertificateStore, ClientSet, DnsZoneApi, DomainCertificateApi};

use crate::types::ServiceKind;

/// 服务上下文 - 持有所有远程 API 句柄
///
/// 平台层创建此上下文并注入具体实现（生产环境为阿里云客户端，测试中为 mock）。
pub struct ServiceContext {
    /// 证书仓库
    pub certificates: Arc<dyn CertificateStore>,
    /// CDN 域名
    pub cdn: Arc<dyn DomainCertificateApi>,
    /// 直播域名
    pub live: Arc<dyn DomainCertificateApi>,
    /// 云解析
    pub dns: Arc<dyn DnsZoneApi>,
}

impl ServiceContext {
    /// 创建服务上下文
    #[must_use]
    pub fn new(
        certificates: Arc<dyn CertificateStore>,
        cdn: Arc<dyn DomainCertificateApi>,
        live: Arc<dyn DomainCertificateApi>,
        dns: Arc<dyn DnsZoneApi>,
    ) -> Self {
        Self {
            certificates,
            cdn,
            live,
            dns,
        }
    }

    /// 按服务类型获取域名 API
    #[must_use]
    pub fn domain_api(&self, kind: ServiceKind) -> &Arc<dyn DomainCertificateApi> {
        match kind {
            ServiceKind::Cdn => &self.cdn,
            ServiceKind::Live => &self.live,
        }
    }
}

impl From<ClientSet> for ServiceContext {
    fn from(clients: ClientSet) -> Self {
        Self::new(clients.certificates, clients.cdn, clients.live, clients.dns)
    }
}
