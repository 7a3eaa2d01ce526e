//! 证书替换服务
//!
//! 找出当前绑定证书与新证书 common name 相同的域名，并换绑到新证书。
//!
//! 匹配规则（按绑定顺序，命中即停）：
//! 1. 绑定的证书 ID 已在本次运行中被标记为"已替换"，直接选中；
//! 2. 绑定的证书 common name 与目标相同且 ID 不同，标记其 ID 并选中。
//!
//! CDN 返回的绑定带证书 ID，按 ID 解析；直播只返回证书名称，按名称解析。
//! 无法解析的绑定（证书不在列表中）跳过。

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use aliyun_cert_provider::DomainCertificateApi;

use crate::error::CoreResult;
use crate::services::ServiceContext;
use crate::types::{
    BoundCertificate, Certificate, CertificateId, DomainFailure, ReplacementReport, ServiceKind,
    ServiceScope,
};

/// 证书替换服务
pub struct ReplacementService {
    ctx: Arc<ServiceContext>,
}

/// 证书列表索引
struct CertificateIndex {
    by_id: HashMap<CertificateId, Certificate>,
    by_name: HashMap<String, CertificateId>,
}

impl CertificateIndex {
    fn new(certs: Vec<Certificate>) -> Self {
        let by_name = certs.iter().map(|c| (c.name.clone(), c.id)).collect();
        let by_id = certs.into_iter().map(|c| (c.id, c)).collect();
        Self { by_id, by_name }
    }

    fn resolve(&self, kind: ServiceKind, binding: &BoundCertificate) -> Option<&Certificate> {
        let id = match kind {
            ServiceKind::Cdn => binding.certificate_id()?,
            ServiceKind::Live => *self.by_name.get(binding.cert_name.as_deref()?)?,
        };
        self.by_id.get(&id)
    }
}

impl ReplacementService {
    /// 创建替换服务实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// 在一个服务的所有域名上执行替换
    ///
    /// 目标证书不存在时返回 `CertificateNotFound`，不做任何修改。
    /// 证书列表查询失败直接返回错误；域名列表失败记录在 `list_error`，
    /// 单个域名的失败记录在 `failures`。
    pub async fn replace_matching(
        &self,
        cert_id: CertificateId,
        kind: ServiceKind,
    ) -> CoreResult<ReplacementReport> {
        let (target, index) = self.prepare(cert_id).await?;
        Ok(self.replace_with(kind, &target, &index).await)
    }

    /// 依次对 scope 中的服务执行替换（CDN 在前）
    ///
    /// 证书只解析一次；某个服务的域名列表失败不影响已完成的服务，
    /// 也不阻止后续服务。
    pub async fn replace_in_scope(
        &self,
        cert_id: CertificateId,
        scope: ServiceScope,
    ) -> CoreResult<Vec<ReplacementReport>> {
        let (target, index) = self.prepare(cert_id).await?;
        let mut reports = Vec::new();
        for kind in scope.kinds() {
            reports.push(self.replace_with(kind, &target, &index).await);
        }
        Ok(reports)
    }

    /// 读取目标证书并建立证书索引，此时尚未修改任何绑定
    async fn prepare(&self, cert_id: CertificateId) -> CoreResult<(Certificate, CertificateIndex)> {
        let target = self.ctx.certificates.get_certificate(cert_id).await?;
        let index = CertificateIndex::new(self.ctx.certificates.list_certificates().await?);
        Ok((target, index))
    }

    async fn replace_with(
        &self,
        kind: ServiceKind,
        target: &Certificate,
        index: &CertificateIndex,
    ) -> ReplacementReport {
        let mut report = ReplacementReport::new(kind, target.clone());
        let api = self.ctx.domain_api(kind);

        let domains = match api.list_domains().await {
            Ok(domains) => domains,
            Err(e) => {
                log::error!("Failed to list {} domains: {e}", kind.label());
                report.list_error = Some(e.to_string());
                return report;
            }
        };

        for domain in domains {
            match Self::replace_one(api.as_ref(), index, &domain.name, &mut report).await {
                Ok(true) => {
                    log::info!(
                        "Certificate {} set for {} domain {}",
                        target.id,
                        kind.label(),
                        domain.name
                    );
                    report.replaced.push(domain.name);
                }
                Ok(false) => {
                    log::debug!("{} domain {} not matched", kind.label(), domain.name);
                }
                Err(e) => {
                    log::error!(
                        "Failed to replace certificate of {} domain {}: {e}",
                        kind.label(),
                        domain.name
                    );
                    report.failures.push(DomainFailure {
                        domain: domain.name,
                        error: e.to_string(),
                    });
                }
            }
        }

        report
    }

    /// 处理单个域名，返回是否换绑
    async fn replace_one(
        api: &dyn DomainCertificateApi,
        index: &CertificateIndex,
        domain: &str,
        report: &mut ReplacementReport,
    ) -> CoreResult<bool> {
        let bindings = api.list_bindings(domain).await?;

        if !select(
            api.kind(),
            index,
            &bindings,
            &report.certificate,
            &mut report.superseded,
        ) {
            return Ok(false);
        }

        api.set_certificate(domain, &report.certificate).await?;
        Ok(true)
    }
}

/// 判断域名是否需要换绑，首次匹配的旧证书 ID 写入 `superseded`
fn select(
    kind: ServiceKind,
    index: &CertificateIndex,
    bindings: &[BoundCertificate],
    target: &Certificate,
    superseded: &mut BTreeSet<CertificateId>,
) -> bool {
    for binding in bindings {
        let Some(current) = index.resolve(kind, binding) else {
            continue;
        };
        if superseded.contains(&current.id) {
            return true;
        }
        if current.common_name == target.common_name && current.id != target.id {
            superseded.insert(current.id);
            return true;
        }
    }
    false
}
