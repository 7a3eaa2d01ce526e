//! 域名管理服务

use std::sync::Arc;

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::types::{
    Certificate, CertificateId, Domain, DomainBindings, DomainFailure, DomainListing, ServiceKind,
};

/// CDN / 直播域名服务
pub struct DomainService {
    ctx: Arc<ServiceContext>,
}

impl DomainService {
    /// 创建域名服务实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// 列出域名及其当前绑定的证书
    ///
    /// 域名列表查询失败直接返回错误；单个域名的绑定查询失败记录在 `failures` 中。
    pub async fn list_with_bindings(&self, kind: ServiceKind) -> CoreResult<DomainListing> {
        let api = self.ctx.domain_api(kind);
        let domains = api.list_domains().await?;

        let mut listing = DomainListing::default();
        for domain in domains {
            match api.list_bindings(&domain.name).await {
                Ok(bindings) => listing.domains.push(DomainBindings { domain, bindings }),
                Err(e) => {
                    log::error!("Failed to fetch certificates of {kind} domain {}: {e}", domain.name);
                    listing.failures.push(DomainFailure {
                        domain: domain.name,
                        error: e.to_string(),
                    });
                }
            }
        }
        Ok(listing)
    }

    /// 为单个域名设置证书
    pub async fn set_certificate(
        &self,
        kind: ServiceKind,
        cert_id: CertificateId,
        domain_name: &str,
    ) -> CoreResult<(Certificate, Domain)> {
        let certificate = self.ctx.certificates.get_certificate(cert_id).await?;

        let api = self.ctx.domain_api(kind);
        let domain = api
            .list_domains()
            .await?
            .into_iter()
            .find(|d| d.name == domain_name)
            .ok_or_else(|| CoreError::DomainNotFound(format!("{} {domain_name}", kind.label())))?;

        api.set_certificate(&domain.name, &certificate).await?;
        log::info!(
            "Certificate {cert_id} set for {} domain {}",
            kind.label(),
            domain.name
        );
        Ok((certificate, domain))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{bound_by_id, bound_by_name, cert, create_test_context};

    #[tokio::test]
    async fn list_with_bindings_isolates_binding_failures() {
        let h = create_test_context(vec![], &[]);
        h.cdn.add_domain("a.example.com", vec![bound_by_id(1)]).await;
        h.cdn.add_domain("b.example.com", vec![]).await;
        h.cdn.add_domain("c.example.com", vec![bound_by_id(2)]).await;
        h.cdn.fail_bindings_for("b.example.com").await;

        let svc = DomainService::new(h.ctx.clone());
        let listing = svc.list_with_bindings(ServiceKind::Cdn).await.unwrap();

        let names: Vec<_> = listing.domains.iter().map(|d| d.domain.name.as_str()).collect();
        assert_eq!(names, vec!["a.example.com", "c.example.com"]);
        assert_eq!(listing.domains[0].bindings[0].certificate_id(), Some(1));
        assert_eq!(listing.failures.len(), 1);
        assert_eq!(listing.failures[0].domain, "b.example.com");
    }

    #[tokio::test]
    async fn list_with_bindings_uses_requested_service() {
        let h = create_test_context(vec![], &[]);
        h.cdn.add_domain("cdn.example.com", vec![]).await;
        h.live.add_domain("live.example.com", vec![bound_by_name("n")]).await;

        let svc = DomainService::new(h.ctx.clone());
        let listing = svc.list_with_bindings(ServiceKind::Live).await.unwrap();

        assert_eq!(listing.domains.len(), 1);
        assert_eq!(listing.domains[0].domain.name, "live.example.com");
        assert_eq!(listing.domains[0].domain.kind, ServiceKind::Live);
    }

    #[tokio::test]
    async fn list_failure_is_fatal() {
        let h = create_test_context(vec![], &[]);
        h.cdn.fail_list().await;

        let svc = DomainService::new(h.ctx.clone());
        assert!(matches!(
            svc.list_with_bindings(ServiceKind::Cdn).await,
            Err(CoreError::RemoteApi(_))
        ));
    }

    #[tokio::test]
    async fn set_certificate_binds_domain() {
        let h = create_test_context(vec![cert(7, "example.com")], &[]);
        h.cdn.add_domain("cdn.example.com", vec![]).await;

        let svc = DomainService::new(h.ctx.clone());
        let (c, d) = svc
            .set_certificate(ServiceKind::Cdn, 7, "cdn.example.com")
            .await
            .unwrap();

        assert_eq!(c.id, 7);
        assert_eq!(d.name, "cdn.example.com");
        assert_eq!(h.cdn.set_calls().await, vec![("cdn.example.com".to_string(), 7)]);
    }

    #[tokio::test]
    async fn set_certificate_missing_certificate_touches_nothing() {
        let h = create_test_context(vec![], &[]);
        h.cdn.add_domain("cdn.example.com", vec![]).await;

        let svc = DomainService::new(h.ctx.clone());
        let err = svc
            .set_certificate(ServiceKind::Cdn, 7, "cdn.example.com")
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::CertificateNotFound(_)));
        assert!(h.cdn.set_calls().await.is_empty());
    }

    #[tokio::test]
    async fn set_certificate_missing_domain() {
        let h = create_test_context(vec![cert(7, "example.com")], &[]);
        h.live.add_domain("live.example.com", vec![]).await;

        let svc = DomainService::new(h.ctx.clone());
        let err = svc
            .set_certificate(ServiceKind::Live, 7, "other.example.com")
            .await
            .unwrap_err();

        assert!(matches!(&err, CoreError::DomainNotFound(d) if d.contains("other.example.com")));
        assert!(h.live.set_calls().await.is_empty());
    }
}
