//! 测试辅助模块
//!
//! 提供三个远程 API trait 的内存 mock 实现和便捷的测试工厂方法。

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use aliyun_cert_provider::{
    AddRecordRequest, BoundCertificate, Certificate, CertificateId, CertificateStore, DnsRecord,
    DnsZoneApi, Domain, DomainCertificateApi, ProviderError, RecordFilter, Result, ServiceKind,
    UploadCertificateRequest,
};
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::services::ServiceContext;

fn injected_failure(provider: &str, what: &str) -> ProviderError {
    ProviderError::Unknown {
        provider: provider.to_string(),
        raw_code: Some("InjectedFailure".to_string()),
        raw_message: format!("injected failure: {what}"),
    }
}

// ===== 测试数据工厂 =====

pub fn cert(id: CertificateId, common_name: &str) -> Certificate {
    Certificate {
        id,
        name: format!("cert-{id}"),
        common_name: common_name.to_string(),
        sans: vec![common_name.to_string()],
        issuer: Some("Test CA".to_string()),
        status: Some("ISSUED".to_string()),
        start_date: Some("2024-01-01".to_string()),
        end_date: Some("2024-03-31".to_string()),
        not_after: None,
        expired: false,
    }
}

pub fn domain(name: &str, kind: ServiceKind) -> Domain {
    Domain {
        name: name.to_string(),
        kind,
        status: Some("online".to_string()),
        cname: None,
    }
}

/// CDN 风格的绑定（带证书 ID）
pub fn bound_by_id(id: CertificateId) -> BoundCertificate {
    BoundCertificate {
        cert_id: Some(id.to_string()),
        cert_name: Some(format!("cert-{id}")),
        cert_type: Some("cas".to_string()),
        ..BoundCertificate::default()
    }
}

/// Live 风格的绑定（只有证书名称）
pub fn bound_by_name(name: &str) -> BoundCertificate {
    BoundCertificate {
        cert_name: Some(name.to_string()),
        cert_type: Some("cas".to_string()),
        ..BoundCertificate::default()
    }
}

// ===== MockCertificateStore =====

pub struct MockCertificateStore {
    certs: RwLock<Vec<Certificate>>,
    next_id: RwLock<CertificateId>,
    /// 上传的证书使用的 common name
    upload_common_name: RwLock<String>,
    uploads: RwLock<Vec<UploadCertificateRequest>>,
    deleted: RwLock<Vec<CertificateId>>,
    /// 删除这些 ID 时返回错误
    delete_errors: RwLock<HashSet<CertificateId>>,
}

impl MockCertificateStore {
    pub fn new(certs: Vec<Certificate>) -> Self {
        let next_id = certs.iter().map(|c| c.id).max().unwrap_or(0) + 1000;
        Self {
            certs: RwLock::new(certs),
            next_id: RwLock::new(next_id),
            upload_common_name: RwLock::new("example.com".to_string()),
            uploads: RwLock::new(Vec::new()),
            deleted: RwLock::new(Vec::new()),
            delete_errors: RwLock::new(HashSet::new()),
        }
    }

    pub async fn set_upload_common_name(&self, cn: &str) {
        *self.upload_common_name.write().await = cn.to_string();
    }

    pub async fn fail_delete(&self, id: CertificateId) {
        self.delete_errors.write().await.insert(id);
    }

    pub async fn uploads(&self) -> Vec<UploadCertificateRequest> {
        self.uploads.read().await.clone()
    }

    pub async fn deleted(&self) -> Vec<CertificateId> {
        self.deleted.read().await.clone()
    }

    pub async fn contains(&self, id: CertificateId) -> bool {
        self.certs.read().await.iter().any(|c| c.id == id)
    }
}

#[async_trait]
impl CertificateStore for MockCertificateStore {
    async fn list_certificates(&self) -> Result<Vec<Certificate>> {
        Ok(self.certs.read().await.clone())
    }

    async fn get_certificate(&self, id: CertificateId) -> Result<Certificate> {
        self.certs
            .read()
            .await
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| ProviderError::CertificateNotFound {
                provider: "mock".to_string(),
                certificate_id: id.to_string(),
                raw_message: None,
            })
    }

    async fn upload_certificate(&self, req: &UploadCertificateRequest) -> Result<CertificateId> {
        let id = {
            let mut next = self.next_id.write().await;
            *next += 1;
            *next
        };
        let mut uploaded = cert(id, &self.upload_common_name.read().await);
        uploaded.name.clone_from(&req.name);
        self.certs.write().await.push(uploaded);
        self.uploads.write().await.push(req.clone());
        Ok(id)
    }

    async fn delete_certificate(&self, id: CertificateId) -> Result<()> {
        if self.delete_errors.read().await.contains(&id) {
            return Err(injected_failure("mock", &format!("delete {id}")));
        }
        self.certs.write().await.retain(|c| c.id != id);
        self.deleted.write().await.push(id);
        Ok(())
    }
}

// ===== MockDomainApi =====

pub struct MockDomainApi {
    kind: ServiceKind,
    domains: RwLock<Vec<Domain>>,
    bindings: RwLock<HashMap<String, Vec<BoundCertificate>>>,
    /// (domain, certificate id) 按调用顺序
    set_calls: RwLock<Vec<(String, CertificateId)>>,
    fail_list: RwLock<bool>,
    fail_bindings: RwLock<HashSet<String>>,
    fail_set: RwLock<HashSet<String>>,
}

impl MockDomainApi {
    pub fn new(kind: ServiceKind) -> Self {
        Self {
            kind,
            domains: RwLock::new(Vec::new()),
            bindings: RwLock::new(HashMap::new()),
            set_calls: RwLock::new(Vec::new()),
            fail_list: RwLock::new(false),
            fail_bindings: RwLock::new(HashSet::new()),
            fail_set: RwLock::new(HashSet::new()),
        }
    }

    /// 添加域名及其绑定
    pub async fn add_domain(&self, name: &str, bindings: Vec<BoundCertificate>) {
        self.domains.write().await.push(domain(name, self.kind));
        self.bindings
            .write()
            .await
            .insert(name.to_string(), bindings);
    }

    pub async fn fail_list(&self) {
        *self.fail_list.write().await = true;
    }

    pub async fn fail_bindings_for(&self, name: &str) {
        self.fail_bindings.write().await.insert(name.to_string());
    }

    pub async fn fail_set_for(&self, name: &str) {
        self.fail_set.write().await.insert(name.to_string());
    }

    pub async fn set_calls(&self) -> Vec<(String, CertificateId)> {
        self.set_calls.read().await.clone()
    }

    pub async fn bindings_of(&self, name: &str) -> Vec<BoundCertificate> {
        self.bindings
            .read()
            .await
            .get(name)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl DomainCertificateApi for MockDomainApi {
    fn kind(&self) -> ServiceKind {
        self.kind
    }

    async fn list_domains(&self) -> Result<Vec<Domain>> {
        if *self.fail_list.read().await {
            return Err(injected_failure("mock", "list domains"));
        }
        Ok(self.domains.read().await.clone())
    }

    async fn list_bindings(&self, domain: &str) -> Result<Vec<BoundCertificate>> {
        if self.fail_bindings.read().await.contains(domain) {
            return Err(injected_failure("mock", &format!("bindings of {domain}")));
        }
        Ok(self.bindings_of(domain).await)
    }

    async fn set_certificate(&self, domain: &str, certificate: &Certificate) -> Result<()> {
        if self.fail_set.read().await.contains(domain) {
            return Err(injected_failure("mock", &format!("set {domain}")));
        }
        self.set_calls
            .write()
            .await
            .push((domain.to_string(), certificate.id));

        let binding = match self.kind {
            ServiceKind::Cdn => bound_by_id(certificate.id),
            ServiceKind::Live => bound_by_name(&certificate.name),
        };
        self.bindings
            .write()
            .await
            .insert(domain.to_string(), vec![binding]);
        Ok(())
    }
}

// ===== MockDnsZoneApi =====

pub struct MockDnsZoneApi {
    zones: Vec<String>,
    records: RwLock<Vec<DnsRecord>>,
    next_id: RwLock<u64>,
    zone_queries: RwLock<Vec<String>>,
    deleted: RwLock<Vec<String>>,
}

impl MockDnsZoneApi {
    pub fn new(zones: &[&str]) -> Self {
        Self {
            zones: zones.iter().map(|z| (*z).to_string()).collect(),
            records: RwLock::new(Vec::new()),
            next_id: RwLock::new(9000),
            zone_queries: RwLock::new(Vec::new()),
            deleted: RwLock::new(Vec::new()),
        }
    }

    pub async fn insert_record(&self, record: DnsRecord) {
        self.records.write().await.push(record);
    }

    pub async fn records(&self) -> Vec<DnsRecord> {
        self.records.read().await.clone()
    }

    pub async fn zone_queries(&self) -> Vec<String> {
        self.zone_queries.read().await.clone()
    }

    pub async fn deleted(&self) -> Vec<String> {
        self.deleted.read().await.clone()
    }
}

#[async_trait]
impl DnsZoneApi for MockDnsZoneApi {
    /// 与 Alidns 一样做模糊匹配
    async fn list_zones(&self, keyword: &str) -> Result<Vec<String>> {
        self.zone_queries.write().await.push(keyword.to_string());
        Ok(self
            .zones
            .iter()
            .filter(|z| z.contains(keyword))
            .cloned()
            .collect())
    }

    async fn list_records(&self, zone: &str, filter: &RecordFilter) -> Result<Vec<DnsRecord>> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .filter(|r| r.zone == zone)
            .filter(|r| filter.rr_keyword.as_ref().is_none_or(|k| r.rr.contains(k.as_str())))
            .filter(|r| {
                filter
                    .type_keyword
                    .as_ref()
                    .is_none_or(|t| r.record_type.eq_ignore_ascii_case(t))
            })
            .filter(|r| {
                filter
                    .value_keyword
                    .as_ref()
                    .is_none_or(|v| r.value.contains(v.as_str()))
            })
            .cloned()
            .collect())
    }

    async fn add_record(&self, req: &AddRecordRequest) -> Result<String> {
        let id = {
            let mut next = self.next_id.write().await;
            *next += 1;
            next.to_string()
        };
        self.records.write().await.push(DnsRecord {
            id: Some(id.clone()),
            zone: req.zone.clone(),
            rr: req.rr.clone(),
            record_type: req.record_type.clone(),
            value: req.value.clone(),
            ttl: req.ttl,
        });
        Ok(id)
    }

    async fn delete_record(&self, record_id: &str) -> Result<()> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.id.as_deref() != Some(record_id));
        if records.len() == before {
            return Err(ProviderError::RecordNotFound {
                provider: "mock".to_string(),
                record_id: record_id.to_string(),
                raw_message: None,
            });
        }
        self.deleted.write().await.push(record_id.to_string());
        Ok(())
    }
}

// ===== 上下文工厂 =====

pub struct TestHarness {
    pub ctx: Arc<ServiceContext>,
    pub certificates: Arc<MockCertificateStore>,
    pub cdn: Arc<MockDomainApi>,
    pub live: Arc<MockDomainApi>,
    pub dns: Arc<MockDnsZoneApi>,
}

/// 创建带 mock 依赖的服务上下文
pub fn create_test_context(certs: Vec<Certificate>, zones: &[&str]) -> TestHarness {
    let certificates = Arc::new(MockCertificateStore::new(certs));
    let cdn = Arc::new(MockDomainApi::new(ServiceKind::Cdn));
    let live = Arc::new(MockDomainApi::new(ServiceKind::Live));
    let dns = Arc::new(MockDnsZoneApi::new(zones));

    let ctx = Arc::new(ServiceContext::new(
        certificates.clone(),
        cdn.clone(),
        live.clone(),
        dns.clone(),
    ));

    TestHarness {
        ctx,
        certificates,
        cdn,
        live,
        dns,
    }
}
