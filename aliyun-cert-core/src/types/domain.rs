use serde::Serialize;

use super::{BoundCertificate, Domain, DomainFailure};

/// 域名及其当前绑定的证书
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainBindings {
    pub domain: Domain,
    pub bindings: Vec<BoundCertificate>,
}

/// 域名列表结果，单个域名的绑定查询失败不影响其他域名
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainListing {
    pub domains: Vec<DomainBindings>,
    pub failures: Vec<DomainFailure>,
}
