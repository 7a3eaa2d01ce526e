use std::collections::BTreeSet;

use serde::Serialize;

use super::{Certificate, CertificateId, ServiceKind};

/// 单个域名的处理失败
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainFailure {
    pub domain: String,
    pub error: String,
}

/// 一次证书替换的结果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplacementReport {
    /// 服务类型
    pub kind: ServiceKind,
    /// 目标（新）证书
    pub certificate: Certificate,
    /// 成功换绑的域名，按处理顺序
    pub replaced: Vec<String>,
    /// 本次被替换下来的旧证书 ID
    pub superseded: BTreeSet<CertificateId>,
    /// 单个域名的失败
    pub failures: Vec<DomainFailure>,
    /// 域名列表查询失败，此时该服务没有处理任何域名
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_error: Option<String>,
}

impl ReplacementReport {
    pub(crate) fn new(kind: ServiceKind, certificate: Certificate) -> Self {
        Self {
            kind,
            certificate,
            replaced: Vec::new(),
            superseded: BTreeSet::new(),
            failures: Vec::new(),
            list_error: None,
        }
    }

    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.list_error.is_some() || !self.failures.is_empty()
    }
}
