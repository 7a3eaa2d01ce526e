use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::Serialize;

use super::{Certificate, CertificateId, ReplacementReport, ServiceScope};

/// certbot deploy hook 的输入
#[derive(Debug, Clone)]
pub struct DeployRequest {
    /// 包含 `fullchain.pem` 与 `privkey.pem` 的目录（`RENEWED_LINEAGE`）
    pub cert_dir: PathBuf,
    /// 续期的域名，第一个用于证书命名
    pub renewed_domains: Vec<String>,
    pub scope: ServiceScope,
    /// 全部换绑成功后删除旧证书
    pub delete_old: bool,
}

impl DeployRequest {
    /// 解析 `RENEWED_DOMAINS` 格式（空格分隔）
    #[must_use]
    pub fn parse_renewed_domains(raw: &str) -> Vec<String> {
        raw.split_whitespace().map(str::to_string).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletionFailure {
    pub certificate_id: CertificateId,
    pub error: String,
}

/// deploy hook 的结果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployReport {
    /// 新上传的证书
    pub certificate: Certificate,
    /// 每个服务一份替换结果
    pub reports: Vec<ReplacementReport>,
    /// 已删除的旧证书
    pub deleted: BTreeSet<CertificateId>,
    pub deletion_failures: Vec<DeletionFailure>,
}

impl DeployReport {
    /// 是否有任何域名换绑或旧证书删除失败
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.deletion_failures.is_empty()
            || self.reports.iter().any(ReplacementReport::has_failures)
    }

    /// 所有服务中被替换下来的旧证书
    #[must_use]
    pub fn superseded(&self) -> BTreeSet<CertificateId> {
        self.reports
            .iter()
            .flat_map(|r| r.superseded.iter().copied())
            .collect()
    }
}
