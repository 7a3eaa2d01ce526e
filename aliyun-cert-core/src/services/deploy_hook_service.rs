//! certbot deploy hook
//!
//! certbot 续期成功后调用：上传新证书，替换匹配域名的证书，
//! 全部成功时可选删除旧证书。

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Local};

use crate::error::{CoreError, CoreResult};
use crate::services::{CertificateService, ReplacementService, ServiceContext};
use crate::types::{DeletionFailure, DeployReport, DeployRequest};

/// certbot 写出的完整证书链
pub const FULL_CHAIN_FILE: &str = "fullchain.pem";
/// certbot 写出的私钥
pub const PRIVATE_KEY_FILE: &str = "privkey.pem";

/// Deploy hook 服务
pub struct DeployHookService {
    ctx: Arc<ServiceContext>,
}

impl DeployHookService {
    /// 创建 deploy hook 服务实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// 执行部署
    pub async fn deploy(&self, request: &DeployRequest) -> CoreResult<DeployReport> {
        self.deploy_at(request, Local::now()).await
    }

    pub async fn deploy_at(
        &self,
        request: &DeployRequest,
        now: DateTime<Local>,
    ) -> CoreResult<DeployReport> {
        let Some(primary) = request.renewed_domains.first() else {
            return Err(CoreError::Validation(
                "renewed domain list is empty".to_string(),
            ));
        };
        if request.scope.is_empty() {
            return Err(CoreError::Validation(
                "at least one of CDN or Live must be selected".to_string(),
            ));
        }

        let full_chain = read_pem(&request.cert_dir.join(FULL_CHAIN_FILE)).await?;
        let private_key = read_pem(&request.cert_dir.join(PRIVATE_KEY_FILE)).await?;

        let certificate = CertificateService::new(Arc::clone(&self.ctx))
            .upload_at(primary, &full_chain, &private_key, now)
            .await?;
        log::info!(
            "Certificate for <{}> uploaded, id: <{}>",
            request.renewed_domains.join(" "),
            certificate.id
        );

        let reports = ReplacementService::new(Arc::clone(&self.ctx))
            .replace_in_scope(certificate.id, request.scope)
            .await?;

        let mut report = DeployReport {
            certificate,
            reports,
            deleted: BTreeSet::new(),
            deletion_failures: Vec::new(),
        };

        if !request.delete_old {
            return Ok(report);
        }
        if report.has_failures() {
            log::warn!("Some domains failed to switch certificates, old certificates are kept");
            return Ok(report);
        }

        for id in report.superseded() {
            if id == report.certificate.id {
                continue;
            }
            match self.ctx.certificates.delete_certificate(id).await {
                Ok(()) => {
                    log::info!("Deleted old certificate <{id}>");
                    report.deleted.insert(id);
                }
                Err(e) => {
                    log::error!("Failed to delete old certificate <{id}>: {e}");
                    report.deletion_failures.push(DeletionFailure {
                        certificate_id: id,
                        error: e.to_string(),
                    });
                }
            }
        }

        Ok(report)
    }
}

async fn read_pem(path: &Path) -> CoreResult<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| CoreError::io(path, &e))
}
