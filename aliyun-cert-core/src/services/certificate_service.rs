//! 证书管理服务

use std::sync::Arc;

use aliyun_cert_provider::UploadCertificateRequest;
use chrono::{DateTime, Local};

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::types::{Certificate, CertificateId};

/// 证书管理服务
pub struct CertificateService {
    ctx: Arc<ServiceContext>,
}

impl CertificateService {
    /// 创建证书服务实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// 列出已上传的证书（单页）
    pub async fn list(&self) -> CoreResult<Vec<Certificate>> {
        Ok(self.ctx.certificates.list_certificates().await?)
    }

    /// 获取证书详情
    pub async fn get(&self, id: CertificateId) -> CoreResult<Certificate> {
        Ok(self.ctx.certificates.get_certificate(id).await?)
    }

    /// 上传证书，以当前本地时间命名
    pub async fn upload(
        &self,
        domain: &str,
        full_chain: &str,
        private_key: &str,
    ) -> CoreResult<Certificate> {
        self.upload_at(domain, full_chain, private_key, Local::now())
            .await
    }

    /// 上传证书并重新读取完整记录
    pub async fn upload_at(
        &self,
        domain: &str,
        full_chain: &str,
        private_key: &str,
        now: DateTime<Local>,
    ) -> CoreResult<Certificate> {
        let domain = domain.trim();
        if domain.is_empty() {
            return Err(CoreError::Validation(
                "a domain is required to name the certificate".to_string(),
            ));
        }
        if full_chain.trim().is_empty() || private_key.trim().is_empty() {
            return Err(CoreError::Validation(
                "certificate chain and private key must not be empty".to_string(),
            ));
        }

        let request = UploadCertificateRequest {
            name: certificate_name(domain, now),
            certificate: full_chain.to_string(),
            private_key: private_key.to_string(),
        };

        let id = self.ctx.certificates.upload_certificate(&request).await?;
        log::info!("Certificate {} uploaded for {domain}, id: {id}", request.name);

        self.get(id).await
    }

    /// 删除证书
    pub async fn delete(&self, id: CertificateId) -> CoreResult<()> {
        self.ctx.certificates.delete_certificate(id).await?;
        log::info!("Certificate {id} deleted");
        Ok(())
    }
}

/// `example.com` + 2024-01-02 03:04:05 -> `example_com_20240102T030405`
pub(crate) fn certificate_name(domain: &str, now: DateTime<Local>) -> String {
    format!(
        "{}{}",
        domain.replace('.', "_"),
        now.format("_%Y%m%dT%H%M%S")
    )
}
