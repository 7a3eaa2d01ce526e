//! 数字证书管理服务 (CAS) 客户端

use async_trait::async_trait;
use serde::Serialize;

use crate::error::{ProviderError, Result};
use crate::traits::{CertificateStore, ErrorContext};
use crate::types::{Certificate, CertificateId, UploadCertificateRequest};

use super::types::{
    EmptyResponse, GetUserCertificateDetailResponse, ListUserCertificateOrderResponse,
    UploadUserCertificateResponse,
};
use super::{AliyunClient, CAS, CERTIFICATE_PAGE_SIZE};

/// Certificate store client.
#[derive(Debug, Clone)]
pub struct CasClient {
    inner: AliyunClient,
}

impl CasClient {
    pub(crate) fn new(inner: AliyunClient) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl CertificateStore for CasClient {
    async fn list_certificates(&self) -> Result<Vec<Certificate>> {
        #[derive(Serialize)]
        struct ListUserCertificateOrderRequest {
            #[serde(rename = "OrderType")]
            order_type: &'static str,
            #[serde(rename = "CurrentPage")]
            current_page: u32,
            #[serde(rename = "ShowSize")]
            show_size: u32,
        }

        let req = ListUserCertificateOrderRequest {
            order_type: "UPLOAD",
            current_page: 1,
            show_size: CERTIFICATE_PAGE_SIZE,
        };

        let response: ListUserCertificateOrderResponse = self
            .inner
            .request(&CAS, "ListUserCertificateOrder", &req, ErrorContext::default())
            .await?;

        if let Some(total) = response.total_count
            && total > CERTIFICATE_PAGE_SIZE
        {
            log::warn!(
                "[cas] {total} certificates stored, only the first {CERTIFICATE_PAGE_SIZE} are listed"
            );
        }

        Ok(response
            .certificate_order_list
            .into_iter()
            .map(Certificate::from)
            .collect())
    }

    async fn get_certificate(&self, id: CertificateId) -> Result<Certificate> {
        #[derive(Serialize)]
        struct GetUserCertificateDetailRequest {
            #[serde(rename = "CertId")]
            cert_id: CertificateId,
            /// 不返回证书与私钥内容
            #[serde(rename = "CertFilter")]
            cert_filter: bool,
        }

        let req = GetUserCertificateDetailRequest {
            cert_id: id,
            cert_filter: true,
        };

        let response: GetUserCertificateDetailResponse = self
            .inner
            .request(
                &CAS,
                "GetUserCertificateDetail",
                &req,
                ErrorContext::certificate(id),
            )
            .await?;

        response
            .into_certificate()
            .ok_or_else(|| ProviderError::CertificateNotFound {
                provider: CAS.name.to_string(),
                certificate_id: id.to_string(),
                raw_message: None,
            })
    }

    async fn upload_certificate(&self, req: &UploadCertificateRequest) -> Result<CertificateId> {
        #[derive(Serialize)]
        struct UploadUserCertificateRequest<'a> {
            #[serde(rename = "Name")]
            name: &'a str,
            #[serde(rename = "Cert")]
            cert: &'a str,
            #[serde(rename = "Key")]
            key: &'a str,
        }

        let form = UploadUserCertificateRequest {
            name: &req.name,
            cert: &req.certificate,
            key: &req.private_key,
        };

        let response: UploadUserCertificateResponse = self
            .inner
            .request_with_form(&CAS, "UploadUserCertificate", &form, ErrorContext::default())
            .await?;

        log::info!("[cas] uploaded certificate {} as {}", req.name, response.cert_id);
        Ok(response.cert_id)
    }

    async fn delete_certificate(&self, id: CertificateId) -> Result<()> {
        #[derive(Serialize)]
        struct DeleteUserCertificateRequest {
            #[serde(rename = "CertId")]
            cert_id: CertificateId,
        }

        let _: EmptyResponse = self
            .inner
            .request(
                &CAS,
                "DeleteUserCertificate",
                &DeleteUserCertificateRequest { cert_id: id },
                ErrorContext::certificate(id),
            )
            .await?;

        log::info!("[cas] deleted certificate {id}");
        Ok(())
    }
}
