//! CDN 域名证书客户端

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;
use crate::traits::{DomainCertificateApi, ErrorContext};
use crate::types::{BoundCertificate, Certificate, Domain, ServiceKind};

use super::types::{DescribeDomainCertificateInfoResponse, DescribeDomainsPageResponse, EmptyResponse};
use super::{AliyunClient, CDN, DOMAIN_PAGE_SIZE};

/// CDN domain client.
#[derive(Debug, Clone)]
pub struct CdnClient {
    inner: AliyunClient,
}

impl CdnClient {
    pub(crate) fn new(inner: AliyunClient) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl DomainCertificateApi for CdnClient {
    fn kind(&self) -> ServiceKind {
        ServiceKind::Cdn
    }

    async fn list_domains(&self) -> Result<Vec<Domain>> {
        #[derive(Serialize)]
        struct DescribeUserDomainsRequest {
            #[serde(rename = "PageNumber")]
            page_number: u32,
            #[serde(rename = "PageSize")]
            page_size: u32,
        }

        let req = DescribeUserDomainsRequest {
            page_number: 1,
            page_size: DOMAIN_PAGE_SIZE,
        };

        let response: DescribeDomainsPageResponse = self
            .inner
            .request(&CDN, "DescribeUserDomains", &req, ErrorContext::default())
            .await?;

        if let Some(total) = response.total_count
            && total > DOMAIN_PAGE_SIZE
        {
            log::warn!("[cdn] {total} domains, only the first {DOMAIN_PAGE_SIZE} are listed");
        }

        // 未开启 HTTPS 的域名不参与证书管理
        Ok(response
            .into_page()
            .into_iter()
            .filter(|d| !d.ssl_disabled())
            .map(|d| d.into_domain(ServiceKind::Cdn))
            .collect())
    }

    async fn list_bindings(&self, domain: &str) -> Result<Vec<BoundCertificate>> {
        #[derive(Serialize)]
        struct DescribeDomainCertificateInfoRequest<'a> {
            #[serde(rename = "DomainName")]
            domain_name: &'a str,
        }

        let response: DescribeDomainCertificateInfoResponse = self
            .inner
            .request(
                &CDN,
                "DescribeDomainCertificateInfo",
                &DescribeDomainCertificateInfoRequest {
                    domain_name: domain,
                },
                ErrorContext::domain(domain),
            )
            .await?;

        Ok(response.into_bindings())
    }

    async fn set_certificate(&self, domain: &str, certificate: &Certificate) -> Result<()> {
        #[derive(Serialize)]
        struct SetCdnDomainSSLCertificateRequest<'a> {
            #[serde(rename = "DomainName")]
            domain_name: &'a str,
            #[serde(rename = "CertId")]
            cert_id: i64,
            #[serde(rename = "CertName")]
            cert_name: &'a str,
            #[serde(rename = "CertType")]
            cert_type: &'static str,
            #[serde(rename = "SSLProtocol")]
            ssl_protocol: &'static str,
        }

        let req = SetCdnDomainSSLCertificateRequest {
            domain_name: domain,
            cert_id: certificate.id,
            cert_name: &certificate.name,
            cert_type: "cas",
            ssl_protocol: "on",
        };

        let _: EmptyResponse = self
            .inner
            .request(
                &CDN,
                "SetCdnDomainSSLCertificate",
                &req,
                ErrorContext::domain(domain),
            )
            .await?;

        log::info!("[cdn] {domain} now serves certificate {}", certificate.id);
        Ok(())
    }
}
