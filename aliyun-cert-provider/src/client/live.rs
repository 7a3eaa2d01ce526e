//! 视频直播域名证书客户端

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;
use crate::traits::{DomainCertificateApi, ErrorContext};
use crate::types::{BoundCertificate, Certificate, Domain, ServiceKind};

use super::types::{DescribeDomainCertificateInfoResponse, DescribeDomainsPageResponse, EmptyResponse};
use super::{AliyunClient, DOMAIN_PAGE_SIZE, LIVE};

/// Live streaming domain client.
///
/// Live does not report certificate ids for bound certificates, so bindings
/// are matched by certificate name.
#[derive(Debug, Clone)]
pub struct LiveClient {
    inner: AliyunClient,
}

impl LiveClient {
    pub(crate) fn new(inner: AliyunClient) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl DomainCertificateApi for LiveClient {
    fn kind(&self) -> ServiceKind {
        ServiceKind::Live
    }

    async fn list_domains(&self) -> Result<Vec<Domain>> {
        #[derive(Serialize)]
        struct DescribeLiveUserDomainsRequest {
            #[serde(rename = "PageNumber")]
            page_number: u32,
            #[serde(rename = "PageSize")]
            page_size: u32,
        }

        let req = DescribeLiveUserDomainsRequest {
            page_number: 1,
            page_size: DOMAIN_PAGE_SIZE,
        };

        let response: DescribeDomainsPageResponse = self
            .inner
            .request(&LIVE, "DescribeLiveUserDomains", &req, ErrorContext::default())
            .await?;

        if let Some(total) = response.total_count
            && total > DOMAIN_PAGE_SIZE
        {
            log::warn!("[live] {total} domains, only the first {DOMAIN_PAGE_SIZE} are listed");
        }

        Ok(response
            .into_page()
            .into_iter()
            .map(|d| d.into_domain(ServiceKind::Live))
            .collect())
    }

    async fn list_bindings(&self, domain: &str) -> Result<Vec<BoundCertificate>> {
        #[derive(Serialize)]
        struct DescribeLiveDomainCertificateInfoRequest<'a> {
            #[serde(rename = "DomainName")]
            domain_name: &'a str,
        }

        let response: DescribeDomainCertificateInfoResponse = self
            .inner
            .request(
                &LIVE,
                "DescribeLiveDomainCertificateInfo",
                &DescribeLiveDomainCertificateInfoRequest {
                    domain_name: domain,
                },
                ErrorContext::domain(domain),
            )
            .await?;

        Ok(response.into_bindings())
    }

    async fn set_certificate(&self, domain: &str, certificate: &Certificate) -> Result<()> {
        #[derive(Serialize)]
        struct SetLiveDomainCertificateRequest<'a> {
            #[serde(rename = "DomainName")]
            domain_name: &'a str,
            #[serde(rename = "CertName")]
            cert_name: &'a str,
            #[serde(rename = "CertType")]
            cert_type: &'static str,
            #[serde(rename = "SSLProtocol")]
            ssl_protocol: &'static str,
        }

        let req = SetLiveDomainCertificateRequest {
            domain_name: domain,
            cert_name: &certificate.name,
            cert_type: "cas",
            ssl_protocol: "on",
        };

        let _: EmptyResponse = self
            .inner
            .request(
                &LIVE,
                "SetLiveDomainCertificate",
                &req,
                ErrorContext::domain(domain),
            )
            .await?;

        log::info!("[live] {domain} now serves certificate {}", certificate.name);
        Ok(())
    }
}
