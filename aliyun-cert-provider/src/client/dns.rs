//! 云解析 DNS (Alidns) 客户端

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;
use crate::traits::{DnsZoneApi, ErrorContext};
use crate::types::{AddRecordRequest, DnsRecord, RecordFilter};

use super::types::{
    AddDomainRecordResponse, DescribeDomainRecordsResponse, DescribeDomainsResponse,
    EmptyResponse,
};
use super::{ALIDNS, AliyunClient, DOMAIN_PAGE_SIZE, RECORD_PAGE_SIZE};

/// Alidns zone and record client.
#[derive(Debug, Clone)]
pub struct AlidnsClient {
    inner: AliyunClient,
}

impl AlidnsClient {
    pub(crate) fn new(inner: AliyunClient) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl DnsZoneApi for AlidnsClient {
    async fn list_zones(&self, keyword: &str) -> Result<Vec<String>> {
        #[derive(Serialize)]
        struct DescribeDomainsRequest<'a> {
            #[serde(rename = "KeyWord")]
            key_word: &'a str,
            #[serde(rename = "PageNumber")]
            page_number: u32,
            #[serde(rename = "PageSize")]
            page_size: u32,
        }

        let req = DescribeDomainsRequest {
            key_word: keyword,
            page_number: 1,
            page_size: DOMAIN_PAGE_SIZE,
        };

        let response: DescribeDomainsResponse = self
            .inner
            .request(&ALIDNS, "DescribeDomains", &req, ErrorContext::domain(keyword))
            .await?;

        Ok(response
            .domains
            .map(|d| d.domain)
            .unwrap_or_default()
            .into_iter()
            .map(|d| d.domain_name)
            .collect())
    }

    async fn list_records(&self, zone: &str, filter: &RecordFilter) -> Result<Vec<DnsRecord>> {
        #[derive(Serialize)]
        struct DescribeDomainRecordsRequest<'a> {
            #[serde(rename = "DomainName")]
            domain_name: &'a str,
            #[serde(rename = "RRKeyWord", skip_serializing_if = "Option::is_none")]
            rr_key_word: Option<&'a str>,
            #[serde(rename = "TypeKeyWord", skip_serializing_if = "Option::is_none")]
            type_key_word: Option<&'a str>,
            #[serde(rename = "ValueKeyWord", skip_serializing_if = "Option::is_none")]
            value_key_word: Option<&'a str>,
            #[serde(rename = "PageNumber")]
            page_number: u32,
            #[serde(rename = "PageSize")]
            page_size: u32,
        }

        let req = DescribeDomainRecordsRequest {
            domain_name: zone,
            rr_key_word: filter.rr_keyword.as_deref(),
            type_key_word: filter.type_keyword.as_deref(),
            value_key_word: filter.value_keyword.as_deref(),
            page_number: 1,
            page_size: RECORD_PAGE_SIZE,
        };

        let response: DescribeDomainRecordsResponse = self
            .inner
            .request(
                &ALIDNS,
                "DescribeDomainRecords",
                &req,
                ErrorContext::domain(zone),
            )
            .await?;

        Ok(response
            .domain_records
            .map(|r| r.record)
            .unwrap_or_default()
            .into_iter()
            .map(|r| r.into_record(zone))
            .collect())
    }

    async fn add_record(&self, req: &AddRecordRequest) -> Result<String> {
        #[derive(Serialize)]
        struct AddDomainRecordRequest<'a> {
            #[serde(rename = "DomainName")]
            domain_name: &'a str,
            #[serde(rename = "RR")]
            rr: &'a str,
            #[serde(rename = "Type")]
            record_type: &'a str,
            #[serde(rename = "Value")]
            value: &'a str,
            #[serde(rename = "TTL")]
            ttl: u32,
        }

        let api_req = AddDomainRecordRequest {
            domain_name: &req.zone,
            rr: &req.rr,
            record_type: &req.record_type,
            value: &req.value,
            ttl: req.ttl,
        };

        let response: AddDomainRecordResponse = self
            .inner
            .request(
                &ALIDNS,
                "AddDomainRecord",
                &api_req,
                ErrorContext::domain(&req.zone),
            )
            .await?;

        log::info!(
            "[alidns] added {} record {}.{} ({})",
            req.record_type,
            req.rr,
            req.zone,
            response.record_id
        );
        Ok(response.record_id)
    }

    async fn delete_record(&self, record_id: &str) -> Result<()> {
        #[derive(Serialize)]
        struct DeleteDomainRecordRequest<'a> {
            #[serde(rename = "RecordId")]
            record_id: &'a str,
        }

        let _: EmptyResponse = self
            .inner
            .request(
                &ALIDNS,
                "DeleteDomainRecord",
                &DeleteDomainRecordRequest { record_id },
                ErrorContext::record(record_id),
            )
            .await?;

        log::info!("[alidns] deleted record {record_id}");
        Ok(())
    }
}
