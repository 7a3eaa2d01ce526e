//! 阿里云 API 线上结构与参数序列化

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ProviderError, Result};
use crate::types::{BoundCertificate, Certificate, CertificateId, DnsRecord, Domain, ServiceKind};

// ============ 参数序列化 ============

/// 将 `serde_json::Value` 展平为 key-value 对（嵌套对象用 `.` 连接，数组下标从 1 开始）
pub fn flatten_value(
    prefix: &str,
    value: &serde_json::Value,
    result: &mut BTreeMap<String, String>,
) {
    match value {
        serde_json::Value::Object(map) => {
            for (k, v) in map {
                let key = if prefix.is_empty() {
                    k.clone()
                } else {
                    format!("{prefix}.{k}")
                };
                flatten_value(&key, v, result);
            }
        }
        serde_json::Value::Array(arr) => {
            for (i, v) in arr.iter().enumerate() {
                flatten_value(&format!("{prefix}.{}", i + 1), v, result);
            }
        }
        serde_json::Value::String(s) => {
            result.insert(prefix.to_string(), s.clone());
        }
        serde_json::Value::Number(n) => {
            result.insert(prefix.to_string(), n.to_string());
        }
        serde_json::Value::Bool(b) => {
            result.insert(prefix.to_string(), b.to_string());
        }
        serde_json::Value::Null => {}
    }
}

/// 将请求参数序列化为按 key 排序、RFC3986 编码的 `k=v&k=v` 字符串
///
/// 同时用作规范化 query string 与 form body。
pub fn encode_params<T: Serialize>(params: &T, provider: &str) -> Result<String> {
    let value = serde_json::to_value(params).map_err(|e| ProviderError::SerializationError {
        provider: provider.to_string(),
        detail: e.to_string(),
    })?;

    let mut flat = BTreeMap::new();
    flatten_value("", &value, &mut flat);

    Ok(flat
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&"))
}

/// 兼容数字或字符串的 ID 字段
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        S(String),
        I(i64),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::S(s)) if !s.is_empty() => Some(s),
        Some(Raw::I(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// `Sans` 以逗号分隔
fn split_sans(sans: Option<&str>) -> Vec<String> {
    sans.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

// ============ CAS ============

#[derive(Debug, Deserialize)]
pub struct ListUserCertificateOrderResponse {
    #[serde(rename = "CertificateOrderList", default)]
    pub certificate_order_list: Vec<CertificateOrder>,
    #[serde(rename = "TotalCount")]
    pub total_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct CertificateOrder {
    #[serde(rename = "CertificateId")]
    pub certificate_id: CertificateId,
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "CommonName", default)]
    pub common_name: String,
    #[serde(rename = "Sans")]
    pub sans: Option<String>,
    #[serde(rename = "Issuer")]
    pub issuer: Option<String>,
    #[serde(rename = "Status")]
    pub status: Option<String>,
    #[serde(rename = "StartDate")]
    pub start_date: Option<String>,
    #[serde(rename = "EndDate")]
    pub end_date: Option<String>,
    #[serde(rename = "CertEndTime", default, deserialize_with = "crate::utils::datetime::deserialize")]
    pub cert_end_time: Option<DateTime<Utc>>,
    #[serde(rename = "Expired", default)]
    pub expired: bool,
}

impl From<CertificateOrder> for Certificate {
    fn from(o: CertificateOrder) -> Self {
        Self {
            id: o.certificate_id,
            sans: split_sans(o.sans.as_deref()),
            name: o.name,
            common_name: o.common_name,
            issuer: o.issuer,
            status: o.status,
            start_date: o.start_date,
            end_date: o.end_date,
            not_after: o.cert_end_time,
            expired: o.expired,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GetUserCertificateDetailResponse {
    #[serde(rename = "Id")]
    pub id: Option<CertificateId>,
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Common", default)]
    pub common: String,
    #[serde(rename = "Sans")]
    pub sans: Option<String>,
    #[serde(rename = "Issuer")]
    pub issuer: Option<String>,
    #[serde(rename = "StartDate")]
    pub start_date: Option<String>,
    #[serde(rename = "EndDate")]
    pub end_date: Option<String>,
    #[serde(rename = "NotAfter", default, deserialize_with = "crate::utils::datetime::deserialize")]
    pub not_after: Option<DateTime<Utc>>,
    #[serde(rename = "Expired", default)]
    pub expired: bool,
}

impl GetUserCertificateDetailResponse {
    /// 空响应（无 `Id`）视为证书不存在
    pub fn into_certificate(self) -> Option<Certificate> {
        let id = self.id.filter(|id| *id > 0)?;
        Some(Certificate {
            id,
            sans: split_sans(self.sans.as_deref()),
            name: self.name,
            common_name: self.common,
            issuer: self.issuer,
            status: None,
            start_date: self.start_date,
            end_date: self.end_date,
            not_after: self.not_after,
            expired: self.expired,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UploadUserCertificateResponse {
    #[serde(rename = "CertId")]
    pub cert_id: CertificateId,
}

/// 只含 `RequestId` 的响应
#[derive(Debug, Deserialize)]
pub struct EmptyResponse {}

// ============ CDN / Live ============

#[derive(Debug, Deserialize)]
pub struct DescribeDomainsPageResponse {
    #[serde(rename = "Domains")]
    pub domains: Option<PageDataWrapper>,
    #[serde(rename = "TotalCount")]
    pub total_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct PageDataWrapper {
    #[serde(rename = "PageData", default)]
    pub page_data: Vec<ServiceDomain>,
}

#[derive(Debug, Deserialize)]
pub struct ServiceDomain {
    #[serde(rename = "DomainName")]
    pub domain_name: String,
    #[serde(rename = "DomainStatus")]
    pub domain_status: Option<String>,
    #[serde(rename = "Cname")]
    pub cname: Option<String>,
    /// CDN only: `on` / `off`
    #[serde(rename = "SslProtocol")]
    pub ssl_protocol: Option<String>,
}

impl ServiceDomain {
    pub fn ssl_disabled(&self) -> bool {
        self.ssl_protocol.as_deref() == Some("off")
    }

    pub fn into_domain(self, kind: ServiceKind) -> Domain {
        Domain {
            name: self.domain_name,
            kind,
            status: self.domain_status,
            cname: self.cname,
        }
    }
}

impl DescribeDomainsPageResponse {
    pub fn into_page(self) -> Vec<ServiceDomain> {
        self.domains.map(|d| d.page_data).unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
pub struct DescribeDomainCertificateInfoResponse {
    #[serde(rename = "CertInfos")]
    pub cert_infos: Option<CertInfosWrapper>,
}

#[derive(Debug, Deserialize)]
pub struct CertInfosWrapper {
    #[serde(rename = "CertInfo", default)]
    pub cert_info: Vec<CertInfo>,
}

#[derive(Debug, Deserialize)]
pub struct CertInfo {
    #[serde(rename = "CertId", default, deserialize_with = "string_or_number")]
    pub cert_id: Option<String>,
    #[serde(rename = "CertName")]
    pub cert_name: Option<String>,
    #[serde(rename = "CertDomainName")]
    pub cert_domain_name: Option<String>,
    #[serde(rename = "CertType")]
    pub cert_type: Option<String>,
    #[serde(rename = "Status")]
    pub status: Option<String>,
    #[serde(rename = "CertLife")]
    pub cert_life: Option<String>,
    #[serde(rename = "CertExpireTime")]
    pub cert_expire_time: Option<String>,
}

impl From<CertInfo> for BoundCertificate {
    fn from(c: CertInfo) -> Self {
        Self {
            cert_id: c.cert_id,
            cert_name: c.cert_name.filter(|n| !n.is_empty()),
            cert_domain_name: c.cert_domain_name,
            cert_type: c.cert_type,
            status: c.status,
            cert_life: c.cert_life,
            cert_expire_time: c.cert_expire_time.filter(|t| !t.is_empty()),
        }
    }
}

impl DescribeDomainCertificateInfoResponse {
    pub fn into_bindings(self) -> Vec<BoundCertificate> {
        self.cert_infos
            .map(|c| c.cert_info)
            .unwrap_or_default()
            .into_iter()
            .map(BoundCertificate::from)
            .collect()
    }
}

// ============ Alidns ============

#[derive(Debug, Deserialize)]
pub struct DescribeDomainsResponse {
    #[serde(rename = "Domains")]
    pub domains: Option<DomainsWrapper>,
}

#[derive(Debug, Deserialize)]
pub struct DomainsWrapper {
    #[serde(rename = "Domain", default)]
    pub domain: Vec<AlidnsDomain>,
}

#[derive(Debug, Deserialize)]
pub struct AlidnsDomain {
    #[serde(rename = "DomainName")]
    pub domain_name: String,
}

#[derive(Debug, Deserialize)]
pub struct DescribeDomainRecordsResponse {
    #[serde(rename = "DomainRecords")]
    pub domain_records: Option<DomainRecordsWrapper>,
}

#[derive(Debug, Deserialize)]
pub struct DomainRecordsWrapper {
    #[serde(rename = "Record", default)]
    pub record: Vec<AlidnsRecord>,
}

#[derive(Debug, Deserialize)]
pub struct AlidnsRecord {
    #[serde(rename = "RecordId", default, deserialize_with = "string_or_number")]
    pub record_id: Option<String>,
    #[serde(rename = "DomainName")]
    pub domain_name: Option<String>,
    #[serde(rename = "RR")]
    pub rr: String,
    #[serde(rename = "Type")]
    pub record_type: String,
    #[serde(rename = "Value", default)]
    pub value: String,
    #[serde(rename = "TTL", default)]
    pub ttl: u32,
}

impl AlidnsRecord {
    pub fn into_record(self, zone: &str) -> DnsRecord {
        DnsRecord {
            id: self.record_id,
            zone: self.domain_name.unwrap_or_else(|| zone.to_string()),
            rr: self.rr,
            record_type: self.record_type,
            value: self.value,
            ttl: self.ttl,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AddDomainRecordResponse {
    #[serde(rename = "RecordId")]
    pub record_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    // ---- flatten_value / encode_params ----

    #[test]
    fn flatten_nested_and_arrays() {
        let val = json!({"a": {"b": "1"}, "c": [10, 20], "d": null, "e": true});
        let mut map = BTreeMap::new();
        flatten_value("", &val, &mut map);
        assert_eq!(map.get("a.b").map(String::as_str), Some("1"));
        assert_eq!(map.get("c.1").map(String::as_str), Some("10"));
        assert_eq!(map.get("c.2").map(String::as_str), Some("20"));
        assert_eq!(map.get("e").map(String::as_str), Some("true"));
        assert!(!map.contains_key("d"));
    }

    #[test]
    fn encode_params_sorted_and_rfc3986() {
        #[derive(Serialize)]
        struct Req {
            #[serde(rename = "Value")]
            value: String,
            #[serde(rename = "DomainName")]
            domain_name: String,
            #[serde(rename = "RR")]
            rr: String,
        }
        let qs = encode_params(
            &Req {
                value: "a b/c~".into(),
                domain_name: "example.com".into(),
                rr: "_acme-challenge.www".into(),
            },
            "alidns",
        )
        .unwrap();
        assert_eq!(
            qs,
            "DomainName=example.com&RR=_acme-challenge.www&Value=a%20b%2Fc~"
        );
    }

    #[test]
    fn encode_params_pem_newlines() {
        #[derive(Serialize)]
        struct Req {
            #[serde(rename = "Cert")]
            cert: String,
        }
        let qs = encode_params(
            &Req {
                cert: "-----BEGIN\nAB+/=".into(),
            },
            "cas",
        )
        .unwrap();
        assert_eq!(qs, "Cert=-----BEGIN%0AAB%2B%2F%3D");
    }

    // ---- CAS ----

    #[test]
    fn parse_certificate_order_list() {
        let body = json!({
            "RequestId": "r",
            "TotalCount": 1,
            "CertificateOrderList": [{
                "CertificateId": 12_345_678,
                "Name": "example_com_20240101T000000",
                "CommonName": "example.com",
                "Sans": "example.com,www.example.com",
                "Issuer": "Let's Encrypt",
                "Status": "ISSUED",
                "StartDate": "2024-01-01",
                "EndDate": "2024-03-31",
                "CertEndTime": 1_711_843_200_000_i64,
                "Expired": false
            }]
        });
        let resp: ListUserCertificateOrderResponse = serde_json::from_value(body).unwrap();
        let certs: Vec<Certificate> = resp
            .certificate_order_list
            .into_iter()
            .map(Certificate::from)
            .collect();
        assert_eq!(certs.len(), 1);
        let c = &certs[0];
        assert_eq!(c.id, 12_345_678);
        assert_eq!(c.common_name, "example.com");
        assert_eq!(c.sans, vec!["example.com", "www.example.com"]);
        assert_eq!(
            c.not_after,
            Some(Utc.with_ymd_and_hms(2024, 3, 31, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn parse_empty_certificate_order_list() {
        let resp: ListUserCertificateOrderResponse =
            serde_json::from_value(json!({"RequestId": "r"})).unwrap();
        assert!(resp.certificate_order_list.is_empty());
    }

    #[test]
    fn certificate_detail_conversion() {
        let body = json!({
            "Id": 42,
            "Name": "n",
            "Common": "example.com",
            "Sans": "",
            "Expired": true
        });
        let resp: GetUserCertificateDetailResponse = serde_json::from_value(body).unwrap();
        let cert = resp.into_certificate().unwrap();
        assert_eq!(cert.id, 42);
        assert_eq!(cert.common_name, "example.com");
        assert!(cert.sans.is_empty());
        assert!(cert.expired);
    }

    #[test]
    fn certificate_detail_without_id_is_missing() {
        let resp: GetUserCertificateDetailResponse =
            serde_json::from_value(json!({"RequestId": "r"})).unwrap();
        assert!(resp.into_certificate().is_none());
    }

    // ---- CDN / Live ----

    #[test]
    fn parse_cdn_domains_page() {
        let body = json!({
            "Domains": {"PageData": [
                {"DomainName": "a.example.com", "DomainStatus": "online", "SslProtocol": "on", "Cname": "a.w.kunlunsl.com"},
                {"DomainName": "b.example.com", "DomainStatus": "online", "SslProtocol": "off"}
            ]},
            "TotalCount": 2
        });
        let resp: DescribeDomainsPageResponse = serde_json::from_value(body).unwrap();
        let page = resp.into_page();
        assert_eq!(page.len(), 2);
        assert!(!page[0].ssl_disabled());
        assert!(page[1].ssl_disabled());
    }

    #[test]
    fn live_domain_without_ssl_field_is_not_disabled() {
        let d = ServiceDomain {
            domain_name: "live.example.com".into(),
            domain_status: None,
            cname: None,
            ssl_protocol: None,
        };
        assert!(!d.ssl_disabled());
        assert_eq!(d.into_domain(ServiceKind::Live).kind, ServiceKind::Live);
    }

    #[test]
    fn parse_cert_infos_with_numeric_and_string_ids() {
        let body = json!({
            "CertInfos": {"CertInfo": [
                {"CertId": "1001", "CertName": "old", "CertDomainName": "example.com", "CertType": "cas", "Status": "success", "CertExpireTime": "2024-06-01T00:00:00Z"},
                {"CertId": 1002, "CertName": ""},
                {"CertName": "live-cert", "CertType": "cas"}
            ]}
        });
        let resp: DescribeDomainCertificateInfoResponse = serde_json::from_value(body).unwrap();
        let bindings = resp.into_bindings();
        assert_eq!(bindings.len(), 3);
        assert_eq!(bindings[0].certificate_id(), Some(1001));
        assert_eq!(bindings[1].certificate_id(), Some(1002));
        assert_eq!(bindings[1].cert_name, None);
        assert_eq!(bindings[2].cert_id, None);
        assert_eq!(bindings[2].cert_name.as_deref(), Some("live-cert"));
    }

    // ---- Alidns ----

    #[test]
    fn parse_domain_records() {
        let body = json!({
            "DomainRecords": {"Record": [
                {"RecordId": "9001", "DomainName": "example.com", "RR": "_acme-challenge.www", "Type": "TXT", "Value": "token", "TTL": 600},
                {"RR": "_acme-challenge", "Type": "TXT", "Value": "x", "TTL": 600}
            ]}
        });
        let resp: DescribeDomainRecordsResponse = serde_json::from_value(body).unwrap();
        let records: Vec<DnsRecord> = resp
            .domain_records
            .map(|r| r.record)
            .unwrap_or_default()
            .into_iter()
            .map(|r| r.into_record("example.com"))
            .collect();
        assert_eq!(records[0].id.as_deref(), Some("9001"));
        assert_eq!(records[0].rr, "_acme-challenge.www");
        assert_eq!(records[1].id, None);
        assert_eq!(records[1].zone, "example.com");
    }
}
