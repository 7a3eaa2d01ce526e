//! # aliyun-cert-provider
//!
//! Typed, signed client for the Aliyun APIs involved in rotating TLS
//! certificates: the certificate store (CAS), CDN, Live and Alidns.
//!
//! ## Supported APIs
//!
//! | Product | Host | Version | Trait |
//! |---------|------|---------|-------|
//! | Certificate store | `cas.aliyuncs.com` | 2020-04-07 | [`CertificateStore`] |
//! | CDN | `cdn.aliyuncs.com` | 2018-05-10 | [`DomainCertificateApi`] |
//! | Live | `live.aliyuncs.com` | 2016-11-01 | [`DomainCertificateApi`] |
//! | Alidns | `alidns.cn-hangzhou.aliyuncs.com` | 2015-01-09 | [`DnsZoneApi`] |
//!
//! Every request is signed with ACS3-HMAC-SHA256 (V3). Certificate and key
//! material is sent in the form body, never in the URL, and PEM blocks are
//! redacted from logged responses.
//!
//! ## Feature Flags
//!
//! - **`native-tls`** *(default)* - Use the platform's native TLS implementation.
//! - **`rustls`** - Use rustls. Recommended for cross-compilation.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use aliyun_cert_provider::{create_clients, AccessKey, CertificateStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let clients = create_clients(AccessKey::new("your-id", "your-secret"))?;
//!
//!     for cert in clients.certificates.list_certificates().await? {
//!         println!("{} {} {:?}", cert.id, cert.common_name, cert.end_date);
//!     }
//!
//!     for domain in clients.cdn.list_domains().await? {
//!         let bindings = clients.cdn.list_bindings(&domain.name).await?;
//!         println!("{} -> {:?}", domain.name, bindings);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, ProviderError>`](ProviderError):
//!
//! - [`ProviderError::InvalidCredentials`] - access key rejected
//! - [`ProviderError::CertificateNotFound`] - unknown certificate id
//! - [`ProviderError::DomainNotFound`] - unknown domain or zone
//! - [`ProviderError::RateLimited`] - throttled
//!
//! Requests are never retried.

mod client;
mod error;
mod factory;
mod http_client;
mod traits;
mod types;
mod utils;

pub use error::{ProviderError, Result};

pub use factory::{ClientSet, client_set, create_clients};

pub use traits::{CertificateStore, DnsZoneApi, DomainCertificateApi};

pub use types::{
    AccessKey, AddRecordRequest, BoundCertificate, Certificate, CertificateId, DnsRecord, Domain,
    RecordFilter, ServiceKind, UploadCertificateRequest,
};

pub use client::{AlidnsClient, AliyunClient, AliyunClientBuilder, CasClient, CdnClient, LiveClient};

pub use utils::datetime;
