//! 阿里云 OpenAPI 客户端
//!
//! 一个 [`AliyunClient`] 持有 HTTP 连接池与 `AccessKey`，按产品派生出
//! [`CasClient`]、[`CdnClient`]、[`LiveClient`] 与 [`AlidnsClient`]。

mod cas;
mod cdn;
pub(crate) mod common;
mod dns;
mod error;
mod http;
mod live;
mod sign;
mod types;

use reqwest::Client;

use crate::error::Result;
use crate::types::AccessKey;

use common::create_http_client;

pub use cas::CasClient;
pub use cdn::CdnClient;
pub use dns::AlidnsClient;
pub use live::LiveClient;

/// 单个阿里云产品的 RPC 端点
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Endpoint {
    /// 日志与错误中使用的产品标识
    pub name: &'static str,
    pub host: &'static str,
    pub version: &'static str,
}

/// 数字证书管理服务
pub(crate) const CAS: Endpoint = Endpoint {
    name: "cas",
    host: "cas.aliyuncs.com",
    version: "2020-04-07",
};

pub(crate) const CDN: Endpoint = Endpoint {
    name: "cdn",
    host: "cdn.aliyuncs.com",
    version: "2018-05-10",
};

/// 视频直播
pub(crate) const LIVE: Endpoint = Endpoint {
    name: "live",
    host: "live.aliyuncs.com",
    version: "2016-11-01",
};

/// 云解析 DNS
pub(crate) const ALIDNS: Endpoint = Endpoint {
    name: "alidns",
    host: "alidns.cn-hangzhou.aliyuncs.com",
    version: "2015-01-09",
};

/// 空 body 的 SHA256 hash (固定值)
pub(crate) const EMPTY_BODY_SHA256: &str =
    "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

/// 证书列表单页大小（只取一页）
pub(crate) const CERTIFICATE_PAGE_SIZE: u32 = 100;
/// CDN / Live 域名列表单页大小（只取一页）
pub(crate) const DOMAIN_PAGE_SIZE: u32 = 50;
/// 解析记录列表单页大小（只取一页）
pub(crate) const RECORD_PAGE_SIZE: u32 = 100;

/// Signed client shared by every Aliyun product used in this crate.
///
/// Cloning is cheap: the underlying connection pool is reference counted.
///
/// # Construction
///
/// ```rust,no_run
/// use aliyun_cert_provider::{AccessKey, AliyunClient};
///
/// # fn main() -> aliyun_cert_provider::Result<()> {
/// let client = AliyunClient::new(AccessKey::new("your-access-key-id", "your-access-key-secret"))?;
/// let cas = client.cas();
/// let cdn = client.cdn();
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct AliyunClient {
    pub(crate) client: Client,
    pub(crate) access_key: AccessKey,
}

/// Builder for [`AliyunClient`].
pub struct AliyunClientBuilder {
    access_key: AccessKey,
    http_client: Option<Client>,
}

impl AliyunClientBuilder {
    fn new(access_key: AccessKey) -> Self {
        Self {
            access_key,
            http_client: None,
        }
    }

    /// Use a preconfigured `reqwest` client instead of the default one
    /// (10s connect timeout, 30s request timeout).
    #[must_use]
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Build the [`AliyunClient`] instance.
    pub fn build(self) -> Result<AliyunClient> {
        let client = match self.http_client {
            Some(client) => client,
            None => create_http_client()?,
        };
        Ok(AliyunClient {
            client,
            access_key: self.access_key,
        })
    }
}

impl AliyunClient {
    /// Creates a client with default HTTP settings.
    pub fn new(access_key: AccessKey) -> Result<Self> {
        Self::builder(access_key).build()
    }

    /// Returns a builder for customizing the client.
    pub fn builder(access_key: AccessKey) -> AliyunClientBuilder {
        AliyunClientBuilder::new(access_key)
    }

    /// Certificate store (CAS) API.
    pub fn cas(&self) -> CasClient {
        CasClient::new(self.clone())
    }

    /// CDN domain API.
    pub fn cdn(&self) -> CdnClient {
        CdnClient::new(self.clone())
    }

    /// Live domain API.
    pub fn live(&self) -> LiveClient {
        LiveClient::new(self.clone())
    }

    /// Alidns zone/record API.
    pub fn alidns(&self) -> AlidnsClient {
        AlidnsClient::new(self.clone())
    }
}

impl std::fmt::Debug for AliyunClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AliyunClient")
            .field("access_key", &self.access_key)
            .finish_non_exhaustive()
    }
}
