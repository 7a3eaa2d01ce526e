//! Aliyun Cert Core Library
//!
//! 证书轮换与 DNS-01 验证的业务逻辑，包括：
//! - 证书管理 (Certificate Service)
//! - CDN / 直播域名证书绑定 (Domain Service)
//! - 按通用名批量替换证书 (Replacement Service)
//! - certbot deploy hook (Deploy Hook Service)
//! - certbot DNS-01 验证记录 (DNS Challenge Service)
//!
//! 远程 API 通过 `aliyun-cert-provider` 的 trait 注入，测试中使用 mock 实现。

pub mod error;
pub mod services;
pub mod types;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use error::{CoreError, CoreResult};
pub use services::{
    CertificateService, DeployHookService, DnsChallengeService, DomainService,
    ReplacementService, ServiceContext,
};
