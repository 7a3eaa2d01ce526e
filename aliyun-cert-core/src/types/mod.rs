//! 类型定义模块

mod challenge;
mod deploy;
mod domain;
mod replacement;

pub use challenge::ChallengeRecord;
pub use deploy::{DeletionFailure, DeployReport, DeployRequest};
pub use domain::{DomainBindings, DomainListing};
pub use replacement::{DomainFailure, ReplacementReport};

// Re-export provider types
pub use aliyun_cert_provider::{
    BoundCertificate, Certificate, CertificateId, DnsRecord, Domain, ServiceKind,
};

use serde::{Deserialize, Serialize};

/// 批量操作涉及的服务范围
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceScope {
    pub cdn: bool,
    pub live: bool,
}

impl ServiceScope {
    pub const CDN: Self = Self {
        cdn: true,
        live: false,
    };
    pub const LIVE: Self = Self {
        cdn: false,
        live: true,
    };
    pub const ALL: Self = Self {
        cdn: true,
        live: true,
    };

    #[must_use]
    pub fn is_empty(self) -> bool {
        !self.cdn && !self.live
    }

    /// 选中的服务，CDN 在前
    #[must_use]
    pub fn kinds(self) -> Vec<ServiceKind> {
        let mut kinds = Vec::with_capacity(2);
        if self.cdn {
            kinds.push(ServiceKind::Cdn);
        }
        if self.live {
            kinds.push(ServiceKind::Live);
        }
        kinds
    }
}
