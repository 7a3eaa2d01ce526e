//! Client factory.

use std::sync::Arc;

use crate::client::AliyunClient;
use crate::error::Result;
use crate::traits::{CertificateStore, DnsZoneApi, DomainCertificateApi};
use crate::types::{AccessKey, ServiceKind};

/// Every remote API this crate talks to, behind trait objects.
///
/// All handles share one signed HTTP client.
#[derive(Clone)]
pub struct ClientSet {
    /// Certificate store (CAS).
    pub certificates: Arc<dyn CertificateStore>,
    /// CDN domains.
    pub cdn: Arc<dyn DomainCertificateApi>,
    /// Live domains.
    pub live: Arc<dyn DomainCertificateApi>,
    /// Alidns zones.
    pub dns: Arc<dyn DnsZoneApi>,
}

impl ClientSet {
    /// Domain API for the given service.
    pub fn domain_api(&self, kind: ServiceKind) -> Arc<dyn DomainCertificateApi> {
        match kind {
            ServiceKind::Cdn => Arc::clone(&self.cdn),
            ServiceKind::Live => Arc::clone(&self.live),
        }
    }
}

impl std::fmt::Debug for ClientSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSet").finish_non_exhaustive()
    }
}

/// Creates the full [`ClientSet`] from an access key.
///
/// # Examples
///
/// ```rust,no_run
/// use aliyun_cert_provider::{create_clients, AccessKey};
///
/// let clients = create_clients(AccessKey::new("id", "secret")).unwrap();
/// ```
pub fn create_clients(access_key: AccessKey) -> Result<ClientSet> {
    Ok(client_set(&AliyunClient::new(access_key)?))
}

/// Wraps an existing client (e.g. one built with a custom `reqwest::Client`).
pub fn client_set(client: &AliyunClient) -> ClientSet {
    ClientSet {
        certificates: Arc::new(client.cas()),
        cdn: Arc::new(client.cdn()),
        live: Arc::new(client.live()),
        dns: Arc::new(client.alidns()),
    }
}
