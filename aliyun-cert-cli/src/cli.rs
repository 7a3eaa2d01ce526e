//! 命令行定义

use std::path::PathBuf;

use aliyun_cert_core::types::{CertificateId, ServiceKind, ServiceScope};
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::credentials::CredentialArgs;
use crate::error::CliError;

/// Manage Aliyun CDN / Live certificates and serve as certbot hooks
#[derive(Debug, Parser)]
#[command(name = "aliyun-cert", version, about)]
pub struct Cli {
    #[command(flatten)]
    pub credentials: CredentialArgs,

    /// Enable debug logging (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show domains and their certificates
    ListDomains(ScopeArgs),

    /// Show all uploaded certificates in Aliyun CAS
    ListCerts,

    /// Get certificate detail by id
    GetCert(CertIdArg),

    /// Upload certificate to Aliyun CAS
    UploadCert {
        /// Full chain PEM file
        full_chain: PathBuf,
        /// Private key PEM file
        private_key: PathBuf,
        /// Domain name, used to name the certificate
        #[arg(long)]
        domain: String,
    },

    /// Delete certificate from Aliyun CAS
    DeleteCert(CertIdArg),

    /// Set certificate for one CDN or Live domain
    SetCert {
        #[command(flatten)]
        cert: CertIdArg,
        /// Domain name
        #[arg(long)]
        domain: String,
        /// Aliyun service type
        #[arg(long, value_enum, ignore_case = true)]
        service: ServiceArg,
    },

    /// Replace certificate for all domains using a certificate of the same common name
    ReplaceCert {
        #[command(flatten)]
        cert: CertIdArg,
        #[command(flatten)]
        scope: ScopeArgs,
    },

    /// Deploy hook for certbot (see `--deploy-hook` in the certbot docs)
    CertbotDeployHook {
        /// Directory containing fullchain.pem and privkey.pem
        #[arg(long, env = "RENEWED_LINEAGE")]
        cert_path: PathBuf,
        /// Renewed domain names separated by spaces
        #[arg(long, env = "RENEWED_DOMAINS", alias = "renewed_domains")]
        renewed_domains: String,
        #[command(flatten)]
        scope: ScopeArgs,
        /// Delete superseded certificates once every domain is switched
        #[arg(long)]
        delete_old_cert: bool,
    },

    /// certbot `--manual-auth-hook`: create the DNS-01 TXT record
    DnsAuthHook(ChallengeArgs),

    /// certbot `--manual-cleanup-hook`: delete the DNS-01 TXT record
    DnsCleanupHook(ChallengeArgs),
}

#[derive(Debug, Clone, Copy, Args)]
pub struct CertIdArg {
    /// Certificate id
    #[arg(long)]
    pub cert_id: CertificateId,
}

#[derive(Debug, Clone, Copy, Default, Args)]
pub struct ScopeArgs {
    /// CDN domains
    #[arg(long)]
    pub cdn: bool,
    /// Live domains
    #[arg(long)]
    pub live: bool,
}

impl ScopeArgs {
    pub fn scope(self) -> Result<ServiceScope, CliError> {
        let scope = ServiceScope {
            cdn: self.cdn,
            live: self.live,
        };
        if scope.is_empty() {
            return Err(CliError::usage("please specify --cdn or --live"));
        }
        Ok(scope)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ServiceArg {
    Cdn,
    Live,
}

impl From<ServiceArg> for ServiceKind {
    fn from(arg: ServiceArg) -> Self {
        match arg {
            ServiceArg::Cdn => Self::Cdn,
            ServiceArg::Live => Self::Live,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct ChallengeArgs {
    /// Domain being validated
    #[arg(long, env = "CERTBOT_DOMAIN")]
    pub domain: String,
    /// Validation string
    #[arg(long, env = "CERTBOT_VALIDATION")]
    pub validation: String,
}
