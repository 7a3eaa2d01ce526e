//! 命令执行

use std::path::Path;
use std::sync::Arc;

use aliyun_cert_core::services::validation_name;
use aliyun_cert_core::types::{DeployRequest, ReplacementReport, ServiceKind};
use aliyun_cert_core::{
    CertificateService, CoreError, DeployHookService, DnsChallengeService, DomainService,
    ReplacementService, ServiceContext,
};
use aliyun_cert_provider::create_clients;
use anyhow::{Context, Result};
use chrono::Utc;

use crate::cli::{ChallengeArgs, Cli, Command};
use crate::render;

/// 命令执行结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// 批量操作完成，但有域名或旧证书处理失败
    PartialFailure,
}

impl Outcome {
    fn from_failures(has_failures: bool) -> Self {
        if has_failures {
            Self::PartialFailure
        } else {
            Self::Success
        }
    }
}

pub async fn run(cli: Cli) -> Result<Outcome> {
    // 先校验命令自身的参数，避免无意义地解析凭证
    validate(&cli.command)?;

    let access_key = cli.credentials.resolve()?;
    let clients = create_clients(access_key).map_err(CoreError::from)?;
    let ctx = Arc::new(ServiceContext::from(clients));

    execute(cli.command, ctx).await
}

fn validate(command: &Command) -> Result<()> {
    match command {
        Command::ListDomains(scope)
        | Command::ReplaceCert { scope, .. }
        | Command::CertbotDeployHook { scope, .. } => {
            scope.scope()?;
        }
        _ => {}
    }
    Ok(())
}

async fn execute(command: Command, ctx: Arc<ServiceContext>) -> Result<Outcome> {
    match command {
        Command::ListDomains(scope) => {
            let domains = DomainService::new(ctx);
            let mut has_failures = false;
            for kind in scope.scope()?.kinds() {
                let listing = domains.list_with_bindings(kind).await?;
                println!("{}", render::domains(kind, &listing, Utc::now()));
                for failure in &listing.failures {
                    eprintln!(
                        "failed to fetch certificates of {} domain {}: {}",
                        kind.label(),
                        failure.domain,
                        failure.error
                    );
                }
                has_failures |= !listing.failures.is_empty();
            }
            Ok(Outcome::from_failures(has_failures))
        }

        Command::ListCerts => {
            let certs = CertificateService::new(ctx).list().await?;
            println!("{}", render::certificates(&certs, Utc::now()));
            Ok(Outcome::Success)
        }

        Command::GetCert(cert) => {
            let certificate = CertificateService::new(ctx).get(cert.cert_id).await?;
            println!("{}", render::certificate_detail(&certificate, Utc::now()));
            Ok(Outcome::Success)
        }

        Command::UploadCert {
            full_chain,
            private_key,
            domain,
        } => {
            let full_chain = read_file(&full_chain).await?;
            let private_key = read_file(&private_key).await?;
            let certificate = CertificateService::new(ctx)
                .upload(&domain, &full_chain, &private_key)
                .await?;
            println!("cert {} uploaded for {domain}", certificate.id);
            Ok(Outcome::Success)
        }

        Command::DeleteCert(cert) => {
            CertificateService::new(ctx).delete(cert.cert_id).await?;
            println!("cert {} deleted", cert.cert_id);
            Ok(Outcome::Success)
        }

        Command::SetCert {
            cert,
            domain,
            service,
        } => {
            let kind = ServiceKind::from(service);
            let (certificate, domain) = DomainService::new(ctx)
                .set_certificate(kind, cert.cert_id, &domain)
                .await?;
            println!(
                "cert {} set for {} domain {}",
                certificate.id,
                kind.label(),
                domain.name
            );
            Ok(Outcome::Success)
        }

        Command::ReplaceCert { cert, scope } => {
            let reports = ReplacementService::new(ctx)
                .replace_in_scope(cert.cert_id, scope.scope()?)
                .await?;
            println!("{}", render::replacement(&reports));
            Ok(Outcome::from_failures(
                reports.iter().any(ReplacementReport::has_failures),
            ))
        }

        Command::CertbotDeployHook {
            cert_path,
            renewed_domains,
            scope,
            delete_old_cert,
        } => {
            let request = DeployRequest {
                cert_dir: cert_path,
                renewed_domains: DeployRequest::parse_renewed_domains(&renewed_domains),
                scope: scope.scope()?,
                delete_old: delete_old_cert,
            };
            let report = DeployHookService::new(ctx).deploy(&request).await?;
            println!("{}", render::replacement(&report.reports));
            if !report.superseded().is_empty() {
                println!("{}", render::deploy_summary(&report));
            }
            Ok(Outcome::from_failures(report.has_failures()))
        }

        Command::DnsAuthHook(args) => {
            let ChallengeArgs { domain, validation } = args;
            let record = DnsChallengeService::new(ctx)
                .perform(&domain, &validation_name(&domain), &validation)
                .await?;
            tracing::info!(
                "TXT record {}.{} ready for {domain}",
                record.rr,
                record.zone
            );
            Ok(Outcome::Success)
        }

        Command::DnsCleanupHook(args) => {
            let ChallengeArgs { domain, validation } = args;
            let record = DnsChallengeService::new(ctx)
                .cleanup(&domain, &validation_name(&domain), &validation)
                .await?;
            tracing::info!(
                "TXT record {}.{} removed for {domain}",
                record.rr,
                record.zone
            );
            Ok(Outcome::Success)
        }
    }
}

async fn read_file(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))
}
