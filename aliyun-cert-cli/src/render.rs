//! 表格输出

use aliyun_cert_core::types::{
    BoundCertificate, Certificate, DeployReport, DomainListing, ReplacementReport, ServiceKind,
};
use chrono::{DateTime, Utc};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};

const NONE: &str = "-";

fn new_table<const N: usize>(header: [&str; N]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

/// 剩余天数，过期显示 `EXPIRED`
pub fn days_left_label(days: Option<i64>, expired: bool) -> String {
    match days {
        _ if expired => "EXPIRED".to_string(),
        Some(d) if d < 0 => "EXPIRED".to_string(),
        Some(d) => d.to_string(),
        None => "N/A".to_string(),
    }
}

fn or_none(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => NONE.to_string(),
    }
}

fn expires(cert: &Certificate) -> String {
    cert.not_after
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .or_else(|| cert.end_date.clone())
        .unwrap_or_else(|| NONE.to_string())
}

/// 域名与绑定证书；没有证书的域名单独占一行
pub fn domains(kind: ServiceKind, listing: &DomainListing, now: DateTime<Utc>) -> Table {
    let mut table = new_table([
        kind.label(),
        "Status",
        "Cert ID",
        "Cert Name",
        "Cert Domain",
        "Type",
        "Expires",
        "Days Left",
    ]);

    for entry in &listing.domains {
        let status = or_none(entry.domain.status.as_deref());
        if entry.bindings.is_empty() {
            table.add_row(vec![
                entry.domain.name.clone(),
                status,
                NONE.into(),
                NONE.into(),
                NONE.into(),
                NONE.into(),
                NONE.into(),
                NONE.into(),
            ]);
            continue;
        }
        for binding in &entry.bindings {
            table.add_row(binding_row(&entry.domain.name, &status, binding, now));
        }
    }
    table
}

fn binding_row(
    domain: &str,
    status: &str,
    binding: &BoundCertificate,
    now: DateTime<Utc>,
) -> Vec<String> {
    let days = binding.expires_at().map(|t| (t - now).num_days());
    vec![
        domain.to_string(),
        status.to_string(),
        or_none(binding.cert_id.as_deref()),
        or_none(binding.cert_name.as_deref()),
        or_none(binding.cert_domain_name.as_deref()),
        or_none(binding.cert_type.as_deref()),
        or_none(binding.cert_expire_time.as_deref()),
        if binding.cert_expire_time.is_some() {
            days_left_label(days, false)
        } else {
            NONE.to_string()
        },
    ]
}

/// 证书列表
pub fn certificates(certs: &[Certificate], now: DateTime<Utc>) -> Table {
    let mut table = new_table([
        "ID",
        "Name",
        "Common Name",
        "SANs",
        "Issuer",
        "Status",
        "Expires",
        "Days Left",
    ]);
    for cert in certs {
        table.add_row(vec![
            cert.id.to_string(),
            cert.name.clone(),
            cert.common_name.clone(),
            cert.sans.join(", "),
            or_none(cert.issuer.as_deref()),
            or_none(cert.status.as_deref()),
            expires(cert),
            days_left_label(cert.days_left(now), cert.expired),
        ]);
    }
    table
}

/// 单个证书详情（键值表）
pub fn certificate_detail(cert: &Certificate, now: DateTime<Utc>) -> Table {
    let mut table = new_table(["Field", "Value"]);
    let rows = [
        ("id", cert.id.to_string()),
        ("name", cert.name.clone()),
        ("common name", cert.common_name.clone()),
        ("SANs", cert.sans.join(", ")),
        ("issuer", or_none(cert.issuer.as_deref())),
        ("start", or_none(cert.start_date.as_deref())),
        ("expires", expires(cert)),
        ("days left", days_left_label(cert.days_left(now), cert.expired)),
    ];
    for (field, value) in rows {
        table.add_row(vec![field.to_string(), value]);
    }
    table
}

/// 替换结果：每个换绑成功或失败的域名一行
pub fn replacement(reports: &[ReplacementReport]) -> Table {
    let mut table = new_table(["Service", "Domain", "Result"]);
    for report in reports {
        for domain in &report.replaced {
            table.add_row(vec![
                report.kind.label().to_string(),
                domain.clone(),
                format!("replaced with {}", report.certificate.id),
            ]);
        }
        for failure in &report.failures {
            table.add_row(vec![
                report.kind.label().to_string(),
                failure.domain.clone(),
                format!("FAILED: {}", failure.error),
            ]);
        }
        if let Some(error) = &report.list_error {
            table.add_row(vec![
                report.kind.label().to_string(),
                "(domain list)".to_string(),
                format!("FAILED: {error}"),
            ]);
        }
    }
    table
}

/// deploy hook 结果中的旧证书处理
pub fn deploy_summary(report: &DeployReport) -> Table {
    let mut table = new_table(["Old Certificate", "Result"]);
    let superseded = report.superseded();
    for id in &superseded {
        let result = if report.deleted.contains(id) {
            "deleted".to_string()
        } else if let Some(f) = report
            .deletion_failures
            .iter()
            .find(|f| f.certificate_id == *id)
        {
            format!("FAILED: {}", f.error)
        } else {
            "kept".to_string()
        };
        table.add_row(vec![id.to_string(), result]);
    }
    table
}
