//! DNS-01 验证服务
//!
//! `perform` 与 `cleanup` 通常由 certbot 在两个独立进程中调用，
//! zone 与相对记录名每次都从相同输入重新推导，不保存任何状态。

use std::sync::Arc;

use aliyun_cert_provider::{AddRecordRequest, RecordFilter};

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::types::ChallengeRecord;

/// 验证记录 TTL（秒）
pub const CHALLENGE_TTL: u32 = 600;

const TXT: &str = "TXT";

/// DNS-01 验证服务
pub struct DnsChallengeService {
    ctx: Arc<ServiceContext>,
}

impl DnsChallengeService {
    /// 创建 DNS 验证服务实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// 创建验证 TXT 记录
    pub async fn perform(
        &self,
        domain: &str,
        validation_name: &str,
        validation: &str,
    ) -> CoreResult<ChallengeRecord> {
        let zone = self.find_zone(domain).await?;
        let rr = relative_name(validation_name, &zone)?;

        let record_id = self
            .ctx
            .dns
            .add_record(&AddRecordRequest {
                zone: zone.clone(),
                rr: rr.clone(),
                record_type: TXT.to_string(),
                value: validation.to_string(),
                ttl: CHALLENGE_TTL,
            })
            .await?;

        log::info!("Challenge record {rr}.{zone} created ({record_id})");
        Ok(ChallengeRecord {
            zone,
            rr,
            record_id,
        })
    }

    /// 删除验证 TXT 记录
    ///
    /// 取第一条相对名称完全相同且 ID 有效的记录。验证值不参与匹配。
    pub async fn cleanup(
        &self,
        domain: &str,
        validation_name: &str,
        _validation: &str,
    ) -> CoreResult<ChallengeRecord> {
        let zone = self.find_zone(domain).await?;
        let rr = relative_name(validation_name, &zone)?;

        let filter = RecordFilter {
            rr_keyword: Some(rr.clone()),
            type_keyword: Some(TXT.to_string()),
            value_keyword: None,
        };
        let record_id = self
            .ctx
            .dns
            .list_records(&zone, &filter)
            .await?
            .into_iter()
            .filter(|r| r.rr == rr)
            .find_map(|r| r.id.filter(|id| !id.is_empty()))
            .ok_or_else(|| CoreError::RecordNotFound(format!("{TXT} {rr}.{zone}")))?;

        self.ctx.dns.delete_record(&record_id).await?;

        log::info!("Challenge record {rr}.{zone} deleted ({record_id})");
        Ok(ChallengeRecord {
            zone,
            rr,
            record_id,
        })
    }

    /// 查找托管 `domain` 的 zone
    ///
    /// 依次尝试候选 zone（从长到短），关键字搜索结果中有完全相同的名称即命中。
    pub async fn find_zone(&self, domain: &str) -> CoreResult<String> {
        let candidates = zone_candidates(domain);
        for candidate in &candidates {
            let zones = self.ctx.dns.list_zones(candidate).await?;
            if zones.iter().any(|z| z.eq_ignore_ascii_case(candidate)) {
                log::debug!("Zone for {domain}: {candidate}");
                return Ok(candidate.clone());
            }
        }
        Err(CoreError::ZoneNotFound(format!(
            "{domain} (tried: {})",
            candidates.join(", ")
        )))
    }
}

/// certbot 约定的验证记录名
#[must_use]
pub fn validation_name(domain: &str) -> String {
    format!("_acme-challenge.{}", normalize(domain))
}

/// 候选 zone：域名本身及逐级去掉最左标签的父域名，不含单标签后缀
///
/// `www.sub.example.com` -> `[www.sub.example.com, sub.example.com, example.com]`
#[must_use]
pub fn zone_candidates(domain: &str) -> Vec<String> {
    let domain = normalize(domain);
    let labels: Vec<&str> = domain.split('.').filter(|l| !l.is_empty()).collect();
    if labels.len() < 2 {
        return Vec::new();
    }
    (0..labels.len() - 1)
        .map(|i| labels[i..].join("."))
        .collect()
}

/// 去掉 zone 后缀得到相对记录名
///
/// 在最后一次出现的 `.{zone}` 处截断，比较不区分大小写，结果为小写。
pub fn relative_name(validation_name: &str, zone: &str) -> CoreResult<String> {
    let name = validation_name
        .trim()
        .trim_end_matches('.')
        .to_ascii_lowercase();
    let suffix = format!(".{}", zone.to_ascii_lowercase());
    match name.rfind(&suffix) {
        Some(pos) if pos > 0 => Ok(name[..pos].to_string()),
        _ => Err(CoreError::Validation(format!(
            "{validation_name} is not under zone {zone}"
        ))),
    }
}

fn normalize(domain: &str) -> String {
    let domain = domain.trim().trim_end_matches('.');
    domain
        .strip_prefix("*.")
        .unwrap_or(domain)
        .to_ascii_lowercase()
}
