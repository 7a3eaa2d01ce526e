use serde::Serialize;

/// DNS-01 验证记录的定位信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeRecord {
    /// 托管 zone
    pub zone: String,
    /// 相对记录名
    pub rr: String,
    /// 新建记录的 ID（清理时为被删除记录的 ID）
    pub record_id: String,
}
