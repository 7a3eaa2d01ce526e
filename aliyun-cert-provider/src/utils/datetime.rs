//! 日期时间序列化/反序列化工具
//!
//! - 序列化: `DateTime<Utc>` -> RFC3339 字符串
//! - 反序列化: RFC3339 字符串、数字字符串或 Unix 时间戳 -> `DateTime<Utc>`
//!
//! CAS 的 `NotAfter` / `CertEndTime` 为毫秒时间戳。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// 序列化 `Option<DateTime<Utc>>` 为 `Option<RFC3339 字符串>`
pub fn serialize<S>(dt: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match dt {
        Some(dt) => serializer.serialize_some(&dt.to_rfc3339()),
        None => serializer.serialize_none(),
    }
}

/// 反序列化：支持 RFC3339 字符串或 Unix 时间戳（秒/毫秒自动识别），空字符串视为 `None`
pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OptionalTimestamp {
        String(String),
        I64(i64),
        U64(u64),
    }

    match Option::<OptionalTimestamp>::deserialize(deserializer)? {
        Some(OptionalTimestamp::String(s)) if s.trim().is_empty() => Ok(None),
        Some(OptionalTimestamp::String(s)) => {
            if let Ok(ts) = s.trim().parse::<i64>() {
                return parse_unix_timestamp(ts)
                    .map(Some)
                    .ok_or_else(|| Error::custom("Invalid Unix timestamp"));
            }
            DateTime::parse_from_rfc3339(&s)
                .map(|dt| Some(dt.with_timezone(&Utc)))
                .map_err(|e| Error::custom(format!("Invalid RFC3339 timestamp: {e}")))
        }
        Some(OptionalTimestamp::I64(ts)) => parse_unix_timestamp(ts)
            .map(Some)
            .ok_or_else(|| Error::custom("Invalid Unix timestamp")),
        Some(OptionalTimestamp::U64(ts)) => i64::try_from(ts)
            .ok()
            .and_then(parse_unix_timestamp)
            .map(Some)
            .ok_or_else(|| Error::custom("Invalid Unix timestamp")),
        None => Ok(None),
    }
}

/// 解析 Unix 时间戳（自动判断秒/毫秒）
fn parse_unix_timestamp(ts: i64) -> Option<DateTime<Utc>> {
    // > 10^11 视为毫秒
    if ts > 100_000_000_000 {
        DateTime::from_timestamp_millis(ts)
    } else {
        DateTime::from_timestamp(ts, 0)
    }
}
