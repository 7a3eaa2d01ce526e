//! 共享测试工具和辅助函数

#![allow(dead_code)]

use std::env;

use aliyun_cert_provider::{AccessKey, ClientSet, RecordFilter, create_clients};

/// 跳过测试的宏（当环境变量缺失时）
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("跳过测试: 缺少环境变量 {}", $var);
                return;
            }
        )+
    };
}

/// 断言 `Option` 为 `Some`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_some {
    ($expr:expr $(,)?) => {{
        let opt = $expr;
        assert!(opt.is_some(), "expected Some(..), got None");
        let Some(val) = opt else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let opt = $expr;
        assert!(opt.is_some(), "{}", format_args!($($msg)+));
        let Some(val) = opt else {
            return;
        };
        val
    }};
}

/// 断言 `Result` 为 `Ok`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// 生成唯一的测试记录名称
pub fn generate_test_record_name() -> String {
    let uuid = uuid::Uuid::new_v4();
    format!("_test-{}", &uuid.to_string()[..8])
}

/// 测试上下文 - 封装客户端和测试 zone
pub struct TestContext {
    pub clients: ClientSet,
    /// Alidns 中托管的测试 zone（`TEST_DOMAIN`）
    pub zone: String,
}

impl TestContext {
    pub fn from_env() -> Option<Self> {
        let access_key_id = env::var("ALIYUN_ACCESS_KEY_ID").ok()?;
        let access_key_secret = env::var("ALIYUN_ACCESS_KEY_SECRET").ok()?;
        let zone = env::var("TEST_DOMAIN").ok()?;

        let clients = create_clients(AccessKey::new(access_key_id, access_key_secret)).ok()?;
        Some(Self { clients, zone })
    }

    /// 查找并清理所有测试记录（以 _test- 开头的记录）
    pub async fn cleanup_all_test_records(&self) {
        let filter = RecordFilter {
            rr_keyword: Some("_test-".to_string()),
            ..RecordFilter::default()
        };

        if let Ok(records) = self.clients.dns.list_records(&self.zone, &filter).await {
            for record in records {
                if record.rr.starts_with("_test-")
                    && let Some(id) = record.id
                {
                    let _ = self.clients.dns.delete_record(&id).await;
                }
            }
        }
    }
}
