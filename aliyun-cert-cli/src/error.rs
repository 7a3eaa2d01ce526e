//! 命令行错误与退出码

use aliyun_cert_core::CoreError;
use thiserror::Error;

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_USAGE: u8 = 2;
pub const EXIT_NOT_FOUND: u8 = 3;
pub const EXIT_CREDENTIALS: u8 = 4;
/// 批量操作完成，但部分域名失败
pub const EXIT_PARTIAL: u8 = 5;

#[derive(Debug, Error)]
pub enum CliError {
    /// 参数组合或凭证配置错误（clap 无法表达的部分）
    #[error("{0}")]
    Usage(String),
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self::Usage(msg.into())
    }
}

/// 错误链中第一个可识别的错误决定退出码
pub fn exit_code(err: &anyhow::Error) -> u8 {
    for cause in err.chain() {
        if let Some(CliError::Usage(_)) = cause.downcast_ref::<CliError>() {
            return EXIT_USAGE;
        }
        if let Some(core) = cause.downcast_ref::<CoreError>() {
            return match core {
                e if e.is_not_found() => EXIT_NOT_FOUND,
                CoreError::CredentialsInvalid(_) => EXIT_CREDENTIALS,
                CoreError::Validation(_) => EXIT_USAGE,
                _ => EXIT_FAILURE,
            };
        }
    }
    EXIT_FAILURE
}

/// 是否为预期内的失败（用户输入、资源不存在），决定日志级别
pub fn is_expected(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause.downcast_ref::<CliError>().is_some()
            || cause
                .downcast_ref::<CoreError>()
                .is_some_and(CoreError::is_expected)
    })
}
