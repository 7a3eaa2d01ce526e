//! aliyun-cert: 阿里云 CDN / 直播证书管理工具
//!
//! 同时提供 certbot 的 deploy hook 与 DNS-01 manual hooks。
//! 表格输出写入 stdout，日志写入 stderr。

mod cli;
mod commands;
mod credentials;
mod error;
mod render;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use cli::Cli;
use commands::Outcome;

fn init_tracing(verbose: bool) {
    // --verbose 覆盖 RUST_LOG；库 crate 的 log 记录经 tracing-log 桥接
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match commands::run(cli).await {
        Ok(Outcome::Success) => ExitCode::SUCCESS,
        Ok(Outcome::PartialFailure) => {
            tracing::warn!("Finished with failures, see above");
            ExitCode::from(error::EXIT_PARTIAL)
        }
        Err(e) => {
            if error::is_expected(&e) {
                tracing::warn!("{e:#}");
            } else {
                tracing::error!("{e:#}");
            }
            ExitCode::from(error::exit_code(&e))
        }
    }
}
