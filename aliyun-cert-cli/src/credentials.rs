//! AccessKey 解析
//!
//! 优先使用命令行 / 环境变量中的 id + secret，否则读取 certbot-dns-aliyun
//! 插件使用的 INI 文件。

use std::path::{Path, PathBuf};

use aliyun_cert_provider::AccessKey;
use clap::Args;
use config::{Config, File, FileFormat};
use serde::Deserialize;

use crate::error::CliError;

const INI_KEY_ID: &str = "dns_aliyun_key_id";
const INI_KEY_SECRET: &str = "dns_aliyun_key_secret";

#[derive(Debug, Clone, Default, Args)]
pub struct CredentialArgs {
    /// Aliyun access key id
    #[arg(long, env = "ALIYUN_ACCESS_KEY_ID", global = true)]
    pub access_key_id: Option<String>,

    /// Aliyun access key secret
    #[arg(
        long,
        env = "ALIYUN_ACCESS_KEY_SECRET",
        global = true,
        hide_env_values = true
    )]
    pub access_key_secret: Option<String>,

    /// Aliyun access key ini file [default: ~/.secrets/aliyun.ini]
    #[arg(long, env = "ALIYUN_ACCESS_KEY_INI_FILE", global = true)]
    pub access_key_ini_file: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct IniCredentials {
    dns_aliyun_key_id: Option<String>,
    dns_aliyun_key_secret: Option<String>,
}

impl CredentialArgs {
    pub fn resolve(&self) -> Result<AccessKey, CliError> {
        if let (Some(id), Some(secret)) = (
            non_empty(self.access_key_id.as_deref()),
            non_empty(self.access_key_secret.as_deref()),
        ) {
            return Ok(AccessKey::new(id, secret));
        }

        let path = self
            .access_key_ini_file
            .clone()
            .or_else(default_ini_path)
            .ok_or_else(|| {
                CliError::usage(
                    "access-key-id and access-key-secret or access-key-ini-file is required",
                )
            })?;
        load_ini(&path)
    }
}

pub fn default_ini_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".secrets").join("aliyun.ini"))
}

pub fn load_ini(path: &Path) -> Result<AccessKey, CliError> {
    let settings = Config::builder()
        .add_source(File::from(path).format(FileFormat::Ini))
        .build()
        .map_err(|e| {
            CliError::usage(format!("cannot read ini file {}: {e}", path.display()))
        })?;

    let ini: IniCredentials = settings.try_deserialize().map_err(|e| {
        CliError::usage(format!("invalid ini file {}: {e}", path.display()))
    })?;

    match (
        non_empty(ini.dns_aliyun_key_id.as_deref()),
        non_empty(ini.dns_aliyun_key_secret.as_deref()),
    ) {
        (Some(id), Some(secret)) => {
            tracing::debug!("Access key loaded from {}", path.display());
            Ok(AccessKey::new(id, secret))
        }
        _ => Err(CliError::usage(format!(
            "invalid ini file {}, {INI_KEY_ID} and {INI_KEY_SECRET} are required",
            path.display()
        ))),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
