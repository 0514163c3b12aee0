pub mod session;
pub mod toml_config;

use crate::utils::error::Result;
use session::{CfCliConfig, Session};
use std::path::PathBuf;
use toml_config::TomlConfig;

#[cfg(feature = "cli")]
use clap::{Parser, ValueEnum};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "lookup-route")]
#[command(version)]
#[command(about = "Lookup routes in the Cloud Foundry API")]
pub struct CliConfig {
    /// Route hostname to resolve, e.g. myapp.apps.example.com
    pub hostname: Option<String>,

    #[arg(long, env = "CF_API_ENDPOINT", help = "Cloud Controller API endpoint")]
    pub api_endpoint: Option<String>,

    #[arg(
        long,
        env = "CF_ACCESS_TOKEN",
        hide_env_values = true,
        help = "Access token, including the 'bearer ' prefix"
    )]
    pub token: Option<String>,

    #[arg(long, help = "TOML file with a [session] section")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "cf CLI config.json (default: $CF_HOME/.cf/config.json)")]
    pub cf_config: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 旗標 > TOML 設定檔 > cf CLI config.json
    pub fn session(&self) -> Result<Session> {
        let flags = Session::new(self.api_endpoint.clone(), self.token.clone());
        load_session(flags, self.config.as_deref(), self.cf_config.clone())
    }
}

/// 依序合併各個來源，只補上仍缺少的欄位
pub fn load_session(
    primary: Session,
    toml_path: Option<&std::path::Path>,
    cf_config_path: Option<PathBuf>,
) -> Result<Session> {
    let mut session = primary;

    if let Some(path) = toml_path {
        tracing::debug!("Loading session from {}", path.display());
        session = session.or(TomlConfig::from_file(path)?.into());
    }

    if !(session.has_api_endpoint() && session.is_logged_in()) {
        if let Some(path) = cf_config_path.or_else(CfCliConfig::default_path) {
            if let Some(cf) = CfCliConfig::load(&path)? {
                tracing::debug!("Loading session from {}", path.display());
                session = session.or(cf.into());
            }
        }
    }

    Ok(session)
}
