//! Session bootstrap.
//!
//! The API endpoint and access token come from the caller's environment: CLI
//! flags, an optional TOML file, or the cf CLI's own `config.json`. Nothing in
//! the resolver looks these up by itself; a [`Credentials`] value is handed in.

use crate::config::toml_config::TomlConfig;
use crate::utils::error::{LookupError, Result};
use crate::utils::validation::{non_blank, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 尚未驗證的 session 資訊，欄位可能缺漏
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub api_endpoint: Option<String>,
    pub access_token: Option<String>,
}

/// 已確認存在的 endpoint 與 token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_endpoint: String,
    pub access_token: String,
}

/// cf CLI 的 `~/.cf/config.json`（只取需要的欄位）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CfCliConfig {
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
}

impl CfCliConfig {
    /// `$CF_HOME/.cf/config.json`，沒有 CF_HOME 時用 `$HOME`
    pub fn default_path() -> Option<PathBuf> {
        std::env::var_os("CF_HOME")
            .or_else(|| std::env::var_os("HOME"))
            .or_else(|| std::env::var_os("USERPROFILE"))
            .map(|home| PathBuf::from(home).join(".cf").join("config.json"))
    }

    /// 檔案不存在時回傳 None；存在但無法讀取或解析則是錯誤
    pub fn load(path: &Path) -> Result<Option<Self>> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No cf CLI config at {}", path.display());
                return Ok(None);
            }
            Err(e) => return Err(LookupError::IoError(e)),
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| LookupError::ConfigError {
                message: format!("cf CLI config {}: {}", path.display(), e),
            })
    }
}

impl From<CfCliConfig> for Session {
    fn from(config: CfCliConfig) -> Self {
        Self {
            api_endpoint: config.target,
            access_token: config.access_token,
        }
    }
}

impl From<TomlConfig> for Session {
    fn from(config: TomlConfig) -> Self {
        Self {
            api_endpoint: config.session.api_endpoint,
            access_token: config.session.access_token,
        }
    }
}

impl Session {
    pub fn new(api_endpoint: Option<String>, access_token: Option<String>) -> Self {
        Self {
            api_endpoint,
            access_token,
        }
    }

    /// 自己缺少的欄位以 `fallback` 補上。
    ///
    /// `fallback` 的 token 只在它的 endpoint 與最終 endpoint 相同時採用，
    /// 避免把某個 target 的 token 送到另一個 API。
    pub fn or(self, fallback: Session) -> Session {
        let api_endpoint = pick(self.api_endpoint, fallback.api_endpoint.clone());

        let token_matches = match (
            non_blank(api_endpoint.as_deref()),
            non_blank(fallback.api_endpoint.as_deref()),
        ) {
            (Some(ours), Some(theirs)) => same_endpoint(ours, theirs),
            _ => true,
        };

        let access_token = if token_matches {
            pick(self.access_token, fallback.access_token)
        } else {
            if non_blank(self.access_token.as_deref()).is_none()
                && non_blank(fallback.access_token.as_deref()).is_some()
            {
                tracing::debug!(
                    "Ignoring access token issued for {:?}, endpoint is {:?}",
                    fallback.api_endpoint,
                    api_endpoint
                );
            }
            self.access_token
        };

        Session {
            api_endpoint,
            access_token,
        }
    }

    pub fn has_api_endpoint(&self) -> bool {
        non_blank(self.api_endpoint.as_deref()).is_some()
    }

    pub fn is_logged_in(&self) -> bool {
        non_blank(self.access_token.as_deref()).is_some()
    }

    /// 在任何網路呼叫之前確認前置條件
    pub fn require(&self) -> Result<Credentials> {
        self.validate()?;

        let api_endpoint = non_blank(self.api_endpoint.as_deref()).ok_or(LookupError::NoApiEndpoint)?;
        let access_token = non_blank(self.access_token.as_deref()).ok_or(LookupError::NotLoggedIn)?;

        Ok(Credentials {
            api_endpoint: api_endpoint.to_string(),
            access_token: access_token.to_string(),
        })
    }
}

impl Validate for Session {
    fn validate(&self) -> Result<()> {
        if !self.has_api_endpoint() {
            return Err(LookupError::NoApiEndpoint);
        }
        if let Some(endpoint) = non_blank(self.api_endpoint.as_deref()) {
            validate_url("api_endpoint", endpoint)?;
        }
        if !self.is_logged_in() {
            return Err(LookupError::NotLoggedIn);
        }
        Ok(())
    }
}

fn same_endpoint(a: &str, b: &str) -> bool {
    a.trim_end_matches('/')
        .eq_ignore_ascii_case(b.trim_end_matches('/'))
}

fn pick(primary: Option<String>, fallback: Option<String>) -> Option<String> {
    if non_blank(primary.as_deref()).is_some() {
        primary
    } else {
        fallback
    }
}
