use std::fmt;
use thiserror::Error;

/// 單一 API 呼叫失敗的原因（尚未帶上步驟名稱）
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("received non 200 status code: {status} ({body})")]
    Status { status: u16, body: String },

    #[error("{0}")]
    Decode(#[from] serde_json::Error),
}

/// 解析鏈中對應每個 API 呼叫的步驟，用來作為錯誤訊息前綴
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiStep {
    GetDomains,
    GetRoutes,
    GetApp,
    GetSpace,
    GetOrganization,
}

impl fmt::Display for ApiStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ApiStep::GetDomains => "get domains",
            ApiStep::GetRoutes => "get routes",
            ApiStep::GetApp => "get app",
            ApiStep::GetSpace => "get space",
            ApiStep::GetOrganization => "get organization",
        };
        f.write_str(name)
    }
}

/// 需要唯一比對的資源種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Domain,
    Route,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Domain => f.write_str("domains"),
            ResourceKind::Route => f.write_str("routes"),
        }
    }
}

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("no API endpoint set")]
    NoApiEndpoint,

    #[error("not logged in")]
    NotLoggedIn,

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("{step}: {source}")]
    Api {
        step: ApiStep,
        #[source]
        source: ApiError,
    },

    #[error("'{0}' is not a domain")]
    NotADomain(String),

    #[error("found no matching {0}")]
    NoMatch(ResourceKind),

    #[error("found multiple matching {0}")]
    MultipleMatches(ResourceKind),

    #[error("route has no destination")]
    NoDestination,

    #[error("route has multiple destinations")]
    MultipleDestinations,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Precondition,
    Configuration,
    Transport,
    Protocol,
    Decode,
    Resolution,
}

impl LookupError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            LookupError::NoApiEndpoint | LookupError::NotLoggedIn => ErrorCategory::Precondition,
            LookupError::ConfigError { .. }
            | LookupError::InvalidConfigValueError { .. }
            | LookupError::IoError(_) => ErrorCategory::Configuration,
            LookupError::Api { source, .. } => match source {
                ApiError::Transport(_) => ErrorCategory::Transport,
                ApiError::Status { .. } => ErrorCategory::Protocol,
                ApiError::Decode(_) => ErrorCategory::Decode,
            },
            LookupError::NotADomain(_)
            | LookupError::NoMatch(_)
            | LookupError::MultipleMatches(_)
            | LookupError::NoDestination
            | LookupError::MultipleDestinations => ErrorCategory::Resolution,
        }
    }

    /// 失敗的 API 步驟（非 API 錯誤時為 None）
    pub fn step(&self) -> Option<ApiStep> {
        match self {
            LookupError::Api { step, .. } => Some(*step),
            _ => None,
        }
    }
}

/// 在函式邊界替 API 錯誤加上步驟前綴
pub trait WithStep<T> {
    fn with_step(self, step: ApiStep) -> Result<T>;
}

impl<T> WithStep<T> for std::result::Result<T, ApiError> {
    fn with_step(self, step: ApiStep) -> Result<T> {
        self.map_err(|source| LookupError::Api { step, source })
    }
}

pub type Result<T> = std::result::Result<T, LookupError>;
