pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, OutputFormat};

pub use adapters::http::CfApi;
pub use config::session::{Credentials, Session};
pub use core::resolver::RouteResolver;
pub use domain::model::Resolution;
pub use utils::error::{LookupError, Result};
