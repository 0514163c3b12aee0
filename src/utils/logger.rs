use crate::utils::error::LookupError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "lookup_route=debug,warn"
    } else {
        "lookup_route=warn"
    }
}

/// 日誌一律寫到 stderr，stdout 只留給查詢結果
pub fn init_cli_logger(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

/// 給腳本或 log 收集器使用的 JSON 格式
pub fn init_json_logger() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lookup_route=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(),
        )
        .init();
}

/// 失敗時 stdout 只有一行 `error: ...`，分類細節只在 --verbose 時出現
pub fn failure_line(e: &LookupError) -> String {
    tracing::debug!(
        "❌ lookup failed (Category: {:?}, Step: {:?})",
        e.category(),
        e.step()
    );
    format!("error: {}", e)
}
