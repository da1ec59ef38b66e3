use std::sync::OnceLock;

use hook_common::observability::{LogConfig, LogFormat};

static INIT_PATH: OnceLock<std::path::PathBuf> = OnceLock::new();

pub fn init_test_tracing() {
    let _ = INIT_PATH.get_or_init(|| {
        let config = LogConfig {
            app_name: "mutual-hook-tests",
            emit_stderr: true,
            format: std::env::var("HOOK_LOG_FORMAT")
                .ok()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(LogFormat::Text),
            default_filter: "debug",
            ..LogConfig::default()
        };

        hook_common::observability::init_logging(config).unwrap_or_default()
    });
}
