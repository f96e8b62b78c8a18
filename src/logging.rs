//! tracing 初始化：stdout 为人类可读格式，可选按天滚动的 JSON 文件日志

use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::config::Config;

const LOG_FILE_PREFIX: &str = "binocular-rehab";
const LOG_RETENTION_FILES: usize = 14;
/// 本服务与核心库之外的 target 只放行 warn，避免逐帧请求淹没日志
const DEPENDENCY_LEVEL: &str = "warn";
const SERVICE_TARGETS: &[&str] = &["binocular_rehab", "binocular_core", "tower_http"];

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("invalid log filter '{directives}': {source}")]
    Filter {
        directives: String,
        #[source]
        source: ParseError,
    },
    #[error("failed to create log appender in {dir}: {source}")]
    Appender {
        dir: String,
        #[source]
        source: InitError,
    },
    #[error("failed to install tracing subscriber: {0}")]
    Install(#[from] TryInitError),
}

/// 把 `RUST_LOG` 的单一级别展开为按 target 的过滤规则；
/// 已经是完整过滤表达式时原样使用
pub fn filter_directives(level: &str) -> String {
    let level = level.trim();
    if level.is_empty() {
        return filter_directives("info");
    }
    if level.contains('=') || level.contains(',') {
        return level.to_string();
    }
    let mut directives = DEPENDENCY_LEVEL.to_string();
    for target in SERVICE_TARGETS {
        directives.push_str(&format!(",{target}={level}"));
    }
    directives
}

/// 安装全局 subscriber。重复调用（测试里多次初始化）时保留已安装的那个
pub fn init_tracing(config: &Config) -> Result<(), LoggingError> {
    let directives = filter_directives(&config.log_level);
    let env_filter = EnvFilter::try_new(&directives).map_err(|source| LoggingError::Filter {
        directives: directives.clone(),
        source,
    })?;

    let file_appender = if config.enable_file_logs {
        let appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix(LOG_FILE_PREFIX)
            .filename_suffix("log")
            .max_log_files(LOG_RETENTION_FILES)
            .build(&config.log_dir)
            .map_err(|source| LoggingError::Appender {
                dir: config.log_dir.clone(),
                source,
            })?;
        Some(appender)
    } else {
        None
    };

    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let stdout_layer = fmt::layer().with_target(true).with_thread_ids(false);
    let file_layer = file_appender.map(|appender| {
        fmt::layer()
            .with_writer(appender)
            .with_ansi(false)
            .json()
    });

    match Registry::default()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
    {
        // 并发初始化时另一个线程先装好了
        Err(_) if tracing::dispatcher::has_been_set() => Ok(()),
        other => other.map_err(LoggingError::from),
    }
}
