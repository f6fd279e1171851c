use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 日志格式配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// 人类可读格式
    Pretty,
    /// 紧凑格式
    Compact,
    /// JSON 格式
    Json,
}

/// 日志配置
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// 日志级别（RUST_LOG 存在时以其为准）
    pub level: Level,
    /// 输出格式
    pub format: LogFormat,
    /// 是否显示目标模块
    pub show_target: bool,
    /// 是否输出 ANSI 颜色
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: LogFormat::Pretty,
            show_target: true,
            ansi: true,
        }
    }
}

impl LoggingConfig {
    /// 开发环境配置
    pub fn development() -> Self {
        Self {
            level: Level::DEBUG,
            ..Self::default()
        }
    }

    /// 生产环境配置
    pub fn production() -> Self {
        Self {
            level: Level::INFO,
            format: LogFormat::Json,
            show_target: false,
            ansi: false,
        }
    }

    /// 按命令行选项挑选预设：--verbose 用开发配置，其余 JSON 输出用生产配置
    pub fn for_cli(verbose: bool, format: LogFormat) -> Self {
        match (verbose, format) {
            (true, format) => Self::development().with_format(format),
            (false, LogFormat::Json) => Self::production(),
            (false, format) => Self::default().with_format(format),
        }
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        if format == LogFormat::Json {
            self.ansi = false;
        }
        self
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level.to_string().to_lowercase()))
    }
}

/// 初始化日志系统
///
/// `warp::log` 通过 `log` 门面输出，由 tracing-subscriber 的 log 兼容层接收。
pub fn init_logging(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = config.env_filter();

    match config.format {
        LogFormat::Pretty => {
            let fmt_layer = fmt::layer()
                .pretty()
                .with_target(config.show_target)
                .with_ansi(config.ansi);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .try_init()?;
        }
        LogFormat::Compact => {
            let fmt_layer = fmt::layer()
                .compact()
                .with_target(config.show_target)
                .with_ansi(config.ansi);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .try_init()?;
        }
        LogFormat::Json => {
            let fmt_layer = fmt::layer()
                .json()
                .with_target(config.show_target)
                .with_current_span(false);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .try_init()?;
        }
    }

    tracing::debug!(
        level = %config.level,
        format = ?config.format,
        "Logging system initialized"
    );

    Ok(())
}

/// 操作性能计时器
pub struct OperationTimer {
    start: Instant,
    operation: String,
    metadata: HashMap<String, String>,
    finished: bool,
}

impl OperationTimer {
    /// 创建新的计时器
    pub fn new(operation: &str) -> Self {
        Self {
            start: Instant::now(),
            operation: operation.to_string(),
            metadata: HashMap::new(),
            finished: false,
        }
    }

    /// 添加元数据
    pub fn with_metadata(mut self, key: &str, value: impl ToString) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }

    /// 完成计时并记录日志
    pub fn finish(mut self) -> Duration {
        let duration = self.start.elapsed();
        self.finished = true;
        tracing::info!(
            operation = %self.operation,
            duration_ms = duration.as_millis() as u64,
            metadata = ?self.metadata,
            "Operation completed"
        );
        duration
    }

    /// 获取当前经过时间
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for OperationTimer {
    fn drop(&mut self) {
        // 未调用 finish 说明提前返回（错误路径）
        if !self.finished {
            tracing::debug!(
                operation = %self.operation,
                duration_ms = self.start.elapsed().as_millis() as u64,
                metadata = ?self.metadata,
                "Operation timer dropped before completion"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_config_creation() {
        let dev_config = LoggingConfig::development();
        assert_eq!(dev_config.level, Level::DEBUG);
        assert_eq!(dev_config.format, LogFormat::Pretty);

        let prod_config = LoggingConfig::production();
        assert_eq!(prod_config.level, Level::INFO);
        assert_eq!(prod_config.format, LogFormat::Json);
        assert!(!prod_config.ansi);
    }

    #[test]
    fn test_cli_presets() {
        let config = LoggingConfig::for_cli(false, LogFormat::Json);
        assert_eq!(config.level, Level::INFO);
        assert!(!config.show_target);
        assert!(!config.ansi);

        let config = LoggingConfig::for_cli(true, LogFormat::Json);
        assert_eq!(config.level, Level::DEBUG);
        assert_eq!(config.format, LogFormat::Json);
        assert!(!config.ansi);

        let config = LoggingConfig::for_cli(false, LogFormat::Compact);
        assert_eq!(config.level, Level::INFO);
        assert_eq!(config.format, LogFormat::Compact);
        assert!(config.ansi);
    }

    #[test]
    fn test_json_format_disables_ansi() {
        let config = LoggingConfig::default().with_format(LogFormat::Json);
        assert_eq!(config.format, LogFormat::Json);
        assert!(!config.ansi);
    }

    #[test]
    fn test_operation_timer() {
        let timer = OperationTimer::new("review")
            .with_metadata("language", "python")
            .with_metadata("lines", 12);

        assert_eq!(timer.operation, "review");
        assert_eq!(timer.metadata.get("language"), Some(&"python".to_string()));
        assert_eq!(timer.metadata.get("lines"), Some(&"12".to_string()));

        std::thread::sleep(Duration::from_millis(1));
        assert!(timer.elapsed().as_nanos() > 0);
        assert!(timer.finish() >= Duration::from_millis(1));
    }

    #[test]
    fn test_second_init_is_an_error_not_a_panic() {
        let config = LoggingConfig::default().with_format(LogFormat::Compact);
        let _ = init_logging(&config);
        // 全局 subscriber 只能安装一次
        assert!(init_logging(&config).is_err());
    }
}
