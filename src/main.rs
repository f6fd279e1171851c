// CodeRefine API 服务器
//
// 加载配置 -> 初始化日志 -> 组装评审服务 -> 启动 HTTP 服务

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use coderefine::config::{AppConfig, API_KEY_ENV};
use coderefine::logging::{init_logging, LogFormat, LoggingConfig};
use coderefine::server;

#[derive(Parser)]
#[command(name = "coderefine", version)]
#[command(about = "CodeRefine - 代码评审与优化 API 服务")]
struct Cli {
    /// 配置文件路径
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 监听地址，覆盖配置文件
    #[arg(short, long)]
    addr: Option<String>,

    /// 详细输出
    #[arg(short, long)]
    verbose: bool,

    /// 日志格式
    #[arg(long, value_enum, default_value = "pretty")]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 初始化日志
    let logging = LoggingConfig::for_cli(cli.verbose, cli.log_format);
    init_logging(&logging).map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    // 加载配置
    let mut config = match cli.config {
        Some(path) => AppConfig::load_from_path(path),
        None => AppConfig::load(),
    }
    .context("Failed to load config")?;
    if let Some(addr) = cli.addr {
        config.server.addr = addr;
    }

    if !config.ai_enabled() {
        tracing::warn!(
            "{} 未设置，/review 将返回原始代码和静态分析建议",
            API_KEY_ENV
        );
    } else {
        tracing::info!(model = %config.ai.model_name, "AI 优化已启用");
    }

    server::run(&config)
        .await
        .context("Server terminated with an error")?;

    Ok(())
}
