//! Dog Image API - Dog API 的轻量 HTTP 门面
//!
//! 将客户端请求转发到公开的 Dog API（https://dog.ceo/dog-api/），
//! 并把结果整理成固定的响应信封。
//!
//! # 功能特性
//!
//! - 随机图片、指定品种图片、批量图片、品种目录四个数据端点
//! - 上游响应体原样透传，失败统一转换为 `{"error": ...}`
//! - 上游地址和超时可通过环境变量配置
//!
//! # 命令行接口
//!
//! - `serve`: 启动 API 服务器（默认）
//! - `test`: 向本地服务器发送测试请求

mod commands;
mod config;
mod gateway;
mod upstream;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Dog Image API CLI
#[derive(Parser)]
#[command(name = "dog-image-api")]
#[command(about = "HTTP facade for random dog images", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// 可用的命令
#[derive(Subcommand)]
enum Commands {
    /// 启动 API 服务器
    Serve,
    /// 向本地服务器发送测试请求
    Test {
        /// 要请求的路径（可重复），默认探测所有 /dogs 端点
        #[arg(short, long = "path")]
        paths: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // 加载 .env 文件（如果存在）
    if let Ok(dotenv_path) = std::env::var("DOG_API_ENV_FILE") {
        dotenvy::from_path(&dotenv_path).ok();
    } else {
        dotenvy::dotenv().ok();
    }

    // 初始化日志系统
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dog_image_api=info,tower_http=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false),
        )
        .init();

    // 解析命令行参数和配置
    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => commands::serve_command(config).await,
        Commands::Test { paths } => commands::test_command(config, paths).await,
    }
}
