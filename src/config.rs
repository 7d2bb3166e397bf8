//! 应用配置模块
//!
//! 负责从环境变量加载应用配置，包括：
//! - 服务器监听地址和端口
//! - 上游 Dog API 的基础地址
//! - 上游请求和整体请求的超时时间

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::time::Duration;

/// 上游 Dog API 默认地址
pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://dog.ceo/api";

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// 应用配置
///
/// 包含服务器运行所需的所有配置项
#[derive(Debug, Clone)]
pub struct Config {
    /// 服务器监听地址（如 "0.0.0.0" 或 "127.0.0.1"）
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
    /// 上游 Dog API 基础地址（不带结尾的 `/`）
    pub upstream_base_url: String,
    /// 单次上游调用的超时时间
    pub upstream_timeout: Duration,
    /// 整个入站请求的超时时间
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            upstream_base_url: DEFAULT_UPSTREAM_BASE_URL.to_string(),
            upstream_timeout: Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// # 环境变量
    ///
    /// - `DOG_API_HOST`: 服务器监听地址（默认: "0.0.0.0"）
    /// - `PORT`: 服务器监听端口（默认: 3000）
    /// - `DOG_API_BASE_URL`: 上游地址（默认: "https://dog.ceo/api"）
    /// - `DOG_API_TIMEOUT_SECS`: 上游调用超时秒数（默认: 10）
    /// - `DOG_API_REQUEST_TIMEOUT_SECS`: 入站请求超时秒数（默认: 30）
    ///
    /// # 错误
    ///
    /// - 如果 `PORT` 不是有效的端口号
    /// - 如果超时值不是正整数
    /// - 如果入站请求超时不大于上游调用超时
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源加载配置，`from_env` 的实际实现
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let host = lookup("DOG_API_HOST").unwrap_or(defaults.host);

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .context("PORT must be a valid port number")?,
            None => defaults.port,
        };

        let upstream_base_url = lookup("DOG_API_BASE_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .unwrap_or(defaults.upstream_base_url);

        let upstream_timeout = parse_secs(&lookup, "DOG_API_TIMEOUT_SECS")?
            .unwrap_or(defaults.upstream_timeout);

        let request_timeout = parse_secs(&lookup, "DOG_API_REQUEST_TIMEOUT_SECS")?
            .unwrap_or(defaults.request_timeout);

        // 入站超时必须长于上游超时
        if request_timeout <= upstream_timeout {
            anyhow::bail!(
                "DOG_API_REQUEST_TIMEOUT_SECS ({}) must be greater than DOG_API_TIMEOUT_SECS ({})",
                request_timeout.as_secs(),
                upstream_timeout.as_secs()
            );
        }

        Ok(Self {
            host,
            port,
            upstream_base_url,
            upstream_timeout,
            request_timeout,
        })
    }

    /// 服务器监听地址
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid listen address {}:{}", self.host, self.port))
    }

    /// 本地访问服务器的基础 URL（`0.0.0.0` 替换为回环地址）
    pub fn local_base_url(&self) -> String {
        let host = match self.host.as_str() {
            "0.0.0.0" | "::" => "127.0.0.1",
            other => other,
        };
        format!("http://{}:{}", host, self.port)
    }
}

fn parse_secs(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<Duration>> {
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };

    let secs: u64 = raw
        .trim()
        .parse()
        .with_context(|| format!("{key} must be a whole number of seconds"))?;
    if secs == 0 {
        anyhow::bail!("{key} must be greater than zero");
    }

    Ok(Some(Duration::from_secs(secs)))
}
