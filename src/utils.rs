use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;

/// 是否禁用 TLS 验证（用于调试 mitmproxy 等场景）
pub fn should_disable_tls_verify() -> bool {
    std::env::var("DOG_API_DISABLE_TLS_VERIFY")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// 服务自身的 user-agent
pub fn user_agent() -> String {
    format!("dog-image-api/{}", env!("CARGO_PKG_VERSION"))
}

/// 构建出站 HTTP 客户端
///
/// 客户端内部是连接池，克隆和跨请求并发复用都不需要额外同步
pub fn build_http_client(timeout: Duration) -> Result<Client> {
    let mut builder = Client::builder()
        .timeout(timeout)
        .user_agent(user_agent())
        .pool_max_idle_per_host(10);

    if should_disable_tls_verify() {
        tracing::warn!("TLS certificate verification is DISABLED - for debugging only!");
        builder = builder.danger_accept_invalid_certs(true);
    }

    builder.build().context("Failed to create HTTP client")
}
