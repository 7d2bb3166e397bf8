//! 上游抽象层
//!
//! 定义访问 Dog API 的统一接口。Handler 只依赖 [`DogApi`] trait，
//! 真实客户端和测试替身都可以替换进来。

pub mod dog_ceo;

use anyhow::Result;
use async_trait::async_trait;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

use crate::config::Config;
pub use dog_ceo::DogCeoClient;

/// 上游统一响应信封：`{ "message": ..., "status": ... }`
///
/// 未知字段保存在 `extra` 里并原样序列化回去，响应体因此可以透传
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub message: T,
    pub status: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl<T> Envelope<T> {
    #[cfg(test)]
    pub fn success(message: T) -> Self {
        Self {
            message,
            status: "success".to_string(),
            extra: Map::new(),
        }
    }
}

/// 单张图片，`message` 为图片 URL
pub type ImageResult = Envelope<String>;

/// 多张图片，`message` 为按上游顺序排列的 URL 列表
pub type ImageListResult = Envelope<Vec<String>>;

/// 品种目录：品种名 -> 子品种列表（可能为空）
pub type BreedCatalog = Envelope<BTreeMap<String, Vec<String>>>;

/// 上游调用失败
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// 上游返回 404
    #[error("upstream resource not found: {url}")]
    NotFound { url: String },

    /// 上游返回其它非 2xx 状态
    #[error("upstream returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// 连接、TLS、超时等传输层错误
    #[error("request to upstream failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// 2xx 响应体不符合信封格式
    #[error("failed to decode upstream response: {0}")]
    Decode(#[source] reqwest::Error),
}

impl UpstreamError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, UpstreamError::NotFound { .. })
    }

    pub fn is_timeout(&self) -> bool {
        match self {
            UpstreamError::Transport(e) | UpstreamError::Decode(e) => e.is_timeout(),
            _ => false,
        }
    }
}

/// Dog API Trait - 四个上游操作，每次调用恰好发起一次出站请求
#[async_trait]
pub trait DogApi: Send + Sync {
    /// 上游基础地址（用于日志和健康检查）
    fn base_url(&self) -> &str;

    /// GET `{base}/breeds/image/random`
    async fn fetch_random_image(&self) -> Result<ImageResult, UpstreamError>;

    /// GET `{base}/breed/{breed}/images/random`，`breed` 原样嵌入路径
    async fn fetch_image_by_breed(&self, breed: &str) -> Result<ImageResult, UpstreamError>;

    /// GET `{base}/breeds/image/random/{count}`，不做任何截断
    async fn fetch_multiple_images(&self, count: u32) -> Result<ImageListResult, UpstreamError>;

    /// GET `{base}/breeds/list/all`
    async fn fetch_all_breeds(&self) -> Result<BreedCatalog, UpstreamError>;
}

/// 根据配置创建上游客户端
pub fn connect(config: &Config) -> Result<Arc<dyn DogApi>> {
    let client = DogCeoClient::new(config.upstream_base_url.clone(), config.upstream_timeout)?;
    tracing::info!(
        base_url = client.base_url(),
        timeout_secs = config.upstream_timeout.as_secs(),
        "Upstream client ready"
    );
    Ok(Arc::new(client))
}
