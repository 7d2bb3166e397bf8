//! HTTP 请求处理器

pub mod dogs;
pub mod health;
pub mod welcome;

pub use dogs::{handle_all_breeds, handle_breed_image, handle_multiple_images, handle_random_image};
pub use health::handle_health;
pub use welcome::handle_welcome;

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use thiserror::Error;

/// Handler 层错误，消息直接返回给调用方
#[derive(Debug, Error)]
pub enum ApiError {
    /// 上游 404（目前只用于品种查询）
    #[error("{0}")]
    NotFound(String),

    /// 输入参数不合法
    #[error("{0}")]
    InvalidInput(String),

    /// 上游不可用或返回了无法处理的响应
    #[error("{0}")]
    Upstream(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let error = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(error)).into_response()
    }
}
