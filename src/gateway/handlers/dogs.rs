//! Dog 图片与品种处理器
//!
//! 每个处理器只做最少的输入整理，然后调用一次上游，成功时原样返回上游响应体，
//! 失败时转换为 `{"error": ...}`。

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};

use crate::gateway::{handlers::ApiError, state::AppState};
use crate::upstream::{BreedCatalog, ImageListResult, ImageResult};

/// 未指定或无法解析 `count` 时使用的数量
pub const DEFAULT_COUNT: u32 = 3;

/// `count` 允许的最大值
pub const MAX_COUNT: u32 = 50;

/// GET /dogs/random
pub async fn handle_random_image(
    State(state): State<AppState>,
) -> Result<Json<ImageResult>, ApiError> {
    state
        .dogs()
        .fetch_random_image()
        .await
        .map(Json)
        .map_err(|_| {
            ApiError::Upstream("Failed to fetch dog image. Please try again later.".to_string())
        })
}

/// GET /dogs/breed/{breed}
pub async fn handle_breed_image(
    State(state): State<AppState>,
    breed: Result<Path<String>, PathRejection>,
) -> Result<Json<ImageResult>, ApiError> {
    let Path(breed) = breed.map_err(|e| {
        tracing::debug!(error = %e, "rejected breed path");
        ApiError::InvalidInput("Invalid breed parameter".to_string())
    })?;

    if breed.trim().is_empty() {
        return Err(ApiError::InvalidInput("Breed parameter is required".to_string()));
    }

    tracing::info!(breed = %breed, "breed image");

    match state.dogs().fetch_image_by_breed(&breed).await {
        Ok(image) => Ok(Json(image)),
        Err(e) if e.is_not_found() => Err(ApiError::NotFound(format!(
            "Breed '{}' not found. Please check the breed name and try again.",
            breed
        ))),
        Err(_) => Err(ApiError::Upstream(format!(
            "Failed to fetch {} dog image. Please try again later.",
            breed
        ))),
    }
}

/// GET /dogs/multiple?count=N
///
/// 查询串按键值对列表解析，`count` 重复出现时取第一个
pub async fn handle_multiple_images(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<ImageListResult>, ApiError> {
    let Query(pairs) = query.map_err(|e| {
        tracing::debug!(error = %e, "rejected query string");
        ApiError::InvalidInput("Invalid query string".to_string())
    })?;

    let raw_count = pairs
        .iter()
        .find(|(key, _)| key == "count")
        .map(|(_, value)| value.as_str());
    let count = parse_count(raw_count)?;

    tracing::info!(count, "multiple images");

    state
        .dogs()
        .fetch_multiple_images(count)
        .await
        .map(Json)
        .map_err(|_| {
            ApiError::Upstream(format!(
                "Failed to fetch {} dog images. Please try again later.",
                count
            ))
        })
}

/// GET /dogs/breeds
pub async fn handle_all_breeds(
    State(state): State<AppState>,
) -> Result<Json<BreedCatalog>, ApiError> {
    state
        .dogs()
        .fetch_all_breeds()
        .await
        .map(Json)
        .map_err(|_| {
            ApiError::Upstream("Failed to fetch dog breeds. Please try again later.".to_string())
        })
}

/// 解析 `count` 查询参数
///
/// 缺失、无法解析或为 0 时取 [`DEFAULT_COUNT`]；解析出的值不在 1..=50 时返回
/// [`ApiError::InvalidInput`]。
pub fn parse_count(raw: Option<&str>) -> Result<u32, ApiError> {
    match raw.and_then(parse_leading_int) {
        None | Some(0) => Ok(DEFAULT_COUNT),
        Some(n) => u32::try_from(n)
            .ok()
            .filter(|n| (1..=MAX_COUNT).contains(n))
            .ok_or_else(|| {
                ApiError::InvalidInput(format!("Count must be between 1 and {}", MAX_COUNT))
            }),
    }
}

/// 读取开头的整数（可带符号），忽略后面的非数字内容，例如 `"12abc"` -> 12
///
/// `0x`/`0X` 前缀按十六进制读取，例如 `"0x10"` -> 16
fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let (radix, digits) = match rest.get(..2) {
        Some("0x") | Some("0X") => (16, &rest[2..]),
        _ => (10, rest),
    };

    let end = digits
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    // 只剩溢出一种失败可能，按超出范围处理
    let magnitude = i64::from_str_radix(&digits[..end], radix).unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_or_garbage_count_defaults_to_three() {
        assert_eq!(parse_count(None).unwrap(), 3);
        assert_eq!(parse_count(Some("")).unwrap(), 3);
        assert_eq!(parse_count(Some("abc")).unwrap(), 3);
        assert_eq!(parse_count(Some("0")).unwrap(), 3);
        assert_eq!(parse_count(Some("-")).unwrap(), 3);
    }

    #[test]
    fn valid_counts_pass_through() {
        assert_eq!(parse_count(Some("1")).unwrap(), 1);
        assert_eq!(parse_count(Some("5")).unwrap(), 5);
        assert_eq!(parse_count(Some(" 50 ")).unwrap(), 50);
        assert_eq!(parse_count(Some("+7")).unwrap(), 7);
    }

    #[test]
    fn leading_digits_are_used() {
        assert_eq!(parse_count(Some("12abc")).unwrap(), 12);
        assert_eq!(parse_count(Some("4.9")).unwrap(), 4);
    }

    #[test]
    fn hex_prefix_is_read_as_hex() {
        assert_eq!(parse_count(Some("0x10")).unwrap(), 16);
        assert_eq!(parse_count(Some("0XaZ")).unwrap(), 10);
        assert_eq!(parse_count(Some("0x")).unwrap(), 3);
        assert!(parse_count(Some("0x40")).is_err());
    }

    #[test]
    fn out_of_range_is_rejected() {
        for raw in ["51", "-5", "1000", "99999999999999999999999"] {
            let err = parse_count(Some(raw)).unwrap_err();
            assert!(
                matches!(err, ApiError::InvalidInput(_)),
                "{raw} should be rejected"
            );
            assert_eq!(err.to_string(), "Count must be between 1 and 50");
        }
    }
}
