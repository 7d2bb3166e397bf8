//! Dog CEO 上游客户端
//!
//! 基于 reqwest 的 [`DogApi`] 实现，基础地址由构造参数注入

use anyhow::Result;
use async_trait::async_trait;
use http::StatusCode;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::upstream::{BreedCatalog, DogApi, ImageListResult, ImageResult, UpstreamError};
use crate::utils::build_http_client;

pub struct DogCeoClient {
    base_url: String,
    http: Client,
}

impl DogCeoClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            base_url,
            http: build_http_client(timeout)?,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// 发起一次 GET 并解码信封，失败时记录日志后返回
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, UpstreamError> {
        let url = self.url(path);
        let result = self.send(&url).await;

        match &result {
            Ok(_) => tracing::debug!(%url, "upstream ok"),
            Err(e) => tracing::warn!(
                %url,
                error = %e,
                timeout = e.is_timeout(),
                "upstream call failed"
            ),
        }

        result
    }

    async fn send<T: DeserializeOwned>(&self, url: &str) -> Result<T, UpstreamError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(UpstreamError::Transport)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(UpstreamError::NotFound {
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status { status, body });
        }

        response.json().await.map_err(UpstreamError::Decode)
    }
}

#[async_trait]
impl DogApi for DogCeoClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch_random_image(&self) -> Result<ImageResult, UpstreamError> {
        self.get_json("/breeds/image/random").await
    }

    async fn fetch_image_by_breed(&self, breed: &str) -> Result<ImageResult, UpstreamError> {
        self.get_json(&format!("/breed/{}/images/random", breed)).await
    }

    async fn fetch_multiple_images(&self, count: u32) -> Result<ImageListResult, UpstreamError> {
        self.get_json(&format!("/breeds/image/random/{}", count)).await
    }

    async fn fetch_all_breeds(&self) -> Result<BreedCatalog, UpstreamError> {
        self.get_json("/breeds/list/all").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const IMAGE_URL: &str = "https://images.dog.ceo/breeds/hound-afghan/n02088094_1003.jpg";

    fn client_for(server: &MockServer) -> DogCeoClient {
        DogCeoClient::new(server.uri(), Duration::from_secs(2)).unwrap()
    }

    #[tokio::test]
    async fn random_image_returns_body_unchanged() {
        let server = MockServer::start().await;
        let body = json!({ "message": IMAGE_URL, "status": "success" });
        Mock::given(method("GET"))
            .and(path("/breeds/image/random"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
            .expect(1)
            .mount(&server)
            .await;

        let image = assert_ok!(client_for(&server).fetch_random_image().await);
        assert_eq!(serde_json::to_value(&image).unwrap(), body);
    }

    #[tokio::test]
    async fn breed_is_embedded_in_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/breed/hound/images/random"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "message": IMAGE_URL, "status": "success" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let image = assert_ok!(client_for(&server).fetch_image_by_breed("hound").await);
        assert_eq!(image.message, IMAGE_URL);
    }

    #[tokio::test]
    async fn breed_404_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/breed/unicorn/images/random"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "status": "error",
                "message": "Breed not found (main breed does not exist)",
                "code": 404
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = assert_err!(client_for(&server).fetch_image_by_breed("unicorn").await);
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn multiple_images_requests_exact_count() {
        let server = MockServer::start().await;
        let urls: Vec<String> = (0..5).map(|i| format!("{IMAGE_URL}?{i}")).collect();
        Mock::given(method("GET"))
            .and(path("/breeds/image/random/5"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "message": urls, "status": "success" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let images = assert_ok!(client_for(&server).fetch_multiple_images(5).await);
        assert_eq!(images.message.len(), 5);
        assert_eq!(images.message, urls);
    }

    #[tokio::test]
    async fn all_breeds_returns_catalog() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/breeds/list/all"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": { "husky": [], "poodle": ["standard", "miniature", "toy"] },
                "status": "success"
            })))
            .expect(2)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let first = assert_ok!(client.fetch_all_breeds().await);
        let second = assert_ok!(client.fetch_all_breeds().await);
        assert_eq!(first, second);
        assert_eq!(first.message["poodle"].len(), 3);
    }

    #[tokio::test]
    async fn server_error_is_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/breeds/list/all"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let err = assert_err!(client_for(&server).fetch_all_breeds().await);
        match err {
            UpstreamError::Status { status, body } => {
                assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
                assert_eq!(body, "maintenance");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/breeds/image/random"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = assert_err!(client_for(&server).fetch_random_image().await);
        assert!(matches!(err, UpstreamError::Decode(_)));
    }

    #[tokio::test]
    async fn slow_upstream_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/breeds/image/random"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "message": IMAGE_URL, "status": "success" }))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client = DogCeoClient::new(server.uri(), Duration::from_millis(100)).unwrap();
        let err = assert_err!(client.fetch_random_image().await);
        assert!(err.is_timeout());
    }

    #[tokio::test]
    async fn unreachable_upstream_is_transport_error() {
        // 端口 9 (discard) 上通常没有 HTTP 服务
        let client = DogCeoClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        let err = assert_err!(client.fetch_random_image().await);
        assert!(matches!(err, UpstreamError::Transport(_)));
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client =
            DogCeoClient::new("http://localhost:1234/api/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:1234/api");
        assert_eq!(
            client.url("/breeds/list/all"),
            "http://localhost:1234/api/breeds/list/all"
        );
    }
}
