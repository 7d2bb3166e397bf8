//! Gateway 应用状态

use std::sync::Arc;

use crate::upstream::DogApi;

/// Gateway 应用状态
///
/// 只持有一个无状态的上游客户端，克隆后在并发请求间共享
#[derive(Clone)]
pub struct AppState {
    dogs: Arc<dyn DogApi>,
}

impl AppState {
    pub fn new(dogs: Arc<dyn DogApi>) -> Self {
        Self { dogs }
    }

    pub fn dogs(&self) -> &dyn DogApi {
        self.dogs.as_ref()
    }
}
