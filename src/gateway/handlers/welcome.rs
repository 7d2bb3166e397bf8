//! 欢迎信息处理器

use axum::Json;
use serde::Serialize;
use serde_json::{Map, Value};

/// GET /dogs 的固定响应
///
/// `endpoints` 和 `examples` 按路由声明顺序输出
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WelcomeInfo {
    pub message: &'static str,
    pub description: &'static str,
    pub version: &'static str,
    pub endpoints: Map<String, Value>,
    pub examples: Map<String, Value>,
    pub external_api: &'static str,
}

const DESCRIPTION: &str =
    "A beginner-friendly API that generates random dog images by fetching from the Dog API";

const ENDPOINTS: &[(&str, &str)] = &[
    ("GET /dogs/random", "Get a random dog image"),
    ("GET /dogs/breed/:breed", "Get a random image of a specific breed"),
    ("GET /dogs/multiple?count=5", "Get multiple random dog images"),
    ("GET /dogs/breeds", "Get list of all available dog breeds"),
];

const EXAMPLES: &[(&str, &str)] = &[
    ("Random dog", "/dogs/random"),
    ("Golden retriever", "/dogs/breed/golden-retriever"),
    ("5 random dogs", "/dogs/multiple?count=5"),
    ("All breeds", "/dogs/breeds"),
];

fn ordered(pairs: &[(&str, &str)]) -> Map<String, Value> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), Value::from(*v)))
        .collect()
}

impl WelcomeInfo {
    pub fn new() -> Self {
        Self {
            message: "Welcome to the Dog Image Generator API!",
            description: DESCRIPTION,
            version: env!("CARGO_PKG_VERSION"),
            endpoints: ordered(ENDPOINTS),
            examples: ordered(EXAMPLES),
            external_api: "Powered by Dog API (https://dog.ceo/dog-api/)",
        }
    }
}

impl Default for WelcomeInfo {
    fn default() -> Self {
        Self::new()
    }
}

/// GET /dogs
pub async fn handle_welcome() -> Json<WelcomeInfo> {
    Json(WelcomeInfo::new())
}
