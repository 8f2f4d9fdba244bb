use serde::Deserialize;

use crate::api::ApiClient;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    /// Present once `session.connect` succeeded.
    pub api: Option<ApiClient>,
}
