use serde_json::json;

use crate::api::ApiClient;
use crate::ipc::helpers::{with_api, HandlerErr};
use crate::ipc::types::{AppState, Request};

fn list(api: &ApiClient, _params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let instructors = api.list_instructors()?;
    Ok(json!({ "instructors": instructors }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "instructors.list" => Some(with_api(state, req, list)),
        _ => None,
    }
}
