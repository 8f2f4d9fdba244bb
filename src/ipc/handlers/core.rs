use serde_json::json;

use crate::api::ApiClient;
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::session::Session;

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "connected": state.api.is_some(),
            "baseUrl": state.api.as_ref().map(|a| a.session().base_url().to_string()),
        }),
    )
}

fn handle_session_connect(state: &mut AppState, req: &Request) -> serde_json::Value {
    let base_url = req.params.get("baseUrl").and_then(|v| v.as_str());
    let token = req.params.get("token").and_then(|v| v.as_str());
    match Session::from_parts(base_url, token) {
        Ok(session) => {
            log::info!("session connected to {}", session.base_url());
            let api = ApiClient::new(session);
            let base = api.session().base_url().to_string();
            state.api = Some(api);
            ok(&req.id, json!({ "baseUrl": base }))
        }
        Err(e) => err(&req.id, "bad_params", e.to_string(), None),
    }
}

fn handle_session_status(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "connected": state.api.is_some(),
            "baseUrl": state.api.as_ref().map(|a| a.session().base_url().to_string()),
        }),
    )
}

fn handle_session_logout(state: &mut AppState, req: &Request) -> serde_json::Value {
    if state.api.take().is_some() {
        log::info!("session closed");
    }
    ok(&req.id, json!({ "connected": false }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "session.connect" => Some(handle_session_connect(state, req)),
        "session.status" => Some(handle_session_status(state, req)),
        "session.logout" => Some(handle_session_logout(state, req)),
        _ => None,
    }
}
