use serde_json::json;
use tracing::info;

use crate::ipc::error::ok;
use crate::ipc::types::{AppState, Request};

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "students": state.roster.len(),
            "nextId": state.roster.next_id(),
            "pdfAvailable": state.pdf.is_some(),
        }),
    )
}

fn handle_seed_demo(state: &mut AppState, req: &Request) -> serde_json::Value {
    state.roster.seed_demo();
    info!(students = state.roster.len(), "seeded demo roster");
    ok(
        &req.id,
        json!({ "students": state.roster.all(), "nextId": state.roster.next_id() }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "roster.seedDemo" => Some(handle_seed_demo(state, req)),
        _ => None,
    }
}
