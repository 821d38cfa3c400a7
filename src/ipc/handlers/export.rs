use std::path::PathBuf;

use serde_json::json;
use tracing::info;

use crate::export::{self, ExportFormat};
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{core_err, required_i64, required_str};
use crate::ipc::types::{AppState, Request};

fn parse_format(req: &Request) -> Result<ExportFormat, serde_json::Value> {
    let raw = required_str(req, "format")?;
    ExportFormat::parse(&raw).ok_or_else(|| {
        err(
            &req.id,
            "bad_params",
            "format must be one of: txt, csv, png, jpg, pdf",
            Some(json!({ "format": raw })),
        )
    })
}

fn parse_path(req: &Request) -> Result<PathBuf, serde_json::Value> {
    required_str(req, "path").map(PathBuf::from)
}

fn exported(req: &Request, format: ExportFormat, path: &std::path::Path) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "path": path.to_string_lossy(),
            "format": format.as_str(),
            "exportedAt": chrono::Utc::now().to_rfc3339(),
        }),
    )
}

fn handle_single(state: &mut AppState, req: &Request) -> serde_json::Value {
    let id = match required_i64(req, "id") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let format = match parse_format(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let path = match parse_path(req) {
        Ok(v) => v,
        Err(e) => return e,
    };

    match export::export_single(&state.roster, id, format, &path, state.pdf.as_deref()) {
        Ok(()) => {
            info!(id, format = format.as_str(), "single export written");
            exported(req, format, &path)
        }
        Err(e) => core_err(req, &e),
    }
}

fn handle_all(state: &mut AppState, req: &Request) -> serde_json::Value {
    let format = match parse_format(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let path = match parse_path(req) {
        Ok(v) => v,
        Err(e) => return e,
    };

    match export::export_all(&state.roster, format, &path, state.pdf.as_deref()) {
        Ok(()) => {
            info!(
                count = state.roster.len(),
                format = format.as_str(),
                "full export written"
            );
            exported(req, format, &path)
        }
        Err(e) => core_err(req, &e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "export.single" => Some(handle_single(state, req)),
        "export.all" => Some(handle_all(state, req)),
        _ => None,
    }
}
