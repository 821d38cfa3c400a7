use serde_json::json;
use tracing::debug;

use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{core_err, required_field, required_i64, required_str};
use crate::ipc::types::{AppState, Request};
use crate::{ops, query};

fn handle_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({ "students": state.roster.all(), "nextId": state.roster.next_id() }),
    )
}

fn handle_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let name = match required_field(req, "name") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let score = match required_field(req, "score") {
        Ok(v) => v,
        Err(e) => return e,
    };

    match ops::add_student(&mut state.roster, &name, &score) {
        Ok(student) => {
            debug!(id = student.id, "student created");
            ok(&req.id, json!({ "student": student }))
        }
        Err(e) => core_err(req, &e),
    }
}

/// Resolution half of update-by-lookup. The frontend shows the match
/// list when more than one comes back and re-submits with a concrete
/// id; this handler never mutates anything.
fn handle_lookup(state: &mut AppState, req: &Request) -> serde_json::Value {
    let lookup = match required_str(req, "query") {
        Ok(v) => v,
        Err(e) => return e,
    };

    match ops::resolve_lookup(&state.roster, &lookup) {
        Ok(matches) => {
            let ambiguous = matches.len() > 1;
            ok(&req.id, json!({ "matches": matches, "ambiguous": ambiguous }))
        }
        Err(e) => core_err(req, &e),
    }
}

fn handle_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    let id = match required_i64(req, "id") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let name = match required_field(req, "name") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let score = match required_field(req, "score") {
        Ok(v) => v,
        Err(e) => return e,
    };

    match ops::update_student(&mut state.roster, id, &name, &score) {
        Ok(student) => {
            debug!(id = student.id, "student updated");
            ok(&req.id, json!({ "student": student }))
        }
        Err(e) => core_err(req, &e),
    }
}

fn handle_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let id = match required_i64(req, "id") {
        Ok(v) => v,
        Err(e) => return e,
    };

    match ops::delete_student(&mut state.roster, id) {
        Ok(()) => {
            debug!(id, "student deleted");
            ok(&req.id, json!({ "deleted": id }))
        }
        Err(e) => core_err(req, &e),
    }
}

fn handle_search(state: &mut AppState, req: &Request) -> serde_json::Value {
    let raw_type = match required_str(req, "type") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let q = match required_str(req, "query") {
        Ok(v) => v,
        Err(e) => return e,
    };

    let Some(search_type) = query::SearchType::parse(&raw_type) else {
        return err(
            &req.id,
            "bad_params",
            "type must be one of: ID, Name",
            Some(json!({ "type": raw_type })),
        );
    };

    match query::search(&state.roster, search_type, &q) {
        Ok(matches) => ok(&req.id, json!({ "matches": matches })),
        Err(e) => core_err(req, &e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "students.list" => Some(handle_list(state, req)),
        "students.create" => Some(handle_create(state, req)),
        "students.lookup" => Some(handle_lookup(state, req)),
        "students.update" => Some(handle_update(state, req)),
        "students.delete" => Some(handle_delete(state, req)),
        "students.search" => Some(handle_search(state, req)),
        _ => None,
    }
}
