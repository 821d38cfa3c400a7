use serde_json::json;

use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{core_err, optional_str};
use crate::ipc::types::{AppState, Request};
use crate::query;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AggregateKind {
    Average,
    Highest,
    Lowest,
}

impl AggregateKind {
    fn parse(raw: &str) -> Option<AggregateKind> {
        match raw.to_ascii_lowercase().as_str() {
            "average" => Some(AggregateKind::Average),
            "highest" => Some(AggregateKind::Highest),
            "lowest" => Some(AggregateKind::Lowest),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            AggregateKind::Average => "Average",
            AggregateKind::Highest => "Highest",
            AggregateKind::Lowest => "Lowest",
        }
    }
}

/// Full-roster report: every row plus the summary block, and when the
/// frontend picked one aggregate in the combo box, an echo of just
/// that value.
fn handle_summary(state: &mut AppState, req: &Request) -> serde_json::Value {
    let kind = match optional_str(req, "aggregate") {
        Some(raw) => match AggregateKind::parse(&raw) {
            Some(k) => Some(k),
            None => {
                return err(
                    &req.id,
                    "bad_params",
                    "aggregate must be one of: Average, Highest, Lowest",
                    Some(json!({ "aggregate": raw })),
                )
            }
        },
        None => None,
    };

    let summary = match query::aggregate(state.roster.all()) {
        Ok(s) => s,
        Err(e) => return core_err(req, &e),
    };

    let selected = kind.map(|k| match k {
        AggregateKind::Average => json!({
            "aggregate": k.as_str(),
            "score": summary.average,
        }),
        AggregateKind::Highest => json!({
            "aggregate": k.as_str(),
            "score": summary.highest.score,
            "student": summary.highest.clone(),
        }),
        AggregateKind::Lowest => json!({
            "aggregate": k.as_str(),
            "score": summary.lowest.score,
            "student": summary.lowest.clone(),
        }),
    });

    let mut result = json!({
        "students": state.roster.all(),
        "summary": summary,
    });
    if let Some(sel) = selected {
        result["selected"] = sel;
    }
    ok(&req.id, result)
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "reports.summary" => Some(handle_summary(state, req)),
        _ => None,
    }
}
