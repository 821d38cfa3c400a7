use serde::Deserialize;

use crate::pdf::{self, PdfRenderer};
use crate::roster::Roster;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub roster: Roster,
    /// Probed once at startup; `None` disables PDF export for the
    /// whole process.
    pub pdf: Option<Box<dyn PdfRenderer>>,
}

impl AppState {
    pub fn new() -> Self {
        AppState {
            roster: Roster::new(),
            pdf: pdf::probe(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        AppState::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_starts_with_an_empty_roster() {
        let state = AppState::default();
        assert!(state.roster.is_empty());
        assert_eq!(state.roster.next_id(), crate::roster::FIRST_ID);
    }
}
