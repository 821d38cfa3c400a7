use serde::Serialize;

use crate::error::RosterError;
use crate::roster::{Roster, Student};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchType {
    Id,
    Name,
}

impl SearchType {
    pub fn parse(raw: &str) -> Option<SearchType> {
        match raw.to_ascii_lowercase().as_str() {
            "id" => Some(SearchType::Id),
            "name" => Some(SearchType::Name),
            _ => None,
        }
    }
}

/// Aggregates over a set of students. `highest`/`lowest` carry the
/// whole record because exports print id and name next to the score.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub count: usize,
    pub average: f64,
    pub highest: Student,
    pub lowest: Student,
}

/// Dual-mode resolve used by both update-by-lookup and search: an
/// integer query matches on id (0 or 1 hits), anything else is a
/// case-insensitive substring match on names, in store order.
pub fn find_by_id_or_name<'a>(roster: &'a Roster, query: &str) -> Vec<&'a Student> {
    let query = query.trim();
    if let Ok(id) = query.parse::<i64>() {
        return roster.all().iter().filter(|s| s.id == id).collect();
    }
    let needle = query.to_lowercase();
    roster
        .all()
        .iter()
        .filter(|s| s.name.to_lowercase().contains(&needle))
        .collect()
}

pub fn search<'a>(
    roster: &'a Roster,
    search_type: SearchType,
    query: &str,
) -> Result<Vec<&'a Student>, RosterError> {
    let query = query.trim();
    match search_type {
        SearchType::Id => {
            let id: i64 = query
                .parse()
                .map_err(|_| RosterError::InvalidQuery("ID must be numeric".to_string()))?;
            Ok(roster.all().iter().filter(|s| s.id == id).collect())
        }
        SearchType::Name => {
            let needle = query.to_lowercase();
            Ok(roster
                .all()
                .iter()
                .filter(|s| s.name.to_lowercase().contains(&needle))
                .collect())
        }
    }
}

/// Count, mean, and extreme records. On tied scores the first student
/// in store order wins, so repeated calls over the same roster always
/// name the same highest/lowest.
pub fn aggregate(students: &[Student]) -> Result<Summary, RosterError> {
    let first = students.first().ok_or(RosterError::EmptyInput)?;

    let mut sum = 0.0;
    let mut highest = first;
    let mut lowest = first;
    for s in students {
        sum += s.score;
        if s.score > highest.score {
            highest = s;
        }
        if s.score < lowest.score {
            lowest = s;
        }
    }

    Ok(Summary {
        count: students.len(),
        average: sum / students.len() as f64,
        highest: highest.clone(),
        lowest: lowest.clone(),
    })
}
