use crate::error::RosterError;
use crate::query;
use crate::roster::{Roster, Student};

/// Shared form validation for add and update: name must be non-empty
/// after trimming, score must parse as a float. Range is deliberately
/// not enforced (the 0-100 hint is advisory only).
fn validate(name: &str, score: &str) -> Result<(String, f64), RosterError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(RosterError::validation("enter name and score"));
    }
    let score: f64 = score
        .trim()
        .parse()
        .map_err(|_| RosterError::validation("invalid score number"))?;
    Ok((name.to_string(), score))
}

pub fn add_student(roster: &mut Roster, name: &str, score: &str) -> Result<Student, RosterError> {
    let (name, score) = validate(name, score)?;
    Ok(roster.add(name, score))
}

/// Resolution half of update-by-lookup. Returns every candidate; the
/// caller must obtain an explicit single choice before calling
/// `update_student` when more than one comes back.
pub fn resolve_lookup<'a>(
    roster: &'a Roster,
    lookup: &str,
) -> Result<Vec<&'a Student>, RosterError> {
    let lookup = lookup.trim();
    if lookup.is_empty() {
        return Err(RosterError::validation("empty lookup"));
    }
    let found = query::find_by_id_or_name(roster, lookup);
    if found.is_empty() {
        return Err(RosterError::not_found(format!(
            "no student found for: {}",
            lookup
        )));
    }
    Ok(found)
}

/// Applies new name/score to the student with `id`. Validation runs
/// before any field is touched, so a rejected update leaves the target
/// exactly as it was. The id itself is immutable.
pub fn update_student(
    roster: &mut Roster,
    id: i64,
    name: &str,
    score: &str,
) -> Result<Student, RosterError> {
    let (name, score) = validate(name, score)?;
    let student = roster
        .find_by_id_mut(id)
        .ok_or_else(|| RosterError::not_found(format!("student {} not found", id)))?;
    student.name = name;
    student.score = score;
    Ok(student.clone())
}

/// Delete by an explicitly selected id. A stale selection (id already
/// gone) is reported, not ignored, so the frontend can refresh.
pub fn delete_student(roster: &mut Roster, id: i64) -> Result<(), RosterError> {
    if roster.delete(id) {
        Ok(())
    } else {
        Err(RosterError::not_found(format!("student {} not found", id)))
    }
}
