use serde::Serialize;

/// First id handed out by a fresh roster. Display ids in the original
/// tracker start at 101, not 1.
pub const FIRST_ID: i64 = 101;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub score: f64,
}

/// In-memory student store. Insertion order is display order; ids are
/// allocated monotonically and never reused, so `next_id` is always
/// greater than every id ever assigned.
#[derive(Debug)]
pub struct Roster {
    students: Vec<Student>,
    next_id: i64,
}

impl Default for Roster {
    fn default() -> Self {
        Roster::new()
    }
}

impl Roster {
    pub fn new() -> Self {
        Roster {
            students: Vec::new(),
            next_id: FIRST_ID,
        }
    }

    pub fn add(&mut self, name: String, score: f64) -> Student {
        let id = self.next_id;
        self.next_id += 1;
        let student = Student { id, name, score };
        self.students.push(student.clone());
        student
    }

    /// Removes the student with `id` if present. A miss is not an
    /// error at this layer; callers that care report `not_found`.
    pub fn delete(&mut self, id: i64) -> bool {
        let before = self.students.len();
        self.students.retain(|s| s.id != id);
        self.students.len() != before
    }

    pub fn find_by_id(&self, id: i64) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    pub fn find_by_id_mut(&mut self, id: i64) -> Option<&mut Student> {
        self.students.iter_mut().find(|s| s.id == id)
    }

    pub fn all(&self) -> &[Student] {
        &self.students
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    pub fn next_id(&self) -> i64 {
        self.next_id
    }

    /// Sample records from the original tracker. Appends with fresh
    /// ids; calling twice seeds six students.
    pub fn seed_demo(&mut self) {
        self.add("rahul".to_string(), 80.0);
        self.add("sam".to_string(), 92.0);
        self.add("anita".to_string(), 75.0);
    }
}
