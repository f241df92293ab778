use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub code: Option<String>,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: String,
}

/// A task-code-level subdivision of a project; hours are logged against it.
#[derive(Debug, Clone, Serialize)]
pub struct SubProject {
    pub id: i64,
    pub project_id: i64,
    pub code: String,
    pub description: Option<String>,
    pub is_active: bool,
}

impl SubProject {
    /// Grid label: description when present, code otherwise.
    pub fn label(&self) -> &str {
        self.description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or(&self.code)
    }
}
