use super::role::Role;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub id: i64,
    pub username: String,          // ⇔ profiles.username (UNIQUE)
    pub full_name: Option<String>, // ⇔ profiles.full_name
    pub role: Role,                // ⇔ profiles.role ('admin' | 'employee')
    pub created_at: String,
}

impl Profile {
    /// Name shown in grids and reports.
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.username)
    }
}
