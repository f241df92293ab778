pub mod entry;
pub mod hours;
pub mod profile;
pub mod project;
pub mod role;
