//! Row structs and DTOs.
//!
//! Each submodule contains a `FromRow` struct matching the database row
//! and its conversion to the core type it persists.

pub mod revision;
pub mod settings;
