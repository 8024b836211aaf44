//! Field revision history: per-field timelines over record revisions and
//! partial restore of a historical field value into an in-progress edit.
//!
//! This crate has **zero database dependencies**. Revisions arrive through
//! the [`source::RevisionSource`] trait; eligibility, schema and access are
//! injected by the caller.

pub mod config;
pub mod eligibility;
pub mod equality;
pub mod error;
pub mod field;
pub mod form;
pub mod restore;
pub mod retry;
pub mod revision;
pub mod schema;
pub mod session;
pub mod source;
pub mod timeline;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;
