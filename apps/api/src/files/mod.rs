//! Document files in and out: text extraction, resume import and export.

pub mod export;
pub mod extract;
pub mod handlers;
pub mod import;
