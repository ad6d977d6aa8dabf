//! Data models for Bookshelf

pub mod book;
pub mod import_report;
pub mod session;

// Re-export commonly used types
pub use book::{Book, BookFields, BookFilter, BookForm, BookQuery, YearParsing};
pub use import_report::ImportSummary;
pub use session::SessionClaims;
