//! Data models
//!
//! Shared between the designer, the HTTP client and the report backend
//! (via API). Lengths are millimeters, timestamps are UTC milliseconds and
//! persisted ids are `i64`.

pub mod data_source;
pub mod element;
pub mod geometry;
pub mod report;
pub mod report_template;
pub mod template;

// Re-exports
pub use data_source::*;
pub use element::*;
pub use geometry::*;
pub use report::*;
pub use report_template::*;
pub use template::*;
