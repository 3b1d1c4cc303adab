//! Shared types for the report template designer
//!
//! Data contracts exchanged between the designer, the HTTP client and the
//! report backend: the template configuration tree, the persisted template
//! entity, generation requests, the data-source catalog and the unified
//! error codes.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use models::{Element, ElementContent, ElementType, ReportTemplate, TemplateConfig};
