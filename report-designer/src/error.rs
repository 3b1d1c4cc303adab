//! Designer error types

use report_client::ClientError;
use shared::models::ElementType;
use thiserror::Error;

use crate::access::Permission;

/// Errors surfaced by the designer
#[derive(Debug, Error)]
pub enum DesignerError {
    /// Input rejected before any network call
    #[error("Validation error: {0}")]
    Validation(String),

    /// Action requires a saved template
    #[error("Save the template before {0}")]
    NotSaved(&'static str),

    #[error("Permission denied: {}", .0.code())]
    PermissionDenied(Permission),

    #[error("No element selected")]
    NoSelection,

    #[error("Element {0} is locked")]
    ElementLocked(String),

    /// Content edit would change the element's type
    #[error("Content of type {found} cannot replace {expected}")]
    ContentMismatch {
        expected: ElementType,
        found: ElementType,
    },

    #[error("Column {0} is already present")]
    DuplicateColumn(String),

    #[error("Field {field} is not part of data source {data_source}")]
    UnknownField { data_source: String, field: String },

    #[error("Column index {index} out of range (len {len})")]
    ColumnOutOfRange { index: usize, len: usize },

    /// Edit does not apply to the selected element's content
    #[error("{0}")]
    NotApplicable(String),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DesignerError {
    /// Text shown in the transient notice
    pub fn user_message(&self) -> String {
        match self {
            Self::Client(e) => e.user_message(),
            Self::NotSaved(action) => format!("Please save the template before {action}"),
            Self::PermissionDenied(_) => "You do not have permission to do this".to_string(),
            Self::Validation(msg) | Self::NotApplicable(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

/// Result type for designer operations
pub type DesignerResult<T> = Result<T, DesignerError>;
