//! Permission checks
//!
//! The designer never resolves permissions itself: the host hands in an
//! [`AccessPolicy`] built from the signed-in user's flat permission codes.

use std::collections::HashSet;
use std::fmt;

/// Actions gated by the access policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    ViewTemplates,
    CreateTemplate,
    UpdateTemplate,
    DeleteTemplate,
    ExportReport,
}

impl Permission {
    pub const ALL: [Permission; 5] = [
        Self::ViewTemplates,
        Self::CreateTemplate,
        Self::UpdateTemplate,
        Self::DeleteTemplate,
        Self::ExportReport,
    ];

    /// Permission code as issued by the backend
    pub const fn code(&self) -> &'static str {
        match self {
            Self::ViewTemplates => "report_templates.view",
            Self::CreateTemplate => "report_templates.create",
            Self::UpdateTemplate => "report_templates.update",
            Self::DeleteTemplate => "report_templates.delete",
            Self::ExportReport => "reports.export",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Authorization capability consumed by the designer
pub trait AccessPolicy: Send + Sync {
    fn allows(&self, permission: Permission) -> bool;
}

/// Policy for trusted tooling (CLI); everything is allowed
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl AccessPolicy for AllowAll {
    fn allows(&self, _permission: Permission) -> bool {
        true
    }
}

/// Flat set of permission codes
#[derive(Debug, Clone, Default)]
pub struct PermissionSet {
    codes: HashSet<String>,
}

impl PermissionSet {
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            codes: codes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn with(mut self, permission: Permission) -> Self {
        self.codes.insert(permission.code().to_string());
        self
    }
}

impl AccessPolicy for PermissionSet {
    fn allows(&self, permission: Permission) -> bool {
        self.codes.contains(permission.code())
    }
}
