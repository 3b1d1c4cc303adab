//! Data-source catalog
//!
//! Static registry of the backend datasets a table or chart can bind to.

use serde::{Deserialize, Serialize};

/// Data source used when a template has no table yet
pub const DEFAULT_DATA_SOURCE: &str = "incidents";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Date,
    Datetime,
    Boolean,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldDescriptor {
    pub field: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataSource {
    pub key: String,
    pub label: String,
    pub fields: Vec<FieldDescriptor>,
}

impl DataSource {
    pub fn field(&self, field: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.field == field)
    }
}

/// Read-only data-source registry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataSourceCatalog {
    sources: Vec<DataSource>,
}

impl DataSourceCatalog {
    pub fn new(sources: Vec<DataSource>) -> Self {
        Self { sources }
    }

    pub fn get(&self, key: &str) -> Option<&DataSource> {
        self.sources.iter().find(|s| s.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn sources(&self) -> &[DataSource] {
        &self.sources
    }

    /// Field descriptor of `field` in data source `key`
    pub fn field(&self, key: &str, field: &str) -> Option<&FieldDescriptor> {
        self.get(key).and_then(|s| s.field(field))
    }

    /// Datasets exposed by the incident management backend
    pub fn builtin() -> Self {
        use FieldType as T;

        Self::new(vec![
            workflow_source("incidents", "Incidents", "incident"),
            workflow_source("requests", "Requests", "request"),
            workflow_source("queries", "Queries", "query"),
            workflow_source("complaints", "Complaints", "complaint"),
            source(
                "users",
                "Users",
                &[
                    ("username", "Username", T::String),
                    ("full_name", "Full Name", T::String),
                    ("email", "Email", T::String),
                    ("role", "Role", T::String),
                    ("department", "Department", T::String),
                    ("is_active", "Active", T::Boolean),
                    ("last_login", "Last Login", T::Datetime),
                    ("created_at", "Created At", T::Datetime),
                ],
            ),
            source(
                "audit_logs",
                "Audit Logs",
                &[
                    ("action", "Action", T::String),
                    ("resource", "Resource", T::String),
                    ("resource_id", "Resource ID", T::Number),
                    ("user_name", "User", T::String),
                    ("ip_address", "IP Address", T::String),
                    ("created_at", "Timestamp", T::Datetime),
                ],
            ),
        ])
    }
}

fn descriptor(field: impl Into<String>, label: &str, field_type: FieldType) -> FieldDescriptor {
    FieldDescriptor {
        field: field.into(),
        label: label.to_string(),
        field_type,
    }
}

fn source(key: &str, label: &str, fields: &[(&str, &str, FieldType)]) -> DataSource {
    DataSource {
        key: key.to_string(),
        label: label.to_string(),
        fields: fields
            .iter()
            .map(|(field, label, field_type)| descriptor(*field, label, *field_type))
            .collect(),
    }
}

/// Incidents, requests, queries and complaints share one workflow shape
fn workflow_source(key: &str, label: &str, prefix: &str) -> DataSource {
    use FieldType as T;

    let mut fields = vec![descriptor(format!("{prefix}_number"), "Number", T::String)];
    fields.extend(
        [
            ("title", "Title", T::String),
            ("status", "Status", T::String),
            ("priority", "Priority", T::String),
            ("classification", "Classification", T::String),
            ("department", "Department", T::String),
            ("location", "Location", T::String),
            ("reported_by", "Reported By", T::String),
            ("assigned_to", "Assigned To", T::String),
            ("created_at", "Created At", T::Datetime),
            ("due_date", "Due Date", T::Date),
            ("resolved_at", "Resolved At", T::Datetime),
        ]
        .into_iter()
        .map(|(field, label, field_type)| descriptor(field, label, field_type)),
    );
    DataSource {
        key: key.to_string(),
        label: label.to_string(),
        fields,
    }
}
