//! Editor session
//!
//! Binds one template's editor state (name, flags, active data source and
//! the canvas) to the backend: load, save, preview and export. Failures are
//! reported as notices and leave the editor state untouched.

use report_client::ReportApi;
use shared::models::{
    DataSourceCatalog, ElementType, GenerateRequest, PreviewRequest, RenderedDocument,
    ReportFormat, ReportTemplate, ReportTemplateCreate, ReportTemplateUpdate, report_file_name,
};

use crate::access::{AccessPolicy, Permission};
use crate::canvas::{CanvasEngine, Region};
use crate::config::DesignerConfig;
use crate::error::{DesignerError, DesignerResult};
use crate::factory::create_element;
use crate::notification::{Notice, Notifier};
use crate::properties::PropertiesPanel;

/// Which template the editor is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateRoute {
    /// Not persisted yet
    New,
    Edit(i64),
}

impl TemplateRoute {
    pub fn id(&self) -> Option<i64> {
        match self {
            Self::New => None,
            Self::Edit(id) => Some(*id),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Self::New => "/report-templates/new".to_string(),
            Self::Edit(id) => format!("/report-templates/{}/edit", id),
        }
    }
}

/// What the host should do with its location after an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Stay,
    /// Swap the current history entry for this route
    Replace(TemplateRoute),
}

/// Editing session of one report template
pub struct EditorSession<A: ReportApi, P: AccessPolicy> {
    api: A,
    policy: P,
    config: DesignerConfig,
    catalog: DataSourceCatalog,
    route: TemplateRoute,
    name: String,
    description: Option<String>,
    is_public: bool,
    data_source: String,
    canvas: CanvasEngine,
    notifier: Notifier,
    /// Idempotency key of the create request, kept until it succeeds
    pending_create_key: Option<String>,
}

impl<A: ReportApi, P: AccessPolicy> EditorSession<A, P> {
    /// Session for a new, unsaved template
    pub fn new(api: A, policy: P, config: DesignerConfig) -> Self {
        Self {
            api,
            policy,
            catalog: DataSourceCatalog::builtin(),
            route: TemplateRoute::New,
            name: String::new(),
            description: None,
            is_public: false,
            data_source: config.default_data_source.clone(),
            canvas: CanvasEngine::new(),
            notifier: Notifier::new(config.notice_ttl_ms),
            pending_create_key: None,
            config,
        }
    }

    pub fn with_catalog(mut self, catalog: DataSourceCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    // ========== State ==========

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn route(&self) -> TemplateRoute {
        self.route
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description.filter(|d| !d.trim().is_empty());
    }

    pub fn is_public(&self) -> bool {
        self.is_public
    }

    pub fn set_public(&mut self, is_public: bool) {
        self.is_public = is_public;
    }

    /// Data source new tables and charts bind to, and previews/exports use
    pub fn data_source(&self) -> &str {
        &self.data_source
    }

    pub fn set_data_source(&mut self, key: &str) -> DesignerResult<()> {
        if !self.catalog.contains(key) {
            let err = DesignerError::Validation(format!("Unknown data source: {}", key));
            return self.fail(err);
        }
        self.data_source = key.to_string();
        Ok(())
    }

    pub fn catalog(&self) -> &DataSourceCatalog {
        &self.catalog
    }

    pub fn canvas(&self) -> &CanvasEngine {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut CanvasEngine {
        &mut self.canvas
    }

    /// Properties panel bound to the current selection
    pub fn panel(&mut self) -> PropertiesPanel<'_> {
        PropertiesPanel::new(&mut self.canvas, &self.catalog)
    }

    /// Notices still showing
    pub fn notices(&mut self) -> &[Notice] {
        self.notifier.active()
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut Notifier {
        &mut self.notifier
    }

    /// Toolbox action: create an element of `element_type` bound to the
    /// active data source and add it to `region`
    pub fn add_element(&mut self, element_type: ElementType, region: Region, x: f64, y: f64) -> String {
        let element = create_element(element_type, x, y, &self.data_source);
        self.canvas.add_element(region, element)
    }

    fn fail<T>(&mut self, err: DesignerError) -> DesignerResult<T> {
        tracing::warn!(error = %err, route = ?self.route, "Designer action failed");
        self.notifier.error(err.user_message());
        Err(err)
    }

    fn require(&mut self, permission: Permission) -> DesignerResult<()> {
        if self.policy.allows(permission) {
            Ok(())
        } else {
            self.fail(DesignerError::PermissionDenied(permission))
        }
    }

    // ========== Backend ==========

    /// Fetch template `id` and replace the whole editor state with it
    pub async fn load(&mut self, id: i64) -> DesignerResult<()> {
        self.require(Permission::ViewTemplates)?;
        let template = match self.api.get_template(id).await {
            Ok(t) => t,
            Err(e) => return self.fail(e.into()),
        };
        self.apply(template);
        tracing::info!(id, data_source = %self.data_source, "Report template loaded");
        Ok(())
    }

    fn apply(&mut self, template: ReportTemplate) {
        self.data_source = template
            .template
            .primary_data_source()
            .map(str::to_string)
            .unwrap_or_else(|| self.config.default_data_source.clone());
        self.route = TemplateRoute::Edit(template.id);
        self.name = template.name;
        self.description = template.description;
        self.is_public = template.is_public;
        self.canvas.load(template.template);
        self.pending_create_key = None;
    }

    /// Persist the current snapshot.
    ///
    /// A new template is created and the session moves to its edit route;
    /// the host should replace its history entry with the returned route.
    pub async fn save(&mut self) -> DesignerResult<Navigation> {
        let permission = match self.route {
            TemplateRoute::New => Permission::CreateTemplate,
            TemplateRoute::Edit(_) => Permission::UpdateTemplate,
        };
        self.require(permission)?;

        let name = self.name.trim().to_string();
        if name.is_empty() {
            return self.fail(DesignerError::Validation(
                "Template name is required".to_string(),
            ));
        }
        let template = self.canvas.snapshot();
        if let Err(msg) = template.validate() {
            return self.fail(DesignerError::Validation(msg));
        }

        match self.route {
            TemplateRoute::Edit(id) => {
                let update = ReportTemplateUpdate {
                    name: Some(name),
                    description: Some(self.description.clone()),
                    template: Some(template),
                    is_public: Some(self.is_public),
                    is_default: None,
                };
                if let Err(e) = self.api.update_template(id, &update).await {
                    return self.fail(e.into());
                }
                self.notifier.success("Template saved");
                Ok(Navigation::Stay)
            }
            TemplateRoute::New => {
                let key = self
                    .pending_create_key
                    .get_or_insert_with(|| uuid::Uuid::new_v4().to_string())
                    .clone();
                let create = ReportTemplateCreate {
                    name,
                    description: self.description.clone(),
                    template,
                    is_public: self.is_public,
                };
                let created = match self.api.create_template(&create, Some(&key)).await {
                    Ok(t) => t,
                    Err(e) => return self.fail(e.into()),
                };
                self.pending_create_key = None;
                self.route = TemplateRoute::Edit(created.id);
                self.notifier.success("Template created");
                Ok(Navigation::Replace(self.route))
            }
        }
    }

    /// Render the current, possibly unsaved, configuration
    pub async fn preview(&mut self) -> DesignerResult<RenderedDocument> {
        self.require(Permission::ViewTemplates)?;
        let request = PreviewRequest {
            template: self.canvas.snapshot(),
            data_source: self.data_source.clone(),
            row_limit: self.config.preview_row_limit,
        };
        match self.api.preview(&request).await {
            Ok(doc) => Ok(doc),
            Err(e) => self.fail(e.into()),
        }
    }

    /// Generate a downloadable report from the saved template
    pub async fn export(&mut self, format: ReportFormat) -> DesignerResult<RenderedDocument> {
        self.require(Permission::ExportReport)?;
        let Some(template_id) = self.route.id() else {
            return self.fail(DesignerError::NotSaved("exporting"));
        };
        let request = GenerateRequest {
            template_id,
            data_source: self.data_source.clone(),
            format,
            file_name: report_file_name(&self.name, format),
            filters: Vec::new(),
            sorting: Vec::new(),
            overrides: None,
        };
        match self.api.generate(&request).await {
            Ok(doc) => {
                tracing::info!(template_id, file = %request.file_name, "Report exported");
                Ok(doc)
            }
            Err(e) => self.fail(e.into()),
        }
    }
}
