//! Typed report backend API
//!
//! [`ReportApi`] is the seam the designer talks through; [`ReportClient`]
//! implements it over any [`HttpClient`].

use async_trait::async_trait;
use shared::models::{
    GenerateRequest, PaginatedTemplates, PreviewRequest, RenderedDocument, ReportTemplate,
    ReportTemplateCreate, ReportTemplateUpdate, TemplateListQuery,
};

use crate::http::{HttpClient, NetworkHttpClient};
use crate::{ClientConfig, ClientResult};

const TEMPLATES: &str = "report-templates";

/// Template store and report generation calls
#[async_trait]
pub trait ReportApi: Send + Sync {
    async fn get_template(&self, id: i64) -> ClientResult<ReportTemplate>;

    async fn list_templates(&self, query: &TemplateListQuery) -> ClientResult<PaginatedTemplates>;

    /// Create a template; `idempotency_key` lets the backend drop a repeated submit
    async fn create_template(
        &self,
        payload: &ReportTemplateCreate,
        idempotency_key: Option<&str>,
    ) -> ClientResult<ReportTemplate>;

    async fn update_template(
        &self,
        id: i64,
        payload: &ReportTemplateUpdate,
    ) -> ClientResult<ReportTemplate>;

    async fn delete_template(&self, id: i64) -> ClientResult<()>;

    async fn duplicate_template(&self, id: i64) -> ClientResult<ReportTemplate>;

    async fn set_default_template(&self, id: i64) -> ClientResult<()>;

    /// Render an unsaved configuration; returns the PDF bytes
    async fn preview(&self, request: &PreviewRequest) -> ClientResult<RenderedDocument>;

    async fn generate(&self, request: &GenerateRequest) -> ClientResult<RenderedDocument>;
}

/// Report backend client
#[derive(Debug, Clone)]
pub struct ReportClient<H: HttpClient = NetworkHttpClient> {
    http: H,
}

impl ReportClient<NetworkHttpClient> {
    /// Connect to the backend described by `config`
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        Ok(Self::new(NetworkHttpClient::new(config)?))
    }
}

impl<H: HttpClient> ReportClient<H> {
    pub fn new(http: H) -> Self {
        Self { http }
    }

    pub fn http(&self) -> &H {
        &self.http
    }
}

fn template_path(id: i64) -> String {
    format!("{}/{}", TEMPLATES, id)
}

#[async_trait]
impl<H: HttpClient> ReportApi for ReportClient<H> {
    async fn get_template(&self, id: i64) -> ClientResult<ReportTemplate> {
        self.http.get(&template_path(id)).await
    }

    async fn list_templates(&self, query: &TemplateListQuery) -> ClientResult<PaginatedTemplates> {
        self.http.get_query(TEMPLATES, &query.to_pairs()).await
    }

    async fn create_template(
        &self,
        payload: &ReportTemplateCreate,
        idempotency_key: Option<&str>,
    ) -> ClientResult<ReportTemplate> {
        let created: ReportTemplate = match idempotency_key {
            Some(key) => self.http.post_idempotent(TEMPLATES, payload, key).await?,
            None => self.http.post(TEMPLATES, payload).await?,
        };
        tracing::info!(id = created.id, name = %created.name, "Report template created");
        Ok(created)
    }

    async fn update_template(
        &self,
        id: i64,
        payload: &ReportTemplateUpdate,
    ) -> ClientResult<ReportTemplate> {
        let updated: ReportTemplate = self.http.put(&template_path(id), payload).await?;
        tracing::info!(id, "Report template updated");
        Ok(updated)
    }

    async fn delete_template(&self, id: i64) -> ClientResult<()> {
        self.http.delete(&template_path(id)).await?;
        tracing::info!(id, "Report template deleted");
        Ok(())
    }

    async fn duplicate_template(&self, id: i64) -> ClientResult<ReportTemplate> {
        let path = format!("{}/duplicate", template_path(id));
        self.http.post(&path, &serde_json::json!({})).await
    }

    async fn set_default_template(&self, id: i64) -> ClientResult<()> {
        let path = format!("{}/set-default", template_path(id));
        self.http.post_ack(&path).await
    }

    async fn preview(&self, request: &PreviewRequest) -> ClientResult<RenderedDocument> {
        self.http.post_document("reports/preview", request).await
    }

    async fn generate(&self, request: &GenerateRequest) -> ClientResult<RenderedDocument> {
        let doc = self.http.post_document("reports/generate", request).await?;
        tracing::info!(
            template_id = request.template_id,
            format = %request.format,
            bytes = doc.len(),
            "Report generated"
        );
        Ok(doc)
    }
}
