//! In-memory `ReportApi` double recording every call

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use report_client::{ClientError, ClientResult, ReportApi};
use shared::error::ErrorCode;
use shared::models::{
    GenerateRequest, PaginatedTemplates, PreviewRequest, RenderedDocument, ReportTemplate,
    ReportTemplateCreate, ReportTemplateUpdate, TemplateConfig, TemplateListQuery,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Get(i64),
    List(TemplateListQuery),
    Create {
        name: String,
        idempotency_key: Option<String>,
    },
    Update(i64),
    Delete(i64),
    Duplicate(i64),
    SetDefault(i64),
    Preview(PreviewRequest),
    Generate(GenerateRequest),
}

#[derive(Default)]
struct State {
    next_id: i64,
    templates: Vec<ReportTemplate>,
    keys: HashMap<String, i64>,
    calls: Vec<Call>,
    fail_next: Option<ErrorCode>,
}

#[derive(Clone, Default)]
pub struct MockApi {
    state: Arc<Mutex<State>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a template as if it had been saved earlier
    pub fn seed(&self, name: &str, template: TemplateConfig) -> i64 {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = state.next_id;
        state.templates.push(ReportTemplate {
            id,
            name: name.to_string(),
            description: None,
            template,
            is_default: false,
            is_public: false,
            created_by: Some(1),
            created_at: Some(0),
            updated_at: None,
        });
        id
    }

    /// Make the next call fail with `code`
    pub fn fail_next(&self, code: ErrorCode) {
        self.state.lock().unwrap().fail_next = Some(code);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn template(&self, id: i64) -> Option<ReportTemplate> {
        let state = self.state.lock().unwrap();
        state.templates.iter().find(|t| t.id == id).cloned()
    }

    pub fn template_count(&self) -> usize {
        self.state.lock().unwrap().templates.len()
    }

    fn record(&self, call: Call) -> ClientResult<std::sync::MutexGuard<'_, State>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        match state.fail_next.take() {
            Some(code) => Err(ClientError::Api {
                code,
                message: code.message().to_string(),
                details: None,
            }),
            None => Ok(state),
        }
    }
}

fn not_found(id: i64) -> ClientError {
    ClientError::Api {
        code: ErrorCode::TemplateNotFound,
        message: format!("Report template {} not found", id),
        details: None,
    }
}

#[async_trait]
impl ReportApi for MockApi {
    async fn get_template(&self, id: i64) -> ClientResult<ReportTemplate> {
        let state = self.record(Call::Get(id))?;
        state
            .templates
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    async fn list_templates(&self, query: &TemplateListQuery) -> ClientResult<PaginatedTemplates> {
        let state = self.record(Call::List(query.clone()))?;
        let data: Vec<_> = state
            .templates
            .iter()
            .filter(|t| query.search.as_deref().is_none_or(|s| t.name.contains(s)))
            .cloned()
            .collect();
        Ok(PaginatedTemplates {
            total: data.len() as u64,
            data,
        })
    }

    async fn create_template(
        &self,
        payload: &ReportTemplateCreate,
        idempotency_key: Option<&str>,
    ) -> ClientResult<ReportTemplate> {
        let mut state = self.record(Call::Create {
            name: payload.name.clone(),
            idempotency_key: idempotency_key.map(str::to_string),
        })?;
        if let Some(key) = idempotency_key
            && let Some(id) = state.keys.get(key).copied()
            && let Some(existing) = state.templates.iter().find(|t| t.id == id)
        {
            return Ok(existing.clone());
        }
        state.next_id += 1;
        let template = ReportTemplate {
            id: state.next_id,
            name: payload.name.clone(),
            description: payload.description.clone(),
            template: payload.template.clone(),
            is_default: false,
            is_public: payload.is_public,
            created_by: Some(1),
            created_at: Some(0),
            updated_at: None,
        };
        if let Some(key) = idempotency_key {
            state.keys.insert(key.to_string(), template.id);
        }
        state.templates.push(template.clone());
        Ok(template)
    }

    async fn update_template(
        &self,
        id: i64,
        payload: &ReportTemplateUpdate,
    ) -> ClientResult<ReportTemplate> {
        let mut state = self.record(Call::Update(id))?;
        let template = state
            .templates
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| not_found(id))?;
        if let Some(name) = &payload.name {
            template.name = name.clone();
        }
        if let Some(description) = &payload.description {
            template.description = description.clone();
        }
        if let Some(config) = &payload.template {
            template.template = config.clone();
        }
        if let Some(is_public) = payload.is_public {
            template.is_public = is_public;
        }
        Ok(template.clone())
    }

    async fn delete_template(&self, id: i64) -> ClientResult<()> {
        let mut state = self.record(Call::Delete(id))?;
        let before = state.templates.len();
        state.templates.retain(|t| t.id != id);
        if state.templates.len() == before {
            return Err(not_found(id));
        }
        Ok(())
    }

    async fn duplicate_template(&self, id: i64) -> ClientResult<ReportTemplate> {
        let mut state = self.record(Call::Duplicate(id))?;
        let source = state
            .templates
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| not_found(id))?;
        state.next_id += 1;
        let copy = ReportTemplate {
            id: state.next_id,
            name: format!("{} (copy)", source.name),
            is_default: false,
            ..source
        };
        state.templates.push(copy.clone());
        Ok(copy)
    }

    async fn set_default_template(&self, id: i64) -> ClientResult<()> {
        let mut state = self.record(Call::SetDefault(id))?;
        if !state.templates.iter().any(|t| t.id == id) {
            return Err(not_found(id));
        }
        for t in state.templates.iter_mut() {
            t.is_default = t.id == id;
        }
        Ok(())
    }

    async fn preview(&self, request: &PreviewRequest) -> ClientResult<RenderedDocument> {
        self.record(Call::Preview(request.clone()))?;
        Ok(RenderedDocument {
            content_type: "application/pdf".to_string(),
            file_name: None,
            bytes: b"%PDF-1.7".to_vec(),
        })
    }

    async fn generate(&self, request: &GenerateRequest) -> ClientResult<RenderedDocument> {
        self.record(Call::Generate(request.clone()))?;
        Ok(RenderedDocument {
            content_type: request.format.mime_type().to_string(),
            file_name: Some(request.file_name.clone()),
            bytes: vec![0u8; 16],
        })
    }
}
