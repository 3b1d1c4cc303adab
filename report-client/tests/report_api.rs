//! End-to-end tests against an in-process report backend

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use report_client::{ClientConfig, ClientError, ReportApi, ReportClient};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    GenerateRequest, PaginatedTemplates, PreviewRequest, ReportFormat, ReportTemplate,
    ReportTemplateCreate, ReportTemplateUpdate, TemplateConfig, TemplateListQuery,
};

const TOKEN: &str = "test-token";

#[derive(Default)]
struct Store {
    next_id: i64,
    templates: Vec<ReportTemplate>,
    idempotency: HashMap<String, i64>,
    create_calls: usize,
}

type Shared = Arc<Mutex<Store>>;

fn authorize(headers: &HeaderMap) -> AppResult<()> {
    let expected = format!("Bearer {}", TOKEN);
    match headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(v) if v == expected => Ok(()),
        _ => Err(AppError::not_authenticated()),
    }
}

#[derive(serde::Deserialize)]
struct ListParams {
    search: Option<String>,
    page: u32,
    limit: u32,
}

async fn list(
    State(store): State<Shared>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> AppResult<Json<PaginatedTemplates>> {
    authorize(&headers)?;
    let store = store.lock().unwrap();
    let matching: Vec<_> = store
        .templates
        .iter()
        .filter(|t| {
            params
                .search
                .as_deref()
                .is_none_or(|s| t.name.to_lowercase().contains(&s.to_lowercase()))
        })
        .cloned()
        .collect();
    let total = matching.len() as u64;
    let skip = ((params.page.max(1) - 1) * params.limit) as usize;
    let data = matching
        .into_iter()
        .skip(skip)
        .take(params.limit as usize)
        .collect();
    Ok(Json(PaginatedTemplates { data, total }))
}

async fn create(
    State(store): State<Shared>,
    headers: HeaderMap,
    Json(payload): Json<ReportTemplateCreate>,
) -> AppResult<(StatusCode, Json<ReportTemplate>)> {
    authorize(&headers)?;
    let mut store = store.lock().unwrap();
    store.create_calls += 1;
    let key = headers
        .get("Idempotency-Key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    if let Some(key) = &key
        && let Some(id) = store.idempotency.get(key)
        && let Some(existing) = store.templates.iter().find(|t| t.id == *id)
    {
        return Ok((StatusCode::OK, Json(existing.clone())));
    }
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("name must not be empty"));
    }
    if store.templates.iter().any(|t| t.name == payload.name) {
        return Err(AppError::new(ErrorCode::TemplateNameExists));
    }
    store.next_id += 1;
    let template = ReportTemplate {
        id: store.next_id,
        name: payload.name,
        description: payload.description,
        template: payload.template,
        is_default: false,
        is_public: payload.is_public,
        created_by: Some(1),
        created_at: Some(shared::util::now_millis()),
        updated_at: None,
    };
    if let Some(key) = key {
        store.idempotency.insert(key, template.id);
    }
    store.templates.push(template.clone());
    Ok((StatusCode::CREATED, Json(template)))
}

async fn fetch(
    State(store): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> AppResult<Json<ReportTemplate>> {
    authorize(&headers)?;
    let store = store.lock().unwrap();
    store
        .templates
        .iter()
        .find(|t| t.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::template_not_found(id))
}

async fn update(
    State(store): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(payload): Json<ReportTemplateUpdate>,
) -> AppResult<Json<ReportTemplate>> {
    authorize(&headers)?;
    let mut store = store.lock().unwrap();
    let template = store
        .templates
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or_else(|| AppError::template_not_found(id))?;
    if let Some(name) = payload.name {
        template.name = name;
    }
    if let Some(description) = payload.description {
        template.description = description;
    }
    if let Some(config) = payload.template {
        template.template = config;
    }
    if let Some(is_public) = payload.is_public {
        template.is_public = is_public;
    }
    template.updated_at = Some(shared::util::now_millis());
    Ok(Json(template.clone()))
}

async fn remove(
    State(store): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    authorize(&headers)?;
    let mut store = store.lock().unwrap();
    let before = store.templates.len();
    store.templates.retain(|t| t.id != id);
    if store.templates.len() == before {
        return Err(AppError::template_not_found(id));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn duplicate(
    State(store): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> AppResult<Json<ReportTemplate>> {
    authorize(&headers)?;
    let mut store = store.lock().unwrap();
    let source = store
        .templates
        .iter()
        .find(|t| t.id == id)
        .cloned()
        .ok_or_else(|| AppError::template_not_found(id))?;
    store.next_id += 1;
    let copy = ReportTemplate {
        id: store.next_id,
        name: format!("{} (copy)", source.name),
        is_default: false,
        ..source
    };
    store.templates.push(copy.clone());
    Ok(Json(copy))
}

async fn set_default(
    State(store): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    authorize(&headers)?;
    let mut store = store.lock().unwrap();
    if !store.templates.iter().any(|t| t.id == id) {
        return Err(AppError::template_not_found(id));
    }
    for t in store.templates.iter_mut() {
        t.is_default = t.id == id;
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn preview(headers: HeaderMap, Json(req): Json<PreviewRequest>) -> AppResult<impl IntoResponse> {
    authorize(&headers)?;
    if req.data_source == "missing" {
        return Err(AppError::new(ErrorCode::DataSourceNotFound));
    }
    let body = format!("%PDF-1.7 {} rows={}", req.data_source, req.row_limit);
    Ok(([(header::CONTENT_TYPE, "application/pdf")], body.into_bytes()))
}

async fn generate(headers: HeaderMap, Json(req): Json<GenerateRequest>) -> AppResult<impl IntoResponse> {
    authorize(&headers)?;
    let disposition = format!("attachment; filename=\"{}\"", req.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, req.format.mime_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        vec![1u8, 2, 3, 4],
    ))
}

async fn spawn_backend() -> (String, Shared) {
    let store: Shared = Arc::default();
    let app = Router::new()
        .route("/api/report-templates", get(list).post(create))
        .route(
            "/api/report-templates/{id}",
            get(fetch).put(update).delete(remove),
        )
        .route("/api/report-templates/{id}/duplicate", post(duplicate))
        .route("/api/report-templates/{id}/set-default", post(set_default))
        .route("/api/reports/preview", post(preview))
        .route("/api/reports/generate", post(generate))
        .with_state(store.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}/api", addr), store)
}

async fn client() -> (ReportClient, Shared) {
    let (url, store) = spawn_backend().await;
    let client = ReportClient::from_config(&ClientConfig::new(url).with_token(TOKEN)).unwrap();
    (client, store)
}

fn create_payload(name: &str) -> ReportTemplateCreate {
    ReportTemplateCreate {
        name: name.into(),
        description: Some("monthly".into()),
        template: TemplateConfig::default(),
        is_public: false,
    }
}

#[tokio::test]
async fn test_create_get_update_delete() {
    let (client, _) = client().await;

    let created = client
        .create_template(&create_payload("Incidents"), None)
        .await
        .unwrap();
    assert_eq!(created.name, "Incidents");

    let fetched = client.get_template(created.id).await.unwrap();
    assert_eq!(fetched, created);

    let updated = client
        .update_template(
            created.id,
            &ReportTemplateUpdate {
                name: Some("Incidents v2".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Incidents v2");
    assert_eq!(updated.description.as_deref(), Some("monthly"));

    let cleared = client
        .update_template(
            created.id,
            &ReportTemplateUpdate {
                description: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(cleared.description, None);
    assert_eq!(cleared.name, "Incidents v2");

    client.delete_template(created.id).await.unwrap();
    let err = client.get_template(created.id).await.unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::TemplateNotFound));
}

#[tokio::test]
async fn test_idempotent_create_returns_same_template() {
    let (client, store) = client().await;
    let payload = create_payload("Requests");

    let first = client
        .create_template(&payload, Some("key-1"))
        .await
        .unwrap();
    let second = client
        .create_template(&payload, Some("key-1"))
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    let store = store.lock().unwrap();
    assert_eq!(store.create_calls, 2);
    assert_eq!(store.templates.len(), 1);
}

#[tokio::test]
async fn test_structured_backend_errors() {
    let (client, _) = client().await;

    let err = client
        .create_template(&create_payload("  "), None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::ValidationFailed));
    assert_eq!(err.user_message(), "name must not be empty");

    client
        .create_template(&create_payload("Users"), None)
        .await
        .unwrap();
    let err = client
        .create_template(&create_payload("Users"), None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::TemplateNameExists));
}

#[tokio::test]
async fn test_missing_token_is_unauthenticated() {
    let (url, _) = spawn_backend().await;
    let client = ReportClient::from_config(&ClientConfig::new(url)).unwrap();
    let err = client
        .list_templates(&TemplateListQuery::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ClientError::Api {
            code: ErrorCode::NotAuthenticated,
            ..
        }
    ));
}

#[tokio::test]
async fn test_list_search_and_paging() {
    let (client, _) = client().await;
    for name in ["Monthly incidents", "Weekly incidents", "Users"] {
        client
            .create_template(&create_payload(name), None)
            .await
            .unwrap();
    }

    let page = client
        .list_templates(&TemplateListQuery::search("incidents"))
        .await
        .unwrap();
    assert_eq!(page.total, 2);

    let page = client
        .list_templates(&TemplateListQuery {
            search: None,
            page: 2,
            limit: 2,
        })
        .await
        .unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].name, "Users");
}

#[tokio::test]
async fn test_duplicate_and_set_default() {
    let (client, _) = client().await;
    let original = client
        .create_template(&create_payload("Queries"), None)
        .await
        .unwrap();

    let copy = client.duplicate_template(original.id).await.unwrap();
    assert_ne!(copy.id, original.id);
    assert_eq!(copy.name, "Queries (copy)");

    client.set_default_template(copy.id).await.unwrap();
    assert!(client.get_template(copy.id).await.unwrap().is_default);
    assert!(!client.get_template(original.id).await.unwrap().is_default);

    let err = client.set_default_template(999).await.unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::TemplateNotFound));
}

#[tokio::test]
async fn test_preview_returns_pdf_bytes() {
    let (client, _) = client().await;
    let doc = client
        .preview(&PreviewRequest {
            template: TemplateConfig::default(),
            data_source: "incidents".into(),
            row_limit: 10,
        })
        .await
        .unwrap();
    assert_eq!(doc.content_type, "application/pdf");
    assert!(doc.bytes.starts_with(b"%PDF"));
    assert!(doc.file_name.is_none());

    let err = client
        .preview(&PreviewRequest {
            template: TemplateConfig::default(),
            data_source: "missing".into(),
            row_limit: 10,
        })
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::DataSourceNotFound));
}

#[tokio::test]
async fn test_generate_reads_file_name() {
    let (client, _) = client().await;
    let doc = client
        .generate(&GenerateRequest {
            template_id: 1,
            data_source: "incidents".into(),
            format: ReportFormat::Xlsx,
            file_name: "Incidents.xlsx".into(),
            filters: vec![],
            sorting: vec![],
            overrides: None,
        })
        .await
        .unwrap();
    assert_eq!(doc.file_name.as_deref(), Some("Incidents.xlsx"));
    assert_eq!(doc.content_type, ReportFormat::Xlsx.mime_type());
    assert_eq!(doc.len(), 4);
}
