mod common;

use common::{Call, MockApi};
use report_designer::{
    AllowAll, DesignerConfig, DesignerError, EditorSession, Navigation, NoticeLevel, Permission,
    PermissionSet, Region, TemplateRoute, create_element,
};
use shared::error::ErrorCode;
use shared::models::{ElementContent, ElementType, ReportFormat, TemplateConfig};

fn session(api: &MockApi) -> EditorSession<MockApi, AllowAll> {
    EditorSession::new(api.clone(), AllowAll, DesignerConfig::default())
}

fn config_with_table(data_source: &str) -> TemplateConfig {
    TemplateConfig {
        elements: vec![
            create_element(ElementType::Text, 10.0, 10.0, data_source),
            create_element(ElementType::Table, 0.0, 30.0, data_source),
        ],
        ..Default::default()
    }
}

#[tokio::test]
async fn test_save_without_name_makes_no_call() {
    let api = MockApi::new();
    let mut session = session(&api);
    session.set_name("   ");
    session.add_element(ElementType::Text, Region::Body, 10.0, 10.0);

    let err = session.save().await.unwrap_err();
    assert!(matches!(err, DesignerError::Validation(_)));
    assert!(api.calls().is_empty());

    let notice = session.notifier().last().unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);
    assert_eq!(notice.message, "Template name is required");
    assert_eq!(session.canvas().elements(Region::Body).len(), 1);
}

#[tokio::test]
async fn test_load_infers_data_source_from_first_table() {
    let api = MockApi::new();
    let id = api.seed("Users", config_with_table("users"));
    let mut session = session(&api);

    session.load(id).await.unwrap();
    assert_eq!(session.data_source(), "users");
    assert_eq!(session.route(), TemplateRoute::Edit(id));
    assert_eq!(session.name(), "Users");
    assert_eq!(session.canvas().elements(Region::Body).len(), 2);
}

#[tokio::test]
async fn test_load_without_table_uses_default_data_source() {
    let api = MockApi::new();
    let id = api.seed("Cover page", TemplateConfig::default());
    let config = DesignerConfig {
        default_data_source: "requests".into(),
        ..Default::default()
    };
    let mut session = EditorSession::new(api.clone(), AllowAll, config);

    session.load(id).await.unwrap();
    assert_eq!(session.data_source(), "requests");
}

#[tokio::test]
async fn test_export_requires_saved_template() {
    let api = MockApi::new();
    let mut session = session(&api);
    session.set_name("Draft");

    let err = session.export(ReportFormat::Pdf).await.unwrap_err();
    assert!(matches!(err, DesignerError::NotSaved(_)));
    assert!(api.calls().is_empty());
    assert_eq!(
        session.notifier().last().unwrap().message,
        "Please save the template before exporting"
    );
}

#[tokio::test]
async fn test_create_then_update() {
    let api = MockApi::new();
    let mut session = session(&api);
    session.set_name("Monthly incidents");
    session.add_element(ElementType::Table, Region::Body, 0.0, 0.0);

    let nav = session.save().await.unwrap();
    let TemplateRoute::Edit(id) = session.route() else {
        panic!("route not updated after create");
    };
    assert_eq!(nav, Navigation::Replace(TemplateRoute::Edit(id)));
    assert_eq!(api.template(id).unwrap().template, session.canvas().snapshot());

    session.add_element(ElementType::Text, Region::Body, 5.0, 5.0);
    assert_eq!(session.save().await.unwrap(), Navigation::Stay);

    let calls = api.calls();
    assert!(matches!(calls[0], Call::Create { .. }));
    assert_eq!(calls[1], Call::Update(id));
    assert_eq!(api.template(id).unwrap().template.elements.len(), 2);
    assert_eq!(api.template_count(), 1);
}

#[tokio::test]
async fn test_failed_create_retries_with_same_idempotency_key() {
    let api = MockApi::new();
    let mut session = session(&api);
    session.set_name("Queries");

    api.fail_next(ErrorCode::NetworkError);
    let err = session.save().await.unwrap_err();
    assert!(matches!(err, DesignerError::Client(_)));
    assert_eq!(session.route(), TemplateRoute::New);
    assert_eq!(session.name(), "Queries");

    session.save().await.unwrap();
    let keys: Vec<Option<String>> = api
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            Call::Create {
                idempotency_key, ..
            } => Some(idempotency_key),
            _ => None,
        })
        .collect();
    assert_eq!(keys.len(), 2);
    assert!(keys[0].is_some());
    assert_eq!(keys[0], keys[1]);
    assert_eq!(api.template_count(), 1);
}

#[tokio::test]
async fn test_new_session_uses_fresh_idempotency_key() {
    let api = MockApi::new();
    for name in ["A", "B"] {
        let mut session = session(&api);
        session.set_name(name);
        session.save().await.unwrap();
    }
    assert_eq!(api.template_count(), 2);
}

#[tokio::test]
async fn test_table_stamped_with_active_data_source() {
    let api = MockApi::new();
    let mut session = session(&api);
    assert_eq!(session.data_source(), "incidents");

    let id = session.add_element(ElementType::Table, Region::Body, 0.0, 0.0);
    let el = session.canvas().element(Region::Body, &id).unwrap();
    match &el.content {
        ElementContent::Table(t) => {
            assert_eq!(t.data_source, "incidents");
            assert!(t.columns.is_empty());
        }
        other => panic!("unexpected content {:?}", other),
    }

    assert!(session.set_data_source("nope").is_err());
    session.set_data_source("complaints").unwrap();
    let id = session.add_element(ElementType::Chart, Region::Body, 0.0, 0.0);
    let el = session.canvas().element(Region::Body, &id).unwrap();
    assert_eq!(el.content.data_source(), Some("complaints"));
}

#[tokio::test]
async fn test_preview_sends_unsaved_snapshot() {
    let api = MockApi::new();
    let mut session = session(&api);
    session.add_element(ElementType::Text, Region::Body, 10.0, 10.0);

    let doc = session.preview().await.unwrap();
    assert!(doc.bytes.starts_with(b"%PDF"));
    match &api.calls()[0] {
        Call::Preview(req) => {
            assert_eq!(req.row_limit, 10);
            assert_eq!(req.data_source, "incidents");
            assert_eq!(req.template, session.canvas().snapshot());
        }
        other => panic!("unexpected call {:?}", other),
    }
}

#[tokio::test]
async fn test_export_saved_template() {
    let api = MockApi::new();
    let id = api.seed("Monthly incidents", config_with_table("incidents"));
    let mut session = session(&api);
    session.load(id).await.unwrap();

    let doc = session.export(ReportFormat::Xlsx).await.unwrap();
    assert_eq!(doc.file_name.as_deref(), Some("Monthly_incidents.xlsx"));
    match api.calls().last().unwrap() {
        Call::Generate(req) => {
            assert_eq!(req.template_id, id);
            assert_eq!(req.data_source, "incidents");
            assert_eq!(req.format, ReportFormat::Xlsx);
        }
        other => panic!("unexpected call {:?}", other),
    }
}

#[tokio::test]
async fn test_failed_load_keeps_editor_state() {
    let api = MockApi::new();
    let mut session = session(&api);
    session.set_name("Work in progress");
    session.add_element(ElementType::Shape, Region::Body, 0.0, 0.0);

    let err = session.load(404).await.unwrap_err();
    assert!(matches!(err, DesignerError::Client(_)));
    assert_eq!(session.name(), "Work in progress");
    assert_eq!(session.route(), TemplateRoute::New);
    assert_eq!(session.canvas().elements(Region::Body).len(), 1);
    assert_eq!(
        session.notifier().last().unwrap().message,
        "Report template 404 not found"
    );
}

#[tokio::test]
async fn test_permission_denied_makes_no_call() {
    let api = MockApi::new();
    let policy = PermissionSet::new(["report_templates.view"]);
    let mut session = EditorSession::new(api.clone(), policy, DesignerConfig::default());
    session.set_name("Blocked");

    let err = session.save().await.unwrap_err();
    assert!(matches!(
        err,
        DesignerError::PermissionDenied(Permission::CreateTemplate)
    ));
    assert!(api.calls().is_empty());

    session.preview().await.unwrap();
    assert_eq!(api.calls().len(), 1);
}

#[tokio::test]
async fn test_save_load_round_trip() {
    let api = MockApi::new();
    let mut session = session(&api);
    session.set_name("Round trip");
    session.canvas_mut().header_mut().enabled = true;
    session.add_element(ElementType::Text, Region::Header, 0.0, 0.0);
    session.add_element(ElementType::Table, Region::Body, 0.0, 0.0);
    session.add_element(ElementType::Line, Region::Body, 0.0, 120.0);
    session.canvas_mut().footer_mut().enabled = true;
    session.add_element(ElementType::DynamicField, Region::Footer, 150.0, 0.0);
    session.save().await.unwrap();
    let id = session.route().id().unwrap();

    let mut reopened = EditorSession::new(api.clone(), AllowAll, DesignerConfig::default());
    reopened.load(id).await.unwrap();
    assert_eq!(reopened.canvas().snapshot(), session.canvas().snapshot());
    assert!(reopened.canvas().header().enabled);
    assert!(reopened.canvas().footer().enabled);

    // saving the reloaded template changes nothing
    reopened.save().await.unwrap();
    assert_eq!(api.template(id).unwrap().template, session.canvas().snapshot());
}

#[tokio::test]
async fn test_entity_fields_round_trip_through_update() {
    let api = MockApi::new();
    let mut session = session(&api);
    session.set_name("Quarterly");
    session.set_description(Some("old text".into()));
    session.save().await.unwrap();
    let id = session.route().id().unwrap();

    session.set_name("Quarterly v2");
    session.set_public(true);
    session.save().await.unwrap();

    let mut reopened = EditorSession::new(api.clone(), AllowAll, DesignerConfig::default());
    reopened.load(id).await.unwrap();
    assert_eq!(reopened.name(), "Quarterly v2");
    assert_eq!(reopened.description(), Some("old text"));
    assert!(reopened.is_public());

    session.set_description(None);
    session.set_public(false);
    session.save().await.unwrap();

    let mut reopened = EditorSession::new(api.clone(), AllowAll, DesignerConfig::default());
    reopened.load(id).await.unwrap();
    assert_eq!(reopened.description(), None);
    assert!(!reopened.is_public());
    assert_eq!(reopened.name(), "Quarterly v2");
}

#[tokio::test]
async fn test_blank_description_clears_stored_one() {
    let api = MockApi::new();
    let id = api.seed("Users", TemplateConfig::default());
    let mut session = session(&api);
    session.load(id).await.unwrap();
    session.set_description(Some("audit export".into()));
    session.save().await.unwrap();
    assert_eq!(
        api.template(id).unwrap().description.as_deref(),
        Some("audit export")
    );

    session.set_description(Some("   ".into()));
    session.save().await.unwrap();
    assert_eq!(api.template(id).unwrap().description, None);
}

#[tokio::test]
async fn test_panel_edits_flow_into_saved_config() {
    let api = MockApi::new();
    let mut session = session(&api);
    session.set_name("Panel");
    let id = session.add_element(ElementType::Table, Region::Body, 0.0, 0.0);
    {
        let mut panel = session.panel();
        panel.add_column("incident_number").unwrap();
        panel.add_column("status").unwrap();
    }
    session.save().await.unwrap();

    let saved = api.template(session.route().id().unwrap()).unwrap();
    let table = saved.template.elements.iter().find(|el| el.id == id).unwrap();
    match &table.content {
        ElementContent::Table(t) => {
            let fields: Vec<&str> = t.columns.iter().map(|c| c.field.as_str()).collect();
            assert_eq!(fields, vec!["incident_number", "status"]);
        }
        other => panic!("unexpected content {:?}", other),
    }
}
