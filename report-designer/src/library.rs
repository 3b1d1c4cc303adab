//! Template library: list, duplicate, delete and set-default

use report_client::ReportApi;
use shared::models::{PaginatedTemplates, ReportTemplate, TemplateListQuery};

use crate::access::{AccessPolicy, Permission};
use crate::error::{DesignerError, DesignerResult};
use crate::notification::Notifier;

pub struct TemplateLibrary<A: ReportApi, P: AccessPolicy> {
    api: A,
    policy: P,
    notifier: Notifier,
}

impl<A: ReportApi, P: AccessPolicy> TemplateLibrary<A, P> {
    pub fn new(api: A, policy: P, notifier: Notifier) -> Self {
        Self {
            api,
            policy,
            notifier,
        }
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut Notifier {
        &mut self.notifier
    }

    fn fail<T>(&mut self, err: DesignerError) -> DesignerResult<T> {
        tracing::warn!(error = %err, "Template library action failed");
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

    pub async fn list(&mut self, query: &TemplateListQuery) -> DesignerResult<PaginatedTemplates> {
        self.require(Permission::ViewTemplates)?;
        match self.api.list_templates(query).await {
            Ok(page) => Ok(page),
            Err(e) => self.fail(e.into()),
        }
    }

    /// Server-side copy of template `id`
    pub async fn duplicate(&mut self, id: i64) -> DesignerResult<ReportTemplate> {
        self.require(Permission::CreateTemplate)?;
        match self.api.duplicate_template(id).await {
            Ok(copy) => {
                self.notifier.success("Template duplicated");
                Ok(copy)
            }
            Err(e) => self.fail(e.into()),
        }
    }

    pub async fn delete(&mut self, id: i64) -> DesignerResult<()> {
        self.require(Permission::DeleteTemplate)?;
        match self.api.delete_template(id).await {
            Ok(()) => {
                self.notifier.success("Template deleted");
                Ok(())
            }
            Err(e) => self.fail(e.into()),
        }
    }

    /// Make `id` the default template; exclusivity is kept by the backend
    pub async fn set_default(&mut self, id: i64) -> DesignerResult<()> {
        self.require(Permission::UpdateTemplate)?;
        match self.api.set_default_template(id).await {
            Ok(()) => {
                self.notifier.success("Default template updated");
                Ok(())
            }
            Err(e) => self.fail(e.into()),
        }
    }
}
