use safewatch_core::attachments::UploadFile;
use safewatch_core::corrective_action::{
    ActionFilter, ActionStatusChange, CompletionReport, CorrectiveAction, ExtensionDecision,
    NewCorrectiveAction, NewExtensionRequest, EVIDENCE_DATA_FIELD,
};

use crate::client::{ApiSession, Paged};
use crate::error::ApiResult;
use crate::upload::upload_form;

impl ApiSession<'_> {
    pub async fn list_corrective_actions(&self, filter: &ActionFilter) -> ApiResult<Paged<CorrectiveAction>> {
        self.list(&["corrective-actions"], filter).await
    }

    /// Actions assigned to the session's user.
    pub async fn assigned_corrective_actions(&self, filter: &ActionFilter) -> ApiResult<Paged<CorrectiveAction>> {
        self.list(&["corrective-actions", "assigned"], filter).await
    }

    pub async fn incident_corrective_actions(&self, incident_id: &str) -> ApiResult<Vec<CorrectiveAction>> {
        let page: Paged<CorrectiveAction> = self
            .list(&["incidents", incident_id, "corrective-actions"], &ActionFilter::default())
            .await?;
        Ok(page.items)
    }

    pub async fn get_corrective_action(&self, id: &str) -> ApiResult<CorrectiveAction> {
        self.get(&["corrective-actions", id]).await
    }

    pub async fn create_corrective_action(
        &self,
        incident_id: &str,
        data: &NewCorrectiveAction,
    ) -> ApiResult<CorrectiveAction> {
        self.post(&["incidents", incident_id, "corrective-actions"], data).await
    }

    pub async fn update_action_status(&self, id: &str, change: &ActionStatusChange) -> ApiResult<CorrectiveAction> {
        self.put(&["corrective-actions", id, "status"], change).await
    }

    pub async fn request_extension(&self, id: &str, request: &NewExtensionRequest) -> ApiResult<CorrectiveAction> {
        self.post(&["corrective-actions", id, "extension"], request).await
    }

    pub async fn decide_extension(&self, id: &str, decision: &ExtensionDecision) -> ApiResult<CorrectiveAction> {
        self.put(&["corrective-actions", id, "extension"], decision).await
    }

    /// Mark an action completed with notes and evidence files (multipart).
    pub async fn complete_corrective_action(
        &self,
        id: &str,
        report: &CompletionReport,
        files: Vec<UploadFile>,
    ) -> ApiResult<CorrectiveAction> {
        let form = upload_form(EVIDENCE_DATA_FIELD, report, files)?;
        self.post_multipart(&["corrective-actions", id, "complete"], form).await
    }
}
