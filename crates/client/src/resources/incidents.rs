use safewatch_core::attachments::UploadFile;
use safewatch_core::incident::{
    Assignment, Incident, IncidentFilter, IncidentStats, IncidentStatusChange, NewIncident,
    UpdateIncident, INCIDENT_DATA_FIELD,
};

use crate::client::{ApiSession, Paged};
use crate::error::ApiResult;
use crate::upload::upload_form;

impl ApiSession<'_> {
    pub async fn list_incidents(&self, filter: &IncidentFilter) -> ApiResult<Paged<Incident>> {
        self.list(&["incidents"], filter).await
    }

    /// Incidents reported by the session's user.
    pub async fn my_incidents(&self, filter: &IncidentFilter) -> ApiResult<Paged<Incident>> {
        self.list(&["incidents", "my"], filter).await
    }

    pub async fn get_incident(&self, id: &str) -> ApiResult<Incident> {
        self.get(&["incidents", id]).await
    }

    pub async fn incident_stats(&self) -> ApiResult<IncidentStats> {
        self.get(&["incidents", "stats"]).await
    }

    /// Report an incident with up to five attachments (multipart).
    pub async fn create_incident(&self, data: &NewIncident, files: Vec<UploadFile>) -> ApiResult<Incident> {
        let form = upload_form(INCIDENT_DATA_FIELD, data, files)?;
        self.post_multipart(&["incidents"], form).await
    }

    pub async fn update_incident(&self, id: &str, update: &UpdateIncident) -> ApiResult<Incident> {
        self.put(&["incidents", id], update).await
    }

    pub async fn update_incident_status(&self, id: &str, change: &IncidentStatusChange) -> ApiResult<Incident> {
        self.put(&["incidents", id, "status"], change).await
    }

    pub async fn assign_incident(&self, id: &str, assignment: &Assignment) -> ApiResult<Incident> {
        self.put(&["incidents", id, "assign"], assignment).await
    }

    pub async fn delete_incident(&self, id: &str) -> ApiResult<()> {
        self.delete(&["incidents", id]).await
    }
}
