use safewatch_core::investigation::{
    Investigation, InvestigationFilter, NewInvestigation, UpdateInvestigation,
};

use crate::client::{ApiSession, Paged};
use crate::error::ApiResult;

impl ApiSession<'_> {
    pub async fn list_investigations(&self, filter: &InvestigationFilter) -> ApiResult<Paged<Investigation>> {
        self.list(&["investigations"], filter).await
    }

    pub async fn get_investigation(&self, id: &str) -> ApiResult<Investigation> {
        self.get(&["investigations", id]).await
    }

    /// The investigation attached to an incident, if one was started.
    pub async fn incident_investigation(&self, incident_id: &str) -> ApiResult<Option<Investigation>> {
        self.get_optional(&["incidents", incident_id, "investigation"]).await
    }

    pub async fn start_investigation(&self, incident_id: &str, data: &NewInvestigation) -> ApiResult<Investigation> {
        self.post(&["incidents", incident_id, "investigation"], data).await
    }

    pub async fn update_investigation(&self, id: &str, update: &UpdateInvestigation) -> ApiResult<Investigation> {
        self.put(&["investigations", id], update).await
    }
}
