use safewatch_core::attachments::UploadFile;
use safewatch_core::hazard::{Hazard, HazardFilter, HazardStatusChange, NewHazard, HAZARD_DATA_FIELD};

use crate::client::{ApiSession, Paged};
use crate::error::ApiResult;
use crate::upload::upload_form;

impl ApiSession<'_> {
    pub async fn list_hazards(&self, filter: &HazardFilter) -> ApiResult<Paged<Hazard>> {
        self.list(&["hazards"], filter).await
    }

    pub async fn my_hazards(&self, filter: &HazardFilter) -> ApiResult<Paged<Hazard>> {
        self.list(&["hazards", "my"], filter).await
    }

    pub async fn get_hazard(&self, id: &str) -> ApiResult<Hazard> {
        self.get(&["hazards", id]).await
    }

    pub async fn create_hazard(&self, data: &NewHazard, files: Vec<UploadFile>) -> ApiResult<Hazard> {
        let form = upload_form(HAZARD_DATA_FIELD, data, files)?;
        self.post_multipart(&["hazards"], form).await
    }

    pub async fn update_hazard_status(&self, id: &str, change: &HazardStatusChange) -> ApiResult<Hazard> {
        self.put(&["hazards", id, "status"], change).await
    }

    pub async fn delete_hazard(&self, id: &str) -> ApiResult<()> {
        self.delete(&["hazards", id]).await
    }
}
