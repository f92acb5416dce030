use safewatch_core::attachments::UploadFile;
use safewatch_core::vpc::{NewVpc, Vpc, VpcFilter, VPC_DATA_FIELD};

use crate::client::{ApiSession, Paged};
use crate::error::ApiResult;
use crate::upload::upload_form;

impl ApiSession<'_> {
    pub async fn list_vpcs(&self, filter: &VpcFilter) -> ApiResult<Paged<Vpc>> {
        self.list(&["vpcs"], filter).await
    }

    pub async fn my_vpcs(&self, filter: &VpcFilter) -> ApiResult<Paged<Vpc>> {
        self.list(&["vpcs", "my"], filter).await
    }

    pub async fn get_vpc(&self, id: &str) -> ApiResult<Vpc> {
        self.get(&["vpcs", id]).await
    }

    pub async fn create_vpc(&self, data: &NewVpc, files: Vec<UploadFile>) -> ApiResult<Vpc> {
        let form = upload_form(VPC_DATA_FIELD, data, files)?;
        self.post_multipart(&["vpcs"], form).await
    }

    pub async fn delete_vpc(&self, id: &str) -> ApiResult<()> {
        self.delete(&["vpcs", id]).await
    }
}
