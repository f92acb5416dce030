use safewatch_core::pagination::PageQuery;
use safewatch_core::people::{TemporaryEmployee, TemporaryEmployeeForm};

use crate::client::{ApiSession, Paged};
use crate::error::ApiResult;

impl ApiSession<'_> {
    pub async fn list_temporary_employees(&self, query: &PageQuery) -> ApiResult<Paged<TemporaryEmployee>> {
        self.list(&["temporary-employees"], query).await
    }

    pub async fn get_temporary_employee(&self, id: &str) -> ApiResult<TemporaryEmployee> {
        self.get(&["temporary-employees", id]).await
    }

    pub async fn create_temporary_employee(&self, form: &TemporaryEmployeeForm) -> ApiResult<TemporaryEmployee> {
        self.post(&["temporary-employees"], form).await
    }

    pub async fn update_temporary_employee(
        &self,
        id: &str,
        form: &TemporaryEmployeeForm,
    ) -> ApiResult<TemporaryEmployee> {
        self.put(&["temporary-employees", id], form).await
    }

    pub async fn delete_temporary_employee(&self, id: &str) -> ApiResult<()> {
        self.delete(&["temporary-employees", id]).await
    }
}
