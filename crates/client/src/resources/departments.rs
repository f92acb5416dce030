use safewatch_core::pagination::PageQuery;
use safewatch_core::people::{Department, DepartmentForm};

use crate::client::{ApiSession, Paged};
use crate::error::ApiResult;

impl ApiSession<'_> {
    pub async fn list_departments(&self, query: &PageQuery) -> ApiResult<Paged<Department>> {
        self.list(&["departments"], query).await
    }

    pub async fn get_department(&self, id: &str) -> ApiResult<Department> {
        self.get(&["departments", id]).await
    }

    pub async fn create_department(&self, form: &DepartmentForm) -> ApiResult<Department> {
        self.post(&["departments"], form).await
    }

    pub async fn update_department(&self, id: &str, form: &DepartmentForm) -> ApiResult<Department> {
        self.put(&["departments", id], form).await
    }

    pub async fn delete_department(&self, id: &str) -> ApiResult<()> {
        self.delete(&["departments", id]).await
    }
}
