use safewatch_core::people::{NewUser, UpdateUser, User, UserFilter};

use crate::client::{ApiSession, Paged};
use crate::error::ApiResult;

impl ApiSession<'_> {
    pub async fn list_users(&self, filter: &UserFilter) -> ApiResult<Paged<User>> {
        self.list(&["users"], filter).await
    }

    pub async fn get_user(&self, id: &str) -> ApiResult<User> {
        self.get(&["users", id]).await
    }

    pub async fn create_user(&self, data: &NewUser) -> ApiResult<User> {
        self.post(&["users"], data).await
    }

    pub async fn update_user(&self, id: &str, update: &UpdateUser) -> ApiResult<User> {
        self.put(&["users", id], update).await
    }

    /// Accounts are never hard-deleted; the backend flips `isActive`.
    pub async fn deactivate_user(&self, id: &str) -> ApiResult<()> {
        self.delete(&["users", id]).await
    }
}
