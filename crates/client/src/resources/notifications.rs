use safewatch_core::notification::{Notification, UnreadCount};
use safewatch_core::pagination::PageQuery;

use crate::client::{ApiSession, Paged};
use crate::error::ApiResult;

impl ApiSession<'_> {
    pub async fn list_notifications(&self, query: &PageQuery) -> ApiResult<Paged<Notification>> {
        self.list(&["notifications"], query).await
    }

    pub async fn unread_notification_count(&self) -> ApiResult<UnreadCount> {
        self.get(&["notifications", "unread-count"]).await
    }

    pub async fn mark_notification_read(&self, id: &str) -> ApiResult<()> {
        self.put_empty(&["notifications", id, "read"]).await
    }

    pub async fn mark_all_notifications_read(&self) -> ApiResult<()> {
        self.put_empty(&["notifications", "read-all"]).await
    }
}
