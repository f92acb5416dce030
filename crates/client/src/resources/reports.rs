use safewatch_core::report::{ReportFile, ReportRequest};

use crate::client::ApiSession;
use crate::error::ApiResult;

impl ApiSession<'_> {
    /// Generate a report; the backend answers with the file itself.
    ///
    /// Falls back to the requested format's content type and a derived file
    /// name when the backend omits them.
    pub async fn generate_report(&self, request: &ReportRequest) -> ApiResult<ReportFile> {
        let blob = self.download(&["reports", "generate"], request).await?;
        Ok(ReportFile {
            file_name: blob.file_name.unwrap_or_else(|| request.file_name()),
            content_type: blob
                .content_type
                .unwrap_or_else(|| request.format.content_type().to_string()),
            data: blob.data,
        })
    }
}
