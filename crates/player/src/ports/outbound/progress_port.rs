//! Remote progress mirror (`POST /api/progress/save`)

use async_trait::async_trait;

use chronoquest_domain::ProgressSnapshot;

use super::ClientError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProgressSyncPort: Send + Sync {
    async fn push(&self, snapshot: &ProgressSnapshot) -> Result<(), ClientError>;
}
