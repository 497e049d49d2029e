//! Notification delivery.

use async_trait::async_trait;

use crate::error::NotifyError;

/// Delivers one preformatted message per signal.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, message: &str) -> Result<(), NotifyError>;

    fn name(&self) -> &str;
}
