pub mod telegram;

use async_trait::async_trait;

use crate::error::SendError;

/// Outbound message sink. Called once per relevant, newly-seen event.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, text: &str) -> Result<(), SendError>;
}
