use async_trait::async_trait;
use fractic_server_error::ServerError;

/// Outbound messaging channel. Hand-off only: an `Ok` means the message left
/// this process, not that it was delivered.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn send(&self, phone: &str, message: &str) -> Result<(), ServerError>;
}
