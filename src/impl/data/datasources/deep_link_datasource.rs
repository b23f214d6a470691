use async_trait::async_trait;
use fractic_server_error::ServerError;
use log::{debug, info};
use reqwest::Url;
use tokio::process::Command;

use crate::{
    config::ChannelConfig,
    domain::repositories::notification_sink::NotificationSink,
    errors::{InvalidDeepLink, NotificationChannelError},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeepLinkMode {
    /// Hand the link to an external opener (e.g. `xdg-open`, `open`).
    Open { opener: String },
    /// Only log the link.
    DryRun,
}

/// Messaging channel reached through `<base>/<phone>?text=<message>` links.
/// Fire-and-forget: success means the opener accepted the link.
#[derive(Debug, Clone)]
pub struct DeepLinkNotificationSink {
    base_url: String,
    mode: DeepLinkMode,
}

impl DeepLinkNotificationSink {
    pub fn new(base_url: impl Into<String>, mode: DeepLinkMode) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            mode,
        }
    }

    pub fn from_config(config: &ChannelConfig) -> Self {
        let mode = if config.dry_run {
            DeepLinkMode::DryRun
        } else {
            DeepLinkMode::Open {
                opener: config.opener.clone(),
            }
        };
        Self::new(config.base_url.clone(), mode)
    }

    pub fn deep_link(&self, phone: &str, message: &str) -> Result<Url, ServerError> {
        let mut url = Url::parse(&format!("{}/{}", self.base_url, phone))
            .map_err(|e| InvalidDeepLink::with_debug(&self.base_url, &e))?;
        url.query_pairs_mut().append_pair("text", message);
        Ok(url)
    }
}

#[async_trait]
impl NotificationSink for DeepLinkNotificationSink {
    async fn send(&self, phone: &str, message: &str) -> Result<(), ServerError> {
        let url = self.deep_link(phone, message)?;
        match &self.mode {
            DeepLinkMode::DryRun => {
                info!("[dry run] {}", url);
                Ok(())
            }
            DeepLinkMode::Open { opener } => {
                debug!("Opening {} via '{}'.", url, opener);
                let status = Command::new(opener)
                    .arg(url.as_str())
                    .status()
                    .await
                    .map_err(|e| NotificationChannelError::with_debug(phone, &e))?;
                if !status.success() {
                    return Err(NotificationChannelError::with_debug(
                        phone,
                        &format!("opener exited with code: {}", status.code().unwrap_or(-1)),
                    ));
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deep_link_encodes_message() {
        let sink = DeepLinkNotificationSink::new("https://wa.me/", DeepLinkMode::DryRun);
        let message = "Hello Dana,\nbalance of ₪300 & more?";
        let url = sink.deep_link("972501234567", message).unwrap();

        assert!(url.as_str().starts_with("https://wa.me/972501234567?text="));
        assert!(!url.as_str().contains('\n'));
        assert!(!url.as_str().contains(' '));
        let decoded: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(decoded, vec![("text".to_string(), message.to_string())]);
    }

    #[test]
    fn test_custom_scheme_supported() {
        let sink = DeepLinkNotificationSink::new("whatsapp://send", DeepLinkMode::DryRun);
        let url = sink.deep_link("972501234567", "hi").unwrap();
        assert_eq!(url.as_str(), "whatsapp://send/972501234567?text=hi");
    }

    #[test]
    fn test_invalid_base_rejected() {
        let sink = DeepLinkNotificationSink::new("not a url", DeepLinkMode::DryRun);
        assert!(sink.deep_link("1", "hi").is_err());
    }

    #[tokio::test]
    async fn test_dry_run_send_succeeds() {
        let sink = DeepLinkNotificationSink::new("https://wa.me", DeepLinkMode::DryRun);
        assert!(sink.send("972501234567", "hi").await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_opener_is_channel_error() {
        let sink = DeepLinkNotificationSink::new(
            "https://wa.me",
            DeepLinkMode::Open {
                opener: "definitely-not-an-opener-binary".to_string(),
            },
        );
        assert!(sink.send("972501234567", "hi").await.is_err());
    }
}
