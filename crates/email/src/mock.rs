//! Mock Email Service Implementation
//!
//! Provides in-memory email capture for testing without external dependencies.
//! Captured document notifications can be inspected per recipient and per
//! document link for workflow validation.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::layout::Branding;
use crate::theme::Theme;
use crate::{EmailConfig, EmailError, EmailMessage, EmailReceipt, EmailService};

/// Email captured by the mock service
#[derive(Debug, Clone)]
pub struct CapturedEmail {
    pub message: EmailMessage,
    pub receipt: EmailReceipt,
    pub captured_at: DateTime<Utc>,
}

impl CapturedEmail {
    /// Whether this email is a document notification
    pub fn is_document_notification(&self) -> bool {
        self.message
            .metadata
            .get("email_type")
            .map(|t| t == "document_notification")
            .unwrap_or(false)
    }

    /// Document link the notification points at, from metadata or the text body
    pub fn document_url(&self) -> Option<String> {
        if let Some(url) = self.message.metadata.get("document_url") {
            return Some(url.clone());
        }

        self.message
            .body_text
            .lines()
            .find_map(|line| line.strip_prefix("Open Document: "))
            .map(|url| url.trim().to_string())
    }

    /// Number of diff blocks in the HTML body
    pub fn diff_block_count(&self) -> usize {
        self.message
            .body_html
            .as_deref()
            .map(|html| html.matches(r#"class="diff""#).count())
            .unwrap_or(0)
    }
}

/// Mock email service for testing
#[derive(Debug, Clone)]
pub struct MockEmailService {
    emails: Arc<Mutex<Vec<CapturedEmail>>>,
    email_by_recipient: Arc<Mutex<HashMap<String, Vec<CapturedEmail>>>>,
    enabled: bool,
    default_from: String,
    branding: Branding,
    theme: Theme,
}

/// Lock a capture store, recovering the guard if the lock is poisoned
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockEmailService {
    /// Create a new mock email service
    pub fn new() -> Self {
        Self::from_config(EmailConfig::default())
    }

    /// Create a disabled mock email service (for testing)
    pub fn new_disabled() -> Self {
        Self::from_config(EmailConfig {
            enabled: false,
            ..EmailConfig::default()
        })
    }

    /// Create a mock service rendering with the configured branding and theme
    pub fn from_config(config: EmailConfig) -> Self {
        Self {
            emails: Arc::new(Mutex::new(Vec::new())),
            email_by_recipient: Arc::new(Mutex::new(HashMap::new())),
            enabled: config.enabled,
            default_from: config.default_from,
            branding: config.branding,
            theme: config.theme,
        }
    }

    /// Get all captured emails
    pub fn get_all_emails(&self) -> Vec<CapturedEmail> {
        lock(&self.emails).clone()
    }

    /// Get emails sent to a specific recipient
    pub fn get_emails_for_recipient(&self, email: &str) -> Vec<CapturedEmail> {
        lock(&self.email_by_recipient)
            .get(email)
            .cloned()
            .unwrap_or_default()
    }

    /// Get the most recent document notification for a recipient
    pub fn get_latest_notification(&self, email: &str) -> Option<CapturedEmail> {
        self.get_emails_for_recipient(email)
            .into_iter()
            .filter(CapturedEmail::is_document_notification)
            .max_by_key(|e| e.captured_at)
    }

    /// Get all document notifications pointing at `document_url`
    pub fn get_notifications_for_document(&self, document_url: &str) -> Vec<CapturedEmail> {
        self.get_all_emails()
            .into_iter()
            .filter(|e| e.is_document_notification())
            .filter(|e| e.document_url().as_deref() == Some(document_url))
            .collect()
    }

    /// Check if a document notification was sent to a specific email address
    pub fn was_notified(&self, email: &str) -> bool {
        self.get_latest_notification(email).is_some()
    }

    /// Get count of emails sent
    pub fn email_count(&self) -> usize {
        lock(&self.emails).len()
    }

    /// Clear all captured emails
    pub fn clear(&self) {
        lock(&self.emails).clear();
        lock(&self.email_by_recipient).clear();
    }

    /// Set enabled state
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Check if email sending is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for MockEmailService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl EmailService for MockEmailService {
    async fn send_email(&self, message: EmailMessage) -> Result<EmailReceipt, EmailError> {
        message.validate()?;

        if !self.enabled {
            tracing::warn!("Mock email service disabled, skipping send");
            return Ok(EmailReceipt {
                message_id: format!("disabled-{}", Uuid::new_v4()),
                sent_at: Utc::now(),
                provider: "mock-disabled".to_string(),
                metadata: message.metadata.clone(),
            });
        }

        tracing::info!(to = %message.to, subject = %message.subject, "Mock email service capturing email");

        let receipt = EmailReceipt {
            message_id: format!("mock-{}", Uuid::new_v4()),
            sent_at: Utc::now(),
            provider: "mock".to_string(),
            metadata: message.metadata.clone(),
        };

        let captured = CapturedEmail {
            message: message.clone(),
            receipt: receipt.clone(),
            captured_at: Utc::now(),
        };

        lock(&self.emails).push(captured.clone());

        lock(&self.email_by_recipient)
            .entry(message.to)
            .or_default()
            .push(captured);

        tracing::info!(message_id = %receipt.message_id, "Email captured successfully");

        Ok(receipt)
    }

    fn default_from(&self) -> String {
        self.default_from.clone()
    }

    fn branding(&self) -> &Branding {
        &self.branding
    }

    fn theme(&self) -> &Theme {
        &self.theme
    }

    fn service_name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::TrustedHtml;
    use crate::props::{Actor, Collection, Document, NotificationProps, Team};

    fn sample_props() -> NotificationProps {
        NotificationProps::new(
            Actor::new("Ava"),
            Team::new("https://example.com"),
            Document::new("Plan", "/doc/abc"),
            Collection::new("Eng"),
        )
    }

    #[tokio::test]
    async fn test_mock_email_service() {
        let service = MockEmailService::new();

        let message = EmailMessage::new(
            "test@example.com".to_string(),
            "sender@folio.app".to_string(),
            "Test Subject".to_string(),
            "Test body".to_string(),
        );

        let receipt = service.send_email(message).await.unwrap();

        assert!(receipt.message_id.starts_with("mock-"));
        assert_eq!(receipt.provider, "mock");
        assert_eq!(service.email_count(), 1);

        let emails = service.get_emails_for_recipient("test@example.com");
        assert_eq!(emails.len(), 1);
        assert_eq!(emails[0].message.subject, "Test Subject");
        assert!(!emails[0].is_document_notification());
    }

    #[test_log::test(tokio::test)]
    async fn test_document_notification_email() {
        let service = MockEmailService::new();
        let props = sample_props()
            .with_event_name("updated")
            .with_summary(TrustedHtml::new_unchecked("<p><ins>added</ins></p>"));

        let receipt = service
            .send_document_notification("reader@example.com", &props)
            .await
            .unwrap();

        assert_eq!(receipt.provider, "mock");
        assert_eq!(
            receipt.metadata.get("email_type"),
            Some(&"document_notification".to_string())
        );

        let captured = service.get_latest_notification("reader@example.com").unwrap();
        assert_eq!(captured.message.from, "notifications@folio.app");
        assert_eq!(captured.message.subject, "“Plan” updated");
        assert_eq!(
            captured.document_url(),
            Some("https://example.com/doc/abc".to_string())
        );
        assert_eq!(captured.diff_block_count(), 1);

        assert!(service.was_notified("reader@example.com"));
        assert!(!service.was_notified("someone-else@example.com"));
        assert_eq!(
            service
                .get_notifications_for_document("https://example.com/doc/abc")
                .len(),
            1
        );
    }

    #[test]
    fn test_document_url_from_text_body() {
        let message = EmailMessage::new(
            "test@example.com".to_string(),
            "sender@folio.app".to_string(),
            "“Plan” published".to_string(),
            "\n\"Plan\" published\n\nOpen Document: https://example.com/doc/abc\n".to_string(),
        );

        let captured = CapturedEmail {
            message,
            receipt: EmailReceipt {
                message_id: "test".to_string(),
                sent_at: Utc::now(),
                provider: "test".to_string(),
                metadata: HashMap::new(),
            },
            captured_at: Utc::now(),
        };

        assert_eq!(
            captured.document_url(),
            Some("https://example.com/doc/abc".to_string())
        );
        assert_eq!(captured.diff_block_count(), 0);
    }

    #[tokio::test]
    async fn test_disabled_mock_service() {
        let service = MockEmailService::new_disabled();

        let receipt = service
            .send_document_notification("reader@example.com", &sample_props())
            .await
            .unwrap();

        assert!(receipt.message_id.starts_with("disabled-"));
        assert_eq!(receipt.provider, "mock-disabled");
        assert_eq!(service.email_count(), 0); // Email not captured when disabled
    }

    #[tokio::test]
    async fn test_invalid_recipient_is_rejected() {
        let service = MockEmailService::new();

        let result = service
            .send_document_notification("not-an-address", &sample_props())
            .await;

        assert!(matches!(result, Err(EmailError::Validation(_))));
        assert_eq!(service.email_count(), 0);
    }

    #[tokio::test]
    async fn test_health_check() {
        let service = MockEmailService::new();
        assert!(service.health_check().await.is_ok());
        assert_eq!(service.service_name(), "mock");
    }

    #[tokio::test]
    async fn test_clear() {
        let service = MockEmailService::new();
        service
            .send_document_notification("reader@example.com", &sample_props())
            .await
            .unwrap();
        assert_eq!(service.email_count(), 1);

        service.clear();
        assert_eq!(service.email_count(), 0);
        assert!(service.get_emails_for_recipient("reader@example.com").is_empty());
    }
}
