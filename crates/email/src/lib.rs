//! Folio Email Service
//!
//! Renders the document notification email and hands it to a delivery
//! backend:
//! - Plain-text and HTML variants built from [`props::NotificationProps`]
//! - Theme-driven style sheet for embedded document content
//! - Mock email service for testing and development

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod content;
pub mod html;
pub mod layout;
pub mod mock;
pub mod props;
pub mod style;
pub mod templates;
pub mod theme;

pub use html::TrustedHtml;
pub use layout::{Branding, Node};
pub use props::{Actor, Collection, Document, NotificationProps, Team};
pub use style::StyleSheet;
pub use templates::DocumentNotificationTemplate;
pub use theme::Theme;

#[derive(Error, Debug)]
pub enum EmailError {
    #[error("Email configuration error: {0}")]
    Configuration(String),

    #[error("Email validation error: {0}")]
    Validation(String),

    #[error("Email template error: {0}")]
    Template(String),

    #[error("Email theme error: {0}")]
    Theme(String),
}

/// Email message to be sent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailMessage {
    pub to: String,
    pub from: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub body_text: String,
    pub body_html: Option<String>,
    /// Extra MIME headers, e.g. `List-Unsubscribe`
    pub headers: HashMap<String, String>,
    pub metadata: HashMap<String, String>,
}

impl EmailMessage {
    /// Create a new email message
    pub fn new(to: String, from: String, subject: String, body_text: String) -> Self {
        Self {
            to,
            from,
            reply_to: None,
            subject,
            body_text,
            body_html: None,
            headers: HashMap::new(),
            metadata: HashMap::new(),
        }
    }

    /// Add HTML body content
    pub fn with_html(mut self, body_html: String) -> Self {
        self.body_html = Some(body_html);
        self
    }

    /// Add reply-to address
    pub fn with_reply_to(mut self, reply_to: String) -> Self {
        self.reply_to = Some(reply_to);
        self
    }

    /// Add a MIME header
    pub fn with_header(mut self, name: String, value: String) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Add metadata for tracking
    pub fn with_metadata(mut self, key: String, value: String) -> Self {
        self.metadata.insert(key, value);
        self
    }

    /// Reject malformed addresses and header fields carrying line breaks
    pub fn validate(&self) -> Result<(), EmailError> {
        if !self.to.contains('@') || !self.from.contains('@') {
            return Err(EmailError::Validation(
                "Invalid email address format".to_string(),
            ));
        }

        let fields = [
            ("to", self.to.as_str()),
            ("from", self.from.as_str()),
            ("reply_to", self.reply_to.as_deref().unwrap_or_default()),
            ("subject", self.subject.as_str()),
        ];
        for (field, value) in fields {
            if has_line_break(value) {
                return Err(EmailError::Validation(format!(
                    "Line break in {} header",
                    field
                )));
            }
        }

        for (name, value) in &self.headers {
            if has_line_break(name) || has_line_break(value) {
                return Err(EmailError::Validation(format!(
                    "Line break in {} header",
                    name.trim()
                )));
            }
        }

        Ok(())
    }
}

fn has_line_break(value: &str) -> bool {
    value.contains(['\r', '\n'])
}

/// Collapse CR/LF runs into single spaces so `value` fits on one header line
pub fn single_line_header(value: &str) -> String {
    value
        .split(['\r', '\n'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Email delivery receipt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailReceipt {
    pub message_id: String,
    pub sent_at: DateTime<Utc>,
    pub provider: String,
    pub metadata: HashMap<String, String>,
}

/// Email service configuration
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// Email service provider (mock)
    pub provider: String,
    /// Default from address
    pub default_from: String,
    /// Enable email sending (can disable for testing)
    pub enabled: bool,
    /// Base URL for the application
    pub app_base_url: String,
    /// Header/footer identity
    pub branding: Branding,
    /// Tokens for the content style sheet
    pub theme: Theme,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            provider: "mock".to_string(),
            default_from: "notifications@folio.app".to_string(),
            enabled: true,
            app_base_url: "https://folio.app".to_string(),
            branding: Branding::default(),
            theme: Theme::default(),
        }
    }
}

impl EmailConfig {
    /// Create email config from environment variables
    pub fn from_env() -> Result<Self, EmailError> {
        dotenvy::dotenv().ok();

        let provider = std::env::var("EMAIL_PROVIDER").unwrap_or_else(|_| "mock".to_string());

        let default_from =
            std::env::var("FROM_EMAIL").unwrap_or_else(|_| "notifications@folio.app".to_string());

        let enabled = std::env::var("EMAIL_ENABLED")
            .unwrap_or_else(|_| "true".to_string())
            .parse()
            .unwrap_or(true);

        let app_base_url =
            std::env::var("APP_BASE_URL").unwrap_or_else(|_| "https://folio.app".to_string());

        let product_name =
            std::env::var("EMAIL_PRODUCT_NAME").unwrap_or_else(|_| "Folio".to_string());

        let mut branding = Branding::new(product_name, app_base_url.clone());
        if let Ok(logo_url) = std::env::var("EMAIL_LOGO_URL") {
            branding = branding.with_logo_url(logo_url);
        }

        let theme = match std::env::var("EMAIL_THEME_PATH") {
            Ok(path) => Theme::from_file(path)?,
            Err(_) => Theme::default(),
        };

        Ok(Self {
            provider,
            default_from,
            enabled,
            app_base_url,
            branding,
            theme,
        })
    }
}

/// Email service trait for different implementations
#[async_trait::async_trait]
pub trait EmailService: Send + Sync {
    /// Send an email message
    async fn send_email(&self, message: EmailMessage) -> Result<EmailReceipt, EmailError>;

    /// Return the default "from" address for outgoing emails
    fn default_from(&self) -> String;

    /// Header/footer identity used when rendering
    fn branding(&self) -> &Branding;

    /// Theme used for the content style sheet
    fn theme(&self) -> &Theme;

    fn service_name(&self) -> &'static str;

    async fn health_check(&self) -> Result<(), EmailError> {
        Ok(())
    }

    /// Render and send a document notification
    async fn send_document_notification(
        &self,
        recipient_email: &str,
        props: &NotificationProps,
    ) -> Result<EmailReceipt, EmailError> {
        let message = DocumentNotificationTemplate::new(props.clone())
            .with_theme(self.theme().clone())
            .with_branding(self.branding().clone())
            .build(recipient_email.to_string(), self.default_from())?;

        self.send_email(message).await
    }
}

/// Email service factory
pub struct EmailServiceFactory;

impl EmailServiceFactory {
    /// Create email service based on configuration
    pub fn create(config: EmailConfig) -> Result<Box<dyn EmailService>, EmailError> {
        if !config.enabled {
            tracing::info!("Email service disabled, using disabled mock implementation");
            return Ok(Box::new(mock::MockEmailService::from_config(config)));
        }

        match config.provider.as_str() {
            "mock" => {
                tracing::info!("Creating mock email service");
                Ok(Box::new(mock::MockEmailService::from_config(config)))
            }
            provider => Err(EmailError::Configuration(format!(
                "Unknown email provider: {}. Supported providers: mock",
                provider
            ))),
        }
    }
}
