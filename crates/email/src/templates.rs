//! Email Templates
//!
//! Assembles rendered document notifications into sendable
//! [`EmailMessage`]s: subject, plain-text part, HTML part with the themed
//! content style sheet, and tracking metadata.

use crate::content::{
    document_notification_heading, document_notification_text, document_notification_tree,
};
use crate::layout::{render_document, Branding};
use crate::props::NotificationProps;
use crate::style::StyleSheet;
use crate::theme::Theme;
use crate::{single_line_header, EmailError, EmailMessage};

const TEMPLATE_VERSION: &str = "1.0";

/// Email template builder for document notifications
pub struct DocumentNotificationTemplate {
    props: NotificationProps,
    theme: Theme,
    branding: Branding,
    style_sheet: StyleSheet,
}

impl DocumentNotificationTemplate {
    /// Create a template with the default theme, branding and style sheet
    pub fn new(props: NotificationProps) -> Self {
        Self {
            props,
            theme: Theme::default(),
            branding: Branding::default(),
            style_sheet: StyleSheet::content(),
        }
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_branding(mut self, branding: Branding) -> Self {
        self.branding = branding;
        self
    }

    /// Replace the content style sheet (default: [`StyleSheet::content`])
    pub fn with_style_sheet(mut self, style_sheet: StyleSheet) -> Self {
        self.style_sheet = style_sheet;
        self
    }

    pub fn props(&self) -> &NotificationProps {
        &self.props
    }

    /// Subject line, identical to the HTML heading
    pub fn subject(&self) -> String {
        document_notification_heading(&self.props)
    }

    pub fn render_text(&self) -> String {
        document_notification_text(&self.props)
    }

    /// Render the complete HTML document.
    ///
    /// Fails only if the style sheet references a token the theme lacks.
    pub fn render_html(&self) -> Result<String, EmailError> {
        let css = self.style_sheet.render(&self.theme)?;
        let tree = document_notification_tree(&self.props);
        Ok(render_document(&tree, &css, &self.subject(), &self.branding))
    }

    /// Build the email message
    pub fn build(
        &self,
        recipient_email: String,
        from_email: String,
    ) -> Result<EmailMessage, EmailError> {
        tracing::debug!(
            document_url = %self.props.document_url(),
            event_name = %self.props.event_name,
            has_summary = self.props.summary.is_some(),
            "Rendering document notification"
        );

        if let Some(unsubscribe_url) = &self.props.unsubscribe_url {
            if unsubscribe_url.contains(['\r', '\n']) {
                return Err(EmailError::Validation(
                    "Unsubscribe URL contains a line break".to_string(),
                ));
            }
        }

        let body_html = self.render_html()?;
        let subject = single_line_header(&self.subject());

        let mut message =
            EmailMessage::new(recipient_email, from_email, subject, self.render_text())
                .with_html(body_html)
                .with_metadata(
                    "email_type".to_string(),
                    "document_notification".to_string(),
                )
                .with_metadata("event_name".to_string(), self.props.event_name.clone())
                .with_metadata("document_url".to_string(), self.props.document_url())
                .with_metadata(
                    "template_version".to_string(),
                    TEMPLATE_VERSION.to_string(),
                );

        if let Some(unsubscribe_url) = &self.props.unsubscribe_url {
            message = message
                .with_header("List-Unsubscribe".to_string(), format!("<{}>", unsubscribe_url))
                .with_header(
                    "List-Unsubscribe-Post".to_string(),
                    "List-Unsubscribe=One-Click".to_string(),
                );
        }

        Ok(message)
    }
}
