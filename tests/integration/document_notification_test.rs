//! Document Notification E2E Tests
//!
//! Drives the public email API the way the notification dispatcher does:
//! props arrive as JSON, are rendered through the configured service and
//! captured by the mock backend for inspection.

use folio_email::mock::MockEmailService;
use folio_email::{
    Actor, Collection, Document, EmailConfig, EmailService, EmailServiceFactory,
    NotificationProps, Team, Theme, TrustedHtml,
};

const TRACKED_LINK: &str = "https://example.com/doc/abc?ref=notification-email";

fn sample_props() -> NotificationProps {
    NotificationProps::new(
        Actor::new("Ava"),
        Team::new("https://example.com"),
        Document::new("Plan", "/doc/abc"),
        Collection::new("Eng"),
    )
}

#[test_log::test(tokio::test)]
async fn test_notification_from_dispatcher_json() -> anyhow::Result<()> {
    let payload = serde_json::json!({
        "actor": { "name": "Ava" },
        "team": { "url": "https://example.com" },
        "document": { "title": "Plan", "url": "/doc/abc" },
        "collection": { "name": "Eng" },
        "eventName": "updated",
        "summary": "<p>Budget <del>10</del><ins>12</ins></p>",
        "unsubscribeUrl": "https://example.com/api/notifications.unsubscribe?token=t1"
    });
    let props: NotificationProps = serde_json::from_value(payload)?;

    let service = MockEmailService::new();
    service
        .send_document_notification("reader@example.com", &props)
        .await?;

    let captured = service
        .get_latest_notification("reader@example.com")
        .expect("notification should be captured");

    assert_eq!(
        captured.message.body_text,
        "\n\"Plan\" updated\n\nAva updated the document \"Plan\", in the Eng collection.\n\nOpen Document: https://example.com/doc/abc\n"
    );
    assert!(!captured.message.body_text.contains("?ref=notification-email"));

    let html = captured.message.body_html.as_deref().unwrap_or_default();
    assert_eq!(captured.diff_block_count(), 1);
    assert_eq!(
        html.matches("<p>Budget <del>10</del><ins>12</ins></p>").count(),
        1
    );
    assert_eq!(html.matches(r#"class="empty-space""#).count(), 2);
    assert_eq!(
        html.matches(&format!(r#"href="{}""#, TRACKED_LINK)).count(),
        2,
        "diff block and button must both use the tracked link"
    );
    assert!(html.contains("Unsubscribe from these emails"));
    assert_eq!(
        captured.message.headers.get("List-Unsubscribe"),
        Some(&"<https://example.com/api/notifications.unsubscribe?token=t1>".to_string())
    );

    Ok(())
}

#[tokio::test]
async fn test_notification_without_summary() -> anyhow::Result<()> {
    let service = MockEmailService::new();
    service
        .send_document_notification("reader@example.com", &sample_props())
        .await?;

    let captured = service
        .get_latest_notification("reader@example.com")
        .expect("notification should be captured");
    let html = captured.message.body_html.as_deref().unwrap_or_default();

    assert_eq!(captured.diff_block_count(), 0);
    assert_eq!(html.matches(r#"class="empty-space""#).count(), 0);
    assert_eq!(html.matches(&format!(r#"href="{}""#, TRACKED_LINK)).count(), 1);
    assert!(html.contains("“Plan” published"));
    assert!(html.contains("Ava published the document \"Plan\", in the Eng collection."));
    assert!(captured.message.headers.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_rendering_is_deterministic() -> anyhow::Result<()> {
    let service = MockEmailService::new();
    let props = sample_props()
        .with_event_name("updated")
        .with_summary(TrustedHtml::new_unchecked("<p><ins>x</ins></p>"));

    service
        .send_document_notification("a@example.com", &props)
        .await?;
    service
        .send_document_notification("b@example.com", &props)
        .await?;

    let emails = service.get_notifications_for_document("https://example.com/doc/abc");
    assert_eq!(emails.len(), 2);
    assert_eq!(emails[0].message.body_text, emails[1].message.body_text);
    assert_eq!(emails[0].message.body_html, emails[1].message.body_html);

    Ok(())
}

#[tokio::test]
async fn test_factory_service_uses_configured_theme() -> anyhow::Result<()> {
    let config = EmailConfig {
        theme: Theme {
            table_divider: "#010203".to_string(),
            ..Theme::default()
        },
        ..EmailConfig::default()
    };

    let service = EmailServiceFactory::create(config)?;
    let receipt = service
        .send_document_notification("reader@example.com", &sample_props())
        .await?;

    assert_eq!(receipt.provider, "mock");
    assert_eq!(service.theme().table_divider, "#010203");

    Ok(())
}

#[tokio::test]
async fn test_disabled_service_skips_capture() -> anyhow::Result<()> {
    let config = EmailConfig {
        enabled: false,
        ..EmailConfig::default()
    };
    let service = EmailServiceFactory::create(config)?;

    let receipt = service
        .send_document_notification("reader@example.com", &sample_props())
        .await?;
    assert_eq!(receipt.provider, "mock-disabled");

    Ok(())
}
