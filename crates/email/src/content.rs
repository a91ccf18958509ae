//! Document notification content
//!
//! Canonical text and layout generators for the document notification
//! email. Both are pure functions of [`NotificationProps`].

use crate::layout::Node;
use crate::props::NotificationProps;

/// Height of the spacers around the diff block, in pixels
const DIFF_SPACING: u32 = 20;

/// Generate the plain-text body.
///
/// Output is for plain-text MIME parts only and is not escaped. Links are
/// left untracked.
pub fn document_notification_text(props: &NotificationProps) -> String {
    format!(
        "\n\"{title}\" {event}\n\n{description}\n\nOpen Document: {url}\n",
        title = props.document.title,
        event = props.event_name,
        description = props.description(),
        url = props.document_url(),
    )
}

/// Heading shown at the top of the HTML body, with curly quotes.
pub fn document_notification_heading(props: &NotificationProps) -> String {
    format!("\u{201c}{}\u{201d} {}", props.document.title, props.event_name)
}

/// Build the layout tree for the HTML body.
pub fn document_notification_tree(props: &NotificationProps) -> Node {
    let link = props.tracked_url();

    let mut body = vec![
        Node::Heading(document_notification_heading(props)),
        Node::Paragraph(vec![Node::Text(props.description())]),
    ];

    if let Some(summary) = &props.summary {
        body.push(Node::EmptySpace {
            height: DIFF_SPACING,
        });
        body.push(Node::Diff {
            href: link.clone(),
            content: summary.clone(),
        });
        body.push(Node::EmptySpace {
            height: DIFF_SPACING,
        });
    }

    body.push(Node::Paragraph(vec![Node::Button {
        href: link,
        label: "Open Document".to_string(),
    }]));

    Node::Layout(vec![
        Node::Header,
        Node::Body(body),
        Node::Footer {
            unsubscribe_url: props.unsubscribe_url.clone(),
        },
    ])
}
