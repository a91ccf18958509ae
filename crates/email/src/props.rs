//! Document notification input
//!
//! The props are built once per send event by the dispatcher and discarded
//! after rendering. Optional fields are resolved to their defaults when the
//! value is constructed, so renderers never branch on "unset".

use serde::{Deserialize, Serialize};

use crate::html::TrustedHtml;

/// Event name used when the dispatcher does not supply one.
pub const DEFAULT_EVENT_NAME: &str = "published";

/// Query suffix appended to links so the app can attribute visits to this email.
pub const NOTIFICATION_REF: &str = "?ref=notification-email";

/// User who triggered the event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub name: String,
}

/// Team owning the document; `url` is the absolute base for links
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub url: String,
}

/// Document the event happened on; `url` is relative to the team
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub name: String,
}

impl Actor {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Team {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl Document {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }
}

impl Collection {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

fn default_event_name() -> String {
    DEFAULT_EVENT_NAME.to_string()
}

/// Everything needed to render one document notification.
///
/// `event_name` is free-form text ("published", "updated", ...); no closed
/// set is enforced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationProps {
    pub actor: Actor,
    pub team: Team,
    pub document: Document,
    pub collection: Collection,
    #[serde(
        default = "default_event_name",
        deserialize_with = "deserialize_event_name"
    )]
    pub event_name: String,
    #[serde(default, deserialize_with = "deserialize_summary")]
    pub summary: Option<TrustedHtml>,
    #[serde(default)]
    pub unsubscribe_url: Option<String>,
}

/// Treats `null` the same as an absent event name.
fn deserialize_event_name<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let event_name = Option::<String>::deserialize(deserializer)?;
    Ok(event_name.unwrap_or_else(default_event_name))
}

/// Treats `""` the same as an absent summary.
fn deserialize_summary<'de, D>(deserializer: D) -> Result<Option<TrustedHtml>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let summary = Option::<TrustedHtml>::deserialize(deserializer)?;
    Ok(summary.filter(|s| !s.is_empty()))
}

impl NotificationProps {
    /// Create props with the default event name and no summary.
    pub fn new(actor: Actor, team: Team, document: Document, collection: Collection) -> Self {
        Self {
            actor,
            team,
            document,
            collection,
            event_name: default_event_name(),
            summary: None,
            unsubscribe_url: None,
        }
    }

    /// Set the event name (e.g. "updated")
    pub fn with_event_name(mut self, event_name: impl Into<String>) -> Self {
        self.event_name = event_name.into();
        self
    }

    /// Attach a diff summary. An empty fragment clears it.
    pub fn with_summary(mut self, summary: TrustedHtml) -> Self {
        self.summary = Some(summary).filter(|s| !s.is_empty());
        self
    }

    pub fn with_unsubscribe_url(mut self, unsubscribe_url: impl Into<String>) -> Self {
        self.unsubscribe_url = Some(unsubscribe_url.into());
        self
    }

    /// Absolute document link without tracking, used by the plain-text body.
    pub fn document_url(&self) -> String {
        format!("{}{}", self.team.url, self.document.url)
    }

    /// Absolute document link with the notification ref, used by HTML links.
    pub fn tracked_url(&self) -> String {
        format!("{}{}", self.document_url(), NOTIFICATION_REF)
    }

    /// Sentence shared by the text and HTML bodies.
    pub(crate) fn description(&self) -> String {
        format!(
            "{} {} the document \"{}\", in the {} collection.",
            self.actor.name, self.event_name, self.document.title, self.collection.name
        )
    }
}
