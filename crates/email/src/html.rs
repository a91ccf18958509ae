//! HTML escaping and trusted fragments
//!
//! Every string that reaches the HTML serializer is escaped unless it is
//! wrapped in [`TrustedHtml`]. Wrapping is the caller's explicit statement
//! that the markup came from a source it controls (e.g. the application's
//! own diff generator) and may be injected verbatim.

use std::fmt;

use serde::{Deserialize, Serialize};

/// HTML fragment injected into rendered output without escaping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrustedHtml(String);

impl TrustedHtml {
    /// Mark `html` as trusted markup.
    ///
    /// No sanitizing happens here; the caller is responsible for the content.
    pub fn new_unchecked(html: impl Into<String>) -> Self {
        Self(html.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for TrustedHtml {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Escape text content placed between tags.
pub fn escape_text(text: &str) -> String {
    html_escape::encode_text(text).into_owned()
}

/// Escape a value placed inside a double-quoted attribute.
pub fn escape_attribute(value: &str) -> String {
    html_escape::encode_double_quoted_attribute(value).into_owned()
}
