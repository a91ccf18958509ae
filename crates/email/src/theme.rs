//! Theme tokens for the content style sheet
//!
//! Field names double as placeholder names in the style sheet template, so
//! `code_border` is referenced as `{{code_border}}`.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::EmailError;

/// Design values substituted into [`crate::style::StyleSheet`].
///
/// Partial theme files are accepted; missing tokens keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub font_family: String,
    pub font_family_mono: String,
    pub font_weight: u16,
    pub notice_info_background: String,
    pub notice_info_text: String,
    pub notice_tip_background: String,
    pub notice_tip_text: String,
    pub notice_warning_background: String,
    pub notice_warning_text: String,
    pub link: String,
    pub slate: String,
    pub slate_light: String,
    pub horizontal_rule: String,
    pub code_border: String,
    pub code_background: String,
    pub text_highlight: String,
    pub text_highlight_foreground: String,
    pub text_secondary: String,
    pub table_divider: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            font_family: "-apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, Cantarell, 'Open Sans', 'Helvetica Neue', sans-serif".to_string(),
            font_family_mono: "'SFMono-Regular', Consolas, 'Liberation Mono', Menlo, Courier, monospace".to_string(),
            font_weight: 400,
            notice_info_background: "#F5BE31".to_string(),
            notice_info_text: "#111319".to_string(),
            notice_tip_background: "#9E5CF7".to_string(),
            notice_tip_text: "#FFFFFF".to_string(),
            notice_warning_background: "#FF5C80".to_string(),
            notice_warning_text: "#FFFFFF".to_string(),
            link: "#0366D6".to_string(),
            slate: "#9BA6B2".to_string(),
            slate_light: "#DAE1E9".to_string(),
            horizontal_rule: "#DAE1E9".to_string(),
            code_border: "#E8EBED".to_string(),
            code_background: "#F4F7FA".to_string(),
            text_highlight: "#FDEA9B".to_string(),
            text_highlight_foreground: "#111319".to_string(),
            text_secondary: "#4E5C6E".to_string(),
            table_divider: "#E8EBED".to_string(),
        }
    }
}

impl Theme {
    /// Load a theme from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, EmailError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            EmailError::Theme(format!("Failed to read {}: {}", path.display(), e))
        })?;

        serde_json::from_str(&raw)
            .map_err(|e| EmailError::Theme(format!("Failed to parse {}: {}", path.display(), e)))
    }

    /// Token name to value map used for placeholder substitution
    pub fn tokens(&self) -> HashMap<String, String> {
        let pairs: [(&str, String); 19] = [
            ("font_family", self.font_family.clone()),
            ("font_family_mono", self.font_family_mono.clone()),
            ("font_weight", self.font_weight.to_string()),
            ("notice_info_background", self.notice_info_background.clone()),
            ("notice_info_text", self.notice_info_text.clone()),
            ("notice_tip_background", self.notice_tip_background.clone()),
            ("notice_tip_text", self.notice_tip_text.clone()),
            (
                "notice_warning_background",
                self.notice_warning_background.clone(),
            ),
            ("notice_warning_text", self.notice_warning_text.clone()),
            ("link", self.link.clone()),
            ("slate", self.slate.clone()),
            ("slate_light", self.slate_light.clone()),
            ("horizontal_rule", self.horizontal_rule.clone()),
            ("code_border", self.code_border.clone()),
            ("code_background", self.code_background.clone()),
            ("text_highlight", self.text_highlight.clone()),
            (
                "text_highlight_foreground",
                self.text_highlight_foreground.clone(),
            ),
            ("text_secondary", self.text_secondary.clone()),
            ("table_divider", self.table_divider.clone()),
        ];

        pairs
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_tokens_cover_every_field() {
        let theme = Theme::default();
        let tokens = theme.tokens();

        assert_eq!(tokens.len(), 19);
        assert_eq!(tokens.get("font_weight"), Some(&"400".to_string()));
        assert_eq!(tokens.get("link"), Some(&theme.link));

        // Every serialized field must have a token of the same name
        let serialized = serde_json::to_value(&theme).unwrap();
        for key in serialized.as_object().unwrap().keys() {
            assert!(tokens.contains_key(key), "missing token for {}", key);
        }
    }

    #[test]
    fn test_partial_theme_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r##"{{ "link": "#FF0000", "font_weight": 500 }}"##).unwrap();

        let theme = Theme::from_file(file.path()).unwrap();
        assert_eq!(theme.link, "#FF0000");
        assert_eq!(theme.font_weight, 500);
        assert_eq!(theme.code_border, Theme::default().code_border);
    }

    #[test]
    fn test_missing_theme_file() {
        let result = Theme::from_file("/nonexistent/theme.json");
        assert!(matches!(result, Err(EmailError::Theme(_))));
    }

    #[test]
    fn test_malformed_theme_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let result = Theme::from_file(file.path());
        assert!(matches!(result, Err(EmailError::Theme(_))));
    }
}
