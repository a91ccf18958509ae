//! Content style sheet
//!
//! CSS applied to rich document content embedded in emails (the diff
//! summary in particular). The template references theme tokens as
//! `{{token_name}}`; rendering fails if any placeholder is left unresolved.

use std::borrow::Cow;
use std::collections::{BTreeSet, HashMap};

use regex::{Captures, Regex};

use crate::theme::Theme;
use crate::EmailError;

lazy_static::lazy_static! {
    /// `{{ ... }}` placeholder, whitespace inside the braces is ignored
    static ref PLACEHOLDER_REGEX: Regex =
        Regex::new(r"\{\{\s*([^{}]*?)\s*\}\}").unwrap();

    /// Names a placeholder may resolve to; anything else is malformed
    static ref TOKEN_NAME_REGEX: Regex =
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
}

const CONTENT_CSS: &str = r#"
body {
  font-family: {{font_family}};
  font-weight: {{font_weight}};
  font-size: 1em;
  line-height: 1.7em;
}

pre {
  white-space: pre-wrap;
}

img {
  text-align: center;
  max-width: 100%;
  max-height: 75vh;
  clear: both;
}

img.image-right-50 {
  float: right;
  width: 50%;
  margin-left: 2em;
  margin-bottom: 1em;
  clear: initial;
}

img.image-left-50 {
  float: left;
  width: 50%;
  margin-right: 2em;
  margin-bottom: 1em;
  clear: initial;
}

h1,
h2,
h3,
h4,
h5,
h6 {
  margin: 1em 0 0.5em;
  font-weight: 500;
}

.notice {
  display: flex;
  align-items: center;
  background: {{notice_info_background}};
  color: {{notice_info_text}};
  border-radius: 4px;
  padding: 8px 16px;
  margin: 8px 0;
}

.notice-tip {
  background: {{notice_tip_background}};
  color: {{notice_tip_text}};
}

.notice-warning {
  background: {{notice_warning_background}};
  color: {{notice_warning_text}};
}

b,
strong {
  font-weight: 600;
}

p {
  margin: 0;
}

a {
  color: {{link}};
}

ins {
  background-color: #128a2929;
  text-decoration: none;
}

del {
  background-color: {{slate_light}};
  color: {{slate}};
  text-decoration: line-through;
}

hr {
  position: relative;
  height: 1em;
  border: 0;
}

hr:before {
  content: "";
  display: block;
  position: absolute;
  border-top: 1px solid {{horizontal_rule}};
  top: 0.5em;
  left: 0;
  right: 0;
}

hr.page-break {
  page-break-after: always;
}

hr.page-break:before {
  border-top: 1px dashed {{horizontal_rule}};
}

code {
  border-radius: 4px;
  border: 1px solid {{code_border}};
  padding: 3px 4px;
  font-family: {{font_family_mono}};
  font-size: 85%;
}

mark {
  border-radius: 1px;
  color: {{text_highlight_foreground}};
  background: {{text_highlight}};
}

mark a {
  color: {{text_highlight_foreground}};
}

ul {
  padding-left: 0;
}

.checkbox-list-item {
  list-style: none;
  padding: 4px 0;
  margin: 0;
}

.checkbox {
  font-size: 0;
  display: block;
  float: left;
  white-space: nowrap;
  width: 12px;
  height: 12px;
  margin-top: 2px;
  margin-right: 8px;
  border: 1px solid {{text_secondary}};
  border-radius: 3px;
}

pre {
  display: block;
  overflow-x: auto;
  padding: 0.75em 1em;
  line-height: 1.4em;
  position: relative;
  background: {{code_background}};
  border-radius: 4px;
  border: 1px solid {{code_border}};
  -webkit-font-smoothing: initial;
  font-family: {{font_family_mono}};
  font-size: 13px;
  direction: ltr;
  text-align: left;
  white-space: pre;
  word-spacing: normal;
  word-break: normal;
  -moz-tab-size: 4;
  -o-tab-size: 4;
  tab-size: 4;
  -webkit-hyphens: none;
  -moz-hyphens: none;
  -ms-hyphens: none;
  hyphens: none;
  margin: 0;
}

pre code {
  font-size: 13px;
  background: none;
  padding: 0;
  border: 0;
}

table {
  width: 100%;
  border-collapse: collapse;
  border-radius: 4px;
  margin-top: 1em;
  box-sizing: border-box;
}

table * {
  box-sizing: border-box;
}

table tr {
  position: relative;
  border-bottom: 1px solid {{table_divider}};
}

table td,
table th {
  position: relative;
  vertical-align: top;
  border: 1px solid {{table_divider}};
  padding: 4px 8px;
  min-width: 100px;
}
"#;

/// CSS template with theme placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleSheet {
    template: Cow<'static, str>,
}

impl Default for StyleSheet {
    fn default() -> Self {
        Self::content()
    }
}

impl StyleSheet {
    /// Style sheet for embedded document content
    pub fn content() -> Self {
        Self {
            template: Cow::Borrowed(CONTENT_CSS),
        }
    }

    /// Custom template using the same `{{token}}` syntax
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: Cow::Owned(template.into()),
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Distinct placeholder names, in order of first appearance
    pub fn placeholders(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        PLACEHOLDER_REGEX
            .captures_iter(&self.template)
            .map(|caps| caps[1].to_string())
            .filter(|name| seen.insert(name.clone()))
            .collect()
    }

    /// Substitute theme tokens
    pub fn render(&self, theme: &Theme) -> Result<String, EmailError> {
        self.render_with(&theme.tokens())
    }

    /// Substitute an arbitrary token map.
    ///
    /// Fails with [`EmailError::Template`] naming every placeholder that is
    /// malformed or has no value, and when stray `{{`/`}}` delimiters remain,
    /// so a successful result never contains `{{...}}`.
    pub fn render_with(&self, tokens: &HashMap<String, String>) -> Result<String, EmailError> {
        let mut missing = BTreeSet::new();
        let mut malformed = BTreeSet::new();

        let rendered = PLACEHOLDER_REGEX.replace_all(&self.template, |caps: &Captures| {
            let name = &caps[1];
            if !TOKEN_NAME_REGEX.is_match(name) {
                malformed.insert(name.to_string());
                return caps[0].to_string();
            }
            match tokens.get(name) {
                Some(value) => value.clone(),
                None => {
                    missing.insert(name.to_string());
                    caps[0].to_string()
                }
            }
        });

        let mut problems = Vec::new();
        if !malformed.is_empty() {
            let names: Vec<String> = malformed.into_iter().collect();
            problems.push(format!("Malformed style sheet tokens: {}", names.join(", ")));
        }
        if !missing.is_empty() {
            let names: Vec<String> = missing.into_iter().collect();
            problems.push(format!("Unresolved style sheet tokens: {}", names.join(", ")));
        }
        if problems.is_empty() && (rendered.contains("{{") || rendered.contains("}}")) {
            problems.push("Unbalanced placeholder delimiters in style sheet".to_string());
        }

        if !problems.is_empty() {
            return Err(EmailError::Template(problems.join("; ")));
        }

        Ok(rendered.into_owned())
    }
}
