//! Email layout tree
//!
//! Templates describe an email as a small tree of immutable [`Node`]s and
//! the serializer in this module turns that tree into table-based HTML that
//! survives common mail clients. Plain strings are always escaped; only
//! [`TrustedHtml`] is written verbatim.

use serde::{Deserialize, Serialize};

use crate::html::{escape_attribute, escape_text, TrustedHtml};

/// Product identity shown in the header and footer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branding {
    pub product_name: String,
    pub site_url: String,
    pub logo_url: String,
}

impl Branding {
    pub fn new(product_name: impl Into<String>, site_url: impl Into<String>) -> Self {
        let site_url = site_url.into();
        Self {
            product_name: product_name.into(),
            logo_url: format!("{}/email/icon.png", site_url.trim_end_matches('/')),
            site_url,
        }
    }

    pub fn with_logo_url(mut self, logo_url: impl Into<String>) -> Self {
        self.logo_url = logo_url.into();
        self
    }
}

impl Default for Branding {
    fn default() -> Self {
        Self::new("Folio", "https://folio.app")
    }
}

/// One element of an email layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Outer wrapper; children are stacked vertically
    Layout(Vec<Node>),
    Header,
    Body(Vec<Node>),
    Heading(String),
    Paragraph(Vec<Node>),
    Text(String),
    /// Fixed-height vertical gap, in pixels
    EmptySpace { height: u32 },
    /// Linked preview of a document change
    Diff { href: String, content: TrustedHtml },
    Button { href: String, label: String },
    Footer { unsubscribe_url: Option<String> },
}

impl Node {
    /// Visit this node and all descendants depth-first
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        if let Node::Layout(children) | Node::Body(children) | Node::Paragraph(children) = self {
            for child in children {
                child.walk(visit);
            }
        }
    }

    /// Count nodes in the tree matching `predicate`
    pub fn count(&self, predicate: impl Fn(&Node) -> bool) -> usize {
        let mut count = 0;
        self.walk(&mut |node| {
            if predicate(node) {
                count += 1;
            }
        });
        count
    }

    /// Serialize the tree into an HTML fragment
    pub fn to_html(&self, branding: &Branding) -> String {
        let mut out = String::new();
        self.write_html(&mut out, branding);
        out
    }

    fn write_children(children: &[Node], out: &mut String, branding: &Branding) {
        for child in children {
            child.write_html(out, branding);
        }
    }

    fn write_html(&self, out: &mut String, branding: &Branding) {
        match self {
            Node::Layout(children) => {
                out.push_str(
                    r#"<table class="layout" width="100%" cellpadding="0" cellspacing="0" border="0"><tr><td align="center"><div style="max-width: 600px; margin: 0 auto; padding: 20px;">"#,
                );
                Self::write_children(children, out, branding);
                out.push_str("</div></td></tr></table>");
            }
            Node::Header => {
                out.push_str(&format!(
                    r#"<div class="header" style="padding: 24px 0;"><a href="{site}"><img src="{logo}" alt="{name}" height="48" width="48" /></a></div>"#,
                    site = escape_attribute(&branding.site_url),
                    logo = escape_attribute(&branding.logo_url),
                    name = escape_attribute(&branding.product_name),
                ));
            }
            Node::Body(children) => {
                out.push_str(r#"<div class="body">"#);
                Self::write_children(children, out, branding);
                out.push_str("</div>");
            }
            Node::Heading(text) => {
                out.push_str(&format!("<h1>{}</h1>", escape_text(text)));
            }
            Node::Paragraph(children) => {
                out.push_str("<p>");
                Self::write_children(children, out, branding);
                out.push_str("</p>");
            }
            Node::Text(text) => out.push_str(&escape_text(text)),
            Node::EmptySpace { height } => {
                out.push_str(&format!(
                    r#"<table class="empty-space" width="100%" cellpadding="0" cellspacing="0" border="0"><tr><td style="height: {height}px; line-height: {height}px; font-size: 1px;">&nbsp;</td></tr></table>"#,
                    height = height
                ));
            }
            Node::Diff { href, content } => {
                // Summaries carry their own links, so the tracked link sits
                // beside the content rather than around it
                out.push_str(
                    r#"<div class="diff" style="padding: 0 8px; border-left: 3px solid #DAE1E9;"><div>"#,
                );
                out.push_str(content.as_str());
                out.push_str(&format!(
                    r#"</div><a class="diff-link" href="{}" style="font-size: 13px;">View changes</a></div>"#,
                    escape_attribute(href)
                ));
            }
            Node::Button { href, label } => {
                out.push_str(&format!(
                    r#"<a class="button" href="{}" style="display: inline-block; padding: 10px 20px; color: #FFFFFF; background: #0366D6; border-radius: 4px; font-weight: 500; text-decoration: none;">{}</a>"#,
                    escape_attribute(href),
                    escape_text(label)
                ));
            }
            Node::Footer { unsubscribe_url } => {
                out.push_str(&format!(
                    r#"<div class="footer" style="padding: 20px 0; color: #9BA6B2; font-size: 12px;"><a href="{site}" style="color: #9BA6B2;">{name}</a>"#,
                    site = escape_attribute(&branding.site_url),
                    name = escape_text(&branding.product_name),
                ));
                if let Some(url) = unsubscribe_url {
                    out.push_str(&format!(
                        r#" &middot; <a class="unsubscribe" href="{}" style="color: #9BA6B2;">Unsubscribe from these emails</a>"#,
                        escape_attribute(url)
                    ));
                }
                out.push_str("</div>");
            }
        }
    }
}

/// Wrap a serialized tree into a complete HTML document with an embedded
/// style sheet.
pub fn render_document(root: &Node, css: &str, title: &str, branding: &Branding) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<style>{css}</style>
</head>
<body>
{body}
</body>
</html>
"#,
        title = escape_text(title),
        css = css,
        body = root.to_html(branding)
    )
}
