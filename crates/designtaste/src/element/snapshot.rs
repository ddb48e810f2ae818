use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Maximum characters of the element's text content.
pub const MAX_TEXT_CONTENT: usize = 500;
/// Maximum characters of the element's inner HTML.
pub const MAX_INNER_HTML: usize = 2000;
/// Maximum number of direct children kept.
pub const MAX_CHILDREN: usize = 10;
/// Maximum characters of a child's text content.
pub const MAX_CHILD_TEXT: usize = 100;
/// Maximum characters of a child's inner HTML.
pub const MAX_CHILD_HTML: usize = 500;

/// Viewport-relative rectangle of a captured element, in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// What the user asked for when capturing the element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestType {
    Inspiration,
    #[serde(other)]
    Other,
}

/// Layout context of the element's parent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParentContext {
    pub tag_name: String,
    pub class_list: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flex_direction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub justify_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align_items: Option<String>,
}

/// A direct child of the captured element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChildElement {
    pub tag_name: String,
    pub class_list: Vec<String>,
    pub text_content: String,
    #[serde(rename = "innerHTML")]
    pub inner_html: String,
}

/// Everything captured about a selected DOM element.
///
/// Every field is optional on input so that partial payloads such as
/// `{"tagName": "BUTTON"}` still parse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementSnapshot {
    pub tag_name: String,
    pub text_content: String,
    /// Computed style values keyed by CSS property name.
    pub computed_styles: BTreeMap<String, String>,
    pub class_list: Vec<String>,
    pub tailwind_classes: Vec<String>,
    pub parent_context: Option<ParentContext>,
    pub children: Vec<ChildElement>,
    #[serde(rename = "innerHTML")]
    pub inner_html: String,
    pub attributes: BTreeMap<String, String>,
    /// Outer HTML of the element.
    pub html: String,
    /// Inline `style` attribute.
    pub css: String,
    pub bounding_box: Option<BoundingBox>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element_screenshot: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_type: Option<RequestType>,
}

impl ElementSnapshot {
    /// Parses a snapshot from an arbitrary JSON value.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(value)
    }

    /// Looks up a non-empty computed style by CSS property name.
    ///
    /// Both `border-radius` and `borderRadius` spellings are accepted, in
    /// either the query or the stored keys.
    pub fn style(&self, property: &str) -> Option<&str> {
        let kebab = to_kebab_case(property);
        let camel = to_camel_case(&kebab);
        let found = [kebab.as_str(), camel.as_str()]
            .into_iter()
            .filter_map(|key| self.computed_styles.get(key))
            .map(|v| v.trim())
            .find(|v| !v.is_empty());
        found
    }

    /// Lowercased tag name.
    pub fn tag(&self) -> String {
        self.tag_name.to_lowercase()
    }

    /// Applies the storage size limits.
    pub fn truncated(mut self) -> Self {
        self.text_content = truncate_chars(&self.text_content, MAX_TEXT_CONTENT);
        self.inner_html = truncate_chars(&self.inner_html, MAX_INNER_HTML);
        self.children.truncate(MAX_CHILDREN);
        for child in &mut self.children {
            child.text_content = truncate_chars(&child.text_content, MAX_CHILD_TEXT);
            child.inner_html = truncate_chars(&child.inner_html, MAX_CHILD_HTML);
        }
        self
    }

    pub fn is_inspiration_request(&self) -> bool {
        self.request_type == Some(RequestType::Inspiration)
    }
}

/// Keeps at most `max` characters of `s`.
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

fn to_kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn to_camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for c in name.chars() {
        if c == '-' {
            upper = true;
        } else if upper {
            out.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
