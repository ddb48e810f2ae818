//! Builders for captured element payloads.

#![allow(dead_code)]

use std::collections::BTreeMap;

use serde_json::{json, Value};

/// Builds the JSON a browser capture would send as `elementData`.
#[derive(Debug, Clone, Default)]
pub struct SnapshotBuilder {
    tag_name: String,
    text_content: String,
    class_list: Vec<String>,
    styles: BTreeMap<String, String>,
    html: String,
}

impl SnapshotBuilder {
    pub fn new(tag_name: &str) -> Self {
        Self {
            tag_name: tag_name.to_string(),
            ..Default::default()
        }
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text_content = text.to_string();
        self
    }

    pub fn class(mut self, class: &str) -> Self {
        self.class_list.push(class.to_string());
        self
    }

    pub fn style(mut self, property: &str, value: &str) -> Self {
        self.styles.insert(property.to_string(), value.to_string());
        self
    }

    pub fn html(mut self, html: &str) -> Self {
        self.html = html.to_string();
        self
    }

    /// A button with every style the critique looks at set to a good value.
    pub fn polished_button() -> Self {
        Self::new("BUTTON")
            .text("Get started")
            .class("btn-primary")
            .style("color", "rgb(255, 255, 255)")
            .style("background-color", "rgb(37, 99, 235)")
            .style("padding", "12px 24px")
            .style("margin", "8px")
            .style("border-radius", "12px")
            .style("font-weight", "600")
    }

    pub fn build(self) -> Value {
        json!({
            "tagName": self.tag_name,
            "textContent": self.text_content,
            "classList": self.class_list,
            "computedStyles": self.styles,
            "html": self.html,
            "innerHTML": "",
            "attributes": {},
            "children": []
        })
    }
}
