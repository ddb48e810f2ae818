//! Builds an [`ElementSnapshot`] from static HTML.
//!
//! The browser capture reads computed styles from the live DOM. Server-side
//! there is no layout engine, so the inline `style` attribute stands in for
//! the computed values.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

use super::snapshot::{ChildElement, ElementSnapshot, ParentContext};

/// Style properties kept in a snapshot.
pub const TRACKED_STYLE_PROPERTIES: &[&str] = &[
    // Layout
    "display", "position", "top", "right", "bottom", "left", "z-index",
    "width", "height", "min-width", "min-height", "max-width", "max-height",
    "box-sizing",
    // Spacing
    "padding", "padding-top", "padding-right", "padding-bottom", "padding-left",
    "margin", "margin-top", "margin-right", "margin-bottom", "margin-left",
    // Typography
    "font-family", "font-size", "font-weight", "font-style", "line-height",
    "color", "text-align", "text-decoration", "text-transform",
    "letter-spacing", "word-spacing",
    // Background
    "background", "background-color", "background-image", "background-size",
    "background-position", "background-repeat",
    // Borders
    "border", "border-width", "border-style", "border-color", "border-radius",
    "border-top", "border-right", "border-bottom", "border-left",
    // Effects
    "box-shadow", "text-shadow", "opacity", "transform",
    // Flexbox
    "flex", "flex-direction", "flex-wrap", "justify-content", "align-items",
    "align-content", "gap",
    // Grid
    "grid", "grid-template-columns", "grid-template-rows", "grid-gap",
    // Other
    "overflow", "cursor", "transition", "animation",
];

static RE_TAILWIND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(bg-|text-|p-|m-|w-|h-|flex|grid|border|rounded|shadow|font-|leading-|tracking-|space-|gap-|justify-|items-|content-|self-|order-|col-|row-|transform|transition|duration-|ease-|scale-|rotate-|translate-|opacity-|z-|overflow-|cursor-|select-|pointer-|sr-|focus:|hover:|active:|disabled:|md:|lg:|xl:|2xl:|sm:)",
    )
    .unwrap()
});

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("No element matches selector '{0}'")]
    NotFound(String),
}

/// Keeps the classes that look like Tailwind utilities.
pub fn tailwind_classes<S: AsRef<str>>(classes: &[S]) -> Vec<String> {
    classes
        .iter()
        .map(AsRef::as_ref)
        .filter(|c| RE_TAILWIND.is_match(c))
        .map(str::to_string)
        .collect()
}

/// Parses a `style` attribute into property/value pairs.
pub fn parse_inline_style(css: &str) -> BTreeMap<String, String> {
    css.split(';')
        .filter_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            let name = name.trim().to_lowercase();
            let value = value.trim();
            if name.is_empty() || value.is_empty() {
                None
            } else {
                Some((name, value.to_string()))
            }
        })
        .collect()
}

/// Filters a style map to the tracked properties, dropping `normal` and `none`.
pub fn relevant_styles(styles: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    TRACKED_STYLE_PROPERTIES
        .iter()
        .filter_map(|prop| {
            let value = styles.get(*prop)?;
            (value != "normal" && value != "none").then(|| (prop.to_string(), value.clone()))
        })
        .collect()
}

/// Extracts the first element matching `selector` from an HTML document.
pub fn extract_from_html(html: &str, selector: &str) -> Result<ElementSnapshot, ExtractError> {
    let document = Html::parse_document(html);
    let selector_parsed = Selector::parse(selector).map_err(|e| ExtractError::InvalidSelector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })?;
    let element = document
        .select(&selector_parsed)
        .next()
        .ok_or_else(|| ExtractError::NotFound(selector.to_string()))?;

    Ok(snapshot_of(element))
}

fn snapshot_of(element: ElementRef<'_>) -> ElementSnapshot {
    let value = element.value();
    let css = value.attr("style").unwrap_or_default().to_string();
    let class_list: Vec<String> = value.classes().map(str::to_string).collect();

    let parent_context = element
        .parent()
        .and_then(ElementRef::wrap)
        .filter(|p| p.value().name() != "html")
        .map(|parent| {
            let styles = parse_inline_style(parent.value().attr("style").unwrap_or_default());
            ParentContext {
                tag_name: parent.value().name().to_uppercase(),
                class_list: parent.value().classes().map(str::to_string).collect(),
                display: styles.get("display").cloned(),
                flex_direction: styles.get("flex-direction").cloned(),
                justify_content: styles.get("justify-content").cloned(),
                align_items: styles.get("align-items").cloned(),
            }
        });

    let children = element
        .children()
        .filter_map(ElementRef::wrap)
        .map(|child| ChildElement {
            tag_name: child.value().name().to_uppercase(),
            class_list: child.value().classes().map(str::to_string).collect(),
            text_content: child.text().collect(),
            inner_html: child.inner_html(),
        })
        .collect();

    let attributes = value
        .attrs()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    ElementSnapshot {
        tag_name: value.name().to_uppercase(),
        text_content: element.text().collect(),
        computed_styles: relevant_styles(&parse_inline_style(&css)),
        tailwind_classes: tailwind_classes(&class_list),
        class_list,
        parent_context,
        children,
        inner_html: element.inner_html(),
        attributes,
        html: element.html(),
        css,
        ..Default::default()
    }
    .truncated()
}
