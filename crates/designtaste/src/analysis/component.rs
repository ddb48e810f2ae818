use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::element::ElementSnapshot;

/// Kind of UI component an element represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentType {
    Hero,
    Card,
    Form,
    Navigation,
    Button,
    Footer,
    Sidebar,
    Layout,
}

impl ComponentType {
    pub const ALL: [ComponentType; 8] = [
        ComponentType::Hero,
        ComponentType::Card,
        ComponentType::Form,
        ComponentType::Navigation,
        ComponentType::Button,
        ComponentType::Footer,
        ComponentType::Sidebar,
        ComponentType::Layout,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentType::Hero => "hero",
            ComponentType::Card => "card",
            ComponentType::Form => "form",
            ComponentType::Navigation => "navigation",
            ComponentType::Button => "button",
            ComponentType::Footer => "footer",
            ComponentType::Sidebar => "sidebar",
            ComponentType::Layout => "layout",
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown component type '{}'", s))
    }
}

/// A single detection rule. Any of the three conditions matches.
struct Rule {
    tags: &'static [&'static str],
    text: &'static [&'static str],
    class: &'static [&'static str],
    component: ComponentType,
}

/// Evaluated top to bottom; the first matching rule wins.
const RULES: &[Rule] = &[
    Rule {
        tags: &["nav"],
        text: &["menu"],
        class: &["nav"],
        component: ComponentType::Navigation,
    },
    Rule {
        tags: &["header"],
        text: &["hero"],
        class: &["hero"],
        component: ComponentType::Hero,
    },
    Rule {
        tags: &["footer"],
        text: &[],
        class: &["footer"],
        component: ComponentType::Footer,
    },
    Rule {
        tags: &["form"],
        text: &["submit"],
        class: &["form"],
        component: ComponentType::Form,
    },
    Rule {
        tags: &["button"],
        text: &[],
        class: &["btn", "button"],
        component: ComponentType::Button,
    },
    Rule {
        tags: &["article", "section"],
        text: &[],
        class: &["card"],
        component: ComponentType::Card,
    },
    Rule {
        tags: &["aside"],
        text: &[],
        class: &["sidebar"],
        component: ComponentType::Sidebar,
    },
];

/// Classifies an element. Matching is case-insensitive; the class
/// haystack is the class list together with the outer HTML.
pub fn detect_component_type(snapshot: &ElementSnapshot) -> ComponentType {
    let tag = snapshot.tag();
    let text = snapshot.text_content.to_lowercase();
    let class = format!("{} {}", snapshot.class_list.join(" "), snapshot.html).to_lowercase();

    RULES
        .iter()
        .find(|rule| {
            rule.tags.contains(&tag.as_str())
                || rule.text.iter().any(|t| text.contains(t))
                || rule.class.iter().any(|c| class.contains(c))
        })
        .map(|rule| rule.component)
        .unwrap_or(ComponentType::Layout)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(tag: &str, text: &str, classes: &[&str]) -> ElementSnapshot {
        ElementSnapshot {
            tag_name: tag.to_string(),
            text_content: text.to_string(),
            class_list: classes.iter().map(|c| c.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_tags() {
        let cases = [
            ("NAV", ComponentType::Navigation),
            ("HEADER", ComponentType::Hero),
            ("FOOTER", ComponentType::Footer),
            ("FORM", ComponentType::Form),
            ("BUTTON", ComponentType::Button),
            ("ARTICLE", ComponentType::Card),
            ("SECTION", ComponentType::Card),
            ("ASIDE", ComponentType::Sidebar),
            ("DIV", ComponentType::Layout),
        ];
        for (tag, expected) in cases {
            assert_eq!(detect_component_type(&snapshot(tag, "", &[])), expected, "{}", tag);
        }
    }

    #[test]
    fn test_priority_order() {
        // nav class beats card class
        let s = snapshot("DIV", "", &["card", "navbar"]);
        assert_eq!(detect_component_type(&s), ComponentType::Navigation);

        // "submit" text on a button is a form
        let s = snapshot("BUTTON", "Submit order", &[]);
        assert_eq!(detect_component_type(&s), ComponentType::Form);

        // menu text wins over header tag
        let s = snapshot("HEADER", "Open Menu", &[]);
        assert_eq!(detect_component_type(&s), ComponentType::Navigation);
    }

    #[test]
    fn test_outer_html_counts_as_class() {
        let s = ElementSnapshot {
            tag_name: "DIV".to_string(),
            html: r#"<div class="Product-Card">x</div>"#.to_string(),
            ..Default::default()
        };
        assert_eq!(detect_component_type(&s), ComponentType::Card);
    }

    #[test]
    fn test_empty_snapshot_is_layout() {
        assert_eq!(
            detect_component_type(&ElementSnapshot::default()),
            ComponentType::Layout
        );
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("Hero".parse::<ComponentType>().unwrap(), ComponentType::Hero);
        assert!("widget".parse::<ComponentType>().is_err());
        assert_eq!(ComponentType::Navigation.to_string(), "navigation");
        assert_eq!(
            serde_json::to_value(ComponentType::Sidebar).unwrap(),
            serde_json::json!("sidebar")
        );
    }
}
