//! Deterministic answers used when no provider can be reached.

use super::parser::ParsedCode;
use super::service::{ComponentCode, ElementSuggestion, Variation};

const FORM_TAILWIND: &str = include_str!("templates/form.tailwind.html");
const FORM_REACT: &str = include_str!("templates/form.react.tsx");
const FORM_CSS: &str = include_str!("templates/form.styles.css");
const BUTTON_TAILWIND: &str = include_str!("templates/button.tailwind.html");
const BUTTON_REACT: &str = include_str!("templates/button.react.tsx");
const BUTTON_CSS: &str = include_str!("templates/button.styles.css");

pub const VARIATION_PHOTOS: [&str; 2] = ["1581291518857-4e27b48ff24e", "1559028006-448665bd7c7f"];

pub fn variation_image_url(index: usize) -> String {
    let photo = VARIATION_PHOTOS[index.min(1)];
    format!(
        "https://images.unsplash.com/photo-{}?ixlib=rb-4.0.3&auto=format&fit=crop&w=800&q=80",
        photo
    )
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Template component for `form`; every other type gets the button.
pub fn component_code(component_type: &str) -> ComponentCode {
    match component_type {
        "form" => ComponentCode {
            tailwind_code: FORM_TAILWIND.trim_end().to_string(),
            react_code: FORM_REACT.trim_end().to_string(),
            css_code: FORM_CSS.trim_end().to_string(),
            description: "A clean, modern email form with focus states and hover effects".to_string(),
            features: strings(&["Responsive design", "Focus states", "Hover effects", "Clean typography"]),
            accessibility: strings(&[
                "Proper labels",
                "Focus indicators",
                "ARIA attributes",
                "Keyboard navigation",
            ]),
            responsive: true,
            animations: strings(&["Hover transitions", "Focus ring"]),
        },
        _ => ComponentCode {
            tailwind_code: BUTTON_TAILWIND.trim_end().to_string(),
            react_code: BUTTON_REACT.trim_end().to_string(),
            css_code: BUTTON_CSS.trim_end().to_string(),
            description: "A modern button with hover effects and smooth transitions".to_string(),
            features: strings(&["Hover animation", "Active states", "Shadow effects", "Focus indicators"]),
            accessibility: strings(&["Focus ring", "ARIA support", "Keyboard navigation", "Disabled state"]),
            responsive: true,
            animations: strings(&["Hover lift", "Shadow transition", "Color transitions"]),
        },
    }
}

pub fn prompt(component_type: &str) -> String {
    let t = component_type;
    match t {
        "form" => format!("Create a modern {t} with clean input fields, proper spacing, focus states, and a prominent submit button. Use a card-like container with subtle shadows and ensure good contrast for accessibility."),
        "button" => format!("Design a {t} with smooth hover animations, proper focus states, and multiple variants. Include elevation effects and ensure it meets accessibility standards."),
        "navigation" => format!("Build a {t} menu with clear hierarchy, hover effects, and responsive behavior. Use proper spacing and typography scale."),
        "card" => format!("Create a {t} component with proper content hierarchy, subtle shadows, and hover interactions. Ensure responsive layout and good information architecture."),
        _ => format!("Create a modern {t} component with clean design, proper spacing, and smooth interactions."),
    }
}

pub fn variations(component_type: Option<&str>) -> Vec<Variation> {
    let label = component_type.filter(|c| !c.is_empty()).unwrap_or("Component");
    vec![
        Variation {
            title: format!("Modern {} Design", label),
            description: "A clean, modern approach with improved spacing and typography".to_string(),
            changes: strings(&["Increased padding", "Modern typography", "Subtle shadows"]),
            design_rationale: "Modern design principles focus on clean lines and generous whitespace"
                .to_string(),
            image_url: Some(variation_image_url(0)),
        },
        Variation {
            title: format!("Bold {} Variant", label),
            description: "A more vibrant design with stronger visual hierarchy".to_string(),
            changes: strings(&["Bolder colors", "Stronger contrast", "Enhanced CTAs"]),
            design_rationale: "Bold designs create stronger user engagement and clearer actions"
                .to_string(),
            image_url: Some(variation_image_url(1)),
        },
    ]
}

/// Suggestion keyed by the lowercase tag; unknown tags are treated as `div`.
pub fn element_suggestion(tag_name: Option<&str>) -> ElementSuggestion {
    let tag = tag_name
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| "div".to_string());
    let (prompt, component) = match tag.as_str() {
        "button" => ("Improve this button by adding modern styling and hover effects", "button"),
        "nav" => ("Improve this navigation by enhancing accessibility and spacing", "navigation"),
        "header" => ("Improve this header section by adding better visual hierarchy", "header"),
        "footer" => ("Improve this footer by organizing content and improving readability", "footer"),
        "form" => ("Improve this form by enhancing user experience and validation", "form"),
        "section" => ("Improve this section by updating the design and layout", "section"),
        "article" => ("Improve this content area by enhancing typography and spacing", "content area"),
        _ => ("Improve this component by modernizing the design and layout", "component"),
    };
    ElementSuggestion {
        suggested_prompt: prompt.to_string(),
        component_type: component.to_string(),
    }
}

/// Gradient-styled rewrite of the element, named after its tag.
pub fn element_code(tag_name: &str, text_content: &str) -> ParsedCode {
    let name = if tag_name == "BUTTON" { "Button" } else { "Component" };
    let tag = if tag_name.is_empty() {
        "div".to_string()
    } else {
        tag_name.to_ascii_lowercase()
    };
    let content = if text_content.is_empty() {
        "Component Content"
    } else {
        text_content
    };

    let code = format!(
        r#"export function Improved{name}() {{
  return (
    <{tag} className="
      bg-gradient-to-r from-blue-500 to-blue-600
      text-white font-semibold
      px-6 py-3 rounded-lg
      hover:from-blue-600 hover:to-blue-700
      focus:outline-none focus:ring-2 focus:ring-blue-500 focus:ring-offset-2
      transition-all duration-200
      shadow-lg hover:shadow-xl
    ">
      {content}
    </{tag}>
  )
}}"#
    );

    ParsedCode {
        description: format!(
            "Improved {} with better styling and accessibility",
            name.to_ascii_lowercase()
        ),
        improvements: strings(&[
            "Enhanced visual hierarchy with proper typography",
            "Improved color contrast for accessibility",
            "Added responsive design patterns",
            "Included subtle animations for better UX",
        ]),
        code,
    }
}
