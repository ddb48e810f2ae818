//! Rule-based design critique of a captured element.

use crate::element::ElementSnapshot;

use super::component::ComponentType;

pub const ISSUE_CONTRAST: &str = "Poor color contrast - text may be hard to read";
pub const ISSUE_PADDING: &str = "Insufficient padding - element may feel cramped";
pub const ISSUE_MARGIN: &str = "No margins - element may be too close to others";
pub const ISSUE_SHARP_CORNERS: &str = "Sharp corners - modern buttons typically have rounded edges";
pub const ISSUE_TYPOGRAPHY: &str = "Weak typography hierarchy - consider bolder text for emphasis";
pub const NO_ISSUES: &str = "No major design issues detected";

/// Confidence recorded with every heuristic analysis.
pub const CONFIDENCE_SCORE: f64 = 0.8;

const BUTTON_RECOMMENDATIONS: [&str; 3] = [
    "Consider adding hover effects with transition animations",
    "Use consistent padding (e.g., px-6 py-3) for better proportions",
    "Add focus states for accessibility (focus:ring-2)",
];

const CARD_RECOMMENDATIONS: [&str; 3] = [
    "Add subtle shadows for depth (shadow-md)",
    "Use consistent border radius (rounded-lg)",
    "Consider proper spacing between content elements",
];

const NAVIGATION_RECOMMENDATIONS: [&str; 3] = [
    "Ensure proper spacing between navigation items",
    "Add hover states for interactive elements",
    "Consider sticky positioning for better UX",
];

const DEFAULT_RECOMMENDATIONS: [&str; 3] = [
    "Improve visual hierarchy with proper typography scale",
    "Add consistent spacing using a design system",
    "Consider accessibility improvements (contrast, focus states)",
];

/// Result of the heuristic pass over one element.
#[derive(Debug, Clone, PartialEq)]
pub struct Critique {
    pub component_type: ComponentType,
    pub design_issues: Vec<String>,
    pub style_characteristics: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Runs every heuristic over the snapshot.
pub fn critique(snapshot: &ElementSnapshot) -> Critique {
    let component_type = super::detect_component_type(snapshot);
    Critique {
        component_type,
        design_issues: design_issues(snapshot, component_type),
        style_characteristics: style_characteristics(snapshot),
        recommendations: recommendations(component_type),
    }
}

pub fn design_issues(snapshot: &ElementSnapshot, component: ComponentType) -> Vec<String> {
    let mut issues = Vec::new();

    if let (Some(color), Some(background)) =
        (snapshot.style("color"), snapshot.style("background-color"))
    {
        if color == background || color == "inherit" {
            issues.push(ISSUE_CONTRAST);
        }
    }
    if is_unset_or_zero(snapshot.style("padding")) {
        issues.push(ISSUE_PADDING);
    }
    if is_unset_or_zero(snapshot.style("margin")) {
        issues.push(ISSUE_MARGIN);
    }
    if component == ComponentType::Button && snapshot.style("border-radius").is_none() {
        issues.push(ISSUE_SHARP_CORNERS);
    }
    if matches!(snapshot.style("font-weight"), None | Some("normal")) {
        issues.push(ISSUE_TYPOGRAPHY);
    }

    if issues.is_empty() {
        issues.push(NO_ISSUES);
    }
    issues.into_iter().map(str::to_string).collect()
}

pub fn style_characteristics(snapshot: &ElementSnapshot) -> Vec<String> {
    let mut traits = Vec::new();

    if leading_number(snapshot.style("border-radius")).is_some_and(|r| r > 8.0) {
        traits.push("rounded");
    }
    if snapshot.style("box-shadow").is_some_and(|s| s != "none") {
        traits.push("elevated");
    }
    let class = format!("{} {}", snapshot.class_list.join(" "), snapshot.html).to_lowercase();
    if class.contains("gradient") || snapshot.style("background").is_some_and(|b| b.contains("gradient")) {
        traits.push("gradient");
    }
    if matches!(snapshot.style("background-color"), None | Some("transparent")) {
        traits.push("minimal");
    }
    if leading_number(snapshot.style("font-size")).is_some_and(|s| s > 18.0) {
        traits.push("large-text");
    }

    if traits.is_empty() {
        traits.push("standard");
    }
    traits.into_iter().map(str::to_string).collect()
}

pub fn recommendations(component: ComponentType) -> Vec<String> {
    let table = match component {
        ComponentType::Button => &BUTTON_RECOMMENDATIONS,
        ComponentType::Card => &CARD_RECOMMENDATIONS,
        ComponentType::Navigation => &NAVIGATION_RECOMMENDATIONS,
        _ => &DEFAULT_RECOMMENDATIONS,
    };
    table.iter().map(|s| s.to_string()).collect()
}

fn is_unset_or_zero(value: Option<&str>) -> bool {
    matches!(value, None | Some("0px"))
}

/// Parses the numeric prefix of a CSS length such as `12px` or `1.5rem`.
fn leading_number(value: Option<&str>) -> Option<f64> {
    let value = value?.trim();
    let end = value
        .char_indices()
        .find(|(i, c)| !(c.is_ascii_digit() || *c == '.' || (*i == 0 && (*c == '-' || *c == '+'))))
        .map(|(i, _)| i)
        .unwrap_or(value.len());
    value[..end].parse().ok()
}
