//! Heuristic analysis of captured elements: component classification,
//! design issues, style traits, recommendations and search keywords.

pub mod component;
pub mod heuristics;
pub mod keywords;

pub use component::{detect_component_type, ComponentType};
pub use heuristics::{
    critique, design_issues, recommendations, style_characteristics, Critique, CONFIDENCE_SCORE,
};
pub use keywords::search_keywords;
