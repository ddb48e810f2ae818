//! Hand-picked examples used to pad thin search results.

use super::{unsplash_url, Inspiration};

/// Maximum curated entries added for one component.
pub const MAX_CURATED: usize = 8;

struct Curated {
    title: &'static str,
    photo: &'static str,
    source: &'static str,
    tags: [&'static str; 3],
    score: f64,
    description: &'static str,
}

const HERO: &[Curated] = &[
    Curated {
        title: "Modern Hero Section",
        photo: "photo-1467232004584-a241de8bcf5d",
        source: "Landing Page Gallery",
        tags: ["hero", "landing", "modern"],
        score: 0.94,
        description: "Clean hero section with strong call-to-action",
    },
    Curated {
        title: "SaaS Hero Design",
        photo: "photo-1460925895917-afdab827c52f",
        source: "SaaS Examples",
        tags: ["hero", "saas", "conversion"],
        score: 0.91,
        description: "High-converting SaaS hero section",
    },
];

const FORM: &[Curated] = &[
    Curated {
        title: "Modern Contact Form",
        photo: "photo-1551434678-e076c223a692",
        source: "Form Patterns",
        tags: ["form", "contact", "modern"],
        score: 0.9,
        description: "Clean contact form with floating labels",
    },
    Curated {
        title: "Registration Form Design",
        photo: "photo-1586281380349-632531db7ed4",
        source: "UI Patterns",
        tags: ["form", "registration", "ui"],
        score: 0.85,
        description: "Multi-step registration form",
    },
    Curated {
        title: "Login Form Inspiration",
        photo: "photo-1555066931-4365d14bab8c",
        source: "Best Practices",
        tags: ["form", "login", "simple"],
        score: 0.88,
        description: "Minimalist login form design",
    },
];

const BUTTON: &[Curated] = &[
    Curated {
        title: "Call-to-Action Buttons",
        photo: "photo-1559028006-448665bd7c7f",
        source: "Button Library",
        tags: ["button", "cta", "primary"],
        score: 0.92,
        description: "High-converting button designs",
    },
    Curated {
        title: "Interactive Button States",
        photo: "photo-1517077304055-6e89abbf09b0",
        source: "Interaction Design",
        tags: ["button", "states", "hover"],
        score: 0.87,
        description: "Button hover and active states",
    },
];

const NAVIGATION: &[Curated] = &[Curated {
    title: "Modern Navigation Menu",
    photo: "photo-1467232004584-a241de8bcf5d",
    source: "Navigation Patterns",
    tags: ["navigation", "menu", "header"],
    score: 0.91,
    description: "Clean horizontal navigation",
}];

const CARD: &[Curated] = &[
    Curated {
        title: "Product Card Design",
        photo: "photo-1556742049-0cfed4f6a45d",
        source: "Card Components",
        tags: ["card", "product", "ecommerce"],
        score: 0.89,
        description: "E-commerce product cards",
    },
    Curated {
        title: "Feature Cards Layout",
        photo: "photo-1460925895917-afdab827c52f",
        source: "Layout Patterns",
        tags: ["card", "features", "grid"],
        score: 0.86,
        description: "Feature showcase cards",
    },
];

/// General entries. The first tag is replaced by the component type.
const GENERAL: &[Curated] = &[
    Curated {
        title: "UI Design Inspiration",
        photo: "photo-1581291518857-4e27b48ff24e",
        source: "UI Inspiration",
        tags: ["", "ui", "design"],
        score: 0.75,
        description: "Modern UI design patterns",
    },
    Curated {
        title: "Interface Design Example",
        photo: "photo-1507003211169-0a1dd7228f2d",
        source: "Interface Gallery",
        tags: ["", "interface", "clean"],
        score: 0.78,
        description: "Clean interface design",
    },
    Curated {
        title: "Design System Components",
        photo: "photo-1551650975-87deedd944c3",
        source: "Design Systems",
        tags: ["", "system", "components"],
        score: 0.80,
        description: "Design system showcase",
    },
];

/// Component tables in fallback order.
const TABLES: [(&str, &[Curated]); 5] = [
    ("hero", HERO),
    ("form", FORM),
    ("button", BUTTON),
    ("navigation", NAVIGATION),
    ("card", CARD),
];

/// Name of the table used for a component.
fn table_name(component: &str) -> &'static str {
    TABLES
        .iter()
        .map(|(name, _)| *name)
        .find(|name| *name == component)
        .unwrap_or("card")
}

fn table_for(component: &str) -> &'static [Curated] {
    let name = table_name(component);
    TABLES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, table)| *table)
        .unwrap_or(CARD)
}

fn to_inspiration(entry: &Curated, component: &str) -> Inspiration {
    Inspiration {
        title: entry.title.to_string(),
        image_url: unsplash_url(entry.photo),
        source: entry.source.to_string(),
        tags: entry
            .tags
            .iter()
            .map(|t| if t.is_empty() { component.to_string() } else { t.to_string() })
            .collect(),
        similarity_score: entry.score,
        description: Some(entry.description.to_string()),
        source_url: None,
    }
}

/// Curated examples for a component: its table followed by the general
/// entries, at most [`MAX_CURATED`]. Unknown components use the card table.
pub fn curated_examples(component: &str) -> Vec<Inspiration> {
    table_for(component)
        .iter()
        .chain(GENERAL)
        .take(MAX_CURATED)
        .map(|e| to_inspiration(e, component))
        .collect()
}

/// Examples from the other component tables, used when a component's own
/// table is too short.
pub fn extra_examples(component: &str) -> Vec<Inspiration> {
    let own = table_name(component);
    TABLES
        .iter()
        .filter(|(name, _)| *name != own)
        .flat_map(|(_, table)| table.iter())
        .map(|e| to_inspiration(e, component))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hero_examples() {
        let examples = curated_examples("hero");
        let titles: Vec<_> = examples.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Modern Hero Section",
                "SaaS Hero Design",
                "UI Design Inspiration",
                "Interface Design Example",
                "Design System Components"
            ]
        );
        assert_eq!(examples[2].tags, vec!["hero", "ui", "design"]);
    }

    #[test]
    fn test_unknown_uses_card_table() {
        let examples = curated_examples("sidebar");
        assert_eq!(examples[0].title, "Product Card Design");
        assert_eq!(examples.len(), 5);
        assert_eq!(examples[4].tags[0], "sidebar");
    }

    #[test]
    fn test_extra_examples_skip_own_table() {
        let extra = extra_examples("hero");
        assert!(extra.iter().all(|e| !e.title.contains("Hero")));
        assert_eq!(extra.len(), 8);
    }
}
