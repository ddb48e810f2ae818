use async_trait::async_trait;

use super::{capitalize, unsplash_url, Inspiration, InspirationError, InspirationSource};

/// A templated result. `{t}` expands to the component type, `{T}` to the
/// capitalized component type.
pub struct Template {
    pub title: &'static str,
    pub photo: &'static str,
    pub tags: [&'static str; 2],
    pub score: f64,
    pub description: Option<&'static str>,
}

/// How a source links back to its site.
pub enum LinkStyle {
    None,
    /// Search URL with the query appended, whitespace replaced by the separator.
    Search {
        prefix: &'static str,
        separator: &'static str,
    },
    /// Pattern filter URLs derived from the component type.
    Mobbin,
    Fixed(&'static str),
}

/// A source that expands fixed templates for the requested component.
pub struct TemplateSource {
    pub name: &'static str,
    pub templates: &'static [Template],
    pub link: LinkStyle,
}

const DRIBBBLE: TemplateSource = TemplateSource {
    name: "Dribbble",
    templates: &[
        Template {
            title: "{T} Design from Dribbble",
            photo: "photo-1581291518857-4e27b48ff24e",
            tags: ["ui", "modern"],
            score: 0.92,
            description: None,
        },
        Template {
            title: "Modern {t} Interface",
            photo: "photo-1559028006-448665bd7c7f",
            tags: ["interface", "clean"],
            score: 0.89,
            description: None,
        },
        Template {
            title: "{t} UI Pattern",
            photo: "photo-1507003211169-0a1dd7228f2d",
            tags: ["pattern", "design"],
            score: 0.87,
            description: None,
        },
    ],
    link: LinkStyle::Search {
        prefix: "https://dribbble.com/search/",
        separator: "-",
    },
};

const UI_MOVEMENT: TemplateSource = TemplateSource {
    name: "UI Movement",
    templates: &[
        Template {
            title: "{t} Pattern from UI Movement",
            photo: "photo-1551434678-e076c223a692",
            tags: ["pattern", "inspiration"],
            score: 0.85,
            description: Some("Modern {t} patterns and interactions"),
        },
        Template {
            title: "{t} Animation Examples",
            photo: "photo-1586281380349-632531db7ed4",
            tags: ["animation", "motion"],
            score: 0.83,
            description: Some("Smooth animations for {t} elements"),
        },
    ],
    link: LinkStyle::None,
};

const MOBBIN: TemplateSource = TemplateSource {
    name: "Mobbin",
    templates: &[
        Template {
            title: "{t} Patterns from Mobbin",
            photo: "photo-1555066931-4365d14bab8c",
            tags: ["patterns", "web"],
            score: 0.90,
            description: Some("Real web app {t} patterns from Mobbin"),
        },
        Template {
            title: "Mobile {t} Examples",
            photo: "photo-1556742049-0cfed4f6a45d",
            tags: ["mobile", "apps"],
            score: 0.87,
            description: Some("Mobile app {t} implementations"),
        },
    ],
    link: LinkStyle::Mobbin,
};

const SAAS_LANDING_PAGE: TemplateSource = TemplateSource {
    name: "SaaS Landing Page",
    templates: &[
        Template {
            title: "SaaS {t} Examples",
            photo: "photo-1460925895917-afdab827c52f",
            tags: ["saas", "landing"],
            score: 0.92,
            description: Some("High-converting SaaS {t} designs"),
        },
        Template {
            title: "{t} Conversion Examples",
            photo: "photo-1551434678-e076c223a692",
            tags: ["conversion", "optimization"],
            score: 0.89,
            description: Some("Conversion-optimized {t} patterns"),
        },
    ],
    link: LinkStyle::Fixed("https://saaslandingpage.com/"),
};

const BEHANCE: TemplateSource = TemplateSource {
    name: "Behance",
    templates: &[
        Template {
            title: "{t} Design Showcase",
            photo: "photo-1460925895917-afdab827c52f",
            tags: ["showcase", "creative"],
            score: 0.84,
            description: Some("Creative {t} design showcases"),
        },
        Template {
            title: "{t} Portfolio Projects",
            photo: "photo-1467232004584-a241de8bcf5d",
            tags: ["portfolio", "creative"],
            score: 0.82,
            description: Some("Professional {t} portfolio pieces"),
        },
    ],
    link: LinkStyle::Search {
        prefix: "https://www.behance.net/search/projects?search=",
        separator: "%20",
    },
};

const PINTEREST: TemplateSource = TemplateSource {
    name: "Pinterest",
    templates: &[
        Template {
            title: "{t} UI Design Ideas",
            photo: "photo-1517077304055-6e89abbf09b0",
            tags: ["ideas", "ui"],
            score: 0.81,
            description: Some("Pinterest-curated {t} design ideas"),
        },
        Template {
            title: "{t} Design Inspiration Board",
            photo: "photo-1551650975-87deedd944c3",
            tags: ["inspiration", "board"],
            score: 0.79,
            description: Some("Curated {t} inspiration boards"),
        },
    ],
    link: LinkStyle::None,
};

/// The six built-in sources, in query order.
pub fn default_sources() -> Vec<Box<dyn InspirationSource>> {
    vec![
        Box::new(DRIBBBLE),
        Box::new(UI_MOVEMENT),
        Box::new(MOBBIN),
        Box::new(SAAS_LANDING_PAGE),
        Box::new(BEHANCE),
        Box::new(PINTEREST),
    ]
}

fn expand(template: &str, component: &str) -> String {
    template
        .replace("{T}", &capitalize(component))
        .replace("{t}", component)
}

fn mobbin_pattern(component: &str) -> &'static str {
    match component.to_lowercase().as_str() {
        "hero" => "Hero+Section",
        "form" => "Forms",
        "navigation" => "Navigation",
        "button" => "Buttons",
        "card" => "Cards",
        "footer" => "Footer",
        "header" => "Header",
        "sidebar" => "Sidebar",
        "modal" => "Modals",
        "tab" => "Tabs",
        "dropdown" => "Dropdowns",
        _ => "pagePatterns.Hero+Section",
    }
}

impl TemplateSource {
    fn link_for(&self, index: usize, component: &str, keywords: &[String]) -> Option<String> {
        match &self.link {
            LinkStyle::None => None,
            LinkStyle::Fixed(url) => Some(url.to_string()),
            LinkStyle::Search { prefix, separator } => {
                let query = format!("{} {}", component, keywords.join(" ")).to_lowercase();
                let query = query.split_whitespace().collect::<Vec<_>>().join(separator);
                Some(format!("{}{}", prefix, query))
            }
            LinkStyle::Mobbin => {
                let pattern = mobbin_pattern(component);
                Some(if index == 0 {
                    format!(
                        "https://mobbin.com/search/apps/web?content_type=marketing-pages&filter={}",
                        pattern
                    )
                } else {
                    format!("https://mobbin.com/search/apps/mobile?filter={}", pattern)
                })
            }
        }
    }
}

#[async_trait]
impl InspirationSource for TemplateSource {
    fn name(&self) -> &str {
        self.name
    }

    async fn fetch(
        &self,
        component: &str,
        keywords: &[String],
    ) -> Result<Vec<Inspiration>, InspirationError> {
        Ok(self
            .templates
            .iter()
            .enumerate()
            .map(|(i, t)| Inspiration {
                title: expand(t.title, component),
                image_url: unsplash_url(t.photo),
                source: self.name.to_string(),
                tags: std::iter::once(component.to_string())
                    .chain(t.tags.iter().map(|tag| tag.to_string()))
                    .collect(),
                similarity_score: t.score,
                description: t.description.map(|d| expand(d, component)),
                source_url: self.link_for(i, component, keywords),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kw(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[tokio::test]
    async fn test_dribbble_titles_and_links() {
        let results = DRIBBBLE.fetch("button", &kw(&["modern", "ui"])).await.unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].title, "Button Design from Dribbble");
        assert_eq!(results[1].title, "Modern button Interface");
        assert_eq!(results[0].tags, vec!["button", "ui", "modern"]);
        assert_eq!(
            results[0].source_url.as_deref(),
            Some("https://dribbble.com/search/button-modern-ui")
        );
        assert!(results[0].image_url.contains("photo-1581291518857-4e27b48ff24e"));
    }

    #[tokio::test]
    async fn test_behance_query_encoding() {
        let results = BEHANCE.fetch("hero", &kw(&["Dark", "mode"])).await.unwrap();
        assert_eq!(
            results[0].source_url.as_deref(),
            Some("https://www.behance.net/search/projects?search=hero%20dark%20mode")
        );
        assert_eq!(results[1].description.as_deref(), Some("Professional hero portfolio pieces"));
    }

    #[tokio::test]
    async fn test_mobbin_patterns() {
        let results = MOBBIN.fetch("form", &[]).await.unwrap();
        assert_eq!(
            results[0].source_url.as_deref(),
            Some("https://mobbin.com/search/apps/web?content_type=marketing-pages&filter=Forms")
        );
        assert_eq!(
            results[1].source_url.as_deref(),
            Some("https://mobbin.com/search/apps/mobile?filter=Forms")
        );

        let layout = MOBBIN.fetch("layout", &[]).await.unwrap();
        assert!(layout[0]
            .source_url
            .as_deref()
            .is_some_and(|u| u.ends_with("filter=pagePatterns.Hero+Section")));
    }

    #[tokio::test]
    async fn test_default_sources_produce_thirteen_entries() {
        let mut total = 0;
        for source in default_sources() {
            total += source.fetch("card", &[]).await.unwrap().len();
        }
        assert_eq!(total, 13);
    }
}
