//! Prompt texts sent to the providers.

use serde_json::Value;

use crate::db::analysis_repo::AnalysisRow;
use crate::db::inspiration_repo::InspirationRow;
use crate::element::ElementSnapshot;

pub const ELEMENT_CODE_SYSTEM: &str = "You are an expert frontend developer specializing in creating beautiful, accessible, and performant UI components. You generate clean, production-ready code with proper TypeScript types and modern best practices.";

pub const COMPONENT_NAME_QUESTION: &str = "What type of UI component is this? Respond with just the component name (e.g., \"hero section\", \"button\", \"navigation\", \"card\", \"form\", \"footer\", etc.). Be specific but use common web design terminology.";

pub fn inspiration_code_system(
    component_type: &str,
    user_prompt: Option<&str>,
    original_element: Option<&Value>,
) -> String {
    let user_request = user_prompt
        .filter(|p| !p.trim().is_empty())
        .unwrap_or("Recreate this design");
    let original = original_element
        .and_then(|value| serde_json::to_string_pretty(value).ok())
        .unwrap_or_else(|| "None".to_string());

    format!(
        r#"You are an expert UI/UX developer who can analyze design images and generate high-quality, production-ready code.

CONTEXT:
- Component Type: {component_type}
- User Request: {user_request}
- Original Element: {original}

TASK:
Analyze the design inspiration image and generate:
1. Modern Tailwind CSS component code
2. React TypeScript component
3. Pure CSS alternative
4. Detailed description and features

REQUIREMENTS:
- Use modern Tailwind CSS classes
- Include hover states and transitions
- Make it responsive (mobile-first)
- Follow accessibility best practices
- Use semantic HTML
- Include proper TypeScript types
- Add animation effects where appropriate

STYLE GUIDELINES:
- Use consistent spacing (4, 6, 8, 12, 16, 24)
- Modern color palette (gray, blue, green, etc.)
- Rounded corners (rounded-lg, rounded-xl)
- Subtle shadows (shadow-sm, shadow-md)
- Clean typography (font-medium, font-semibold)
- Proper contrast ratios

OUTPUT FORMAT:
Respond with a single JSON object with the keys tailwindCode, reactCode, cssCode, description, features (string array), accessibility (string array), responsive (boolean) and animations (string array)."#
    )
}

pub fn inspiration_code_user(component_type: &str) -> String {
    format!(
        "Please analyze this {component_type} design and generate production-ready code. Focus on recreating the visual style, layout, and interactions shown in the image."
    )
}

pub fn inspiration_prompt_system(component_type: &str) -> String {
    format!(
        r#"You are a UI/UX design expert. Analyze the provided image and create a detailed, actionable prompt that a developer could use to recreate this {component_type} design.

The prompt should include:
- Layout structure and positioning
- Color scheme and styling
- Typography and spacing
- Interactive elements and states
- Responsive behavior
- Animation effects
- Accessibility considerations

Make the prompt specific, actionable, and professional."#
    )
}

pub fn inspiration_prompt_user(component_type: &str) -> String {
    format!("Analyze this {component_type} design and create a detailed prompt for recreating it:")
}

pub fn improve_code_system(component_type: &str) -> String {
    format!(
        r#"You are an expert frontend developer. Improve the provided {component_type} code based on the user's request.

Focus on:
- Modern best practices
- Performance optimization
- Accessibility improvements
- Code readability
- Responsive design
- Animation enhancements

Return only the improved code, properly formatted."#
    )
}

pub fn improve_code_user(current_code: &str, request: &str) -> String {
    format!(
        "Current code:\n```\n{current_code}\n```\n\nImprovement request: {request}\n\nPlease provide the improved version:"
    )
}

pub fn variations_prompt(component_type: &str) -> String {
    format!(
        r#"Analyze this {component_type} design and create 2 distinct design variations. For each variation, provide:
1. A creative title
2. A detailed description of what makes it different
3. A list of specific changes from the original
4. Design rationale explaining why this variation would be effective

Focus on:
- Modern design trends
- Improved user experience
- Visual hierarchy enhancements
- Accessibility improvements
- Different aesthetic approaches (minimalist, bold, elegant, etc.)

Make each variation meaningfully different from the original and from each other.

Respond with a JSON object of the form {{"variations": [{{"title": "...", "description": "...", "changes": ["..."], "designRationale": "..."}}]}}."#
    )
}

pub fn element_suggestion_prompt(tag_name: Option<&str>) -> String {
    let tag = tag_name.filter(|t| !t.is_empty()).unwrap_or("unknown");
    format!(
        r#"Analyze this UI element and suggest a descriptive prompt that a user might want to improve about it.

Focus on:
- What type of component this is (button, hero section, card, navigation, form, etc.)
- Common design improvements for this type of element
- Specific visual aspects that could be enhanced

Provide a helpful suggestion in this format:
"Improve this [component type] by [specific improvement suggestion]"

Examples:
- "Improve this hero section by adding more visual hierarchy and modern typography"
- "Improve this button by adding hover effects and better contrast"
- "Improve this navigation by making it more accessible with better spacing"

Be specific but concise (under 100 characters). The user should be able to edit/complete your suggestion.

HTML context: {tag}"#
    )
}

/// Builds the request for an improved version of a captured element.
pub fn element_code_prompt(
    element: &ElementSnapshot,
    analysis: Option<&AnalysisRow>,
    inspirations: &[InspirationRow],
    framework: &str,
    style_preferences: &[String],
) -> String {
    let component_type = analysis.map(|a| a.component_type.as_str()).unwrap_or("component");
    let bullets = |items: Option<&Vec<String>>| -> String {
        items
            .map(|list| {
                list.iter()
                    .map(|item| format!("- {}", item))
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .unwrap_or_default()
    };
    let content: String = element.text_content.chars().take(200).collect();

    let mut prompt = format!(
        "Generate an improved {framework} component based on this analysis:\n\n\
         ORIGINAL ELEMENT:\n\
         - Tag: {tag}\n\
         - Content: {content}\n\
         - Component Type: {component_type}\n\n\
         DESIGN ISSUES IDENTIFIED:\n{issues}\n\n\
         RECOMMENDATIONS:\n{recommendations}\n\n\
         STYLE PREFERENCES:\n{preferences}\n\n\
         FRAMEWORK: {framework}\n",
        tag = element.tag_name,
        issues = bullets(analysis.map(|a| &a.design_issues)),
        recommendations = bullets(analysis.map(|a| &a.recommendations)),
        preferences = style_preferences.join(", "),
    );

    if framework == "nextjs" {
        prompt.push_str("- Use Next.js 14 with App Router\n- Include proper TypeScript types\n");
    }
    prompt.push_str(
        "- Use Tailwind CSS classes\n\
         - Include Framer Motion for subtle animations\n\
         - Ensure accessibility (ARIA labels, semantic HTML)\n\
         - Make it responsive (mobile-first)\n",
    );

    if !inspirations.is_empty() {
        prompt.push_str("\nDESIGN INSPIRATIONS TO CONSIDER:\n");
        for inspiration in inspirations {
            prompt.push_str(&format!("- {}: {}\n", inspiration.title, inspiration.tags.join(", ")));
        }
    }

    prompt.push_str(
        "\nPlease provide:\n\
         1. Complete component code\n\
         2. Brief description of improvements made\n\
         3. List of specific enhancements\n\n\
         Format your response as:\n\
         ## Description\n\
         [Brief description]\n\n\
         ## Improvements\n\
         - [List of improvements]\n\n\
         ## Code\n\
         ```typescript\n\
         [Component code]\n\
         ```\n",
    );
    prompt
}
