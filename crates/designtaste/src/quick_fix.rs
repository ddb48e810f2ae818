//! Keyword-driven styling tips, answered without an AI call.

use serde::Serialize;

use crate::element::ElementSnapshot;

/// Free suggestions before the extension asks the user to sign in.
pub const FREE_QUICK_FIXES: u32 = 1;

pub const AUTH_REQUIRED_MESSAGE: &str = "Sign up with Google to continue using Quick Fix suggestions";

const COLOR: &str = "**Color & Contrast Improvements:**

• **Text Color**: Use at least `text-gray-700` or `text-gray-900` for better readability
• **Background**: Ensure sufficient contrast ratio (4.5:1 for normal text)
• **Hover States**: Add `hover:bg-blue-600` for interactive elements
• **Focus States**: Include `focus:ring-2 focus:ring-blue-500` for accessibility

**Quick Tailwind Classes:**
```css
text-gray-900 bg-white hover:bg-gray-50 focus:ring-2 focus:ring-blue-500
```";

const SPACING: &str = "**Spacing & Layout Improvements:**

• **Consistent Padding**: Use `px-6 py-3` for buttons, `p-4` for cards
• **Vertical Rhythm**: Add `space-y-4` to containers for consistent spacing
• **Margins**: Use `mb-4` for bottom spacing, `mt-2` for top spacing
• **Flex/Grid Gaps**: Use `gap-4` or `gap-6` for modern layouts

**Quick Tailwind Classes:**
```css
px-6 py-3 space-y-4 gap-4 mb-4
```";

const BUTTON: &str = "**Button Improvements:**

• **Size & Padding**: Use `px-6 py-3` for good click targets
• **Colors**: Primary buttons with `bg-blue-600 text-white`
• **Hover Effects**: Add `hover:bg-blue-700` for interaction feedback
• **Focus States**: Include `focus:outline-none focus:ring-2 focus:ring-blue-500`
• **Border Radius**: Use `rounded-lg` for modern appearance

**Complete Button Classes:**
```css
px-6 py-3 bg-blue-600 text-white font-semibold rounded-lg 
hover:bg-blue-700 focus:outline-none focus:ring-2 focus:ring-blue-500 
transition-colors duration-200
```";

const FORM: &str = "**Form Input Improvements:**

• **Border Styling**: Use `border-2 border-gray-300`
• **Focus States**: Add `focus:border-blue-500 focus:ring-blue-500`
• **Padding**: Use `px-4 py-2` for comfortable input
• **Rounded Corners**: Add `rounded-md` for modern look

**Input Classes:**
```css
w-full px-4 py-2 border-2 border-gray-300 rounded-md 
focus:border-blue-500 focus:ring-2 focus:ring-blue-500 focus:outline-none
```";

const TYPOGRAPHY: &str = "**Typography Improvements:**

• **Font Weight**: Use `font-semibold` for headings, `font-medium` for important text
• **Text Size**: Scale properly with `text-lg`, `text-xl`, or `text-2xl`
• **Line Height**: Add `leading-relaxed` for better readability
• **Color Hierarchy**: Use `text-gray-900` for primary, `text-gray-600` for secondary

**Typography Classes:**
```css
text-xl font-semibold text-gray-900 leading-relaxed
```";

fn modern(tag: &str) -> String {
    format!(
        "**Modern Styling for {tag}:**

• **Rounded Corners**: Add `rounded-lg` for modern feel
• **Subtle Shadows**: Use `shadow-md` or `shadow-lg` for depth
• **Smooth Transitions**: Include `transition-all duration-200`
• **Typography**: Use `font-semibold` and proper text sizes

**Quick Tailwind Classes:**
```css
rounded-lg shadow-md transition-all duration-200 font-semibold
```"
    )
}

fn general(tag: &str) -> String {
    format!(
        "**General Improvements for {tag}:**

• **Visual Hierarchy**: Use proper font weights (`font-semibold`, `font-medium`)
• **Spacing**: Add consistent padding and margins (`p-4`, `mb-4`)
• **Modern Styling**: Include `rounded-lg` and `shadow-sm`
• **Interactive States**: Add hover and focus effects
• **Smooth Transitions**: Use `transition-all duration-200`

**Recommended Classes:**
```css
p-4 rounded-lg shadow-sm font-medium transition-all duration-200
hover:shadow-md focus:outline-none focus:ring-2 focus:ring-blue-500
```

*💡 Tip: Test your changes and adjust values based on your design system!*"
    )
}

/// Picks a markdown tip by keyword; the first matching group wins.
pub fn suggest(element: &ElementSnapshot, prompt: &str) -> String {
    let prompt = prompt.to_lowercase();
    let tag = if element.tag_name.is_empty() {
        "element".to_string()
    } else {
        element.tag()
    };
    let mentions = |words: &[&str]| words.iter().any(|w| prompt.contains(w));

    if mentions(&["color", "contrast"]) {
        COLOR.to_string()
    } else if mentions(&["spacing", "padding", "margin", "layout"]) {
        SPACING.to_string()
    } else if mentions(&["modern", "better", "improve", "style"]) {
        modern(&tag)
    } else if tag == "button" || mentions(&["button"]) {
        BUTTON.to_string()
    } else if tag.contains("input") || mentions(&["form", "input"]) {
        FORM.to_string()
    } else if mentions(&["text", "typography", "font"]) {
        TYPOGRAPHY.to_string()
    } else {
        general(&tag)
    }
}

/// Outcome of a gated quick-fix request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum QuickFixOutcome {
    #[serde(rename_all = "camelCase")]
    Granted {
        success: bool,
        suggestion: String,
        usage_count: u32,
    },
    #[serde(rename_all = "camelCase")]
    AuthRequired {
        success: bool,
        error: &'static str,
        message: &'static str,
        usage_count: u32,
    },
}

/// Usage gate for anonymous users: the first suggestion is free, further
/// ones need a signed-in user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuickFixGate {
    pub usage_count: u32,
    pub authenticated: bool,
}

impl QuickFixGate {
    pub fn new(usage_count: u32, authenticated: bool) -> Self {
        Self {
            usage_count,
            authenticated,
        }
    }

    pub fn allows(&self) -> bool {
        self.authenticated || self.usage_count < FREE_QUICK_FIXES
    }

    /// Answers the request and counts it when allowed.
    pub fn request(&mut self, element: &ElementSnapshot, prompt: &str) -> QuickFixOutcome {
        if !self.allows() {
            log::info!("Quick fix blocked after {} uses", self.usage_count);
            return QuickFixOutcome::AuthRequired {
                success: false,
                error: "auth_required",
                message: AUTH_REQUIRED_MESSAGE,
                usage_count: self.usage_count,
            };
        }

        self.usage_count += 1;
        QuickFixOutcome::Granted {
            success: true,
            suggestion: suggest(element, prompt),
            usage_count: self.usage_count,
        }
    }
}
