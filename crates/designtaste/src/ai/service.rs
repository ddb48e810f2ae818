use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::Instrument;

use super::client::{CompletionClient, CompletionRequest};
use super::parser::{JsonObjectParser, ParsedCode, ResponseParser, SectionParser};
use super::provider::{describe_error, AiProvider, AiTask, ProviderRegistry};
use super::{fallback, prompt, AiError};
use crate::db::analysis_repo::AnalysisRow;
use crate::db::inspiration_repo::InspirationRow;
use crate::element::ElementSnapshot;

/// Component code generated from an inspiration image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentCode {
    pub tailwind_code: String,
    pub react_code: String,
    pub css_code: String,
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub accessibility: Vec<String>,
    #[serde(default)]
    pub responsive: bool,
    #[serde(default)]
    pub animations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variation {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub changes: Vec<String>,
    #[serde(default)]
    pub design_rationale: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VariationList {
    variations: Vec<Variation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementSuggestion {
    pub suggested_prompt: String,
    pub component_type: String,
}

/// A result and whether it came from the deterministic fallback.
#[derive(Debug, Clone, PartialEq)]
pub struct WithFallback<T> {
    pub value: T,
    pub fallback: bool,
}

impl<T> WithFallback<T> {
    fn generated(value: T) -> Self {
        Self {
            value,
            fallback: false,
        }
    }

    fn fallback(value: T) -> Self {
        Self {
            value,
            fallback: true,
        }
    }
}

/// Design-assistant operations. Provider failures are logged and answered
/// with templates; none of these calls return an error.
pub struct AiService {
    registry: Arc<ProviderRegistry>,
    client: Arc<dyn CompletionClient>,
}

impl AiService {
    pub fn new(registry: Arc<ProviderRegistry>, client: Arc<dyn CompletionClient>) -> Self {
        Self { registry, client }
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    async fn run(&self, task: AiTask, request: CompletionRequest) -> Result<String, (AiProvider, AiError)> {
        let provider = self.registry.select(task);
        self.client
            .complete(provider, &request)
            .await
            .map_err(|e| (provider, e))
    }

    fn report(context: &str, provider: AiProvider, error: &AiError) {
        log::error!("{}: {}", context, describe_error(provider, error));
    }

    pub async fn generate_code_from_inspiration(
        &self,
        image_url: &str,
        component_type: &str,
        user_prompt: Option<&str>,
        original_element: Option<&Value>,
    ) -> WithFallback<ComponentCode> {
        let request = CompletionRequest::new(prompt::inspiration_code_user(component_type))
            .system(prompt::inspiration_code_system(component_type, user_prompt, original_element))
            .image(image_url)
            .temperature(0.3);

        let parsed = match self
            .run(AiTask::CodeGeneration, request)
            .instrument(tracing::info_span!("generate_code_from_inspiration", component_type))
            .await
        {
            Ok(text) => JsonObjectParser::<ComponentCode>::new()
                .parse(&text)
                .map_err(|e| (self.registry.select(AiTask::CodeGeneration), e)),
            Err(failure) => Err(failure),
        };

        match parsed {
            Ok(code) => WithFallback::generated(code),
            Err((provider, e)) => {
                Self::report("AI code generation failed", provider, &e);
                WithFallback::fallback(fallback::component_code(component_type))
            }
        }
    }

    pub async fn generate_prompt_from_inspiration(
        &self,
        image_url: &str,
        component_type: &str,
    ) -> WithFallback<String> {
        let request = CompletionRequest::new(prompt::inspiration_prompt_user(component_type))
            .system(prompt::inspiration_prompt_system(component_type))
            .image(image_url)
            .temperature(0.4);

        match self.run(AiTask::PromptGeneration, request).await {
            Ok(text) => WithFallback::generated(text),
            Err((provider, e)) => {
                Self::report("AI prompt generation failed", provider, &e);
                WithFallback::fallback(fallback::prompt(component_type))
            }
        }
    }

    /// Falls back to the unchanged input code.
    pub async fn improve_existing_code(
        &self,
        current_code: &str,
        improvement_request: &str,
        component_type: &str,
    ) -> WithFallback<String> {
        let request = CompletionRequest::new(prompt::improve_code_user(current_code, improvement_request))
            .system(prompt::improve_code_system(component_type))
            .temperature(0.2);

        match self.run(AiTask::CodeImprovement, request).await {
            Ok(text) => WithFallback::generated(text),
            Err((provider, e)) => {
                Self::report("Code improvement failed", provider, &e);
                WithFallback::fallback(current_code.to_string())
            }
        }
    }

    /// Two alternative designs. Image links always point at the stock photos,
    /// cache-busted with the current time.
    pub async fn generate_variations(
        &self,
        image_url: &str,
        component_type: Option<&str>,
    ) -> WithFallback<Vec<Variation>> {
        let label = component_type.unwrap_or("component");
        let request = CompletionRequest::new(prompt::variations_prompt(label)).image(image_url);

        let parsed = match self.run(AiTask::ImageAnalysis, request).await {
            Ok(text) => JsonObjectParser::<VariationList>::new()
                .parse(&text)
                .map_err(|e| (self.registry.select(AiTask::ImageAnalysis), e)),
            Err(failure) => Err(failure),
        };

        match parsed {
            Ok(list) if !list.variations.is_empty() => {
                let stamp = chrono::Utc::now().timestamp_millis();
                let variations = list
                    .variations
                    .into_iter()
                    .enumerate()
                    .map(|(index, mut variation)| {
                        variation.image_url =
                            Some(format!("{}&v={}", fallback::variation_image_url(index), stamp));
                        variation
                    })
                    .collect();
                WithFallback::generated(variations)
            }
            Ok(_) => {
                log::warn!("Variations generation returned no variations");
                WithFallback::fallback(fallback::variations(component_type))
            }
            Err((provider, e)) => {
                Self::report("Variations generation error", provider, &e);
                WithFallback::fallback(fallback::variations(component_type))
            }
        }
    }

    /// Suggests an improvement prompt and names the component in the image.
    pub async fn analyze_element(
        &self,
        image_url: &str,
        tag_name: Option<&str>,
    ) -> WithFallback<ElementSuggestion> {
        let suggestion = CompletionRequest::new(prompt::element_suggestion_prompt(tag_name)).image(image_url);
        let naming = CompletionRequest::new(prompt::COMPONENT_NAME_QUESTION).image(image_url);

        let result = async {
            let suggested = self.run(AiTask::ImageAnalysis, suggestion).await?;
            let component = self.run(AiTask::ImageAnalysis, naming).await?;
            Ok::<_, (AiProvider, AiError)>(ElementSuggestion {
                suggested_prompt: suggested.trim().to_string(),
                component_type: component.trim().to_string(),
            })
        }
        .await;

        match result {
            Ok(value) => WithFallback::generated(value),
            Err((provider, e)) => {
                Self::report("Element analysis error", provider, &e);
                WithFallback::fallback(fallback::element_suggestion(tag_name))
            }
        }
    }

    /// Improved code for a captured element, guided by its analysis and the
    /// inspirations the user picked.
    pub async fn generate_element_code(
        &self,
        element: &ElementSnapshot,
        analysis: Option<&AnalysisRow>,
        inspirations: &[InspirationRow],
        framework: &str,
        style_preferences: &[String],
    ) -> WithFallback<ParsedCode> {
        let request = CompletionRequest::new(prompt::element_code_prompt(
            element,
            analysis,
            inspirations,
            framework,
            style_preferences,
        ))
        .system(prompt::ELEMENT_CODE_SYSTEM)
        .max_tokens(2000)
        .temperature(0.7);

        let parsed = match self
            .run(AiTask::CodeGeneration, request)
            .instrument(tracing::info_span!("generate_element_code", framework))
            .await
        {
            Ok(text) => SectionParser
                .parse(&text)
                .map_err(|e| (self.registry.select(AiTask::CodeGeneration), e)),
            Err(failure) => Err(failure),
        };

        match parsed {
            Ok(code) => WithFallback::generated(code),
            Err((provider, e)) => {
                Self::report("Element code generation failed", provider, &e);
                WithFallback::fallback(fallback::element_code(&element.tag_name, &element.text_content))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replies with canned text, or fails when `reply` is `None`.
    struct ScriptedClient {
        replies: Mutex<Vec<Option<String>>>,
        seen: Mutex<Vec<(AiProvider, CompletionRequest)>>,
    }

    impl ScriptedClient {
        fn new(replies: Vec<Option<&str>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into_iter().rev().map(|r| r.map(str::to_string)).collect()),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl CompletionClient for ScriptedClient {
        async fn complete(
            &self,
            provider: AiProvider,
            request: &CompletionRequest,
        ) -> Result<String, AiError> {
            self.seen.lock().unwrap().push((provider, request.clone()));
            match self.replies.lock().unwrap().pop().flatten() {
                Some(text) => Ok(text),
                None => Err(AiError::MissingApiKey { provider }),
            }
        }
    }

    fn service(client: Arc<ScriptedClient>) -> AiService {
        let registry = ProviderRegistry::new(AiProvider::OpenAi)
            .with_api_key(AiProvider::Anthropic, "sk-ant")
            .with_api_key(AiProvider::OpenAi, "sk-openai");
        AiService::new(Arc::new(registry), client)
    }

    #[tokio::test]
    async fn test_code_from_inspiration_parses_json() {
        let reply = r#"```json
{"tailwindCode": "<div/>", "reactCode": "export default function Hero() {}", "cssCode": ".hero {}",
 "description": "Hero", "features": ["Big type"], "accessibility": [], "responsive": true, "animations": []}
```"#;
        let client = ScriptedClient::new(vec![Some(reply)]);
        let ai = service(client.clone());

        let result = ai
            .generate_code_from_inspiration("https://img/hero.png", "hero", Some("Make it bold"), None)
            .await;
        assert!(!result.fallback);
        assert_eq!(result.value.tailwind_code, "<div/>");

        let seen = client.seen.lock().unwrap();
        assert_eq!(seen[0].0, AiProvider::Anthropic);
        assert_eq!(seen[0].1.image_url.as_deref(), Some("https://img/hero.png"));
        assert_eq!(seen[0].1.temperature, Some(0.3));
        assert!(seen[0].1.system.as_deref().unwrap().contains("User Request: Make it bold"));
    }

    #[tokio::test]
    async fn test_code_from_inspiration_falls_back() {
        let ai = service(ScriptedClient::new(vec![None]));
        let result = ai.generate_code_from_inspiration("u", "form", None, None).await;
        assert!(result.fallback);
        assert_eq!(result.value, fallback::component_code("form"));

        let ai = service(ScriptedClient::new(vec![Some("not json at all")]));
        let result = ai.generate_code_from_inspiration("u", "hero", None, None).await;
        assert!(result.fallback);
        assert_eq!(result.value, fallback::component_code("button"));
    }

    #[tokio::test]
    async fn test_improve_existing_code_fallback_returns_input() {
        let ai = service(ScriptedClient::new(vec![None]));
        let result = ai.improve_existing_code("<a/>", "make it blue", "link").await;
        assert!(result.fallback);
        assert_eq!(result.value, "<a/>");
    }

    #[tokio::test]
    async fn test_prompt_generation_uses_openai() {
        let client = ScriptedClient::new(vec![Some("Build a hero with...")]);
        let ai = service(client.clone());
        let result = ai.generate_prompt_from_inspiration("u", "hero").await;
        assert_eq!(result.value, "Build a hero with...");
        assert_eq!(client.seen.lock().unwrap()[0].0, AiProvider::OpenAi);
    }

    #[tokio::test]
    async fn test_variations_get_stock_images() {
        let reply = r#"{"variations": [
            {"title": "Calm", "description": "d", "changes": ["a"], "designRationale": "r", "imageUrl": "https://elsewhere"},
            {"title": "Loud", "description": "d", "changes": [], "designRationale": "r"}
        ]}"#;
        let ai = service(ScriptedClient::new(vec![Some(reply)]));
        let result = ai.generate_variations("u", Some("card")).await;

        assert!(!result.fallback);
        let first = result.value[0].image_url.as_deref().unwrap();
        assert!(first.contains("1581291518857-4e27b48ff24e"));
        assert!(first.contains("&v="));
        assert!(result.value[1].image_url.as_deref().unwrap().contains("1559028006-448665bd7c7f"));
    }

    #[tokio::test]
    async fn test_analyze_element_needs_both_answers() {
        let ai = service(ScriptedClient::new(vec![
            Some("  Improve this button by adding depth \n"),
            Some("button\n"),
        ]));
        let result = ai.analyze_element("u", Some("BUTTON")).await;
        assert!(!result.fallback);
        assert_eq!(result.value.suggested_prompt, "Improve this button by adding depth");
        assert_eq!(result.value.component_type, "button");

        let ai = service(ScriptedClient::new(vec![Some("Improve this"), None]));
        let result = ai.analyze_element("u", Some("NAV")).await;
        assert!(result.fallback);
        assert_eq!(result.value.component_type, "navigation");
    }

    #[tokio::test]
    async fn test_element_code_sections_and_fallback() {
        let element = ElementSnapshot {
            tag_name: "BUTTON".to_string(),
            text_content: "Buy".to_string(),
            ..Default::default()
        };
        let reply = "## Description\nBetter.\n\n## Improvements\n- Contrast\n\n## Code\n```tsx\n<button/>\n```";
        let client = ScriptedClient::new(vec![Some(reply)]);
        let ai = service(client.clone());
        let result = ai.generate_element_code(&element, None, &[], "nextjs", &[]).await;
        assert!(!result.fallback);
        assert_eq!(result.value.code, "<button/>");
        assert_eq!(client.seen.lock().unwrap()[0].1.max_tokens, Some(2000));

        let ai = service(ScriptedClient::new(vec![None]));
        let result = ai.generate_element_code(&element, None, &[], "nextjs", &[]).await;
        assert!(result.fallback);
        assert!(result.value.code.starts_with("export function ImprovedButton()"));
    }
}
