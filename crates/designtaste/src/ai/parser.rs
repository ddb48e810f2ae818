//! Turning free-form model output into structured values.

use std::marker::PhantomData;
use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::AiError;

static RE_DESCRIPTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)## Description\s*\n(.*?)(?:\n##|$)").unwrap());
static RE_IMPROVEMENTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)## Improvements\s*\n(.*?)(?:\n##|$)").unwrap());
static RE_CODE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(?:typescript|tsx|jsx)?\s*\n(.*?)\n```").unwrap());

pub trait ResponseParser {
    type Output;

    fn parse(&self, response: &str) -> Result<Self::Output, AiError>;
}

/// Code plus the notes that accompany it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedCode {
    pub description: String,
    pub improvements: Vec<String>,
    pub code: String,
}

/// Reads the `## Description` / `## Improvements` / fenced code layout.
/// Missing sections come back empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct SectionParser;

impl ResponseParser for SectionParser {
    type Output = ParsedCode;

    fn parse(&self, response: &str) -> Result<ParsedCode, AiError> {
        let description = RE_DESCRIPTION
            .captures(response)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default();

        let improvements = RE_IMPROVEMENTS
            .captures(response)
            .and_then(|c| c.get(1))
            .map(|m| {
                m.as_str()
                    .lines()
                    .map(str::trim)
                    .filter(|line| line.starts_with('-'))
                    .map(|line| line.trim_start_matches('-').trim().to_string())
                    .collect()
            })
            .unwrap_or_default();

        let code = RE_CODE_BLOCK
            .captures(response)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default();

        Ok(ParsedCode {
            description,
            improvements,
            code,
        })
    }
}

/// Deserializes the first balanced JSON object found in the response.
pub struct JsonObjectParser<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonObjectParser<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for JsonObjectParser<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: DeserializeOwned> ResponseParser for JsonObjectParser<T> {
    type Output = T;

    fn parse(&self, response: &str) -> Result<T, AiError> {
        let json_str = extract_json(response)
            .ok_or_else(|| AiError::Parse("No JSON object in response".to_string()))?;
        serde_json::from_str(json_str)
            .map_err(|e| AiError::Parse(format!("Failed to parse JSON: {}", e)))
    }
}

/// Finds the first `{ ... }` object, skipping braces inside strings.
fn extract_json(response: &str) -> Option<&str> {
    let start = response.find('{')?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, c) in response[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&response[start..start + i + 1]);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    const RESPONSE: &str = "Here you go.\n\n## Description\nA softer card with depth.\n\n## Improvements\n- Rounded corners\n- Subtle shadow\nnot a bullet\n\n## Code\n```tsx\nexport function Card() {\n  return <div />\n}\n```\n";

    #[test]
    fn test_section_parser() {
        let parsed = SectionParser.parse(RESPONSE).unwrap();
        assert_eq!(parsed.description, "A softer card with depth.");
        assert_eq!(parsed.improvements, vec!["Rounded corners", "Subtle shadow"]);
        assert_eq!(parsed.code, "export function Card() {\n  return <div />\n}");
    }

    #[test]
    fn test_missing_sections_are_empty() {
        let parsed = SectionParser.parse("I cannot help with that.").unwrap();
        assert_eq!(parsed, ParsedCode::default());
    }

    #[test]
    fn test_plain_fence() {
        let parsed = SectionParser.parse("```\nconst a = 1;\n```").unwrap();
        assert_eq!(parsed.code, "const a = 1;");
    }

    #[test]
    fn test_json_object_parser() {
        let response = "Sure! {\"variations\": [{\"title\": \"A {brace}\"}]} Hope it helps.";
        let value: Value = JsonObjectParser::new().parse(response).unwrap();
        assert_eq!(value["variations"][0]["title"], "A {brace}");
    }

    #[test]
    fn test_json_object_parser_errors() {
        let parser = JsonObjectParser::<Value>::new();
        assert!(matches!(parser.parse("no json"), Err(AiError::Parse(_))));
        assert!(matches!(parser.parse("{\"open\": "), Err(AiError::Parse(_))));
    }
}
