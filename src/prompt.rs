//! Prompt construction for the generation service.
//!
//! A pure transformation from (topic, language, prior titles) to the
//! instruction payload sent upstream: the system instruction carries the
//! target language, the advisory list of forbidden prior titles and the
//! formatting contract; the response schema pins the structured output
//! shape the client expects back.

use serde_json::{Value, json};

use crate::language::Language;

/// Maximum number of prior titles forwarded as the exclusion list.
pub const MAX_EXCLUDED_TITLES: usize = 30;

/// An immutable generation request.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    topic: String,
    language: Language,
    /// Prior titles, most recent first, capped at [`MAX_EXCLUDED_TITLES`].
    excluded_titles: Vec<String>,
}

impl GenerationRequest {
    /// Build a request. `topic` is expected to be non-empty and trimmed;
    /// the caller treats an empty topic as a no-op before getting here.
    pub fn new(topic: &str, language: Language, mut excluded_titles: Vec<String>) -> Self {
        excluded_titles.truncate(MAX_EXCLUDED_TITLES);
        Self {
            topic: topic.to_string(),
            language,
            excluded_titles,
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn excluded_titles(&self) -> &[String] {
        &self.excluded_titles
    }
}

/// Instruction payload for one service call.
#[derive(Debug, Clone)]
pub struct PromptPayload {
    pub system_instruction: String,
    pub user_content: String,
    /// Structured-output schema: an object with a `books` array of
    /// {title, author, category, script} records, all string-typed.
    pub response_schema: Value,
}

/// Compose the instruction payload for a request.
pub fn build_prompt(request: &GenerationRequest) -> PromptPayload {
    let mut system_instruction = format!(
        "You are a writer of long-form audiobook-style scripts for speech synthesis.\n\
         Write entirely in {language}.\n\
         Formatting contract, follow it exactly:\n\
         - Write exactly one sentence per block.\n\
         - Separate blocks with two empty lines, so consecutive sentences are \
         divided by a triple newline.\n\
         - Each sentence must take between 3 and 15 seconds to speak aloud.\n\
         - Spell out every numeral in words; never use digits.",
        language = request.language().instruction_name(),
    );

    if !request.excluded_titles().is_empty() {
        system_instruction.push_str(
            "\nDo not reuse any of these previously generated titles or retell their topics:\n",
        );
        for title in request.excluded_titles() {
            system_instruction.push_str("- ");
            system_instruction.push_str(title);
            system_instruction.push('\n');
        }
    }

    let user_content = format!(
        "Write a new long-form script about: {}",
        request.topic()
    );

    PromptPayload {
        system_instruction,
        user_content,
        response_schema: response_schema(),
    }
}

fn response_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "books": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "title": { "type": "string" },
                        "author": { "type": "string" },
                        "category": { "type": "string" },
                        "script": { "type": "string" }
                    },
                    "required": ["title", "author", "category", "script"]
                }
            }
        },
        "required": ["books"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_caps_excluded_titles() {
        let titles: Vec<String> = (0..100).map(|i| format!("title {i}")).collect();
        let request = GenerationRequest::new("space", Language::Russian, titles);

        assert_eq!(request.excluded_titles().len(), MAX_EXCLUDED_TITLES);
        // Most-recent-first order is preserved by truncation.
        assert_eq!(request.excluded_titles()[0], "title 0");
        assert_eq!(request.excluded_titles()[29], "title 29");
    }

    #[test]
    fn test_prompt_carries_formatting_contract() {
        let request = GenerationRequest::new("volcanoes", Language::Kazakh, vec![]);
        let prompt = build_prompt(&request);

        assert!(prompt.system_instruction.contains("Kazakh"));
        assert!(prompt.system_instruction.contains("one sentence per block"));
        assert!(prompt.system_instruction.contains("triple newline"));
        assert!(prompt.system_instruction.contains("between 3 and 15 seconds"));
        assert!(prompt.system_instruction.contains("numeral"));
        assert!(prompt.user_content.contains("volcanoes"));
        // No exclusion section when history is empty.
        assert!(!prompt.system_instruction.contains("previously generated"));
    }

    #[test]
    fn test_prompt_lists_forbidden_titles() {
        let request = GenerationRequest::new(
            "oceans",
            Language::Russian,
            vec!["Глубины".to_string(), "Приливы".to_string()],
        );
        let prompt = build_prompt(&request);

        assert!(prompt.system_instruction.contains("- Глубины"));
        assert!(prompt.system_instruction.contains("- Приливы"));
    }

    #[test]
    fn test_response_schema_shape() {
        let schema = build_prompt(&GenerationRequest::new(
            "anything",
            Language::Russian,
            vec![],
        ))
        .response_schema;

        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["books"]["type"], "array");
        let required = &schema["properties"]["books"]["items"]["required"];
        let required: Vec<&str> = required
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(required, vec!["title", "author", "category", "script"]);
    }
}
