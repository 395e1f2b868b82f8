use serde::{Deserialize, Serialize};

use crate::web::models::{Message, Role};

/// Persona and topic steering sent ahead of every user message.
pub const SYSTEM_PROMPT: &str = concat!(
    "You are \"Alpha Soil\", an AI assistant.\n",
    "Prioritize answers regarding soil, agriculture, farming, and economy.\n",
    "If someone asks who created you, respond: \"Dinula Wijasinghe\".\n",
    "Keep answers informative, clear, and professional.\n",
);

#[derive(Debug, Serialize)]
pub struct CompletionPayload {
    pub model: String,
    pub messages: Vec<Message>,
}

impl CompletionPayload {
    pub fn new(model: &str, user_message: &str) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![
                Message {
                    role: Role::System,
                    content: SYSTEM_PROMPT.to_string(),
                },
                Message {
                    role: Role::User,
                    content: user_message.to_string(),
                },
            ],
        }
    }
}

// Only the fields we read; everything else in the upstream body is ignored.
#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

impl CompletionResponse {
    /// Content of the first choice, if there is any non-empty one.
    pub fn into_first_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()?
            .message?
            .content
            .filter(|content| !content.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_puts_system_prompt_before_user_message() {
        let payload = CompletionPayload::new("mistral-medium-2505", "How do I test soil pH?");
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(
            value,
            json!({
                "model": "mistral-medium-2505",
                "messages": [
                    { "role": "system", "content": SYSTEM_PROMPT },
                    { "role": "user", "content": "How do I test soil pH?" }
                ]
            })
        );
    }

    #[test]
    fn system_prompt_carries_persona_and_creator() {
        assert!(SYSTEM_PROMPT.contains("Alpha Soil"));
        assert!(SYSTEM_PROMPT.contains("soil, agriculture, farming, and economy"));
        assert!(SYSTEM_PROMPT.contains("Dinula Wijasinghe"));
        assert!(SYSTEM_PROMPT.contains("professional"));
    }

    #[test]
    fn first_content_is_extracted() {
        let response: CompletionResponse = serde_json::from_value(json!({
            "id": "cmpl-1",
            "choices": [
                { "index": 0, "message": { "role": "assistant", "content": "Loam drains well." } },
                { "index": 1, "message": { "role": "assistant", "content": "ignored" } }
            ],
            "usage": { "prompt_tokens": 10 }
        }))
        .unwrap();

        assert_eq!(response.into_first_content().as_deref(), Some("Loam drains well."));
    }

    #[test]
    fn absent_content_yields_none() {
        let bodies = [
            json!({}),
            json!({ "choices": [] }),
            json!({ "choices": [{}] }),
            json!({ "choices": [{ "message": {} }] }),
            json!({ "choices": [{ "message": { "content": null } }] }),
            json!({ "choices": [{ "message": { "content": "" } }] }),
        ];

        for body in bodies {
            let response: CompletionResponse = serde_json::from_value(body.clone()).unwrap();
            assert!(response.into_first_content().is_none(), "body: {}", body);
        }
    }
}
