use serde::{Deserialize, Serialize};

// ===== Local Completion Endpoint =====

#[derive(Debug, Serialize)]
pub struct CompletionOptions {
    pub temperature: f32,
    pub num_predict: u32,
}

#[derive(Debug, Serialize)]
pub struct CompletionPayload<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub stream: bool,
    pub options: CompletionOptions,
}

#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    pub response: String,
}

#[derive(Debug, Deserialize)]
pub struct TagsResponse {
    #[serde(default)]
    pub models: Vec<TagEntry>,
}

#[derive(Debug, Deserialize)]
pub struct TagEntry {
    pub name: String,
}

// ===== Hosted Chat Completion API =====

#[derive(Debug, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ChatPayload<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatReply,
}

#[derive(Debug, Deserialize)]
pub struct ChatReply {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ModelsResponse {
    #[serde(default)]
    pub data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ModelEntry {
    pub id: String,
}

/// Error envelope both backends use, `{"error": "..."}` or `{"error": {"message": "..."}}`.
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ErrorBody {
    Message(String),
    Detailed { message: String },
}

impl ErrorBody {
    pub fn message(&self) -> &str {
        match self {
            ErrorBody::Message(message) => message,
            ErrorBody::Detailed { message } => message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_local_tags_listing() {
        let body = r#"{"models":[{"name":"llama3.1:latest","size":4661224676},{"name":"mistral"}]}"#;
        let tags: TagsResponse = serde_json::from_str(body).unwrap();
        let names: Vec<_> = tags.models.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["llama3.1:latest", "mistral"]);
    }

    #[test]
    fn parses_chat_completion_choice() {
        let body = r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"Dear Hiring Manager"}}]}"#;
        let chat: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(
            chat.choices[0].message.content.as_deref(),
            Some("Dear Hiring Manager")
        );
    }

    #[test]
    fn error_envelope_accepts_both_shapes() {
        let flat: ErrorEnvelope = serde_json::from_str(r#"{"error":"model 'x' not found"}"#).unwrap();
        assert_eq!(flat.error.message(), "model 'x' not found");

        let nested: ErrorEnvelope =
            serde_json::from_str(r#"{"error":{"message":"invalid api key","type":"auth"}}"#).unwrap();
        assert_eq!(nested.error.message(), "invalid api key");
    }

    #[test]
    fn completion_payload_disables_streaming() {
        let payload = CompletionPayload {
            model: "llama3.1",
            prompt: "hello",
            stream: false,
            options: CompletionOptions {
                temperature: 0.7,
                num_predict: 1000,
            },
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["stream"], false);
        assert_eq!(json["options"]["num_predict"], 1000);
    }
}
