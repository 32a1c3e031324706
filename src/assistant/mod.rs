//! Teaching assistant backed by an OpenAI-compatible chat-completion API.
//!
//! Two capabilities: free-form tutoring answers grounded in lesson text,
//! and quiz draft generation. Drafts are parsed and validated before they
//! reach an author; a model response that does not survive validation is
//! an upstream error, never a stored quiz.

mod prompts;

use std::time::Duration;

use crate::config::{self, AssistantConfig};
use crate::domain::{Quiz, ValidationIssue, validate_quiz};

#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("upstream returned status {status}")]
    Status { status: u16, body: String },

    #[error("response had no content")]
    EmptyResponse,

    #[error("draft was not valid JSON: {0}")]
    MalformedDraft(String),

    #[error("draft failed quiz validation ({} issues)", .0.len())]
    InvalidDraft(Vec<ValidationIssue>),
}

pub struct AssistantClient {
    http: reqwest::Client,
    config: AssistantConfig,
}

impl AssistantClient {
    pub fn new(config: AssistantConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config::ASSISTANT_TIMEOUT_SECS))
            .build()?;
        Ok(Self { http, config })
    }

    /// Answer a learner's question, grounded in the lesson body when given
    pub async fn ask(
        &self,
        question: &str,
        lesson_context: Option<&str>,
    ) -> Result<String, AssistantError> {
        let user = match lesson_context {
            Some(body) => format!("Lesson material:\n{}\n\nQuestion: {}", body, question),
            None => question.to_string(),
        };
        let content = self.chat(prompts::TUTOR_SYSTEM, &user).await?;
        Ok(content.trim().to_string())
    }

    /// Generate a quiz draft on a topic. The draft is validated with the
    /// same rules as author-written quizzes.
    pub async fn draft_quiz(
        &self,
        topic: &str,
        question_count: usize,
        lesson_context: Option<&str>,
    ) -> Result<Quiz, AssistantError> {
        let count = question_count.clamp(1, config::ASSISTANT_MAX_DRAFT_QUESTIONS);
        let user = prompts::quiz_draft_request(topic, count, lesson_context);
        let content = self.chat(prompts::QUIZ_DRAFT_SYSTEM, &user).await?;
        parse_draft(&content)
    }

    async fn chat(&self, system: &str, user: &str) -> Result<String, AssistantError> {
        let body = serde_json::json!({
            "model": self.config.model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user},
            ],
            "temperature": 0.2,
            "max_tokens": config::ASSISTANT_MAX_TOKENS,
            "stream": false,
        });

        tracing::debug!("Assistant request to {}/chat/completions", self.config.base_url);
        let response = self
            .http
            .post(format!("{}/chat/completions", self.config.base_url))
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Assistant upstream error {}: {}", status, body);
            return Err(AssistantError::Status { status, body });
        }

        let response_json: serde_json::Value = response.json().await?;
        let content = response_json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or(AssistantError::EmptyResponse)?;
        Ok(content.to_string())
    }
}

fn parse_draft(content: &str) -> Result<Quiz, AssistantError> {
    let json = strip_code_fences(content);
    let quiz: Quiz =
        serde_json::from_str(json).map_err(|e| AssistantError::MalformedDraft(e.to_string()))?;
    validate_quiz(&quiz).map_err(AssistantError::InvalidDraft)?;
    Ok(quiz)
}

/// Models wrap JSON in markdown fences no matter how the prompt forbids it
fn strip_code_fences(content: &str) -> &str {
    let mut cleaned = content.trim();
    if let Some(rest) = cleaned.strip_prefix("```json") {
        cleaned = rest.trim_start();
    } else if let Some(rest) = cleaned.strip_prefix("```") {
        cleaned = rest.trim_start();
    }
    if let Some(rest) = cleaned.strip_suffix("```") {
        cleaned = rest.trim_end();
    }
    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AnswerKey, QuestionKind};

    const DRAFT: &str = r#"{
      "passing_score": 70,
      "questions": [
        {
          "prompt": "Which layer does TCP belong to?",
          "kind": "single",
          "options": ["Application", "Transport"],
          "answer_key": "Transport",
          "points": 1.0
        }
      ]
    }"#;

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("{\"a\": 1}"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("  ```json\n[]\n```  "), "[]");
    }

    #[test]
    fn test_parse_draft_accepts_fenced_json() {
        let fenced = format!("```json\n{}\n```", DRAFT);
        let quiz = parse_draft(&fenced).unwrap();
        assert_eq!(quiz.questions.len(), 1);
        assert_eq!(quiz.questions[0].kind, QuestionKind::Single);
        assert_eq!(quiz.questions[0].answer_key, AnswerKey::One("Transport".to_string()));
    }

    #[test]
    fn test_parse_draft_rejects_prose() {
        let err = parse_draft("Sure! Here is a quiz about TCP...").unwrap_err();
        assert!(matches!(err, AssistantError::MalformedDraft(_)));
    }

    #[test]
    fn test_parse_draft_rejects_invalid_quiz() {
        // answer key references an option that does not exist
        let draft = r#"{
          "passing_score": 70,
          "questions": [
            {"prompt": "Q", "kind": "single", "options": ["A"], "answer_key": "B"}
          ]
        }"#;
        let err = parse_draft(draft).unwrap_err();
        assert!(matches!(err, AssistantError::InvalidDraft(_)));
    }
}
