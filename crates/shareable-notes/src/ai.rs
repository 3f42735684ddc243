//! Remote AI insights.
//!
//! Sends a note to an OpenAI-compatible chat completion endpoint and splits
//! the reply into a summary, key themes and recommendations. There is one
//! request per call with no retry.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{Error, Result};

const SYSTEM_PROMPT: &str = "You are an AI assistant that analyzes notes and provides insights. \
Provide concise, helpful insights in the following format: 1. A brief summary, 2. Key themes, \
3. Recommendations for improvement or related topics.";

const USER_PROMPT_PREFIX: &str = "Analyze this note and provide insights: ";

const THEMES_MARKER: &str = "Key themes:";
const RECOMMENDATIONS_MARKER: &str = "Recommendations:";

/// Structured reply from the insights service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiInsights {
    /// Text before the themes section.
    pub summary: String,
    /// Text between the themes and recommendations markers.
    pub themes: String,
    /// Text after the recommendations marker.
    pub recommendations: String,
}

/// Drop characters outside printable ASCII and trim.
#[must_use]
pub fn clean_text(text: &str) -> String {
    text.chars()
        .filter(|c| (' '..='~').contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Split a model reply into its three sections.
///
/// Missing sections come back empty.
#[must_use]
pub fn parse_insights(reply: &str) -> AiInsights {
    let summary = reply
        .split(THEMES_MARKER)
        .next()
        .unwrap_or_default()
        .replacen("1. ", "", 1)
        .trim()
        .to_string();
    let themes = reply
        .split(THEMES_MARKER)
        .nth(1)
        .and_then(|rest| rest.split(RECOMMENDATIONS_MARKER).next())
        .map(|s| s.trim().to_string())
        .unwrap_or_default();
    let recommendations = reply
        .split(RECOMMENDATIONS_MARKER)
        .nth(1)
        .map(|s| s.trim().to_string())
        .unwrap_or_default();

    AiInsights {
        summary,
        themes,
        recommendations,
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}

/// A raw HTTP reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    /// HTTP status code.
    pub status: u16,
    /// Reason phrase, e.g. `Unauthorized`.
    pub status_text: String,
    /// Response body.
    pub body: String,
}

impl HttpReply {
    /// Whether the status is 2xx.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a JSON body to the insights endpoint.
pub trait InsightsTransport {
    /// POST `body` to `url` with a bearer token.
    ///
    /// Non-2xx statuses are returned as replies, not errors.
    ///
    /// # Errors
    ///
    /// Returns an error only when no reply was received.
    fn post_json(&self, url: &str, api_key: &str, body: &str) -> Result<HttpReply>;
}

/// Blocking HTTP transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    timeout: Duration,
}

impl HttpTransport {
    /// Create a transport with a per-request timeout.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl InsightsTransport for HttpTransport {
    fn post_json(&self, url: &str, api_key: &str, body: &str) -> Result<HttpReply> {
        let result = ureq::post(url)
            .set("Authorization", &format!("Bearer {api_key}"))
            .set("Content-Type", "application/json")
            .timeout(self.timeout)
            .send_string(body);

        match result {
            Ok(response) => {
                let status = response.status();
                let status_text = response.status_text().to_string();
                let body = response.into_string()?;
                Ok(HttpReply {
                    status,
                    status_text,
                    body,
                })
            }
            Err(ureq::Error::Status(status, response)) => {
                let status_text = response.status_text().to_string();
                let body = response.into_string().unwrap_or_default();
                Ok(HttpReply {
                    status,
                    status_text,
                    body,
                })
            }
            Err(ureq::Error::Transport(transport)) => {
                warn!(url, "Insights request failed: {}", transport);
                Err(Error::insights(format!("Failed to get insights: {transport}")))
            }
        }
    }
}

/// Client for the remote insights service.
#[derive(Debug, Clone)]
pub struct InsightsClient<T = HttpTransport> {
    transport: T,
    endpoint: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    api_key: Option<String>,
}

impl InsightsClient<HttpTransport> {
    /// Build a client using HTTP and the `[insights]` configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::with_transport(config, HttpTransport::new(config.insights_timeout()))
    }
}

impl<T: InsightsTransport> InsightsClient<T> {
    /// Build a client from configuration with a custom transport.
    #[must_use]
    pub fn with_transport(config: &Config, transport: T) -> Self {
        Self {
            transport,
            endpoint: config.insights.endpoint.clone(),
            model: config.insights.model.clone(),
            temperature: config.insights.temperature,
            max_tokens: config.insights.max_tokens,
            api_key: config.api_key(),
        }
    }

    /// Whether an API key is available.
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Ask the service for insights on `content`.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingApiKey`] if no key is configured.
    /// - [`Error::EmptyContent`] if nothing printable is left after cleaning.
    /// - [`Error::Insights`] if the request fails or the reply is unusable.
    pub fn analyze(&self, content: &str) -> Result<AiInsights> {
        let api_key = self.api_key.as_deref().ok_or(Error::MissingApiKey)?;

        let cleaned = clean_text(content);
        if cleaned.is_empty() {
            return Err(Error::EmptyContent);
        }

        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: format!("{USER_PROMPT_PREFIX}{cleaned}"),
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };
        let body = serde_json::to_string(&request)?;

        debug!(endpoint = %self.endpoint, chars = cleaned.len(), "Requesting insights");
        let reply = self.transport.post_json(&self.endpoint, api_key, &body)?;

        if !reply.is_success() {
            return Err(error_from_reply(&reply));
        }

        let response: ChatResponse = serde_json::from_str(&reply.body)
            .map_err(|e| Error::insights(format!("Failed to get insights: {e}")))?;
        let text = response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| Error::insights("Failed to get insights: empty response"))?;

        info!(status = reply.status, "Received insights");
        Ok(parse_insights(&text))
    }
}

fn error_from_reply(reply: &HttpReply) -> Error {
    let message = serde_json::from_str::<ErrorBody>(&reply.body)
        .ok()
        .and_then(|body| body.error)
        .and_then(|detail| detail.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            format!(
                "Failed to get insights: {} {}",
                reply.status, reply.status_text
            )
        });
    warn!(status = reply.status, "Insights request rejected: {}", message);
    Error::insights(message)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    struct MockTransport {
        reply: HttpReply,
        requests: RefCell<Vec<(String, String, String)>>,
    }

    impl MockTransport {
        fn replying(status: u16, status_text: &str, body: &str) -> Self {
            Self {
                reply: HttpReply {
                    status,
                    status_text: status_text.to_string(),
                    body: body.to_string(),
                },
                requests: RefCell::new(Vec::new()),
            }
        }

        fn ok_with(content: &str) -> Self {
            let body = serde_json::json!({
                "choices": [{ "message": { "role": "assistant", "content": content } }]
            });
            Self::replying(200, "OK", &body.to_string())
        }
    }

    impl InsightsTransport for &MockTransport {
        fn post_json(&self, url: &str, api_key: &str, body: &str) -> Result<HttpReply> {
            self.requests
                .borrow_mut()
                .push((url.to_string(), api_key.to_string(), body.to_string()));
            Ok(self.reply.clone())
        }
    }

    fn config_with_key() -> Config {
        let mut config = Config::default();
        config.insights.api_key = Some("test-key".to_string());
        config
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("  héllo\tworld\n "), "hlloworld");
        assert_eq!(clean_text("\u{1F600}"), "");
        assert_eq!(clean_text("<p>Hi</p>"), "<p>Hi</p>");
    }

    #[test]
    fn test_parse_full_reply() {
        let reply = "1. Summary text. Key themes: rust, notes Recommendations: write more";
        let parsed = parse_insights(reply);
        assert_eq!(parsed.summary, "Summary text.");
        assert_eq!(parsed.themes, "rust, notes");
        assert_eq!(parsed.recommendations, "write more");
    }

    #[test]
    fn test_parse_missing_sections() {
        let parsed = parse_insights("Just a summary");
        assert_eq!(parsed.summary, "Just a summary");
        assert!(parsed.themes.is_empty());
        assert!(parsed.recommendations.is_empty());
    }

    #[test]
    fn test_parse_recommendations_without_themes() {
        let parsed = parse_insights("Sum Recommendations: more tests");
        assert_eq!(parsed.summary, "Sum Recommendations: more tests");
        assert!(parsed.themes.is_empty());
        assert_eq!(parsed.recommendations, "more tests");
    }

    #[test]
    fn test_analyze_sends_chat_request() {
        let transport = MockTransport::ok_with("1. Short. Key themes: a Recommendations: b");
        let client = InsightsClient::with_transport(&config_with_key(), &transport);

        let insights = client.analyze("<p>Hello</p>").unwrap();
        assert_eq!(insights.summary, "Short.");
        assert_eq!(insights.themes, "a");
        assert_eq!(insights.recommendations, "b");

        let requests = transport.requests.borrow();
        assert_eq!(requests.len(), 1);
        let (url, key, body) = &requests[0];
        assert_eq!(url, "https://api.groq.com/openai/v1/chat/completions");
        assert_eq!(key, "test-key");

        let body: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(body["model"], "llama-3.3-70b-versatile");
        assert_eq!(body["max_tokens"], 500);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(
            body["messages"][1]["content"],
            "Analyze this note and provide insights: <p>Hello</p>"
        );
    }

    #[test]
    fn test_missing_key_is_checked_first() {
        let transport = MockTransport::ok_with("x");
        let mut config = Config::default();
        config.insights.api_key = None;
        let mut client = InsightsClient::with_transport(&config, &transport);
        client.api_key = None;

        assert!(!client.has_api_key());
        assert!(matches!(client.analyze(""), Err(Error::MissingApiKey)));
        assert!(transport.requests.borrow().is_empty());
    }

    #[test]
    fn test_empty_content_is_rejected() {
        let transport = MockTransport::ok_with("x");
        let client = InsightsClient::with_transport(&config_with_key(), &transport);

        let err = client.analyze(" \u{2603} ").unwrap_err();
        assert_eq!(err.to_string(), "Please enter some text to analyze.");
        assert!(transport.requests.borrow().is_empty());
    }

    #[test]
    fn test_error_message_from_body() {
        let transport = MockTransport::replying(
            401,
            "Unauthorized",
            r#"{"error":{"message":"Invalid API Key"}}"#,
        );
        let client = InsightsClient::with_transport(&config_with_key(), &transport);

        let err = client.analyze("hello").unwrap_err();
        assert_eq!(err.to_string(), "Invalid API Key");
    }

    #[test]
    fn test_error_falls_back_to_status() {
        let transport = MockTransport::replying(503, "Service Unavailable", "<html>down</html>");
        let client = InsightsClient::with_transport(&config_with_key(), &transport);

        let err = client.analyze("hello").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to get insights: 503 Service Unavailable"
        );
    }

    #[test]
    fn test_reply_without_choices() {
        let transport = MockTransport::replying(200, "OK", r#"{"choices":[]}"#);
        let client = InsightsClient::with_transport(&config_with_key(), &transport);

        assert!(matches!(client.analyze("hello"), Err(Error::Insights(_))));
    }
}
