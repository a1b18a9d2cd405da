//! Mock Gemini server for testing text generation
//!
//! Provides a [`MockGeminiServer`] that simulates the generateContent
//! endpoint for testing AI-related functionality without a real service.

use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mock Gemini server for testing text generation
///
/// This struct wraps a [`wiremock::MockServer`] and provides convenience
/// methods for setting up common generateContent responses.
///
/// # Example
///
/// ```rust,ignore
/// use moodmix_test_utils::MockGeminiServer;
///
/// #[tokio::test]
/// async fn test_generation() {
///     let server = MockGeminiServer::start().await;
///     server.mock_generate_success("{\"mood\": \"happy\"}").await;
///
///     // Configure your Gemini client with server.url()
/// }
/// ```
pub struct MockGeminiServer {
    server: MockServer,
}

/// Matches any model's generateContent path
const GENERATE_PATH: &str = r"^/v1beta/models/.+:generateContent$";

impl MockGeminiServer {
    /// Start a new mock Gemini server
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Get the server URL
    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// Get reference to the underlying mock server for custom mock setups
    pub fn inner(&self) -> &MockServer {
        &self.server
    }

    /// Build a generateContent response body around candidate text
    pub fn candidate_body(text: &str) -> serde_json::Value {
        json!({
            "candidates": [
                {
                    "content": {"parts": [{"text": text}]},
                    "finishReason": "STOP"
                }
            ]
        })
    }

    /// Mount a mock returning `text` for any generateContent request
    pub async fn mock_generate_success(&self, text: &str) {
        Mock::given(method("POST"))
            .and(path_regex(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(Self::candidate_body(text)))
            .mount(&self.server)
            .await;
    }

    /// Mount a mock returning `text` only for prompts containing `marker`
    ///
    /// Useful when a test drives two different prompts against the same
    /// endpoint (mood analysis then parameter mapping).
    pub async fn mock_generate_containing(&self, marker: &str, text: &str) {
        Mock::given(method("POST"))
            .and(path_regex(GENERATE_PATH))
            .and(body_string_contains(marker))
            .respond_with(ResponseTemplate::new(200).set_body_json(Self::candidate_body(text)))
            .mount(&self.server)
            .await;
    }

    /// Mount a mock returning a JSON payload wrapped in conversational prose
    pub async fn mock_generate_json_with_prose(&self, marker: &str, payload: serde_json::Value) {
        let text = format!(
            "Sure! Here is the analysis you asked for:\n{}\nLet me know if you need anything else.",
            serde_json::to_string(&payload).expect("payload serializes")
        );
        self.mock_generate_containing(marker, &text).await;
    }

    /// Mount a mock returning prose with no structured payload at all
    pub async fn mock_generate_prose_only(&self) {
        self.mock_generate_success(
            "I'm sorry, I can only describe moods in natural language today.",
        )
        .await;
    }

    /// Mount a mock for generation failure
    pub async fn mock_generate_failure(&self, status_code: u16, error_message: &str) {
        Mock::given(method("POST"))
            .and(path_regex(GENERATE_PATH))
            .respond_with(
                ResponseTemplate::new(status_code).set_body_json(json!({
                    "error": {"message": error_message}
                })),
            )
            .mount(&self.server)
            .await;
    }

    /// Mount a mock returning a response with no candidates
    pub async fn mock_generate_no_candidates(&self) {
        Mock::given(method("POST"))
            .and(path_regex(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
            .mount(&self.server)
            .await;
    }
}
