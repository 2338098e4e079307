//! Text generation: the smart-formatting and summary collaborator.
//!
//! The external API is an opaque request/response collaborator: given a key
//! and a prompt it returns text or fails with an HTTP-style status. This
//! module owns the thin client, the status-to-error mapping (401/403 →
//! invalid key, 429 → rate limited), and the response cleanup the caller
//! would otherwise have to repeat — models occasionally wrap their output
//! in code fences despite being told not to.

use crate::error::ExportError;
use crate::prompts::{self, MAX_PROMPT_CONTENT_CHARS};
use futures::future::BoxFuture;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Opaque text-generation collaborator.
pub trait TextGenerator: Send + Sync {
    /// Complete `prompt` into generated text.
    fn complete<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, ExportError>>;
}

/// [`TextGenerator`] backed by the GLM chat-completions API.
pub struct GlmClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl GlmClient {
    pub const DEFAULT_ENDPOINT: &'static str =
        "https://open.bigmodel.cn/api/paas/v4/chat/completions";
    pub const DEFAULT_MODEL: &'static str = "glm-4-flash";

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: Self::DEFAULT_MODEL.to_string(),
            endpoint: Self::DEFAULT_ENDPOINT.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Point the client at a different endpoint (test servers, gateways).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: String,
}

#[derive(Deserialize, Default)]
struct ApiErrorBody {
    error: Option<ApiErrorDetail>,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
}

impl TextGenerator for GlmClient {
    fn complete<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, ExportError>> {
        Box::pin(async move {
            let body = ChatRequest {
                model: &self.model,
                messages: vec![ChatMessage {
                    role: "user",
                    content: prompt,
                }],
                temperature: 0.7,
                max_tokens: 4096,
            };

            let response = self
                .client
                .post(&self.endpoint)
                .bearer_auth(&self.api_key)
                .json(&body)
                .send()
                .await
                .map_err(|e| ExportError::Request {
                    reason: e.to_string(),
                })?;

            let status = response.status();
            if !status.is_success() {
                let error_body: ApiErrorBody = response.json().await.unwrap_or_default();
                return Err(match status.as_u16() {
                    401 | 403 => ExportError::InvalidApiKey {
                        status: status.as_u16(),
                    },
                    429 => ExportError::RateLimited,
                    code => ExportError::TextGeneration {
                        message: error_body
                            .error
                            .and_then(|e| e.message)
                            .unwrap_or_else(|| format!("request failed: {code}")),
                    },
                });
            }

            let parsed: ChatResponse = response.json().await.map_err(|e| ExportError::Request {
                reason: format!("malformed response: {e}"),
            })?;
            let content = parsed
                .choices
                .into_iter()
                .next()
                .map(|choice| choice.message.content)
                .unwrap_or_default();
            debug!("text generation returned {} chars", content.len());
            Ok(content)
        })
    }
}

// Models sometimes fence their output despite the prompt; both the opening
// marker (with or without a language) and the bare closing marker go.
static RE_CODE_FENCES: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)```(?:html)?\n?").unwrap());

/// Strip fenced code-block markers from a model response.
pub fn strip_code_fences(text: &str) -> String {
    RE_CODE_FENCES.replace_all(text, "").trim().to_string()
}

static RE_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Reduce an HTML fragment to its plain text.
///
/// Tags go, the common entities decode; good enough for prompt-building,
/// where the model only needs readable words.
pub fn extract_text_from_html(html: &str) -> String {
    let stripped = RE_TAG.replace_all(html, " ");
    let decoded = stripped
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate on a char boundary so multi-byte text never splits mid-character.
fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Reformat card content into clean, card-friendly HTML.
pub async fn smart_format(
    generator: &dyn TextGenerator,
    content_html: &str,
) -> Result<String, ExportError> {
    let text = extract_text_from_html(content_html);
    let prompt = prompts::format_prompt(truncate_chars(&text, MAX_PROMPT_CONTENT_CHARS));
    let output = generator.complete(&prompt).await?;
    Ok(strip_code_fences(&output))
}

/// Distil card content into a short shareable summary.
pub async fn summarize(
    generator: &dyn TextGenerator,
    content_html: &str,
) -> Result<String, ExportError> {
    let text = extract_text_from_html(content_html);
    let prompt = prompts::summary_prompt(truncate_chars(&text, MAX_PROMPT_CONTENT_CHARS));
    let output = generator.complete(&prompt).await?;
    Ok(strip_code_fences(&output))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CannedGenerator {
        reply: Result<String, fn() -> ExportError>,
    }

    impl TextGenerator for CannedGenerator {
        fn complete<'a>(&'a self, _prompt: &'a str) -> BoxFuture<'a, Result<String, ExportError>> {
            Box::pin(async move {
                match &self.reply {
                    Ok(s) => Ok(s.clone()),
                    Err(make) => Err(make()),
                }
            })
        }
    }

    #[test]
    fn strips_fences_with_language() {
        assert_eq!(
            strip_code_fences("```html\n<h2>Hi</h2>\n```"),
            "<h2>Hi</h2>"
        );
    }

    #[test]
    fn strips_bare_fences() {
        assert_eq!(strip_code_fences("```\n<p>x</p>\n```\n"), "<p>x</p>");
    }

    #[test]
    fn unfenced_text_passes_through() {
        assert_eq!(strip_code_fences("  <p>x</p> "), "<p>x</p>");
    }

    #[test]
    fn extract_text_strips_tags_and_decodes_entities() {
        assert_eq!(
            extract_text_from_html("<h2>A &amp; B</h2><p>it&#39;s&nbsp;fine</p>"),
            "A & B it's fine"
        );
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let s = "日本語テキスト";
        assert_eq!(truncate_chars(s, 3), "日本語");
        assert_eq!(truncate_chars("short", 100), "short");
    }

    #[tokio::test]
    async fn smart_format_strips_fences_from_the_reply() {
        let generator = CannedGenerator {
            reply: Ok("```html\n<h2>Title</h2>\n```".to_string()),
        };
        let out = smart_format(&generator, "<p>some content</p>").await.unwrap();
        assert_eq!(out, "<h2>Title</h2>");
    }

    #[tokio::test]
    async fn auth_errors_propagate_untouched() {
        let generator = CannedGenerator {
            reply: Err(|| ExportError::InvalidApiKey { status: 401 }),
        };
        let err = summarize(&generator, "<p>x</p>").await.unwrap_err();
        assert!(matches!(err, ExportError::InvalidApiKey { status: 401 }));
    }
}
