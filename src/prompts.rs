//! Prompts for the text-generation features (smart formatting, summary).
//!
//! Centralising every prompt here serves two purposes:
//!
//! 1. **Single source of truth** — tweaking how cards are formatted or
//!    summarised means editing exactly one place.
//!
//! 2. **Testability** — unit tests can inspect the prompts directly without
//!    a live API, making prompt regressions easy to catch.

/// How much plain text is handed to the model at most, in characters.
///
/// Cards are short-form by nature; past a few thousand characters the extra
/// input only adds cost without changing the formatted result.
pub const MAX_PROMPT_CONTENT_CHARS: usize = 6000;

/// Build the smart-formatting prompt for extracted plain text.
pub fn format_prompt(plain_text: &str) -> String {
    format!(
        r#"You are a professional layout designer. Convert the following text into polished HTML suitable for a shareable social card.

Requirements:
1. Analyse the structure and identify the title, paragraphs, and key points
2. Use HTML tags: <h2> for the main title, <h3> for subtitles, <p> for paragraphs, <ul><li> for key points
3. Bold important content with <strong>
4. Keep the content concise and card-friendly
5. Output HTML directly — no markdown and no code fences

Original content:
{plain_text}

Output the HTML directly:"#
    )
}

/// Build the summary prompt for extracted plain text.
pub fn summary_prompt(plain_text: &str) -> String {
    format!(
        r#"You are a professional marketing copywriter. Distil the following article into shareable social-card content.

Requirements:
1. Extract 3-5 core points, one sentence each
2. Open with an attention-grabbing title
3. Close with a call to action inviting readers to scan the code for the full article
4. Keep the language concise and value-focused
5. Output HTML: <h2> for the title, <ul><li> for the points, <p> for the call to action
6. No markdown and no code fences

Article content:
{plain_text}

Output the HTML directly:"#
    )
}
