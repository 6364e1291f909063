//! Topic selection: one JSON-constrained chat call that picks a fresh
//! article topic given recent titles and the peptide catalog.

use pepgen_core::Peptide;
use serde::Deserialize;
use serde_json::json;

use crate::client::GenAiClient;
use crate::error::GenAiError;
use crate::types::{ChatMessage, ChatRequest};

/// The keyword/title/reasoning chosen for one pipeline run.
///
/// Ephemeral — never persisted. Title novelty against the supplied recent
/// titles is instructed, not mechanically enforced.
#[derive(Debug, Clone, Deserialize)]
pub struct TopicDecision {
    pub keyword: String,
    pub title: String,
    pub reasoning: String,
}

const SYSTEM_PROMPT: &str = "You are the editorial planner for an educational site about \
research peptides. Pick one article topic that is genuinely useful to readers and clearly \
distinct from every already-published title you are given (compare case-insensitively). \
Respond with a single JSON object: \
{\"keyword\": string, \"title\": string, \"reasoning\": string}. No other text.";

/// Select one novel topic.
///
/// A single chat call with `response_format: json_object`; the message
/// content is parsed directly as the decision object. Any non-2xx response
/// or unparseable body is fatal for the run — retries happen at no layer
/// for topic selection.
///
/// # Errors
///
/// Propagates client errors; an empty or malformed reply is
/// [`GenAiError::MissingPayload`] / [`GenAiError::Deserialize`], and a
/// decision with an empty keyword or title is [`GenAiError::Invalid`].
pub async fn select_topic(
    client: &GenAiClient,
    existing_titles: &[String],
    peptides: &[Peptide],
    steering: Option<&str>,
) -> Result<TopicDecision, GenAiError> {
    let mut user = String::new();
    if existing_titles.is_empty() {
        user.push_str("No articles have been published yet.\n");
    } else {
        user.push_str("Already published titles (do not repeat any of these):\n");
        for title in existing_titles {
            user.push_str("- ");
            user.push_str(title);
            user.push('\n');
        }
    }

    if !peptides.is_empty() {
        user.push_str("\nPeptides covered by the product catalog:\n");
        for peptide in peptides {
            user.push_str("- ");
            user.push_str(&peptide.name);
            user.push('\n');
        }
    }

    if let Some(context) = steering {
        if !context.trim().is_empty() {
            user.push_str("\nEditorial guidance from the site owner: ");
            user.push_str(context.trim());
            user.push('\n');
        }
    }

    user.push_str("\nChoose the next topic.");

    let mut request = ChatRequest::new(
        client.text_model(),
        vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(user)],
    );
    request.response_format = Some(json!({ "type": "json_object" }));

    let response = client.chat(&request).await?;
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| GenAiError::MissingPayload("topic selection returned no content".into()))?;

    let decision: TopicDecision =
        serde_json::from_str(content.trim()).map_err(|e| GenAiError::Deserialize {
            context: "topic selection content".to_owned(),
            source: e,
        })?;

    if decision.title.trim().is_empty() || decision.keyword.trim().is_empty() {
        return Err(GenAiError::Invalid(
            "topic decision has an empty keyword or title".to_owned(),
        ));
    }

    Ok(decision)
}
