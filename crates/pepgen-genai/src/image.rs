//! Image generation: one chat call with image modality, returning decoded
//! PNG bytes from the base64 data URL in the response.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::client::GenAiClient;
use crate::error::GenAiError;
use crate::types::{ChatMessage, ChatRequest};

/// Decoded bytes of one generated image.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    pub bytes: Vec<u8>,
}

/// Generate one image from a prompt.
///
/// # Errors
///
/// Propagates client errors; a response without an image payload or with a
/// malformed data URL is [`GenAiError::MissingPayload`] — callers treat that
/// as retryable within their attempt budget.
pub async fn generate_image(
    client: &GenAiClient,
    prompt: &str,
) -> Result<ImagePayload, GenAiError> {
    let mut request = ChatRequest::new(
        client.image_model(),
        vec![ChatMessage::user(prompt.to_owned())],
    );
    request.modalities = Some(vec!["image", "text"]);

    let response = client.chat(&request).await?;
    let data_url = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.images.into_iter().next())
        .map(|image| image.image_url.url)
        .ok_or_else(|| {
            GenAiError::MissingPayload("image generation returned no image".into())
        })?;

    let bytes = decode_data_url(&data_url)?;
    Ok(ImagePayload { bytes })
}

/// Decode a `data:image/...;base64,....` URL into raw bytes.
fn decode_data_url(url: &str) -> Result<Vec<u8>, GenAiError> {
    let encoded = url
        .split_once("base64,")
        .map(|(_, rest)| rest)
        .ok_or_else(|| {
            GenAiError::MissingPayload("image url is not a base64 data URL".into())
        })?;

    BASE64.decode(encoded.trim()).map_err(|e| {
        GenAiError::MissingPayload(format!("image payload failed base64 decode: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_data_url_extracts_bytes() {
        let url = format!("data:image/png;base64,{}", BASE64.encode(b"png-bytes"));
        assert_eq!(decode_data_url(&url).expect("decode"), b"png-bytes");
    }

    #[test]
    fn decode_data_url_rejects_plain_url() {
        let err = decode_data_url("https://cdn.example.com/image.png").unwrap_err();
        assert!(matches!(err, GenAiError::MissingPayload(_)));
    }

    #[test]
    fn decode_data_url_rejects_bad_base64() {
        let err = decode_data_url("data:image/png;base64,@@@not-base64@@@").unwrap_err();
        assert!(matches!(err, GenAiError::MissingPayload(_)));
    }
}
