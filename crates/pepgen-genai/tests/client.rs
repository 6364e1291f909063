//! Integration tests for the generation API client using wiremock HTTP mocks.

use pepgen_core::{Category, Peptide};
use pepgen_genai::{article, image, topic, GenAiClient, GenAiConfig, GenAiError};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> GenAiClient {
    GenAiClient::new(&GenAiConfig {
        base_url: base_url.to_owned(),
        api_key: "test-key".to_owned(),
        text_model: "test/text-model".to_owned(),
        image_model: "test/image-model".to_owned(),
        timeout_secs: 30,
    })
    .expect("client construction should not fail")
}

fn peptide_catalog() -> Vec<Peptide> {
    vec![
        Peptide {
            name: "BPC-157".to_owned(),
            slug: "bpc-157".to_owned(),
        },
        Peptide {
            name: "TB-500".to_owned(),
            slug: "tb-500".to_owned(),
        },
    ]
}

fn category_list() -> Vec<Category> {
    vec![Category {
        slug: "research".to_owned(),
        label: "Research".to_owned(),
    }]
}

#[tokio::test]
async fn select_topic_parses_json_content() {
    let server = MockServer::start().await;

    let content = serde_json::json!({
        "keyword": "bpc-157 healing",
        "title": "How BPC-157 Supports Soft Tissue Recovery",
        "reasoning": "No existing article covers recovery timelines."
    })
    .to_string();

    let body = serde_json::json!({
        "choices": [ { "message": { "content": content } } ]
    });

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(serde_json::json!({
            "model": "test/text-model",
            "response_format": { "type": "json_object" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let decision = topic::select_topic(
        &client,
        &["Peptides 101".to_owned()],
        &peptide_catalog(),
        Some("focus on recovery"),
    )
    .await
    .expect("should parse topic decision");

    assert_eq!(decision.keyword, "bpc-157 healing");
    assert_eq!(decision.title, "How BPC-157 Supports Soft Tissue Recovery");
}

#[tokio::test]
async fn select_topic_maps_429_to_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = topic::select_topic(&client, &[], &[], None)
        .await
        .unwrap_err();
    assert!(matches!(err, GenAiError::RateLimited(_)), "got {err:?}");
}

#[tokio::test]
async fn select_topic_maps_402_to_quota_exhausted() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(402).set_body_string("insufficient credit"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = topic::select_topic(&client, &[], &[], None)
        .await
        .unwrap_err();
    assert!(matches!(err, GenAiError::QuotaExhausted(_)), "got {err:?}");
}

#[tokio::test]
async fn select_topic_rejects_non_json_content() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "choices": [ { "message": { "content": "Sure! Here is a topic idea:" } } ]
    });

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = topic::select_topic(&client, &[], &[], None)
        .await
        .unwrap_err();
    assert!(matches!(err, GenAiError::Deserialize { .. }), "got {err:?}");
}

fn article_arguments() -> String {
    serde_json::json!({
        "title": "BPC-157 Dosing Protocols Explained",
        "summary": "A practical walkthrough of published dosing ranges.",
        "category": "research",
        "table_of_contents": [
            { "id": "overview", "title": "Overview", "level": 2 }
        ],
        "content": [
            { "type": "heading", "id": "overview", "level": 2, "text": "Overview" },
            { "type": "paragraph", "text": "Dosing varies widely across studies." },
            { "type": "callout", "variant": "warning", "text": "Research use only." }
        ],
        "read_time": "6 min read",
        "related_peptides": ["BPC-157"],
        "matched_peptide_slugs": ["bpc-157", "not-in-catalog"]
    })
    .to_string()
}

#[tokio::test]
async fn generate_article_parses_tool_call_arguments() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "choices": [ { "message": {
            "tool_calls": [ { "function": {
                "name": "create_article",
                "arguments": article_arguments()
            } } ]
        } } ]
    });

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(serde_json::json!({
            "tool_choice": { "type": "function", "function": { "name": "create_article" } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let decision = topic::TopicDecision {
        keyword: "bpc-157 dosing".to_owned(),
        title: "BPC-157 Dosing Protocols Explained".to_owned(),
        reasoning: "High search interest.".to_owned(),
    };

    let draft = article::generate_article(
        &client,
        &decision,
        pepgen_core::TargetLength::Standard,
        None,
        &category_list(),
        &peptide_catalog(),
    )
    .await
    .expect("should parse article draft");

    assert_eq!(draft.title, "BPC-157 Dosing Protocols Explained");
    assert_eq!(draft.slug, "bpc-157-dosing-protocols-explained");
    assert_eq!(draft.category, "research");
    assert!(!draft.is_new_category);
    assert_eq!(draft.content.len(), 3);
    // Unknown catalog slugs are dropped during validation.
    assert_eq!(draft.matched_peptide_slugs, vec!["bpc-157".to_owned()]);
}

#[tokio::test]
async fn generate_article_without_tool_call_is_missing_payload() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "choices": [ { "message": { "content": "I wrote the article below instead." } } ]
    });

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let decision = topic::TopicDecision {
        keyword: "k".to_owned(),
        title: "T".to_owned(),
        reasoning: "r".to_owned(),
    };

    let err = article::generate_article(
        &client,
        &decision,
        pepgen_core::TargetLength::Short,
        None,
        &category_list(),
        &peptide_catalog(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, GenAiError::MissingPayload(_)), "got {err:?}");
}

#[tokio::test]
async fn generate_article_with_malformed_arguments_is_deserialize_error() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "choices": [ { "message": {
            "tool_calls": [ { "function": {
                "name": "create_article",
                "arguments": "{\"title\": \"unterminated"
            } } ]
        } } ]
    });

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let decision = topic::TopicDecision {
        keyword: "k".to_owned(),
        title: "T".to_owned(),
        reasoning: "r".to_owned(),
    };

    let err = article::generate_article(
        &client,
        &decision,
        pepgen_core::TargetLength::Long,
        None,
        &category_list(),
        &peptide_catalog(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, GenAiError::Deserialize { .. }), "got {err:?}");
}

#[tokio::test]
async fn generate_image_decodes_base64_payload() {
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine as _;

    let server = MockServer::start().await;

    let data_url = format!("data:image/png;base64,{}", BASE64.encode(b"fake-png-bytes"));
    let body = serde_json::json!({
        "choices": [ { "message": {
            "images": [ { "image_url": { "url": data_url } } ]
        } } ]
    });

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(serde_json::json!({
            "model": "test/image-model",
            "modalities": ["image", "text"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let payload = image::generate_image(&client, "A calm laboratory scene")
        .await
        .expect("should decode image");
    assert_eq!(payload.bytes, b"fake-png-bytes");
}

#[tokio::test]
async fn generate_image_without_image_is_missing_payload() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "choices": [ { "message": { "content": "no image this time" } } ]
    });

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = image::generate_image(&client, "anything")
        .await
        .unwrap_err();
    assert!(matches!(err, GenAiError::MissingPayload(_)), "got {err:?}");
}
