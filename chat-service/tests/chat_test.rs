mod common;

use common::TestApp;
use reqwest::Client;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const NO_CONTEXT_MESSAGE: &str = "I couldn't find any relevant information in the uploaded documents to answer your question. Please make sure your question is related to the content of the documents.";

fn document_body(id: i64, name: &str, conversation: serde_json::Value) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "originalFilename": "test.pdf",
        "contentType": "application/pdf",
        "fileSize": 1024,
        "createdAt": "2024-01-01T10:00:00",
        "chunkCount": 1,
        "conversation": conversation
    })
}

fn genai_body(text: &str) -> serde_json::Value {
    json!({"content": {"parts": [{"text": text}]}})
}

#[tokio::test]
async fn chat_without_any_content_returns_canned_message() {
    let document_service = MockServer::start().await;
    let genai_service = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/documents/search/similar"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&document_service)
        .await;

    // The gateway must not be called when there is nothing to answer from.
    Mock::given(method("POST"))
        .and(path("/api/genai/generate-content"))
        .respond_with(ResponseTemplate::new(200).set_body_json(genai_body("unused")))
        .expect(0)
        .mount(&genai_service)
        .await;

    let app = TestApp::spawn(&document_service.uri(), &genai_service.uri()).await;
    let client = Client::new();

    let response = client
        .post(&format!("{}/api/chat", app.address))
        .json(&json!({"message": "test question", "document_id": null}))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["response"], NO_CONTEXT_MESSAGE);
    assert_eq!(body["chunk_count"], 0);
    assert!(body["document"].is_null());
}

#[tokio::test]
async fn chat_grounds_the_answer_in_retrieved_chunks() {
    let document_service = MockServer::start().await;
    let genai_service = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/documents/search/similar"))
        .and(query_param("q", "What is the capital of France?"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"text": "Paris is the capital of France", "documentId": 1, "chunkIndex": 0}
        ])))
        .mount(&document_service)
        .await;

    // Chunk enrichment looks the owning document up once.
    Mock::given(method("GET"))
        .and(path("/api/documents/1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(document_body(1, "Geography", json!([]))),
        )
        .mount(&document_service)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/genai/generate-content"))
        .and(body_string_contains("Paris is the capital of France"))
        .respond_with(ResponseTemplate::new(200).set_body_json(genai_body("The capital is Paris.")))
        .expect(1)
        .mount(&genai_service)
        .await;

    let app = TestApp::spawn(&document_service.uri(), &genai_service.uri()).await;
    let client = Client::new();

    let response = client
        .post(&format!("{}/api/chat", app.address))
        .json(&json!({"message": "What is the capital of France?"}))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["response"], "The capital is Paris.");
    assert_eq!(body["chunk_count"], 1);
    assert_eq!(body["sources"], json!(["Geography"]));
}

#[tokio::test]
async fn chat_with_document_appends_both_turns_to_the_conversation() {
    let document_service = MockServer::start().await;
    let genai_service = MockServer::start().await;

    let conversation = json!([
        {"messageIndex": 1, "messageType": "HUMAN", "content": "Earlier question", "createdAt": "2024-01-01T10:00:00"},
        {"messageIndex": 2, "messageType": "AI", "content": "Earlier answer", "createdAt": "2024-01-01T10:00:05"}
    ]);

    Mock::given(method("GET"))
        .and(path("/api/documents/42"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(document_body(42, "Lecture 1", conversation)),
        )
        .mount(&document_service)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/documents/search/similar"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&document_service)
        .await;

    // One append for the question, one for the answer.
    Mock::given(method("POST"))
        .and(path("/api/documents/42/conversation"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .expect(2)
        .mount(&document_service)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/genai/generate-content"))
        .respond_with(ResponseTemplate::new(200).set_body_json(genai_body("Follow-up answer")))
        .expect(1)
        .mount(&genai_service)
        .await;

    let app = TestApp::spawn(&document_service.uri(), &genai_service.uri()).await;
    let client = Client::new();

    let response = client
        .post(&format!("{}/api/chat", app.address))
        .json(&json!({"message": "And what about that?", "document_id": "42"}))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["response"], "Follow-up answer");
    assert_eq!(body["document"]["name"], "Lecture 1");
    assert_eq!(body["chunk_count"], 0);
}

#[tokio::test]
async fn conversation_append_failures_never_fail_the_response() {
    let document_service = MockServer::start().await;
    let genai_service = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/documents/42"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(document_body(
                42,
                "Lecture 1",
                json!([{"messageIndex": 1, "messageType": "HUMAN", "content": "hi", "createdAt": "2024-01-01T10:00:00"}]),
            )),
        )
        .mount(&document_service)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/documents/search/similar"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&document_service)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/documents/42/conversation"))
        .respond_with(ResponseTemplate::new(500).set_body_string("store down"))
        .mount(&document_service)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/genai/generate-content"))
        .respond_with(ResponseTemplate::new(200).set_body_json(genai_body("Still works")))
        .mount(&genai_service)
        .await;

    let app = TestApp::spawn(&document_service.uri(), &genai_service.uri()).await;
    let client = Client::new();

    let response = client
        .post(&format!("{}/api/chat", app.address))
        .json(&json!({"message": "hello again", "document_id": "42"}))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["response"], "Still works");
}

#[tokio::test]
async fn generation_failures_surface_as_bad_gateway() {
    let document_service = MockServer::start().await;
    let genai_service = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/documents/search/similar"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"text": "Some content", "documentId": 1, "chunkIndex": 0}
        ])))
        .mount(&document_service)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/documents/1"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&document_service)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/genai/generate-content"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model down"))
        .mount(&genai_service)
        .await;

    let app = TestApp::spawn(&document_service.uri(), &genai_service.uri()).await;
    let client = Client::new();

    let response = client
        .post(&format!("{}/api/chat", app.address))
        .json(&json!({"message": "anything"}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 502);
}

#[tokio::test]
async fn missing_document_returns_not_found() {
    let document_service = MockServer::start().await;
    let genai_service = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/documents/123"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&document_service)
        .await;

    let app = TestApp::spawn(&document_service.uri(), &genai_service.uri()).await;
    let client = Client::new();

    let response = client
        .get(&format!("{}/api/documents/123", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn empty_message_is_rejected() {
    let document_service = MockServer::start().await;
    let genai_service = MockServer::start().await;

    let app = TestApp::spawn(&document_service.uri(), &genai_service.uri()).await;
    let client = Client::new();

    let response = client
        .post(&format!("{}/api/chat", app.address))
        .json(&json!({"message": ""}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 422);
}
