//! GeminiClient against a local stand-in for the Gemini REST API

use axum::http::{HeaderMap, StatusCode, Uri};
use axum::Router;
use base64::{engine::general_purpose, Engine as _};
use doodle_core::{Classification, ClassifyError, FinishReason, InconclusiveReason};
use image::{ImageBuffer, Rgb, RgbImage};
use llm_bridge::{
    normalize_response, GeminiClient, GeminiConfig, GenerationConfig, GenerativeModel,
    VisionClassifier,
};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
struct Captured {
    path: String,
    api_key: Option<String>,
    body: serde_json::Value,
}

/// Serve `reply` for every request and record what arrived
async fn spawn_stub(
    status: StatusCode,
    reply: &'static str,
) -> (String, Arc<Mutex<Vec<Captured>>>) {
    let captured = Arc::new(Mutex::new(Vec::new()));
    let log = captured.clone();

    let app = Router::new().fallback(move |uri: Uri, headers: HeaderMap, body: String| {
        let log = log.clone();
        async move {
            log.lock().unwrap().push(Captured {
                path: uri.path().to_string(),
                api_key: headers
                    .get("x-goog-api-key")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string),
                body: serde_json::from_str(&body).unwrap_or(serde_json::Value::Null),
            });
            (status, [("content-type", "application/json")], reply)
        }
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/v1beta", addr), captured)
}

fn client_for(base_url: String) -> GeminiClient {
    let mut config = GeminiConfig::new("secret");
    config.model = "test-model".to_string();
    config.base_url = base_url;
    config.timeout_secs = 5;
    GeminiClient::new(config).unwrap()
}

fn sketch() -> RgbImage {
    ImageBuffer::from_fn(8, 8, |x, y| {
        if x == y {
            Rgb([0, 0, 0])
        } else {
            Rgb([255, 255, 255])
        }
    })
}

#[tokio::test]
async fn test_generate_posts_prompt_and_png() {
    let (base_url, captured) = spawn_stub(
        StatusCode::OK,
        r#"{"candidates":[{"content":{"parts":[{"text":"Circle\n"}],"role":"model"},"finishReason":"STOP"}]}"#,
    )
    .await;
    let client = client_for(base_url);

    let response = client
        .generate("what is it?", &sketch(), &GenerationConfig::default())
        .await
        .unwrap();
    assert_eq!(
        normalize_response(&response),
        Classification::Label("circle".to_string())
    );

    let captured = captured.lock().unwrap();
    assert_eq!(captured.len(), 1);
    let request = &captured[0];
    assert_eq!(request.path, "/v1beta/models/test-model:generateContent");
    assert_eq!(request.api_key.as_deref(), Some("secret"));

    let parts = &request.body["contents"][0]["parts"];
    assert_eq!(parts[0]["text"], "what is it?");
    assert_eq!(parts[1]["inline_data"]["mime_type"], "image/png");
    assert_eq!(request.body["generationConfig"]["topK"], 20);
    assert_eq!(request.body["generationConfig"]["maxOutputTokens"], 20);

    let png = general_purpose::STANDARD
        .decode(parts[1]["inline_data"]["data"].as_str().unwrap())
        .unwrap();
    let decoded = image::load_from_memory(&png).unwrap().to_rgb8();
    assert_eq!(decoded, sketch());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_generate_encodes_full_size_drawing() {
    let (base_url, captured) = spawn_stub(
        StatusCode::OK,
        r#"{"candidates":[{"content":{"parts":[{"text":"Tree"}]},"finishReason":"STOP"}]}"#,
    )
    .await;
    let client = client_for(base_url);

    let canvas: RgbImage = ImageBuffer::from_fn(512, 512, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    for _ in 0..4 {
        let response = client
            .generate("what is it?", &canvas, &GenerationConfig::default())
            .await
            .unwrap();
        assert_eq!(normalize_response(&response).label(), "tree");
    }

    let captured = captured.lock().unwrap();
    assert_eq!(captured.len(), 4);
    for request in captured.iter() {
        let png = general_purpose::STANDARD
            .decode(
                request.body["contents"][0]["parts"][1]["inline_data"]["data"]
                    .as_str()
                    .unwrap(),
            )
            .unwrap();
        let decoded = image::load_from_memory(&png).unwrap().to_rgb8();
        assert_eq!(decoded, canvas);
    }
}

#[tokio::test]
async fn test_generate_reports_http_status() {
    let (base_url, _) = spawn_stub(
        StatusCode::TOO_MANY_REQUESTS,
        r#"{"error":{"message":"quota exceeded"}}"#,
    )
    .await;
    let client = client_for(base_url);

    let err = client
        .generate("what is it?", &sketch(), &GenerationConfig::default())
        .await
        .unwrap_err();
    match err {
        ClassifyError::Status { status, body } => {
            assert_eq!(status, 429);
            assert!(body.contains("quota exceeded"));
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_generate_reports_malformed_body() {
    let (base_url, _) = spawn_stub(StatusCode::OK, "definitely not json").await;
    let client = client_for(base_url);

    let err = client
        .generate("what is it?", &sketch(), &GenerationConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ClassifyError::Parse(_)));
}

#[tokio::test]
async fn test_generate_reports_unreachable_service() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client_for(format!("http://{}/v1beta", addr));
    let err = client
        .generate("what is it?", &sketch(), &GenerationConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ClassifyError::Request(_)));
}

#[tokio::test]
async fn test_classifier_over_gemini_maps_safety_block_to_unknown() {
    let (base_url, _) = spawn_stub(
        StatusCode::OK,
        r#"{"candidates":[{"finishReason":"SAFETY","index":0}]}"#,
    )
    .await;
    let classifier = VisionClassifier::new(Arc::new(client_for(base_url)));

    let outcome = classifier
        .classify(image::DynamicImage::ImageRgb8(sketch()))
        .await;
    assert_eq!(
        outcome,
        Classification::Inconclusive(InconclusiveReason::Filtered(FinishReason::Safety))
    );
    assert_eq!(outcome.label(), "unknown");
}
