//! Integration tests for the export → upload path against a mock service.

use inpaint_client::{ClientConfig, InpaintApp, Notification, ReqwestTransport, Uploader};
use inpaint_core::{InputEvent, PointerEvent, SourceImage, Surface, UploadResult};
use inpaint_renderer::{MaskArtifact, MaskEncoder, MaskExporter, RenderError, RenderResult};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn png_source() -> SourceImage {
    let surface = Surface::new(30, 20, [200, 40, 40, 255]).expect("surface");
    let png = MaskExporter::with_defaults()
        .encode_preview(&surface)
        .expect("encode");
    SourceImage::from_bytes("street.png", png).expect("source")
}

fn painted_app() -> InpaintApp {
    let mut app = InpaintApp::new(&ClientConfig::default()).expect("app");
    app.load_image(png_source()).expect("load");
    app.replay(&[
        InputEvent::Pointer(PointerEvent::down(100.0, 100.0)),
        InputEvent::Pointer(PointerEvent::moved(110.0, 105.0)),
        InputEvent::Pointer(PointerEvent::up(110.0, 105.0)),
    ])
    .expect("replay");
    app
}

/// Encoder that fails the way a full disk or a codec bug would.
struct FailingEncoder;

impl MaskEncoder for FailingEncoder {
    fn encode_mask(&self, _mask: &Surface) -> RenderResult<MaskArtifact> {
        Err(RenderError::Encode("PNG encoding failed: out of memory".to_string()))
    }
}

fn uploader_for(server: &MockServer) -> Uploader<ReqwestTransport> {
    let base = format!("{}/api/", server.uri());
    Uploader::new(&base, ReqwestTransport::new().expect("transport")).expect("uploader")
}

fn contains_bytes(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}

#[tokio::test]
#[cfg_attr(
    target_os = "macos",
    ignore = "wiremock/reqwest system-configuration issue on macOS"
)]
async fn export_success_records_exact_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/upload/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "original_image_url": "a", "mask_image_url": "b" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut app = painted_app();
    let notification = app.export(&uploader_for(&server)).await;

    let expected = UploadResult {
        original_image_url: "a".to_string(),
        mask_image_url: "b".to_string(),
    };
    assert_eq!(notification, Notification::Success(expected.clone()));
    assert_eq!(app.state().last_upload(), Some(&expected));
    assert_eq!(
        app.display_lines(),
        vec!["Original Image: a".to_string(), "Mask Image: b".to_string()]
    );
}

#[tokio::test]
#[cfg_attr(
    target_os = "macos",
    ignore = "wiremock/reqwest system-configuration issue on macOS"
)]
async fn export_sends_multipart_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/upload/"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": { "original_image_url": "o", "mask_image_url": "m" }
        })))
        .mount(&server)
        .await;

    let mut app = painted_app();
    let notification = app.export(&uploader_for(&server)).await;
    assert!(notification.is_success());

    let requests = server.received_requests().await.expect("requests");
    assert_eq!(requests.len(), 1);
    let request = &requests[0];

    let content_type = request
        .headers
        .get("content-type")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    assert!(content_type.starts_with("multipart/form-data"), "{content_type}");

    let body = &request.body;
    assert!(contains_bytes(body, b"name=\"original_image\""));
    assert!(contains_bytes(body, b"filename=\"street.png\""));
    assert!(contains_bytes(body, b"name=\"mask_image\""));
    assert!(contains_bytes(body, b"filename=\"mask.png\""));
    assert!(contains_bytes(body, b"image/png"));
    assert!(contains_bytes(body, b"name=\"description\""));
    assert!(contains_bytes(body, b"Example inpainting image"));
}

#[tokio::test]
#[cfg_attr(
    target_os = "macos",
    ignore = "wiremock/reqwest system-configuration issue on macOS"
)]
async fn export_failure_keeps_surfaces_and_allows_retry() {
    let server = MockServer::start().await;
    let uploader = uploader_for(&server);
    let mut app = painted_app();
    let before = app.state().compositor().expect("surfaces").clone();

    {
        let _failing = Mock::given(method("POST"))
            .and(path("/api/upload/"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
            .expect(1)
            .mount_as_scoped(&server)
            .await;

        match app.export(&uploader).await {
            Notification::Failure(reason) => assert!(reason.contains("500"), "{reason}"),
            other => panic!("unexpected notification: {other:?}"),
        }
    }

    assert_eq!(app.state().last_upload(), None);
    assert!(app.display_lines().is_empty());
    let after = app.state().compositor().expect("surfaces");
    assert_eq!(after.mask(), before.mask());
    assert_eq!(after.preview(), before.preview());

    Mock::given(method("POST"))
        .and(path("/api/upload/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "original_image_url": "a2", "mask_image_url": "b2" }
        })))
        .mount(&server)
        .await;

    assert!(app.export(&uploader).await.is_success());
    assert_eq!(app.display_lines()[0], "Original Image: a2");
}

#[tokio::test]
#[cfg_attr(
    target_os = "macos",
    ignore = "wiremock/reqwest system-configuration issue on macOS"
)]
async fn malformed_response_is_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/upload/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let mut app = painted_app();
    let notification = app.export(&uploader_for(&server)).await;
    assert!(matches!(notification, Notification::Failure(_)));
    assert_eq!(app.state().last_upload(), None);
}

#[tokio::test]
#[cfg_attr(
    target_os = "macos",
    ignore = "wiremock/reqwest system-configuration issue on macOS"
)]
async fn export_without_source_sends_nothing() {
    let server = MockServer::start().await;
    let mut app = InpaintApp::new(&ClientConfig::default()).expect("app");

    let notification = app.export(&uploader_for(&server)).await;
    assert_eq!(notification, Notification::Skipped);

    let requests = server.received_requests().await.expect("requests");
    assert!(requests.is_empty());
}

#[tokio::test]
#[cfg_attr(
    target_os = "macos",
    ignore = "wiremock/reqwest system-configuration issue on macOS"
)]
async fn base_url_without_trailing_slash_still_hits_upload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "original_image_url": "x", "mask_image_url": "y" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let uploader =
        Uploader::new(&server.uri(), ReqwestTransport::new().expect("transport")).expect("uploader");
    let mut app = painted_app();
    assert!(app.export(&uploader).await.is_success());
}

#[tokio::test]
#[cfg_attr(
    target_os = "macos",
    ignore = "wiremock/reqwest system-configuration issue on macOS"
)]
async fn encode_failure_aborts_before_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/upload/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "original_image_url": "a", "mask_image_url": "b" }
        })))
        .expect(0)
        .mount(&server)
        .await;

    let mut app =
        InpaintApp::with_encoder(&ClientConfig::default(), FailingEncoder).expect("app");
    app.load_image(png_source()).expect("load");
    app.handle_event(&InputEvent::Pointer(PointerEvent::down(100.0, 100.0)))
        .expect("event");

    match app.export(&uploader_for(&server)).await {
        Notification::Failure(reason) => assert!(reason.contains("out of memory"), "{reason}"),
        other => panic!("unexpected notification: {other:?}"),
    }
    assert_eq!(app.state().last_upload(), None);

    let requests = server.received_requests().await.expect("requests");
    assert!(requests.is_empty());
}
