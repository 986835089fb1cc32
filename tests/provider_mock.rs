//! Integration tests driving the command layer against a local mock
//! provider endpoint instead of the hosted one.

use std::io::Read;
use std::sync::mpsc;
use std::thread;

use image::{Rgba, RgbaImage};
use tablero::client::{ApiError, ClientConfig, ModelClient};
use tablero::codec::EncodeError;
use tablero::commands::{self, CommandError};
use tablero::palette;
use tablero::session::SessionState;
use tiny_http::{Header, Response, Server};

fn json_header() -> Header {
    Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap()
}

/// Serve the same canned response for every request; returns the base URL.
fn start_mock(status: u16, body: String) -> String {
    let server = Server::http("127.0.0.1:0").expect("bind mock server");
    let port = server.server_addr().to_ip().unwrap().port();
    thread::spawn(move || {
        for request in server.incoming_requests() {
            let response = Response::from_string(body.clone())
                .with_status_code(status)
                .with_header(json_header());
            let _ = request.respond(response);
        }
    });
    format!("http://127.0.0.1:{port}/v1")
}

fn mock_client(base_url: &str) -> ModelClient {
    ModelClient::new(ClientConfig::new("sk-test").with_base_url(base_url)).expect("client")
}

fn chat_body(content: &str) -> String {
    serde_json::json!({
        "choices": [{ "message": { "role": "assistant", "content": content } }]
    })
    .to_string()
}

fn sketch() -> RgbaImage {
    let mut img = RgbaImage::from_pixel(32, 24, Rgba([255, 255, 255, 255]));
    for x in 8..24 {
        img.put_pixel(x, 12, Rgba([0, 0, 0, 255]));
    }
    img
}

#[test]
fn analyze_marks_the_session_and_caches_the_description() {
    let base = start_mock(200, chat_body("un sol amarillo"));
    let client = mock_client(&base);
    let mut state = SessionState::new();

    let analysis = commands::analyze(&client, &sketch()).expect("analyze");
    state.apply_analysis(analysis.base64_image.clone(), analysis.description);

    assert!(state.analysis_done);
    assert!(state.full_response.contains("un sol amarillo"));
    assert_eq!(state.base64_image, analysis.base64_image);
    assert!(!state.base64_image.is_empty());
}

#[test]
fn a_blank_canvas_is_still_a_valid_analyze_input() {
    let base = start_mock(200, chat_body("un lienzo vacío"));
    let client = mock_client(&base);
    let blank = RgbaImage::from_pixel(32, 24, Rgba([255, 255, 255, 255]));

    let analysis = commands::analyze(&client, &blank).expect("analyze");
    assert_eq!(analysis.description, "un lienzo vacío");
}

#[test]
fn encode_failure_short_circuits_before_any_remote_call() {
    // Nothing listens on port 1: if analyze ever reached the network the
    // failure would read as Transport, not Encode.
    let client = mock_client("http://127.0.0.1:1/v1");
    let unencodable = RgbaImage::new(0, 0);

    let result = commands::analyze(&client, &unencodable);
    assert!(matches!(
        result,
        Err(CommandError::Encode(EncodeError::EmptyBuffer))
    ));
}

#[test]
fn failed_describe_leaves_the_session_untouched() {
    let base = start_mock(500, r#"{"error":{"message":"boom"}}"#.to_string());
    let client = mock_client(&base);

    let mut state = SessionState::new();
    state.apply_analysis("QUJD".to_string(), "descripción previa".to_string());
    let before = state.clone();

    let result = commands::analyze(&client, &sketch());
    match result {
        Err(CommandError::Api(ApiError::Provider { status, message })) => {
            assert_eq!(status, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("expected provider error, got {other:?}"),
    }

    // No partial mutation: the failed call was never applied.
    assert_eq!(state, before);
    assert_eq!(state.full_response, "descripción previa");
}

#[test]
fn story_request_interpolates_the_description_and_returns_exact_text() {
    let server = Server::http("127.0.0.1:0").expect("bind mock server");
    let port = server.server_addr().to_ip().unwrap().port();
    let (body_tx, body_rx) = mpsc::channel::<String>();
    thread::spawn(move || {
        for mut request in server.incoming_requests() {
            let mut outbound = String::new();
            let _ = request.as_reader().read_to_string(&mut outbound);
            let _ = body_tx.send(outbound);
            let response = Response::from_string(chat_body("Había una vez..."))
                .with_header(json_header());
            let _ = request.respond(response);
        }
    });

    let client = mock_client(&format!("http://127.0.0.1:{port}/v1"));
    let story = commands::create_story(&client, "un dragón verde").expect("story");
    assert_eq!(story, "Había una vez...");

    let mut state = SessionState::new();
    state.apply_analysis("QUJD".to_string(), "un dragón verde".to_string());
    state.apply_story(story);
    assert_eq!(state.story.as_deref(), Some("Había una vez..."));

    // The cached description only matters through the outbound prompt.
    let outbound = body_rx.recv().expect("request body");
    assert!(outbound.contains("un dragón verde"));
}

#[test]
fn pack_text_feeds_the_palette_extractor() {
    let pack_text = "🎨 PALETA: #FFAA00 and #1a2b3c son una buena pareja";
    let base = start_mock(200, chat_body(pack_text));
    let client = mock_client(&base);

    let pack = commands::create_pack(&client, "un atardecer").expect("pack");
    let colors: Vec<&str> = palette::extract_hex_colors(&pack).collect();
    assert_eq!(colors, vec!["#FFAA00", "#1a2b3c"]);
}

#[test]
fn empty_choices_surface_as_missing_content() {
    let base = start_mock(200, r#"{"choices":[]}"#.to_string());
    let client = mock_client(&base);

    let result = commands::create_pack(&client, "algo");
    assert!(matches!(
        result,
        Err(CommandError::Api(ApiError::MissingContent))
    ));
}

#[test]
fn enhance_returns_the_hosted_url_and_downloadable_bytes() {
    let server = Server::http("127.0.0.1:0").expect("bind mock server");
    let port = server.server_addr().to_ip().unwrap().port();

    // PNG the mock "CDN" will serve back
    let generated = RgbaImage::from_pixel(8, 8, Rgba([10, 20, 30, 255]));
    let png_bytes = {
        let mut bytes = Vec::new();
        use image::ImageEncoder;
        image::codecs::png::PngEncoder::new(&mut bytes)
            .write_image(generated.as_raw(), 8, 8, image::ColorType::Rgba8)
            .unwrap();
        bytes
    };

    thread::spawn(move || {
        for request in server.incoming_requests() {
            if request.url().ends_with("/images/generations") {
                let body = format!(
                    r#"{{"data":[{{"url":"http://127.0.0.1:{port}/generated.png"}}]}}"#
                );
                let _ = request.respond(Response::from_string(body).with_header(json_header()));
            } else {
                let header =
                    Header::from_bytes(&b"Content-Type"[..], &b"image/png"[..]).unwrap();
                let _ =
                    request.respond(Response::from_data(png_bytes.clone()).with_header(header));
            }
        }
    });

    let client = mock_client(&format!("http://127.0.0.1:{port}/v1"));
    let enhanced = commands::enhance(&client, "un castillo").expect("enhance");

    assert!(enhanced.url.ends_with("/generated.png"));
    let decoded = image::load_from_memory(&enhanced.bytes)
        .expect("decode generated image")
        .into_rgba8();
    assert_eq!(decoded.dimensions(), (8, 8));
    assert_eq!(decoded.get_pixel(3, 3), &Rgba([10, 20, 30, 255]));
}

#[test]
fn empty_credential_never_reaches_the_network() {
    // Repeated empty submissions all fail the same local check.
    for _ in 0..3 {
        let result = ModelClient::new(
            ClientConfig::new("").with_base_url("http://127.0.0.1:1/v1"),
        );
        assert!(matches!(result, Err(ApiError::MissingCredential)));
    }
}
