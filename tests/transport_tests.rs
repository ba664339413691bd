mod support;

use std::sync::atomic::Ordering;

use loopvoice::audio::segment::AudioSegment;
use loopvoice::config::BackendConfig;
use loopvoice::error::VoiceError;
use support::{client_for, spawn_stub, StubResponse};

fn sample_segment() -> AudioSegment {
    // 100ms of quiet tone is plenty for a non-empty upload.
    AudioSegment::from_samples(&vec![0.05; 1600], 16_000).expect("encode sample segment")
}

#[tokio::test]
async fn decodes_all_three_response_headers() {
    let server = spawn_stub(
        StubResponse::new(200)
            .header("x-transcribed-text", "hello")
            .header("x-response-text", "hi there")
            .header("x-hospitals-found", "3")
            .header("content-type", "audio/mpeg")
            .body(vec![1, 2, 3, 4]),
    )
    .await;

    let client = client_for(&server.base_url);
    let result = client
        .exchange_voice(&sample_segment())
        .await
        .expect("exchange should succeed");

    assert_eq!(result.transcribed_text, "hello");
    assert_eq!(result.response_text, "hi there");
    assert_eq!(result.hospitals_found, 3);
    assert_eq!(result.audio.bytes, vec![1, 2, 3, 4], "handle wraps the body");
    assert_eq!(result.audio.media_type, "audio/mpeg");
}

#[tokio::test]
async fn missing_headers_fall_back_to_defaults() {
    let server = spawn_stub(StubResponse::new(200).body(vec![9, 9])).await;

    let client = client_for(&server.base_url);
    let result = client
        .exchange_voice(&sample_segment())
        .await
        .expect("exchange should succeed");

    assert_eq!(result.transcribed_text, "");
    assert_eq!(result.response_text, "");
    assert_eq!(result.hospitals_found, 0, "missing count defaults to 0");
}

#[tokio::test]
async fn unparsable_hospital_count_defaults_to_zero() {
    let server = spawn_stub(
        StubResponse::new(200)
            .header("x-hospitals-found", "many")
            .body(vec![0]),
    )
    .await;

    let client = client_for(&server.base_url);
    let result = client
        .exchange_voice(&sample_segment())
        .await
        .expect("exchange should succeed");

    assert_eq!(result.hospitals_found, 0);
}

#[tokio::test]
async fn empty_segment_fails_fast_without_network() {
    let server = spawn_stub(StubResponse::new(200).body(vec![0])).await;

    let client = client_for(&server.base_url);
    let empty = AudioSegment::from_samples(&[], 16_000).expect("encode empty segment");
    assert!(empty.is_empty());

    let err = client
        .exchange_voice(&empty)
        .await
        .expect_err("empty segment must be rejected");

    assert!(matches!(err, VoiceError::Validation(_)), "got {err:?}");
    assert_eq!(
        server.hits.load(Ordering::SeqCst),
        0,
        "validation must not contact the backend"
    );
}

#[tokio::test]
async fn non_success_status_is_a_transport_error() {
    let server = spawn_stub(StubResponse::new(500)).await;

    let client = client_for(&server.base_url);
    let err = client
        .exchange_voice(&sample_segment())
        .await
        .expect_err("500 must fail");

    assert!(matches!(err, VoiceError::Transport(_)), "got {err:?}");
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    // Port 1 is never serving on loopback.
    let client = client_for("http://127.0.0.1:1");
    let err = client
        .exchange_voice(&sample_segment())
        .await
        .expect_err("connect must fail");

    assert!(matches!(err, VoiceError::Transport(_)), "got {err:?}");
}

#[tokio::test]
async fn upload_is_multipart_with_the_audio_field() {
    let server = spawn_stub(StubResponse::new(200).body(vec![0])).await;

    let client = client_for(&server.base_url);
    client
        .exchange_voice(&sample_segment())
        .await
        .expect("exchange should succeed");

    let raw = server.last_request.lock().expect("request lock").clone();
    let request = String::from_utf8_lossy(&raw);
    assert!(request.starts_with("POST /voice"), "got: {request:.80}");
    assert!(request.contains("name=\"audio\""), "single part named audio");
    assert!(request.contains("filename=\"recording.wav\""));
    assert!(request.contains("audio/wav"), "part carries the media type");
}

#[tokio::test]
async fn health_check_decodes_status_and_count() {
    let server = spawn_stub(
        StubResponse::new(200)
            .header("content-type", "application/json")
            .body(br#"{"status":"healthy","hospitals_indexed":250}"#.to_vec()),
    )
    .await;

    let client = client_for(&server.base_url);
    let health = client.check_health().await.expect("health should decode");

    assert!(health.is_healthy());
    assert_eq!(health.hospitals_indexed, 250);
}

#[tokio::test]
async fn health_check_defaults_missing_index_count() {
    let server = spawn_stub(
        StubResponse::new(200)
            .header("content-type", "application/json")
            .body(br#"{"status":"starting"}"#.to_vec()),
    )
    .await;

    let client = client_for(&server.base_url);
    let health = client.check_health().await.expect("health should decode");

    assert!(!health.is_healthy());
    assert_eq!(health.hospitals_indexed, 0);
}

#[tokio::test]
async fn health_check_failure_is_a_transport_error() {
    let client = client_for("http://127.0.0.1:1");
    let err = client
        .check_health()
        .await
        .expect_err("connect must fail");

    assert!(matches!(err, VoiceError::Transport(_)), "got {err:?}");
}

#[test]
fn config_normalizes_trailing_slash() {
    let config = BackendConfig::with_base_url("http://localhost:8000/");
    assert_eq!(config.base_url, "http://localhost:8000");
}
