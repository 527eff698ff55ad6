use crate::e2e::helpers;

use helpers::{TestContext, OPERATOR_TOKEN, TEST_MAX_CHUNK_LENGTH, TEST_MAX_TEXT_LENGTH};
use hyper::StatusCode;
use narrator_backend::infrastructure::audio::{AudioCodec, Mp3Codec};
use pretty_assertions::assert_eq;
use serde_json::json;
use test_context::test_context;

const LONG_TEXT: &str = "A primeira frase abre o texto de teste. \
    A segunda frase continua a mesma ideia. \
    A terceira frase traz mais um detalhe. \
    A quarta frase encerra o assunto de vez.";

/// Two chunks; only the second one carries the marker the mock refuses
const PARTLY_REJECTED_TEXT: &str = "Esta primeira frase deve ser aceita sem problemas. \
    Mas esta segunda frase contém REJEITAR no meio.";

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_synthesize_short_text_in_one_chunk(ctx: &TestContext) {
    let response = ctx
        .client
        .post_with_auth(
            "/api/tts/synthesize",
            &json!({ "text": "Olá, este é um teste curto." }),
            OPERATOR_TOKEN,
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::OK)
        .assert_header("content-type", "audio/mpeg")
        .assert_header(
            "content-disposition",
            "attachment; filename=\"audio_completo.mp3\"",
        )
        .assert_header("x-chunk-count", "1")
        .assert_header("x-chunks-succeeded", "1")
        .assert_header("x-character-count", "27")
        .assert_header_exists("x-duration-seconds")
        .assert_header_exists("x-request-id");

    assert_eq!(ctx.provider.request_count(), 1);

    let decoded = Mp3Codec::new().decode(&response.body_bytes).unwrap();
    assert_eq!(decoded.sample_rate, 16_000);
    assert_eq!(decoded.channels, 1);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_concatenate_every_chunk_into_one_file(ctx: &TestContext) {
    let response = ctx
        .client
        .post_with_auth("/api/tts/synthesize", &json!({ "text": LONG_TEXT }), OPERATOR_TOKEN)
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);

    let chunk_count: usize = response.header("x-chunk-count").unwrap().parse().unwrap();
    assert!(chunk_count > 1, "expected several chunks, got {}", chunk_count);
    assert_eq!(ctx.provider.request_count(), chunk_count);
    response.assert_header("x-chunks-succeeded", &chunk_count.to_string());

    // Each mock clip is half a second; codec padding adds a little per clip
    let decoded = Mp3Codec::new().decode(&response.body_bytes).unwrap();
    let seconds = decoded.duration().as_secs_f64();
    let expected = chunk_count as f64 * 0.5;
    assert!(
        seconds >= expected * 0.9 && seconds <= expected * 1.5,
        "duration {}s for {} chunks",
        seconds,
        chunk_count
    );

    let header_seconds: f64 = response
        .header("x-duration-seconds")
        .unwrap()
        .parse()
        .unwrap();
    assert!(header_seconds >= expected * 0.9);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_send_chunks_within_the_length_limit(ctx: &TestContext) {
    ctx.client
        .post_with_auth("/api/tts/synthesize", &json!({ "text": LONG_TEXT }), OPERATOR_TOKEN)
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    // Every sentence reaches the provider exactly once
    let received = ctx.provider.received_ssml().join("\n");
    for sentence in ["primeira frase", "segunda frase", "terceira frase", "quarta frase"] {
        assert_eq!(received.matches(sentence).count(), 1, "{}", sentence);
    }

    for ssml in ctx.provider.received_ssml() {
        let text_start = ssml.find("%\">").unwrap() + 3;
        let text_end = ssml.find("</prosody>").unwrap();
        let text = &ssml[text_start..text_end];
        assert!(text.chars().count() <= TEST_MAX_CHUNK_LENGTH, "{}", text);
    }
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_report_partial_failure_without_audio(ctx: &TestContext) {
    let response = ctx
        .client
        .post_with_auth(
            "/api/tts/synthesize",
            &json!({ "text": PARTLY_REJECTED_TEXT }),
            OPERATOR_TOKEN,
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_GATEWAY)
        .assert_header("content-type", "application/json");

    let report = response.json();
    assert_eq!(report["state"], "partial_failure");
    assert_eq!(report["total_chunks"], 2);
    assert_eq!(report["succeeded_count"], 1);

    let chunks = report["chunks"].as_array().unwrap();
    assert_eq!(chunks[0]["status"], "succeeded");
    assert_eq!(chunks[1]["status"], "remote_rejected");
    assert_eq!(chunks[1]["http_status"], 400);
    assert_eq!(chunks[1]["attempts"], 1);
    assert!(chunks[1]["message"]
        .as_str()
        .unwrap()
        .contains("SSML rejected by mock"));

    // Refusals are final, the failed chunk is not retried
    assert_eq!(ctx.provider.request_count(), 2);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_pass_voice_and_rate_to_the_provider(ctx: &TestContext) {
    ctx.client
        .post_with_auth(
            "/api/tts/synthesize",
            &json!({ "text": "Teste de voz.", "voice": "Narrador - Neutro", "rate": 20 }),
            OPERATOR_TOKEN,
        )
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let received = ctx.provider.received_ssml();
    let ssml = &received[0];
    assert!(ssml.contains("<voice name='pt-BR-CelioNeural'>"), "{}", ssml);
    assert!(ssml.contains("<prosody rate=\"20%\">"), "{}", ssml);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_use_default_voice_and_escape_markup(ctx: &TestContext) {
    ctx.client
        .post_with_auth(
            "/api/tts/synthesize",
            &json!({ "text": "Tom & Jerry <3" }),
            OPERATOR_TOKEN,
        )
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let received = ctx.provider.received_ssml();
    let ssml = &received[0];
    assert!(ssml.contains("<voice name='pt-BR-FranciscaNeural'>"), "{}", ssml);
    assert!(ssml.contains("<prosody rate=\"0%\">"), "{}", ssml);
    assert!(ssml.contains("Tom &amp; Jerry &lt;3"), "{}", ssml);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_empty_text(ctx: &TestContext) {
    for text in ["", "   \n\t "] {
        let response = ctx
            .client
            .post_with_auth("/api/tts/synthesize", &json!({ "text": text }), OPERATOR_TOKEN)
            .await
            .unwrap();

        response
            .assert_status(StatusCode::BAD_REQUEST)
            .assert_error_message("Text cannot be empty");
    }

    assert_eq!(ctx.provider.request_count(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_text_over_the_limit(ctx: &TestContext) {
    let text = "a".repeat(TEST_MAX_TEXT_LENGTH + 1);

    let response = ctx
        .client
        .post_with_auth("/api/tts/synthesize", &json!({ "text": text }), OPERATOR_TOKEN)
        .await
        .unwrap();

    response
        .assert_status(StatusCode::PAYLOAD_TOO_LARGE)
        .assert_error_message("characters or less");
    assert_eq!(ctx.provider.request_count(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_unknown_voice(ctx: &TestContext) {
    let response = ctx
        .client
        .post_with_auth(
            "/api/tts/synthesize",
            &json!({ "text": "Olá.", "voice": "Joanna" }),
            OPERATOR_TOKEN,
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Unknown voice: Joanna");
    assert_eq!(ctx.provider.request_count(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_rate_out_of_range(ctx: &TestContext) {
    let response = ctx
        .client
        .post_with_auth(
            "/api/tts/synthesize",
            &json!({ "text": "Olá.", "rate": 80 }),
            OPERATOR_TOKEN,
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Speech rate must be between");
    assert_eq!(ctx.provider.request_count(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_malformed_json(ctx: &TestContext) {
    let response = ctx
        .client
        .post_raw_with_auth("/api/tts/synthesize", "{\"text\": ", OPERATOR_TOKEN)
        .await
        .unwrap();

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(ctx.provider.request_count(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_require_auth_for_synthesis(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/api/tts/synthesize", &json!({ "text": "Olá." }))
        .await
        .unwrap();

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(ctx.provider.request_count(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_preview_chunks_without_calling_the_provider(ctx: &TestContext) {
    let response = ctx
        .client
        .post_with_auth("/api/tts/preview", &json!({ "text": LONG_TEXT }), OPERATOR_TOKEN)
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);

    let body = response.json();
    let chunks = body["chunks"].as_array().unwrap();
    assert_eq!(body["chunk_count"].as_u64().unwrap() as usize, chunks.len());
    assert_eq!(
        body["characters"].as_u64().unwrap() as usize,
        LONG_TEXT.chars().count()
    );
    for (i, chunk) in chunks.iter().enumerate() {
        assert_eq!(chunk["index"].as_u64().unwrap() as usize, i);
        assert!(chunk["length"].as_u64().unwrap() as usize <= TEST_MAX_CHUNK_LENGTH);
    }

    assert_eq!(ctx.provider.request_count(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_preview_the_same_split_used_for_synthesis(ctx: &TestContext) {
    let preview = ctx
        .client
        .post_with_auth("/api/tts/preview", &json!({ "text": LONG_TEXT }), OPERATOR_TOKEN)
        .await
        .unwrap();
    let synthesized = ctx
        .client
        .post_with_auth("/api/tts/synthesize", &json!({ "text": LONG_TEXT }), OPERATOR_TOKEN)
        .await
        .unwrap();

    synthesized.assert_status(StatusCode::OK);
    assert_eq!(
        preview.json()["chunk_count"].to_string(),
        synthesized.header("x-chunk-count").unwrap()
    );
}
