use crate::e2e::helpers;

use helpers::{TestContext, OPERATOR_TOKEN};
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_require_auth_for_voices(ctx: &TestContext) {
    let response = ctx.client.get("/api/voices").await.unwrap();

    response
        .assert_status(StatusCode::UNAUTHORIZED)
        .assert_error_message("Missing authorization header");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_wrong_operator_token(ctx: &TestContext) {
    let response = ctx
        .client
        .get_with_auth("/api/voices", "not-the-token")
        .await
        .unwrap();

    response
        .assert_status(StatusCode::UNAUTHORIZED)
        .assert_error_message("Invalid operator token");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_list_voice_catalog(ctx: &TestContext) {
    let response = ctx
        .client
        .get_with_auth("/api/voices", OPERATOR_TOKEN)
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);

    let voices = response.json().as_array().unwrap();
    let ids: Vec<&str> = voices
        .iter()
        .filter_map(|v| v.get("provider_voice_id").and_then(|id| id.as_str()))
        .collect();

    assert_eq!(
        ids,
        vec![
            "pt-BR-FranciscaNeural",
            "pt-BR-AntonioNeural",
            "pt-BR-BrendaNeural",
            "pt-BR-CelioNeural",
        ]
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_mark_exactly_one_default_voice(ctx: &TestContext) {
    let response = ctx
        .client
        .get_with_auth("/api/voices", OPERATOR_TOKEN)
        .await
        .unwrap();

    let voices = response.json().as_array().unwrap();
    let defaults: Vec<&serde_json::Value> = voices
        .iter()
        .filter(|v| v.get("default").and_then(|d| d.as_bool()) == Some(true))
        .collect();

    assert_eq!(defaults.len(), 1);
    assert_eq!(
        defaults[0].get("display_name").and_then(|v| v.as_str()),
        Some("Camila - Feminina (pt-BR)")
    );
}
