use std::time::Duration;

use httpmock::prelude::*;
use serde_json::json;
use tokio_test::{assert_err, assert_ok};

use thankyou::app::GENERATE_FAILED;
use thankyou::form::{FormField, MISSING_REQUIRED, GENERATE_SUCCEEDED};
use thankyou::request::STATUS_FETCH_FAILED;
use thankyou::view;
use thankyou::{
  ApiClient
, App
, ClientConfig
, ConfigState
, Relationship
, StatusView
, StatusWidget
, ThankYouForm
, ThankYouRequest
, Toast
};

fn api_for(server: &MockServer) -> ApiClient
{   ApiClient::new(&ClientConfig::with_api_base(server.base_url()))
      .expect("valid config")
}

fn note_body() -> serde_json::Value
{   json!({
      "thank_you_note": "Dear Aunt Sarah, thank you for the beautiful crystal vase.",
      "ai_model_used": "openai:gpt-4",
      "prompt_strategy": "warm-and-personal",
      "generation_metadata": {
        "provider": "openai",
        "model_parameters": { "temperature": 0.8 },
        "ai_config_key": "thank-you-generator",
        "variation_name": "warm-and-personal",
        "config_enabled": true
      }
    })
}

fn aunt_sarah() -> ThankYouRequest
{   ThankYouRequest::new("Aunt Sarah", "crystal vase", Relationship::Family)
}

// ===== Orchestrator =====

#[tokio::test]
async fn test_generate_stores_note_and_reset_clears_it()
{   let server = MockServer::start_async().await;
    let generate = server.mock_async(|when, then| {
      when.method(POST)
        .path("/api/generate")
        .header("content-type", "application/json")
        .json_body(json!({
          "gift_giver_name": "Aunt Sarah",
          "gift_description": "crystal vase",
          "relationship": "family"
        }));
      then.status(200).json_body(note_body());
    }).await;

    let app = App::new(api_for(&server));
    assert!(view::render_result(&app.state()).contains(view::PLACEHOLDER));

    let response = assert_ok!(app.generate(aunt_sarah()).await);
    assert!(!response.thank_you_note.is_empty());
    assert!(!response.generation_metadata.provider.is_empty());
    generate.assert_async().await;

    let state = app.state();
    assert!(!state.is_generating);
    assert_eq!(state.generated_note.as_ref(), Some(&response));
    let rendered = view::render_result(&state);
    assert!(rendered.contains("crystal vase"));
    assert!(!rendered.contains(view::PLACEHOLDER));

    assert_ok!(app.reset().await);
    let state = app.state();
    assert!(state.generated_note.is_none());
    assert!(view::render_result(&state).contains(view::PLACEHOLDER));

    assert_ok!(app.shutdown().await);
}

#[tokio::test]
async fn test_generating_flag_held_while_in_flight()
{   let server = MockServer::start_async().await;
    let generate = server.mock_async(|when, then| {
      when.method(POST).path("/api/generate");
      then.status(200)
        .delay(Duration::from_millis(400))
        .json_body(note_body());
    }).await;

    let app = App::new(api_for(&server));
    let form = ThankYouForm::new();
    let mut reply_rx = assert_ok!(app.queue_generate(aunt_sarah()));

    let mut state_rx = app.subscribe();
    {   let _ = state_rx.wait_for(|s| s.is_generating).await;
    }
    let state = app.state();
    assert!(!view::submit_enabled(&state));
    let rendered = view::render_form(&form, &state);
    assert!(rendered.contains(view::GENERATING_LABEL));
    assert!(rendered.contains("(disabled)"));

    // second submit while the first is outstanding
    let busy = app.generate(aunt_sarah()).await;
    assert_eq!(busy, Err(thankyou::Error::Busy));

    let result = reply_rx.recv().await.expect("reply");
    assert_ok!(result);
    let state = app.state();
    assert!(view::submit_enabled(&state));
    assert!(view::render_form(&form, &state).contains(view::SUBMIT_LABEL));
    generate.assert_hits_async(1).await;

    assert_ok!(app.shutdown().await);
}

#[tokio::test]
async fn test_reset_during_generation_keeps_late_note()
{   let server = MockServer::start_async().await;
    server.mock_async(|when, then| {
      when.method(POST).path("/api/generate");
      then.status(200)
        .delay(Duration::from_millis(400))
        .json_body(note_body());
    }).await;

    let app = App::new(api_for(&server));
    let mut reply_rx = assert_ok!(app.queue_generate(aunt_sarah()));
    let mut state_rx = app.subscribe();
    {   let _ = state_rx.wait_for(|s| s.is_generating).await;
    }

    assert_ok!(app.reset().await);
    let state = app.state();
    assert!(state.is_generating);
    assert!(state.generated_note.is_none());

    // the late reply still lands after the reset
    assert_ok!(reply_rx.recv().await.expect("reply"));
    let state = app.state();
    assert!(!state.is_generating);
    assert!(state.generated_note.is_some());

    assert_ok!(app.shutdown().await);
}

#[tokio::test]
async fn test_failed_generate_clears_flag_and_reports()
{   let server = MockServer::start_async().await;
    let generate = server.mock_async(|when, then| {
      when.method(POST).path("/api/generate");
      then.status(500)
        .json_body(json!({ "detail": "Generation failed: boom" }));
    }).await;

    let app = App::new(api_for(&server));
    let mut form = ThankYouForm::new();
    assert_ok!(form.set_field(FormField::GiftGiverName, "Aunt Sarah"));
    assert_ok!(form.set_field(FormField::GiftDescription, "crystal vase"));

    let toast = form.submit(&app).await;
    assert_eq!(toast, Toast::Error(GENERATE_FAILED.to_string()));
    generate.assert_async().await;

    let state = app.state();
    assert!(!state.is_generating);
    assert!(state.generated_note.is_none());
    assert_eq!(state.last_error.as_deref(), Some(GENERATE_FAILED));
    let rendered = view::render_result(&state);
    assert!(rendered.contains(GENERATE_FAILED));
    assert!(rendered.contains(view::PLACEHOLDER));

    let err = assert_err!(app.generate(aunt_sarah()).await);
    assert!(matches!(err, thankyou::Error::ApiError { status: 500, .. }));

    assert_ok!(app.shutdown().await);
}

#[tokio::test]
async fn test_generate_with_malformed_body_is_failure()
{   let server = MockServer::start_async().await;
    server.mock_async(|when, then| {
      when.method(POST).path("/api/generate");
      then.status(200).body("<html>oops</html>");
    }).await;

    let app = App::new(api_for(&server));
    let err = assert_err!(app.generate(aunt_sarah()).await);
    assert!(matches!(err, thankyou::Error::ParseError(_)));
    assert!(!app.is_generating());

    assert_ok!(app.shutdown().await);
}

// ===== Form =====

#[tokio::test]
async fn test_submit_blank_required_fields_sends_nothing()
{   let server = MockServer::start_async().await;
    let generate = server.mock_async(|when, then| {
      when.method(POST).path("/api/generate");
      then.status(200).json_body(note_body());
    }).await;
    let app = App::new(api_for(&server));

    let cases = [
      ("", "crystal vase")
    , ("Aunt Sarah", "")
    , ("   ", "crystal vase")
    , ("Aunt Sarah", "\t\n")
    ];
    for (giver, gift) in cases
    {   let mut form = ThankYouForm::new();
        assert_ok!(form.set_field(FormField::GiftGiverName, giver));
        assert_ok!(form.set_field(FormField::GiftDescription, gift));
        let toast = form.submit(&app).await;
        assert_eq!(toast, Toast::Error(MISSING_REQUIRED.to_string()));
        assert!(assert_err!(form.build_request()).is_validation());
    }

    generate.assert_hits_async(0).await;
    assert!(app.state().generated_note.is_none());
    assert_ok!(app.shutdown().await);
}

#[tokio::test]
async fn test_flag_disabled_hides_optional_fields()
{   let server = MockServer::start_async().await;
    let flag = server.mock_async(|when, then| {
      when.method(GET).path("/api/feature-flags/advanced-options");
      then.status(200).json_body(json!({
        "flag_key": "enable-advanced-options",
        "enabled": false,
        "description": "Controls whether advanced form options are shown"
      }));
    }).await;

    let api = api_for(&server);
    let mut form = ThankYouForm::new();
    assert!(form.loading_flags);
    form.load_flags(&api).await;
    flag.assert_async().await;
    assert!(!form.loading_flags);
    assert!(!form.show_advanced);

    assert_ok!(form.set_field(FormField::GiftGiverName, "Aunt Sarah"));
    assert_ok!(form.set_field(FormField::GiftDescription, "crystal vase"));
    assert_ok!(form.set_field(FormField::AdditionalNotes, "helped plan"));
    assert_ok!(form.set_field(FormField::NextMeeting, "at Christmas"));

    assert!(!form.visible_fields().contains(&FormField::AdditionalNotes));
    let request = assert_ok!(form.build_request());
    assert!(request.additional_notes.is_none());
    assert!(request.next_meeting.is_none());

    let wire = serde_json::to_value(&request).expect("serialize");
    assert!(wire.get("additional_notes").is_none());
    assert!(wire.get("next_meeting").is_none());

    let rendered = view::render_form(&form, &Default::default());
    assert!(!rendered.contains("Additional Notes"));
    assert!(!rendered.contains("When will you see them next?"));
}

#[tokio::test]
async fn test_flag_fetch_failure_defaults_hidden()
{   let server = MockServer::start_async().await;
    server.mock_async(|when, then| {
      when.method(GET).path("/api/feature-flags/advanced-options");
      then.status(502).body("Bad Gateway");
    }).await;

    let mut form = ThankYouForm::new();
    form.load_flags(&api_for(&server)).await;
    assert!(!form.loading_flags);
    assert!(!form.show_advanced);
}

#[tokio::test]
async fn test_flag_error_shape_defaults_hidden()
{   let server = MockServer::start_async().await;
    server.mock_async(|when, then| {
      when.method(GET).path("/api/feature-flags/advanced-options");
      then.status(200).json_body(json!({
        "error": "LaunchDarkly client not configured",
        "enabled": false
      }));
    }).await;

    let mut form = ThankYouForm::new();
    form.load_flags(&api_for(&server)).await;
    assert!(!form.show_advanced);
}

#[tokio::test]
async fn test_flag_enabled_sends_optional_fields()
{   let server = MockServer::start_async().await;
    server.mock_async(|when, then| {
      when.method(GET).path("/api/feature-flags/advanced-options");
      then.status(200).json_body(json!({
        "flag_key": "enable-advanced-options",
        "enabled": true,
        "description": "Controls whether advanced form options are shown"
      }));
    }).await;
    let generate = server.mock_async(|when, then| {
      when.method(POST)
        .path("/api/generate")
        .json_body(json!({
          "gift_giver_name": "Aunt Sarah",
          "gift_description": "crystal vase",
          "relationship": "family friend",
          "next_meeting": "at Christmas dinner"
        }));
      then.status(200).json_body(note_body());
    }).await;

    let api = api_for(&server);
    let app = App::new(api.clone());
    let mut form = ThankYouForm::new();
    form.load_flags(&api).await;
    assert!(form.show_advanced);

    assert_ok!(form.set_field(FormField::GiftGiverName, "Aunt Sarah"));
    assert_ok!(form.set_field(FormField::GiftDescription, "crystal vase"));
    assert_ok!(form.set_field(FormField::Relationship, "Family Friend"));
    assert_ok!(form.set_field(FormField::NextMeeting, "  at Christmas dinner "));
    assert_ok!(form.set_field(FormField::AdditionalNotes, "   "));

    let rendered = view::render_form(&form, &app.state());
    assert!(rendered.contains("Additional Notes"));
    assert!(rendered.contains("at Christmas dinner"));

    let toast = form.submit(&app).await;
    assert_eq!(toast, Toast::Success(GENERATE_SUCCEEDED.to_string()));
    generate.assert_async().await;

    assert_ok!(app.shutdown().await);
}

#[tokio::test]
async fn test_form_reset_clears_inputs_and_note()
{   let server = MockServer::start_async().await;
    server.mock_async(|when, then| {
      when.method(POST).path("/api/generate");
      then.status(200).json_body(note_body());
    }).await;

    let app = App::new(api_for(&server));
    let mut form = ThankYouForm::new();
    assert_ok!(form.set_field(FormField::GiftGiverName, "Aunt Sarah"));
    assert_ok!(form.set_field(FormField::GiftDescription, "crystal vase"));
    assert_ok!(form.set_field(FormField::Relationship, "colleague"));
    assert!(form.submit(&app).await.is_success());
    assert!(view::render_form(&form, &app.state()).contains("[ Reset ]"));

    let toast = form.reset(&app).await;
    assert_eq!(toast.message(), "Form reset");
    assert!(form.gift_giver_name.is_empty());
    assert!(form.gift_description.is_empty());
    assert_eq!(form.relationship, Relationship::Friend);
    assert!(app.state().generated_note.is_none());
    assert!(!view::render_form(&form, &app.state()).contains("[ Reset ]"));

    assert_ok!(app.shutdown().await);
}

// ===== Status widget =====

#[tokio::test]
async fn test_status_widget_loading_then_active()
{   let server = MockServer::start_async().await;
    server.mock_async(|when, then| {
      when.method(GET).path("/api/ai-config/status");
      then.status(200)
        .delay(Duration::from_millis(200))
        .json_body(json!({
          "status": "active",
          "current_provider": "anthropic",
          "current_model": "claude-3-haiku",
          "prompt_strategy": "concise",
          "ai_config_key": "thank-you-generator",
          "advanced_options_enabled": true,
          "config_enabled": true,
          "variation_name": "concise"
        }));
    }).await;

    let widget = StatusWidget::start(
      api_for(&server),
      Duration::from_secs(30)
    );
    assert_eq!(widget.view(), StatusView::Loading);
    assert!(view::render_status(&widget.view())
      .contains(view::STATUS_LOADING));

    let status = assert_ok!(widget.loaded().await);
    assert_eq!(status.status, ConfigState::Active);
    assert_eq!(status.current_provider.as_deref(), Some("anthropic"));

    let rendered = view::render_status(&widget.view());
    assert!(rendered.contains("Provider: anthropic"));
    assert!(rendered.contains("Model: claude-3-haiku"));
    assert!(rendered.contains("Strategy: concise"));
    assert!(!rendered.contains("⚠"));
}

#[tokio::test]
async fn test_status_widget_non_json_is_error()
{   let server = MockServer::start_async().await;
    server.mock_async(|when, then| {
      when.method(GET).path("/api/ai-config/status");
      then.status(200).body("not json at all");
    }).await;

    let widget = StatusWidget::start(
      api_for(&server),
      Duration::from_secs(30)
    );
    let status = assert_ok!(widget.loaded().await);
    assert!(status.is_error());
    assert_eq!(status.error.as_deref(), Some(STATUS_FETCH_FAILED));

    let rendered = view::render_status(&widget.view());
    assert!(rendered.contains(STATUS_FETCH_FAILED));
    assert!(!rendered.contains("Provider:"));
}

#[tokio::test]
async fn test_status_widget_unreachable_is_error()
{   let config = ClientConfig::with_api_base("http://127.0.0.1:9");
    let api = assert_ok!(ApiClient::new(&config));
    let widget = StatusWidget::start(api, Duration::from_secs(30));
    let status = assert_ok!(widget.loaded().await);
    assert_eq!(status.error.as_deref(), Some(STATUS_FETCH_FAILED));
}

#[tokio::test]
async fn test_status_widget_backend_error_message_shown()
{   let server = MockServer::start_async().await;
    server.mock_async(|when, then| {
      when.method(GET).path("/api/ai-config/status");
      then.status(200).json_body(json!({
        "status": "error",
        "error": "LaunchDarkly AI client not configured"
      }));
    }).await;

    let widget = StatusWidget::start(
      api_for(&server),
      Duration::from_secs(30)
    );
    assert_ok!(widget.loaded().await);
    let rendered = view::render_status(&widget.view());
    assert!(rendered.contains("[Error]"));
    assert!(rendered.contains("LaunchDarkly AI client not configured"));
}

#[tokio::test]
async fn test_status_widget_polls_until_dropped()
{   let server = MockServer::start_async().await;
    let status = server.mock_async(|when, then| {
      when.method(GET).path("/api/ai-config/status");
      then.status(200).json_body(json!({ "status": "active" }));
    }).await;

    let widget = StatusWidget::start(
      api_for(&server),
      Duration::from_millis(100)
    );
    tokio::time::sleep(Duration::from_millis(450)).await;
    let polled = status.hits_async().await;
    assert!(polled >= 3, "expected repeated polls, got {}", polled);

    widget.stop();
    tokio::time::sleep(Duration::from_millis(100)).await;
    let after_stop = status.hits_async().await;
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(status.hits_async().await, after_stop);
}

#[tokio::test]
async fn test_status_widget_manual_refresh()
{   let server = MockServer::start_async().await;
    let status = server.mock_async(|when, then| {
      when.method(GET).path("/api/ai-config/status");
      then.status(200).json_body(json!({ "status": "active" }));
    }).await;

    let widget = StatusWidget::start(
      api_for(&server),
      Duration::from_secs(30)
    );
    assert_ok!(widget.loaded().await);
    assert_ok!(widget.refresh());
    tokio::time::sleep(Duration::from_millis(300)).await;
    status.assert_hits_async(2).await;

    // already loaded, so this answers without another fetch
    let again = assert_ok!(widget.loaded().await);
    assert_eq!(again.status, ConfigState::Active);
    status.assert_hits_async(2).await;
}

// ===== Health =====

#[tokio::test]
async fn test_health()
{   let server = MockServer::start_async().await;
    server.mock_async(|when, then| {
      when.method(GET).path("/api/health");
      then.status(200)
        .json_body(json!({ "status": "healthy", "ai_config_enabled": true }));
    }).await;

    let health = assert_ok!(api_for(&server).health().await);
    assert_eq!(health.status, "healthy");
    assert!(health.ai_config_enabled);
}

#[tokio::test]
async fn test_app_shutdown()
{   let server = MockServer::start_async().await;
    let app = App::new(api_for(&server));
    assert_ok!(app.shutdown().await);
}
