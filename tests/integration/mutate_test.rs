//! Integration tests for calling mutations end to end.

mod helpers;

use std::sync::Arc;

use serde_json::{Value, json};

use mutations_core::error::ErrorKind;
use mutations_core::types::{CallOptions, MutationDescriptor};

#[tokio::test]
async fn test_call_mutation_without_params() {
    let app = helpers::TestApp::new();
    let booted = app.boot().await;

    let result = booted.greet.run(Value::Null).await.unwrap();
    assert_eq!(result, json!("Hello!"));
}

#[tokio::test]
async fn test_call_mutation_with_params() {
    let app = helpers::TestApp::new();
    let booted = app.boot().await;

    let result = booted.titled.run(json!({ "title": "DEMO" })).await.unwrap();
    assert_eq!(result, json!("DEMO"));
}

#[tokio::test]
async fn test_missing_required_param_is_validation_error() {
    let app = helpers::TestApp::new();
    let booted = app.boot().await;

    let err = booted.titled.run(json!({})).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_body_error_rejects_the_call() {
    let app = helpers::TestApp::new();
    let booted = app.boot().await;

    let err = booted
        .explode
        .run(json!({ "title": "DEMO" }))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Operation);
    assert_eq!(err.message, "Oh no!");
}

#[tokio::test]
async fn test_unbound_mutation_fails_with_not_found() {
    let app = helpers::TestApp::new();
    let orphan = app
        .runtime
        .define(MutationDescriptor::new("orphan").unwrap());

    let err = orphan.run(Value::Null).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_non_object_params_are_rejected() {
    let app = helpers::TestApp::new();
    let booted = app.boot().await;

    let err = booted.titled.run(json!(["DEMO"])).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidParams);
}

#[tokio::test]
async fn test_invalid_config_fails_at_definition() {
    let app = helpers::TestApp::new();

    for config in [
        json!({ "namex": "some_mutation_invalid" }),
        json!({ "name": 7 }),
        json!({ "name": "" }),
        json!({ "name": "bad_shape", "params": { "title": "text" } }),
        json!({ "name": "scalar", "params": "string" }),
        json!({ "name": "list", "params": ["string"] }),
    ] {
        let err = app.runtime.define_config(&config).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidConfig, "{config}");
    }
}

#[tokio::test]
async fn test_custom_validator_runs_on_execution() {
    let app = helpers::TestApp::new();
    let positive = app.runtime.define(
        MutationDescriptor::new("positive")
            .unwrap()
            .with_validator(|params| match params.get("n").and_then(Value::as_i64) {
                Some(n) if n > 0 => Ok(()),
                _ => Err(mutations_core::AppError::validation("n must be positive")),
            }),
    );
    positive
        .set_handler(|_ctx, params: Value| async move {
            Ok(json!(params["n"].as_i64().unwrap_or(0) * 2))
        })
        .await
        .unwrap();

    assert_eq!(positive.run(json!({ "n": 21 })).await.unwrap(), json!(42));

    let err = positive.run(json!({ "n": -1 })).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(err.message, "n must be positive");
}

#[tokio::test]
async fn test_options_reach_the_body_context() {
    let app = helpers::TestApp::new();
    let whoami = app.runtime.define(MutationDescriptor::new("whoami").unwrap());
    whoami
        .set_handler(|ctx, _params| async move {
            Ok(json!({
                "user": ctx.user_id,
                "tenant": ctx.metadata.get("tenant").cloned(),
            }))
        })
        .await
        .unwrap();

    let result = whoami
        .run_with(
            Value::Null,
            CallOptions::new()
                .with_user("alice")
                .with_metadata("tenant", json!("acme")),
        )
        .await
        .unwrap();
    assert_eq!(result, json!({ "user": "alice", "tenant": "acme" }));
}

#[tokio::test]
async fn test_concurrent_invocations_are_independent() {
    let app = helpers::TestApp::new();
    let booted = app.boot().await;
    let titled = Arc::clone(&booted.titled);

    let calls: Vec<_> = (0..16)
        .map(|i| {
            let titled = titled.clone();
            tokio::spawn(async move { titled.run(json!({ "title": format!("T{i}") })).await })
        })
        .collect();

    for (i, call) in calls.into_iter().enumerate() {
        let result = call.await.unwrap().unwrap();
        assert_eq!(result, json!(format!("T{i}")));
    }
}

#[tokio::test]
async fn test_mutate_calls_by_descriptor() {
    let app = helpers::TestApp::new();
    let booted = app.boot().await;

    let result = app
        .runtime
        .mutate(booted.greet.descriptor(), Value::Null, CallOptions::new())
        .await
        .unwrap();
    assert_eq!(result, json!("Hello!"));
}
