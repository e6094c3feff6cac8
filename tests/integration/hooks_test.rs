//! Integration tests for hook ordering, scoping and error transparency.

mod helpers;

use std::sync::Arc;

use serde_json::{Value, json};

use mutations_core::config::debug::DebugConfig;
use mutations_core::error::{AppError, ErrorKind};
use mutations_hooks::{CallPayload, ExecutionPayload, SpawnedHook};
use mutations_runtime::debug;

#[tokio::test]
async fn test_global_hooks_precede_instance_hooks_on_both_sides() {
    let app = helpers::TestApp::new();
    let booted = app.boot().await;

    app.record_global_call_hooks("global").await;
    app.record_global_execution_hooks("global").await;
    app.record_instance_call_hooks(&booted.titled, "instance").await;
    app.record_instance_execution_hooks(&booted.titled, "instance")
        .await;

    let result = booted.titled.run(json!({ "title": "DEMO" })).await.unwrap();
    assert_eq!(result, json!("DEMO"));

    assert_eq!(
        app.events(),
        vec![
            "global:before_call",
            "instance:before_call",
            "global:before_execution",
            "instance:before_execution",
            "global:after_execution:ok=\"DEMO\"",
            "instance:after_execution:ok=\"DEMO\"",
            "global:after_call:ok=\"DEMO\"",
            "instance:after_call:ok=\"DEMO\"",
        ]
    );
}

#[tokio::test]
async fn test_after_hooks_observe_body_error_once() {
    let app = helpers::TestApp::new();
    let booted = app.boot().await;

    app.record_global_call_hooks("global").await;
    app.record_global_execution_hooks("global").await;

    let err = booted.explode.run(Value::Null).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Operation);

    assert_eq!(
        app.events(),
        vec![
            "global:before_call",
            "global:before_execution",
            "global:after_execution:err=OPERATION",
            "global:after_call:err=OPERATION",
        ]
    );
}

#[tokio::test]
async fn test_after_hooks_observe_validation_error() {
    let app = helpers::TestApp::new();
    let booted = app.boot().await;

    app.record_instance_execution_hooks(&booted.titled, "titled")
        .await;

    let err = booted.titled.run(json!({ "title": 5 })).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    assert_eq!(
        app.events(),
        vec![
            "titled:before_execution",
            "titled:after_execution:err=VALIDATION",
        ]
    );
}

#[tokio::test]
async fn test_instance_hooks_stay_on_their_mutation() {
    let app = helpers::TestApp::new();
    let booted = app.boot().await;

    app.record_instance_call_hooks(&booted.titled, "titled").await;

    booted.greet.run(Value::Null).await.unwrap();
    assert!(app.events().is_empty());
}

#[tokio::test]
async fn test_failing_before_call_hook_aborts_invocation() {
    let app = helpers::TestApp::new();
    let booted = app.boot().await;

    app.runtime
        .add_before_call("deny", |_: &CallPayload| {
            Err(AppError::hook("calls are frozen"))
        })
        .await
        .unwrap();
    app.record_global_call_hooks("global").await;
    app.record_global_execution_hooks("global").await;

    let err = booted.greet.run(Value::Null).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Hook);
    assert_eq!(err.message, "calls are frozen");

    // Neither later before hooks, the remote side, nor after hooks ran.
    assert!(app.events().is_empty());
}

#[tokio::test]
async fn test_failing_after_call_hook_surfaces_to_caller() {
    let app = helpers::TestApp::new();
    let booted = app.boot().await;

    booted
        .greet
        .add_after_call("broken-metrics", |_: &CallPayload| {
            Err(AppError::hook("metrics sink down"))
        })
        .await
        .unwrap();

    let err = booted.greet.run(Value::Null).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Hook);
}

#[tokio::test]
async fn test_failing_execution_hook_is_reported_through_transport() {
    let app = helpers::TestApp::new();
    let booted = app.boot().await;

    app.runtime
        .add_before_execution("deny", |p: &ExecutionPayload| {
            Err(AppError::hook(format!("{} is disabled", p.descriptor.name())))
        })
        .await
        .unwrap();
    app.record_global_call_hooks("global").await;

    let err = booted.greet.run(Value::Null).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Hook);
    assert_eq!(err.message, "greet is disabled");

    // The caller side still completes its after-call dispatch.
    assert_eq!(
        app.events(),
        vec!["global:before_call", "global:after_call:err=HOOK"]
    );
}

#[tokio::test]
async fn test_removed_hook_no_longer_fires() {
    let app = helpers::TestApp::new();
    let booted = app.boot().await;

    app.record_global_call_hooks("audit").await;
    assert!(app.runtime.call_hooks().remove("audit").await);

    booted.greet.run(Value::Null).await.unwrap();
    assert!(app.events().is_empty());
}

#[tokio::test]
async fn test_spawned_hook_sees_outcome() {
    let app = helpers::TestApp::new();
    let booted = app.boot().await;
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

    app.runtime
        .call_hooks()
        .add_after(Arc::new(SpawnedHook::new("async-audit", move |p: CallPayload| {
            let tx = tx.clone();
            async move {
                let _ = tx.send((p.descriptor.name().to_string(), p.result));
                Ok(())
            }
        })))
        .await
        .unwrap();

    booted.titled.run(json!({ "title": "DEMO" })).await.unwrap();

    let (name, result) = rx.recv().await.unwrap();
    assert_eq!(name, "titled");
    assert_eq!(result, Some(json!("DEMO")));
}

#[tokio::test]
async fn test_debug_hooks_do_not_change_outcomes() {
    let app = helpers::TestApp::new();
    let booted = app.boot().await;
    let switch = debug::install(&app.runtime, &DebugConfig { enabled: true })
        .await
        .unwrap();

    assert_eq!(booted.greet.run(Value::Null).await.unwrap(), json!("Hello!"));
    assert_eq!(
        booted.explode.run(Value::Null).await.unwrap_err().kind,
        ErrorKind::Operation
    );

    switch.disable();
    assert_eq!(
        booted.titled.run(json!({ "title": "DEMO" })).await.unwrap(),
        json!("DEMO")
    );
}
