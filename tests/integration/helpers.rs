//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use serde_json::{Value, json};

use mutations_core::error::AppError;
use mutations_core::types::MutationDescriptor;
use mutations_hooks::{CallPayload, ExecutionPayload};
use mutations_runtime::{LocalTransport, Mutation, MutationRuntime};

/// Test application context
pub struct TestApp {
    /// Fresh runtime with no global hooks
    pub runtime: Arc<MutationRuntime>,
    /// The transport behind the runtime
    pub transport: Arc<LocalTransport>,
    /// Hook invocations recorded by the `record_*` helpers
    pub events: Arc<Mutex<Vec<String>>>,
}

impl TestApp {
    /// Create a new test application
    pub fn new() -> Self {
        let transport = Arc::new(LocalTransport::new());
        let runtime = Arc::new(MutationRuntime::new(transport.clone()));
        Self {
            runtime,
            transport,
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Define the reference mutations and bind their bodies:
    /// `greet` returns "Hello!", `titled` returns `params.title`,
    /// `explode` fails with "Oh no!".
    pub async fn boot(&self) -> Booted {
        let greet = self
            .runtime
            .define_config(&json!({ "name": "greet" }))
            .expect("valid greet config");
        greet
            .set_handler(|_ctx, _params| async { Ok(json!("Hello!")) })
            .await
            .expect("bind greet");

        let titled = self
            .runtime
            .define_config(&json!({ "name": "titled", "params": { "title": "string" } }))
            .expect("valid titled config");
        titled
            .set_handler(|_ctx, params: Value| async move { Ok(params["title"].clone()) })
            .await
            .expect("bind titled");

        let explode = self
            .runtime
            .define(MutationDescriptor::new("explode").expect("valid explode name"));
        explode
            .set_handler(|_ctx, _params| async { Err(AppError::internal("Oh no!")) })
            .await
            .expect("bind explode");

        Booted {
            greet,
            titled,
            explode,
        }
    }

    /// Record every global call hook as `"<label>:<phase>:<outcome>"`.
    pub async fn record_global_call_hooks(&self, label: &str) {
        let (before, after) = self.call_recorders(label);
        self.runtime.add_before_call(label, before).await.unwrap();
        self.runtime.add_after_call(label, after).await.unwrap();
    }

    /// Record every call hook of `mutation` the same way.
    pub async fn record_instance_call_hooks(&self, mutation: &Mutation, label: &str) {
        let (before, after) = self.call_recorders(label);
        mutation.add_before_call(label, before).await.unwrap();
        mutation.add_after_call(label, after).await.unwrap();
    }

    /// Record every global execution hook.
    pub async fn record_global_execution_hooks(&self, label: &str) {
        let (before, after) = self.execution_recorders(label);
        self.runtime.add_before_execution(label, before).await.unwrap();
        self.runtime.add_after_execution(label, after).await.unwrap();
    }

    /// Record every execution hook of `mutation`.
    pub async fn record_instance_execution_hooks(&self, mutation: &Mutation, label: &str) {
        let (before, after) = self.execution_recorders(label);
        mutation.add_before_execution(label, before).await.unwrap();
        mutation.add_after_execution(label, after).await.unwrap();
    }

    /// Snapshot of recorded events.
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn call_recorders(
        &self,
        label: &str,
    ) -> (
        impl Fn(&CallPayload) -> Result<(), AppError> + Send + Sync + use<>,
        impl Fn(&CallPayload) -> Result<(), AppError> + Send + Sync + use<>,
    ) {
        let (events, tag) = (self.events.clone(), label.to_string());
        let before = move |_: &CallPayload| -> Result<(), AppError> {
            events.lock().unwrap().push(format!("{tag}:before_call"));
            Ok(())
        };

        let (events, tag) = (self.events.clone(), label.to_string());
        let after = move |p: &CallPayload| -> Result<(), AppError> {
            let outcome = describe(&p.result, &p.error);
            events
                .lock()
                .unwrap()
                .push(format!("{tag}:after_call:{outcome}"));
            Ok(())
        };

        (before, after)
    }

    fn execution_recorders(
        &self,
        label: &str,
    ) -> (
        impl Fn(&ExecutionPayload) -> Result<(), AppError> + Send + Sync + use<>,
        impl Fn(&ExecutionPayload) -> Result<(), AppError> + Send + Sync + use<>,
    ) {
        let (events, tag) = (self.events.clone(), label.to_string());
        let before = move |_: &ExecutionPayload| -> Result<(), AppError> {
            events.lock().unwrap().push(format!("{tag}:before_execution"));
            Ok(())
        };

        let (events, tag) = (self.events.clone(), label.to_string());
        let after = move |p: &ExecutionPayload| -> Result<(), AppError> {
            let outcome = describe(&p.result, &p.error);
            events
                .lock()
                .unwrap()
                .push(format!("{tag}:after_execution:{outcome}"));
            Ok(())
        };

        (before, after)
    }
}

/// The reference mutations defined by [`TestApp::boot`].
pub struct Booted {
    pub greet: Arc<Mutation>,
    pub titled: Arc<Mutation>,
    pub explode: Arc<Mutation>,
}

fn describe(result: &Option<Value>, error: &Option<AppError>) -> String {
    match (result, error) {
        (Some(r), None) => format!("ok={r}"),
        (None, Some(e)) => format!("err={}", e.kind),
        (r, e) => format!("invalid(result={r:?}, error={e:?})"),
    }
}
