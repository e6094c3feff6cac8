//! Mutations demo: wires a runtime over the in-process transport, installs
//! the debug hooks and calls a few mutations.

use std::sync::Arc;

use serde_json::{Value, json};
use tracing_subscriber::{EnvFilter, fmt};

use mutations_core::config::AppConfig;
use mutations_core::error::AppError;
use mutations_core::types::{MutationDescriptor, ParamsShape};
use mutations_runtime::{LocalTransport, MutationRuntime, debug};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Demo failed: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from files and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("MUTATIONS_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting mutations demo v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Transport + runtime ──────────────────────────────
    let transport = Arc::new(LocalTransport::from_config(&config.transport));
    let runtime = Arc::new(MutationRuntime::new(transport.clone()));

    // ── Step 2: Global hooks ─────────────────────────────────────
    let switch = debug::install(&runtime, &config.debug).await?;

    // ── Step 3: Define and bind mutations ────────────────────────
    let greet = runtime.define(MutationDescriptor::new("greet")?);
    greet
        .set_handler(|_ctx, _params| async { Ok(json!("Hello!")) })
        .await?;

    let titled = runtime.define(
        MutationDescriptor::new("titled")?
            .with_params(ParamsShape::object([("title", ParamsShape::String)]))?,
    );
    titled
        .set_handler(|_ctx, params: Value| async move { Ok(params["title"].clone()) })
        .await?;
    titled
        .add_after_execution("audit", |p| {
            tracing::info!(
                mutation = %p.descriptor.name(),
                failed = p.error.is_some(),
                "Audit: titled executed"
            );
            Ok(())
        })
        .await?;

    let explode = runtime.define_config(&json!({ "name": "explode" }))?;
    explode
        .set_handler(|_ctx, _params| async { Err(AppError::internal("Oh no!")) })
        .await?;

    tracing::info!(methods = ?transport.method_names().await, "Mutations bound");

    // ── Step 4: Call them ────────────────────────────────────────
    report("greet", greet.run(Value::Null).await);
    report("titled", titled.run(json!({ "title": "DEMO" })).await);
    report("titled", titled.run(json!({})).await);
    report("explode", explode.run(Value::Null).await);

    switch.disable();
    report("greet (debug off)", greet.run(Value::Null).await);

    tracing::info!("Demo finished");
    Ok(())
}

fn report(label: &str, outcome: Result<Value, AppError>) {
    match outcome {
        Ok(result) => tracing::info!(call = %label, %result, "Call resolved"),
        Err(e) => tracing::warn!(call = %label, error = %e, "Call rejected"),
    }
}
