//! Shared fixtures for in-memory facade integration tests.

use palladio::{
    ObjectName,
    facade::{FacadeConfig, InMemoryManagementFacade},
    registry::{
        adapters::memory::InMemoryManagedObject,
        domain::{AttributeInfo, OperationInfo, ParameterInfo, ValueType},
    },
};
use rstest::fixture;
use serde_json::Value;
use std::sync::Once;

static TRACING: Once = Once::new();

/// Routes `tracing` output through the test harness writer.
///
/// Set `RUST_LOG=palladio=debug` to see suppressed faults.
pub fn init_tracing() {
    TRACING.call_once(|| {
        drop(
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
                .with_test_writer()
                .try_init(),
        );
    });
}

/// Parses an object name.
///
/// # Panics
///
/// Panics if `text` is not a valid name.
pub fn name(text: &str) -> ObjectName {
    text.parse().expect("valid object name")
}

/// Fixture providing an empty facade with default configuration.
#[fixture]
pub fn facade() -> InMemoryManagementFacade {
    init_tracing();
    InMemoryManagementFacade::in_memory(FacadeConfig::default()).expect("valid configuration")
}

/// Builds a counter with a writable `Count`, a read-only `Label` and
/// `reset`/`add` operations.
pub fn counter(label: &str) -> InMemoryManagedObject {
    InMemoryManagedObject::builder("org.example.Counter")
        .description("Monotonic counter")
        .attribute(
            AttributeInfo::new("Count", ValueType::Integer)
                .writable()
                .with_min_value(0),
            0,
        )
        .attribute(AttributeInfo::new("Label", ValueType::String), label)
        .operation(OperationInfo::new("reset", ValueType::Void), |object, _| {
            object.store("Count", 0)?;
            Ok(Value::Null)
        })
        .operation(
            OperationInfo::new("add", ValueType::Integer)
                .with_parameter(ParameterInfo::new("delta", ValueType::Integer)),
            |object, params| {
                let current = object.value("Count")?.as_i64().unwrap_or_default();
                let delta = params
                    .first()
                    .and_then(Value::as_i64)
                    .unwrap_or_default();
                let total = current.saturating_add(delta);
                object.store("Count", total)?;
                Ok(Value::from(total))
            },
        )
        .build()
}
