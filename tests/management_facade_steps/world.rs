//! Shared world state for management facade BDD scenarios.

use palladio::{
    ManagementResult, ObjectName,
    facade::{FacadeConfig, InMemoryManagementFacade},
    registry::{
        adapters::memory::InMemoryManagedObject,
        domain::{AttributeInfo, AttributeList, OperationInfo, ValueType},
    },
};
use rstest::fixture;
use serde_json::Value;
use std::collections::BTreeSet;

/// Scenario world for management facade behaviour tests.
pub struct FacadeWorld {
    /// The facade under test.
    pub facade: InMemoryManagementFacade,
    /// Most recently registered queue.
    pub queue: Option<ObjectName>,
    /// Result of the last single-value call.
    pub last_result: Option<ManagementResult<Value>>,
    /// Result of the last query.
    pub last_query: Option<BTreeSet<ObjectName>>,
    /// Result of the last bulk read.
    pub last_bulk: Option<AttributeList>,
}

impl FacadeWorld {
    /// Creates a world around an empty facade.
    ///
    /// # Panics
    ///
    /// Panics if the default configuration is rejected.
    #[must_use]
    pub fn new() -> Self {
        Self {
            facade: InMemoryManagementFacade::in_memory(FacadeConfig::default())
                .expect("default configuration is valid"),
            queue: None,
            last_result: None,
            last_query: None,
            last_bulk: None,
        }
    }

    /// Returns the most recently registered queue name.
    pub fn queue(&self) -> Result<&ObjectName, eyre::Report> {
        self.queue
            .as_ref()
            .ok_or_else(|| eyre::eyre!("no queue registered in scenario world"))
    }
}

impl Default for FacadeWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> FacadeWorld {
    FacadeWorld::default()
}

/// Builds a queue object holding `depth` messages.
pub fn queue_object(depth: i64) -> InMemoryManagedObject {
    InMemoryManagedObject::builder("org.example.Queue")
        .attribute(AttributeInfo::new("Depth", ValueType::Integer), depth)
        .attribute(
            AttributeInfo::new("Capacity", ValueType::Integer)
                .writable()
                .with_min_value(1),
            100,
        )
        .operation(OperationInfo::new("purge", ValueType::Integer), |queue, _| {
            let purged = queue.value("Depth")?;
            queue.store("Depth", 0)?;
            Ok(purged)
        })
        .build()
}

/// Parses a JSON value written in a step.
pub fn parse_value(text: &str) -> Result<Value, eyre::Report> {
    serde_json::from_str(text).map_err(|err| eyre::eyre!("invalid JSON value '{text}': {err}"))
}
