//! Palladio: a uniform management facade for managed objects.
//!
//! Hosted components register *managed objects* under structured
//! [`ObjectName`]s together with a metadata snapshot declaring their
//! attributes and operations. Clients then query, introspect, read and write
//! attributes, invoke operations and record notification listeners through a
//! single [`ManagementFacade`].
//!
//! # Architecture
//!
//! Palladio follows hexagonal architecture principles:
//!
//! - **Domain**: Names, queries, metadata and subscriptions with no
//!   infrastructure dependencies
//! - **Ports**: Trait contracts for managed objects, the object registry and
//!   the listener ledger
//! - **Adapters**: In-memory implementations of those ports
//! - **Services**: Query, introspection and dispatch logic composed by the
//!   facade
//!
//! # Modules
//!
//! - [`naming`]: Object names and name patterns
//! - [`query`]: Attribute predicate expressions
//! - [`registry`]: Object registry, metadata and dispatch services
//! - [`listener`]: Listener-registration ledger
//! - [`facade`]: The management facade and its configuration
//!
//! # Example
//!
//! ```
//! use palladio::ObjectName;
//! use palladio::facade::{FacadeConfig, InMemoryManagementFacade};
//! use palladio::registry::adapters::memory::InMemoryManagedObject;
//! use palladio::registry::domain::{AttributeInfo, ValueType};
//! use std::sync::Arc;
//!
//! let facade = InMemoryManagementFacade::in_memory(FacadeConfig::default())?;
//! let queue = InMemoryManagedObject::builder("org.example.Queue")
//!     .attribute(AttributeInfo::new("Depth", ValueType::Integer), 12)
//!     .build();
//! let name: ObjectName = "billing:type=Queue,name=orders".parse()?;
//! facade.register(name, Arc::new(queue))?;
//!
//! let pattern: ObjectName = "billing:type=Queue,*".parse()?;
//! let names = facade.query_names(Some(&pattern), None);
//! assert_eq!(names.len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod facade;
pub mod listener;
pub mod naming;
pub mod query;
pub mod registry;

pub use error::{AttributeAccess, FaultKind, ManagementError, ManagementResult};
pub use facade::{FacadeConfig, InMemoryManagementFacade, ManagementFacade};
pub use naming::{MalformedNameError, ObjectName};
pub use query::QueryExpr;
