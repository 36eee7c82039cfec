//! Managed-object registry, introspection and attribute/operation dispatch.
//!
//! Objects are registered under concrete [`ObjectName`](crate::naming::ObjectName)s
//! together with a metadata snapshot describing their attributes and
//! operations. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Query, introspection and dispatch services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
