//! Adapter implementations for registry and managed-object ports.

pub mod memory;
