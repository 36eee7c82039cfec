//! Adapter implementations for the listener ledger port.

pub mod memory;
