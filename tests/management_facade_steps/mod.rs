//! Step definitions for management facade scenarios.

mod given;
mod then;
mod when;
pub mod world;
