//! Unit tests for registry domain types and services.
