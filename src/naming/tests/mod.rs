//! Unit tests for object names and pattern matching.
