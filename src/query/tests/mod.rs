//! Unit tests for query parsing and evaluation.

mod eval_tests;
