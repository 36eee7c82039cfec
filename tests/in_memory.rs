//! In-memory facade integration tests.
//!
//! Tests are organized into modules by functionality:
//! - `lifecycle_tests`: Register, read, write, invoke and unregister flows
//! - `bulk_tests`: Partial success of bulk reads and writes
//! - `query_tests`: Pattern and predicate selection through the facade
//! - `concurrency_tests`: Concurrent registration and queries

mod in_memory {
    pub mod helpers;

    mod bulk_tests;
    mod concurrency_tests;
    mod lifecycle_tests;
    mod query_tests;
}
