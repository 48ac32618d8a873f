//! Property-based tests for graphconn core library

mod generators;
mod registry_tests;
mod serialization_tests;
