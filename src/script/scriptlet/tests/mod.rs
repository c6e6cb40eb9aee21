//! Tests for the scriptlet engine
//!
//! Organized by feature area

mod basic_tests;
mod error_tests;
mod helpers;
mod module_tests;
