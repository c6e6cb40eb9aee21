//! Tests for the in-memory host
//!
//! Organized by feature area
