//! Tests for the call bridge
//!
//! Organized by component

mod helpers;
