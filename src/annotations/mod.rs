//! Annotation interaction handling
//!
//! This module provides:
//! - The per-tool pointer state machine
//! - Message handlers for EditorMsg

pub mod handlers;
