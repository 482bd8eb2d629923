//! Annotation session module
//!
//! This module contains:
//! - Session state and its named operations
//! - Message types for editor interactions
//! - Keyboard shortcuts

pub mod messages;
pub mod shortcuts;
pub mod state;
