//! Core editor module
//!
//! This module contains:
//! - The AnnotationCanvas component and its readiness gate

pub mod canvas;
