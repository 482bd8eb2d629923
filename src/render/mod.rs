//! Annotation rendering module
//!
//! This module contains:
//! - Rendering constants shared by the compositor
//! - Image rendering using tiny-skia (visible surface and export)

pub mod geometry;
pub mod image;
