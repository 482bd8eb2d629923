//! Pure domain types with minimal dependencies
//!
//! This module contains the geometry, shape and tool types used throughout the
//! editor. Types here know nothing about rendering or image decoding.

pub mod annotation;
pub mod geometry;
pub mod tool;

pub use annotation::*;
pub use geometry::*;
pub use tool::*;
