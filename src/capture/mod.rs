//! Source image loading module
//!
//! This module contains:
//! - Image sources and decoding (image.rs)
//! - Scaling the decoded image to the measured viewport

pub mod image;
