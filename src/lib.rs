//! HeartScope annotation editor
//!
//! Freehand, circle and rectangle markup over a scaled angiogram image, with
//! selection, dragging, erasing, in-memory undo and PNG export.

pub mod annotations;
pub mod capture;
pub mod config;
pub mod core;
pub mod domain;
pub mod export;
pub mod render;
pub mod script;
pub mod session;

pub use crate::capture::image::ImageSource;
pub use crate::config::EditorConfig;
pub use crate::core::canvas::{AnnotationCanvas, LoadTicket};
