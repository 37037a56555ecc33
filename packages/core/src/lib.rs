//! Courseblock Core
//!
//! This crate provides the layout-block composition logic and content-block
//! plumbing for the Courseblock learning platform.
//!
//! # Architecture
//!
//! - **Universal Node**: all content types share the `CourseNode` shape;
//!   type-specific metadata lives in its `fields` bag
//! - **Trait Seams**: blocks are reached as `ContentBlock`, the owning
//!   store and runtime services as `ContentStore`
//! - **Synchronous**: one render or parse call runs to completion within
//!   one request/authoring-action context
//!
//! # Modules
//!
//! - [`models`] - Data structures (CourseNode, Progress, Fragment)
//! - [`blocks`] - Content-block trait and the vertical/wrapper layouts
//! - [`runtime`] - Render context, content-store seam, in-memory store
//! - [`xml`] - XML fragment parsing and serialization

pub mod blocks;
pub mod models;
pub mod runtime;
pub mod xml;

// Re-export commonly used types
pub use blocks::*;
pub use models::*;
pub use runtime::*;
