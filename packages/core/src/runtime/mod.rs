//! Runtime Collaborators
//!
//! This module holds the seams between blocks and the hosting platform:
//!
//! - `RenderContext` - Ambient context map passed through render calls
//! - `ContentStore` - Collaborator trait for child resolution, XML
//!   materialization, and template rendering
//! - `InMemoryStore` - Reference store backing the test suite and small
//!   embedders

mod context;
mod memory;
mod store;

pub use context::RenderContext;
pub use memory::{GenericBlock, InMemoryStore};
pub use store::ContentStore;
