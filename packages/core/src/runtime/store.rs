//! ContentStore Trait - Content Store Abstraction Layer
//!
//! This module defines the `ContentStore` trait that abstracts the owning
//! content store and runtime services consumed by blocks. The trait enables
//! multiple backing implementations (the in-memory reference store here, a
//! platform-backed store in a host application) without changing block
//! logic.
//!
//! # Design Decisions
//!
//! 1. **Synchronous**: one render or parse call runs to completion within
//!    one request/authoring-action context, so all methods are synchronous
//! 2. **Read-only rendering**: render paths take `&dyn ContentStore`; only
//!    XML materialization takes `&mut self`
//! 3. **Error Handling**: Uses `anyhow::Result` for flexible error context
//!
//! # Examples
//!
//! ```rust
//! use courseblock_core::runtime::{ContentStore, InMemoryStore, RenderContext};
//! use courseblock_core::blocks::{ContentBlock, ViewKind};
//!
//! let mut store = InMemoryStore::new();
//! let usage_id = store
//!     .process_xml_fragment(r#"<vertical url_name="unit-1"><html url_name="h-1">Hi</html></vertical>"#)
//!     .unwrap();
//!
//! let block = store.block(&usage_id).unwrap();
//! let fragment = block
//!     .render(ViewKind::Student, &store, &RenderContext::new())
//!     .unwrap();
//! assert!(fragment.content().contains("Hi"));
//! ```

use crate::blocks::ContentBlock;
use crate::xml::XmlElement;
use anyhow::Result;
use std::sync::Arc;

/// Abstraction layer for the owning content store and runtime services.
///
/// Blocks resolve children, materialize imported XML, and reach the opaque
/// template engine exclusively through this trait.
pub trait ContentStore {
    /// Resolve a usage id to its block instance
    ///
    /// # Errors
    ///
    /// Returns an error if the usage id is not present in the store.
    fn block(&self, usage_id: &str) -> Result<Arc<dyn ContentBlock>>;

    /// Materialize a content node from a serialized XML fragment and return
    /// its usage id
    ///
    /// Called once per immediate child element during layout-block parsing.
    /// A failure here is scoped to that child: the caller records the error
    /// and continues with the remaining siblings.
    ///
    /// # Errors
    ///
    /// Returns an error if the fragment is malformed or the node cannot be
    /// registered (e.g., a duplicate usage id).
    fn process_xml_fragment(&mut self, xml: &str) -> Result<String>;

    /// Render a named layout template with the given data
    ///
    /// This is the seam to the opaque template engine; layout blocks pass
    /// `{items, context}` (plus capability flags for authoring views).
    ///
    /// # Errors
    ///
    /// Returns an error if the template is unknown or rendering fails.
    fn render_template(&self, template: &str, data: &serde_json::Value) -> Result<String>;

    /// Append the block identified by `usage_id` as a properly-formed
    /// nested XML node under `parent`
    ///
    /// # Errors
    ///
    /// Returns an error if the usage id cannot be resolved or the child
    /// fails to serialize.
    fn append_child_element(&self, usage_id: &str, parent: &mut XmlElement) -> Result<()>;

    /// Report a non-fatal error to an external tracker
    ///
    /// Called for per-child parse failures after they are logged. The
    /// default implementation drops the message.
    fn report_error(&self, message: &str) {
        let _ = message;
    }
}
