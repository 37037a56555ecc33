//! ContentBlock Trait - Block Behavior Seam
//!
//! Every node in the course content tree is reachable as a `ContentBlock`:
//! the trait supplies the render hooks, progress and icon classification,
//! the non-editable metadata set, and XML export. Layout blocks implement
//! it by composing their children; leaf blocks implement it directly.
//!
//! # Method Categories
//!
//! - **Identity**: 2 methods (usage id, block type)
//! - **Rendering**: 1 method (student/author views by `ViewKind`)
//! - **Aggregation**: 2 methods (progress, icon classification)
//! - **Authoring**: 1 method (non-editable metadata fields)
//! - **Export**: 1 method (XML serialization)

use crate::models::{Fragment, Progress, ProgressError, ValidationError};
use crate::runtime::{ContentStore, RenderContext};
use crate::xml::{XmlElement, XmlError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Icon classification reported by video blocks
pub const ICON_VIDEO: &str = "video";

/// Icon classification reported by problem blocks
pub const ICON_PROBLEM: &str = "problem";

/// Fallback icon classification
pub const ICON_OTHER: &str = "other";

// Static display-priority table for icon classification. The first entry
// present among a layout block's children wins.
// HACK: this shouldn't be hard-coded to two types
pub const CLASS_PRIORITY: &[&str] = &[ICON_VIDEO, ICON_PROBLEM];

/// Metadata fields no block exposes for editing
pub const BASE_NON_EDITABLE_FIELDS: &[&str] = &["usage_id", "block_type", "children"];

/// Which rendering a caller is asking for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    /// Learner-facing rendering
    Student,
    /// Authoring-tool rendering
    Author,
}

/// Product of parsing a layout block's XML definition: the (empty) metadata
/// map plus the ordered list of successfully resolved child usage ids.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockDefinition {
    /// Parsed metadata fields
    pub fields: Map<String, Value>,
    /// Ordered child usage ids that resolved in the content store
    pub children: Vec<String>,
}

/// Block operation errors
///
/// Store failures arrive as `anyhow::Error` (the `ContentStore` trait
/// convention) and pass through transparently.
#[derive(Error, Debug)]
pub enum BlockError {
    /// Node validation failed
    #[error("invalid block node: {0}")]
    Validation(#[from] ValidationError),

    /// A progress value violated its invariants
    #[error("invalid progress value: {0}")]
    Progress(#[from] ProgressError),

    /// XML handling failed
    #[error("XML handling failed: {0}")]
    Xml(#[from] XmlError),

    /// The content store reported a failure
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// Behavior seam for one node in the course content tree.
///
/// Implementations must be stateless transformers over the
/// (children, context) pair at call time; the only persistent state is the
/// node's ordered child-identifier list.
pub trait ContentBlock {
    /// Stable opaque identifier of this block
    fn usage_id(&self) -> &str;

    /// Block type identifier (e.g., "vertical", "video")
    fn block_type(&self) -> &str;

    /// Render this block for the requested view
    ///
    /// Render failures propagate to the caller; fault isolation happens
    /// above this layer.
    fn render(
        &self,
        view: ViewKind,
        store: &dyn ContentStore,
        context: &RenderContext,
    ) -> Result<Fragment, BlockError>;

    /// Completion progress, if this block reports any
    fn progress(&self, store: &dyn ContentStore) -> Result<Option<Progress>, BlockError> {
        let _ = store;
        Ok(None)
    }

    /// Icon classification for display-priority purposes
    fn icon_class(&self, store: &dyn ContentStore) -> Result<String, BlockError> {
        let _ = store;
        Ok(ICON_OTHER.to_string())
    }

    /// Metadata fields the authoring tool must not expose for editing
    fn non_editable_fields(&self) -> Vec<&'static str> {
        BASE_NON_EDITABLE_FIELDS.to_vec()
    }

    /// Serialize this block to an XML element
    fn to_xml(&self, store: &dyn ContentStore) -> Result<XmlElement, BlockError>;
}
