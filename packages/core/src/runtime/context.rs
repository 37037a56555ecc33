//! Render Context
//!
//! The ambient context map handed through render calls. Two keys are
//! recognized by layout blocks: the authoring root (scopes drag-and-drop
//! affordances) and the unit-page flag; everything else rides along in the
//! flattened `extra` map and is passed through to templates untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Ambient rendering context.
///
/// # Examples
///
/// ```rust
/// use courseblock_core::runtime::RenderContext;
///
/// let context = RenderContext::new()
///     .with_root("unit-1".to_string())
///     .with_unit_page(true);
///
/// let child_context = context.for_child();
/// assert!(child_context.child_of_vertical);
/// assert_eq!(child_context.root_usage_id.as_deref(), Some("unit-1"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderContext {
    /// Usage id of the authoring root block, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_usage_id: Option<String>,

    /// Whether the surrounding page is a unit page
    #[serde(default)]
    pub is_unit_page: bool,

    /// Set on contexts handed to children of a layout block
    #[serde(default)]
    pub child_of_vertical: bool,

    /// Unrecognized context keys, passed through to templates
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RenderContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the authoring root usage id
    pub fn with_root(mut self, root_usage_id: String) -> Self {
        self.root_usage_id = Some(root_usage_id);
        self
    }

    /// Set the unit-page flag
    pub fn with_unit_page(mut self, is_unit_page: bool) -> Self {
        self.is_unit_page = is_unit_page;
        self
    }

    /// Attach an extra pass-through key
    pub fn with_extra(mut self, key: String, value: Value) -> Self {
        self.extra.insert(key, value);
        self
    }

    /// Derive the context handed to children of a layout block
    pub fn for_child(&self) -> Self {
        let mut child = self.clone();
        child.child_of_vertical = true;
        child
    }
}
