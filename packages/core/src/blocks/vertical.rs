//! VerticalBlock - Layout Block
//!
//! Lays out its children vertically, for student display and for
//! authoring display. A type-safe wrapper over the universal `CourseNode`
//! (block type `"vertical"`).
//!
//! # Examples
//!
//! ```rust
//! use courseblock_core::blocks::{ContentBlock, VerticalBlock};
//!
//! let vertical = VerticalBlock::builder()
//!     .with_display_name("Unit 1".to_string())
//!     .with_child("video-1".to_string())
//!     .with_child("problem-1".to_string())
//!     .build();
//!
//! assert_eq!(vertical.block_type(), "vertical");
//! assert!(vertical.non_editable_fields().contains(&"due"));
//! ```

use crate::blocks::content_block::{
    BlockDefinition, BlockError, ContentBlock, ViewKind, BASE_NON_EDITABLE_FIELDS,
};
use crate::blocks::layout;
use crate::models::{CourseNode, Fragment, Progress, ValidationError};
use crate::runtime::{ContentStore, RenderContext};
use crate::xml::XmlElement;
use chrono::{DateTime, Utc};
use serde_json::json;

/// Block type identifier for vertical layout blocks
pub const VERTICAL_BLOCK_TYPE: &str = "vertical";

/// Student-view template for vertical layout blocks
const STUDENT_VIEW_TEMPLATE: &str = "vertical-student-view";

/// Layout block that renders its children vertically.
pub struct VerticalBlock {
    node: CourseNode,
}

impl VerticalBlock {
    /// Create a VerticalBlock from an existing CourseNode
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidBlockType` if the node type is not
    /// `"vertical"`.
    pub fn from_node(node: CourseNode) -> Result<Self, ValidationError> {
        if node.block_type != VERTICAL_BLOCK_TYPE {
            return Err(ValidationError::InvalidBlockType(format!(
                "Expected '{}', got '{}'",
                VERTICAL_BLOCK_TYPE, node.block_type
            )));
        }
        Ok(Self { node })
    }

    /// Create a builder for a new VerticalBlock
    pub fn builder() -> VerticalBlockBuilder {
        VerticalBlockBuilder::default()
    }

    /// Get a reference to the underlying CourseNode
    pub fn as_node(&self) -> &CourseNode {
        &self.node
    }

    /// Get a mutable reference to the underlying CourseNode
    pub fn as_node_mut(&mut self) -> &mut CourseNode {
        &mut self.node
    }

    /// Convert back to the universal CourseNode (consumes wrapper)
    pub fn into_node(self) -> CourseNode {
        self.node
    }

    /// Parse a layout definition from an XML container element.
    ///
    /// Each immediate child element is handed to the content store's
    /// generic XML processor; a failure for an individual child is logged,
    /// reported, and skipped, so a malformed child never aborts the parse.
    /// Returns the (empty) metadata map plus the ordered list of resolved
    /// child usage ids.
    pub fn parse_xml(element: &XmlElement, store: &mut dyn ContentStore) -> BlockDefinition {
        layout::parse_children(element, store)
    }

    /// Render the children for authoring with explicit capability flags
    pub fn render_children(
        &self,
        store: &dyn ContentStore,
        context: &RenderContext,
        can_reorder: bool,
        can_add: bool,
    ) -> Result<Fragment, BlockError> {
        layout::render_children(&self.node, store, context, can_reorder, can_add)
    }
}

impl ContentBlock for VerticalBlock {
    fn usage_id(&self) -> &str {
        &self.node.usage_id
    }

    fn block_type(&self) -> &str {
        &self.node.block_type
    }

    fn render(
        &self,
        view: ViewKind,
        store: &dyn ContentStore,
        context: &RenderContext,
    ) -> Result<Fragment, BlockError> {
        match view {
            ViewKind::Student => layout::student_view(&self.node, STUDENT_VIEW_TEMPLATE, store, context),
            ViewKind::Author => layout::author_view(&self.node, store, context),
        }
    }

    fn progress(&self, store: &dyn ContentStore) -> Result<Option<Progress>, BlockError> {
        layout::aggregate_progress(&self.node, store)
    }

    fn icon_class(&self, store: &dyn ContentStore) -> Result<String, BlockError> {
        layout::resolve_icon_class(&self.node, store)
    }

    fn non_editable_fields(&self) -> Vec<&'static str> {
        let mut non_editable_fields = BASE_NON_EDITABLE_FIELDS.to_vec();
        non_editable_fields.push("due");
        non_editable_fields
    }

    fn to_xml(&self, store: &dyn ContentStore) -> Result<XmlElement, BlockError> {
        layout::definition_to_xml(&self.node, VERTICAL_BLOCK_TYPE, store)
    }
}

/// Builder for creating new VerticalBlock instances
#[derive(Default)]
pub struct VerticalBlockBuilder {
    usage_id: Option<String>,
    display_name: Option<String>,
    due: Option<DateTime<Utc>>,
    children: Vec<String>,
}

impl VerticalBlockBuilder {
    /// Set an explicit usage id (defaults to a generated UUID)
    pub fn with_usage_id(mut self, usage_id: String) -> Self {
        self.usage_id = Some(usage_id);
        self
    }

    /// Set the display name
    pub fn with_display_name(mut self, display_name: String) -> Self {
        self.display_name = Some(display_name);
        self
    }

    /// Set the scheduling deadline
    pub fn with_due(mut self, due: DateTime<Utc>) -> Self {
        self.due = Some(due);
        self
    }

    /// Append one child usage id
    pub fn with_child(mut self, usage_id: String) -> Self {
        self.children.push(usage_id);
        self
    }

    /// Append several child usage ids
    pub fn with_children(mut self, children: Vec<String>) -> Self {
        self.children.extend(children);
        self
    }

    /// Build the VerticalBlock
    pub fn build(self) -> VerticalBlock {
        let mut node = match self.usage_id {
            Some(usage_id) => CourseNode::new_with_id(
                usage_id,
                VERTICAL_BLOCK_TYPE.to_string(),
                String::new(),
                json!({}),
            ),
            None => CourseNode::new(VERTICAL_BLOCK_TYPE.to_string(), String::new(), json!({})),
        };
        if let Some(display_name) = self.display_name {
            node = node.with_display_name(display_name);
        }
        if let Some(due) = self.due {
            node = node.with_due(due);
        }
        node = node.with_children(self.children);

        VerticalBlock { node }
    }
}
