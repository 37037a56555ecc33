//! WrapperBlock - Layout Variant
//!
//! Same as vertical, but without visual separators between children: the
//! only behavioral difference is the student-view template.

use crate::blocks::content_block::{
    BlockDefinition, BlockError, ContentBlock, ViewKind, BASE_NON_EDITABLE_FIELDS,
};
use crate::blocks::layout;
use crate::models::{CourseNode, Fragment, Progress, ValidationError};
use crate::runtime::{ContentStore, RenderContext};
use crate::xml::XmlElement;
use chrono::{DateTime, Utc};
use serde_json::json;

/// Block type identifier for wrapper layout blocks
pub const WRAPPER_BLOCK_TYPE: &str = "wrapper";

/// Student-view template for wrapper layout blocks (no separators)
const STUDENT_VIEW_TEMPLATE: &str = "wrapper-student-view";

/// Layout block that renders its children without separators.
pub struct WrapperBlock {
    node: CourseNode,
}

impl WrapperBlock {
    /// Create a WrapperBlock from an existing CourseNode
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidBlockType` if the node type is not
    /// `"wrapper"`.
    pub fn from_node(node: CourseNode) -> Result<Self, ValidationError> {
        if node.block_type != WRAPPER_BLOCK_TYPE {
            return Err(ValidationError::InvalidBlockType(format!(
                "Expected '{}', got '{}'",
                WRAPPER_BLOCK_TYPE, node.block_type
            )));
        }
        Ok(Self { node })
    }

    /// Create a builder for a new WrapperBlock
    pub fn builder() -> WrapperBlockBuilder {
        WrapperBlockBuilder::default()
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
    /// Identical contract to [`crate::blocks::VerticalBlock::parse_xml`].
    pub fn parse_xml(element: &XmlElement, store: &mut dyn ContentStore) -> BlockDefinition {
        layout::parse_children(element, store)
    }
}

impl ContentBlock for WrapperBlock {
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
        layout::definition_to_xml(&self.node, WRAPPER_BLOCK_TYPE, store)
    }
}

/// Builder for creating new WrapperBlock instances
#[derive(Default)]
pub struct WrapperBlockBuilder {
    usage_id: Option<String>,
    display_name: Option<String>,
    due: Option<DateTime<Utc>>,
    children: Vec<String>,
}

impl WrapperBlockBuilder {
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

    /// Build the WrapperBlock
    pub fn build(self) -> WrapperBlock {
        let mut node = match self.usage_id {
            Some(usage_id) => CourseNode::new_with_id(
                usage_id,
                WRAPPER_BLOCK_TYPE.to_string(),
                String::new(),
                json!({}),
            ),
            None => CourseNode::new(WRAPPER_BLOCK_TYPE.to_string(), String::new(), json!({})),
        };
        if let Some(display_name) = self.display_name {
            node = node.with_display_name(display_name);
        }
        if let Some(due) = self.due {
            node = node.with_due(due);
        }
        node = node.with_children(self.children);

        WrapperBlock { node }
    }
}
