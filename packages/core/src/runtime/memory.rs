//! In-Memory Content Store
//!
//! Reference `ContentStore` implementation backing the test suite and
//! small embedders: registered blocks in a map, XML materialization for
//! imports, an error log standing in for an external error tracker, and
//! built-in renderings of the three layout templates.
//!
//! # XML materialization
//!
//! - the element tag becomes the block type; `vertical` and `wrapper`
//!   recurse through the layout parser, everything else becomes a
//!   [`GenericBlock`] leaf
//! - `url_name` becomes the usage id (a UUID is generated when absent);
//!   duplicate usage ids are rejected
//! - `display_name` and `due` (RFC 3339) are lifted onto the node; an
//!   unparseable `due` fails that element
//! - remaining scalar attributes land in the node's `fields` bag, and the
//!   element's immediate text becomes its `content`

use crate::blocks::{
    BlockError, ContentBlock, VerticalBlock, ViewKind, WrapperBlock, ICON_OTHER, ICON_PROBLEM,
    ICON_VIDEO, VERTICAL_BLOCK_TYPE, WRAPPER_BLOCK_TYPE,
};
use crate::models::{CourseNode, Fragment, Progress};
use crate::runtime::{ContentStore, RenderContext};
use crate::xml::{XmlElement, XmlNode};
use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, Utc};
use quick_xml::escape::escape;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// In-memory content store.
///
/// # Examples
///
/// ```rust
/// use courseblock_core::runtime::{ContentStore, InMemoryStore};
///
/// let mut store = InMemoryStore::new();
/// let usage_id = store
///     .process_xml_fragment(r#"<video url_name="v-1">Intro</video>"#)
///     .unwrap();
///
/// assert_eq!(usage_id, "v-1");
/// assert!(store.block("v-1").is_ok());
/// ```
#[derive(Default)]
pub struct InMemoryStore {
    blocks: HashMap<String, Arc<dyn ContentBlock>>,
    errors: RefCell<Vec<String>>,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a block instance under its usage id
    ///
    /// # Errors
    ///
    /// Returns an error if the usage id is already registered.
    pub fn register_block(&mut self, block: Arc<dyn ContentBlock>) -> Result<()> {
        let usage_id = block.usage_id().to_string();
        if self.blocks.contains_key(&usage_id) {
            bail!("duplicate usage id: {usage_id}");
        }
        self.blocks.insert(usage_id, block);
        Ok(())
    }

    /// Register a leaf node as a [`GenericBlock`], returning its usage id
    ///
    /// # Errors
    ///
    /// Returns an error if the usage id is already registered or the node
    /// fails validation.
    pub fn insert_node(&mut self, node: CourseNode) -> Result<String> {
        node.validate()?;
        let usage_id = node.usage_id.clone();
        self.register_block(Arc::new(GenericBlock::new(node)))?;
        Ok(usage_id)
    }

    /// Whether a usage id is registered
    pub fn contains(&self, usage_id: &str) -> bool {
        self.blocks.contains_key(usage_id)
    }

    /// Messages reported through the error-tracker hook, oldest first
    pub fn error_log(&self) -> Vec<String> {
        self.errors.borrow().clone()
    }

    fn materialize(&mut self, element: &XmlElement) -> Result<String> {
        let block_type = element.name.clone();

        let mut display_name = None;
        let mut due = None;
        let mut usage_id = None;
        let mut fields = serde_json::Map::new();
        for (name, value) in &element.attributes {
            match name.as_str() {
                "url_name" => usage_id = Some(value.clone()),
                "display_name" => display_name = Some(value.clone()),
                "due" => {
                    let parsed = DateTime::parse_from_rfc3339(value)
                        .with_context(|| format!("invalid due date '{value}'"))?;
                    due = Some(parsed.with_timezone(&Utc));
                }
                _ => {
                    fields.insert(name.clone(), Value::String(value.clone()));
                }
            }
        }

        let usage_id = usage_id.unwrap_or_else(|| Uuid::new_v4().to_string());
        if self.blocks.contains_key(&usage_id) {
            bail!("duplicate usage id: {usage_id}");
        }

        let mut node = CourseNode::new_with_id(
            usage_id.clone(),
            block_type.clone(),
            element.text_content(),
            Value::Object(fields),
        );
        if let Some(display_name) = display_name {
            node = node.with_display_name(display_name);
        }
        if let Some(due) = due {
            node = node.with_due(due);
        }

        let block: Arc<dyn ContentBlock> = match block_type.as_str() {
            VERTICAL_BLOCK_TYPE => {
                let definition = VerticalBlock::parse_xml(element, self);
                node = node.with_children(definition.children);
                node.validate()?;
                Arc::new(VerticalBlock::from_node(node)?)
            }
            WRAPPER_BLOCK_TYPE => {
                let definition = WrapperBlock::parse_xml(element, self);
                node = node.with_children(definition.children);
                node.validate()?;
                Arc::new(WrapperBlock::from_node(node)?)
            }
            _ => {
                node.validate()?;
                Arc::new(GenericBlock::new(node))
            }
        };

        // The recursive parse above may have registered children; the
        // container id itself was reserved before recursing.
        if self.blocks.contains_key(&usage_id) {
            bail!("duplicate usage id: {usage_id}");
        }
        self.blocks.insert(usage_id.clone(), block);
        Ok(usage_id)
    }

    fn render_items(data: &Value) -> Vec<(String, String)> {
        data.get("items")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .map(|item| {
                        (
                            item.get("id")
                                .and_then(Value::as_str)
                                .unwrap_or_default()
                                .to_string(),
                            item.get("content")
                                .and_then(Value::as_str)
                                .unwrap_or_default()
                                .to_string(),
                        )
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl ContentStore for InMemoryStore {
    fn block(&self, usage_id: &str) -> Result<Arc<dyn ContentBlock>> {
        self.blocks
            .get(usage_id)
            .cloned()
            .ok_or_else(|| anyhow!("block not found: {usage_id}"))
    }

    fn process_xml_fragment(&mut self, xml: &str) -> Result<String> {
        let element = XmlElement::parse(xml)?;
        self.materialize(&element)
    }

    fn render_template(&self, template: &str, data: &Value) -> Result<String> {
        let items = Self::render_items(data);
        match template {
            "vertical-student-view" => {
                let mut out = String::from("<div class=\"vertical\">");
                for (id, content) in &items {
                    out.push_str(&format!(
                        "<div class=\"vert\" data-id=\"{}\">{}</div>",
                        escape(id.as_str()),
                        content
                    ));
                }
                out.push_str("</div>");
                Ok(out)
            }
            "wrapper-student-view" => {
                let mut out = String::from("<div class=\"wrapper\">");
                for (_, content) in &items {
                    out.push_str(content);
                }
                out.push_str("</div>");
                Ok(out)
            }
            "studio-children-view" => {
                let can_reorder = data
                    .get("canReorder")
                    .and_then(Value::as_bool)
                    .unwrap_or(false);
                let can_add = data.get("canAdd").and_then(Value::as_bool).unwrap_or(false);

                let mut out = format!(
                    "<ol class=\"studio-children\" data-can-reorder=\"{can_reorder}\" data-can-add=\"{can_add}\">"
                );
                for (id, content) in &items {
                    out.push_str(&format!(
                        "<li class=\"studio-child\" data-id=\"{}\">{}</li>",
                        escape(id.as_str()),
                        content
                    ));
                }
                out.push_str("</ol>");
                Ok(out)
            }
            _ => bail!("unknown template: {template}"),
        }
    }

    fn append_child_element(&self, usage_id: &str, parent: &mut XmlElement) -> Result<()> {
        let block = self.block(usage_id)?;
        let element = block.to_xml(self)?;
        parent.children.push(XmlNode::Element(element));
        Ok(())
    }

    fn report_error(&self, message: &str) {
        self.errors.borrow_mut().push(message.to_string());
    }
}

/// Generic leaf block: renders its content in an escaped div, contributes
/// one css resource per block type, derives its icon classification from
/// the block type, and reads optional progress from
/// `fields.progress = {done, total}`.
pub struct GenericBlock {
    node: CourseNode,
}

impl GenericBlock {
    /// Wrap a CourseNode as a generic leaf block
    pub fn new(node: CourseNode) -> Self {
        Self { node }
    }

    /// Get a reference to the underlying CourseNode
    pub fn as_node(&self) -> &CourseNode {
        &self.node
    }
}

impl ContentBlock for GenericBlock {
    fn usage_id(&self) -> &str {
        &self.node.usage_id
    }

    fn block_type(&self) -> &str {
        &self.node.block_type
    }

    fn render(
        &self,
        _view: ViewKind,
        _store: &dyn ContentStore,
        _context: &RenderContext,
    ) -> Result<Fragment, BlockError> {
        let mut fragment = Fragment::from_content(format!(
            "<div class=\"xblock xblock-{}\" data-usage-id=\"{}\">{}</div>",
            escape(self.node.block_type.as_str()),
            escape(self.node.usage_id.as_str()),
            escape(self.node.content.as_str()),
        ));
        fragment.add_css(format!(".xblock-{} {{}}", self.node.block_type));
        Ok(fragment)
    }

    fn progress(&self, _store: &dyn ContentStore) -> Result<Option<Progress>, BlockError> {
        let Some(progress) = self.node.fields.get("progress") else {
            return Ok(None);
        };
        let done = progress.get("done").and_then(Value::as_u64);
        let total = progress.get("total").and_then(Value::as_u64);
        match (done, total) {
            (Some(done), Some(total)) => Ok(Some(Progress::new(done as u32, total as u32)?)),
            _ => Ok(None),
        }
    }

    fn icon_class(&self, _store: &dyn ContentStore) -> Result<String, BlockError> {
        let icon = match self.node.block_type.as_str() {
            "video" => ICON_VIDEO,
            "problem" => ICON_PROBLEM,
            _ => ICON_OTHER,
        };
        Ok(icon.to_string())
    }

    fn to_xml(&self, _store: &dyn ContentStore) -> Result<XmlElement, BlockError> {
        let mut element = XmlElement::new(self.node.block_type.clone());
        element.set_attribute("url_name", self.node.usage_id.as_str());
        if let Some(display_name) = &self.node.display_name {
            element.set_attribute("display_name", display_name.as_str());
        }
        if let Some(due) = &self.node.due {
            element.set_attribute("due", due.to_rfc3339());
        }
        if let Some(fields) = self.node.fields.as_object() {
            for (name, value) in fields {
                match value {
                    Value::String(text) => element.set_attribute(name.as_str(), text.as_str()),
                    Value::Bool(_) | Value::Number(_) => {
                        element.set_attribute(name.as_str(), value.to_string())
                    }
                    _ => {
                        tracing::debug!(field = %name, "skipping non-scalar field on XML export");
                    }
                }
            }
        }
        if !self.node.content.is_empty() {
            element
                .children
                .push(XmlNode::Text(self.node.content.clone()));
        }
        Ok(element)
    }
}
