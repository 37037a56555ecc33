//! Layout Composition Internals
//!
//! Shared by `VerticalBlock` and `WrapperBlock`: the two differ only in
//! block type and student template, so the composition logic lives here
//! and takes the template name as a parameter.

use crate::blocks::content_block::{
    BlockDefinition, BlockError, ContentBlock, ViewKind, CLASS_PRIORITY, ICON_OTHER,
};
use crate::models::{CourseNode, Fragment, Progress};
use crate::runtime::{ContentStore, RenderContext};
use crate::xml::XmlElement;
use serde_json::json;
use std::collections::HashSet;

/// Template shared by both layout types for authoring views
pub(crate) const STUDIO_CHILDREN_TEMPLATE: &str = "studio-children-view";

/// Compose the student view: render each child in order, merge its
/// resources, and wrap the collected `{id, content}` pairs in the layout
/// template. Child render failures propagate.
pub(crate) fn student_view(
    node: &CourseNode,
    template: &str,
    store: &dyn ContentStore,
    context: &RenderContext,
) -> Result<Fragment, BlockError> {
    let mut fragment = Fragment::new();
    let mut items = Vec::new();

    let child_context = context.for_child();
    for child_id in &node.children {
        let child = store.block(child_id)?;
        let rendered = child.render(ViewKind::Student, store, &child_context)?;
        fragment.add_fragment_resources(&rendered);

        items.push(json!({
            "id": child_id,
            "content": rendered.content(),
        }));
    }

    // The template receives the original context, not the child context.
    let data = json!({
        "items": items,
        "context": context,
    });
    fragment.add_content(store.render_template(template, &data)?);
    Ok(fragment)
}

/// Compose the authoring view.
///
/// Drag-and-drop reordering and child addition are enabled when this node
/// is the authoring root, or when the surrounding page is not a unit page;
/// otherwise the children render without those affordances.
pub(crate) fn author_view(
    node: &CourseNode,
    store: &dyn ContentStore,
    context: &RenderContext,
) -> Result<Fragment, BlockError> {
    let is_root = context.root_usage_id.as_deref() == Some(node.usage_id.as_str());
    let editable = is_root || !context.is_unit_page;
    render_children(node, store, context, editable, editable)
}

/// Render the children for authoring with explicit capability flags.
pub(crate) fn render_children(
    node: &CourseNode,
    store: &dyn ContentStore,
    context: &RenderContext,
    can_reorder: bool,
    can_add: bool,
) -> Result<Fragment, BlockError> {
    let mut fragment = Fragment::new();
    let mut items = Vec::new();

    let child_context = context.for_child();
    for child_id in &node.children {
        let child = store.block(child_id)?;
        let rendered = child.render(ViewKind::Author, store, &child_context)?;
        fragment.add_fragment_resources(&rendered);

        items.push(json!({
            "id": child_id,
            "content": rendered.content(),
        }));
    }

    let data = json!({
        "items": items,
        "canReorder": can_reorder,
        "canAdd": can_add,
        "context": context,
    });
    fragment.add_content(store.render_template(STUDIO_CHILDREN_TEMPLATE, &data)?);
    Ok(fragment)
}

/// Fold child progress values with the additive combinator, seeded from
/// the identity. Children without progress contribute nothing.
pub(crate) fn aggregate_progress(
    node: &CourseNode,
    store: &dyn ContentStore,
) -> Result<Option<Progress>, BlockError> {
    let mut aggregate = None;
    for child_id in &node.children {
        let child = store.block(child_id)?;
        aggregate = Progress::add_counts(aggregate, child.progress(store)?);
    }
    Ok(aggregate)
}

/// Resolve the layout block's icon classification from the set of distinct
/// child classifications: the first `CLASS_PRIORITY` entry present wins,
/// otherwise the generic fallback.
pub(crate) fn resolve_icon_class(
    node: &CourseNode,
    store: &dyn ContentStore,
) -> Result<String, BlockError> {
    let mut child_classes = HashSet::new();
    for child_id in &node.children {
        let child = store.block(child_id)?;
        child_classes.insert(child.icon_class(store)?);
    }

    for higher_class in CLASS_PRIORITY {
        if child_classes.contains(*higher_class) {
            return Ok((*higher_class).to_string());
        }
    }
    Ok(ICON_OTHER.to_string())
}

/// Parse the immediate children of a layout element.
///
/// Each child element is re-serialized and handed to the content store's
/// generic XML processor. A failure for one child is logged, reported to
/// the store's error tracker, and skipped; parsing continues with the
/// remaining siblings. Never fatal.
pub(crate) fn parse_children(
    element: &XmlElement,
    store: &mut dyn ContentStore,
) -> BlockDefinition {
    let mut children = Vec::new();

    for child in element.child_elements() {
        match store.process_xml_fragment(&child.to_xml_string()) {
            Ok(usage_id) => children.push(usage_id),
            Err(error) => {
                tracing::error!(
                    tag = %child.name,
                    error = %error,
                    "unable to load child while parsing layout block; continuing"
                );
                store.report_error(&format!("ERROR: {error}"));
            }
        }
    }

    BlockDefinition {
        fields: serde_json::Map::new(),
        children,
    }
}

/// Build the layout container element and delegate each child, in order,
/// to the owning store for appending.
pub(crate) fn definition_to_xml(
    node: &CourseNode,
    tag: &str,
    store: &dyn ContentStore,
) -> Result<XmlElement, BlockError> {
    let mut element = XmlElement::new(tag);
    element.set_attribute("url_name", node.usage_id.as_str());
    if let Some(display_name) = &node.display_name {
        element.set_attribute("display_name", display_name.as_str());
    }
    if let Some(due) = &node.due {
        element.set_attribute("due", due.to_rfc3339());
    }

    for child_id in &node.children {
        store.append_child_element(child_id, &mut element)?;
    }
    Ok(element)
}
