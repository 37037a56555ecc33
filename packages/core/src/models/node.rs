//! Course Node Data Structures
//!
//! This module defines the core `CourseNode` struct and related types for
//! Courseblock's universal node system.
//!
//! # Architecture
//!
//! - **Universal Node**: Single struct represents all content types
//! - **Attribute Bag**: Type-specific metadata lives in the `fields` value
//! - **Ordered Children**: The parent's `children` array owns the rendering
//!   order; the children themselves live in the owning content store
//!
//! # Examples
//!
//! ```rust
//! use courseblock_core::models::CourseNode;
//! use serde_json::json;
//!
//! // Create a leaf video node
//! let video = CourseNode::new(
//!     "video".to_string(),
//!     "Welcome to the course".to_string(),
//!     json!({}),
//! );
//!
//! // Create a layout node with two children
//! let unit = CourseNode::new_with_id(
//!     "unit-1".to_string(),
//!     "vertical".to_string(),
//!     String::new(),
//!     json!({}),
//! )
//! .with_display_name("Unit 1".to_string())
//! .with_children(vec![video.usage_id.clone(), "prob-1".to_string()]);
//!
//! assert_eq!(unit.children.len(), 2);
//! ```

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::OnceLock;
use thiserror::Error;
use uuid::Uuid;

/// Default fields value for serde deserialization (empty object)
fn default_fields() -> Value {
    Value::Object(serde_json::Map::new())
}

/// Validation errors for CourseNode operations
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid block type: {0}")]
    InvalidBlockType(String),

    #[error("Invalid usage id: {0}")]
    InvalidUsageId(String),

    #[error("Invalid child reference: {0}")]
    InvalidChild(String),

    #[error("Duplicate child reference: {0}")]
    DuplicateChild(String),

    #[error("Unknown child reference: {0}")]
    UnknownChild(String),

    #[error("Fields validation failed: {0}")]
    InvalidFields(String),
}

// Regex pattern for usage id validation: opaque slug-or-uuid style ids,
// no whitespace, no path separators.
const USAGE_ID_PATTERN: &str = r"^[A-Za-z0-9][A-Za-z0-9._:-]*$";

/// Validate if a usage id is well formed
///
/// Usage ids are opaque, but they must be single non-empty tokens so they
/// survive round trips through XML attributes and template data.
///
/// # Examples
///
/// ```
/// # use courseblock_core::models::is_valid_usage_id;
/// assert!(is_valid_usage_id("550e8400-e29b-41d4-a716-446655440000")); // UUID
/// assert!(is_valid_usage_id("unit-1")); // slug
/// assert!(!is_valid_usage_id("has whitespace"));
/// assert!(!is_valid_usage_id(""));
/// ```
pub fn is_valid_usage_id(usage_id: &str) -> bool {
    static USAGE_ID_REGEX: OnceLock<Regex> = OnceLock::new();
    let usage_id_regex = USAGE_ID_REGEX.get_or_init(|| Regex::new(USAGE_ID_PATTERN).unwrap());
    usage_id_regex.is_match(usage_id)
}

/// Universal node structure for all content types in Courseblock.
///
/// # Fields
///
/// - `usage_id`: Stable opaque identifier (UUID for generated nodes, or an
///   authored slug carried through the `url_name` XML attribute)
/// - `block_type`: Type identifier (e.g., "vertical", "wrapper", "video",
///   "problem", "html")
/// - `display_name`: Optional human-readable title
/// - `due`: Optional scheduling deadline; forced non-editable on layout
///   blocks
/// - `content`: Primary text payload (leaf blocks; empty for layouts)
/// - `children`: Ordered child usage ids. The order here IS the rendering
///   order; children are resolved through the owning content store
/// - `fields`: Remaining metadata as a JSON object (attribute bag)
///
/// # Examples
///
/// ```rust
/// # use courseblock_core::models::CourseNode;
/// # use serde_json::json;
/// let problem = CourseNode::new(
///     "problem".to_string(),
///     "What is 2 + 2?".to_string(),
///     json!({ "weight": "1.0" }),
/// );
/// assert!(problem.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseNode {
    /// Stable opaque identifier
    pub usage_id: String,

    /// Block type (e.g., "vertical", "wrapper", "video", "problem")
    pub block_type: String,

    /// Human-readable title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Scheduling deadline
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<DateTime<Utc>>,

    /// Primary text payload
    #[serde(default)]
    pub content: String,

    /// Ordered child usage ids (rendering order)
    #[serde(default)]
    pub children: Vec<String>,

    /// Remaining metadata (attribute bag)
    #[serde(default = "default_fields")]
    pub fields: Value,
}

impl CourseNode {
    /// Create a new CourseNode with an auto-generated UUID usage id
    ///
    /// # Arguments
    ///
    /// * `block_type` - Type identifier (e.g., "video", "vertical")
    /// * `content` - Primary text payload
    /// * `fields` - JSON object with remaining metadata
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use courseblock_core::models::CourseNode;
    /// # use serde_json::json;
    /// let node = CourseNode::new("html".to_string(), "<p>Hi</p>".to_string(), json!({}));
    /// assert!(!node.usage_id.is_empty());
    /// ```
    pub fn new(block_type: String, content: String, fields: Value) -> Self {
        let usage_id = Uuid::new_v4().to_string();

        Self {
            usage_id,
            block_type,
            display_name: None,
            due: None,
            content,
            children: Vec::new(),
            fields,
        }
    }

    /// Create a new CourseNode with an explicit usage id
    ///
    /// Used when the id was authored externally (e.g., the `url_name`
    /// attribute of an imported XML element).
    pub fn new_with_id(
        usage_id: String,
        block_type: String,
        content: String,
        fields: Value,
    ) -> Self {
        Self {
            usage_id,
            block_type,
            display_name: None,
            due: None,
            content,
            children: Vec::new(),
            fields,
        }
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

    /// Replace the ordered child list
    pub fn with_children(mut self, children: Vec<String>) -> Self {
        self.children = children;
        self
    }

    /// Validate node structure and required fields
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if:
    /// - `usage_id` is empty or not a well-formed token
    /// - `block_type` is empty
    /// - `fields` is not a JSON object
    /// - the node references itself as a child, or a child id repeats
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.usage_id.is_empty() {
            return Err(ValidationError::MissingField("usage_id".to_string()));
        }

        if !is_valid_usage_id(&self.usage_id) {
            return Err(ValidationError::InvalidUsageId(self.usage_id.clone()));
        }

        if self.block_type.is_empty() {
            return Err(ValidationError::MissingField("block_type".to_string()));
        }

        if !self.fields.is_object() {
            return Err(ValidationError::InvalidFields(
                "fields must be a JSON object".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for child in &self.children {
            if child == &self.usage_id {
                return Err(ValidationError::InvalidChild(
                    "node cannot be its own child".to_string(),
                ));
            }
            if !seen.insert(child.as_str()) {
                return Err(ValidationError::DuplicateChild(child.clone()));
            }
        }

        Ok(())
    }

    /// Append a child usage id to the end of the ordered list
    ///
    /// # Errors
    ///
    /// Rejects empty ids, self-references, and ids already present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use courseblock_core::models::CourseNode;
    /// # use serde_json::json;
    /// let mut unit = CourseNode::new("vertical".to_string(), String::new(), json!({}));
    /// unit.add_child("video-1".to_string()).unwrap();
    /// assert!(unit.add_child("video-1".to_string()).is_err());
    /// ```
    pub fn add_child(&mut self, usage_id: String) -> Result<(), ValidationError> {
        if usage_id.is_empty() {
            return Err(ValidationError::InvalidChild(
                "child usage id cannot be empty".to_string(),
            ));
        }
        if usage_id == self.usage_id {
            return Err(ValidationError::InvalidChild(
                "node cannot be its own child".to_string(),
            ));
        }
        if self.children.contains(&usage_id) {
            return Err(ValidationError::DuplicateChild(usage_id));
        }
        self.children.push(usage_id);
        Ok(())
    }

    /// Remove a child usage id from the ordered list
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::UnknownChild` if the id is not present.
    pub fn remove_child(&mut self, usage_id: &str) -> Result<(), ValidationError> {
        match self.children.iter().position(|child| child == usage_id) {
            Some(index) => {
                self.children.remove(index);
                Ok(())
            }
            None => Err(ValidationError::UnknownChild(usage_id.to_string())),
        }
    }

    /// Atomically replace the ordered child list with a permutation of itself
    ///
    /// # Errors
    ///
    /// The new order must contain exactly the current children, each once;
    /// otherwise the list is left untouched and an error is returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use courseblock_core::models::CourseNode;
    /// # use serde_json::json;
    /// let mut unit = CourseNode::new("vertical".to_string(), String::new(), json!({}))
    ///     .with_children(vec!["a".to_string(), "b".to_string()]);
    /// unit.reorder_children(vec!["b".to_string(), "a".to_string()]).unwrap();
    /// assert_eq!(unit.children, vec!["b".to_string(), "a".to_string()]);
    /// ```
    pub fn reorder_children(&mut self, new_order: Vec<String>) -> Result<(), ValidationError> {
        if new_order.len() != self.children.len() {
            return Err(ValidationError::InvalidChild(format!(
                "reorder must keep the same child set (got {} ids, have {})",
                new_order.len(),
                self.children.len()
            )));
        }

        {
            let mut seen = HashSet::new();
            for usage_id in &new_order {
                if !self.children.contains(usage_id) {
                    return Err(ValidationError::UnknownChild(usage_id.clone()));
                }
                if !seen.insert(usage_id.as_str()) {
                    return Err(ValidationError::DuplicateChild(usage_id.clone()));
                }
            }
        }

        self.children = new_order;
        Ok(())
    }

    /// Check if this node has children to lay out
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_node_creation() {
        let node = CourseNode::new("video".to_string(), "Intro".to_string(), json!({}));

        assert!(!node.usage_id.is_empty());
        assert_eq!(node.block_type, "video");
        assert_eq!(node.content, "Intro");
        assert!(node.children.is_empty());
        assert!(node.validate().is_ok());
    }

    #[test]
    fn test_node_with_explicit_id() {
        let node = CourseNode::new_with_id(
            "unit-1".to_string(),
            "vertical".to_string(),
            String::new(),
            json!({}),
        );

        assert_eq!(node.usage_id, "unit-1");
        assert!(node.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_malformed_usage_id() {
        let node = CourseNode::new_with_id(
            "has whitespace".to_string(),
            "video".to_string(),
            String::new(),
            json!({}),
        );

        assert!(matches!(
            node.validate(),
            Err(ValidationError::InvalidUsageId(_))
        ));
    }

    #[test]
    fn test_validation_rejects_empty_usage_id() {
        let node = CourseNode::new_with_id(
            String::new(),
            "video".to_string(),
            String::new(),
            json!({}),
        );

        assert!(matches!(
            node.validate(),
            Err(ValidationError::MissingField(_))
        ));
    }

    #[test]
    fn test_validation_rejects_non_object_fields() {
        let mut node = CourseNode::new("video".to_string(), String::new(), json!({}));
        node.fields = json!("not an object");

        assert!(matches!(
            node.validate(),
            Err(ValidationError::InvalidFields(_))
        ));
    }

    #[test]
    fn test_validation_rejects_self_child() {
        let mut node = CourseNode::new("vertical".to_string(), String::new(), json!({}));
        node.children.push(node.usage_id.clone());

        assert!(matches!(
            node.validate(),
            Err(ValidationError::InvalidChild(_))
        ));
    }

    #[test]
    fn test_validation_rejects_duplicate_children() {
        let node = CourseNode::new("vertical".to_string(), String::new(), json!({}))
            .with_children(vec!["a".to_string(), "a".to_string()]);

        assert!(matches!(
            node.validate(),
            Err(ValidationError::DuplicateChild(_))
        ));
    }

    #[test]
    fn test_add_child_appends_in_order() {
        let mut node = CourseNode::new("vertical".to_string(), String::new(), json!({}));
        assert!(!node.has_children());

        node.add_child("a".to_string()).unwrap();
        node.add_child("b".to_string()).unwrap();

        assert_eq!(node.children, vec!["a".to_string(), "b".to_string()]);
        assert!(node.has_children());
    }

    #[test]
    fn test_add_child_rejects_duplicate() {
        let mut node = CourseNode::new("vertical".to_string(), String::new(), json!({}));
        node.add_child("a".to_string()).unwrap();

        assert!(matches!(
            node.add_child("a".to_string()),
            Err(ValidationError::DuplicateChild(_))
        ));
        assert_eq!(node.children.len(), 1);
    }

    #[test]
    fn test_add_child_rejects_self_reference() {
        let mut node = CourseNode::new("vertical".to_string(), String::new(), json!({}));
        let own_id = node.usage_id.clone();

        assert!(matches!(
            node.add_child(own_id),
            Err(ValidationError::InvalidChild(_))
        ));
    }

    #[test]
    fn test_add_child_rejects_empty_id() {
        let mut node = CourseNode::new("vertical".to_string(), String::new(), json!({}));

        assert!(matches!(
            node.add_child(String::new()),
            Err(ValidationError::InvalidChild(_))
        ));
    }

    #[test]
    fn test_remove_child() {
        let mut node = CourseNode::new("vertical".to_string(), String::new(), json!({}))
            .with_children(vec!["a".to_string(), "b".to_string(), "c".to_string()]);

        node.remove_child("b").unwrap();
        assert_eq!(node.children, vec!["a".to_string(), "c".to_string()]);
    }

    #[test]
    fn test_remove_unknown_child() {
        let mut node = CourseNode::new("vertical".to_string(), String::new(), json!({}));

        assert!(matches!(
            node.remove_child("missing"),
            Err(ValidationError::UnknownChild(_))
        ));
    }

    #[test]
    fn test_reorder_children() {
        let mut node = CourseNode::new("vertical".to_string(), String::new(), json!({}))
            .with_children(vec!["a".to_string(), "b".to_string(), "c".to_string()]);

        node.reorder_children(vec!["c".to_string(), "a".to_string(), "b".to_string()])
            .unwrap();
        assert_eq!(
            node.children,
            vec!["c".to_string(), "a".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn test_reorder_rejects_different_set() {
        let mut node = CourseNode::new("vertical".to_string(), String::new(), json!({}))
            .with_children(vec!["a".to_string(), "b".to_string()]);

        let result = node.reorder_children(vec!["a".to_string(), "x".to_string()]);
        assert!(matches!(result, Err(ValidationError::UnknownChild(_))));
        // List left untouched on failure
        assert_eq!(node.children, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_reorder_rejects_wrong_length() {
        let mut node = CourseNode::new("vertical".to_string(), String::new(), json!({}))
            .with_children(vec!["a".to_string(), "b".to_string()]);

        assert!(node.reorder_children(vec!["a".to_string()]).is_err());
    }

    #[test]
    fn test_reorder_rejects_duplicates() {
        let mut node = CourseNode::new("vertical".to_string(), String::new(), json!({}))
            .with_children(vec!["a".to_string(), "b".to_string()]);

        let result = node.reorder_children(vec!["a".to_string(), "a".to_string()]);
        assert!(matches!(result, Err(ValidationError::DuplicateChild(_))));
    }

    #[test]
    fn test_node_serialization_round_trip() {
        let node = CourseNode::new_with_id(
            "unit-1".to_string(),
            "vertical".to_string(),
            String::new(),
            json!({ "graded": "true" }),
        )
        .with_display_name("Unit 1".to_string())
        .with_children(vec!["a".to_string(), "b".to_string()]);

        let encoded = serde_json::to_string(&node).unwrap();
        let decoded: CourseNode = serde_json::from_str(&encoded).unwrap();

        assert_eq!(node, decoded);
    }

    #[test]
    fn test_deserialization_defaults() {
        let decoded: CourseNode =
            serde_json::from_str(r#"{"usageId": "v-1", "blockType": "video"}"#).unwrap();

        assert_eq!(decoded.content, "");
        assert!(decoded.children.is_empty());
        assert!(decoded.fields.is_object());
    }
}
