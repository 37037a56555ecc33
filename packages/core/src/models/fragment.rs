//! Rendered Fragments
//!
//! A `Fragment` is the unit of rendered output: an HTML content string plus
//! the external resources (css, javascript) the content depends on. When a
//! layout block composes child renders it merges each child fragment's
//! resources into the combined output, deduplicating while preserving first
//! occurrence order.

use serde::{Deserialize, Serialize};

/// Kind of external resource a fragment depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Css,
    Javascript,
}

/// One external resource dependency
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resource {
    pub kind: ResourceKind,
    pub data: String,
}

/// Rendered content plus accumulated resource dependencies.
///
/// # Examples
///
/// ```rust
/// use courseblock_core::models::{Fragment, Resource, ResourceKind};
///
/// let mut fragment = Fragment::from_content("<p>hello</p>".to_string());
/// fragment.add_css(".xblock { margin: 0; }".to_string());
/// fragment.add_css(".xblock { margin: 0; }".to_string()); // deduplicated
///
/// assert_eq!(fragment.resources().len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    content: String,
    resources: Vec<Resource>,
}

impl Fragment {
    /// Create an empty fragment
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fragment from initial content
    pub fn from_content(content: String) -> Self {
        Self {
            content,
            resources: Vec::new(),
        }
    }

    /// The rendered content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// The accumulated resources, in first occurrence order
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    /// Append rendered content
    pub fn add_content(&mut self, content: String) {
        self.content.push_str(&content);
    }

    /// Add a resource dependency; duplicates are ignored
    pub fn add_resource(&mut self, resource: Resource) {
        if !self.resources.contains(&resource) {
            self.resources.push(resource);
        }
    }

    /// Add a css resource dependency
    pub fn add_css(&mut self, data: String) {
        self.add_resource(Resource {
            kind: ResourceKind::Css,
            data,
        });
    }

    /// Add a javascript resource dependency
    pub fn add_javascript(&mut self, data: String) {
        self.add_resource(Resource {
            kind: ResourceKind::Javascript,
            data,
        });
    }

    /// Merge another fragment's resources into this one (content untouched)
    pub fn add_fragment_resources(&mut self, other: &Fragment) {
        for resource in other.resources() {
            self.add_resource(resource.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_content() {
        let fragment = Fragment::from_content("<p>hi</p>".to_string());
        assert_eq!(fragment.content(), "<p>hi</p>");
        assert!(fragment.resources().is_empty());
    }

    #[test]
    fn test_add_content_appends() {
        let mut fragment = Fragment::new();
        fragment.add_content("<p>a</p>".to_string());
        fragment.add_content("<p>b</p>".to_string());
        assert_eq!(fragment.content(), "<p>a</p><p>b</p>");
    }

    #[test]
    fn test_add_resource_deduplicates() {
        let mut fragment = Fragment::new();
        fragment.add_css("a {}".to_string());
        fragment.add_css("a {}".to_string());
        fragment.add_javascript("a {}".to_string()); // same data, different kind

        assert_eq!(fragment.resources().len(), 2);
    }

    #[test]
    fn test_merge_preserves_order() {
        let mut first = Fragment::new();
        first.add_css("one".to_string());

        let mut second = Fragment::new();
        second.add_css("two".to_string());
        second.add_css("one".to_string());

        first.add_fragment_resources(&second);

        let data: Vec<&str> = first.resources().iter().map(|r| r.data.as_str()).collect();
        assert_eq!(data, vec!["one", "two"]);
    }

    #[test]
    fn test_merge_leaves_content_untouched() {
        let mut first = Fragment::from_content("parent".to_string());
        let second = Fragment::from_content("child".to_string());

        first.add_fragment_resources(&second);
        assert_eq!(first.content(), "parent");
    }
}
