//! Content Blocks
//!
//! This module provides the pluggable block system and the layout blocks
//! built on it:
//!
//! - `ContentBlock` trait - Render, progress, icon, and serialization hooks
//! - `VerticalBlock` - Lays out its children vertically for student display
//!   and for authoring display
//! - `WrapperBlock` - Same contract, without visual separators between
//!   sibling outputs

pub mod content_block;
mod layout;
pub mod vertical;
pub mod wrapper;


pub use content_block::{
    BlockDefinition, BlockError, ContentBlock, ViewKind, BASE_NON_EDITABLE_FIELDS, CLASS_PRIORITY,
    ICON_OTHER, ICON_PROBLEM, ICON_VIDEO,
};
pub use vertical::{VerticalBlock, VerticalBlockBuilder, VERTICAL_BLOCK_TYPE};
pub use wrapper::{WrapperBlock, WrapperBlockBuilder, WRAPPER_BLOCK_TYPE};
