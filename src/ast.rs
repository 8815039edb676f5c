//! Block tree data model
//!
//! A parsed document is an ordered sequence of [`Block`] nodes. Each block
//! exclusively owns its subtree and string buffers; everything is built in a
//! single pass and never mutated afterwards.
//!
//! The serde field names (`blockName`, `innerHTML`, `innerContent`, ...)
//! follow the wire shape of the block markup format so trees can be marshaled
//! across a host boundary unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One entry of a block's `inner_content`.
///
/// `inner_content` interleaves verbatim markup runs with placeholders, one
/// placeholder per nested block. Replacing each placeholder with the
/// serialization of the corresponding `inner_blocks` entry reconstructs the
/// block's `inner_html`. On the wire a placeholder is `null`, a run is its
/// string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Chunk {
    /// A verbatim run of markup between nested blocks.
    Html(String),
    /// Stand-in for the next entry of `inner_blocks`.
    Child,
}

impl Chunk {
    pub fn is_child(&self) -> bool {
        matches!(self, Chunk::Child)
    }
}

/// A node in the parsed block tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Block identifier such as `"wp:columns"`; `None` for freeform blocks
    /// carrying raw passthrough markup.
    pub block_name: Option<String>,
    /// Decoded JSON attributes in document key order. Empty when the
    /// delimiter carried no payload or the payload failed to decode.
    pub attrs: Map<String, Value>,
    /// Nested blocks in document order. Empty for void and freeform blocks.
    pub inner_blocks: Vec<Block>,
    /// Full raw markup belonging to this block, nested block markers
    /// included verbatim.
    #[serde(rename = "innerHTML")]
    pub inner_html: String,
    /// Markup runs interleaved with one placeholder per nested block.
    pub inner_content: Vec<Chunk>,
}

impl Block {
    /// A freeform block: unnamed raw markup between recognized blocks.
    pub fn freeform(html: impl Into<String>) -> Self {
        Block {
            block_name: None,
            attrs: Map::new(),
            inner_blocks: Vec::new(),
            inner_html: html.into(),
            inner_content: Vec::new(),
        }
    }

    /// A void (self-closing) block: named, childless, no inner markup.
    pub fn void(name: impl Into<String>, attrs: Map<String, Value>) -> Self {
        Block {
            block_name: Some(name.into()),
            attrs,
            inner_blocks: Vec::new(),
            inner_html: String::new(),
            inner_content: Vec::new(),
        }
    }

    pub fn is_freeform(&self) -> bool {
        self.block_name.is_none()
    }

    /// True for named blocks with no children and no inner content, i.e.
    /// blocks that serialize to the self-closing `/-->` form.
    pub fn is_void(&self) -> bool {
        self.block_name.is_some() && self.inner_blocks.is_empty() && self.inner_content.is_empty()
    }

    /// Number of child placeholders in `inner_content`. Equals
    /// `inner_blocks.len()` for every tree produced by `parse`.
    pub fn placeholder_count(&self) -> usize {
        self.inner_content.iter().filter(|c| c.is_child()).count()
    }
}
