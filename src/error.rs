//! Error types for serialization
//!
//! Parsing is total and surfaces no errors; only [`serialize`] can fail,
//! and only when handed a tree that violates the structural contract of
//! the data model. That is a programmer error, not a data-quality
//! condition, so it gets its own type.
//!
//! [`serialize`]: crate::serialize

use std::fmt;

/// A block tree violated the structural contract of the data model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SerializeError {
    /// The number of child placeholders in `inner_content` disagrees with
    /// the number of `inner_blocks`.
    PlaceholderMismatch {
        block_name: Option<String>,
        placeholders: usize,
        inner_blocks: usize,
    },
    /// A freeform block cannot carry nested blocks.
    FreeformWithChildren { inner_blocks: usize },
}

impl fmt::Display for SerializeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerializeError::PlaceholderMismatch {
                block_name,
                placeholders,
                inner_blocks,
            } => {
                let name = block_name.as_deref().unwrap_or("<freeform>");
                write!(
                    f,
                    "block {}: {} child placeholders but {} inner blocks",
                    name, placeholders, inner_blocks
                )
            }
            SerializeError::FreeformWithChildren { inner_blocks } => {
                write!(f, "freeform block carries {} inner blocks", inner_blocks)
            }
        }
    }
}

impl std::error::Error for SerializeError {}
