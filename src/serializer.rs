//! Block tree serialization
//!
//! The inverse of parsing: walks a block tree and reconstructs document
//! text. Delimiters are emitted canonically (single spaces, compact JSON
//! attributes in stored key order), so `serialize(parse(d)) == d` holds
//! byte-for-byte for canonically delimited documents, and
//! `parse(serialize(t))` restores `t` for any tree `t` that `parse` can
//! produce.

use crate::ast::{Block, Chunk};
use crate::error::SerializeError;

/// Serialize a block sequence back into document text.
///
/// Fails only when the tree violates the structural contract: a
/// placeholder count disagreeing with the child count, or a freeform
/// block carrying children.
pub fn serialize(blocks: &[Block]) -> Result<String, SerializeError> {
    let mut out = String::new();
    for block in blocks {
        write_block(&mut out, block)?;
    }
    Ok(out)
}

fn write_block(out: &mut String, block: &Block) -> Result<(), SerializeError> {
    let name = match &block.block_name {
        None => {
            if !block.inner_blocks.is_empty() {
                return Err(SerializeError::FreeformWithChildren {
                    inner_blocks: block.inner_blocks.len(),
                });
            }
            out.push_str(&block.inner_html);
            return Ok(());
        }
        Some(name) => name,
    };

    let placeholders = block.placeholder_count();
    if placeholders != block.inner_blocks.len() {
        return Err(SerializeError::PlaceholderMismatch {
            block_name: block.block_name.clone(),
            placeholders,
            inner_blocks: block.inner_blocks.len(),
        });
    }

    out.push_str("<!-- ");
    out.push_str(name);
    if !block.attrs.is_empty() {
        out.push(' ');
        // Encoding a JSON object map cannot fail.
        let attrs = serde_json::to_string(&block.attrs).expect("attrs map encodes as JSON");
        out.push_str(&attrs);
    }

    if block.is_void() {
        out.push_str(" /-->");
        return Ok(());
    }
    out.push_str(" -->");

    let mut children = block.inner_blocks.iter();
    for chunk in &block.inner_content {
        match chunk {
            Chunk::Html(html) => out.push_str(html),
            // The count check above guarantees the iterator yields.
            Chunk::Child => {
                if let Some(child) = children.next() {
                    write_block(out, child)?;
                }
            }
        }
    }

    out.push_str("<!-- /");
    out.push_str(name);
    out.push_str(" -->");
    Ok(())
}
