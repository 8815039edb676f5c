//! Tree-building state machine
//!
//! A single linear scan over the document drives an explicit frame stack,
//! one frame per currently-open paired block. No language-level recursion
//! is used, so nesting depth is bounded only by the configurable cap and
//! never by the call stack.
//!
//! Recovery policies (all fixed, all covered by regression tests):
//! - a closer that does not name the top-of-stack block is literal text;
//!   the stack is untouched and the surrounding text run flows through it,
//! - openers still unclosed at end of input are finalized as if a matching
//!   closer appeared at the end of the document,
//! - an opener that would exceed the depth cap is literal text.
//!
//! Because every malformed delimiter degrades to raw content, `parse` is a
//! total function: any string input yields a block sequence.

use crate::ast::{Block, Chunk};
use crate::attrs;
use crate::scanner::{self, DelimiterKind};
use serde_json::{Map, Value};

/// Default cap on paired-block nesting depth.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Parser configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum number of simultaneously open paired blocks. Openers beyond
    /// the cap are kept as literal text, bounding memory on adversarial
    /// input.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Parse a document into its top-level block sequence.
///
/// Total over any string input: malformed markers degrade to literal text,
/// truncated documents are recovered, and no input panics.
pub fn parse(document: &str) -> Vec<Block> {
    parse_with_options(document, &ParseOptions::default())
}

/// [`parse`] with an explicit [`ParseOptions`].
pub fn parse_with_options(document: &str, options: &ParseOptions) -> Vec<Block> {
    let mut output: Vec<Block> = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();
    // Scan position, and the start of the pending top-level text run.
    let mut offset = 0;
    let mut text_start = 0;

    while let Some(delim) = scanner::scan(document, offset) {
        match delim.kind {
            DelimiterKind::Void => {
                let leaf = Block::void(delim.name, attrs::decode(delim.attrs_json));
                match stack.last_mut() {
                    Some(frame) => frame.absorb(document, leaf, delim.start, delim.end),
                    None => {
                        flush_freeform(document, &mut output, text_start, delim.start);
                        output.push(leaf);
                        text_start = delim.end;
                    }
                }
            }
            DelimiterKind::Opener => {
                if stack.len() >= options.max_depth {
                    // Depth cap reached: the opener stays literal text.
                    offset = delim.end;
                    continue;
                }
                if stack.is_empty() {
                    flush_freeform(document, &mut output, text_start, delim.start);
                }
                stack.push(Frame::open(
                    delim.name,
                    attrs::decode(delim.attrs_json),
                    delim.start,
                    delim.end,
                ));
            }
            DelimiterKind::Closer => {
                let closes_top = stack.last().is_some_and(|frame| frame.name == delim.name);
                if closes_top {
                    // Pop cannot fail: `closes_top` implies a non-empty stack.
                    if let Some(frame) = stack.pop() {
                        let opener_start = frame.opener_start;
                        let block = frame.finalize(document, delim.start);
                        match stack.last_mut() {
                            Some(parent) => {
                                parent.absorb(document, block, opener_start, delim.end)
                            }
                            None => {
                                output.push(block);
                                text_start = delim.end;
                            }
                        }
                    }
                }
                // A mismatched closer (or one with no open block at all) is
                // literal text: no pop, the pending run flows through it.
            }
        }
        offset = delim.end;
    }

    // End of input. Unclosed frames are finalized innermost-first as if a
    // matching closer appeared here.
    let had_open_frames = !stack.is_empty();
    while let Some(frame) = stack.pop() {
        let opener_start = frame.opener_start;
        let block = frame.finalize(document, document.len());
        match stack.last_mut() {
            Some(parent) => parent.absorb(document, block, opener_start, document.len()),
            None => output.push(block),
        }
    }
    if had_open_frames {
        text_start = document.len();
    }
    flush_freeform(document, &mut output, text_start, document.len());

    output
}

/// One currently-open paired block.
#[derive(Debug)]
struct Frame {
    name: String,
    attrs: Map<String, Value>,
    /// Byte offset of the opener's `<!--`.
    opener_start: usize,
    /// Byte offset one past the opener, where `inner_html` begins.
    content_start: usize,
    /// End of the last consumed child (or `content_start`); the pending
    /// text run is `document[prev_offset..]` up to the next event.
    prev_offset: usize,
    chunks: Vec<Chunk>,
    children: Vec<Block>,
}

impl Frame {
    fn open(name: String, attrs: Map<String, Value>, opener_start: usize, content_start: usize) -> Self {
        Frame {
            name,
            attrs,
            opener_start,
            content_start,
            prev_offset: content_start,
            chunks: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Record a completed child: the text run since the last event, a
    /// placeholder, and the child itself.
    fn absorb(&mut self, document: &str, child: Block, child_start: usize, child_end: usize) {
        let run = &document[self.prev_offset..child_start];
        if !run.is_empty() {
            self.chunks.push(Chunk::Html(run.to_string()));
        }
        self.chunks.push(Chunk::Child);
        self.children.push(child);
        self.prev_offset = child_end;
    }

    /// Close the frame at `end` (the closer's start, or end of input) and
    /// build its finished block.
    fn finalize(mut self, document: &str, end: usize) -> Block {
        let run = &document[self.prev_offset..end];
        if !run.is_empty() {
            self.chunks.push(Chunk::Html(run.to_string()));
        }
        if self.chunks.is_empty() && self.children.is_empty() {
            // An empty paired body keeps one empty run so the serializer
            // can tell `<!-- wp:a --><!-- /wp:a -->` from `<!-- wp:a /-->`.
            self.chunks.push(Chunk::Html(String::new()));
        }
        Block {
            block_name: Some(self.name),
            attrs: self.attrs,
            inner_blocks: self.children,
            inner_html: document[self.content_start..end].to_string(),
            inner_content: self.chunks,
        }
    }
}

/// Emit pending top-level text as a freeform block. Runs are only flushed
/// at structural events, so adjacent text (including literal mismatched
/// closers) always coalesces into a single freeform sibling.
fn flush_freeform(document: &str, output: &mut Vec<Block>, start: usize, end: usize) {
    if start < end {
        output.push(Block::freeform(&document[start..end]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_document() {
        assert_eq!(parse(""), vec![]);
    }

    #[test]
    fn test_plain_text_is_one_freeform_block() {
        let blocks = parse("dfgdddgd");
        assert_eq!(blocks, vec![Block::freeform("dfgdddgd")]);
    }

    #[test]
    fn test_void_block_with_attrs() {
        let blocks = parse(r#"<!-- wp:image {"src":"url"} /-->"#);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].block_name.as_deref(), Some("wp:image"));
        assert_eq!(blocks[0].attrs.get("src"), Some(&json!("url")));
        assert!(blocks[0].inner_blocks.is_empty());
        assert!(blocks[0].inner_content.is_empty());
    }

    #[test]
    fn test_paired_block_with_text_body() {
        let blocks = parse("<!-- wp:paragraph --><p>hi</p><!-- /wp:paragraph -->");
        assert_eq!(blocks.len(), 1);
        let block = &blocks[0];
        assert_eq!(block.block_name.as_deref(), Some("wp:paragraph"));
        assert_eq!(block.inner_html, "<p>hi</p>");
        assert_eq!(block.inner_content, vec![Chunk::Html("<p>hi</p>".to_string())]);
        assert!(block.inner_blocks.is_empty());
    }

    #[test]
    fn test_empty_paired_block_keeps_empty_run() {
        let blocks = parse("<!-- wp:group --><!-- /wp:group -->");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].inner_html, "");
        assert_eq!(blocks[0].inner_content, vec![Chunk::Html(String::new())]);
        assert!(!blocks[0].is_void());
    }

    #[test]
    fn test_nested_child_and_placeholder() {
        let doc = "<!-- wp:outer -->a<!-- wp:inner /-->b<!-- /wp:outer -->";
        let blocks = parse(doc);
        assert_eq!(blocks.len(), 1);
        let outer = &blocks[0];
        assert_eq!(outer.inner_html, "a<!-- wp:inner /-->b");
        assert_eq!(outer.inner_blocks.len(), 1);
        assert_eq!(outer.inner_blocks[0].block_name.as_deref(), Some("wp:inner"));
        assert_eq!(
            outer.inner_content,
            vec![
                Chunk::Html("a".to_string()),
                Chunk::Child,
                Chunk::Html("b".to_string()),
            ]
        );
    }

    #[test]
    fn test_text_around_blocks_becomes_freeform() {
        let blocks = parse("before<!-- wp:a /-->after");
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0], Block::freeform("before"));
        assert_eq!(blocks[1].block_name.as_deref(), Some("wp:a"));
        assert_eq!(blocks[2], Block::freeform("after"));
    }

    #[test]
    fn test_invalid_attrs_keeps_block() {
        let blocks = parse("<!-- wp:a {broken json} -->x<!-- /wp:a -->");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].block_name.as_deref(), Some("wp:a"));
        assert!(blocks[0].attrs.is_empty());
        assert_eq!(blocks[0].inner_html, "x");
    }

    #[test]
    fn test_mismatched_closer_is_literal_text() {
        let blocks = parse("<!-- wp:a -->text<!-- /wp:b --><!-- /wp:a -->");
        assert_eq!(blocks.len(), 1);
        let block = &blocks[0];
        assert_eq!(block.block_name.as_deref(), Some("wp:a"));
        assert_eq!(block.inner_html, "text<!-- /wp:b -->");
        assert_eq!(
            block.inner_content,
            vec![Chunk::Html("text<!-- /wp:b -->".to_string())]
        );
    }

    #[test]
    fn test_orphan_closer_coalesces_into_freeform() {
        let blocks = parse("text<!-- /wp:b -->more");
        assert_eq!(blocks, vec![Block::freeform("text<!-- /wp:b -->more")]);
    }

    #[test]
    fn test_unterminated_opener_finalized_at_end_of_input() {
        let blocks = parse("<!-- wp:a --><p>tail</p>");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].block_name.as_deref(), Some("wp:a"));
        assert_eq!(blocks[0].inner_html, "<p>tail</p>");
    }

    #[test]
    fn test_nested_unterminated_openers() {
        let blocks = parse("<!-- wp:a -->x<!-- wp:b -->y");
        assert_eq!(blocks.len(), 1);
        let outer = &blocks[0];
        assert_eq!(outer.block_name.as_deref(), Some("wp:a"));
        assert_eq!(outer.inner_html, "x<!-- wp:b -->y");
        assert_eq!(outer.inner_blocks.len(), 1);
        assert_eq!(outer.inner_blocks[0].block_name.as_deref(), Some("wp:b"));
        assert_eq!(outer.inner_blocks[0].inner_html, "y");
        assert_eq!(
            outer.inner_content,
            vec![Chunk::Html("x".to_string()), Chunk::Child]
        );
    }

    #[test]
    fn test_depth_cap_keeps_opener_literal() {
        let options = ParseOptions { max_depth: 1 };
        let doc = "<!-- wp:a --><!-- wp:b -->x<!-- /wp:b --><!-- /wp:a -->";
        let blocks = parse_with_options(doc, &options);
        assert_eq!(blocks.len(), 1);
        let outer = &blocks[0];
        assert_eq!(outer.block_name.as_deref(), Some("wp:a"));
        // The inner opener never opened, so its closer is mismatched too and
        // the whole span stays literal.
        assert!(outer.inner_blocks.is_empty());
        assert_eq!(outer.inner_html, "<!-- wp:b -->x<!-- /wp:b -->");
    }

    #[test]
    fn test_unrecognized_comments_pass_through() {
        let blocks = parse("<!-- wp:a --><!-- note --><!-- /wp:a -->");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].inner_html, "<!-- note -->");
    }

    #[test]
    fn test_placeholder_count_matches_children() {
        let doc = "<!-- wp:a --><!-- wp:b /--><!-- wp:c /--><!-- /wp:a -->";
        let blocks = parse(doc);
        assert_eq!(blocks[0].inner_blocks.len(), 2);
        assert_eq!(blocks[0].placeholder_count(), 2);
    }
}
