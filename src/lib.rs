//! # blockmark
//!
//! A parser and serializer for comment-delimited block markup.
//!
//! Documents are ordinary HTML-like text annotated with paired marker
//! comments:
//!
//! ```text
//! <!-- wp:columns {"columns":3} -->
//! <div class="wp-block-columns">...</div>
//! <!-- /wp:columns -->
//! ```
//!
//! plus the self-closing form `<!-- wp:image {"src":"url"} /-->`. Parsing
//! produces an ordered sequence of [`Block`] nodes; text outside recognized
//! markers survives verbatim as freeform blocks, so `parse` is total: it
//! never fails and never panics, no matter how malformed the input is.
//! [`serialize`] is the inverse operation and reconstructs the document
//! byte-for-byte for canonically delimited markup.

mod ast;
mod attrs;
mod error;
mod parser;
mod scanner;
mod serializer;

pub use ast::{Block, Chunk};
pub use error::SerializeError;
pub use parser::{parse, parse_with_options, ParseOptions, DEFAULT_MAX_DEPTH};
pub use serializer::serialize;
