//! Text-splice primitive for source edits.
//!
//! The core component is `ByteRangeRewriter`, which applies a batch of
//! byte-range edits atomically: either every edit lands or the source is
//! returned untouched together with a `RewriteError`.

mod rewriter;

pub use rewriter::{ByteRangeRewriter, Edit, RewriteError};
