//! Byte-range safe code rewriter.
//!
//! This module provides the text-splice primitive used by the removal pass:
//! deletions are collected against an owned copy of the source and applied in one
//! step, so a rejected batch never leaves a half-edited buffer behind.
//!
//! # Usage
//!
//! ```
//! use stmtdelta::fix::{ByteRangeRewriter, Edit};
//!
//! let source = "int x; int y;";
//! let mut rewriter = ByteRangeRewriter::new(source);
//! rewriter.add_edit(Edit::delete(0, 6));
//! let fixed = rewriter.apply().expect("should apply");
//! assert_eq!(fixed, " int y;");
//! ```

use thiserror::Error;

/// A byte range to delete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edit {
    /// Start byte offset (inclusive)
    pub start_byte: usize,
    /// End byte offset (exclusive)
    pub end_byte: usize,
}

impl Edit {
    /// Create a deletion edit
    #[must_use]
    pub const fn delete(start_byte: usize, end_byte: usize) -> Self {
        Self {
            start_byte,
            end_byte,
        }
    }

    /// Length of the range being deleted
    #[must_use]
    pub const fn range_len(&self) -> usize {
        self.end_byte.saturating_sub(self.start_byte)
    }
}

/// Error during rewriting
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RewriteError {
    /// Two edits touch the same bytes
    #[error("overlapping edits at indices {edit_a} and {edit_b}")]
    OverlappingEdits {
        /// Index of first overlapping edit
        edit_a: usize,
        /// Index of second overlapping edit
        edit_b: usize,
    },
    /// Edit range is out of bounds
    #[error("edit {edit_index} out of bounds: end_byte {end_byte} > source length {source_len}")]
    OutOfBounds {
        /// Index of the bad edit
        edit_index: usize,
        /// End byte of the edit
        end_byte: usize,
        /// Length of the source
        source_len: usize,
    },
    /// Edit ends before it starts
    #[error("edit {edit_index} has inverted range {start_byte}..{end_byte}")]
    InvertedRange {
        /// Index of the bad edit
        edit_index: usize,
        /// Start byte of the edit
        start_byte: usize,
        /// End byte of the edit
        end_byte: usize,
    },
    /// Edit boundary falls inside a multi-byte character
    #[error("edit {edit_index} splits a UTF-8 character at byte {offset}")]
    SplitsCharacter {
        /// Index of the bad edit
        edit_index: usize,
        /// Offending byte offset
        offset: usize,
    },
}

/// Safe code rewriter using byte ranges
///
/// Deletions are validated as a batch and then spliced in one forward pass
/// over the source.
#[derive(Debug, Clone)]
pub struct ByteRangeRewriter {
    /// Original source code
    source: String,
    /// Pending edits
    edits: Vec<Edit>,
}

impl ByteRangeRewriter {
    /// Create a new rewriter for the given source
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            edits: Vec::new(),
        }
    }

    /// Add an edit to the pending list
    pub fn add_edit(&mut self, edit: Edit) {
        self.edits.push(edit);
    }

    /// Edit indices ordered by position; ties keep insertion order.
    fn ordered(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.edits.len()).collect();
        order.sort_by_key(|&i| (self.edits[i].start_byte, self.edits[i].end_byte, i));
        order
    }

    /// Validate edits without applying them
    ///
    /// # Errors
    /// Returns error if edits overlap, are out of bounds, or split a character
    pub fn validate(&self) -> Result<(), RewriteError> {
        for (i, edit) in self.edits.iter().enumerate() {
            if edit.start_byte > edit.end_byte {
                return Err(RewriteError::InvertedRange {
                    edit_index: i,
                    start_byte: edit.start_byte,
                    end_byte: edit.end_byte,
                });
            }
            if edit.end_byte > self.source.len() {
                return Err(RewriteError::OutOfBounds {
                    edit_index: i,
                    end_byte: edit.end_byte,
                    source_len: self.source.len(),
                });
            }
            for offset in [edit.start_byte, edit.end_byte] {
                if !self.source.is_char_boundary(offset) {
                    return Err(RewriteError::SplitsCharacter {
                        edit_index: i,
                        offset,
                    });
                }
            }
        }

        // Sweep in position order, remembering the edit that reaches furthest.
        let mut reach: Option<usize> = None;
        for i in self.ordered() {
            let edit = &self.edits[i];
            if let Some(j) = reach {
                if edit.start_byte < self.edits[j].end_byte {
                    return Err(RewriteError::OverlappingEdits {
                        edit_a: j.min(i),
                        edit_b: j.max(i),
                    });
                }
            }
            if reach.is_none_or(|j| self.edits[j].end_byte < edit.end_byte) {
                reach = Some(i);
            }
        }

        Ok(())
    }

    /// Apply all edits and return the modified source
    ///
    /// # Errors
    /// Returns error if edits overlap, are out of bounds, or split a character
    pub fn apply(self) -> Result<String, RewriteError> {
        self.validate()?;

        let removed: usize = self.edits.iter().map(Edit::range_len).sum();
        let mut result = String::with_capacity(self.source.len() - removed);

        let mut cursor = 0;
        for i in self.ordered() {
            let edit = &self.edits[i];
            result.push_str(&self.source[cursor..edit.start_byte]);
            cursor = edit.end_byte;
        }
        result.push_str(&self.source[cursor..]);

        Ok(result)
    }
}
