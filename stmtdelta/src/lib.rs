//! Core library for the stmtdelta statement-removal pass.
//!
//! This library provides the pieces of a test-case reduction step for C:
//! a statement tree of function bodies, the enumeration of deletion
//! candidates, counter-window selection, and the text splice that removes
//! the selected statements.

#![allow(clippy::similar_names, clippy::items_after_statements)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

/// Module defining the statement tree the pass operates on.
/// This includes `SyntaxTree`, its builder, and included-region detection.
pub mod source;

/// Module containing the tree-sitter C front end.
pub mod cst;

/// Module containing the remove-statement transformation.
/// Enumeration, eligibility policies, counter windows and removal live here.
pub mod transform;

/// Module for applying byte-range edits to source text.
pub mod fix;

/// Module for loading configuration.
pub mod config;

/// Module containing shared constants and regex patterns.
pub mod constants;

/// Module defining the command-line interface arguments and structs.
pub mod cli;

/// Module defining the entry point logic shared by the binaries.
pub mod entry_point;

/// Module for tracing subscriber setup.
pub mod logging;

/// Module for CLI output formatting with colored text and tables.
pub mod output;

/// Module containing test utilities.
/// This helps in writing tests for the pass without the C front end.
pub mod test_utils;
