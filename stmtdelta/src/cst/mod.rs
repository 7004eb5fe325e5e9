//! CST (Concrete Syntax Tree) front end for C sources.
//!
//! Tree-sitter parses the program and the statement-bearing part of the
//! concrete tree is lowered into a [`SyntaxTree`](crate::source::SyntaxTree):
//! one body per function definition, statements and expressions only, exact
//! byte spans.
//!
//! # Feature Gate
//!
//! This module is only available with the `cst` feature enabled:
//! ```bash
//! cargo build --features cst
//! ```

#[cfg(feature = "cst")]
mod kinds;
#[cfg(feature = "cst")]
mod parser;

#[cfg(feature = "cst")]
pub use parser::{CParser, CstError};

/// Placeholder types for when CST feature is disabled
#[cfg(not(feature = "cst"))]
pub mod stub {
    /// Stub error for CST operations when feature disabled
    #[derive(Debug)]
    pub struct CstNotAvailable;

    impl std::fmt::Display for CstNotAvailable {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "C parsing requires --features cst")
        }
    }

    impl std::error::Error for CstNotAvailable {}
}
