//! Helpers for building statement trees in tests without the C front end.
//!
//! [`toy_tree`] understands a tiny C-like language:
//!
//! - `name() { ... }` defines a function
//! - `{ ... }` is a block
//! - `int ...;` is a declaration
//! - `return ...;` and `if (...) stmt` are ordinary statements
//! - `name: stmt` is a label
//! - anything else up to `;` is an expression statement; parenthesised groups
//!   inside it become nested expressions
//!
//! Lines starting with `#` are skipped, so preprocessor line markers can be
//! used to mark included regions.

#![allow(clippy::expect_used, clippy::panic)]

use crate::source::{IncludedRegions, Span, StmtKind, SyntaxTree, SyntaxTreeBuilder};

/// Build a [`SyntaxTree`] from toy source.
///
/// # Panics
///
/// Panics on malformed input.
#[must_use]
pub fn toy_tree(text: &str) -> SyntaxTree {
    let regions = IncludedRegions::scan(text, None);
    let mut parser = ToyParser {
        bytes: text.as_bytes(),
        pos: 0,
        builder: SyntaxTreeBuilder::new(text).with_included_regions(regions),
    };
    parser.program();
    parser.builder.finish().expect("toy source should build")
}

/// Byte span of the first occurrence of `needle` in `text`.
///
/// # Panics
///
/// Panics if `needle` does not occur.
#[must_use]
pub fn span_of(text: &str, needle: &str) -> Span {
    let start = text
        .find(needle)
        .unwrap_or_else(|| panic!("`{needle}` not found"));
    Span::new(start, start + needle.len())
}

/// A tree over `f(){aéb}` whose only declaration ends inside the `é`.
///
/// Removing that declaration makes the text splice fail.
///
/// # Panics
///
/// Panics if the builder rejects the tree.
#[must_use]
pub fn misaligned_tree() -> SyntaxTree {
    let text = "f(){aéb}";
    let mut builder = SyntaxTreeBuilder::new(text);
    builder.begin_function("f", Span::new(0, text.len()));
    builder.open(StmtKind::Compound, Span::new(3, text.len()));
    builder.leaf(StmtKind::Declaration, Span::new(4, 6));
    builder.close();
    builder.end_function();
    builder.finish().expect("misaligned tree should build")
}

struct ToyParser<'a> {
    bytes: &'a [u8],
    pos: usize,
    builder: SyntaxTreeBuilder,
}

fn is_ident(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

impl ToyParser<'_> {
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_trivia_from(&self, mut pos: usize) -> usize {
        while let Some(&b) = self.bytes.get(pos) {
            if b.is_ascii_whitespace() {
                pos += 1;
            } else if b == b'#' {
                while pos < self.bytes.len() && self.bytes[pos] != b'\n' {
                    pos += 1;
                }
            } else {
                break;
            }
        }
        pos
    }

    fn skip_trivia(&mut self) {
        self.pos = self.skip_trivia_from(self.pos);
    }

    fn ident_end(&self, pos: usize) -> usize {
        let mut end = pos;
        while end < self.bytes.len() && is_ident(self.bytes[end]) {
            end += 1;
        }
        end
    }

    fn keyword_at(&self, pos: usize, word: &str) -> bool {
        self.bytes[pos..].starts_with(word.as_bytes())
            && self
                .bytes
                .get(pos + word.len())
                .is_none_or(|&b| !is_ident(b))
    }

    /// Position just past the bracket closing the one at `open`.
    fn matching(&self, open: usize) -> usize {
        let (left, right) = match self.bytes[open] {
            b'{' => (b'{', b'}'),
            b'(' => (b'(', b')'),
            other => panic!("no bracket at {open}: {}", other as char),
        };
        let mut depth = 0usize;
        for (i, &b) in self.bytes.iter().enumerate().skip(open) {
            if b == left {
                depth += 1;
            } else if b == right {
                depth -= 1;
                if depth == 0 {
                    return i + 1;
                }
            }
        }
        panic!("unbalanced bracket at {open}");
    }

    /// Position just past the `;` ending a simple statement.
    fn semicolon_end(&self, pos: usize) -> usize {
        let mut i = pos;
        while i < self.bytes.len() {
            match self.bytes[i] {
                b'(' => i = self.matching(i),
                b';' => return i + 1,
                _ => i += 1,
            }
        }
        panic!("missing `;` after {pos}");
    }

    fn label_colon(&self, pos: usize) -> Option<usize> {
        let end = self.ident_end(pos);
        if end == pos {
            return None;
        }
        let colon = self.skip_trivia_from(end);
        (self.bytes.get(colon) == Some(&b':')).then_some(colon)
    }

    fn statement_end(&self, pos: usize) -> usize {
        if self.bytes[pos] == b'{' {
            self.matching(pos)
        } else if self.keyword_at(pos, "if") {
            let cond = self.skip_trivia_from(pos + 2);
            let body = self.skip_trivia_from(self.matching(cond));
            self.statement_end(body)
        } else if let Some(colon) = self.label_colon(pos) {
            self.statement_end(self.skip_trivia_from(colon + 1))
        } else {
            self.semicolon_end(pos)
        }
    }

    fn program(&mut self) {
        self.skip_trivia();
        while self.pos < self.bytes.len() {
            self.function();
            self.skip_trivia();
        }
    }

    fn function(&mut self) {
        let start = self.pos;
        let name_end = self.ident_end(start);
        let name = String::from_utf8_lossy(&self.bytes[start..name_end]).into_owned();
        let params = self.skip_trivia_from(name_end);
        let body = self.skip_trivia_from(self.matching(params));
        let end = self.matching(body);
        self.builder.begin_function(name, Span::new(start, end));
        self.pos = body;
        self.statement();
        self.builder.end_function();
    }

    fn block_items(&mut self) {
        // positioned on `{`
        self.pos += 1;
        loop {
            self.skip_trivia();
            if self.peek() == Some(b'}') {
                self.pos += 1;
                return;
            }
            self.statement();
        }
    }

    fn statement(&mut self) {
        self.skip_trivia();
        let start = self.pos;
        let end = self.statement_end(start);
        let span = Span::new(start, end);

        if self.bytes[start] == b'{' {
            self.builder.open(StmtKind::Compound, span);
            self.block_items();
            self.builder.close();
        } else if self.keyword_at(start, "int") {
            self.builder.leaf(StmtKind::Declaration, span);
            self.pos = end;
        } else if self.keyword_at(start, "return") {
            self.builder.open(StmtKind::Other, span);
            let value = self.skip_trivia_from(start + "return".len());
            if value < end - 1 {
                self.builder
                    .leaf(StmtKind::Expression, Span::new(value, end - 1));
            }
            self.builder.close();
            self.pos = end;
        } else if self.keyword_at(start, "if") {
            self.builder.open(StmtKind::Other, span);
            let cond = self.skip_trivia_from(start + 2);
            let cond_end = self.matching(cond);
            self.builder
                .leaf(StmtKind::Expression, Span::new(cond, cond_end));
            self.pos = cond_end;
            self.statement();
            self.builder.close();
        } else if let Some(colon) = self.label_colon(start) {
            self.builder.open(StmtKind::Label, span);
            self.pos = colon + 1;
            self.statement();
            self.builder.close();
        } else {
            self.builder.open(StmtKind::Expression, span);
            let mut i = start;
            while i < end {
                if self.bytes[i] == b'(' {
                    let group_end = self.matching(i);
                    self.builder
                        .leaf(StmtKind::Expression, Span::new(i, group_end));
                    i = group_end;
                } else {
                    i += 1;
                }
            }
            self.builder.close();
            self.pos = end;
        }
    }
}
