//! Tree-sitter based C front end.
//!
//! Parses C source and lowers it into a [`SyntaxTree`] holding only the
//! statements and expressions of function bodies.

use super::kinds::{classify, skips_field, Lowering};
use crate::source::{
    BuildError, IncludedRegions, Span, StmtKind, SyntaxTree, SyntaxTreeBuilder,
};
use smallvec::SmallVec;
use thiserror::Error;
use tree_sitter::{Node, Parser};

/// Error during CST parsing
#[derive(Debug, Error)]
pub enum CstError {
    /// Failed to create parser
    #[error("failed to create C parser: {0}")]
    ParserCreation(String),
    /// Tree-sitter produced no tree
    #[error("failed to parse source as C")]
    ParseFailed,
    /// The parsed tree could not be lowered
    #[error("malformed syntax tree: {0}")]
    Malformed(#[from] BuildError),
}

/// Tree-sitter based C parser
pub struct CParser {
    parser: Parser,
    line_markers: bool,
    main_file: Option<String>,
}

impl CParser {
    /// Create a new C parser that honours line markers
    ///
    /// # Errors
    /// Returns error if parser creation fails
    pub fn new() -> Result<Self, CstError> {
        let mut parser = Parser::new();

        parser
            .set_language(&tree_sitter_c::LANGUAGE.into())
            .map_err(|e| CstError::ParserCreation(e.to_string()))?;

        Ok(Self {
            parser,
            line_markers: true,
            main_file: None,
        })
    }

    /// Name the main file for line-marker matching
    #[must_use]
    pub fn with_main_file(mut self, name: impl Into<String>) -> Self {
        self.main_file = Some(name.into());
        self
    }

    /// Enable or disable included-region detection from line markers
    #[must_use]
    pub fn with_line_markers(mut self, enabled: bool) -> Self {
        self.line_markers = enabled;
        self
    }

    /// Parse source code into a statement tree
    ///
    /// Syntax errors are tolerated: reduced programs are rarely valid C, and
    /// whatever tree-sitter recovers is lowered as usual.
    ///
    /// # Errors
    /// Returns error if parsing or lowering fails
    pub fn parse(&mut self, source: &str) -> Result<SyntaxTree, CstError> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or(CstError::ParseFailed)?;
        let root = tree.root_node();
        if root.has_error() {
            tracing::debug!("source has syntax errors; lowering recovered tree");
        }

        let regions = if self.line_markers {
            IncludedRegions::scan(source, self.main_file.as_deref())
        } else {
            IncludedRegions::default()
        };
        let mut builder = SyntaxTreeBuilder::new(source).with_included_regions(regions);

        for function in function_definitions(root) {
            let Some(body) = function.child_by_field_name("body") else {
                continue;
            };
            builder.begin_function(function_name(function, source), span_of(function));
            lower_body(&mut builder, body);
            builder.end_function();
        }

        Ok(builder.finish()?)
    }
}

fn span_of(node: Node<'_>) -> Span {
    Span::new(node.start_byte(), node.end_byte())
}

/// Named children of `node` that lowering keeps, in source order.
fn lowered_children<'tree>(node: Node<'tree>) -> SmallVec<[Node<'tree>; 8]> {
    let mut children = SmallVec::new();
    let mut cursor = node.walk();
    if !cursor.goto_first_child() {
        return children;
    }
    loop {
        let child = cursor.node();
        if child.is_named() && !skips_field(node.kind(), cursor.field_name()) {
            children.push(child);
        }
        if !cursor.goto_next_sibling() {
            break;
        }
    }
    children
}

/// Splits a `case_statement` into its label span, its `value` and the
/// statements of its arm.
fn case_parts<'tree>(
    case: Node<'tree>,
) -> (Span, Option<Node<'tree>>, SmallVec<[Node<'tree>; 8]>) {
    let mut header_end = case.start_byte();
    let mut value = None;
    let mut arm = SmallVec::new();
    let mut in_arm = false;
    let mut cursor = case.walk();
    if cursor.goto_first_child() {
        loop {
            let child = cursor.node();
            if in_arm {
                if child.is_named() {
                    arm.push(child);
                }
            } else {
                header_end = child.end_byte();
                if cursor.field_name() == Some("value") {
                    value = Some(child);
                }
                in_arm = child.kind() == ":";
            }
            if !cursor.goto_next_sibling() {
                break;
            }
        }
    }
    (Span::new(case.start_byte(), header_end), value, arm)
}

/// Function definitions outside of function bodies, in source order.
fn function_definitions(root: Node<'_>) -> Vec<Node<'_>> {
    let mut found = Vec::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.kind() == "function_definition" {
            found.push(node);
            continue;
        }
        let mut cursor = node.walk();
        let children: Vec<Node<'_>> = node.named_children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }
    found
}

/// Name of the function declared by a `function_definition`.
fn function_name(function: Node<'_>, source: &str) -> String {
    let mut declarator = function.child_by_field_name("declarator");
    while let Some(node) = declarator {
        if matches!(node.kind(), "identifier" | "field_identifier") {
            return source[node.byte_range()].to_owned();
        }
        declarator = node.child_by_field_name("declarator");
    }
    String::new()
}

enum Task<'tree> {
    Lower(Node<'tree>),
    Close,
}

fn lower_body(builder: &mut SyntaxTreeBuilder, body: Node<'_>) {
    let mut stack = vec![Task::Lower(body)];
    while let Some(task) = stack.pop() {
        let node = match task {
            Task::Lower(node) => node,
            Task::Close => {
                builder.close();
                continue;
            }
        };
        match classify(node.kind()) {
            Lowering::Skip => continue,
            Lowering::Node(kind) => {
                if builder.open(kind, span_of(node)).is_none() {
                    return;
                }
                stack.push(Task::Close);
            }
            Lowering::CaseHeader => {
                let (header, value, arm) = case_parts(node);
                stack.extend(arm.into_iter().rev().map(Task::Lower));
                if builder.open(StmtKind::Other, header).is_none() {
                    return;
                }
                stack.push(Task::Close);
                if let Some(value) = value {
                    stack.push(Task::Lower(value));
                }
                continue;
            }
            Lowering::Transparent => {}
        }
        stack.extend(lowered_children(node).into_iter().rev().map(Task::Lower));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{enumerate, RemovalPolicy};

    fn parse(source: &str) -> SyntaxTree {
        CParser::new().unwrap().parse(source).unwrap()
    }

    fn child_texts<'a>(tree: &'a SyntaxTree, node: crate::source::NodeId) -> Vec<&'a str> {
        tree.children(node)
            .iter()
            .map(|&c| tree.slice(tree.span(c)))
            .collect()
    }

    #[test]
    fn test_functions_in_source_order() {
        let tree = parse("int b(void) { return 1; }\nstatic void a(int x) { x++; }\nint g;\n");
        let names: Vec<&str> = tree.functions().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_pointer_returning_function_name() {
        let tree = parse("char *dup(const char *s) { return 0; }\n");
        assert_eq!(tree.functions()[0].name, "dup");
    }

    #[test]
    fn test_body_statements_lowered() {
        let source = "int main(void) {\n  int x = 1;\n  x = x + 2;\n  if (x) { return x; } else return 0;\n}\n";
        let tree = parse(source);
        let body = tree.functions()[0].body;
        assert_eq!(tree.kind(body), StmtKind::Compound);
        assert_eq!(
            child_texts(&tree, body),
            vec![
                "int x = 1;",
                "x = x + 2;",
                "if (x) { return x; } else return 0;"
            ]
        );

        let kinds: Vec<StmtKind> = tree.children(body).iter().map(|&c| tree.kind(c)).collect();
        assert_eq!(
            kinds,
            vec![StmtKind::Declaration, StmtKind::Expression, StmtKind::Other]
        );

        // condition, then-block and else statement hang directly off the `if`
        let if_stmt = tree.children(body)[2];
        assert_eq!(
            child_texts(&tree, if_stmt),
            vec!["(x)", "{ return x; }", "return 0;"]
        );
    }

    #[test]
    fn test_label_lowered_with_statement() {
        let tree = parse("void f(void) {\nretry:\n  g();\n  goto retry;\n}\n");
        let body = tree.functions()[0].body;
        let label = tree.children(body)[0];
        assert_eq!(tree.kind(label), StmtKind::Label);
        assert_eq!(child_texts(&tree, label), vec!["g();"]);
        let goto = tree.children(body)[1];
        // the label name is not an expression
        assert!(tree.children(goto).is_empty());
    }

    #[test]
    fn test_case_arm_statements_attach_to_switch_body() {
        let tree = parse(
            "void f(int x) { switch (x) { case 1: a(); b(); break; default: c(); } d(); }\n",
        );
        let body = tree.functions()[0].body;
        let switch = tree.children(body)[0];
        let block = tree.children(switch)[1];
        assert_eq!(tree.kind(block), StmtKind::Compound);
        assert_eq!(
            child_texts(&tree, block),
            vec!["case 1:", "a();", "b();", "break;", "default:", "c();"]
        );

        let case = tree.children(block)[0];
        assert_eq!(tree.kind(case), StmtKind::Other);
        assert_eq!(child_texts(&tree, case), vec!["1"]);

        let candidates = enumerate(&tree, RemovalPolicy::NestedExpr);
        let texts: Vec<&str> = candidates
            .iter()
            .map(|c| tree.slice(tree.span(c.node)))
            .collect();
        for stmt in ["a();", "b();", "c();", "d();", "case 1:", "default:"] {
            assert!(texts.contains(&stmt), "{stmt} missing from {texts:?}");
        }
        // the case value is not block-level
        assert!(!texts.contains(&"1"));
    }

    #[test]
    fn test_comments_and_defines_dropped() {
        let tree = parse("void f(void) {\n  /* note */\n#define N 3\n  h();\n}\n");
        let body = tree.functions()[0].body;
        assert_eq!(child_texts(&tree, body), vec!["h();"]);
    }

    #[test]
    fn test_line_markers_mark_included_functions() {
        let source = "# 1 \"main.c\"\n# 1 \"lib.h\" 1\nstatic int h(void) { return 1; }\n# 2 \"main.c\" 2\nint main(void) { return h(); }\n";
        let tree = parse(source);
        assert_eq!(tree.functions().len(), 2);
        assert!(tree.is_in_included_file(tree.functions()[0].body));
        assert!(tree.is_in_editable_file(tree.functions()[1].body));

        let ignoring = CParser::new()
            .unwrap()
            .with_line_markers(false)
            .parse(source)
            .unwrap();
        assert!(ignoring.is_in_editable_file(ignoring.functions()[0].body));
    }

    #[test]
    fn test_syntax_errors_tolerated() {
        let tree = parse("int main(void) { int x = ; return x; }\n");
        assert_eq!(tree.functions().len(), 1);
    }
}
