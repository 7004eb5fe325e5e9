use crate::constants::{INSTANCES_PREFIX, SNIPPET_WIDTH, TRANSFORMATION_NAME};
use crate::source::{StmtKind, SyntaxTree};
use crate::transform::{CandidateList, Removal, RemovalPolicy, RemovedStatement};
use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use serde::Serialize;
use std::io::Write;

/// One row of `--list-instances`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateRow {
    /// Counter addressing the candidate.
    pub counter: usize,
    /// Statement kind.
    pub kind: StmtKind,
    /// One-based line of the first byte.
    pub line: usize,
    /// One-based column of the first byte.
    pub column: usize,
    /// Candidates a removal of this one would erase too.
    pub subsumed: usize,
    /// Whitespace-collapsed, truncated source text.
    pub snippet: String,
}

/// Rows for every candidate in discovery order.
#[must_use]
pub fn candidate_rows(tree: &SyntaxTree, list: &CandidateList) -> Vec<CandidateRow> {
    list.iter()
        .enumerate()
        .map(|(index, candidate)| {
            let span = tree.span(candidate.node);
            let (line, column) = tree.line_col(span.start);
            CandidateRow {
                counter: list.counter_of(index),
                kind: tree.kind(candidate.node),
                line,
                column,
                subsumed: list.descendant_count(index),
                snippet: snippet(tree.slice(span)),
            }
        })
        .collect()
}

/// Collapse runs of whitespace and cut the text to the snippet width.
#[must_use]
pub fn snippet(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= SNIPPET_WIDTH {
        return collapsed;
    }
    let mut cut: String = collapsed.chars().take(SNIPPET_WIDTH - 1).collect();
    cut.push('…');
    cut
}

#[derive(Serialize)]
struct InstanceCount {
    transformation: &'static str,
    policy: RemovalPolicy,
    instances: usize,
}

#[derive(Serialize)]
struct InstanceListing<'a> {
    transformation: &'static str,
    policy: RemovalPolicy,
    instances: &'a [CandidateRow],
}

#[derive(Serialize)]
struct RemovalReport<'a> {
    transformation: &'static str,
    policy: RemovalPolicy,
    removed: &'a [RemovedStatement],
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
}

/// Print the instance count in the form the reduction driver parses.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_instance_count(
    writer: &mut impl Write,
    policy: RemovalPolicy,
    count: usize,
    json: bool,
) -> std::io::Result<()> {
    if json {
        let report = InstanceCount {
            transformation: TRANSFORMATION_NAME,
            policy,
            instances: count,
        };
        return write_json(writer, &report);
    }
    writeln!(writer, "{INSTANCES_PREFIX} {count}")
}

/// Helper to create a styled table
fn create_table(headers: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers);
    table
}

fn kind_color(kind: StmtKind) -> Color {
    match kind {
        StmtKind::Compound => Color::Cyan,
        StmtKind::Declaration => Color::Yellow,
        StmtKind::Expression => Color::Green,
        StmtKind::Label | StmtKind::Other => Color::White,
    }
}

/// Print every candidate, as a table or as JSON.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_candidates(
    writer: &mut impl Write,
    policy: RemovalPolicy,
    rows: &[CandidateRow],
    json: bool,
) -> std::io::Result<()> {
    if json {
        let listing = InstanceListing {
            transformation: TRANSFORMATION_NAME,
            policy,
            instances: rows,
        };
        return write_json(writer, &listing);
    }

    if rows.is_empty() {
        writeln!(
            writer,
            "{} {}",
            "No candidates under policy".dimmed(),
            policy.as_str().bold()
        )?;
        return Ok(());
    }

    let mut table = create_table(vec!["Counter", "Kind", "Location", "Subsumed", "Source"]);
    for row in rows {
        table.add_row(vec![
            Cell::new(row.counter)
                .add_attribute(Attribute::Bold)
                .set_alignment(CellAlignment::Right),
            Cell::new(row.kind).fg(kind_color(row.kind)),
            Cell::new(format!("{}:{}", row.line, row.column)),
            Cell::new(row.subsumed).set_alignment(CellAlignment::Right),
            Cell::new(&row.snippet).add_attribute(Attribute::Dim),
        ]);
    }
    writeln!(writer, "{table}")?;
    writeln!(
        writer,
        "{} {} ({})",
        INSTANCES_PREFIX.bold(),
        rows.len(),
        policy.as_str().dimmed()
    )
}

/// Print the outcome of a removal as JSON.
///
/// `text` is embedded when the program was not written to a file.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_removal_json(
    writer: &mut impl Write,
    policy: RemovalPolicy,
    removal: &Removal,
    output: Option<&str>,
) -> std::io::Result<()> {
    let report = RemovalReport {
        transformation: TRANSFORMATION_NAME,
        policy,
        removed: &removal.removed,
        output,
        text: if output.is_some() {
            None
        } else {
            Some(removal.text.as_str())
        },
    };
    write_json(writer, &report)
}

/// Print a one-line confirmation after writing the program to `path`.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_removal_summary(
    writer: &mut impl Write,
    removal: &Removal,
    path: &str,
) -> std::io::Result<()> {
    let counters = removal
        .removed
        .iter()
        .map(|r| r.counter.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    let subsumed: usize = removal.removed.iter().map(|r| r.subsumed).sum();
    writeln!(
        writer,
        "{} removed {} statement(s) [counters {}], {} nested candidate(s) erased -> {}",
        "[OK]".green().bold(),
        removal.removed.len(),
        counters,
        subsumed,
        path.bold()
    )
}

/// Print an error line to stderr.
pub fn print_error(message: &str) {
    eprintln!("{} {}", "Error:".red().bold(), message);
}

fn write_json(writer: &mut impl Write, value: &impl Serialize) -> std::io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::toy_tree;
    use crate::transform::enumerate;

    #[test]
    fn test_snippet_collapses_and_truncates() {
        assert_eq!(snippet("{\n    a;\n    b;\n}"), "{ a; b; }");
        let long = "x".repeat(SNIPPET_WIDTH + 10);
        let cut = snippet(&long);
        assert_eq!(cut.chars().count(), SNIPPET_WIDTH);
        assert!(cut.ends_with('…'));
    }

    #[test]
    fn test_candidate_rows() {
        let tree = toy_tree("f() {\n  a;\n  { b; }\n}");
        let list = enumerate(&tree, RemovalPolicy::NestedExpr);
        let rows = candidate_rows(&tree, &list);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].counter, 4);
        assert_eq!(rows[0].kind, StmtKind::Compound);
        assert_eq!(rows[0].subsumed, 3);
        assert_eq!((rows[1].line, rows[1].column), (2, 3));
        assert_eq!(rows[2].snippet, "{ b; }");
        assert_eq!(rows[3].counter, 1);
    }

    #[test]
    fn test_instance_count_plain_and_json() {
        let mut out = Vec::new();
        print_instance_count(&mut out, RemovalPolicy::Statement, 7, false).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Available transformation instances: 7\n"
        );

        let mut out = Vec::new();
        print_instance_count(&mut out, RemovalPolicy::Statement, 7, true).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["transformation"], "remove-stmt");
        assert_eq!(value["policy"], "statement");
        assert_eq!(value["instances"], 7);
    }

    #[test]
    fn test_removal_json_embeds_text_without_output_file() {
        let removal = Removal {
            text: "f() { }".to_owned(),
            removed: Vec::new(),
        };
        let mut out = Vec::new();
        print_removal_json(&mut out, RemovalPolicy::NestedExpr, &removal, None).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["text"], "f() { }");
        assert!(value.get("output").is_none());

        let mut out = Vec::new();
        print_removal_json(&mut out, RemovalPolicy::NestedExpr, &removal, Some("out.c")).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["output"], "out.c");
        assert!(value.get("text").is_none());
    }
}
