//! Deterministic markup snapshots for tests.
//!
//! Equivalence rules:
//! - Node kinds, tags and text must match exactly.
//! - Attribute names and values must match; order only matters when
//!   `sort_attributes` is off.
//! - Mount identities are compared unless `ignore_ids` is set.

use std::fmt;
use vdom::Markup;

#[derive(Clone, Copy, Debug)]
pub struct SnapshotOptions {
    pub ignore_ids: bool,
    pub sort_attributes: bool,
}

impl Default for SnapshotOptions {
    fn default() -> Self {
        Self {
            ignore_ids: false,
            sort_attributes: true,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct Snapshot {
    lines: Vec<String>,
}

impl Snapshot {
    pub fn new(root: &Markup, options: SnapshotOptions) -> Self {
        let mut lines = Vec::new();
        walk(root, &options, 0, &mut lines);
        Self { lines }
    }

    pub fn as_lines(&self) -> &[String] {
        &self.lines
    }

    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn walk(node: &Markup, options: &SnapshotOptions, depth: usize, out: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    let id = if options.ignore_ids {
        String::new()
    } else {
        format!(" #{}", node.id())
    };
    match node {
        Markup::Text { text, .. } => out.push(format!("{indent}\"{text}\"{id}")),
        Markup::Element {
            tag,
            attributes,
            children,
            ..
        } => {
            let mut attrs: Vec<_> = attributes.iter().collect();
            if options.sort_attributes {
                attrs.sort_by(|a, b| a.0.cmp(&b.0));
            }
            let mut line = format!("{indent}<{tag}{id}");
            for (name, value) in attrs {
                line.push_str(&format!(" {name}=\"{value}\""));
            }
            line.push('>');
            out.push(line);
            for child in children {
                walk(child, options, depth + 1, out);
            }
        }
    }
}

/// Compares two markup trees, returning a readable first-difference report.
pub fn compare_markup(
    expected: &Markup,
    actual: &Markup,
    options: SnapshotOptions,
) -> Result<(), String> {
    let expected = Snapshot::new(expected, options);
    let actual = Snapshot::new(actual, options);
    if expected == actual {
        return Ok(());
    }
    let first = expected
        .as_lines()
        .iter()
        .zip(actual.as_lines())
        .position(|(e, a)| e != a)
        .unwrap_or_else(|| expected.as_lines().len().min(actual.as_lines().len()));
    Err(format!(
        "markup mismatch at line {first}\n--- expected\n{expected}\n--- actual\n{actual}"
    ))
}

#[track_caller]
pub fn assert_markup_eq(expected: &Markup, actual: &Markup, options: SnapshotOptions) {
    if let Err(report) = compare_markup(expected, actual, options) {
        panic!("{report}");
    }
}
