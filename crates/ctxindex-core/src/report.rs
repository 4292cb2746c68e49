//! Human-readable structure report.

use crate::node::ScanNode;

/// Format number with commas (e.g., 12345 → "12,345")
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::new();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }

    result
}

/// Render a scanned tree as indented lines, starting with no indent.
pub fn format_report(node: &ScanNode) -> Vec<String> {
    format_node(node, "")
}

/// Render a node's files, then each subdirectory with its contents indented two spaces.
pub fn format_node(node: &ScanNode, prefix: &str) -> Vec<String> {
    let mut lines = Vec::new();

    for file in &node.files {
        lines.push(format!(
            "{prefix}{} ({} bytes, ~{} tokens)",
            file.name,
            format_number(file.size),
            format_number(file.tokens)
        ));
    }

    let child_prefix = format!("{prefix}  ");
    for (name, child) in &node.dirs {
        lines.push(format!("{prefix}{name}/"));
        lines.extend(format_node(child, &child_prefix));
    }

    lines
}
