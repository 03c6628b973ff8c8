use catalog_taxonomy::{visible_rows, CategoryNode};

/// Indented outline of the rows a picker would show.
///
/// `+` marks a collapsed branch, `-` an expanded one; leaves get no marker.
pub fn outline(tree: &[CategoryNode]) -> String {
    let mut out = String::new();
    for row in visible_rows(tree) {
        let marker = match (row.node.is_leaf(), row.node.expanded) {
            (true, _) => ' ',
            (false, true) => '-',
            (false, false) => '+',
        };
        out.push_str(&"  ".repeat(row.depth));
        out.push(marker);
        out.push(' ');
        out.push_str(&row.node.label);
        out.push_str(&format!(" ({})\n", row.node.id));
    }
    out
}
