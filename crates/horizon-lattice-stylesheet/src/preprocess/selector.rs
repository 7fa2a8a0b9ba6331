//! Textual selector composition for nested rules.

/// Split a selector list on top-level commas.
///
/// Commas inside parentheses, brackets or quotes do not split, so
/// `:not(.a, .b)` stays a single selector.
pub fn split_selector_list(list: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in list.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(' | '[') => depth += 1,
            (None, ')' | ']') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                parts.push(list[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(list[start..].trim());
    parts.retain(|p| !p.is_empty());
    parts
}

/// Combine a nested selector with its parent.
///
/// - `&` is replaced by the parent selector
/// - a selector starting with `:` attaches directly to the parent
/// - anything else becomes a descendant of the parent
///
/// Selector lists on either side combine as a cross product.
pub fn combine_selectors(parent: &str, child: &str) -> String {
    let children = split_selector_list(child);
    if parent.trim().is_empty() {
        return children.join(",");
    }

    let parents = split_selector_list(parent);
    let mut combined = Vec::with_capacity(parents.len() * children.len());
    for p in &parents {
        for c in &children {
            combined.push(if c.contains('&') {
                c.replace('&', p)
            } else if c.starts_with(':') {
                format!("{p}{c}")
            } else {
                format!("{p} {c}")
            });
        }
    }
    combined.join(",")
}
