//! Text-level helpers for Overpass queries: the `{{bbox}}` placeholder, the
//! comment-only "empty" check with its download-everything repair, and the
//! derivation of history keys from executed query text.

pub const BBOX_PLACEHOLDER: &str = "{{bbox}}";

const HISTORY_KEY_MAX_CHARS: usize = 80;

/// True when the query is scoped to the selected download area and therefore
/// cannot run without one.
pub fn references_bbox(query: &str) -> bool {
    query.contains(BBOX_PLACEHOLDER)
}

/// True when the query consists only of whitespace and terminated `/* */`
/// block comments, i.e. the user has written nothing executable yet.
pub fn is_effectively_empty(query: &str) -> bool {
    let mut rest = query;
    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            return true;
        }
        if let Some(comment) = rest.strip_prefix("/*") {
            match comment.find("*/") {
                Some(end) => rest = &comment[end + 2..],
                // An unterminated comment is malformed input, not emptiness.
                None => return false,
            }
        } else {
            return false;
        }
    }
}

/// Wraps an effectively empty query into one that downloads everything in the
/// selected area, preserving whatever comments the user wrote.
pub fn download_everything_query(query: &str) -> String {
    format!(
        "[out:xml]; \n{query}\n(\n    node({BBOX_PLACEHOLDER});\n<;\n);\n(._;>;);out meta;"
    )
}

/// Derives the display key a history entry is recorded under: the first line
/// of the query that is neither blank nor inside a block comment, truncated.
/// Returns `None` for queries with no such line.
pub fn history_key(query: &str) -> Option<String> {
    let stripped = strip_block_comments(query);
    let line = stripped.lines().map(str::trim).find(|line| !line.is_empty())?;
    Some(line.chars().take(HISTORY_KEY_MAX_CHARS).collect())
}

fn strip_block_comments(query: &str) -> String {
    let mut out = String::with_capacity(query.len());
    let mut rest = query;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        match rest[start + 2..].find("*/") {
            Some(end) => rest = &rest[start + 2 + end + 2..],
            None => return out,
        }
    }
    out.push_str(rest);
    out
}
