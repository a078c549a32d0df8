//! Position-preserving source reduction.
//!
//! Pruning blanks out every line that does not touch a given identifier,
//! keeping package/import lines, type-declaration headers, and structural
//! braces so the batch compiler can still bind the surviving names. Blanked
//! characters become spaces and newlines stay put, so the line and column of
//! every surviving character is unchanged.

/// Keywords that keep a line alive because they open a scope the surviving
/// identifiers may live in.
const STRUCTURE_KEYWORDS: &[&str] = &[
    "package",
    "import",
    "class",
    "interface",
    "enum",
    "@interface",
];

pub fn prune(content: &str, name: &str) -> String {
    let mut out = String::with_capacity(content.len());
    for line in split_keep_ends(content) {
        if keep_line(line, name) {
            out.push_str(line);
        } else {
            for c in line.chars() {
                match c {
                    '\n' | '\r' => out.push(c),
                    _ => out.push(' '),
                }
            }
        }
    }
    out
}

fn keep_line(line: &str, name: &str) -> bool {
    if contains_identifier(line, name) {
        return true;
    }
    if STRUCTURE_KEYWORDS
        .iter()
        .any(|kw| contains_identifier(line, kw))
    {
        return true;
    }
    // Lines that are only braces keep the block structure parseable.
    let trimmed = line.trim();
    !trimmed.is_empty() && trimmed.chars().all(|c| matches!(c, '{' | '}' | ';'))
}

/// Word-boundary search: `name` must not be preceded or followed by an
/// identifier character.
fn contains_identifier(line: &str, name: &str) -> bool {
    if name.is_empty() {
        return false;
    }
    let bytes = line.as_bytes();
    let mut from = 0;
    while let Some(found) = line[from..].find(name) {
        let start = from + found;
        let end = start + name.len();
        let before_ok = start == 0 || !is_identifier_byte(bytes[start - 1]);
        let after_ok = end >= bytes.len() || !is_identifier_byte(bytes[end]);
        if before_ok && after_ok {
            return true;
        }
        from = start + 1;
    }
    false
}

fn is_identifier_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

fn split_keep_ends(content: &str) -> impl Iterator<Item = &str> {
    let mut rest = content;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let line = match rest.find('\n') {
            Some(i) => {
                let (line, tail) = rest.split_at(i + 1);
                rest = tail;
                line
            }
            None => {
                let line = rest;
                rest = "";
                line
            }
        };
        Some(line)
    })
}
