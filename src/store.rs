//! Open-document store with disk fallback.
//!
//! Buffers for open documents live here, keyed by URI, each with a
//! monotonically increasing version. Files that are not open are read from
//! disk on demand; external watch events bump a shadow version so caches
//! keyed on `version(uri)` notice edits made outside the editor.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::analysis::results::Range;

/// One incremental content change from the protocol; `range` is `None` for a
/// full-text replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentChange {
    pub range: Option<Range>,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct OpenDocument {
    content: String,
    version: i32,
}

#[derive(Debug, Default)]
pub struct FileStore {
    workspace_roots: HashSet<PathBuf>,
    open: HashMap<String, OpenDocument>,
    /// Versions for files edited outside the editor, bumped per watch event.
    disk_versions: HashMap<String, i32>,
}

impl FileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_workspace_roots(&mut self, roots: HashSet<PathBuf>) {
        self.workspace_roots = roots;
    }

    pub fn workspace_roots(&self) -> &HashSet<PathBuf> {
        &self.workspace_roots
    }

    pub fn open(&mut self, uri: &str, text: String, version: i32) {
        self.open.insert(
            uri.to_string(),
            OpenDocument {
                content: text,
                version,
            },
        );
    }

    pub fn change(&mut self, uri: &str, version: i32, changes: Vec<ContentChange>) {
        let Some(doc) = self.open.get_mut(uri) else {
            warn!("Change to unopened document {uri}");
            return;
        };
        for change in changes {
            match change.range {
                Some(range) => apply_edit(&mut doc.content, range, &change.text),
                None => doc.content = change.text,
            }
        }
        doc.version = version;
    }

    pub fn close(&mut self, uri: &str) {
        self.open.remove(uri);
    }

    pub fn external_create(&mut self, path: &Path) {
        self.bump_disk_version(path);
    }

    pub fn external_change(&mut self, path: &Path) {
        self.bump_disk_version(path);
    }

    pub fn external_delete(&mut self, path: &Path) {
        self.bump_disk_version(path);
    }

    fn bump_disk_version(&mut self, path: &Path) {
        let uri = path_to_uri(path);
        *self.disk_versions.entry(uri).or_insert(0) += 1;
    }

    pub fn contents(&self, uri: &str) -> io::Result<String> {
        if let Some(doc) = self.open.get(uri) {
            return Ok(doc.content.clone());
        }
        let path = uri_to_path(uri).ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, format!("not a file uri: {uri}"))
        })?;
        fs::read_to_string(path)
    }

    pub fn version(&self, uri: &str) -> i32 {
        if let Some(doc) = self.open.get(uri) {
            return doc.version;
        }
        self.disk_versions.get(uri).copied().unwrap_or(0)
    }

    pub fn is_open(&self, uri: &str) -> bool {
        self.open.contains_key(uri)
    }

    pub fn active_documents(&self) -> Vec<String> {
        self.open.keys().cloned().collect()
    }

    pub fn is_java_file(uri: &str) -> bool {
        uri.ends_with(".java")
    }
}

pub fn uri_to_path(uri: &str) -> Option<PathBuf> {
    let path = uri.strip_prefix("file://")?;
    if path.is_empty() {
        return None;
    }
    Some(PathBuf::from(path))
}

pub fn path_to_uri(path: &Path) -> String {
    format!("file://{}", path.to_string_lossy())
}

/// Splice `text` over `range` in `content`. Offsets are recomputed per edit,
/// so a batch of changes applies in protocol order.
fn apply_edit(content: &mut String, range: Range, text: &str) {
    let start = offset_at(content, range.start.line, range.start.character);
    let end = offset_at(content, range.end.line, range.end.character);
    content.replace_range(start..end, text);
}

fn offset_at(content: &str, line: u32, character: u32) -> usize {
    let mut remaining_lines = line;
    let mut offset = 0;
    let bytes = content.as_bytes();
    while remaining_lines > 0 && offset < bytes.len() {
        if bytes[offset] == b'\n' {
            remaining_lines -= 1;
        }
        offset += 1;
    }
    let mut chars = content[offset..].chars();
    for _ in 0..character {
        match chars.next() {
            Some('\n') | None => break,
            Some(c) => offset += c.len_utf8(),
        }
    }
    offset
}
