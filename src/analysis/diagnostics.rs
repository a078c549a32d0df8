//! Diagnostics publication.
//!
//! The compiler reports diagnostics positioned by byte offsets; this module
//! maps them onto open buffers and pushes one publish per open URI — empty
//! lists included, so stale markers get cleared.

use std::collections::HashMap;

use tracing::warn;

use crate::analysis::client::EditorClient;
use crate::analysis::results::{
    DiagnosticTag, Position, PublishedDiagnostic, Range, Severity,
};
use crate::facility::{CompilerDiagnostic, DiagnosticKind};
use crate::store::FileStore;

pub(crate) fn publish_diagnostics(
    store: &FileStore,
    client: &mut dyn EditorClient,
    open_uris: &[String],
    diagnostics: Vec<CompilerDiagnostic>,
) {
    let mut by_uri: HashMap<String, Vec<PublishedDiagnostic>> = HashMap::new();
    for diagnostic in diagnostics {
        let Some(uri) = diagnostic.source.clone() else {
            warn!("No source in warning {}", diagnostic.message);
            continue;
        };
        if !open_uris.contains(&uri) {
            warn!("Skipped error at {uri} because that file isn't open");
            continue;
        }
        let content = match store.contents(&uri) {
            Ok(content) => content,
            Err(error) => {
                warn!("Couldn't read {uri} to position diagnostics: {error}");
                continue;
            }
        };
        let range = Range::new(
            position_at(&content, diagnostic.start_offset),
            position_at(&content, diagnostic.end_offset),
        );
        let tags = if diagnostic.code == "unused" {
            vec![DiagnosticTag::Unnecessary]
        } else {
            Vec::new()
        };
        by_uri.entry(uri).or_default().push(PublishedDiagnostic {
            range,
            severity: severity(diagnostic.kind),
            code: diagnostic.code,
            message: diagnostic.message,
            tags,
        });
    }

    for uri in open_uris {
        let list = by_uri.remove(uri).unwrap_or_default();
        client.publish_diagnostics(uri, list);
    }
}

fn severity(kind: DiagnosticKind) -> Severity {
    match kind {
        DiagnosticKind::Error => Severity::Error,
        DiagnosticKind::Warning | DiagnosticKind::MandatoryWarning => Severity::Warning,
        DiagnosticKind::Note => Severity::Information,
        DiagnosticKind::Other => Severity::Hint,
    }
}

/// 0-based position of `offset`, by linear scan over line breaks.
fn position_at(content: &str, offset: usize) -> Position {
    let mut line = 0;
    let mut character = 0;
    for (i, c) in content.char_indices() {
        if i >= offset {
            break;
        }
        if c == '\n' {
            line += 1;
            character = 0;
        } else {
            character += 1;
        }
    }
    Position::new(line, character)
}

#[cfg(test)]
#[path = "../tests/analysis/t_diagnostics.rs"]
mod tests;
