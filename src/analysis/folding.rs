//! Folding ranges from the parse-only pass.
//!
//! Imports coalesce into one range per contiguous run. Class ranges anchor
//! on the opening `{` so the declaration line stays readable, and class and
//! block ranges stop one line early so the closing `}` stays visible.

use crate::analysis::results::{FoldingRange, FoldingRangeKind};
use crate::analysis::service::{JavaLanguageService, ServiceResult};
use crate::diag::{Position, Span};
use crate::store::FileStore;

impl JavaLanguageService {
    pub fn folding_ranges(&mut self, uri: &str) -> ServiceResult<Vec<FoldingRange>> {
        if !FileStore::is_java_file(uri) {
            return Ok(Vec::new());
        }
        let parse = self.update_parse(uri)?;
        let folds = parse.folds();
        let mut all = Vec::new();

        let mut imports = folds
            .imports
            .iter()
            .map(|span| folding_range(*span, FoldingRangeKind::Imports));
        if let Some(mut merged) = imports.next() {
            for next in imports {
                if next.start_line <= merged.end_line + 1 {
                    merged.end_line = next.end_line;
                    merged.end_character = next.end_character;
                } else {
                    all.push(merged);
                    merged = next;
                }
            }
            all.push(merged);
        }

        if !folds.classes.is_empty() {
            // Reading the source is the only way to find the `{`; a failure
            // here is fatal to the request.
            let content = self.store.contents(uri)?;
            for span in &folds.classes {
                let mut range = folding_range(*span, FoldingRangeKind::Region);
                if let Some((line, character)) = find_open_brace(&content, span.start) {
                    range.start_line = line;
                    range.start_character = character;
                }
                range.end_line = range.end_line.saturating_sub(1);
                all.push(range);
            }
        }

        for span in &folds.blocks {
            let mut range = folding_range(*span, FoldingRangeKind::Region);
            range.end_line = range.end_line.saturating_sub(1);
            all.push(range);
        }
        for span in &folds.comments {
            all.push(folding_range(*span, FoldingRangeKind::Region));
        }
        Ok(all)
    }
}

fn folding_range(span: Span, kind: FoldingRangeKind) -> FoldingRange {
    FoldingRange {
        start_line: span.start.line.saturating_sub(1),
        start_character: span.start.column.saturating_sub(1),
        end_line: span.end.line.saturating_sub(1),
        end_character: span.end.column.saturating_sub(1),
        kind,
    }
}

/// 0-based position of the first `{` at or after `start` (1-based).
fn find_open_brace(content: &str, start: Position) -> Option<(u32, u32)> {
    let target_line = start.line.saturating_sub(1);
    let target_column = start.column.saturating_sub(1);
    let mut line = 0u32;
    let mut column = 0u32;
    for c in content.chars() {
        let reached =
            line > target_line || (line == target_line && column >= target_column);
        if reached && c == '{' {
            return Some((line, column));
        }
        if c == '\n' {
            line += 1;
            column = 0;
        } else {
            column += 1;
        }
    }
    None
}

#[cfg(test)]
#[path = "../tests/analysis/t_folding.rs"]
mod tests;
