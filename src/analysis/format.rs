//! Formatting: import fix-up and `@Override` insertion.
//!
//! Both produce plain text edits against the current buffer. Import edits
//! delete every existing non-static import line and re-insert the computed
//! set at one spot; static imports are left alone.

use crate::analysis::results::{Position, Range, TextEdit};
use crate::analysis::service::{JavaLanguageService, ServiceResult};
use crate::facility::FileCompile;
use crate::store::FileStore;

impl JavaLanguageService {
    pub fn formatting(&mut self, uri: &str) -> ServiceResult<Vec<TextEdit>> {
        if !FileStore::is_java_file(uri) {
            return Ok(Vec::new());
        }
        let active = self.update_active_file(uri)?;
        let mut edits = fix_imports(active.as_ref());
        edits.extend(add_overrides(active.as_ref()));
        Ok(edits)
    }
}

fn fix_imports(active: &dyn FileCompile) -> Vec<TextEdit> {
    let existing = active.imports();
    let mut edits = Vec::new();
    // Delete all existing non-static imports, whole lines.
    for import in &existing {
        if !import.is_static {
            let line0 = import.line.saturating_sub(1);
            edits.push(TextEdit {
                range: Range::new(Position::new(line0, 0), Position::new(line0 + 1, 0)),
                new_text: String::new(),
            });
        }
    }

    let imports = active.fixed_imports();
    if imports.is_empty() {
        return edits;
    }

    // Insert at the first existing import, else right after the package
    // declaration, else at the top of the file.
    let mut insert_text = String::new();
    let insert_line = match existing.iter().find(|i| !i.is_static) {
        Some(first) => first.line.saturating_sub(1),
        None => match active.package_line() {
            Some(package_line) => {
                insert_text.push('\n');
                package_line
            }
            None => 0,
        },
    };
    for import in &imports {
        insert_text.push_str("import ");
        insert_text.push_str(import);
        insert_text.push_str(";\n");
    }
    let position = Position::new(insert_line, 0);
    edits.push(TextEdit {
        range: Range::new(position, position),
        new_text: insert_text,
    });
    edits
}

fn add_overrides(active: &dyn FileCompile) -> Vec<TextEdit> {
    let mut edits = Vec::new();
    for method_start in active.overrides_needed() {
        let indent = " ".repeat(method_start.column.saturating_sub(1) as usize);
        let position = Position::new(method_start.line.saturating_sub(1), 0);
        edits.push(TextEdit {
            range: Range::new(position, position),
            new_text: format!("{indent}@Override\n"),
        });
    }
    edits
}

#[cfg(test)]
#[path = "../tests/analysis/t_format.rs"]
mod tests;
