//! Code lenses and the reference-count resolution procedure.
//!
//! Lens construction is parse-only and cheap; counting references is the
//! expensive half and runs at resolve time. The count leans on the
//! per-target index cache: while the user keeps editing the same file, a
//! resolve recompiles only source files whose index went stale, and a count
//! whose signature and sources are unchanged is answered without compiling
//! at all.

use std::collections::{HashMap, HashSet};

use serde_json::{Value, json};
use tracing::{info, warn};

use crate::analysis::index::{IndexEntry, RefCount, RefSources};
use crate::analysis::results::{CodeLens, Command, Range};
use crate::analysis::service::{JavaLanguageService, ServiceError, ServiceResult};
use crate::facility::SourceInput;
use crate::facility::ptr::Ptr;
use crate::store::FileStore;

pub(crate) const FIND_REFERENCES_COMMAND: &str = "java.command.findReferences";
pub(crate) const TEST_RUN_COMMAND: &str = "java.command.test.run";

/// Candidate-file ceiling beyond which a count is not worth computing.
const MAX_REFERENCE_FILES: usize = 10;

impl JavaLanguageService {
    pub fn code_lenses(&mut self, uri: &str) -> ServiceResult<Vec<CodeLens>> {
        if !FileStore::is_java_file(uri) {
            return Ok(Vec::new());
        }
        let parse = self.update_parse(uri)?;
        let mut result = Vec::new();
        for decl in parse.declarations() {
            let Some(span) = decl.span else { continue };
            let range = Range::from_span(span);
            if decl.is_test_class {
                result.push(CodeLens {
                    range,
                    command: Some(Command {
                        title: "Run All Tests".to_string(),
                        command: TEST_RUN_COMMAND.to_string(),
                        arguments: vec![json!(uri), json!(decl.class_name), Value::Null],
                    }),
                    data: None,
                });
            }
            if decl.is_test_method {
                let member = match &decl.member_name {
                    Some(name) => json!(name),
                    None => Value::Null,
                };
                result.push(CodeLens {
                    range,
                    command: Some(Command {
                        title: "Run Test".to_string(),
                        command: TEST_RUN_COMMAND.to_string(),
                        arguments: vec![json!(uri), json!(decl.class_name), member],
                    }),
                    data: None,
                });
            }
            if !decl.is_test_class && !decl.is_test_method {
                // Left unresolved; the client calls back with this payload.
                result.push(CodeLens {
                    range,
                    command: None,
                    data: Some(vec![
                        json!(FIND_REFERENCES_COMMAND),
                        json!(uri),
                        json!(range.start.line),
                        json!(range.start.character),
                    ]),
                });
            }
        }
        Ok(result)
    }

    pub fn resolve_code_lens(&mut self, data: &[Value]) -> ServiceResult<Option<Command>> {
        // Lint anything opened since the last flush before the first lens
        // lights up.
        if !self.recently_opened.is_empty() {
            let uris = std::mem::take(&mut self.recently_opened);
            self.report_errors(&uris)?;
        }

        let Some((command, uri, line0, character0)) = parse_lens_data(data) else {
            warn!("Malformed code lens data {data:?}");
            return Ok(None);
        };
        if command != FIND_REFERENCES_COMMAND {
            warn!("Unexpected code lens command {command}");
            return Ok(None);
        }

        // Lens data is 0-based; the facility is 1-based. Convert here, once.
        let count = self.count_references(&uri, line0 + 1, character0 + 1)?;
        let title = match count {
            RefCount::Unknown => "? references".to_string(),
            RefCount::TooExpensive => "Find references".to_string(),
            RefCount::Exact(1) => "1 reference".to_string(),
            RefCount::Exact(n) => format!("{n} references"),
        };
        Ok(Some(Command {
            title,
            command: FIND_REFERENCES_COMMAND.to_string(),
            arguments: vec![json!(uri), json!(line0), json!(character0)],
        }))
    }

    pub(crate) fn count_references(
        &mut self,
        uri: &str,
        line1: u32,
        column1: u32,
    ) -> ServiceResult<RefCount> {
        // A new target file invalidates every cached index in one step.
        self.references.retarget(uri);

        let active = self.update_active_file(uri)?;
        let Some(el) = active.element_at(line1, column1) else {
            warn!("...no element at code lens");
            return Ok(RefCount::Unknown);
        };
        let ptr = Ptr::from_element(&el);

        let declarations = active.declarations();
        let signature: HashSet<Ptr> = declarations.iter().map(Ptr::from_element).collect();

        if self.references_need_update(&ptr, &signature) {
            info!("Count references to `{ptr}`...");
            let from_uris = {
                let compiler = self.facility()?;
                let mut candidates = compiler.potential_references(&el);
                candidates.remove(uri);
                candidates
            };
            if from_uris.len() > MAX_REFERENCE_FILES {
                info!(
                    "...there are {} potential references, which is too expensive to compile",
                    from_uris.len()
                );
                self.references
                    .by_target
                    .insert(ptr.clone(), RefSources::TooExpensive);
            } else {
                let list = self.index_references(&from_uris, uri, &signature)?;
                self.references
                    .by_target
                    .insert(ptr.clone(), RefSources::Files(list));
            }
        } else {
            info!("Using cached count references to `{ptr}`");
        }

        // The active file is always counted fresh.
        let mut count = active.index(&declarations).count(&ptr);
        match self.references.by_target.get(&ptr) {
            Some(RefSources::TooExpensive) => Ok(RefCount::TooExpensive),
            Some(RefSources::Files(from_uris)) => {
                for from in from_uris {
                    if let Some(entry) = self.references.by_source.get(from) {
                        count += entry.index.count(&ptr);
                    }
                }
                Ok(RefCount::Exact(count))
            }
            None => Ok(RefCount::Exact(count)),
        }
    }

    fn references_need_update(&self, ptr: &Ptr, signature: &HashSet<Ptr>) -> bool {
        match self.references.by_target.get(ptr) {
            None => true,
            Some(RefSources::TooExpensive) => false,
            Some(RefSources::Files(from_uris)) => from_uris
                .iter()
                .any(|from| self.index_needs_update(from, signature)),
        }
    }

    fn index_needs_update(&self, from_uri: &str, signature: &HashSet<Ptr>) -> bool {
        let Some(entry) = self.references.by_source.get(from_uri) else {
            return true;
        };
        if entry.version != self.store.version(from_uri) {
            info!("...{from_uri} needs to be re-indexed because it changed");
            return true;
        }
        if entry.index.has_errors() {
            info!("...{from_uri} needs to be re-indexed because it contains errors");
            return true;
        }
        if entry.index.needs_update(signature) {
            info!(
                "...{from_uri} needs to be re-indexed because it refers to a declaration that has changed"
            );
            return true;
        }
        false
    }

    /// Bring every out-of-date source index up to date in one batch compile,
    /// then report which candidates actually reference the target file.
    fn index_references(
        &mut self,
        from_uris: &HashSet<String>,
        to_uri: &str,
        signature: &HashSet<Ptr>,
    ) -> ServiceResult<Vec<String>> {
        let out_of_date: HashSet<String> = from_uris
            .iter()
            .filter(|from| self.index_needs_update(from, signature))
            .cloned()
            .collect();

        if out_of_date.is_empty() {
            info!("...all indexes are cached and up-to-date");
        } else {
            let versions: HashMap<String, i32> = out_of_date
                .iter()
                .map(|uri| (uri.clone(), self.store.version(uri)))
                .collect();
            let mut inputs: Vec<SourceInput> =
                out_of_date.iter().map(SourceInput::stored).collect();
            inputs.push(SourceInput::stored(to_uri));

            let Some(compiler) = self.compiler.as_deref() else {
                return Err(ServiceError::NoCompiler);
            };
            let batch = compiler.compile_batch(inputs);
            let targets = batch.declarations(to_uri);
            info!(
                "...search for references to {} elements in {} files",
                targets.len(),
                out_of_date.len()
            );
            for from in &out_of_date {
                let index = batch.index(from, &targets);
                self.references.by_source.insert(
                    from.clone(),
                    IndexEntry {
                        index,
                        version: versions[from],
                    },
                );
            }
        }

        Ok(from_uris
            .iter()
            .filter(|from| {
                self.references
                    .by_source
                    .get(*from)
                    .is_some_and(|entry| entry.index.total() > 0)
            })
            .cloned()
            .collect())
    }
}

fn parse_lens_data(data: &[Value]) -> Option<(String, String, u32, u32)> {
    let command = data.first()?.as_str()?.to_string();
    let uri = data.get(1)?.as_str()?.to_string();
    let line = u32::try_from(data.get(2)?.as_u64()?).ok()?;
    let character = u32::try_from(data.get(3)?.as_u64()?).ok()?;
    Some((command, uri, line, character))
}

#[cfg(test)]
#[path = "../tests/analysis/t_lens.rs"]
mod tests;
