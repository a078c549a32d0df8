//! Go-to-definition and find-references over pruned batch compilations.
//!
//! Both walk the same road: resolve the element in the active file, ask the
//! facility which files *might* matter, prune those files down to the lines
//! that touch the element's name, batch-compile the pruned set, re-resolve
//! the element inside the batch, and collect spans.

use std::collections::HashSet;

use tracing::{info, warn};

use crate::analysis::prune::prune;
use crate::analysis::results::{Location, Range};
use crate::analysis::service::{JavaLanguageService, ServiceResult};
use crate::facility::SourceInput;
use crate::facility::element::{CONSTRUCTOR_NAME, Element};
use crate::facility::trees::TreePath;
use crate::store::FileStore;

impl JavaLanguageService {
    pub fn goto_definition(
        &mut self,
        uri: &str,
        line: u32,
        character: u32,
    ) -> ServiceResult<Option<Vec<Location>>> {
        if !FileStore::is_java_file(uri) {
            return Ok(None);
        }
        let line1 = line + 1;
        let column1 = character + 1;
        info!("Go-to-def at {uri}:{line1}...");

        let active = self.update_active_file(uri)?;
        let Some(el) = active.element_at(line1, column1) else {
            info!("...no element at cursor");
            return Ok(None);
        };

        let compiler = self.facility()?;
        let mut files = compiler.potential_definitions(&el);
        files.insert(uri.to_string());
        let sources = self.prune_word(&files, &el);
        let batch = compiler.compile_batch(sources);

        // Re-resolve so we hold an element from the current batch.
        let Some(el_again) = batch.element_at(uri, line1, column1) else {
            warn!("...couldn't resolve the element inside the batch");
            return Ok(None);
        };
        let Some(paths) = batch.definitions(&el_again) else {
            return Ok(None);
        };
        Ok(Some(locations(paths)))
    }

    pub fn find_references(
        &mut self,
        uri: &str,
        line: u32,
        character: u32,
    ) -> ServiceResult<Option<Vec<Location>>> {
        if !FileStore::is_java_file(uri) {
            return Ok(None);
        }
        let line1 = line + 1;
        let column1 = character + 1;
        info!("Looking for references to {uri}({line1},{column1})...");

        let active = self.update_active_file(uri)?;
        let Some(el) = active.element_at(line1, column1) else {
            warn!("...no element under cursor");
            return Ok(None);
        };

        let compiler = self.facility()?;
        let mut files = compiler.potential_references(&el);
        files.insert(uri.to_string());
        let sources = self.prune_word(&files, &el);
        let batch = compiler.compile_batch(sources);

        let Some(el_again) = batch.element_at(uri, line1, column1) else {
            warn!("...couldn't resolve the element inside the batch");
            return Ok(None);
        };
        let Some(paths) = batch.references(&el_again) else {
            return Ok(None);
        };
        Ok(Some(locations(paths)))
    }

    /// Prune every file down to regions touching the element's simple name,
    /// or the enclosing type name for constructors.
    pub(crate) fn prune_word(
        &self,
        files: &HashSet<String>,
        el: &Element,
    ) -> Vec<SourceInput> {
        let name = if el.name == CONSTRUCTOR_NAME {
            el.enclosing_simple_name().unwrap_or(CONSTRUCTOR_NAME)
        } else {
            &el.name
        };
        let mut sources = Vec::with_capacity(files.len());
        for uri in files {
            match self.store.contents(uri) {
                Ok(content) => sources.push(SourceInput::pruned(uri.clone(), prune(&content, name))),
                Err(error) => warn!("Couldn't read {uri}: {error}"),
            }
        }
        sources
    }
}

fn locations(paths: Vec<TreePath>) -> Vec<Location> {
    let mut result = Vec::with_capacity(paths.len());
    for path in paths {
        let Some(span) = path.span else {
            warn!("Couldn't locate `{}`", path.name);
            continue;
        };
        result.push(Location {
            uri: path.uri,
            range: Range::from_span(span),
        });
    }
    result
}

#[cfg(test)]
#[path = "../tests/analysis/t_navigate.rs"]
mod tests;
