//! The query dispatcher.
//!
//! One `JavaLanguageService` serves one editor session. It owns the file
//! store, the compiler facility, and every derived cache, and it processes
//! one request to completion before the next one starts, so no request ever
//! observes a partially updated cache. Edit notifications mutate the store
//! immediately but compile nothing; compilation happens lazily on the next
//! read query.

use std::collections::{BTreeSet, HashMap};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::analysis::caches::{ActiveFileCache, ParseCache};
use crate::analysis::client::{ClientProgress, EditorClient};
use crate::analysis::index::ReferenceCache;
use crate::facility::complete::Completion;
use crate::facility::{
    CompilerConfig, CompilerFacility, FacilityHost, FileCompile, SourceParse,
};
use crate::store::{ContentChange, FileStore, uri_to_path};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("compiler facility is not initialized")]
    NoCompiler,
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchEventKind {
    Created,
    Changed,
    Deleted,
}

pub struct JavaLanguageService {
    pub(crate) store: FileStore,
    pub(crate) client: Box<dyn EditorClient>,
    host: Box<dyn FacilityHost>,
    pub(crate) compiler: Option<Box<dyn CompilerFacility>>,
    workspace_root: Option<PathBuf>,
    class_path: BTreeSet<PathBuf>,
    external_dependencies: BTreeSet<String>,
    pub(crate) parse_cache: ParseCache,
    pub(crate) active_cache: ActiveFileCache,
    /// Completion data from the last completion request, keyed by the opaque
    /// identifier carried in each reply item.
    pub(crate) completions: HashMap<String, Completion>,
    pub(crate) references: ReferenceCache,
    /// Documents opened since the last lint, flushed at code-lens resolution.
    pub(crate) recently_opened: Vec<String>,
}

impl JavaLanguageService {
    pub fn new(host: Box<dyn FacilityHost>, client: Box<dyn EditorClient>) -> Self {
        Self {
            store: FileStore::new(),
            client,
            host,
            compiler: None,
            workspace_root: None,
            class_path: BTreeSet::new(),
            external_dependencies: BTreeSet::new(),
            parse_cache: ParseCache::default(),
            active_cache: ActiveFileCache::default(),
            completions: HashMap::new(),
            references: ReferenceCache::default(),
            recently_opened: Vec::new(),
        }
    }

    pub fn initialize(&mut self, workspace_root: PathBuf) {
        self.store
            .set_workspace_roots([workspace_root.clone()].into_iter().collect());
        self.workspace_root = Some(workspace_root);
    }

    pub fn initialized(&mut self) {
        let compiler = self.create_compiler();
        self.compiler = Some(compiler);
        self.client.register_watched_files("**/*.java");
    }

    pub fn shutdown(&mut self) {}

    /// Any change to the dependency coordinates rebuilds the facility; a
    /// stale classpath would silently poison every later query.
    pub fn set_external_dependencies(&mut self, deps: BTreeSet<String>) {
        let changed = self.external_dependencies != deps;
        self.external_dependencies = deps;
        if changed && self.compiler.is_some() {
            self.rebuild_compiler();
        }
    }

    pub fn set_class_path(&mut self, class_path: BTreeSet<PathBuf>) {
        let changed = self.class_path != class_path;
        self.class_path = class_path;
        if changed && self.compiler.is_some() {
            self.rebuild_compiler();
        }
    }

    fn create_compiler(&mut self) -> Box<dyn CompilerFacility> {
        let config = CompilerConfig {
            workspace_root: self.workspace_root.clone().unwrap_or_default(),
            class_path: self.class_path.clone(),
            external_dependencies: self.external_dependencies.clone(),
        };
        self.client.start_progress("Configure javac");
        self.client.report_progress("Finding source roots");
        let facility = {
            let mut progress = ClientProgress(self.client.as_mut());
            self.host.create(&config, &mut progress)
        };
        self.client.end_progress();
        facility
    }

    /// Replace the facility and drop every derived cache: a new facility
    /// means new element identities, so nothing cached is comparable.
    fn rebuild_compiler(&mut self) {
        info!("Rebuilding compiler facility...");
        let compiler = self.create_compiler();
        self.compiler = Some(compiler);
        self.parse_cache.clear();
        self.active_cache.clear();
        self.completions.clear();
        self.references.clear();
    }

    pub fn did_open(&mut self, uri: &str, text: String, version: i32) {
        self.store.open(uri, text, version);
        self.recently_opened.push(uri.to_string());
        // Warm the parse cache so the document-symbol and code-lens requests
        // that follow an open are fast.
        if FileStore::is_java_file(uri) && self.compiler.is_some() {
            let _ = self.update_parse(uri);
        }
    }

    pub fn did_change(&mut self, uri: &str, version: i32, changes: Vec<ContentChange>) {
        self.store.change(uri, version, changes);
    }

    pub fn did_close(&mut self, uri: &str) {
        self.store.close(uri);
        if FileStore::is_java_file(uri) {
            // Clear stale markers.
            self.client.publish_diagnostics(uri, Vec::new());
        }
    }

    pub fn did_save(&mut self, uri: &str) -> ServiceResult<()> {
        if FileStore::is_java_file(uri) {
            let uris = self.store.active_documents();
            self.report_errors(&uris)?;
        }
        Ok(())
    }

    pub fn did_change_watched_file(&mut self, uri: &str, kind: WatchEventKind) {
        if !FileStore::is_java_file(uri) {
            return;
        }
        let Some(path) = uri_to_path(uri) else {
            return;
        };
        match kind {
            WatchEventKind::Created => self.store.external_create(&path),
            WatchEventKind::Changed => self.store.external_change(&path),
            WatchEventKind::Deleted => self.store.external_delete(&path),
        }
    }

    pub fn workspace_root(&self) -> Option<&Path> {
        self.workspace_root.as_deref()
    }

    pub(crate) fn report_errors(&mut self, uris: &[String]) -> ServiceResult<()> {
        let Some(compiler) = self.compiler.as_deref() else {
            return Err(ServiceError::NoCompiler);
        };
        let messages = compiler.report_errors(uris);
        crate::analysis::diagnostics::publish_diagnostics(
            &self.store,
            self.client.as_mut(),
            uris,
            messages,
        );
        Ok(())
    }

    pub(crate) fn update_parse(&mut self, uri: &str) -> ServiceResult<Arc<dyn SourceParse>> {
        let Some(compiler) = self.compiler.as_deref() else {
            return Err(ServiceError::NoCompiler);
        };
        Ok(self.parse_cache.get(compiler, &self.store, uri))
    }

    pub(crate) fn update_active_file(&mut self, uri: &str) -> ServiceResult<Arc<dyn FileCompile>> {
        let Some(compiler) = self.compiler.as_deref() else {
            return Err(ServiceError::NoCompiler);
        };
        Ok(self.active_cache.get(compiler, &self.store, uri))
    }

    pub(crate) fn facility(&self) -> ServiceResult<&dyn CompilerFacility> {
        self.compiler.as_deref().ok_or(ServiceError::NoCompiler)
    }
}

#[cfg(test)]
#[path = "../tests/analysis/t_service.rs"]
mod tests;
