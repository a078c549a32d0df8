//! Single-entry compilation caches keyed by `(uri, version)`.
//!
//! Both caches hold exactly one file: queries hop between files rarely
//! compared to how often they repeat on the focused one, and the compiler
//! facility is expensive enough that even a one-slot cache pays for itself.

use std::sync::Arc;

use tracing::info;

use crate::facility::{CompilerFacility, FileCompile, SourceParse};
use crate::store::FileStore;

#[derive(Default)]
pub(crate) struct ParseCache {
    uri: String,
    version: i32,
    parse: Option<Arc<dyn SourceParse>>,
}

impl ParseCache {
    pub fn get(
        &mut self,
        compiler: &dyn CompilerFacility,
        store: &FileStore,
        uri: &str,
    ) -> Arc<dyn SourceParse> {
        let version = store.version(uri);
        if self.uri == uri && self.version == version {
            if let Some(parse) = &self.parse {
                return Arc::clone(parse);
            }
        }
        info!("Updating cached parse file to {uri}");
        let parse = compiler.parse_file(uri);
        self.uri = uri.to_string();
        self.version = version;
        self.parse = Some(Arc::clone(&parse));
        parse
    }

    pub fn clear(&mut self) {
        self.parse = None;
    }
}

#[derive(Default)]
pub(crate) struct ActiveFileCache {
    uri: String,
    version: i32,
    compile: Option<Arc<dyn FileCompile>>,
}

impl ActiveFileCache {
    pub fn get(
        &mut self,
        compiler: &dyn CompilerFacility,
        store: &FileStore,
        uri: &str,
    ) -> Arc<dyn FileCompile> {
        let version = store.version(uri);
        if self.uri == uri && self.version == version {
            if let Some(compile) = &self.compile {
                return Arc::clone(compile);
            }
        }
        info!("Recompile active file {uri}...");
        let compile = compiler.compile_file(uri);
        self.uri = uri.to_string();
        self.version = version;
        self.compile = Some(Arc::clone(&compile));
        compile
    }

    pub fn clear(&mut self) {
        self.compile = None;
    }
}
