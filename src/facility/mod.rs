//! Contracts for the underlying Java compiler engine.
//!
//! The dispatcher drives everything through these traits; the engine itself
//! (javac bindings, classpath discovery, doc-path indexing) lives in another
//! crate. Every compilation product is an immutable snapshot: the dispatcher
//! keys it by `(uri, version)` and consumers borrow it for the duration of a
//! single request.

pub mod complete;
pub mod docs;
pub mod element;
pub mod ptr;
pub mod trees;

use std::collections::{BTreeSet, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

use crate::analysis::index::ReferenceIndex;
use crate::diag::Position;
use crate::facility::complete::{Completion, CompletionContext, MethodInvocation};
use crate::facility::docs::Docs;
use crate::facility::element::Element;
use crate::facility::trees::{Declaration, Folds, ImportLine, SymbolTree, TreePath};

/// One input to a batch compilation. `content` overrides the file store when
/// the source has been pruned; `None` compiles the stored text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceInput {
    pub uri: String,
    pub content: Option<String>,
}

impl SourceInput {
    pub fn stored(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            content: None,
        }
    }

    pub fn pruned(uri: impl Into<String>, content: String) -> Self {
        Self {
            uri: uri.into(),
            content: Some(content),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    Error,
    Warning,
    MandatoryWarning,
    Note,
    Other,
}

/// A diagnostic as reported by the compiler, positioned by byte offsets into
/// the source it was produced from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerDiagnostic {
    /// Source URI; `None` for diagnostics with no attributable source.
    pub source: Option<String>,
    pub kind: DiagnosticKind,
    pub code: String,
    pub message: String,
    pub start_offset: usize,
    pub end_offset: usize,
}

/// Syntactic products of a one-file parse.
pub trait SourceParse {
    fn document_symbols(&self) -> Vec<SymbolTree>;
    fn declarations(&self) -> Vec<Declaration>;
    fn folds(&self) -> Folds;
    fn completion_context(&self, line: u32, column: u32) -> Option<CompletionContext>;
}

/// Semantic products of a one-file type-checked compilation.
pub trait FileCompile {
    fn element_at(&self, line: u32, column: u32) -> Option<Element>;
    /// Top-level and nested declaration elements of the file.
    fn declarations(&self) -> Vec<Element>;
    /// Reference index of this file against `targets`.
    fn index(&self, targets: &[Element]) -> ReferenceIndex;
    /// Start positions of methods missing an `@Override` annotation.
    fn overrides_needed(&self) -> Vec<Position>;
    /// The complete set of imports the file should have, in emit order.
    fn fixed_imports(&self) -> Vec<String>;
    fn imports(&self) -> Vec<ImportLine>;
    /// 1-based line of the package declaration, if present.
    fn package_line(&self) -> Option<u32>;
}

/// A point-anchored compilation, just enough context to answer a completion
/// or signature-help query.
pub trait FocusCompile {
    fn complete_members(&self, after_method_reference: bool) -> Vec<Completion>;
    fn complete_identifiers(
        &self,
        in_class: bool,
        in_method: bool,
        partial_name: &str,
    ) -> Vec<Completion>;
    fn complete_annotations(&self, partial_name: &str) -> Vec<Completion>;
    fn complete_cases(&self) -> Vec<Completion>;
    fn method_invocation(&self) -> Option<MethodInvocation>;
}

/// A multi-file compilation over (possibly pruned) inputs.
pub trait BatchCompile {
    fn element_at(&self, uri: &str, line: u32, column: u32) -> Option<Element>;
    fn definitions(&self, el: &Element) -> Option<Vec<TreePath>>;
    fn references(&self, el: &Element) -> Option<Vec<TreePath>>;
    fn declarations(&self, uri: &str) -> Vec<Element>;
    fn index(&self, uri: &str, targets: &[Element]) -> ReferenceIndex;
}

pub trait CompilerFacility {
    fn parse_file(&self, uri: &str) -> Arc<dyn SourceParse>;
    fn compile_file(&self, uri: &str) -> Arc<dyn FileCompile>;
    fn compile_focus(&self, uri: &str, line: u32, column: u32) -> Box<dyn FocusCompile>;
    fn compile_batch(&self, sources: Vec<SourceInput>) -> Box<dyn BatchCompile>;
    /// URIs that might contain definitions of `el`, from indexing heuristics.
    fn potential_definitions(&self, el: &Element) -> HashSet<String>;
    /// URIs that might contain references to `el`, from indexing heuristics.
    fn potential_references(&self, el: &Element) -> HashSet<String>;
    fn find_symbols(&self, query: &str, limit: usize) -> Vec<SymbolTree>;
    fn report_errors(&self, uris: &[String]) -> Vec<CompilerDiagnostic>;
    fn docs(&self) -> &dyn Docs;
}

/// Inputs to facility construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompilerConfig {
    pub workspace_root: PathBuf,
    /// Absolute classpath entries supplied by the client; when empty, the
    /// host infers a classpath from the workspace and `external_dependencies`.
    pub class_path: BTreeSet<PathBuf>,
    /// Maven-style coordinates to resolve when inferring.
    pub external_dependencies: BTreeSet<String>,
}

/// Sink for progress messages emitted while a facility is being built.
pub trait Progress {
    fn report(&mut self, message: &str);
}

/// Builds compiler facilities. Construction may be slow (classpath and doc
/// path inference); intermediate steps are reported through `progress`.
pub trait FacilityHost {
    fn create(
        &self,
        config: &CompilerConfig,
        progress: &mut dyn Progress,
    ) -> Box<dyn CompilerFacility>;
}
