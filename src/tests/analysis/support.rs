//! Programmable compiler-facility and client fakes for dispatcher tests.
//!
//! Tests configure a `FakeState`, build a service around it, and then drive
//! the public operations. Call counters expose how often the facility was
//! hit, which is what the cache-invalidation tests assert on.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;

use crate::analysis::client::EditorClient;
use crate::analysis::index::ReferenceIndex;
use crate::analysis::results::PublishedDiagnostic;
use crate::analysis::service::JavaLanguageService;
use crate::diag::{Position, Span};
use crate::facility::complete::{Completion, CompletionContext, MethodInvocation};
use crate::facility::docs::{DocComment, DocFile, DocParse, DocPath, Docs, MethodDoc};
use crate::facility::element::{Element, ElementKind};
use crate::facility::ptr::Ptr;
use crate::facility::trees::{Declaration, Folds, ImportLine, SymbolTree, TreePath};
use crate::facility::{
    BatchCompile, CompilerConfig, CompilerDiagnostic, CompilerFacility, FacilityHost, FileCompile,
    FocusCompile, Progress, SourceInput, SourceParse,
};

#[derive(Default, Clone)]
pub struct FakeParse {
    pub context: Option<CompletionContext>,
    pub symbols: Vec<SymbolTree>,
    pub declarations: Vec<Declaration>,
    pub folds: Folds,
}

#[derive(Default, Clone)]
pub struct FakeCompile {
    /// Elements by 1-based (line, column).
    pub elements: HashMap<(u32, u32), Element>,
    pub declarations: Vec<Element>,
    /// The file's own reference counts, reported through `index`.
    pub index_counts: HashMap<Ptr, usize>,
    pub overrides: Vec<Position>,
    pub fixed_imports: Vec<String>,
    pub imports: Vec<ImportLine>,
    pub package_line: Option<u32>,
}

#[derive(Default, Clone)]
pub struct FakeFocus {
    pub members: Vec<Completion>,
    pub identifiers: Vec<Completion>,
    pub annotations: Vec<Completion>,
    pub cases: Vec<Completion>,
    pub invocation: Option<MethodInvocation>,
}

#[derive(Default, Clone)]
pub struct FakeBatch {
    /// Elements by (uri, 1-based line, 1-based column).
    pub elements: HashMap<(String, u32, u32), Element>,
    /// Definition and reference paths keyed by pointer path.
    pub definitions: HashMap<String, Vec<TreePath>>,
    pub references: HashMap<String, Vec<TreePath>>,
    pub declarations: HashMap<String, Vec<Element>>,
    /// Per-source reference counts and error flags.
    pub indices: HashMap<String, (HashMap<Ptr, usize>, bool)>,
}

#[derive(Default, Clone)]
pub struct DocEntry {
    pub method: Option<MethodDoc>,
    pub comment: Option<DocComment>,
}

#[derive(Default)]
pub struct FakeState {
    pub parses: HashMap<String, FakeParse>,
    pub compiles: HashMap<String, FakeCompile>,
    pub focus: FakeFocus,
    pub potential_definitions: HashMap<String, HashSet<String>>,
    pub potential_references: HashMap<String, HashSet<String>>,
    pub batch: FakeBatch,
    pub symbols: Vec<SymbolTree>,
    pub errors: Vec<CompilerDiagnostic>,
    pub docs: HashMap<String, DocEntry>,
    pub parse_calls: usize,
    pub compile_calls: usize,
    pub focus_calls: usize,
    pub batch_calls: usize,
    pub batch_inputs: Vec<Vec<SourceInput>>,
    pub symbol_limits: Vec<usize>,
}

struct ParseSnapshot(FakeParse);

impl SourceParse for ParseSnapshot {
    fn document_symbols(&self) -> Vec<SymbolTree> {
        self.0.symbols.clone()
    }

    fn declarations(&self) -> Vec<Declaration> {
        self.0.declarations.clone()
    }

    fn folds(&self) -> Folds {
        self.0.folds.clone()
    }

    fn completion_context(&self, _line: u32, _column: u32) -> Option<CompletionContext> {
        self.0.context.clone()
    }
}

struct CompileSnapshot(FakeCompile);

impl FileCompile for CompileSnapshot {
    fn element_at(&self, line: u32, column: u32) -> Option<Element> {
        self.0.elements.get(&(line, column)).cloned()
    }

    fn declarations(&self) -> Vec<Element> {
        self.0.declarations.clone()
    }

    fn index(&self, targets: &[Element]) -> ReferenceIndex {
        let wanted: HashSet<Ptr> = targets.iter().map(Ptr::from_element).collect();
        let counts = self
            .0
            .index_counts
            .iter()
            .filter(|(ptr, _)| wanted.contains(ptr))
            .map(|(ptr, count)| (ptr.clone(), *count))
            .collect();
        ReferenceIndex::new(counts, false)
    }

    fn overrides_needed(&self) -> Vec<Position> {
        self.0.overrides.clone()
    }

    fn fixed_imports(&self) -> Vec<String> {
        self.0.fixed_imports.clone()
    }

    fn imports(&self) -> Vec<ImportLine> {
        self.0.imports.clone()
    }

    fn package_line(&self) -> Option<u32> {
        self.0.package_line
    }
}

struct FocusSnapshot(FakeFocus);

impl FocusCompile for FocusSnapshot {
    fn complete_members(&self, _after_method_reference: bool) -> Vec<Completion> {
        self.0.members.clone()
    }

    fn complete_identifiers(
        &self,
        _in_class: bool,
        _in_method: bool,
        partial_name: &str,
    ) -> Vec<Completion> {
        self.0
            .identifiers
            .iter()
            .filter(|c| match c {
                Completion::Element(el) => el.name.starts_with(partial_name),
                _ => true,
            })
            .cloned()
            .collect()
    }

    fn complete_annotations(&self, _partial_name: &str) -> Vec<Completion> {
        self.0.annotations.clone()
    }

    fn complete_cases(&self) -> Vec<Completion> {
        self.0.cases.clone()
    }

    fn method_invocation(&self) -> Option<MethodInvocation> {
        self.0.invocation.clone()
    }
}

struct BatchSnapshot(FakeBatch);

impl BatchCompile for BatchSnapshot {
    fn element_at(&self, uri: &str, line: u32, column: u32) -> Option<Element> {
        self.0
            .elements
            .get(&(uri.to_string(), line, column))
            .cloned()
    }

    fn definitions(&self, el: &Element) -> Option<Vec<TreePath>> {
        self.0
            .definitions
            .get(Ptr::from_element(el).path())
            .cloned()
    }

    fn references(&self, el: &Element) -> Option<Vec<TreePath>> {
        self.0
            .references
            .get(Ptr::from_element(el).path())
            .cloned()
    }

    fn declarations(&self, uri: &str) -> Vec<Element> {
        self.0.declarations.get(uri).cloned().unwrap_or_default()
    }

    fn index(&self, uri: &str, targets: &[Element]) -> ReferenceIndex {
        let wanted: HashSet<Ptr> = targets.iter().map(Ptr::from_element).collect();
        let (counts, has_errors) = self.0.indices.get(uri).cloned().unwrap_or_default();
        let counts = counts
            .into_iter()
            .filter(|(ptr, _)| wanted.contains(ptr))
            .collect();
        ReferenceIndex::new(counts, has_errors)
    }
}

pub struct FakeDocs {
    state: Rc<RefCell<FakeState>>,
}

impl Docs for FakeDocs {
    fn find(&self, ptr: &Ptr) -> Option<DocFile> {
        let state = self.state.borrow();
        if state.docs.contains_key(ptr.path()) {
            Some(DocFile(PathBuf::from(format!("/docs/{}", ptr.path()))))
        } else {
            None
        }
    }

    fn parse(&self, _file: &DocFile) -> Box<dyn DocParse + '_> {
        let state = self.state.borrow();
        let mut keys: Vec<String> = state.docs.keys().cloned().collect();
        keys.sort();
        Box::new(DocParseSnapshot {
            entries: state.docs.clone(),
            keys,
        })
    }
}

struct DocParseSnapshot {
    entries: HashMap<String, DocEntry>,
    keys: Vec<String>,
}

impl DocParse for DocParseSnapshot {
    fn fuzzy_find(&self, ptr: &Ptr) -> Option<DocPath> {
        self.keys
            .iter()
            .position(|key| key == ptr.path())
            .map(DocPath)
    }

    fn method(&self, path: DocPath) -> Option<MethodDoc> {
        let key = self.keys.get(path.0)?;
        self.entries.get(key)?.method.clone()
    }

    fn doc(&self, path: DocPath) -> Option<DocComment> {
        let key = self.keys.get(path.0)?;
        self.entries.get(key)?.comment.clone()
    }
}

pub struct FakeFacility {
    state: Rc<RefCell<FakeState>>,
    docs: FakeDocs,
}

impl FakeFacility {
    pub fn new(state: Rc<RefCell<FakeState>>) -> Self {
        Self {
            docs: FakeDocs {
                state: Rc::clone(&state),
            },
            state,
        }
    }
}

impl CompilerFacility for FakeFacility {
    fn parse_file(&self, uri: &str) -> Arc<dyn SourceParse> {
        let mut state = self.state.borrow_mut();
        state.parse_calls += 1;
        Arc::new(ParseSnapshot(
            state.parses.get(uri).cloned().unwrap_or_default(),
        ))
    }

    fn compile_file(&self, uri: &str) -> Arc<dyn FileCompile> {
        let mut state = self.state.borrow_mut();
        state.compile_calls += 1;
        Arc::new(CompileSnapshot(
            state.compiles.get(uri).cloned().unwrap_or_default(),
        ))
    }

    fn compile_focus(&self, _uri: &str, _line: u32, _column: u32) -> Box<dyn FocusCompile> {
        let mut state = self.state.borrow_mut();
        state.focus_calls += 1;
        Box::new(FocusSnapshot(state.focus.clone()))
    }

    fn compile_batch(&self, sources: Vec<SourceInput>) -> Box<dyn BatchCompile> {
        let mut state = self.state.borrow_mut();
        state.batch_calls += 1;
        state.batch_inputs.push(sources);
        Box::new(BatchSnapshot(state.batch.clone()))
    }

    fn potential_definitions(&self, el: &Element) -> HashSet<String> {
        self.state
            .borrow()
            .potential_definitions
            .get(&el.name)
            .cloned()
            .unwrap_or_default()
    }

    fn potential_references(&self, el: &Element) -> HashSet<String> {
        self.state
            .borrow()
            .potential_references
            .get(&el.name)
            .cloned()
            .unwrap_or_default()
    }

    fn find_symbols(&self, _query: &str, limit: usize) -> Vec<SymbolTree> {
        let mut state = self.state.borrow_mut();
        state.symbol_limits.push(limit);
        state.symbols.iter().take(limit).cloned().collect()
    }

    fn report_errors(&self, _uris: &[String]) -> Vec<CompilerDiagnostic> {
        self.state.borrow().errors.clone()
    }

    fn docs(&self) -> &dyn Docs {
        &self.docs
    }
}

pub struct FakeHost {
    pub state: Rc<RefCell<FakeState>>,
    pub creations: Rc<RefCell<usize>>,
}

impl FacilityHost for FakeHost {
    fn create(
        &self,
        config: &CompilerConfig,
        progress: &mut dyn Progress,
    ) -> Box<dyn CompilerFacility> {
        *self.creations.borrow_mut() += 1;
        if config.class_path.is_empty() {
            progress.report("Inferring class path");
            progress.report("Inferring doc path");
        }
        Box::new(FakeFacility::new(Rc::clone(&self.state)))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    Publish {
        uri: String,
        diagnostics: Vec<PublishedDiagnostic>,
    },
    RegisterWatch(String),
    StartProgress(String),
    ReportProgress(String),
    EndProgress,
}

pub struct RecordingClient {
    pub events: Rc<RefCell<Vec<ClientEvent>>>,
}

impl EditorClient for RecordingClient {
    fn publish_diagnostics(&mut self, uri: &str, diagnostics: Vec<PublishedDiagnostic>) {
        self.events.borrow_mut().push(ClientEvent::Publish {
            uri: uri.to_string(),
            diagnostics,
        });
    }

    fn register_watched_files(&mut self, glob: &str) {
        self.events
            .borrow_mut()
            .push(ClientEvent::RegisterWatch(glob.to_string()));
    }

    fn start_progress(&mut self, title: &str) {
        self.events
            .borrow_mut()
            .push(ClientEvent::StartProgress(title.to_string()));
    }

    fn report_progress(&mut self, message: &str) {
        self.events
            .borrow_mut()
            .push(ClientEvent::ReportProgress(message.to_string()));
    }

    fn end_progress(&mut self) {
        self.events.borrow_mut().push(ClientEvent::EndProgress);
    }
}

pub struct Fixture {
    pub service: JavaLanguageService,
    pub state: Rc<RefCell<FakeState>>,
    pub events: Rc<RefCell<Vec<ClientEvent>>>,
    pub creations: Rc<RefCell<usize>>,
}

impl Fixture {
    pub fn publishes(&self) -> Vec<(String, usize)> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                ClientEvent::Publish { uri, diagnostics } => {
                    Some((uri.clone(), diagnostics.len()))
                }
                _ => None,
            })
            .collect()
    }

    pub fn clear_events(&self) {
        self.events.borrow_mut().clear();
    }
}

/// A service wired to empty fakes, before `initialize`/`initialized`.
pub fn uninitialized_fixture() -> Fixture {
    let state = Rc::new(RefCell::new(FakeState::default()));
    let events = Rc::new(RefCell::new(Vec::new()));
    let creations = Rc::new(RefCell::new(0));
    let host = FakeHost {
        state: Rc::clone(&state),
        creations: Rc::clone(&creations),
    };
    let client = RecordingClient {
        events: Rc::clone(&events),
    };
    let service = JavaLanguageService::new(Box::new(host), Box::new(client));
    Fixture {
        service,
        state,
        events,
        creations,
    }
}

/// An initialized service wired to empty fakes.
pub fn fixture() -> Fixture {
    let mut fx = uninitialized_fixture();
    fx.service.initialize(PathBuf::from("/workspace"));
    fx.service.initialized();
    fx.events.borrow_mut().clear();
    fx
}

pub fn span(start_line: u32, start_column: u32, end_line: u32, end_column: u32) -> Span {
    Span::new(
        Position::new(start_line, start_column),
        Position::new(end_line, end_column),
    )
}

pub fn class_element(package: &str, name: &str) -> Element {
    Element {
        kind: ElementKind::Class,
        name: name.to_string(),
        package: package.to_string(),
        owners: Vec::new(),
        type_name: name.to_string(),
        super_type: None,
        return_type: None,
        params: Vec::new(),
        erased_params: Vec::new(),
        members: Vec::new(),
    }
}

pub fn method_element(package: &str, owner: &str, name: &str) -> Element {
    Element {
        kind: ElementKind::Method,
        name: name.to_string(),
        package: package.to_string(),
        owners: vec![owner.to_string()],
        type_name: String::new(),
        super_type: None,
        return_type: Some("void".to_string()),
        params: Vec::new(),
        erased_params: Vec::new(),
        members: Vec::new(),
    }
}

pub fn field_element(package: &str, owner: &str, name: &str, type_name: &str) -> Element {
    Element {
        kind: ElementKind::Field,
        name: name.to_string(),
        package: package.to_string(),
        owners: vec![owner.to_string()],
        type_name: type_name.to_string(),
        super_type: None,
        return_type: None,
        params: Vec::new(),
        erased_params: Vec::new(),
        members: Vec::new(),
    }
}
