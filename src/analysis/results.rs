//! Reply shapes the dispatcher hands to the protocol layer.
//!
//! Everything here is protocol-ready: positions are 0-based and semantic
//! kinds are closed enums the transport maps to wire integers. These objects
//! are plain data so the handler layer can render them without touching the
//! dispatcher again.

use serde_json::Value;

use crate::diag::Span;

/// 0-based protocol position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// 0-based protocol range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Convert a facility span (1-based) into protocol coordinates.
    pub fn from_span(span: Span) -> Self {
        Self {
            start: Position::new(span.start.line.saturating_sub(1), span.start.column.saturating_sub(1)),
            end: Position::new(span.end.line.saturating_sub(1), span.end.column.saturating_sub(1)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub uri: String,
    pub range: Range,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionItemKind {
    Class,
    Constructor,
    Enum,
    EnumMember,
    Field,
    Function,
    Interface,
    Keyword,
    Method,
    Module,
    Property,
    Snippet,
    TypeParameter,
    Variable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertTextFormat {
    PlainText,
    Snippet,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionItem {
    pub label: String,
    pub kind: Option<CompletionItemKind>,
    pub detail: Option<String>,
    pub sort_text: Option<String>,
    pub insert_text: Option<String>,
    pub insert_text_format: Option<InsertTextFormat>,
    /// Opaque identifier resolving back into the completion cache.
    pub data: Option<String>,
}

impl CompletionItem {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            kind: None,
            detail: None,
            sort_text: None,
            insert_text: None,
            insert_text_format: None,
            data: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionReply {
    pub is_incomplete: bool,
    pub items: Vec<CompletionItem>,
}

/// Fields `completionItem/resolve` fills in on a cache hit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionResolution {
    pub detail: Option<String>,
    /// Markdown documentation.
    pub documentation: Option<String>,
}

/// One hover segment: plain Markdown, or fenced code when `language` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkedString {
    pub language: Option<String>,
    pub value: String,
}

impl MarkedString {
    pub fn plain(value: impl Into<String>) -> Self {
        Self {
            language: None,
            value: value.into(),
        }
    }

    pub fn code(language: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            language: Some(language.into()),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterInformation {
    pub label: String,
    /// Markdown documentation.
    pub documentation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureInformation {
    pub label: String,
    pub parameters: Vec<ParameterInformation>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHelpReply {
    pub signatures: Vec<SignatureInformation>,
    pub active_signature: usize,
    pub active_parameter: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Class,
    Enum,
    Field,
    Interface,
    Method,
    TypeParameter,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolInformation {
    pub name: String,
    pub kind: SymbolKind,
    pub container_name: Option<String>,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub title: String,
    pub command: String,
    pub arguments: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeLens {
    pub range: Range,
    pub command: Option<Command>,
    /// Unresolved lens payload, echoed back by the client at resolve time.
    pub data: Option<Vec<Value>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub range: Range,
    pub new_text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoldingRangeKind {
    Comment,
    Imports,
    Region,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoldingRange {
    pub start_line: u32,
    pub start_character: u32,
    pub end_line: u32,
    pub end_character: u32,
    pub kind: FoldingRangeKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Information,
    Hint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticTag {
    Unnecessary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedDiagnostic {
    pub range: Range,
    pub severity: Severity,
    pub code: String,
    pub message: String,
    pub tags: Vec<DiagnosticTag>,
}
