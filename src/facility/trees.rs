//! Structural query results: symbol paths, declarations, folds.
//!
//! These are produced by the parse-only pass and by batch compilations. They
//! carry source spans in facility coordinates (1-based).

use crate::diag::Span;

/// A located tree node inside some compilation, as returned by batch
/// definition and reference searches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreePath {
    pub uri: String,
    /// Printable leaf description, used in log messages only.
    pub name: String,
    /// Source span of the leaf, when the compiler can locate it.
    pub span: Option<Span>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolTreeKind {
    AnnotationType,
    Class,
    Enum,
    Interface,
    Method,
    TypeParameter,
    Variable,
}

/// One entry of a document- or workspace-symbol listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolTree {
    pub name: String,
    pub kind: SymbolTreeKind,
    /// Enclosing class simple name, or package name for top-level symbols.
    pub container: Option<String>,
    pub uri: String,
    pub span: Span,
}

/// A top-level or nested declaration eligible for a code lens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub span: Option<Span>,
    pub class_name: String,
    pub member_name: Option<String>,
    pub is_test_class: bool,
    pub is_test_method: bool,
}

/// Foldable regions grouped by category. Class spans get both the `{` anchor
/// adjustment and the end-line trim; plain blocks get only the trim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Folds {
    pub imports: Vec<Span>,
    pub classes: Vec<Span>,
    pub blocks: Vec<Span>,
    pub comments: Vec<Span>,
}

/// An existing import declaration in the active file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportLine {
    /// 1-based line of the declaration.
    pub line: u32,
    pub is_static: bool,
}
