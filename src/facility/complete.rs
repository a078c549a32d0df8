//! Completion-context classification and completion data.

use crate::facility::element::Element;

/// What kind of completion the cursor position calls for, as classified by
/// the parse-only pass. A position with no classification (inside a blank
/// compilation unit body, say) gets top-level keywords only; the dispatcher
/// models that as `Option::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextKind {
    /// After `.`
    MemberSelect,
    /// After `::`
    MemberReference,
    /// A partial bare identifier.
    Identifier,
    /// After `@`
    Annotation,
    /// A `case` label inside a switch.
    Case,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionContext {
    pub kind: ContextKind,
    /// 1-based position the focus compile should anchor on.
    pub line: u32,
    pub character: u32,
    pub partial_name: String,
    pub in_class: bool,
    pub in_method: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagePart {
    pub name: String,
    pub full_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassName {
    /// Fully qualified name.
    pub name: String,
    pub is_imported: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    pub label: String,
    pub snippet: String,
}

/// One completion datum. Exactly one shape per candidate; the enum being
/// closed is what lets the dispatcher match exhaustively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Element(Element),
    PackagePart(PackagePart),
    Keyword(String),
    ClassName(ClassName),
    Snippet(Snippet),
}

/// The invocation surrounding the cursor, for signature help.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodInvocation {
    /// Candidate overloads, in the compiler's preference order.
    pub overloads: Vec<Element>,
    /// The overload the compiler resolved the call to, if any.
    pub active_method: Option<Element>,
    /// 0-based index of the argument the cursor is inside.
    pub active_parameter: usize,
}
