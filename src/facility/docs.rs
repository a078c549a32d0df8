//! Doc-path lookup contracts.
//!
//! The facility locates the source file a pointer documents, parses it, and
//! hands back doc comments already rendered to Markdown (HTML conversion is
//! the facility's concern, not the dispatcher's).

use std::path::PathBuf;

use crate::facility::ptr::Ptr;

/// Handle to a source file on the documentation path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocFile(pub PathBuf);

/// Opaque handle to a tree inside a parsed doc file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocPath(pub usize);

/// Method declaration details as written in the doc source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDoc {
    pub return_type: String,
    pub name: String,
    pub params: Vec<MethodDocParam>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDocParam {
    pub name: String,
    pub type_name: String,
}

/// A doc comment attached to a tree, rendered to Markdown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocComment {
    pub first_sentence: String,
    /// `@param` tag bodies keyed by parameter name.
    pub params: Vec<(String, String)>,
}

pub trait Docs {
    fn find(&self, ptr: &Ptr) -> Option<DocFile>;
    fn parse(&self, file: &DocFile) -> Box<dyn DocParse + '_>;
}

pub trait DocParse {
    fn fuzzy_find(&self, ptr: &Ptr) -> Option<DocPath>;
    /// The tree at `path` viewed as a method declaration, if it is one.
    fn method(&self, path: DocPath) -> Option<MethodDoc>;
    fn doc(&self, path: DocPath) -> Option<DocComment>;
}
