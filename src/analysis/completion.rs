//! Completion and completion-item resolution.
//!
//! The parse-only pass classifies the cursor position; the focus compile
//! produces candidates for that classification. Reply items carry a fresh
//! opaque identifier whose datum is stashed in the completion cache, and the
//! cache is replaced wholesale on the next completion request, so a resolve
//! always sees the data of the most recent completion.

use std::time::Instant;

use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::results::{
    CompletionItem, CompletionItemKind, CompletionReply, CompletionResolution, InsertTextFormat,
};
use crate::analysis::service::{JavaLanguageService, ServiceResult};
use crate::facility::complete::{Completion, ContextKind};
use crate::facility::docs::Docs;
use crate::facility::element::{Element, ElementKind};
use crate::facility::ptr::Ptr;
use crate::store::FileStore;

/// Ceiling for identifier and annotation completions; reaching it marks the
/// reply incomplete so the client re-queries as the user types.
pub const MAX_COMPLETION_ITEMS: usize = 200;

/// Keywords offered when the cursor has no completion context at all.
pub const TOP_LEVEL_KEYWORDS: &[&str] = &[
    "package",
    "import",
    "public",
    "private",
    "protected",
    "abstract",
    "final",
    "class",
    "interface",
    "enum",
    "@interface",
    "extends",
    "implements",
];

impl JavaLanguageService {
    pub fn completion(
        &mut self,
        uri: &str,
        line: u32,
        character: u32,
    ) -> ServiceResult<Option<CompletionReply>> {
        if !FileStore::is_java_file(uri) {
            return Ok(None);
        }
        let started = Instant::now();
        let line1 = line + 1;
        let column1 = character + 1;
        info!("Complete at {uri}({line1},{column1})");

        let parse = self.update_parse(uri)?;
        let Some(ctx) = parse.completion_context(line1, column1) else {
            let items = TOP_LEVEL_KEYWORDS
                .iter()
                .map(|name| {
                    let mut item = CompletionItem::new(*name);
                    item.kind = Some(CompletionItemKind::Keyword);
                    item.detail = Some("keyword".to_string());
                    item
                })
                .collect();
            return Ok(Some(CompletionReply {
                is_incomplete: true,
                items,
            }));
        };

        let (data, is_incomplete) = {
            let compiler = self.facility()?;
            let focus = compiler.compile_focus(uri, ctx.line, ctx.character);
            match ctx.kind {
                ContextKind::MemberSelect => (focus.complete_members(false), false),
                ContextKind::MemberReference => (focus.complete_members(true), false),
                ContextKind::Identifier => {
                    let cs = focus.complete_identifiers(
                        ctx.in_class,
                        ctx.in_method,
                        &ctx.partial_name,
                    );
                    let incomplete = cs.len() >= MAX_COMPLETION_ITEMS;
                    (cs, incomplete)
                }
                ContextKind::Annotation => {
                    let cs = focus.complete_annotations(&ctx.partial_name);
                    let incomplete = cs.len() >= MAX_COMPLETION_ITEMS;
                    (cs, incomplete)
                }
                ContextKind::Case => (focus.complete_cases(), false),
            }
        };

        self.completions.clear();
        let items: Vec<CompletionItem> = data.into_iter().map(|c| self.reply_item(c)).collect();

        let elapsed = started.elapsed().as_millis();
        if is_incomplete {
            info!("Found {} items (incomplete) in {elapsed} ms", items.len());
        } else {
            info!("...found {} items in {elapsed} ms", items.len());
        }
        Ok(Some(CompletionReply {
            is_incomplete,
            items,
        }))
    }

    fn reply_item(&mut self, completion: Completion) -> CompletionItem {
        let mut item = match &completion {
            Completion::Element(el) => {
                let mut item = CompletionItem::new(el.name.clone());
                item.kind = completion_item_kind(el.kind);
                // Executables get their detail at resolve time, when the doc
                // path can supply real parameter names.
                if !el.is_executable() {
                    item.detail = Some(el.type_name.clone());
                }
                let priority = if is_object_member(el) { '9' } else { '2' };
                item.sort_text = Some(format!("{priority}{}", item.label));
                item
            }
            Completion::PackagePart(part) => {
                let mut item = CompletionItem::new(part.name.clone());
                item.kind = Some(CompletionItemKind::Module);
                item.detail = Some(part.full_name.clone());
                item.sort_text = Some(format!("2{}", item.label));
                item
            }
            Completion::Keyword(keyword) => {
                let mut item = CompletionItem::new(keyword.clone());
                item.kind = Some(CompletionItemKind::Keyword);
                item.detail = Some("keyword".to_string());
                item.sort_text = Some(format!("3{}", item.label));
                item
            }
            Completion::ClassName(class) => {
                let mut item = CompletionItem::new(last_name(&class.name));
                item.kind = Some(CompletionItemKind::Class);
                item.detail = Some(class.name.clone());
                let priority = if class.is_imported { '2' } else { '4' };
                item.sort_text = Some(format!("{priority}{}", item.label));
                item
            }
            Completion::Snippet(snippet) => {
                let mut item = CompletionItem::new(snippet.label.clone());
                item.kind = Some(CompletionItemKind::Snippet);
                item.insert_text = Some(snippet.snippet.clone());
                item.insert_text_format = Some(InsertTextFormat::Snippet);
                item.sort_text = Some(format!("1{}", item.label));
                item
            }
        };
        let id = Uuid::new_v4().to_string();
        self.completions.insert(id.clone(), completion);
        item.data = Some(id);
        item
    }

    /// Fill in detail and documentation for an item from the last completion
    /// reply. `None` means the identifier was not in the cache and the item
    /// should be returned unchanged.
    pub fn resolve_completion(&self, id: &str) -> Option<CompletionResolution> {
        let Some(cached) = self.completions.get(id) else {
            warn!("CompletionItem {id} was not in the cache");
            return None;
        };
        let Ok(compiler) = self.facility() else {
            return None;
        };
        let docs = compiler.docs();
        let mut resolution = CompletionResolution::default();
        match cached {
            Completion::Element(el) => {
                if el.is_executable() {
                    resolution.detail =
                        Some(method_details(docs, el).unwrap_or_else(|| default_details(el)));
                }
                resolution.documentation = find_docs(docs, &Ptr::from_element(el));
            }
            Completion::ClassName(class) => {
                let ptr = Ptr::to_class(most_name(&class.name), last_name(&class.name));
                resolution.documentation = find_docs(docs, &ptr);
            }
            Completion::PackagePart(_) | Completion::Keyword(_) | Completion::Snippet(_) => {}
        }
        Some(resolution)
    }
}

fn completion_item_kind(kind: ElementKind) -> Option<CompletionItemKind> {
    match kind {
        ElementKind::AnnotationType => Some(CompletionItemKind::Interface),
        ElementKind::Class => Some(CompletionItemKind::Class),
        ElementKind::Constructor => Some(CompletionItemKind::Constructor),
        ElementKind::Enum => Some(CompletionItemKind::Enum),
        ElementKind::EnumConstant => Some(CompletionItemKind::EnumMember),
        ElementKind::ExceptionParameter => Some(CompletionItemKind::Property),
        ElementKind::Field => Some(CompletionItemKind::Field),
        ElementKind::InstanceInit | ElementKind::StaticInit => Some(CompletionItemKind::Function),
        ElementKind::Interface => Some(CompletionItemKind::Interface),
        ElementKind::LocalVariable => Some(CompletionItemKind::Variable),
        ElementKind::Method => Some(CompletionItemKind::Method),
        ElementKind::Package => Some(CompletionItemKind::Module),
        ElementKind::Parameter => Some(CompletionItemKind::Property),
        ElementKind::ResourceVariable => Some(CompletionItemKind::Variable),
        ElementKind::TypeParameter => Some(CompletionItemKind::TypeParameter),
        ElementKind::Other => None,
    }
}

/// Members inherited from the universal root type sort after everything
/// else: nobody is looking for `hashCode` when they type `.`.
fn is_object_member(el: &Element) -> bool {
    el.qualified_owner() == "java.lang.Object"
}

/// `java.util.List` → `List`
pub(crate) fn last_name(qualified: &str) -> &str {
    qualified.rsplit('.').next().unwrap_or(qualified)
}

/// `java.util.List` → `java.util`
pub(crate) fn most_name(qualified: &str) -> &str {
    match qualified.rfind('.') {
        Some(i) => &qualified[..i],
        None => "",
    }
}

/// First-sentence Markdown for `ptr`, if the doc path has it.
pub(crate) fn find_docs(docs: &dyn Docs, ptr: &Ptr) -> Option<String> {
    info!("Find docs for `{ptr}`...");
    let file = docs.find(ptr)?;
    let parse = docs.parse(&file);
    let path = parse.fuzzy_find(ptr)?;
    let comment = parse.doc(path)?;
    Some(comment.first_sentence)
}

/// Source-derived signature for a method, e.g. `String concat(left, right)`.
fn method_details(docs: &dyn Docs, el: &Element) -> Option<String> {
    info!("Find details for method `{}`...", el.name);
    let ptr = Ptr::from_element(el);
    let file = docs.find(&ptr)?;
    let parse = docs.parse(&file);
    let path = parse.fuzzy_find(&ptr)?;
    let Some(method) = parse.method(path) else {
        warn!("...method `{}` associated with a non-method tree", el.name);
        return None;
    };
    let args: Vec<&str> = method.params.iter().map(|p| p.name.as_str()).collect();
    Some(format!(
        "{} {}({})",
        method.return_type,
        method.name,
        args.join(", ")
    ))
}

/// Signature from the element alone. When every parameter name is the
/// compiler-generated `argN` pattern, short-printed types read better.
fn default_details(el: &Element) -> String {
    let missing_names = el.params.iter().all(|p| is_generated_param_name(&p.name));
    let args: Vec<&str> = el
        .params
        .iter()
        .map(|p| {
            if missing_names {
                p.type_name.as_str()
            } else {
                p.name.as_str()
            }
        })
        .collect();
    format!(
        "{} {}({})",
        el.return_type.as_deref().unwrap_or("void"),
        el.display_name(),
        args.join(", ")
    )
}

pub(crate) fn is_generated_param_name(name: &str) -> bool {
    name.strip_prefix("arg")
        .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
}

#[cfg(test)]
#[path = "../tests/analysis/t_completion.rs"]
mod tests;
