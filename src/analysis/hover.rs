//! Hover: documentation plus a synthesized declaration rendering.

use tracing::{info, warn};

use crate::analysis::completion::find_docs;
use crate::analysis::results::MarkedString;
use crate::analysis::service::{JavaLanguageService, ServiceResult};
use crate::facility::element::{Element, ElementKind};
use crate::facility::ptr::Ptr;
use crate::store::FileStore;

impl JavaLanguageService {
    pub fn hover(
        &mut self,
        uri: &str,
        line: u32,
        character: u32,
    ) -> ServiceResult<Option<Vec<MarkedString>>> {
        if !FileStore::is_java_file(uri) {
            return Ok(None);
        }
        let active = self.update_active_file(uri)?;
        let Some(el) = active.element_at(line + 1, character + 1) else {
            info!("No element under cursor at {uri}({line},{character})");
            return Ok(None);
        };

        let mut result = Vec::new();
        let compiler = self.facility()?;
        if let Some(docs) = find_docs(compiler.docs(), &Ptr::from_element(&el)) {
            result.push(MarkedString::plain(docs));
        }
        result.push(MarkedString::code("java", hover_code(&el)));
        Ok(Some(result))
    }
}

/// Java-ish one-liner or type skeleton for the element under the cursor.
fn hover_code(el: &Element) -> String {
    if el.is_executable() {
        let params: Vec<String> = el
            .params
            .iter()
            .map(|p| format!("{} {}", p.type_name, p.name))
            .collect();
        return format!(
            "{} {}({})",
            el.return_type.as_deref().unwrap_or("void"),
            el.display_name(),
            params.join(", ")
        );
    }
    if is_variable(el) {
        return format!("{} {}", el.type_name, el.name);
    }
    if el.is_type() {
        let mut lines = vec![format!("{} {{", type_declaration(el))];
        for member in &el.members {
            if member.is_executable() || is_variable(member) {
                lines.push(format!("  {};", hover_code(member)));
            } else if member.is_type() {
                lines.push(format!("  {} {{ /* removed */ }}", type_declaration(member)));
            }
        }
        lines.push("}".to_string());
        return lines.join("\n");
    }
    el.name.clone()
}

/// `enum|interface|class|@interface Name [extends Super]`; the extends
/// clause is omitted when the super prints as `Object` or `none`.
fn type_declaration(el: &Element) -> String {
    let keyword = match el.kind {
        ElementKind::AnnotationType => "@interface",
        ElementKind::Interface => "interface",
        ElementKind::Class => "class",
        ElementKind::Enum => "enum",
        _ => {
            warn!("Don't know what to call type element {}", el.name);
            "???"
        }
    };
    let mut decl = format!("{keyword} {}", el.type_name);
    match el.super_type.as_deref() {
        None | Some("Object") | Some("none") => {}
        Some(super_type) => {
            decl.push_str(" extends ");
            decl.push_str(super_type);
        }
    }
    decl
}

fn is_variable(el: &Element) -> bool {
    matches!(
        el.kind,
        ElementKind::EnumConstant
            | ElementKind::ExceptionParameter
            | ElementKind::Field
            | ElementKind::LocalVariable
            | ElementKind::Parameter
            | ElementKind::ResourceVariable
    )
}
