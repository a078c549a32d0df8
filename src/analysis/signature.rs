//! Signature help for the invocation surrounding the cursor.

use crate::analysis::completion::is_generated_param_name;
use crate::analysis::results::{
    ParameterInformation, SignatureHelpReply, SignatureInformation,
};
use crate::analysis::service::{JavaLanguageService, ServiceResult};
use crate::facility::docs::Docs;
use crate::facility::element::Element;
use crate::facility::ptr::Ptr;
use crate::store::FileStore;

impl JavaLanguageService {
    pub fn signature_help(
        &mut self,
        uri: &str,
        line: u32,
        character: u32,
    ) -> ServiceResult<Option<SignatureHelpReply>> {
        if !FileStore::is_java_file(uri) {
            return Ok(None);
        }
        let compiler = self.facility()?;
        let focus = compiler.compile_focus(uri, line + 1, character + 1);
        let Some(invoke) = focus.method_invocation() else {
            return Ok(None);
        };
        let docs = compiler.docs();
        let signatures: Vec<SignatureInformation> = invoke
            .overloads
            .iter()
            .map(|overload| signature_information(docs, overload))
            .collect();
        let active_signature = invoke
            .active_method
            .as_ref()
            .and_then(|resolved| invoke.overloads.iter().position(|o| o == resolved))
            .unwrap_or(0);
        Ok(Some(SignatureHelpReply {
            signatures,
            active_signature,
            active_parameter: invoke.active_parameter,
        }))
    }
}

fn signature_information(docs: &dyn Docs, el: &Element) -> SignatureInformation {
    let parameters =
        params_from_docs(docs, &Ptr::from_element(el)).unwrap_or_else(|| params_from_element(el));
    let labels: Vec<&str> = parameters.iter().map(|p| p.label.as_str()).collect();
    // Constructors are labeled with the type name they construct.
    let label = format!("{}({})", el.display_name(), labels.join(", "));
    SignatureInformation { label, parameters }
}

/// Parameter names from the doc source, each documented by its `@param` tag
/// or, failing that, its declared type.
fn params_from_docs(docs: &dyn Docs, ptr: &Ptr) -> Option<Vec<ParameterInformation>> {
    let file = docs.find(ptr)?;
    let parse = docs.parse(&file);
    let path = parse.fuzzy_find(ptr)?;
    let method = parse.method(path)?;
    let comment = parse.doc(path).unwrap_or_default();
    let parameters = method
        .params
        .iter()
        .map(|param| {
            let tag = comment
                .params
                .iter()
                .find(|(name, _)| name == &param.name)
                .map(|(_, markdown)| markdown.clone());
            ParameterInformation {
                label: param.name.clone(),
                documentation: Some(tag.unwrap_or_else(|| param.type_name.clone())),
            }
        })
        .collect();
    Some(parameters)
}

fn params_from_element(el: &Element) -> Vec<ParameterInformation> {
    let missing_names = el.params.iter().all(|p| is_generated_param_name(&p.name));
    el.params
        .iter()
        .map(|param| ParameterInformation {
            label: if missing_names {
                param.type_name.clone()
            } else {
                param.name.clone()
            },
            documentation: None,
        })
        .collect()
}

#[cfg(test)]
#[path = "../tests/analysis/t_signature.rs"]
mod tests;
